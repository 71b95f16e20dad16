//! Optional functions / settings block (64 bytes, CMD `0x12`/`0x32`).
//! Field table per SPEC_FULL.md §4.7a.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const LEN: usize = 64;

macro_rules! nibble_bool_field {
    ($get:ident, $set:ident, $offset:expr) => {
        fn $get(bytes: &[u8]) -> bool {
            bytes[$offset] & 0x0F != 0
        }
        fn $set(out: &mut [u8; LEN], v: bool) {
            out[$offset] = if v { 1 } else { 0 };
        }
    };
}

/// Every invocation lists its zero-value variant first; that variant is
/// moved to the end of the generated enum and marked `#[serde(other)]` so
/// an unrecognized document string falls back to it rather than failing
/// the whole load (spec.md §4.7: unknown enumeration values fall back to
/// a documented default).
macro_rules! closed_enum {
    ($name:ident { $default:ident = 0 $(, $variant:ident = $value:expr)+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+,
            #[serde(other)]
            $default,
        }

        impl $name {
            fn from_nibble(path: &str, n: u8) -> Result<Self> {
                match n {
                    0 => Ok(Self::$default),
                    $($value => Ok(Self::$variant),)+
                    other => Err(Error::codec(path, format!("{other} is not a valid {}", stringify!($name)))),
                }
            }

            fn to_nibble(self) -> u8 {
                match self {
                    Self::$default => 0,
                    $(Self::$variant => $value),+
                }
            }
        }
    };
}

closed_enum!(VoiceLanguage { Chinese = 0, English = 1 });
closed_enum!(TotTimer {
    Off = 0, S15 = 1, S30 = 2, S60 = 3, S90 = 4, S120 = 5, S180 = 6, S300 = 7, S600 = 8,
});
closed_enum!(AutoLockTimer {
    Off = 0, S5 = 1, S10 = 2, S15 = 3, S30 = 4, Min1 = 5, Min2 = 6, Min5 = 7,
});
closed_enum!(LanguageAnnounce { Off = 0, Chinese = 1, English = 2, Both = 3 });
closed_enum!(BacklightTimer {
    Always = 0, S5 = 1, S10 = 2, S15 = 3, S30 = 4, Min1 = 5, Min2 = 6, Min5 = 7,
});
closed_enum!(BootScreen { None = 0, Logo = 1, VoltageAndLogo = 2 });
closed_enum!(ChannelDisplayMode { Name = 0, Frequency = 1, ChannelNumber = 2 });
closed_enum!(MonitorType { Silent = 0, Open = 1 });
closed_enum!(ButtonFunction {
    None = 0, Monitor = 1, Scan = 2, Alarm = 3, Flashlight = 4, PowerLevel = 5, Vfo = 6, Fm = 7,
});
closed_enum!(ScanMode { Time = 0, Carrier = 1, Search = 2 });
closed_enum!(AlarmTone { Off = 0, Local = 1, Remote = 2, Both = 3 });

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub squelch_level: u8,
    pub voice_broadcast: bool,
    pub voice_language: VoiceLanguage,
    pub tot_timer: TotTimer,
    pub tot_alert_timer: u8,
    pub toa_alert_timer: u8,
    pub power_saving_mode: bool,
    pub auto_lock_timer: AutoLockTimer,
    pub vox: u8,
    pub beep: bool,
    pub key_lock: bool,
    pub end_tone_elim: bool,
    pub transmit_without_matching_talkgroup: bool,
    pub roger_beep: bool,
    pub language_announce: LanguageAnnounce,
    pub backlight_timer: BacklightTimer,
    pub boot_screen: BootScreen,
    pub boot_password: bool,
    pub channel_display_mode: ChannelDisplayMode,
    pub monitor_type: MonitorType,
    pub dual_standby: bool,
    pub led_indicator: bool,
    pub recording: bool,
    pub sidekey1_short: ButtonFunction,
    pub sidekey1_long: ButtonFunction,
    pub sidekey2_short: ButtonFunction,
    pub work_mode_a_channel: bool,
    pub work_mode_b_channel: bool,
    pub zone_a: u8,
    pub zone_b: u8,
    pub channel_a: u16,
    pub channel_b: u16,
    pub scan_mode: ScanMode,
    pub mic_gain: u8,
    pub dual_watch: bool,
    pub alarm_tone: AlarmTone,
    pub alarm_duration_s: u8,
    pub talkaround_enabled: bool,
    /// Low nibble of byte 39; matches `EncryptionKeys::Algorithm`'s own
    /// nibble encoding (spec.md §4.5 / SPEC_FULL.md §4.7a).
    pub encryption_type: u8,
    pub dmr_id: u32,
    pub keep_call_time: u8,
}

nibble_bool_field!(get_voice_broadcast, set_voice_broadcast, 1);
nibble_bool_field!(get_power_saving_mode, set_power_saving_mode, 6);
nibble_bool_field!(get_beep, set_beep, 9);
nibble_bool_field!(get_key_lock, set_key_lock, 10);
nibble_bool_field!(get_end_tone_elim, set_end_tone_elim, 11);
nibble_bool_field!(
    get_transmit_without_matching_talkgroup,
    set_transmit_without_matching_talkgroup,
    12
);
nibble_bool_field!(get_roger_beep, set_roger_beep, 13);
nibble_bool_field!(get_boot_password, set_boot_password, 17);
nibble_bool_field!(get_dual_standby, set_dual_standby, 20);
nibble_bool_field!(get_led_indicator, set_led_indicator, 21);
nibble_bool_field!(get_recording, set_recording, 22);
nibble_bool_field!(get_dual_watch, set_dual_watch, 35);
nibble_bool_field!(get_talkaround_enabled, set_talkaround_enabled, 38);

use crate::field::{decode_dmr_id, encode_dmr_id};

pub fn encode(path: &str, s: &Settings) -> Result<[u8; LEN]> {
    let mut out = [0xFFu8; LEN];

    out[0] = s.squelch_level & 0x0F;
    set_voice_broadcast(&mut out, s.voice_broadcast);
    out[2] = s.voice_language.to_nibble();
    out[3] = s.tot_timer.to_nibble();
    out[4] = s.tot_alert_timer & 0x0F;
    out[5] = s.toa_alert_timer & 0x0F;
    set_power_saving_mode(&mut out, s.power_saving_mode);
    out[7] = s.auto_lock_timer.to_nibble();
    out[8] = s.vox & 0x0F;
    set_beep(&mut out, s.beep);
    set_key_lock(&mut out, s.key_lock);
    set_end_tone_elim(&mut out, s.end_tone_elim);
    set_transmit_without_matching_talkgroup(&mut out, s.transmit_without_matching_talkgroup);
    set_roger_beep(&mut out, s.roger_beep);
    out[14] = s.language_announce.to_nibble();
    out[15] = s.backlight_timer.to_nibble();
    out[16] = s.boot_screen.to_nibble();
    set_boot_password(&mut out, s.boot_password);
    out[18] = s.channel_display_mode.to_nibble();
    out[19] = s.monitor_type.to_nibble();
    set_dual_standby(&mut out, s.dual_standby);
    set_led_indicator(&mut out, s.led_indicator);
    set_recording(&mut out, s.recording);
    out[23] = s.sidekey1_short.to_nibble();
    out[24] = s.sidekey1_long.to_nibble();
    out[25] = s.sidekey2_short.to_nibble();
    out[26] = (s.work_mode_a_channel as u8) | ((s.work_mode_b_channel as u8) << 4);
    out[27] = s.zone_a;
    out[28] = s.zone_b;
    out[29..31].copy_from_slice(&s.channel_a.to_le_bytes());
    out[31..33].copy_from_slice(&s.channel_b.to_le_bytes());
    out[33] = s.scan_mode.to_nibble();
    out[34] = s.mic_gain & 0x0F;
    set_dual_watch(&mut out, s.dual_watch);
    out[36] = s.alarm_tone.to_nibble();
    out[37] = s.alarm_duration_s;
    set_talkaround_enabled(&mut out, s.talkaround_enabled);
    out[39] = s.encryption_type & 0x0F;
    out[40..43].copy_from_slice(&encode_dmr_id(path, s.dmr_id)?);
    out[43..50].fill(0xFF);
    out[50] = s.keep_call_time & 0x1F;
    out[51..64].fill(0xFF);

    Ok(out)
}

pub fn decode(path: &str, bytes: &[u8]) -> Result<Settings> {
    if bytes.len() != LEN {
        return Err(Error::codec(
            path,
            format!("options block must be {LEN} bytes, got {}", bytes.len()),
        ));
    }

    Ok(Settings {
        squelch_level: bytes[0] & 0x0F,
        voice_broadcast: get_voice_broadcast(bytes),
        voice_language: VoiceLanguage::from_nibble(path, bytes[2] & 0x0F)?,
        tot_timer: TotTimer::from_nibble(path, bytes[3] & 0x0F)?,
        tot_alert_timer: bytes[4] & 0x0F,
        toa_alert_timer: bytes[5] & 0x0F,
        power_saving_mode: get_power_saving_mode(bytes),
        auto_lock_timer: AutoLockTimer::from_nibble(path, bytes[7] & 0x0F)?,
        vox: bytes[8] & 0x0F,
        beep: get_beep(bytes),
        key_lock: get_key_lock(bytes),
        end_tone_elim: get_end_tone_elim(bytes),
        transmit_without_matching_talkgroup: get_transmit_without_matching_talkgroup(bytes),
        roger_beep: get_roger_beep(bytes),
        language_announce: LanguageAnnounce::from_nibble(path, bytes[14] & 0x0F)?,
        backlight_timer: BacklightTimer::from_nibble(path, bytes[15] & 0x0F)?,
        boot_screen: BootScreen::from_nibble(path, bytes[16] & 0x0F)?,
        boot_password: get_boot_password(bytes),
        channel_display_mode: ChannelDisplayMode::from_nibble(path, bytes[18] & 0x0F)?,
        monitor_type: MonitorType::from_nibble(path, bytes[19] & 0x0F)?,
        dual_standby: get_dual_standby(bytes),
        led_indicator: get_led_indicator(bytes),
        recording: get_recording(bytes),
        sidekey1_short: ButtonFunction::from_nibble(path, bytes[23] & 0x0F)?,
        sidekey1_long: ButtonFunction::from_nibble(path, bytes[24] & 0x0F)?,
        sidekey2_short: ButtonFunction::from_nibble(path, bytes[25] & 0x0F)?,
        work_mode_a_channel: bytes[26] & 0x0F != 0,
        work_mode_b_channel: bytes[26] & 0xF0 != 0,
        zone_a: bytes[27],
        zone_b: bytes[28],
        channel_a: u16::from_le_bytes([bytes[29], bytes[30]]),
        channel_b: u16::from_le_bytes([bytes[31], bytes[32]]),
        scan_mode: ScanMode::from_nibble(path, bytes[33] & 0x0F)?,
        mic_gain: bytes[34] & 0x0F,
        dual_watch: get_dual_watch(bytes),
        alarm_tone: AlarmTone::from_nibble(path, bytes[36] & 0x0F)?,
        alarm_duration_s: bytes[37],
        talkaround_enabled: get_talkaround_enabled(bytes),
        encryption_type: bytes[39] & 0x0F,
        dmr_id: decode_dmr_id([bytes[40], bytes[41], bytes[42]]),
        keep_call_time: bytes[50] & 0x1F,
    })
}
