//! Non-core: the `test` subcommand's self-test harness (SPEC_FULL.md §6b).
//!
//! Runs the same property checks as the `#[cfg(test)]` suites scattered
//! across this crate — the CRC test vector, the frame-layout scenarios,
//! and the codec round-trip properties from spec.md §8 — without opening
//! a serial port, so `<tool> test` works on a machine with no radio
//! attached. Each check is a `(name, pass)` pair; the CLI prints one line
//! per check and exits 0 iff all pass.

use crate::blocks::{basic_info, channel, contact, dtmf, keys, options, rxgroup, vfo};
use crate::dcs;
use crate::field::{self, SubAudio};
use crate::frame::Frame;
use crate::packers;
use crate::{crc, document};

pub struct CheckResult {
    pub name: &'static str,
    pub passed: bool,
}

fn check(name: &'static str, passed: bool) -> CheckResult {
    CheckResult { name, passed }
}

/// spec.md §4.2 / §8: `crc16("123456789") == 0x31C3`.
fn check_crc_vector() -> CheckResult {
    check("crc16 test vector", crc::crc16(b"123456789") == 0x31C3)
}

/// spec.md §8 scenario 1: handshake frame bytes.
fn check_handshake_frame() -> CheckResult {
    let bytes = Frame::new(0x02, 0, b"PROGRAMJC8810DU".to_vec()).to_bytes();
    let ok = bytes.len() == 23
        && bytes[0..6] == [0xA5, 0x02, 0x00, 0x00, 0x00, 0x0F]
        && bytes[6] == b'P'
        && bytes[20] == b'U';
    check("handshake frame layout", ok)
}

/// spec.md §8 scenario 3: channel write header.
fn check_channel_write_header() -> CheckResult {
    let bytes = Frame::new(0x30, 0, vec![0u8; 1024]).to_bytes();
    let ok = bytes.len() == 1032 && bytes[4..6] == [0x04, 0x00];
    check("channel write frame header", ok)
}

/// spec.md §8 scenario 4/5: CTCSS 88.5 and DCS D023I.
fn check_sub_audio_vectors() -> CheckResult {
    let ctcss_ok = field::encode_sub_audio("t", &SubAudio::Ctcss(88.5)).unwrap() == [0x75, 0x03];
    let dcs = SubAudio::Dcs { code: "023".into(), inverted: true };
    let dcs_ok = field::encode_sub_audio("t", &dcs).unwrap() == [0x6A, 0x00];
    check("sub-audio CTCSS/DCS test vectors", ctcss_ok && dcs_ok)
}

/// spec.md §8: every DCS code round-trips both polarities.
fn check_dcs_table() -> CheckResult {
    let ok = dcs::DCS_CODES.len() == 105
        && dcs::DCS_CODES.iter().all(|&code| {
            [false, true].iter().all(|&inverted| {
                let idx = dcs::table_index(code, inverted).unwrap();
                dcs::from_table_index(idx) == Some((code, inverted))
            })
        });
    check("210-entry DCS table round-trips", ok)
}

/// spec.md §9: corrected frequency test vectors (145.5 MHz, 146.52 MHz).
fn check_frequency_vectors() -> CheckResult {
    let a = field::encode_frequency("t", 145.5).unwrap() == [0xF0, 0x03, 0xDE, 0x00];
    let b = field::encode_frequency("t", 146.52).unwrap() == [0x60, 0x92, 0xDF, 0x00];
    check("corrected frequency test vectors", a && b)
}

/// spec.md §8: channel record round-trip (scenario 7 shape).
fn check_channel_round_trip() -> CheckResult {
    let ch = channel::Channel {
        rx_freq_mhz: 441.0,
        tx_freq_mhz: 446.0,
        rx_sub_audio: SubAudio::Off,
        tx_sub_audio: SubAudio::Off,
        power: channel::Power::High,
        bandwidth: channel::Bandwidth::Wide,
        scan_add: true,
        mode: channel::ChannelMode::DmrTierII,
        dmr: Some(channel::DmrFields {
            color_code: 7,
            time_slot: channel::TimeSlot::Slot2,
            contact_index: 12,
            rx_group_index: 3,
            encrypt_key_index: 0,
        }),
        learn_fhss: false,
        fhss_code: None,
        name: "Repeater".into(),
    };
    let encoded = channel::encode("t", &ch).unwrap();
    let ok = encoded[14] & 0x0F == 0
        && encoded[15] & 0x0F == 1
        && channel::decode("t", &encoded).unwrap() == Some(ch);
    check("channel Tier II round-trip", ok)
}

/// spec.md §8 scenario 8: VFO default substitution.
fn check_vfo_defaults() -> CheckResult {
    let decoded = vfo::decode("t", &[0xFFu8; vfo::LEN]).unwrap();
    let ok = decoded.bank_a.rx_freq_mhz == 136.125 && decoded.bank_b.rx_freq_mhz == 400.125;
    check("VFO default frequency substitution", ok)
}

/// spec.md §8 scenario 9: rx group member terminator.
fn check_rxgroup_terminator() -> CheckResult {
    let group = rxgroup::RxGroup { name: "".into(), members: vec![1, 2, 3] };
    let encoded = rxgroup::encode("t", &group).unwrap();
    check("rx group terminator disambiguates 0xFFFFFF", encoded[9..12] == [0x00, 0x00, 0x00])
}

/// spec.md §8 scenario 10: empty packer round-trip.
fn check_empty_packer_round_trip() -> CheckResult {
    let slots = vec![None; 1024];
    let packets = packers::pack_channels("t", &slots).unwrap();
    let ok = packets.len() == 64
        && packets.iter().all(|p| p.len() == 1024 && p.iter().all(|&b| b == 0xFF))
        && packers::unpack_channels("t", &packets).unwrap() == slots;
    check("empty channel packer round-trip", ok)
}

fn check_contact_empty_sentinel() -> CheckResult {
    check("contact empty sentinel", contact::decode("t", &[0xFF; contact::LEN]).unwrap().is_none())
}

fn check_dtmf_round_trip() -> CheckResult {
    let d = dtmf::Dtmf {
        current_id: "12345".into(),
        ptt_id: dtmf::PttId::Both,
        duration_ms: 150,
        interval_ms: 200,
        code_groups: vec![None; 15],
    };
    let encoded = dtmf::encode("t", &d).unwrap();
    check("DTMF block round-trip", dtmf::decode("t", &encoded).unwrap() == d)
}

fn check_keys_round_trip() -> CheckResult {
    let mut slots: keys::EncryptionKeys = vec![None; 8];
    slots[2] = Some(keys::EncryptionKey {
        algorithm: keys::Algorithm::Aes256,
        key_hex: "00112233445566778899aabbccddeeff00112233445566778899aabbccddee".into(),
    });
    let encoded = keys::encode("t", &slots).unwrap();
    check("encryption key block round-trip", keys::decode("t", &encoded).unwrap() == slots)
}

fn check_options_round_trip() -> CheckResult {
    let settings = options::Settings {
        squelch_level: 5,
        voice_broadcast: true,
        voice_language: options::VoiceLanguage::English,
        tot_timer: options::TotTimer::S180,
        tot_alert_timer: 5,
        toa_alert_timer: 3,
        power_saving_mode: false,
        auto_lock_timer: options::AutoLockTimer::S30,
        vox: 3,
        beep: true,
        key_lock: false,
        end_tone_elim: true,
        transmit_without_matching_talkgroup: false,
        roger_beep: true,
        language_announce: options::LanguageAnnounce::Both,
        backlight_timer: options::BacklightTimer::S10,
        boot_screen: options::BootScreen::Logo,
        boot_password: false,
        channel_display_mode: options::ChannelDisplayMode::Name,
        monitor_type: options::MonitorType::Open,
        dual_standby: true,
        led_indicator: true,
        recording: false,
        sidekey1_short: options::ButtonFunction::Monitor,
        sidekey1_long: options::ButtonFunction::Alarm,
        sidekey2_short: options::ButtonFunction::Scan,
        work_mode_a_channel: true,
        work_mode_b_channel: false,
        zone_a: 1,
        zone_b: 2,
        channel_a: 10,
        channel_b: 512,
        scan_mode: options::ScanMode::Carrier,
        mic_gain: 2,
        dual_watch: true,
        alarm_tone: options::AlarmTone::Both,
        alarm_duration_s: 30,
        talkaround_enabled: false,
        encryption_type: 2,
        dmr_id: 3021234,
        keep_call_time: 10,
    };
    let encoded = options::encode("t", &settings).unwrap();
    check("settings block round-trip", options::decode("t", &encoded).unwrap() == settings)
}

fn check_basic_info_padding() -> CheckResult {
    let info = basic_info::RadioInfo { model_name: "".into(), model_id: 42 };
    let encoded = basic_info::encode("t", &info).unwrap();
    check("basic info model id is left-padded ASCII", &encoded[20..28] == b"00000042")
}

fn check_document_round_trip() -> CheckResult {
    let doc = document::Codeplug::default();
    let payloads = document::to_session(&doc).unwrap();
    let back = document::from_session(&payloads).unwrap();
    check("missing-section document round-trip", doc.contacts.is_none() && back.contacts.is_some())
}

/// Run every self-test check. Mirrors `cargo test`'s assertions but as
/// plain boolean results so the `test` CLI subcommand can print a
/// PASS/FAIL line per check without a serial port.
pub fn run_all() -> Vec<CheckResult> {
    vec![
        check_crc_vector(),
        check_handshake_frame(),
        check_channel_write_header(),
        check_sub_audio_vectors(),
        check_dcs_table(),
        check_frequency_vectors(),
        check_channel_round_trip(),
        check_vfo_defaults(),
        check_rxgroup_terminator(),
        check_empty_packer_round_trip(),
        check_contact_empty_sentinel(),
        check_dtmf_round_trip(),
        check_keys_round_trip(),
        check_options_round_trip(),
        check_basic_info_padding(),
        check_document_round_trip(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_self_test_check_passes() {
        for result in run_all() {
            assert!(result.passed, "self-test check {:?} failed", result.name);
        }
    }
}
