//! Integration-level round-trip scenarios for the ten block codecs
//! (spec.md §4.5/§8).

use rt5d_prog::blocks::{basic_info, channel, contact, dtmf, keys, options, rxgroup, vfo};
use rt5d_prog::field::SubAudio;

#[test]
fn empty_slot_sentinels_decode_to_none() {
    assert_eq!(channel::decode("c", &[0xFF; channel::LEN]).unwrap(), None);
    assert_eq!(channel::decode("c", &[0x00; channel::LEN]).unwrap(), None);
    assert_eq!(contact::decode("c", &[0xFF; contact::LEN]).unwrap(), None);
    assert_eq!(rxgroup::decode("g", &[0xFF; rxgroup::LEN]).unwrap(), None);
}

#[test]
fn channel_tier_ii_round_trip() {
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
    let encoded = channel::encode("c", &ch).unwrap();
    assert_eq!(encoded[14] & 0x0F, 0);
    assert_eq!(encoded[15] & 0x0F, 1);
    assert_eq!(channel::decode("c", &encoded).unwrap(), Some(ch));
}

#[test]
fn vfo_default_substitution_for_all_ff() {
    let decoded = vfo::decode("v", &[0xFF; vfo::LEN]).unwrap();
    assert_eq!(decoded.bank_a.rx_freq_mhz, 136.125);
    assert_eq!(decoded.bank_b.rx_freq_mhz, 400.125);
}

#[test]
fn rxgroup_member_terminator_disambiguates_max_id() {
    let group = rxgroup::RxGroup { name: "".into(), members: vec![1, 2, 3] };
    let encoded = rxgroup::encode("g", &group).unwrap();
    assert_eq!(&encoded[9..12], &[0x00, 0x00, 0x00]);
    assert_eq!(rxgroup::decode("g", &encoded).unwrap(), Some(group));
}

#[test]
fn encryption_keys_round_trip_all_three_algorithms() {
    let mut slots: keys::EncryptionKeys = vec![None; 8];
    slots[0] = Some(keys::EncryptionKey { algorithm: keys::Algorithm::Arc4, key_hex: "abcdef0123".into() });
    slots[1] = Some(keys::EncryptionKey {
        algorithm: keys::Algorithm::Aes128,
        key_hex: "00112233445566778899aabbccddeef".into(),
    });
    slots[2] = Some(keys::EncryptionKey {
        algorithm: keys::Algorithm::Aes256,
        key_hex: "00112233445566778899aabbccddeeff00112233445566778899aabbccddee".into(),
    });
    let encoded = keys::encode("k", &slots).unwrap();
    assert_eq!(encoded.len(), 264);
    assert_eq!(keys::decode("k", &encoded).unwrap(), slots);
}

#[test]
fn dtmf_code_groups_round_trip() {
    let d = dtmf::Dtmf {
        current_id: "9*#".into(),
        ptt_id: dtmf::PttId::Eot,
        duration_ms: 250,
        interval_ms: 50,
        code_groups: {
            let mut v = vec![None; 15];
            v[3] = Some("1234".into());
            v
        },
    };
    let encoded = dtmf::encode("d", &d).unwrap();
    assert_eq!(encoded.len(), 272);
    assert_eq!(dtmf::decode("d", &encoded).unwrap(), d);
}

#[test]
fn options_block_round_trips_densely_packed_fields() {
    let settings = options::Settings {
        squelch_level: 9,
        voice_broadcast: false,
        voice_language: options::VoiceLanguage::Chinese,
        tot_timer: options::TotTimer::S600,
        tot_alert_timer: 10,
        toa_alert_timer: 10,
        power_saving_mode: true,
        auto_lock_timer: options::AutoLockTimer::Min5,
        vox: 10,
        beep: false,
        key_lock: true,
        end_tone_elim: false,
        transmit_without_matching_talkgroup: true,
        roger_beep: false,
        language_announce: options::LanguageAnnounce::Chinese,
        backlight_timer: options::BacklightTimer::Always,
        boot_screen: options::BootScreen::VoltageAndLogo,
        boot_password: true,
        channel_display_mode: options::ChannelDisplayMode::ChannelNumber,
        monitor_type: options::MonitorType::Silent,
        dual_standby: false,
        led_indicator: false,
        recording: true,
        sidekey1_short: options::ButtonFunction::Fm,
        sidekey1_long: options::ButtonFunction::Vfo,
        sidekey2_short: options::ButtonFunction::PowerLevel,
        work_mode_a_channel: false,
        work_mode_b_channel: true,
        zone_a: 16,
        zone_b: 16,
        channel_a: 1024,
        channel_b: 1,
        scan_mode: options::ScanMode::Search,
        mic_gain: 4,
        dual_watch: false,
        alarm_tone: options::AlarmTone::Off,
        alarm_duration_s: 5,
        talkaround_enabled: true,
        encryption_type: 1,
        dmr_id: 1,
        keep_call_time: 31,
    };
    let encoded = options::encode("s", &settings).unwrap();
    assert_eq!(encoded.len(), 64);
    assert_eq!(options::decode("s", &encoded).unwrap(), settings);
}

#[test]
fn basic_info_model_id_is_left_padded_ascii() {
    let info = basic_info::RadioInfo { model_name: "RT-5D".into(), model_id: 42 };
    let encoded = basic_info::encode("r", &info).unwrap();
    assert_eq!(&encoded[20..28], b"00000042");
    assert_eq!(basic_info::decode("r", &encoded).unwrap(), info);
}
