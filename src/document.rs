//! L7: the symbolic document model and its binding to/from
//! `SessionPayloads` (spec.md §4.7).
//!
//! The document is produced by decoding every block once, and consumed
//! back into `SessionPayloads` by re-encoding each present section (or a
//! documented default block when a section is absent). Slot-numbered
//! sections (`contacts`, `rxGroups`, `channels`, `encryptionKeys`) carry
//! an explicit 1-based `slot` field and omit empty entries entirely.

use serde::{Deserialize, Serialize};

use crate::blocks::{basic_info, channel, contact, dtmf, keys, options, rxgroup, vfo};
use crate::error::Result;
use crate::packers;
use crate::session::SessionPayloads;

const CONTACT_SLOTS: u32 = 4000;
const RXGROUP_SLOTS: u32 = 32;
const CHANNEL_SLOTS: u32 = 1024;
const KEY_SLOTS: u32 = 8;

fn clamp_slot(slot: u32, max: u32) -> u32 {
    slot.clamp(1, max)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactEntry {
    pub slot: u32,
    #[serde(flatten)]
    pub contact: contact::Contact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RxGroupEntry {
    pub slot: u32,
    #[serde(flatten)]
    pub group: rxgroup::RxGroup,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelEntry {
    pub slot: u32,
    #[serde(flatten)]
    pub channel: channel::Channel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncryptionKeyEntry {
    pub slot: u32,
    #[serde(flatten)]
    pub key: keys::EncryptionKey,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Codeplug {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radio: Option<basic_info::RadioInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dtmf: Option<dtmf::Dtmf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encryption_keys: Option<Vec<EncryptionKeyEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contacts: Option<Vec<ContactEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rx_groups: Option<Vec<RxGroupEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<Vec<ChannelEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vfo: Option<vfo::Vfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<options::Settings>,
}

fn default_radio_info() -> basic_info::RadioInfo {
    basic_info::RadioInfo {
        model_name: "RT-5D".to_string(),
        model_id: 0,
    }
}

fn default_dtmf() -> dtmf::Dtmf {
    dtmf::Dtmf {
        current_id: String::new(),
        ptt_id: dtmf::PttId::Off,
        duration_ms: 100,
        interval_ms: 100,
        code_groups: vec![None; 15],
    }
}

fn default_vfo_bank(default_mhz: f64) -> vfo::VfoBank {
    vfo::VfoBank {
        rx_freq_mhz: default_mhz,
        tx_freq_mhz: default_mhz,
        rx_sub_audio: crate::field::SubAudio::Off,
        tx_sub_audio: crate::field::SubAudio::Off,
        power: vfo::Power::Mid,
        bandwidth: vfo::Bandwidth::Wide,
        step_khz: 12.5,
        name: String::new(),
    }
}

fn default_vfo() -> vfo::Vfo {
    vfo::Vfo {
        bank_a: default_vfo_bank(136.125),
        bank_b: default_vfo_bank(400.125),
    }
}

fn default_settings() -> options::Settings {
    options::Settings {
        squelch_level: 3,
        voice_broadcast: false,
        voice_language: options::VoiceLanguage::English,
        tot_timer: options::TotTimer::S180,
        tot_alert_timer: 0,
        toa_alert_timer: 0,
        power_saving_mode: false,
        auto_lock_timer: options::AutoLockTimer::Off,
        vox: 0,
        beep: true,
        key_lock: false,
        end_tone_elim: false,
        transmit_without_matching_talkgroup: false,
        roger_beep: false,
        language_announce: options::LanguageAnnounce::Off,
        backlight_timer: options::BacklightTimer::S10,
        boot_screen: options::BootScreen::Logo,
        boot_password: false,
        channel_display_mode: options::ChannelDisplayMode::Name,
        monitor_type: options::MonitorType::Silent,
        dual_standby: true,
        led_indicator: true,
        recording: false,
        sidekey1_short: options::ButtonFunction::Monitor,
        sidekey1_long: options::ButtonFunction::Flashlight,
        sidekey2_short: options::ButtonFunction::Scan,
        work_mode_a_channel: true,
        work_mode_b_channel: true,
        zone_a: 1,
        zone_b: 1,
        channel_a: 1,
        channel_b: 1,
        scan_mode: options::ScanMode::Time,
        mic_gain: 2,
        dual_watch: false,
        alarm_tone: options::AlarmTone::Local,
        alarm_duration_s: 10,
        talkaround_enabled: false,
        encryption_type: 0,
        dmr_id: 1,
        keep_call_time: 10,
    }
}

/// Decode every block once into the symbolic document model.
pub fn from_session(payloads: &SessionPayloads) -> Result<Codeplug> {
    let radio = basic_info::decode("radio", &payloads.basic_info)?;
    let dtmf = dtmf::decode("dtmf", &payloads.dtmf)?;
    let settings = options::decode("settings", &payloads.options)?;
    let vfo = vfo::decode("vfo", &payloads.vfo)?;

    let encryption_keys = keys::decode("encryptionKeys", &payloads.keys)?
        .into_iter()
        .enumerate()
        .filter_map(|(i, k)| k.map(|key| EncryptionKeyEntry { slot: i as u32 + 1, key }))
        .collect();

    let contacts = packers::unpack_contacts("contacts", &payloads.contacts)?
        .into_iter()
        .enumerate()
        .filter_map(|(i, c)| c.map(|contact| ContactEntry { slot: i as u32 + 1, contact }))
        .collect();

    let rx_groups = packers::unpack_rx_groups("rxGroups", &payloads.rx_groups)?
        .into_iter()
        .enumerate()
        .filter_map(|(i, g)| g.map(|group| RxGroupEntry { slot: i as u32 + 1, group }))
        .collect();

    let channels = packers::unpack_channels("channels", &payloads.channels)?
        .into_iter()
        .enumerate()
        .filter_map(|(i, c)| c.map(|channel| ChannelEntry { slot: i as u32 + 1, channel }))
        .collect();

    Ok(Codeplug {
        radio: Some(radio),
        dtmf: Some(dtmf),
        encryption_keys: Some(encryption_keys),
        contacts: Some(contacts),
        rx_groups: Some(rx_groups),
        channels: Some(channels),
        vfo: Some(vfo),
        settings: Some(settings),
    })
}

/// Encode the document back into full-size `SessionPayloads`, filling
/// absent sections with a documented default block (spec.md §4.7:
/// "Missing sections fall back to default blocks").
pub fn to_session(doc: &Codeplug) -> Result<SessionPayloads> {
    let radio = doc.radio.clone().unwrap_or_else(default_radio_info);
    let dtmf_doc = doc.dtmf.clone().unwrap_or_else(default_dtmf);
    let settings = doc.settings.clone().unwrap_or_else(default_settings);
    let vfo_doc = doc.vfo.clone().unwrap_or_else(default_vfo);

    let mut key_slots: Vec<Option<keys::EncryptionKey>> = vec![None; KEY_SLOTS as usize];
    for entry in doc.encryption_keys.iter().flatten() {
        let idx = clamp_slot(entry.slot, KEY_SLOTS) as usize - 1;
        key_slots[idx] = Some(entry.key.clone());
    }

    let mut contact_slots: Vec<Option<contact::Contact>> = vec![None; CONTACT_SLOTS as usize];
    for entry in doc.contacts.iter().flatten() {
        let idx = clamp_slot(entry.slot, CONTACT_SLOTS) as usize - 1;
        contact_slots[idx] = Some(entry.contact.clone());
    }

    let mut rx_group_slots: Vec<Option<rxgroup::RxGroup>> = vec![None; RXGROUP_SLOTS as usize];
    for entry in doc.rx_groups.iter().flatten() {
        let idx = clamp_slot(entry.slot, RXGROUP_SLOTS) as usize - 1;
        rx_group_slots[idx] = Some(entry.group.clone());
    }

    let mut channel_slots: Vec<Option<channel::Channel>> = vec![None; CHANNEL_SLOTS as usize];
    for entry in doc.channels.iter().flatten() {
        let idx = clamp_slot(entry.slot, CHANNEL_SLOTS) as usize - 1;
        channel_slots[idx] = Some(entry.channel.clone());
    }

    Ok(SessionPayloads {
        version: vec![0xFF; 128],
        dtmf: dtmf::encode("dtmf", &dtmf_doc)?,
        keys: keys::encode("encryptionKeys", &key_slots)?,
        contacts: packers::pack_contacts("contacts", &contact_slots)?,
        rx_groups: packers::pack_rx_groups("rxGroups", &rx_group_slots)?,
        channels: packers::pack_channels("channels", &channel_slots)?,
        vfo: vfo::encode("vfo", &vfo_doc)?.to_vec(),
        options: options::encode("settings", &settings)?.to_vec(),
        basic_info: basic_info::encode("radio", &radio)?.to_vec(),
    })
}
