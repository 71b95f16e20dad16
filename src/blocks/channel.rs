//! Channel record (64 bytes, one slot of the channels block, CMD
//! `0x10`/`0x30`). Layout per spec.md §4.5 and SPEC_FULL.md §4.5a.
//!
//! `vfo.rs` shares this record's field positions up through byte 23 (see
//! SPEC_FULL.md §4.5a for the exact differences at byte 13 and byte 23,
//! and the VFO bank's lack of an FHSS region).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::field::{
    decode_frequency, decode_gb2312_field, decode_sub_audio, encode_frequency,
    encode_gb2312_field, encode_sub_audio, SubAudio,
};

pub const LEN: usize = 64;
const NAME_START: usize = 32;
const NAME_WIDTH: usize = 12;

/// Unrecognized document strings fall back to `Mid` (spec.md §4.7: unknown
/// enumeration values fall back to a documented default).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Power {
    Low,
    High,
    #[serde(other)]
    Mid,
}

impl Power {
    fn from_nibble(path: &str, n: u8) -> Result<Self> {
        match n {
            0 => Ok(Self::Low),
            1 => Ok(Self::Mid),
            2 => Ok(Self::High),
            other => Err(Error::codec(path, format!("{other} is not a valid power level"))),
        }
    }

    fn to_nibble(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Mid => 1,
            Self::High => 2,
        }
    }
}

/// Unrecognized document strings fall back to `Wide` (spec.md §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bandwidth {
    Narrow,
    #[serde(other)]
    Wide,
}

impl Bandwidth {
    fn from_nibble(path: &str, n: u8) -> Result<Self> {
        match n {
            0 => Ok(Self::Narrow),
            1 => Ok(Self::Wide),
            other => Err(Error::codec(path, format!("{other} is not a valid bandwidth"))),
        }
    }

    fn to_nibble(self) -> u8 {
        match self {
            Self::Narrow => 0,
            Self::Wide => 1,
        }
    }
}

/// Unrecognized document strings fall back to `Slot1` (spec.md §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeSlot {
    Slot2,
    #[serde(other)]
    Slot1,
}

impl TimeSlot {
    fn from_nibble(path: &str, n: u8) -> Result<Self> {
        match n {
            0 => Ok(Self::Slot1),
            1 => Ok(Self::Slot2),
            other => Err(Error::codec(path, format!("{other} is not a valid timeSlot"))),
        }
    }

    fn to_nibble(self) -> u8 {
        match self {
            Self::Slot1 => 0,
            Self::Slot2 => 1,
        }
    }
}

/// Unrecognized document strings fall back to `Analog` (spec.md §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelMode {
    DmrTierI,
    DmrTierII,
    #[serde(other)]
    Analog,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmrFields {
    pub color_code: u8,
    pub time_slot: TimeSlot,
    /// 1-based into Contacts; `0` means none assigned.
    pub contact_index: u16,
    /// 1-based into RxGroups; `0` means none assigned.
    pub rx_group_index: u8,
    /// 1-based into EncryptionKeys; `0` means none assigned.
    pub encrypt_key_index: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    #[serde(with = "crate::field::mhz_string")]
    pub rx_freq_mhz: f64,
    #[serde(with = "crate::field::mhz_string")]
    pub tx_freq_mhz: f64,
    pub rx_sub_audio: SubAudio,
    pub tx_sub_audio: SubAudio,
    pub power: Power,
    pub bandwidth: Bandwidth,
    pub scan_add: bool,
    pub mode: ChannelMode,
    pub dmr: Option<DmrFields>,
    pub learn_fhss: bool,
    /// 6 hex characters, or `None` when the channel has no FHSS code.
    pub fhss_code: Option<String>,
    pub name: String,
}

fn encode_fhss(path: &str, code: &str) -> Result<[u8; 3]> {
    if code.len() != 6 || !code.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::codec(path, format!("{code:?} is not 6 hex characters")));
    }
    let digits: Vec<u8> = code
        .chars()
        .map(|c| c.to_digit(16).unwrap() as u8)
        .collect();
    Ok([
        (digits[4] << 4) | digits[5],
        (digits[2] << 4) | digits[3],
        (digits[0] << 4) | digits[1],
    ])
}

fn decode_fhss(bytes: [u8; 3]) -> String {
    let d = [
        (bytes[2] >> 4) & 0x0F,
        bytes[2] & 0x0F,
        (bytes[1] >> 4) & 0x0F,
        bytes[1] & 0x0F,
        (bytes[0] >> 4) & 0x0F,
        bytes[0] & 0x0F,
    ];
    d.iter().map(|n| std::char::from_digit(*n as u32, 16).unwrap().to_ascii_uppercase()).collect()
}

pub fn encode(path: &str, ch: &Channel) -> Result<[u8; LEN]> {
    let mut out = [0xFFu8; LEN];

    out[0..4].copy_from_slice(&encode_frequency(path, ch.rx_freq_mhz)?);
    out[4..8].copy_from_slice(&encode_frequency(path, ch.tx_freq_mhz)?);
    out[8..10].copy_from_slice(&encode_sub_audio(path, &ch.rx_sub_audio)?);
    out[10..12].copy_from_slice(&encode_sub_audio(path, &ch.tx_sub_audio)?);

    out[12] = ch.power.to_nibble();
    out[13] = ch.bandwidth.to_nibble() | if ch.scan_add { 0x10 } else { 0x00 };

    match (&ch.mode, &ch.dmr) {
        (ChannelMode::Analog, _) => {
            out[14] = 1;
            out[15] = 0;
        }
        (ChannelMode::DmrTierI, Some(dmr)) => {
            out[14] = 0;
            out[15] = 0;
            write_dmr_fields(&mut out, dmr);
        }
        (ChannelMode::DmrTierII, Some(dmr)) => {
            out[14] = 0;
            out[15] = 1;
            write_dmr_fields(&mut out, dmr);
        }
        (ChannelMode::DmrTierI | ChannelMode::DmrTierII, None) => {
            return Err(Error::codec(path, "DMR channel is missing its DMR fields"));
        }
    }

    out[23] = if ch.learn_fhss { 1 } else { 0 };

    match &ch.fhss_code {
        Some(code) => {
            out[28..31].copy_from_slice(&encode_fhss(path, code)?);
            out[31] = 0x00;
        }
        None => {
            out[28..31].copy_from_slice(&[0xFF, 0xFF, 0xFF]);
            out[31] = 0xFF;
        }
    }

    let name = encode_gb2312_field(path, &ch.name, NAME_WIDTH)?;
    out[NAME_START..NAME_START + NAME_WIDTH].copy_from_slice(&name);

    Ok(out)
}

fn write_dmr_fields(out: &mut [u8; LEN], dmr: &DmrFields) {
    out[16] = dmr.color_code & 0x0F;
    out[17] = dmr.time_slot.to_nibble();
    out[18..20].copy_from_slice(&dmr.contact_index.to_le_bytes());
    out[20] = dmr.rx_group_index;
    out[21] = dmr.encrypt_key_index & 0x0F;
}

/// Returns `None` for an empty slot (spec.md §4.5: first 4 bytes all
/// `0xFF` or all `0x00`).
pub fn decode(path: &str, bytes: &[u8]) -> Result<Option<Channel>> {
    if bytes.len() != LEN {
        return Err(Error::codec(
            path,
            format!("channel record must be {LEN} bytes, got {}", bytes.len()),
        ));
    }
    if bytes[0..4] == [0xFF; 4] || bytes[0..4] == [0x00; 4] {
        return Ok(None);
    }

    let rx_freq_mhz = decode_frequency([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let tx_freq_mhz = decode_frequency([bytes[4], bytes[5], bytes[6], bytes[7]]);
    let rx_sub_audio = decode_sub_audio([bytes[8], bytes[9]]);
    let tx_sub_audio = decode_sub_audio([bytes[10], bytes[11]]);

    let power = Power::from_nibble(path, bytes[12] & 0x0F)?;
    let bandwidth = Bandwidth::from_nibble(path, bytes[13] & 0x0F)?;
    let scan_add = bytes[13] & 0x10 != 0;

    let (mode, dmr) = if bytes[14] & 0x0F == 1 {
        (ChannelMode::Analog, None)
    } else {
        let time_slot = TimeSlot::from_nibble(path, bytes[17] & 0x0F)?;
        let dmr = DmrFields {
            color_code: bytes[16] & 0x0F,
            time_slot,
            contact_index: u16::from_le_bytes([bytes[18], bytes[19]]),
            rx_group_index: bytes[20],
            encrypt_key_index: bytes[21] & 0x0F,
        };
        if bytes[15] & 0x0F == 1 {
            (ChannelMode::DmrTierII, Some(dmr))
        } else {
            (ChannelMode::DmrTierI, Some(dmr))
        }
    };

    let learn_fhss = bytes[23] & 0x0F != 0;
    let fhss_code = if bytes[31] == 0x00 {
        Some(decode_fhss([bytes[28], bytes[29], bytes[30]]))
    } else {
        None
    };

    let name = decode_gb2312_field(&bytes[NAME_START..NAME_START + NAME_WIDTH]);

    Ok(Some(Channel {
        rx_freq_mhz,
        tx_freq_mhz,
        rx_sub_audio,
        tx_sub_audio,
        power,
        bandwidth,
        scan_add,
        mode,
        dmr,
        learn_fhss,
        fhss_code,
        name,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// spec.md §8 scenario 7: DMR Tier II round-trip.
    #[test]
    fn tier_ii_round_trip() {
        let ch = Channel {
            rx_freq_mhz: 441.0,
            tx_freq_mhz: 446.0,
            rx_sub_audio: SubAudio::Off,
            tx_sub_audio: SubAudio::Off,
            power: Power::High,
            bandwidth: Bandwidth::Wide,
            scan_add: true,
            mode: ChannelMode::DmrTierII,
            dmr: Some(DmrFields {
                color_code: 7,
                time_slot: TimeSlot::Slot2,
                contact_index: 12,
                rx_group_index: 3,
                encrypt_key_index: 0,
            }),
            learn_fhss: false,
            fhss_code: None,
            name: "Repeater".into(),
        };
        let encoded = encode("ch", &ch).unwrap();
        assert_eq!(encoded[14] & 0x0F, 0);
        assert_eq!(encoded[15] & 0x0F, 1);
        let decoded = decode("ch", &encoded).unwrap().unwrap();
        assert_eq!(decoded, ch);
    }

    #[test]
    fn analog_round_trip() {
        let ch = Channel {
            rx_freq_mhz: 145.5,
            tx_freq_mhz: 145.5,
            rx_sub_audio: SubAudio::Ctcss(88.5),
            tx_sub_audio: SubAudio::Off,
            power: Power::Low,
            bandwidth: Bandwidth::Narrow,
            scan_add: false,
            mode: ChannelMode::Analog,
            dmr: None,
            learn_fhss: true,
            fhss_code: Some("1A2B3C".into()),
            name: "Simplex".into(),
        };
        let encoded = encode("ch", &ch).unwrap();
        assert_eq!(encoded[14] & 0x0F, 1);
        let decoded = decode("ch", &encoded).unwrap().unwrap();
        assert_eq!(decoded, ch);
    }

    #[test]
    fn all_ff_and_all_zero_are_empty() {
        assert_eq!(decode("ch", &[0xFF; LEN]).unwrap(), None);
        assert_eq!(decode("ch", &[0x00; LEN]).unwrap(), None);
    }

    #[test]
    fn fhss_code_round_trips_nibble_reversal() {
        let bytes = encode_fhss("f", "1A2B3C").unwrap();
        assert_eq!(decode_fhss(bytes), "1A2B3C");
    }
}
