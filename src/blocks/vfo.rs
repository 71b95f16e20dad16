//! VFO block (128 bytes = two 64-byte banks, CMD `0x11`/`0x31`). Shares
//! the channel record's field layout; differences are documented in
//! SPEC_FULL.md §4.5a: a `step` enum replaces `learnFhss`, there is no
//! scan-add bit, and there is no FHSS region.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::field::{
    decode_frequency, decode_gb2312_field, decode_sub_audio, encode_frequency,
    encode_gb2312_field, encode_sub_audio, SubAudio,
};

pub const LEN: usize = 128;
const BANK_LEN: usize = 64;
const NAME_START: usize = 32;
const NAME_WIDTH: usize = 12;

const BANK_A_DEFAULT_MHZ: f64 = 136.125;
const BANK_B_DEFAULT_MHZ: f64 = 400.125;

const STEPS_KHZ: [f64; 8] = [2.5, 5.0, 6.25, 10.0, 12.5, 20.0, 25.0, 50.0];

/// Unrecognized document strings fall back to `Mid` (spec.md §4.7).
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

fn step_from_khz(path: &str, khz: f64) -> Result<u8> {
    STEPS_KHZ
        .iter()
        .position(|&s| (s - khz).abs() < 1e-9)
        .map(|i| i as u8)
        .ok_or_else(|| Error::codec(path, format!("{khz} kHz is not a valid VFO step")))
}

fn step_to_khz(path: &str, index: u8) -> Result<f64> {
    STEPS_KHZ
        .get(index as usize)
        .copied()
        .ok_or_else(|| Error::codec(path, format!("step index {index} out of range")))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VfoBank {
    #[serde(with = "crate::field::mhz_string")]
    pub rx_freq_mhz: f64,
    #[serde(with = "crate::field::mhz_string")]
    pub tx_freq_mhz: f64,
    pub rx_sub_audio: SubAudio,
    pub tx_sub_audio: SubAudio,
    pub power: Power,
    pub bandwidth: Bandwidth,
    pub step_khz: f64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vfo {
    pub bank_a: VfoBank,
    pub bank_b: VfoBank,
}

fn encode_bank(path: &str, bank: &VfoBank) -> Result<[u8; BANK_LEN]> {
    let mut out = [0xFFu8; BANK_LEN];
    out[0..4].copy_from_slice(&encode_frequency(path, bank.rx_freq_mhz)?);
    out[4..8].copy_from_slice(&encode_frequency(path, bank.tx_freq_mhz)?);
    out[8..10].copy_from_slice(&encode_sub_audio(path, &bank.rx_sub_audio)?);
    out[10..12].copy_from_slice(&encode_sub_audio(path, &bank.tx_sub_audio)?);
    out[12] = bank.power.to_nibble();
    out[13] = bank.bandwidth.to_nibble();
    out[23] = step_from_khz(path, bank.step_khz)?;
    let name = encode_gb2312_field(path, &bank.name, NAME_WIDTH)?;
    out[NAME_START..NAME_START + NAME_WIDTH].copy_from_slice(&name);
    Ok(out)
}

fn decode_bank(path: &str, bytes: &[u8], default_mhz: f64) -> Result<VfoBank> {
    let substitute = |raw: [u8; 4]| {
        if raw == [0x00; 4] || raw == [0xFF; 4] {
            default_mhz
        } else {
            decode_frequency(raw)
        }
    };

    let rx_freq_mhz = substitute([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let tx_freq_mhz = substitute([bytes[4], bytes[5], bytes[6], bytes[7]]);
    let rx_sub_audio = decode_sub_audio([bytes[8], bytes[9]]);
    let tx_sub_audio = decode_sub_audio([bytes[10], bytes[11]]);
    let power = Power::from_nibble(path, bytes[12] & 0x0F)?;
    let bandwidth = Bandwidth::from_nibble(path, bytes[13] & 0x0F)?;
    let step_khz = step_to_khz(path, bytes[23] & 0x0F)?;
    let name = decode_gb2312_field(&bytes[NAME_START..NAME_START + NAME_WIDTH]);

    Ok(VfoBank {
        rx_freq_mhz,
        tx_freq_mhz,
        rx_sub_audio,
        tx_sub_audio,
        power,
        bandwidth,
        step_khz,
        name,
    })
}

pub fn encode(path: &str, vfo: &Vfo) -> Result<[u8; LEN]> {
    let mut out = [0xFFu8; LEN];
    out[0..BANK_LEN].copy_from_slice(&encode_bank(path, &vfo.bank_a)?);
    out[BANK_LEN..LEN].copy_from_slice(&encode_bank(path, &vfo.bank_b)?);
    Ok(out)
}

pub fn decode(path: &str, bytes: &[u8]) -> Result<Vfo> {
    if bytes.len() != LEN {
        return Err(Error::codec(
            path,
            format!("vfo block must be {LEN} bytes, got {}", bytes.len()),
        ));
    }
    let bank_a = decode_bank(path, &bytes[0..BANK_LEN], BANK_A_DEFAULT_MHZ)?;
    let bank_b = decode_bank(path, &bytes[BANK_LEN..LEN], BANK_B_DEFAULT_MHZ)?;
    Ok(Vfo { bank_a, bank_b })
}
