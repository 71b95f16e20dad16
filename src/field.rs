//! L4: field-level codecs shared by every block (spec.md §4.5).
//!
//! Frequency, DMR ID, sub-audio, and the two string primitives (GB2312
//! fixed-width fields and nibble-indexed digit strings) each have exactly
//! one encode/decode pair here; block codecs in `blocks/` compose them.

use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

use crate::dcs;
use crate::error::{Error, Result};
use crate::gb2312;

/// Wire units: little-endian u32, tens of Hz. Document units: decimal MHz.
const FREQ_SCALE: f64 = 100_000.0;

/// Encode a frequency given in MHz to its 4-byte little-endian wire form
/// (spec.md §4.5: `round(MHz × 100000)`, tenths of kHz).
pub fn encode_frequency(path: &str, mhz: f64) -> Result<[u8; 4]> {
    if !mhz.is_finite() || mhz < 0.0 {
        return Err(Error::codec(path, format!("{mhz} is not a valid frequency")));
    }
    let raw = (mhz * FREQ_SCALE).round();
    if raw > u32::MAX as f64 {
        return Err(Error::codec(path, format!("{mhz} MHz is out of range")));
    }
    Ok((raw as u32).to_le_bytes())
}

/// Decode the 4-byte little-endian wire frequency to MHz.
pub fn decode_frequency(bytes: [u8; 4]) -> f64 {
    u32::from_le_bytes(bytes) as f64 / FREQ_SCALE
}

/// Encode a DMR ID (1..=16,777,215) to its 3-byte big-endian wire form.
pub fn encode_dmr_id(path: &str, id: u32) -> Result<[u8; 3]> {
    if id == 0 || id > 0x00FF_FFFF {
        return Err(Error::codec(path, format!("{id} is not a valid 24-bit DMR ID")));
    }
    let b = id.to_be_bytes();
    Ok([b[1], b[2], b[3]])
}

/// Decode a 3-byte big-endian wire DMR ID.
pub fn decode_dmr_id(bytes: [u8; 3]) -> u32 {
    u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]])
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubAudio {
    Off,
    Ctcss(f64),
    Dcs { code: String, inverted: bool },
}

impl SubAudio {
    /// Document-facing text: `"OFF"`, `"CTCSS 88.5"`, or `"D023N"`/`"D023I"`
    /// (spec.md §4.7).
    pub fn to_document_string(&self) -> String {
        match self {
            SubAudio::Off => "OFF".to_string(),
            SubAudio::Ctcss(hz) => format!("CTCSS {hz:.1}"),
            SubAudio::Dcs { code, inverted } => dcs::format_name(code, *inverted),
        }
    }

    pub fn parse_document_string(path: &str, s: &str) -> Result<Self> {
        if s == "OFF" {
            return Ok(SubAudio::Off);
        }
        if let Some(rest) = s.strip_prefix("CTCSS ") {
            let hz: f64 = rest
                .parse()
                .map_err(|_| Error::codec(path, format!("{s:?} is not a valid CTCSS tone")))?;
            return Ok(SubAudio::Ctcss(hz));
        }
        let (code, inverted) = dcs::parse_name(path, s)?;
        Ok(SubAudio::Dcs { code, inverted })
    }
}

impl Serialize for SubAudio {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_document_string())
    }
}

impl<'de> Deserialize<'de> for SubAudio {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        SubAudio::parse_document_string("subAudio", &s).map_err(D::Error::custom)
    }
}

/// Frequency fields serialize as decimal strings with six fraction digits
/// (spec.md §4.7, e.g. `"438.500000"`), via `#[serde(with = "mhz_string")]`.
pub mod mhz_string {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(mhz: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{mhz:.6}"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<f64, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| D::Error::custom(format!("{s:?} is not a valid frequency")))
    }
}

/// Encode sub-audio to its 2-byte wire form (spec.md §4.5).
pub fn encode_sub_audio(path: &str, sub: &SubAudio) -> Result<[u8; 2]> {
    match sub {
        SubAudio::Off => Ok([0x00, 0x00]),
        SubAudio::Dcs { code, inverted } => {
            let idx = dcs::table_index(code, *inverted)
                .ok_or_else(|| Error::codec(path, format!("unknown DCS code {code}")))?;
            Ok([idx + 1, 0x00])
        }
        SubAudio::Ctcss(hz) => {
            if !hz.is_finite() || *hz < 0.0 {
                return Err(Error::codec(path, format!("{hz} is not a valid CTCSS tone")));
            }
            let raw = (*hz * 10.0).round();
            if raw > u16::MAX as f64 {
                return Err(Error::codec(path, format!("{hz} Hz is out of range")));
            }
            Ok((raw as u16).to_le_bytes())
        }
    }
}

/// Decode sub-audio from its 2-byte wire form. DCS interpretation wins over
/// CTCSS whenever `byte1 == 0` and `byte0` falls in `1..=210`.
pub fn decode_sub_audio(bytes: [u8; 2]) -> SubAudio {
    if bytes[1] == 0 {
        if bytes[0] == 0 {
            return SubAudio::Off;
        }
        if (1..=210).contains(&bytes[0]) {
            let idx = bytes[0] - 1;
            if let Some((code, inverted)) = dcs::from_table_index(idx) {
                return SubAudio::Dcs {
                    code: code.to_string(),
                    inverted,
                };
            }
        }
    }
    let raw = u16::from_le_bytes(bytes);
    SubAudio::Ctcss(raw as f64 / 10.0)
}

/// Encode `s` as a fixed-width GB2312 field of exactly `width` bytes:
/// the encoded bytes, then a single `0x00` terminator if space remains,
/// then `0xFF` padding for the rest (spec.md §3/§4.5).
pub fn encode_gb2312_field(path: &str, s: &str, width: usize) -> Result<Vec<u8>> {
    let bytes = gb2312::encode(path, s)?;
    if bytes.len() > width {
        return Err(Error::codec(
            path,
            format!("{s:?} encodes to {} bytes, field width is {width}", bytes.len()),
        ));
    }
    let mut out = vec![0xFFu8; width];
    out[..bytes.len()].copy_from_slice(&bytes);
    if bytes.len() < width {
        out[bytes.len()] = 0x00;
    }
    Ok(out)
}

/// Decode a GB2312 field: bytes up to the first `0x00` or `0xFF`.
pub fn decode_gb2312_field(bytes: &[u8]) -> String {
    let end = bytes
        .iter()
        .position(|&b| b == 0x00 || b == 0xFF)
        .unwrap_or(bytes.len());
    gb2312::decode(&bytes[..end])
}

/// Encode `s` as a nibble-indexed digit string of exactly `width` bytes:
/// one byte per character (the character's position in `alphabet`), then
/// `0xFF` for every remaining byte, which also serves as the terminator
/// (spec.md §4.5).
pub fn encode_digit_string(path: &str, s: &str, alphabet: &str, width: usize) -> Result<Vec<u8>> {
    if s.len() > width {
        return Err(Error::codec(
            path,
            format!("{s:?} is longer than the {width}-byte field"),
        ));
    }
    let mut out = vec![0xFFu8; width];
    for (i, c) in s.chars().enumerate() {
        let idx = alphabet
            .find(c)
            .ok_or_else(|| Error::codec(path, format!("{c:?} is not in alphabet {alphabet:?}")))?;
        out[i] = idx as u8;
    }
    Ok(out)
}

/// Decode a nibble-indexed digit string: bytes up to the first `0xFF`.
pub fn decode_digit_string(path: &str, bytes: &[u8], alphabet: &str) -> Result<String> {
    let mut out = String::new();
    for &b in bytes {
        if b == 0xFF {
            break;
        }
        let c = alphabet
            .as_bytes()
            .get(b as usize)
            .ok_or_else(|| Error::codec(path, format!("digit index {b} is out of range")))?;
        out.push(*c as char);
    }
    Ok(out)
}
