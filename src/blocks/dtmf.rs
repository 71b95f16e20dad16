//! DTMF block (272 bytes, CMD `0x16`/`0x36`). Layout per SPEC_FULL.md §4.7b.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::field::{decode_digit_string, encode_digit_string};

const LEN: usize = 272;
const ALPHABET: &str = "0123456789ABCD*#";
const CURRENT_ID_WIDTH: usize = 6;
const GROUP_WIDTH: usize = 7;
const GROUP_COUNT: usize = 15;
const GROUPS_START: usize = 16;
const STEPS_MS: [u16; 5] = [50, 100, 150, 200, 250];
/// Documented default for an unprogrammed (`0xFF`) duration/interval nibble,
/// matching `document::default_dtmf`.
const DEFAULT_STEP_MS: u16 = 100;

/// Unrecognized document strings fall back to `Off` (spec.md §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PttId {
    Bot,
    Eot,
    Both,
    #[serde(other)]
    Off,
}

impl PttId {
    /// Decodes the low nibble of the byte. An unprogrammed slot's low
    /// nibble (`0xFF & 0x0F == 0x0F`) and any other value outside the four
    /// documented variants fall back to `Off` (spec.md §4.7: unknown
    /// enumeration values fall back to a documented default).
    fn from_nibble(n: u8) -> Self {
        match n & 0x0F {
            1 => Self::Bot,
            2 => Self::Eot,
            3 => Self::Both,
            _ => Self::Off,
        }
    }

    fn to_nibble(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::Bot => 1,
            Self::Eot => 2,
            Self::Both => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dtmf {
    pub current_id: String,
    pub ptt_id: PttId,
    pub duration_ms: u16,
    pub interval_ms: u16,
    /// Always 15 entries; `None` marks an unused code group slot.
    pub code_groups: Vec<Option<String>>,
}

fn step_to_index(path: &str, field: &str, ms: u16) -> Result<u8> {
    STEPS_MS
        .iter()
        .position(|&s| s == ms)
        .map(|i| i as u8)
        .ok_or_else(|| Error::codec(path, format!("{field} {ms}ms is not one of {STEPS_MS:?}")))
}

/// Low nibble index into `STEPS_MS`; an unprogrammed slot (`0xFF`) or any
/// index past the table falls back to `DEFAULT_STEP_MS` (spec.md §4.7).
fn index_to_step(byte: u8) -> u16 {
    STEPS_MS
        .get((byte & 0x0F) as usize)
        .copied()
        .unwrap_or(DEFAULT_STEP_MS)
}

pub fn encode(path: &str, dtmf: &Dtmf) -> Result<Vec<u8>> {
    if dtmf.code_groups.len() != GROUP_COUNT {
        return Err(Error::codec(
            path,
            format!("codeGroups must have exactly {GROUP_COUNT} entries"),
        ));
    }
    let mut out = vec![0xFFu8; LEN];

    let id_bytes = encode_digit_string(path, &dtmf.current_id, ALPHABET, CURRENT_ID_WIDTH)?;
    out[0..CURRENT_ID_WIDTH].copy_from_slice(&id_bytes);

    out[6] = dtmf.ptt_id.to_nibble();
    out[7] = step_to_index(path, "duration", dtmf.duration_ms)?;
    out[8] = step_to_index(path, "interval", dtmf.interval_ms)?;

    for (i, group) in dtmf.code_groups.iter().enumerate() {
        let start = GROUPS_START + i * GROUP_WIDTH;
        let slot = &mut out[start..start + GROUP_WIDTH];
        match group {
            None => slot.fill(0xFF),
            Some(digits) => {
                let encoded = encode_digit_string(path, digits, ALPHABET, GROUP_WIDTH)?;
                slot.copy_from_slice(&encoded);
            }
        }
    }

    Ok(out)
}

pub fn decode(path: &str, bytes: &[u8]) -> Result<Dtmf> {
    if bytes.len() != LEN {
        return Err(Error::codec(
            path,
            format!("dtmf block must be {LEN} bytes, got {}", bytes.len()),
        ));
    }

    let current_id = decode_digit_string(path, &bytes[0..CURRENT_ID_WIDTH], ALPHABET)?;
    let ptt_id = PttId::from_nibble(bytes[6]);
    let duration_ms = index_to_step(bytes[7]);
    let interval_ms = index_to_step(bytes[8]);

    let mut code_groups = Vec::with_capacity(GROUP_COUNT);
    for i in 0..GROUP_COUNT {
        let start = GROUPS_START + i * GROUP_WIDTH;
        let slot = &bytes[start..start + GROUP_WIDTH];
        if slot[0] == 0xFF {
            code_groups.push(None);
        } else {
            code_groups.push(Some(decode_digit_string(path, slot, ALPHABET)?));
        }
    }

    Ok(Dtmf {
        current_id,
        ptt_id,
        duration_ms,
        interval_ms,
        code_groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dtmf {
        Dtmf {
            current_id: "12345".into(),
            ptt_id: PttId::Both,
            duration_ms: 150,
            interval_ms: 200,
            code_groups: {
                let mut v = vec![None; GROUP_COUNT];
                v[0] = Some("123".into());
                v[14] = Some("ABCDEF".into());
                v
            },
        }
    }

    #[test]
    fn round_trips() {
        let dtmf = sample();
        let encoded = encode("dtmf", &dtmf).unwrap();
        assert_eq!(encoded.len(), LEN);
        let decoded = decode("dtmf", &encoded).unwrap();
        assert_eq!(decoded, dtmf);
    }

    #[test]
    fn all_ff_decodes_to_empty_groups_and_off() {
        let bytes = vec![0xFFu8; LEN];
        let decoded = decode("dtmf", &bytes).unwrap();
        assert!(decoded.code_groups.iter().all(Option::is_none));
        assert_eq!(decoded.current_id, "");
        assert_eq!(decoded.ptt_id, PttId::Off);
        assert_eq!(decoded.duration_ms, DEFAULT_STEP_MS);
        assert_eq!(decoded.interval_ms, DEFAULT_STEP_MS);
    }

    #[test]
    fn rejects_bad_duration() {
        let mut dtmf = sample();
        dtmf.duration_ms = 77;
        assert!(encode("dtmf", &dtmf).is_err());
    }
}
