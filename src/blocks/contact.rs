//! Contact record (16 bytes, one slot of the address book block, CMD
//! `0x13`/`0x33`). Layout per spec.md §4.5.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::field::{decode_dmr_id, decode_gb2312_field, encode_dmr_id, encode_gb2312_field};

pub const LEN: usize = 16;
const NAME_START: usize = 5;
const NAME_WIDTH: usize = 10;

/// Unrecognized document strings fall back to `Group` (spec.md §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallType {
    Private,
    AllCall,
    #[serde(other)]
    Group,
}

impl CallType {
    fn from_nibble(path: &str, n: u8) -> Result<Self> {
        match n {
            0 => Ok(Self::Group),
            1 => Ok(Self::Private),
            2 => Ok(Self::AllCall),
            other => Err(Error::codec(path, format!("{other} is not a valid callType"))),
        }
    }

    fn to_nibble(self) -> u8 {
        match self {
            Self::Group => 0,
            Self::Private => 1,
            Self::AllCall => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub call_type: CallType,
    pub call_id: u32,
    pub name: String,
}

pub fn encode(path: &str, contact: &Contact) -> Result<[u8; LEN]> {
    let mut out = [0xFFu8; LEN];
    out[0] = contact.call_type.to_nibble();
    out[1] = 0x00;
    out[2..5].copy_from_slice(&encode_dmr_id(path, contact.call_id)?);
    let name = encode_gb2312_field(path, &contact.name, NAME_WIDTH)?;
    out[NAME_START..NAME_START + NAME_WIDTH].copy_from_slice(&name);
    Ok(out)
}

/// Returns `None` for an empty slot.
pub fn decode(path: &str, bytes: &[u8]) -> Result<Option<Contact>> {
    if bytes.len() != LEN {
        return Err(Error::codec(
            path,
            format!("contact record must be {LEN} bytes, got {}", bytes.len()),
        ));
    }
    if bytes[0] == 0xFF || bytes[1] == 0xFF || bytes[5] == 0xFF {
        return Ok(None);
    }
    let call_type = CallType::from_nibble(path, bytes[0] & 0x0F)?;
    let call_id = decode_dmr_id([bytes[2], bytes[3], bytes[4]]);
    let name = decode_gb2312_field(&bytes[NAME_START..NAME_START + NAME_WIDTH]);
    Ok(Some(Contact {
        call_type,
        call_id,
        name,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let contact = Contact {
            call_type: CallType::Group,
            call_id: 3021234,
            name: "Local TG".into(),
        };
        let encoded = encode("c", &contact).unwrap();
        assert_eq!(decode("c", &encoded).unwrap(), Some(contact));
    }

    #[test]
    fn all_ff_is_empty() {
        assert_eq!(decode("c", &[0xFF; LEN]).unwrap(), None);
    }

    #[test]
    fn empty_sentinel_checks_bytes_0_1_5() {
        let mut bytes = [0x00u8; LEN];
        bytes[5] = 0xFF;
        assert_eq!(decode("c", &bytes).unwrap(), None);
    }
}
