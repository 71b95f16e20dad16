//! Rx group entry (128 bytes, one slot of the rx group list block, CMD
//! `0x14`/`0x34`). Layout per spec.md §4.5.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::field::{decode_dmr_id, decode_gb2312_field, encode_dmr_id, encode_gb2312_field};

pub const LEN: usize = 128;
const MAX_MEMBERS: usize = 32;
const NAME_START: usize = 96;
const NAME_WIDTH: usize = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RxGroup {
    pub name: String,
    /// Up to 32 DMR IDs, in order.
    pub members: Vec<u32>,
}

pub fn encode(path: &str, group: &RxGroup) -> Result<[u8; LEN]> {
    if group.members.len() > MAX_MEMBERS {
        return Err(Error::codec(
            path,
            format!("{} members exceeds the {MAX_MEMBERS}-member limit", group.members.len()),
        ));
    }
    let mut out = [0xFFu8; LEN];
    for (i, &id) in group.members.iter().enumerate() {
        let start = i * 3;
        out[start..start + 3].copy_from_slice(&encode_dmr_id(path, id)?);
    }
    // A terminator of `00 00 00` disambiguates the end of the member list
    // from `0xFF`-padding, since `FF FF FF` is itself a valid 24-bit ID.
    if group.members.len() < MAX_MEMBERS {
        let start = group.members.len() * 3;
        out[start..start + 3].copy_from_slice(&[0x00, 0x00, 0x00]);
    }
    let name = encode_gb2312_field(path, &group.name, NAME_WIDTH)?;
    out[NAME_START..NAME_START + NAME_WIDTH].copy_from_slice(&name);
    Ok(out)
}

/// Returns `None` for an empty slot.
pub fn decode(path: &str, bytes: &[u8]) -> Result<Option<RxGroup>> {
    if bytes.len() != LEN {
        return Err(Error::codec(
            path,
            format!("rx group entry must be {LEN} bytes, got {}", bytes.len()),
        ));
    }
    if bytes[96] == 0xFF {
        return Ok(None);
    }
    let mut members = Vec::new();
    for i in 0..MAX_MEMBERS {
        let start = i * 3;
        let triple = &bytes[start..start + 3];
        if triple == [0x00, 0x00, 0x00] {
            break;
        }
        members.push(decode_dmr_id([triple[0], triple[1], triple[2]]));
    }
    let name = decode_gb2312_field(&bytes[NAME_START..NAME_START + NAME_WIDTH]);
    Ok(Some(RxGroup { name, members }))
}
