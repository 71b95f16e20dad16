//! Basic info block (64 bytes, CMD `0x19`/`0x39`). Layout per spec.md §4.5.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::field::{decode_gb2312_field, encode_gb2312_field};

pub const LEN: usize = 64;
const MODEL_NAME_START: usize = 8;
const MODEL_NAME_WIDTH: usize = 12;
const MODEL_ID_START: usize = 20;
const MODEL_ID_WIDTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadioInfo {
    pub model_name: String,
    /// Must fit in 8 ASCII digits.
    pub model_id: u32,
}

pub fn encode(path: &str, info: &RadioInfo) -> Result<[u8; LEN]> {
    let mut out = [0xFFu8; LEN];

    let name = encode_gb2312_field(path, &info.model_name, MODEL_NAME_WIDTH)?;
    out[MODEL_NAME_START..MODEL_NAME_START + MODEL_NAME_WIDTH].copy_from_slice(&name);

    let id_str = format!("{:08}", info.model_id);
    if id_str.len() > MODEL_ID_WIDTH {
        return Err(Error::codec(
            path,
            format!("modelId {} does not fit in {MODEL_ID_WIDTH} ASCII digits", info.model_id),
        ));
    }
    out[MODEL_ID_START..MODEL_ID_START + MODEL_ID_WIDTH].copy_from_slice(id_str.as_bytes());

    Ok(out)
}

pub fn decode(path: &str, bytes: &[u8]) -> Result<RadioInfo> {
    if bytes.len() != LEN {
        return Err(Error::codec(
            path,
            format!("basic info block must be {LEN} bytes, got {}", bytes.len()),
        ));
    }

    let model_name = decode_gb2312_field(&bytes[MODEL_NAME_START..MODEL_NAME_START + MODEL_NAME_WIDTH]);

    let id_bytes = &bytes[MODEL_ID_START..MODEL_ID_START + MODEL_ID_WIDTH];
    let id_str = std::str::from_utf8(id_bytes)
        .map_err(|_| Error::codec(path, "modelId is not ASCII"))?;
    let model_id = id_str
        .parse()
        .map_err(|_| Error::codec(path, format!("{id_str:?} is not a valid modelId")))?;

    Ok(RadioInfo { model_name, model_id })
}
