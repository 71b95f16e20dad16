//! Shared GB2312 text codec.
//!
//! The radio's name fields use GB2312, a subset of the GBK encoding family.
//! `encoding_rs` does not ship a GB2312-specific table (GB2312 has no
//! independent registration there), but its GBK encoding is a superset that
//! agrees with GB2312 on every codepoint GB2312 defines, which is exactly
//! what the radio's firmware itself uses in practice. There is no example
//! in this codebase's corpus that needs a CJK text codec, so this crate is
//! chosen directly: it is the de facto standard, actively maintained
//! encoding crate in the Rust ecosystem (see DESIGN.md).

use crate::error::{Error, Result};

/// Encode `s` as GB2312/GBK bytes. Fails if `s` contains a character the
/// encoding cannot represent.
pub fn encode(path: &str, s: &str) -> Result<Vec<u8>> {
    let (bytes, _, had_errors) = encoding_rs::GBK.encode(s);
    if had_errors {
        return Err(Error::codec(
            path,
            format!("{s:?} contains characters not representable in GB2312"),
        ));
    }
    Ok(bytes.into_owned())
}

/// Decode GB2312/GBK bytes to a `String`. Unrepresentable sequences are
/// replaced per `encoding_rs`'s standard REPLACEMENT behavior rather than
/// failing, since decoding runs on bytes the radio itself produced.
pub fn decode(bytes: &[u8]) -> String {
    let (text, _, _had_errors) = encoding_rs::GBK.decode(bytes);
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_round_trips() {
        let encoded = encode("test", "Chan 1").unwrap();
        assert_eq!(decode(&encoded), "Chan 1");
    }

    #[test]
    fn chinese_round_trips() {
        let encoded = encode("test", "中文").unwrap();
        assert_eq!(decode(&encoded), "中文");
    }
}
