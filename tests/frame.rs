//! Integration-level checks for frame layout (spec.md §4.3/§8).

use rt5d_prog::crc::crc16;
use rt5d_prog::frame::Frame;

#[test]
fn handshake_frame_bytes() {
    let bytes = Frame::new(0x02, 0, b"PROGRAMJC8810DU".to_vec()).to_bytes();
    assert_eq!(&bytes[0..6], &[0xA5, 0x02, 0x00, 0x00, 0x00, 0x0F]);
    assert_eq!(bytes[6], b'P');
    assert_eq!(bytes[20], b'U');
    assert_eq!(bytes.len(), 23);
}

#[test]
fn password_frame_bytes() {
    let bytes = Frame::new(0x05, 0, vec![0xFF; 6]).to_bytes();
    assert_eq!(bytes[1], 0x05);
    assert_eq!(bytes[5], 0x06);
    assert_eq!(bytes[6], 0xFF);
    assert_eq!(bytes.len(), 14);
}

#[test]
fn channel_write_header() {
    let bytes = Frame::new(0x30, 0, vec![0u8; 1024]).to_bytes();
    assert_eq!(&bytes[4..6], &[0x04, 0x00]);
    assert_eq!(bytes.len(), 1032);
}

/// ∀ built frames: length == payload_len + 8; SOF == 0xA5; LEN field is
/// big-endian payload_len; CRC field matches a fresh CRC over [1..5+len].
#[test]
fn built_frame_invariants_hold_for_varied_payloads() {
    for (cmd, seq, len) in [(0x10u8, 0u16, 0usize), (0x13, 79, 800), (0x30, 5, 1024)] {
        let payload = vec![0xAB; len];
        let bytes = Frame::new(cmd, seq, payload.clone()).to_bytes();

        assert_eq!(bytes.len(), len + 8);
        assert_eq!(bytes[0], 0xA5);
        assert_eq!(u16::from_be_bytes([bytes[4], bytes[5]]), len as u16);

        let crc_input = &bytes[1..5 + len];
        let expected = crc16(crc_input);
        let actual = u16::from_be_bytes([bytes[bytes.len() - 2], bytes[bytes.len() - 1]]);
        assert_eq!(actual, expected);
    }
}
