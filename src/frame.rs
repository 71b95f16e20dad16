//! L2: frame layout and the send/receive retry state machine.
//!
//! Frame layout (8 + N bytes total):
//!
//! ```text
//! [0]         SOF  = 0xA5
//! [1]         CMD
//! [2..3]      SEQ      big-endian u16
//! [4..5]      LEN = N  big-endian u16
//! [6..6+N-1]  PAYLOAD
//! [6+N..+1]   CRC-16   big-endian, over bytes [1..5+N]
//! ```

use tokio_util::sync::CancellationToken;

use crate::crc::crc16;
use crate::error::{Error, Result};
use crate::transport::Transport;

/// Start-of-frame sentinel.
pub const SOF: u8 = 0xA5;
/// Negative-acknowledgement command byte. Dropped silently by the retry
/// loop; it carries no useful information but does not constitute success.
pub const NAK_CMD: u8 = 0xEE;

const RESPONSE_WINDOW: std::time::Duration = std::time::Duration::from_millis(1000);
/// 3 retries, 4 total attempts.
const MAX_ATTEMPTS: u32 = 4;
/// LEN is a 2-byte field; this is its structural ceiling (spec.md §4.3
/// allows implementations to cap at 65535, which a u16 already enforces).
const MAX_PAYLOAD_LEN: usize = 65535;

#[derive(Debug, Clone)]
pub struct Frame {
    pub cmd: u8,
    pub seq: u16,
    pub payload: Vec<u8>,
}

impl Frame {
    pub fn new(cmd: u8, seq: u16, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            cmd,
            seq,
            payload: payload.into(),
        }
    }

    /// Serialize to the exact wire bytes, including SOF and trailing CRC.
    pub fn to_bytes(&self) -> Vec<u8> {
        let len = self.payload.len() as u16;
        let mut body = Vec::with_capacity(5 + self.payload.len());
        body.push(self.cmd);
        body.extend_from_slice(&self.seq.to_be_bytes());
        body.extend_from_slice(&len.to_be_bytes());
        body.extend_from_slice(&self.payload);

        let crc = crc16(&body);

        let mut out = Vec::with_capacity(1 + body.len() + 2);
        out.push(SOF);
        out.extend_from_slice(&body);
        out.extend_from_slice(&crc.to_be_bytes());
        out
    }
}

enum RecvError {
    Timeout,
    Crc,
    Malformed,
    Other(Error),
}

impl From<Error> for RecvError {
    fn from(e: Error) -> Self {
        RecvError::Other(e)
    }
}

/// S1 scan-for-SOF / S2 header / S3 body, run once. Does not interpret NAK;
/// that's the caller's job, since a NAK still counts as "no timeout this
/// attempt."
async fn read_one_frame(
    transport: &mut Transport,
    cancel: &CancellationToken,
) -> std::result::Result<Frame, RecvError> {
    // S1: Scan-for-SOF.
    loop {
        let byte = transport.read_byte(cancel).await?;
        if byte == SOF {
            break;
        }
    }

    // S2: Header — CMD, SEQ_hi, SEQ_lo, LEN_hi, LEN_lo.
    let header = transport.read_exact(5, cancel).await?;
    let cmd = header[0];
    let seq = u16::from_be_bytes([header[1], header[2]]);
    let len = u16::from_be_bytes([header[3], header[4]]) as usize;

    if len > MAX_PAYLOAD_LEN {
        return Err(RecvError::Malformed);
    }

    // S3: Body — LEN + 2 (payload, then CRC).
    let body = transport.read_exact(len + 2, cancel).await?;
    let payload = body[..len].to_vec();
    let crc_received = u16::from_be_bytes([body[len], body[len + 1]]);

    let mut crc_input = Vec::with_capacity(5 + len);
    crc_input.push(cmd);
    crc_input.extend_from_slice(&header[1..5]);
    crc_input.extend_from_slice(&payload);

    if crc16(&crc_input) != crc_received {
        return Err(RecvError::Crc);
    }

    Ok(Frame { cmd, seq, payload })
}

/// Wait up to `RESPONSE_WINDOW` for a non-NAK frame, dropping any NAK frames
/// observed within the window without resetting the window.
async fn wait_for_response(
    transport: &mut Transport,
    cancel: &CancellationToken,
) -> std::result::Result<Frame, RecvError> {
    let fut = async {
        loop {
            let frame = read_one_frame(transport, cancel).await?;
            if frame.cmd == NAK_CMD {
                continue;
            }
            return Ok(frame);
        }
    };

    match tokio::time::timeout(RESPONSE_WINDOW, fut).await {
        Ok(result) => result,
        Err(_) => Err(RecvError::Timeout),
    }
}

/// Build, transmit, and await a response to one request, with the framing
/// layer's retry/timeout policy (spec.md §4.3):
///
/// 1. Build and transmit the frame.
/// 2. Wait up to 1000ms. NAK frames are dropped without resetting the clock.
/// 3. On timeout: flush input, retransmit. Up to 3 retries (4 attempts).
/// 4. On CRC mismatch: fail immediately, no retry.
pub async fn send_receive(
    transport: &mut Transport,
    cmd: u8,
    seq: u16,
    payload: &[u8],
    cancel: &CancellationToken,
) -> Result<Frame> {
    let request = Frame::new(cmd, seq, payload.to_vec()).to_bytes();

    for attempt in 0..MAX_ATTEMPTS {
        transport.write(&request, cancel).await?;

        match wait_for_response(transport, cancel).await {
            Ok(frame) => return Ok(frame),
            Err(RecvError::Crc) => {
                return Err(Error::Protocol("CRC mismatch in response frame".into()));
            }
            Err(RecvError::Malformed) => {
                return Err(Error::Protocol("malformed length in response frame".into()));
            }
            Err(RecvError::Other(e)) => return Err(e),
            Err(RecvError::Timeout) => {
                if attempt + 1 == MAX_ATTEMPTS {
                    return Err(Error::Protocol(format!(
                        "retry exhausted after {MAX_ATTEMPTS} attempts (cmd=0x{cmd:02X} seq={seq})"
                    )));
                }
                transport.discard_input()?;
            }
        }
    }

    unreachable!("loop either returns or errors on its final attempt")
}
