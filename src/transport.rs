//! L0: raw byte transport over the programming cable's USB-serial port.
//!
//! Opens the port at 115200 8N1, asserts DTR/RTS (the cable uses these
//! lines for power/enable), and exposes `write`/`read_exact`/`read_byte`/
//! `discard_input` as cancellable async operations. A per-byte inactivity
//! timeout bounds `read_exact`; it is deliberately longer than the framing
//! layer's own 1s retry window (spec.md §4.1) so the retry layer, not the
//! transport, decides when to give up.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_serial::SerialPortBuilderExt;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

const BAUD_RATE: u32 = 115_200;
/// Time to let the cable's switching circuitry stabilize after opening the
/// port, before the first byte is sent (spec.md §4.1).
const POWER_STABILIZE_DELAY: Duration = Duration::from_millis(200);
/// Absolute per-`read_exact` inactivity timeout. Longer than the framing
/// layer's 1s retry window on purpose.
const READ_TIMEOUT: Duration = Duration::from_secs(2);

pub struct Transport {
    port: tokio_serial::SerialStream,
}

impl Transport {
    /// Open `path` at 115200 8N1, no parity, no flow control, with DTR and
    /// RTS asserted, then wait for the cable to stabilize.
    pub async fn open(path: &str) -> Result<Self> {
        let mut port = tokio_serial::new(path, BAUD_RATE)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| Error::Transport(format!("failed to open {path}: {e}")))?;

        port.write_data_terminal_ready(true)
            .map_err(|e| Error::Transport(format!("failed to assert DTR: {e}")))?;
        port.write_request_to_send(true)
            .map_err(|e| Error::Transport(format!("failed to assert RTS: {e}")))?;

        tokio::time::sleep(POWER_STABILIZE_DELAY).await;

        Ok(Self { port })
    }

    /// Enqueue all bytes. Cancellable via `cancel`.
    pub async fn write(&mut self, bytes: &[u8], cancel: &CancellationToken) -> Result<()> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::Transport("write cancelled".into())),
            res = self.port.write_all(bytes) => {
                res.map_err(|e| Error::Transport(format!("write failed: {e}")))
            }
        }
    }

    /// Read exactly `n` bytes, or fail with a `Transport` timeout error if
    /// per-byte inactivity exceeds `READ_TIMEOUT`.
    pub async fn read_exact(&mut self, n: usize, cancel: &CancellationToken) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        let mut filled = 0usize;

        while filled < n {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Error::Transport("read cancelled".into())),
                res = tokio::time::timeout(READ_TIMEOUT, self.port.read(&mut buf[filled..])) => {
                    let read = res.map_err(|_| Error::Transport("read timed out".into()))?
                        .map_err(|e| Error::Transport(format!("read failed: {e}")))?;
                    if read == 0 {
                        return Err(Error::Transport("unexpected EOF on serial port".into()));
                    }
                    filled += read;
                }
            }
        }

        Ok(buf)
    }

    /// Convenience over `read_exact(1)`.
    pub async fn read_byte(&mut self, cancel: &CancellationToken) -> Result<u8> {
        Ok(self.read_exact(1, cancel).await?[0])
    }

    /// Empty the OS receive buffer. Invoked before a retransmit.
    pub fn discard_input(&self) -> Result<()> {
        self.port
            .clear(tokio_serial::ClearBuffer::Input)
            .map_err(|e| Error::Transport(format!("failed to flush input: {e}")))
    }
}
