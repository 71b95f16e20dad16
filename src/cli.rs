//! Non-core: CLI command implementations (spec.md §6, SPEC_FULL.md §6a/§6b).
//!
//! `main.rs` only parses arguments and dispatches here; every command's
//! actual behavior — and its exit-code contract — lives in this module so
//! it can be exercised without going through `clap`.

use std::path::Path;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::document::Codeplug;
use crate::error::{file_usage_error, Error, Result};
use crate::session::{self, ProgressObserver};
use crate::transport::Transport;
use crate::{document, self_test, serial_enum};

/// Overall session deadline (spec.md §5): 120s from the first suspension
/// point onward, threaded through every `read_exact`/`write`/restart-delay
/// wait via one `CancellationToken`.
const SESSION_DEADLINE: std::time::Duration = std::time::Duration::from_secs(120);

struct LoggingObserver;

impl ProgressObserver for LoggingObserver {
    fn on_progress(&self, phase: &str, packet_index: usize, total_packets: usize) {
        info!(phase, packet_index, total_packets, "session progress");
    }
}

fn deadline_token() -> (CancellationToken, tokio::task::JoinHandle<()>) {
    let token = CancellationToken::new();
    let child = token.clone();
    let handle = tokio::spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep(SESSION_DEADLINE) => child.cancel(),
            _ = child.cancelled() => {}
        }
    });
    (token, handle)
}

/// `<tool> test` — run the built-in self-test harness; no serial port
/// involved (SPEC_FULL.md §6b).
pub fn run_self_test() -> Result<()> {
    let results = self_test::run_all();
    let mut all_passed = true;
    for result in &results {
        if result.passed {
            println!("PASS  {}", result.name);
        } else {
            println!("FAIL  {}", result.name);
            all_passed = false;
        }
    }
    if all_passed {
        Ok(())
    } else {
        Err(Error::Protocol("one or more self-tests failed".into()))
    }
}

/// `<tool> ports` — list serial port names, sorted.
pub fn run_ports() -> Result<()> {
    let ports = serial_enum::list_ports()?;
    for port in ports {
        println!("{port}");
    }
    Ok(())
}

/// `<tool> info <port>` — handshake + password + version read + end;
/// print the version block.
pub async fn run_info(port: &str) -> Result<()> {
    let (cancel, deadline) = deadline_token();
    let mut transport = Transport::open(port).await?;

    let payloads = read_version_only(&mut transport, &cancel).await;
    deadline.abort();

    let version = payloads?;
    println!("version: {}", hex_preview(&version));
    Ok(())
}

/// The `info` command doesn't need the full twelve-step session — steps
/// 1–3 and step 12 are enough to read the version block and leave the
/// radio's session state machine cleanly closed.
async fn read_version_only(
    transport: &mut Transport,
    cancel: &CancellationToken,
) -> Result<Vec<u8>> {
    use crate::frame::send_receive;

    const CMD_HANDSHAKE: u8 = 0x02;
    const CMD_PASSWORD: u8 = 0x05;
    const CMD_VERSION: u8 = 0x46;
    const CMD_END_SESSION: u8 = 0x01;

    send_receive(transport, CMD_HANDSHAKE, 0, b"PROGRAMJC8810DU", cancel).await?;
    send_receive(transport, CMD_PASSWORD, 0, &[0xFF; 6], cancel).await?;
    let version = send_receive(transport, CMD_VERSION, 0, &[], cancel).await?.payload;
    send_receive(transport, CMD_END_SESSION, 0, &[0x00, 0x00], cancel).await?;
    Ok(version)
}

fn hex_preview(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02X}")).collect::<Vec<_>>().join(" ")
}

/// `<tool> read <port> [outfile]` — run a full read session and write the
/// document to `outfile` (default `rt5d_config.json`).
pub async fn run_read(port: &str, outfile: &Path) -> Result<()> {
    let (cancel, deadline) = deadline_token();
    let mut transport = Transport::open(port).await?;
    let observer = LoggingObserver;

    let result = session::read_session(&mut transport, &observer, &cancel).await;
    deadline.abort();
    let payloads = result?;

    let codeplug = document::from_session(&payloads)?;
    write_document(outfile, &codeplug)?;
    info!(path = %outfile.display(), "wrote codeplug document");
    Ok(())
}

/// `<tool> write <port> <infile> [--basic-info]` — parse the document and
/// run a full write session, then a verify read.
pub async fn run_write(port: &str, infile: &Path, write_basic_info: bool) -> Result<()> {
    let codeplug = read_document(infile)?;
    let payloads = document::to_session(&codeplug)?;

    let (cancel, deadline) = deadline_token();
    let mut transport = Transport::open(port).await?;
    let observer = LoggingObserver;

    if !write_basic_info {
        warn!("writing without --basic-info: the radio's model/basic info block is left untouched");
    }

    let result = session::write_session(&mut transport, &payloads, write_basic_info, &observer, &cancel).await;
    deadline.abort();
    result?;

    info!("write session complete; verify re-read succeeded");
    Ok(())
}

fn write_document(path: &Path, codeplug: &Codeplug) -> Result<()> {
    let json = serde_json::to_string_pretty(codeplug)?;
    std::fs::write(path, json).map_err(|e| file_usage_error(&path.to_path_buf(), e))
}

fn read_document(path: &Path) -> Result<Codeplug> {
    let text = std::fs::read_to_string(path).map_err(|e| file_usage_error(&path.to_path_buf(), e))?;
    Ok(serde_json::from_str(&text)?)
}
