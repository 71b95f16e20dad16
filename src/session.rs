//! L3: the twelve-step ordered session driver.
//!
//! Reordering these steps is illegal — the radio's own state machine
//! requires exactly this progression (spec.md §4.4). This module only
//! pushes/pulls raw bytes; the binary codec layer (`blocks`) and document
//! binding (`document`) give those bytes meaning.

use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::frame::send_receive;
use crate::transport::Transport;

const HANDSHAKE_MAGIC: &[u8] = b"PROGRAMJC8810DU";
const DEFAULT_PASSWORD: [u8; 6] = [0xFF; 6];

const CMD_HANDSHAKE: u8 = 0x02;
const CMD_PASSWORD: u8 = 0x05;
const CMD_VERSION: u8 = 0x46;
const CMD_DTMF_READ: u8 = 0x16;
const CMD_DTMF_WRITE: u8 = 0x36;
const CMD_KEYS_READ: u8 = 0x15;
const CMD_KEYS_WRITE: u8 = 0x35;
const CMD_CONTACTS_READ: u8 = 0x13;
const CMD_CONTACTS_WRITE: u8 = 0x33;
const CMD_RXGROUPS_READ: u8 = 0x14;
const CMD_RXGROUPS_WRITE: u8 = 0x34;
const CMD_CHANNELS_READ: u8 = 0x10;
const CMD_CHANNELS_WRITE: u8 = 0x30;
const CMD_VFO_READ: u8 = 0x11;
const CMD_VFO_WRITE: u8 = 0x31;
const CMD_OPTIONS_READ: u8 = 0x12;
const CMD_OPTIONS_WRITE: u8 = 0x32;
const CMD_BASIC_INFO_READ: u8 = 0x19;
const CMD_BASIC_INFO_WRITE: u8 = 0x39;
const CMD_END_SESSION: u8 = 0x01;

const VERSION_LEN: usize = 128;
const DTMF_LEN: usize = 272;
const KEYS_LEN: usize = 264;
const CONTACTS_PACKETS: u16 = 80;
const CONTACTS_PACKET_LEN: usize = 800;
const RXGROUPS_PACKETS: u16 = 4;
const RXGROUPS_PACKET_LEN: usize = 1024;
const CHANNELS_PACKETS: u16 = 64;
const CHANNELS_PACKET_LEN: usize = 1024;
const VFO_LEN: usize = 128;
const OPTIONS_LEN: usize = 64;
const BASIC_INFO_LEN: usize = 64;

/// Time to wait for the radio to restart after a write session closes,
/// before performing the verify re-read (spec.md §4.4).
pub const POST_WRITE_RESTART_DELAY: std::time::Duration = std::time::Duration::from_secs(10);

/// Raw bytes of all ten codeplug blocks, sized exactly as spec.md §6
/// documents. The hand-off between the wire layer and the codec layer.
#[derive(Debug, Clone)]
pub struct SessionPayloads {
    pub version: Vec<u8>,
    pub dtmf: Vec<u8>,
    pub keys: Vec<u8>,
    pub contacts: Vec<Vec<u8>>,
    pub rx_groups: Vec<Vec<u8>>,
    pub channels: Vec<Vec<u8>>,
    pub vfo: Vec<u8>,
    pub options: Vec<u8>,
    pub basic_info: Vec<u8>,
}

impl SessionPayloads {
    /// All-`0xFF` payloads of the documented sizes, suitable as a write
    /// skeleton before codec output overwrites each field.
    pub fn empty() -> Self {
        Self {
            version: vec![0xFF; VERSION_LEN],
            dtmf: vec![0xFF; DTMF_LEN],
            keys: vec![0xFF; KEYS_LEN],
            contacts: vec![vec![0xFF; CONTACTS_PACKET_LEN]; CONTACTS_PACKETS as usize],
            rx_groups: vec![vec![0xFF; RXGROUPS_PACKET_LEN]; RXGROUPS_PACKETS as usize],
            channels: vec![vec![0xFF; CHANNELS_PACKET_LEN]; CHANNELS_PACKETS as usize],
            vfo: vec![0xFF; VFO_LEN],
            options: vec![0xFF; OPTIONS_LEN],
            basic_info: vec![0xFF; BASIC_INFO_LEN],
        }
    }
}

/// `{phase, packet_index, total_packets}` reported to an optional observer
/// as the session progresses (spec.md §4.4).
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, phase: &str, packet_index: usize, total_packets: usize);
}

/// An observer that does nothing; the default when the caller supplies none.
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn on_progress(&self, _phase: &str, _packet_index: usize, _total_packets: usize) {}
}

fn expect_len(path: &str, frame_payload: &[u8], expected: usize) -> Result<()> {
    if frame_payload.len() != expected {
        return Err(Error::Protocol(format!(
            "{path}: expected {expected} byte response, got {}",
            frame_payload.len()
        )));
    }
    Ok(())
}

async fn handshake(transport: &mut Transport, cancel: &CancellationToken) -> Result<()> {
    send_receive(transport, CMD_HANDSHAKE, 0, HANDSHAKE_MAGIC, cancel).await?;
    Ok(())
}

async fn password(transport: &mut Transport, cancel: &CancellationToken) -> Result<()> {
    send_receive(transport, CMD_PASSWORD, 0, &DEFAULT_PASSWORD, cancel).await?;
    Ok(())
}

async fn get_version(transport: &mut Transport, cancel: &CancellationToken) -> Result<Vec<u8>> {
    let frame = send_receive(transport, CMD_VERSION, 0, &[], cancel).await?;
    expect_len("version", &frame.payload, VERSION_LEN)?;
    Ok(frame.payload)
}

/// Read a fixed-size single-packet block (DTMF, keys, VFO, options, basic info).
async fn read_single(
    transport: &mut Transport,
    cmd: u8,
    len: usize,
    path: &str,
    cancel: &CancellationToken,
) -> Result<Vec<u8>> {
    let frame = send_receive(transport, cmd, 0, &[], cancel).await?;
    expect_len(path, &frame.payload, len)?;
    Ok(frame.payload)
}

async fn write_single(
    transport: &mut Transport,
    cmd: u8,
    payload: &[u8],
    cancel: &CancellationToken,
) -> Result<()> {
    send_receive(transport, cmd, 0, payload, cancel).await?;
    Ok(())
}

/// Read a multi-packet block across `packets` sequence numbers, each of
/// exactly `packet_len` bytes.
async fn read_packets(
    transport: &mut Transport,
    cmd: u8,
    packets: u16,
    packet_len: usize,
    phase: &str,
    path: &str,
    progress: &dyn ProgressObserver,
    cancel: &CancellationToken,
) -> Result<Vec<Vec<u8>>> {
    let mut out = Vec::with_capacity(packets as usize);
    for seq in 0..packets {
        let frame = send_receive(transport, cmd, seq, &[], cancel).await?;
        expect_len(path, &frame.payload, packet_len)?;
        out.push(frame.payload);
        progress.on_progress(phase, seq as usize + 1, packets as usize);
    }
    Ok(out)
}

async fn write_packets(
    transport: &mut Transport,
    cmd: u8,
    packets: &[Vec<u8>],
    phase: &str,
    progress: &dyn ProgressObserver,
    cancel: &CancellationToken,
) -> Result<()> {
    let total = packets.len();
    for (seq, packet) in packets.iter().enumerate() {
        send_receive(transport, cmd, seq as u16, packet, cancel).await?;
        progress.on_progress(phase, seq + 1, total);
    }
    Ok(())
}

async fn end_session(transport: &mut Transport, cancel: &CancellationToken) -> Result<()> {
    send_receive(transport, CMD_END_SESSION, 0, &[0x00, 0x00], cancel).await?;
    Ok(())
}

/// Execute steps 1–12 in order with read opcodes.
pub async fn read_session(
    transport: &mut Transport,
    progress: &dyn ProgressObserver,
    cancel: &CancellationToken,
) -> Result<SessionPayloads> {
    handshake(transport, cancel).await?;
    password(transport, cancel).await?;
    let version = get_version(transport, cancel).await?;

    let dtmf = read_single(transport, CMD_DTMF_READ, DTMF_LEN, "dtmf", cancel).await?;
    let keys = read_single(transport, CMD_KEYS_READ, KEYS_LEN, "keys", cancel).await?;

    let contacts = read_packets(
        transport,
        CMD_CONTACTS_READ,
        CONTACTS_PACKETS,
        CONTACTS_PACKET_LEN,
        "contacts",
        "contacts",
        progress,
        cancel,
    )
    .await?;

    let rx_groups = read_packets(
        transport,
        CMD_RXGROUPS_READ,
        RXGROUPS_PACKETS,
        RXGROUPS_PACKET_LEN,
        "rx_groups",
        "rx_groups",
        progress,
        cancel,
    )
    .await?;

    let channels = read_packets(
        transport,
        CMD_CHANNELS_READ,
        CHANNELS_PACKETS,
        CHANNELS_PACKET_LEN,
        "channels",
        "channels",
        progress,
        cancel,
    )
    .await?;

    let vfo = read_single(transport, CMD_VFO_READ, VFO_LEN, "vfo", cancel).await?;
    let options = read_single(transport, CMD_OPTIONS_READ, OPTIONS_LEN, "options", cancel).await?;
    let basic_info = read_single(
        transport,
        CMD_BASIC_INFO_READ,
        BASIC_INFO_LEN,
        "basic_info",
        cancel,
    )
    .await?;

    end_session(transport, cancel).await?;

    Ok(SessionPayloads {
        version,
        dtmf,
        keys,
        contacts,
        rx_groups,
        channels,
        vfo,
        options,
        basic_info,
    })
}

/// Execute steps 1–3 (handshake, password, version), 4–10 with write
/// opcodes, optionally step 11, then step 12. After closing, wait
/// `POST_WRITE_RESTART_DELAY` and perform a full verify read.
///
/// `write_basic_info` corresponds to the CLI's `--basic-info` opt-in
/// (spec.md §4.4 step 11: "write only when caller explicitly opts in").
pub async fn write_session(
    transport: &mut Transport,
    payloads: &SessionPayloads,
    write_basic_info: bool,
    progress: &dyn ProgressObserver,
    cancel: &CancellationToken,
) -> Result<()> {
    handshake(transport, cancel).await?;
    password(transport, cancel).await?;
    let _version = get_version(transport, cancel).await?;

    write_single(transport, CMD_DTMF_WRITE, &payloads.dtmf, cancel).await?;
    write_single(transport, CMD_KEYS_WRITE, &payloads.keys, cancel).await?;

    write_packets(
        transport,
        CMD_CONTACTS_WRITE,
        &payloads.contacts,
        "contacts",
        progress,
        cancel,
    )
    .await?;

    write_packets(
        transport,
        CMD_RXGROUPS_WRITE,
        &payloads.rx_groups,
        "rx_groups",
        progress,
        cancel,
    )
    .await?;

    write_packets(
        transport,
        CMD_CHANNELS_WRITE,
        &payloads.channels,
        "channels",
        progress,
        cancel,
    )
    .await?;

    write_single(transport, CMD_VFO_WRITE, &payloads.vfo, cancel).await?;
    write_single(transport, CMD_OPTIONS_WRITE, &payloads.options, cancel).await?;

    if write_basic_info {
        write_single(transport, CMD_BASIC_INFO_WRITE, &payloads.basic_info, cancel).await?;
    }

    end_session(transport, cancel).await?;

    tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(Error::Transport("cancelled during post-write restart delay".into())),
        _ = tokio::time::sleep(POST_WRITE_RESTART_DELAY) => {}
    }

    // The driver reports success only if the verify read completes cleanly;
    // per spec.md §9 this does not byte-compare intended vs. observed
    // payloads (that is `Error::Verification`'s reserved future role).
    read_session(transport, progress, cancel).await?;

    Ok(())
}
