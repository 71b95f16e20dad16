//! Non-core: serial-port enumeration (spec.md §6).
//!
//! Lists the programming cable's likely device candidates without opening
//! them. Absence of any matching device is not an error — just an empty
//! list; the `ports` CLI command prints it sorted either way.

use crate::error::Result;

/// Device-name prefixes under `/dev` that this radio's USB-serial cable
/// (or a compatible FTDI/CH340/CP210x cable) typically shows up as.
#[cfg(unix)]
const UNIX_PREFIXES: &[&str] = &["ttyUSB", "ttyACM", "ttyS", "ttyAMA", "tty.usb", "cu.usb"];

/// Enumerate serial ports sorted by name.
///
/// On UNIX-like hosts this walks `/dev` for the documented device-name
/// prefixes (spec.md §6). On Windows it defers to the OS's own
/// device-manager enumeration via `tokio_serial::available_ports`, which
/// wraps the registry lookup spec.md §6 calls for.
#[cfg(unix)]
pub fn list_ports() -> Result<Vec<String>> {
    use crate::error::Error;

    let dir = match std::fs::read_dir("/dev") {
        Ok(dir) => dir,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(Error::Transport(format!("failed to list /dev: {e}"))),
    };

    let mut ports = Vec::new();
    for entry in dir {
        let entry = entry.map_err(|e| Error::Transport(format!("failed to read /dev entry: {e}")))?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if UNIX_PREFIXES.iter().any(|prefix| name.starts_with(prefix)) {
            ports.push(format!("/dev/{name}"));
        }
    }
    ports.sort();
    Ok(ports)
}

#[cfg(windows)]
pub fn list_ports() -> Result<Vec<String>> {
    use crate::error::Error;

    let mut ports: Vec<String> = tokio_serial::available_ports()
        .map_err(|e| Error::Transport(format!("failed to enumerate ports: {e}")))?
        .into_iter()
        .map(|p| p.port_name)
        .collect();
    ports.sort();
    Ok(ports)
}

#[cfg(not(any(unix, windows)))]
pub fn list_ports() -> Result<Vec<String>> {
    Ok(Vec::new())
}
