//! Host-side programming tool for the RT-5D / JJCC-888DMR handheld DMR
//! transceiver.
//!
//! The crate is organized bottom-up, mirroring the radio's own layering:
//! raw byte transport (`transport`), CRC (`crc`), framing and retry
//! (`frame`), the twelve-step session driver (`session`), field-level
//! codecs (`field`, `dcs`, `gb2312`), per-block codecs (`blocks`),
//! multi-packet packers (`packers`), and finally the symbolic document
//! binding (`document`) that the CLI (`cli`, `main.rs`) reads and writes.

pub mod blocks;
pub mod cli;
pub mod crc;
pub mod dcs;
pub mod document;
pub mod error;
pub mod field;
pub mod frame;
pub mod gb2312;
pub mod packers;
pub mod self_test;
pub mod serial_enum;
pub mod session;
pub mod transport;

pub use document::Codeplug;
pub use error::{Error, Result};
pub use session::SessionPayloads;
