//! L5: per-block codecs. Each submodule owns the byte layout of exactly
//! one of the ten codeplug blocks named in spec.md §4.5, translating
//! between the raw wire bytes the session driver moves and a small
//! symbolic struct/enum the document layer serializes.

pub mod basic_info;
pub mod channel;
pub mod contact;
pub mod dtmf;
pub mod keys;
pub mod options;
pub mod rxgroup;
pub mod vfo;
