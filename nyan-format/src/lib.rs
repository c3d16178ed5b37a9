//! The Nyan binary file format: opcode table, header layout, run-length
//! encoding, and the builder that produces it.
//!
//! This crate knows nothing about execution; it only knows how bytes map
//! to instructions. `nyan-core` drives an interpreter over the streams
//! this crate decodes.

#![warn(missing_docs)]

pub use self::{
    bracket::{match_brackets, BracketError, BracketTable},
    builder::{BuildError, Builder},
    decode::{decode_one, iter_instructions, DecodeError, Fetch},
    header::{port_to_u16, read_header, write_header, BinaryManifestEntry, Header, HeaderError},
    opcode::{Opcode, OpcodeError},
};

mod bracket;
mod builder;
mod decode;
mod header;
mod opcode;
