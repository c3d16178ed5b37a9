//! The Nyan execution core: tape, per-script interpreter, Communicator,
//! manifest loader, and the coroutine-style scheduling Engine.
//!
//! This crate knows how to run a graph of scripts to completion; it does
//! not know about the command line, file extensions beyond dispatching
//! on them, or the Brainfuck translator (see `nyan-translate`). Binary
//! decoding lives in `nyan-format`; this crate's [`Program`] trait is
//! the seam where source and binary streams look the same to the
//! interpreter core.

#![warn(missing_docs)]

pub use self::{
    communicator::Communicator,
    config::{Config, DuplicateBindingPolicy, FullSlotPolicy},
    engine::Engine,
    error::{LoaderError, ParseError, RuntimeError},
    label::{CommunicatorId, ScriptId},
    manifest::{manifest_path_for, read_manifest, ManifestEntry},
    parser::parse_source,
    program::{BinaryProgram, Program, SourceProgram},
    script::{Role, Script, Signal},
    tape::Tape,
};

mod communicator;
mod config;
mod engine;
mod error;
mod label;
mod loader;
mod manifest;
mod parser;
mod program;
mod script;
mod tape;
