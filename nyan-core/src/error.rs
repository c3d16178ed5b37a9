//! Error types for each failure domain: parsing, manifest loading, and
//! execution. Each stage returns its own enum; nothing is collapsed into
//! a single catch-all until the CLI boundary wraps it in `anyhow`.

use {
    nyan_format::{BracketError, DecodeError, HeaderError, OpcodeError},
    std::path::PathBuf,
    thiserror::Error,
};

/// Error parsing a source file into a token stream.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum ParseError
{
    #[error("{0}: unrecognized file extension, expected .nyan or .nya")]
    BadExtension(PathBuf),

    #[error("{path}: {source}")]
    Io{path: PathBuf, #[source] source: std::io::Error},

    #[error("{0}")]
    InvalidChar(#[from] OpcodeError),

    #[error("{0}")]
    Bracket(#[from] BracketError),

    #[error("{0}")]
    Header(#[from] HeaderError),

    #[error("{0}")]
    Decode(#[from] DecodeError),
}

/// Error loading the manifest graph rooted at a script.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum LoaderError
{
    #[error("{path}: {source}")]
    Io{path: PathBuf, #[source] source: std::io::Error},

    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("{path}:{line}: manifest entry does not match `<int>-><int>: <path>`")]
    ManifestSyntax{path: PathBuf, line: usize},

    #[error("{path}: local port {port} is declared more than once")]
    LocalPortConflict{path: PathBuf, port: i64},

    #[error("{path}: remote port {port} is declared more than once")]
    RemotePortConflict{path: PathBuf, port: i64},

    #[error(
        "{child}: port {port} is already bound to a different script; \
        refusing to silently drop the earlier binding from {existing_parent}"
    )]
    DuplicateBinding{child: PathBuf, existing_parent: PathBuf, port: i64},
}

/// Error during execution of a script.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum RuntimeError
{
    #[error("port {port} is not bound to any script (parent_mode = {parent_mode})")]
    PortUnbound{port: i64, parent_mode: bool},

    #[error("cannot send on port {port}: slot is already full")]
    SlotFull{port: i64},

    #[error("{0}")]
    Decode(#[from] nyan_format::DecodeError),
}
