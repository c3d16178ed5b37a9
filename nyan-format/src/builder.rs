//! Lowering a decoded opcode stream into the run-length-compressed binary
//! format.

use {
    crate::{
        header::{write_header, BinaryManifestEntry, HeaderError},
        opcode::Opcode,
    },
    std::path::{Path, PathBuf},
    thiserror::Error,
};

/// The largest run a single compressible-opcode emission can encode: the
/// binary format's repeat count is a 3-byte big-endian unsigned field.
const MAX_RUN: u32 = 0xFF_FFFF;

/// Error assembling a binary file.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum BuildError
{
    #[error("unbalanced loops: {starts} loop starts but {ends} loop ends")]
    UnbalancedLoops{starts: usize, ends: usize},

    #[error(transparent)]
    Header(#[from] HeaderError),

    #[error("{0}: refusing to overwrite an existing file")]
    OutputExists(PathBuf),

    #[error("{0}: parent directory does not exist")]
    OutputMissingDir(PathBuf),

    #[error("{path}: {source}")]
    Io{path: PathBuf, #[source] source: std::io::Error},
}

/// Accumulates a binary file body, merging adjacent identical
/// compressible opcodes into a single run-length-encoded emission.
#[derive(Default)]
pub struct Builder
{
    manifest: Vec<BinaryManifestEntry>,
}

impl Builder
{
    /// A builder with no embedded manifest.
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Attach the manifest to embed in the header.
    pub fn with_manifest(mut self, manifest: Vec<BinaryManifestEntry>) -> Self
    {
        self.manifest = manifest;
        self
    }

    /// Assemble `opcodes` (in source order, one element per source
    /// character) into a complete binary file, including the header.
    ///
    /// This performs the loop-count sanity check described for the
    /// builder: it is a cheap balance check, not a full bracket match,
    /// which the loader performs again on load.
    pub fn build(&self, opcodes: &[Opcode]) -> Result<Vec<u8>, BuildError>
    {
        let starts = opcodes.iter().filter(|o| o.is_loop_start()).count();
        let ends = opcodes.iter().filter(|o| o.is_loop_end()).count();
        if starts != ends {
            return Err(BuildError::UnbalancedLoops{starts, ends});
        }

        let mut out = Vec::new();
        write_header(&mut out, &self.manifest)?;
        encode_body(&mut out, opcodes);
        Ok(out)
    }

    /// Assemble `opcodes` and write the result to `path`, refusing to
    /// overwrite an existing file or to write into a directory that
    /// does not exist.
    pub fn write_to(&self, opcodes: &[Opcode], path: &Path) -> Result<(), BuildError>
    {
        if path.exists() {
            return Err(BuildError::OutputExists(path.to_owned()));
        }
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
                return Err(BuildError::OutputMissingDir(path.to_owned()));
            }
            _ => {}
        }

        let bytes = self.build(opcodes)?;
        std::fs::write(path, bytes)
            .map_err(|source| BuildError::Io{path: path.to_owned(), source})
    }
}

/// Merge runs of identical compressible opcodes and append the result to
/// `out`. A run longer than [`MAX_RUN`] (the format's 3-byte count field)
/// is split into multiple opcode+count emissions rather than truncated.
fn encode_body(out: &mut Vec<u8>, opcodes: &[Opcode])
{
    let mut i = 0;
    while i < opcodes.len() {
        let opcode = opcodes[i];
        if opcode.is_compressible() {
            let mut run = 1u32;
            while run < MAX_RUN
                && i + (run as usize) < opcodes.len()
                && opcodes[i + run as usize] == opcode
            {
                run += 1;
            }
            out.push(opcode.to_byte());
            out.extend_from_slice(&run.to_be_bytes()[1..]);
            i += run as usize;
        } else {
            out.push(opcode.to_byte());
            i += 1;
        }
    }
}
