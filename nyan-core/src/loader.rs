//! Deciding how to load one script file: source (`.nyan`) vs. binary
//! (`.nya`), and extracting its manifest either from a sibling `.mouse`
//! file or from the binary's embedded header.

use {
    crate::{
        error::{LoaderError, ParseError},
        manifest::{manifest_path_for, read_manifest, ManifestEntry},
        parser::parse_source,
        program::{BinaryProgram, Program, SourceProgram},
    },
    nyan_format::read_header,
    std::path::Path,
};

/// Load one script file's instruction stream and, if present, its
/// manifest entries.
pub fn load_script(path: &Path) -> Result<(Box<dyn Program>, Option<Vec<ManifestEntry>>), LoaderError>
{
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("nyan") => load_source(path),
        Some("nya") => load_binary(path),
        _ => Err(LoaderError::Parse(ParseError::BadExtension(path.to_owned()))),
    }
}

fn load_source(path: &Path) -> Result<(Box<dyn Program>, Option<Vec<ManifestEntry>>), LoaderError>
{
    let text = std::fs::read_to_string(path)
        .map_err(|source| LoaderError::Io{path: path.to_owned(), source})?;
    let tokens = parse_source(&text).map_err(LoaderError::Parse)?;
    let program = SourceProgram::new(tokens).map_err(LoaderError::Parse)?;
    let manifest = read_manifest(&manifest_path_for(path))?;
    Ok((Box::new(program), manifest))
}

fn load_binary(path: &Path) -> Result<(Box<dyn Program>, Option<Vec<ManifestEntry>>), LoaderError>
{
    let bytes = std::fs::read(path)
        .map_err(|source| LoaderError::Io{path: path.to_owned(), source})?;
    let (header, offset) = read_header(&bytes)
        .map_err(|e| LoaderError::Parse(ParseError::Header(e)))?;
    let body = bytes[offset..].to_vec();
    let program = BinaryProgram::new(body).map_err(LoaderError::Parse)?;

    let manifest = if header.manifest.is_empty() {
        None
    } else {
        Some(
            header.manifest.into_iter()
                .map(|entry| ManifestEntry{
                    local_port: entry.local_port as i64,
                    remote_port: entry.remote_port as i64,
                    path: entry.filename,
                })
                .collect(),
        )
    };

    Ok((Box::new(program), manifest))
}
