//! Parsing `.mouse` manifest files: the side-channel metadata describing
//! a script's port bindings to its peers.

use {
    crate::error::LoaderError,
    regex::Regex,
    std::{path::Path, sync::OnceLock},
};

/// One parsed line of a manifest file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ManifestEntry
{
    pub local_port: i64,
    pub remote_port: i64,
    pub path: String,
}

fn entry_pattern() -> &'static Regex
{
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*(-?\d+)\s*->\s*(-?\d+)\s*:\s*(\S.*?)\s*$").unwrap()
    })
}

/// Parse the manifest file at `path`, if one exists.
///
/// Returns `Ok(None)` when the file is simply absent, matching the
/// source loader's "no manifest, no child scripts" rule. Any other I/O
/// failure (permissions, a directory in place of a file, ...) is
/// reported as [`LoaderError::Io`].
pub fn read_manifest(path: &Path) -> Result<Option<Vec<ManifestEntry>>, LoaderError>
{
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(LoaderError::Io{path: path.to_owned(), source: err}),
    };

    let mut entries = Vec::new();
    for (line_number, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let captures = entry_pattern()
            .captures(line)
            .ok_or_else(|| LoaderError::ManifestSyntax{path: path.to_owned(), line: line_number})?;

        let local_port = captures[1]
            .parse()
            .map_err(|_| LoaderError::ManifestSyntax{path: path.to_owned(), line: line_number})?;
        let remote_port = captures[2]
            .parse()
            .map_err(|_| LoaderError::ManifestSyntax{path: path.to_owned(), line: line_number})?;
        let path_str = captures[3].to_owned();

        entries.push(ManifestEntry{local_port, remote_port, path: path_str});
    }

    Ok(Some(entries))
}

/// The manifest path for a given script path: same directory and stem,
/// extension `.mouse`.
pub fn manifest_path_for(script_path: &Path) -> std::path::PathBuf
{
    script_path.with_extension("mouse")
}

#[cfg(test)]
mod tests
{
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_manifest_is_none()
    {
        let dir = tempfile::tempdir().unwrap();
        let result = read_manifest(&dir.path().join("nonexistent.mouse")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn parses_entries_tolerating_whitespace()
    {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.mouse");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "0->0: b.nyan").unwrap();
        writeln!(file, "  1  ->  -2 :  ../c.nyan  ").unwrap();

        let entries = read_manifest(&path).unwrap().unwrap();
        assert_eq!(entries, vec![
            ManifestEntry{local_port: 0, remote_port: 0, path: "b.nyan".into()},
            ManifestEntry{local_port: 1, remote_port: -2, path: "../c.nyan".into()},
        ]);
    }

    #[test]
    fn blank_lines_are_ignored()
    {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.mouse");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "0->0: b.nyan").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "1->1: c.nyan").unwrap();

        let entries = read_manifest(&path).unwrap().unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn malformed_line_is_rejected()
    {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.mouse");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "not a valid entry").unwrap();

        assert!(matches!(
            read_manifest(&path),
            Err(LoaderError::ManifestSyntax{line: 0, ..}),
        ));
    }

    #[test]
    fn manifest_path_swaps_extension()
    {
        let script = Path::new("/foo/bar.nyan");
        assert_eq!(manifest_path_for(script), Path::new("/foo/bar.mouse"));
    }
}
