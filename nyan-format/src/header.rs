//! The binary file header: magic tag plus an optional embedded manifest.

use {std::convert::TryFrom, thiserror::Error};

/// Tag byte meaning the file carries an embedded manifest.
const TAG_WITH_MANIFEST: u8 = 0x00;

/// Tag byte meaning the file carries no manifest.
const TAG_NO_MANIFEST: u8 = 0x01;

/// One manifest entry as stored in a binary header.
///
/// Binary ports are unsigned and 16-bit, a narrower range than the
/// source manifest's signed integers; see [`HeaderError::PortOutOfRange`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BinaryManifestEntry
{
    pub local_port: u16,
    pub remote_port: u16,
    pub filename: String,
}

/// The decoded header of a binary file: an optional manifest, plus the
/// byte offset at which the opcode stream begins.
#[derive(Clone, Debug, Default)]
pub struct Header
{
    pub manifest: Vec<BinaryManifestEntry>,
}

/// Error reading or writing a binary header.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum HeaderError
{
    #[error("file is empty")]
    Empty,

    #[error("unknown header tag: {0:#04x}")]
    BadMagic(u8),

    #[error("truncated header")]
    Truncated,

    #[error("manifest filename is not valid UTF-8")]
    BadFilename,

    #[error("manifest filename is missing its terminating newline")]
    UnterminatedFilename,

    #[error("port index {0} does not fit in the binary format's unsigned 16-bit field")]
    PortOutOfRange(i64),
}

/// Parse the header at the start of `bytes`.
///
/// Returns the decoded header and the offset of the first opcode byte.
pub fn read_header(bytes: &[u8]) -> Result<(Header, usize), HeaderError>
{
    let &tag = bytes.first().ok_or(HeaderError::Empty)?;
    match tag {
        TAG_NO_MANIFEST => Ok((Header::default(), 1)),
        TAG_WITH_MANIFEST => read_manifest_header(bytes),
        other => Err(HeaderError::BadMagic(other)),
    }
}

fn read_manifest_header(bytes: &[u8]) -> Result<(Header, usize), HeaderError>
{
    // Tag (1) + 2-byte count + 1 filler byte.
    let count_bytes = bytes.get(1..3).ok_or(HeaderError::Truncated)?;
    let count = u16::from_be_bytes([count_bytes[0], count_bytes[1]]);
    // Byte 3 is an undocumented filler byte, preserved for wire compatibility.
    let mut cursor = 4;

    let mut manifest = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let entry_bytes = bytes.get(cursor..cursor + 6).ok_or(HeaderError::Truncated)?;
        let local_port = u16::from_be_bytes([entry_bytes[0], entry_bytes[1]]);
        // entry_bytes[2] is filler.
        let remote_port = u16::from_be_bytes([entry_bytes[3], entry_bytes[4]]);
        // entry_bytes[5] is filler.
        cursor += 6;

        let newline_offset = bytes[cursor..]
            .iter()
            .position(|&b| b == b'\n')
            .ok_or(HeaderError::UnterminatedFilename)?;
        let filename_bytes = &bytes[cursor..cursor + newline_offset];
        let filename = std::str::from_utf8(filename_bytes)
            .map_err(|_| HeaderError::BadFilename)?
            .to_owned();
        cursor += newline_offset + 1;

        manifest.push(BinaryManifestEntry{local_port, remote_port, filename});
    }

    Ok((Header{manifest}, cursor))
}

/// Serialize a header (tag, manifest if any) to `out`.
pub fn write_header(out: &mut Vec<u8>, manifest: &[BinaryManifestEntry])
    -> Result<(), HeaderError>
{
    if manifest.is_empty() {
        out.push(TAG_NO_MANIFEST);
        return Ok(());
    }

    out.push(TAG_WITH_MANIFEST);
    let count = u16::try_from(manifest.len())
        .map_err(|_| HeaderError::PortOutOfRange(manifest.len() as i64))?;
    out.extend_from_slice(&count.to_be_bytes());
    out.push(0); // filler

    for entry in manifest {
        out.extend_from_slice(&entry.local_port.to_be_bytes());
        out.push(0); // filler
        out.extend_from_slice(&entry.remote_port.to_be_bytes());
        out.push(0); // filler
        out.extend_from_slice(entry.filename.as_bytes());
        out.push(b'\n');
    }

    Ok(())
}

/// Convert a signed manifest port index to the binary format's unsigned
/// 16-bit representation, rejecting values that don't fit.
pub fn port_to_u16(port: i64) -> Result<u16, HeaderError>
{
    u16::try_from(port).map_err(|_| HeaderError::PortOutOfRange(port))
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn no_manifest_roundtrip()
    {
        let mut out = Vec::new();
        write_header(&mut out, &[]).unwrap();
        assert_eq!(out, vec![TAG_NO_MANIFEST]);

        let (header, offset) = read_header(&out).unwrap();
        assert!(header.manifest.is_empty());
        assert_eq!(offset, 1);
    }

    #[test]
    fn manifest_roundtrip()
    {
        let entries = vec![
            BinaryManifestEntry{local_port: 0, remote_port: 0, filename: "b.nya".into()},
            BinaryManifestEntry{local_port: 1, remote_port: 2, filename: "c.nyan".into()},
        ];
        let mut out = Vec::new();
        write_header(&mut out, &entries).unwrap();

        let (header, offset) = read_header(&out).unwrap();
        assert_eq!(header.manifest, entries);
        assert_eq!(offset, out.len());
    }

    #[test]
    fn padding_bytes_are_present_in_wire_layout()
    {
        let entries = vec![
            BinaryManifestEntry{local_port: 0x0102, remote_port: 0x0304, filename: "x".into()},
        ];
        let mut out = Vec::new();
        write_header(&mut out, &entries).unwrap();

        // tag, count-hi, count-lo, header-filler,
        // local-hi, local-lo, entry-filler, remote-hi, remote-lo, entry-filler,
        // 'x', '\n'
        assert_eq!(out, vec![0x00, 0x00, 0x01, 0x00, 0x01, 0x02, 0x00, 0x03, 0x04, 0x00, b'x', b'\n']);
    }

    #[test]
    fn bad_magic_is_rejected()
    {
        assert!(matches!(read_header(&[0x02]), Err(HeaderError::BadMagic(0x02))));
    }

    #[test]
    fn empty_file_is_rejected()
    {
        assert!(matches!(read_header(&[]), Err(HeaderError::Empty)));
    }
}
