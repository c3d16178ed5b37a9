//! Decoding one binary instruction at a time, with its run-length count.

use {
    crate::opcode::{Opcode, OpcodeError},
    thiserror::Error,
};

/// One decoded binary instruction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Fetch
{
    pub opcode: Opcode,
    /// Number of times to execute `opcode` before advancing past it.
    /// Always 1 for non-compressible opcodes.
    pub repeat: u32,
    /// Number of bytes this instruction occupies in the stream.
    pub stride: usize,
}

/// Error decoding a binary instruction.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum DecodeError
{
    #[error(transparent)]
    Opcode(#[from] OpcodeError),

    #[error("truncated run-length count at offset {0}")]
    TruncatedCount(usize),
}

/// Decode the instruction starting at `cursor` in `body` (the opcode
/// stream, i.e. the bytes following the header).
pub fn decode_one(body: &[u8], cursor: usize) -> Result<Fetch, DecodeError>
{
    let byte = *body.get(cursor).ok_or(DecodeError::TruncatedCount(cursor))?;
    let opcode = Opcode::from_byte(byte)?;

    if opcode.is_compressible() {
        let count_bytes = body
            .get(cursor + 1..cursor + 4)
            .ok_or(DecodeError::TruncatedCount(cursor))?;
        let repeat = u32::from_be_bytes([0, count_bytes[0], count_bytes[1], count_bytes[2]]);
        Ok(Fetch{opcode, repeat, stride: 4})
    } else {
        Ok(Fetch{opcode, repeat: 1, stride: 1})
    }
}

/// Iterate over every instruction in a binary body along with the byte
/// offset of its opcode byte. Used to build the bracket table.
pub fn iter_instructions(body: &[u8]) -> impl Iterator<Item = Result<(usize, Opcode), DecodeError>> + '_
{
    let mut cursor = 0;
    std::iter::from_fn(move || {
        if cursor >= body.len() {
            return None;
        }
        match decode_one(body, cursor) {
            Ok(fetch) => {
                let pos = cursor;
                cursor += fetch.stride;
                Some(Ok((pos, fetch.opcode)))
            }
            Err(err) => {
                cursor = body.len();
                Some(Err(err))
            }
        }
    })
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn decodes_compressible_run()
    {
        // CellInc (0x02) repeated 10 times.
        let body = [0x02, 0x00, 0x00, 0x0A];
        let fetch = decode_one(&body, 0).unwrap();
        assert_eq!(fetch.opcode, Opcode::CellInc);
        assert_eq!(fetch.repeat, 10);
        assert_eq!(fetch.stride, 4);
    }

    #[test]
    fn decodes_non_compressible_single_byte()
    {
        let body = [0x06]; // PortWrite
        let fetch = decode_one(&body, 0).unwrap();
        assert_eq!(fetch.opcode, Opcode::PortWrite);
        assert_eq!(fetch.repeat, 1);
        assert_eq!(fetch.stride, 1);
    }

    #[test]
    fn truncated_count_is_rejected()
    {
        let body = [0x02, 0x00];
        assert!(matches!(decode_one(&body, 0), Err(DecodeError::TruncatedCount(0))));
    }

    #[test]
    fn iter_instructions_reports_byte_offsets()
    {
        // PortWrite, then CellInc x5, then LoopEnd
        let body = [0x06, 0x02, 0x00, 0x00, 0x05, 0x0C];
        let positions: Vec<_> = iter_instructions(&body)
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(positions, vec![
            (0, Opcode::PortWrite),
            (1, Opcode::CellInc),
            (5, Opcode::LoopEnd),
        ]);
    }
}
