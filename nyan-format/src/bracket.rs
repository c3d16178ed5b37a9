//! Pairing loop brackets over an arbitrary position stream.
//!
//! Shared between the source parser and the binary loader: both walk a
//! stream of `(position, opcode)` pairs where `position` means "index"
//! for source and "byte offset" for binary, and only the meaning of
//! `position` differs.

use {crate::opcode::Opcode, std::collections::HashMap, thiserror::Error};

/// A bijective table between matching loop-start and loop-end positions.
#[derive(Clone, Debug, Default)]
pub struct BracketTable
{
    /// Loop-start position -> matching loop-end position.
    start_to_end: HashMap<usize, usize>,

    /// Loop-end position -> matching loop-start position.
    end_to_start: HashMap<usize, usize>,
}

impl BracketTable
{
    /// The position of the matching loop-end, given a loop-start position.
    pub fn matching_end(&self, start: usize) -> Option<usize>
    {
        self.start_to_end.get(&start).copied()
    }

    /// The position of the matching loop-start, given a loop-end position.
    pub fn matching_start(&self, end: usize) -> Option<usize>
    {
        self.end_to_start.get(&end).copied()
    }
}

/// Build a [`BracketTable`] from a stream of `(position, opcode)` pairs.
///
/// Positions need not be contiguous or start at zero; they only need to
/// be the caller's chosen unit (character index for source, byte offset
/// for binary).
pub fn match_brackets(
    tokens: impl IntoIterator<Item = (usize, Opcode)>,
) -> Result<BracketTable, BracketError>
{
    let mut stack = Vec::new();
    let mut table = BracketTable::default();

    for (pos, opcode) in tokens {
        if opcode.is_loop_start() {
            stack.push(pos);
        } else if opcode.is_loop_end() {
            let start = stack.pop().ok_or(BracketError::UnmatchedClosing(pos))?;
            table.start_to_end.insert(start, pos);
            table.end_to_start.insert(pos, start);
        }
    }

    if let Some(&unmatched) = stack.last() {
        return Err(BracketError::UnmatchedOpening(unmatched));
    }

    Ok(table)
}

/// Error pairing loop brackets.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum BracketError
{
    #[error("unmatched loop start at position {0}")]
    UnmatchedOpening(usize),

    #[error("unmatched loop end at position {0}")]
    UnmatchedClosing(usize),
}
