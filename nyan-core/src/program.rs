//! A decoding-agnostic view over a script's instruction stream.
//!
//! Source and binary scripts share one execution core ([`crate::Script`])
//! behind this trait: the core only ever asks "what opcode is here, how
//! many times does it repeat, and how far do I advance" and does not
//! care whether the answer came from a parsed character or a decoded
//! byte run.

use {
    crate::error::{ParseError, RuntimeError},
    nyan_format::{decode_one, iter_instructions, match_brackets, BracketTable, DecodeError, Fetch, Opcode},
};

/// A script's instruction stream plus the bracket table over it.
pub trait Program
{
    /// Fetch the instruction at `cursor`.
    fn fetch(&self, cursor: usize) -> Result<Fetch, RuntimeError>;

    /// Whether `cursor` is at or past the end of the stream.
    fn is_end(&self, cursor: usize) -> bool;

    /// The bracket table for this stream.
    fn brackets(&self) -> &BracketTable;
}

/// A parsed `.nyan` source file: one opcode per token, stride and repeat
/// always 1.
pub struct SourceProgram
{
    tokens: Vec<Opcode>,
    brackets: BracketTable,
}

impl SourceProgram
{
    pub fn new(tokens: Vec<Opcode>) -> Result<Self, ParseError>
    {
        let brackets = match_brackets(tokens.iter().copied().enumerate())?;
        Ok(Self{tokens, brackets})
    }
}

impl Program for SourceProgram
{
    fn fetch(&self, cursor: usize) -> Result<Fetch, RuntimeError>
    {
        let opcode = self.tokens[cursor];
        Ok(Fetch{opcode, repeat: 1, stride: 1})
    }

    fn is_end(&self, cursor: usize) -> bool
    {
        cursor >= self.tokens.len()
    }

    fn brackets(&self) -> &BracketTable
    {
        &self.brackets
    }
}

/// A decoded `.nya` binary file body (header already stripped).
pub struct BinaryProgram
{
    body: Vec<u8>,
    brackets: BracketTable,
}

impl BinaryProgram
{
    pub fn new(body: Vec<u8>) -> Result<Self, ParseError>
    {
        let positions: Result<Vec<_>, DecodeError> = iter_instructions(&body).collect();
        let positions = positions?;
        let brackets = match_brackets(positions)?;
        Ok(Self{body, brackets})
    }
}

impl Program for BinaryProgram
{
    fn fetch(&self, cursor: usize) -> Result<Fetch, RuntimeError>
    {
        Ok(decode_one(&self.body, cursor)?)
    }

    fn is_end(&self, cursor: usize) -> bool
    {
        cursor >= self.body.len()
    }

    fn brackets(&self) -> &BracketTable
    {
        &self.brackets
    }
}
