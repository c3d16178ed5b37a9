//! The one-byte-per-opcode table shared by the binary loader and builder.

use thiserror::Error;

/// One Nyan instruction, independent of source or binary encoding.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Opcode
{
    PtrRight,
    PtrLeft,
    CellInc,
    CellDec,
    PortRight,
    PortLeft,
    PortWrite,
    PortRead,
    Output,
    Input,
    ToggleParentMode,
    LoopStart,
    LoopEnd,
    DebugPrint,
}

impl Opcode
{
    /// Byte value of this opcode in the binary format.
    pub fn to_byte(self) -> u8
    {
        match self {
            Opcode::PtrRight         => 0x00,
            Opcode::PtrLeft          => 0x01,
            Opcode::CellInc          => 0x02,
            Opcode::CellDec          => 0x03,
            Opcode::PortRight        => 0x04,
            Opcode::PortLeft         => 0x05,
            Opcode::PortWrite        => 0x06,
            Opcode::PortRead         => 0x07,
            Opcode::Output           => 0x08,
            Opcode::Input            => 0x09,
            Opcode::ToggleParentMode => 0x0A,
            Opcode::LoopStart        => 0x0B,
            Opcode::LoopEnd          => 0x0C,
            Opcode::DebugPrint       => 0x0D,
        }
    }

    /// Decode a byte as an opcode.
    pub fn from_byte(byte: u8) -> Result<Self, OpcodeError>
    {
        match byte {
            0x00 => Ok(Opcode::PtrRight),
            0x01 => Ok(Opcode::PtrLeft),
            0x02 => Ok(Opcode::CellInc),
            0x03 => Ok(Opcode::CellDec),
            0x04 => Ok(Opcode::PortRight),
            0x05 => Ok(Opcode::PortLeft),
            0x06 => Ok(Opcode::PortWrite),
            0x07 => Ok(Opcode::PortRead),
            0x08 => Ok(Opcode::Output),
            0x09 => Ok(Opcode::Input),
            0x0A => Ok(Opcode::ToggleParentMode),
            0x0B => Ok(Opcode::LoopStart),
            0x0C => Ok(Opcode::LoopEnd),
            0x0D => Ok(Opcode::DebugPrint),
            _ => Err(OpcodeError::InvalidByte(byte)),
        }
    }

    /// The source-form character for this opcode.
    pub fn to_char(self) -> char
    {
        match self {
            Opcode::PtrRight         => '?',
            Opcode::PtrLeft          => '!',
            Opcode::CellInc          => '냥',
            Opcode::CellDec          => '냐',
            Opcode::PortRight        => '먕',
            Opcode::PortLeft         => '먀',
            Opcode::PortWrite        => ';',
            Opcode::PortRead         => ':',
            Opcode::Output           => '.',
            Opcode::Input            => ',',
            Opcode::ToggleParentMode => '\'',
            Opcode::LoopStart        => '~',
            Opcode::LoopEnd          => '-',
            Opcode::DebugPrint       => '뀨',
        }
    }

    /// Decode a source-form character as an opcode.
    pub fn from_char(c: char) -> Result<Self, OpcodeError>
    {
        match c {
            '?'  => Ok(Opcode::PtrRight),
            '!'  => Ok(Opcode::PtrLeft),
            '냥' => Ok(Opcode::CellInc),
            '냐' => Ok(Opcode::CellDec),
            '먕' => Ok(Opcode::PortRight),
            '먀' => Ok(Opcode::PortLeft),
            ';'  => Ok(Opcode::PortWrite),
            ':'  => Ok(Opcode::PortRead),
            '.'  => Ok(Opcode::Output),
            ','  => Ok(Opcode::Input),
            '\'' => Ok(Opcode::ToggleParentMode),
            '~'  => Ok(Opcode::LoopStart),
            '-'  => Ok(Opcode::LoopEnd),
            '뀨' => Ok(Opcode::DebugPrint),
            _ => Err(OpcodeError::InvalidChar(c)),
        }
    }

    /// Whether this opcode may be run-length compressed in the binary
    /// format. Port and bracket opcodes are never compressible: a
    /// compressed run executes atomically and must not be able to
    /// suspend or jump partway through.
    pub fn is_compressible(self) -> bool
    {
        matches!(
            self,
            Opcode::PtrRight | Opcode::PtrLeft
            | Opcode::CellInc | Opcode::CellDec
            | Opcode::PortRight | Opcode::PortLeft
            | Opcode::Output | Opcode::Input
        )
    }

    /// Whether this opcode is a loop bracket.
    pub fn is_loop_start(self) -> bool
    {
        matches!(self, Opcode::LoopStart)
    }

    /// Whether this opcode is a loop bracket.
    pub fn is_loop_end(self) -> bool
    {
        matches!(self, Opcode::LoopEnd)
    }
}

/// Error decoding a single opcode.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum OpcodeError
{
    #[error("invalid opcode byte: {0:#04x}")]
    InvalidByte(u8),

    #[error("invalid source character: {0:?}")]
    InvalidChar(char),
}
