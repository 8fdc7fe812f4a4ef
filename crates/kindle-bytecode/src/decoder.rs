//! Decoding of encoded instructions

use crate::bytecodes::{Bytecode, OperandType};
use crate::error::DecodeError;
use crate::register::Register;
use std::fmt;

/// A decoded operand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Reg(Register),
    Imm8(i8),
    Idx(u8),
}

impl Operand {
    fn decode(operand_type: OperandType, byte: u8) -> Option<Self> {
        match operand_type {
            OperandType::None => None,
            OperandType::Imm8 => Some(Operand::Imm8(byte as i8)),
            OperandType::Idx => Some(Operand::Idx(byte)),
            OperandType::Reg => Some(Operand::Reg(Register::from_operand(byte))),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Reg(reg) => write!(f, "{}", reg),
            Operand::Imm8(value) => write!(f, "{}", value),
            Operand::Idx(index) => write!(f, "[{}]", index),
        }
    }
}

/// One instruction of a bytecode stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction<'a> {
    pub offset: usize,
    pub bytecode: Bytecode,
    operand_bytes: &'a [u8],
}

impl<'a> Instruction<'a> {
    /// Decode the instruction starting at `offset`
    pub fn decode(bytes: &'a [u8], offset: usize) -> Result<Self, DecodeError> {
        let byte = *bytes.get(offset).ok_or(DecodeError::OutOfBounds {
            offset,
            length: bytes.len(),
        })?;
        let bytecode =
            Bytecode::from_byte(byte).ok_or(DecodeError::UnknownBytecode { offset, byte })?;

        let expected = bytecode.number_of_operands();
        let available = bytes.len() - offset - 1;
        if available < expected {
            return Err(DecodeError::Truncated {
                offset,
                bytecode,
                expected,
                available,
            });
        }

        Ok(Self {
            offset,
            bytecode,
            operand_bytes: &bytes[offset + 1..offset + 1 + expected],
        })
    }

    /// Encoded size, opcode included
    pub fn size(&self) -> usize {
        self.bytecode.size()
    }

    pub fn operand_bytes(&self) -> &'a [u8] {
        self.operand_bytes
    }

    pub fn operand(&self, index: usize) -> Option<Operand> {
        let byte = *self.operand_bytes.get(index)?;
        Operand::decode(self.bytecode.operand_type(index), byte)
    }

    pub fn operands(&self) -> impl Iterator<Item = Operand> + '_ {
        (0..self.operand_bytes.len()).filter_map(|i| self.operand(i))
    }
}

impl fmt::Display for Instruction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bytecode)?;
        for operand in self.operands() {
            write!(f, " {}", operand)?;
        }
        Ok(())
    }
}

/// Iterator over the instructions of a byte stream.
///
/// Stops after the first decoding error.
#[derive(Debug, Clone)]
pub struct BytecodeIterator<'a> {
    bytes: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> BytecodeIterator<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            offset: 0,
            failed: false,
        }
    }

    /// Offset of the next instruction
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl<'a> Iterator for BytecodeIterator<'a> {
    type Item = Result<Instruction<'a>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.bytes.len() {
            return None;
        }
        match Instruction::decode(self.bytes, self.offset) {
            Ok(instruction) => {
                self.offset += instruction.size();
                Some(Ok(instruction))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_stream() {
        let bytes = [
            Bytecode::LdaSmi8.to_byte(),
            0xff,
            Bytecode::Star.to_byte(),
            0x00,
            Bytecode::LdaConstant.to_byte(),
            0x02,
            Bytecode::Return.to_byte(),
        ];
        let decoded: Vec<_> = BytecodeIterator::new(&bytes)
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(decoded.len(), 4);
        assert_eq!(decoded[0].operand(0), Some(Operand::Imm8(-1)));
        assert_eq!(decoded[1].operand(0), Some(Operand::Reg(Register::new(0))));
        assert_eq!(decoded[2].operand(0), Some(Operand::Idx(2)));
        assert_eq!(decoded[3].offset, 6);
        assert_eq!(decoded[3].operand(0), None);
    }

    #[test]
    fn test_display() {
        let bytes = [Bytecode::Add.to_byte(), 0xfe];
        let instruction = Instruction::decode(&bytes, 0).unwrap();
        assert_eq!(instruction.to_string(), "Add r2");
    }

    #[test]
    fn test_unknown_bytecode() {
        let bytes = [Bytecode::LdaZero.to_byte(), 0x42, Bytecode::Return.to_byte()];
        let mut iter = BytecodeIterator::new(&bytes);
        assert!(iter.next().unwrap().is_ok());
        assert_eq!(
            iter.next().unwrap().unwrap_err(),
            DecodeError::UnknownBytecode {
                offset: 1,
                byte: 0x42
            }
        );
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_decode_past_the_end() {
        let bytes = [Bytecode::Return.to_byte()];
        let err = Instruction::decode(&bytes, 1).unwrap_err();
        assert_eq!(err, DecodeError::OutOfBounds { offset: 1, length: 1 });
        assert_eq!(err.to_string(), "offset 1 is past the end of a 1 byte stream");
        assert!(Instruction::decode(&[], 0).is_err());
    }

    #[test]
    fn test_truncated_operand() {
        let bytes = [Bytecode::Ldar.to_byte()];
        let err = BytecodeIterator::new(&bytes).next().unwrap().unwrap_err();
        assert_eq!(
            err,
            DecodeError::Truncated {
                offset: 0,
                bytecode: Bytecode::Ldar,
                expected: 1,
                available: 0
            }
        );
        assert_eq!(err.to_string(), "Ldar at offset 0 needs 1 operand bytes, found 0");
    }
}
