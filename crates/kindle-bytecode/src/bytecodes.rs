//! Bytecode definitions for the Kindle interpreter
//!
//! Every instruction is one opcode byte followed by a fixed number of one-byte
//! operands. The interpreter keeps its working value in an implicit
//! accumulator; register operands name frame slots.
//!
//! Operand kinds:
//! - `Reg`:  register, encoded as the two's-complement negation of its index
//! - `Imm8`: signed 8-bit immediate
//! - `Idx`:  unsigned index into the constant pool

use serde::Serialize;
use std::fmt;

/// Kind of a single operand byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OperandType {
    None,
    Imm8,
    Idx,
    Reg,
}

impl OperandType {
    pub fn name(self) -> &'static str {
        match self {
            OperandType::None => "None",
            OperandType::Imm8 => "Imm8",
            OperandType::Idx => "Idx",
            OperandType::Reg => "Reg",
        }
    }
}

/// Most operands any bytecode declares
pub const MAX_OPERANDS: usize = 3;

/// Interpreter instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum Bytecode {
    // ===== Loading the accumulator =====
    /// acc = 0
    LdaZero = 0x00,
    /// acc = Imm8
    LdaSmi8 = 0x01,
    /// acc = K[Idx]
    LdaConstant = 0x02,
    /// acc = undefined
    LdaUndefined = 0x03,
    /// acc = null
    LdaNull = 0x04,
    /// acc = the_hole
    LdaTheHole = 0x05,
    /// acc = true
    LdaTrue = 0x06,
    /// acc = false
    LdaFalse = 0x07,

    // ===== Register transfers =====
    /// acc = R[Reg]
    Ldar = 0x08,
    /// R[Reg] = acc
    Star = 0x09,

    // ===== Binary operators =====
    /// acc = R[Reg] + acc
    Add = 0x0a,
    /// acc = R[Reg] - acc
    Sub = 0x0b,
    /// acc = R[Reg] * acc
    Mul = 0x0c,
    /// acc = R[Reg] / acc
    Div = 0x0d,
    /// acc = R[Reg] % acc
    Mod = 0x0e,

    // ===== Control flow =====
    /// return acc
    Return = 0x0f,
}

impl Bytecode {
    /// Every bytecode, in id order
    pub const ALL: [Bytecode; 16] = [
        Bytecode::LdaZero,
        Bytecode::LdaSmi8,
        Bytecode::LdaConstant,
        Bytecode::LdaUndefined,
        Bytecode::LdaNull,
        Bytecode::LdaTheHole,
        Bytecode::LdaTrue,
        Bytecode::LdaFalse,
        Bytecode::Ldar,
        Bytecode::Star,
        Bytecode::Add,
        Bytecode::Sub,
        Bytecode::Mul,
        Bytecode::Div,
        Bytecode::Mod,
        Bytecode::Return,
    ];

    #[inline]
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        Self::ALL.get(byte as usize).copied()
    }

    /// Declared operand kinds, in encoding order
    pub fn operand_types(self) -> &'static [OperandType] {
        use OperandType::*;
        match self {
            Bytecode::LdaZero
            | Bytecode::LdaUndefined
            | Bytecode::LdaNull
            | Bytecode::LdaTheHole
            | Bytecode::LdaTrue
            | Bytecode::LdaFalse
            | Bytecode::Return => &[],
            Bytecode::LdaSmi8 => &[Imm8],
            Bytecode::LdaConstant => &[Idx],
            Bytecode::Ldar
            | Bytecode::Star
            | Bytecode::Add
            | Bytecode::Sub
            | Bytecode::Mul
            | Bytecode::Div
            | Bytecode::Mod => &[Reg],
        }
    }

    pub fn number_of_operands(self) -> usize {
        self.operand_types().len()
    }

    /// Kind of operand `index`, or `OperandType::None` past the last operand
    pub fn operand_type(self, index: usize) -> OperandType {
        self.operand_types()
            .get(index)
            .copied()
            .unwrap_or(OperandType::None)
    }

    /// Encoded size in bytes, opcode included
    pub fn size(self) -> usize {
        1 + self.number_of_operands()
    }

    pub fn name(self) -> &'static str {
        match self {
            Bytecode::LdaZero => "LdaZero",
            Bytecode::LdaSmi8 => "LdaSmi8",
            Bytecode::LdaConstant => "LdaConstant",
            Bytecode::LdaUndefined => "LdaUndefined",
            Bytecode::LdaNull => "LdaNull",
            Bytecode::LdaTheHole => "LdaTheHole",
            Bytecode::LdaTrue => "LdaTrue",
            Bytecode::LdaFalse => "LdaFalse",
            Bytecode::Ldar => "Ldar",
            Bytecode::Star => "Star",
            Bytecode::Add => "Add",
            Bytecode::Sub => "Sub",
            Bytecode::Mul => "Mul",
            Bytecode::Div => "Div",
            Bytecode::Mod => "Mod",
            Bytecode::Return => "Return",
        }
    }
}

impl fmt::Display for Bytecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytecode_conversion() {
        assert_eq!(Bytecode::LdaZero.to_byte(), 0x00);
        assert_eq!(Bytecode::Return.to_byte(), 0x0f);
        assert_eq!(Bytecode::from_byte(0x0a), Some(Bytecode::Add));
        assert_eq!(Bytecode::from_byte(0x10), None);
        assert_eq!(Bytecode::from_byte(0xff), None);
    }

    #[test]
    fn test_table_is_in_id_order() {
        for (i, bytecode) in Bytecode::ALL.iter().enumerate() {
            assert_eq!(bytecode.to_byte() as usize, i);
            assert_eq!(Bytecode::from_byte(i as u8), Some(*bytecode));
        }
    }

    #[test]
    fn test_operand_types() {
        assert_eq!(Bytecode::LdaZero.number_of_operands(), 0);
        assert_eq!(Bytecode::LdaSmi8.operand_type(0), OperandType::Imm8);
        assert_eq!(Bytecode::LdaConstant.operand_type(0), OperandType::Idx);
        assert_eq!(Bytecode::Star.operand_type(0), OperandType::Reg);
        assert_eq!(Bytecode::Star.operand_type(1), OperandType::None);
        assert_eq!(Bytecode::Add.size(), 2);
        assert_eq!(Bytecode::Return.size(), 1);
        assert!(Bytecode::ALL
            .iter()
            .all(|b| b.number_of_operands() <= MAX_OPERANDS));
    }

    #[test]
    fn test_display() {
        assert_eq!(Bytecode::LdaTheHole.to_string(), "LdaTheHole");
        assert_eq!(format!("{}", Bytecode::Mod), "Mod");
    }
}
