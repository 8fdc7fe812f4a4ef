//! Interpreter registers
//!
//! A register is a slot in the function's register file. Index 0 is the first
//! local; temporaries follow the locals. Parameters (receiver first) sit at
//! negative indices below the register file, past the fixed frame header.

use serde::Serialize;
use std::fmt;

/// A register in the current function's frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Register {
    index: i32,
}

impl Register {
    /// Largest index a one-byte operand can encode
    pub const MAX_INDEX: i32 = 128;
    /// Smallest index a one-byte operand can encode
    pub const MIN_INDEX: i32 = -127;

    /// Create a register.
    ///
    /// Panics if `index` cannot be encoded as a one-byte operand.
    pub fn new(index: i32) -> Self {
        assert!(
            Self::is_valid_index(index),
            "register index {} outside [{}, {}]",
            index,
            Self::MIN_INDEX,
            Self::MAX_INDEX
        );
        Self { index }
    }

    pub fn is_valid_index(index: i32) -> bool {
        (Self::MIN_INDEX..=Self::MAX_INDEX).contains(&index)
    }

    #[inline]
    pub fn index(self) -> i32 {
        self.index
    }

    pub fn is_parameter(self) -> bool {
        self.index < 0
    }

    /// Operand byte for this register: `(-index) mod 256`
    #[inline]
    pub fn to_operand(self) -> u8 {
        self.index.wrapping_neg() as u8
    }

    /// Inverse of `to_operand`
    #[inline]
    pub fn from_operand(operand: u8) -> Self {
        Self::new(-(operand as i8 as i32))
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.index)
    }
}
