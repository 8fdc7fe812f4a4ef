//! Errors raised while decoding a bytecode stream

use crate::bytecodes::Bytecode;
use thiserror::Error;

/// A byte stream that does not decode into whole instructions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("offset {offset} is past the end of a {length} byte stream")]
    OutOfBounds { offset: usize, length: usize },

    #[error("unknown bytecode {byte:#04x} at offset {offset}")]
    UnknownBytecode { offset: usize, byte: u8 },

    #[error("{bytecode} at offset {offset} needs {expected} operand bytes, found {available}")]
    Truncated {
        offset: usize,
        bytecode: Bytecode,
        expected: usize,
        available: usize,
    },
}
