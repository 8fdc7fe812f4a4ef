//! Finalized bytecode for one function

use crate::decoder::BytecodeIterator;
use crate::disassembler;
use kindle_types::Handle;
use serde::Serialize;
use std::fmt;

/// Immutable output of `BytecodeArrayBuilder::finalize`.
///
/// This is what the interpreter executes: the instruction bytes, the frame
/// size it must reserve, the number of parameters it was called with, and the
/// constants `LdaConstant` indexes into.
#[derive(Debug, Clone, Serialize)]
pub struct BytecodeArray {
    bytecodes: Box<[u8]>,

    /// Bytes reserved for registers
    frame_size: usize,

    /// Register slots (locals plus peak temporaries)
    register_count: usize,

    /// Parameters, receiver included
    parameter_count: usize,

    constant_pool: Box<[Handle]>,
}

impl BytecodeArray {
    pub(crate) fn new(
        bytecodes: Box<[u8]>,
        frame_size: usize,
        register_count: usize,
        parameter_count: usize,
        constant_pool: Box<[Handle]>,
    ) -> Self {
        Self {
            bytecodes,
            frame_size,
            register_count,
            parameter_count,
            constant_pool,
        }
    }

    pub fn bytecodes(&self) -> &[u8] {
        &self.bytecodes
    }

    /// Length of the instruction stream in bytes
    pub fn length(&self) -> usize {
        self.bytecodes.len()
    }

    /// Frame size in bytes. `register_count` gives the same frame in slots.
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Number of register slots the frame holds
    pub fn register_count(&self) -> usize {
        self.register_count
    }

    pub fn parameter_count(&self) -> usize {
        self.parameter_count
    }

    pub fn constant_pool(&self) -> &[Handle] {
        &self.constant_pool
    }

    pub fn constant(&self, index: usize) -> Option<&Handle> {
        self.constant_pool.get(index)
    }

    pub fn instructions(&self) -> BytecodeIterator<'_> {
        BytecodeIterator::new(&self.bytecodes)
    }
}

impl fmt::Display for BytecodeArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&disassembler::disassemble(self))
    }
}
