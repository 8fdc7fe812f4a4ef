//! Kindle bytecode construction
//!
//! This crate turns the operations chosen by a code generator (load a
//! literal, move a value between the accumulator and a register, apply a
//! binary operator, return) into the bit-exact instruction stream and
//! constant pool executed by the Kindle interpreter.
//!
//! # Architecture
//!
//! The interpreter is an accumulator machine with a register file:
//! - one-byte opcodes followed by one-byte operands
//! - registers addressed by a signed index, encoded as its negation
//! - locals from r0 upwards, temporaries above them, parameters below r0
//! - literals that don't fit an 8-bit immediate live in a constant pool
//!
//! # Modules
//!
//! - `bytecodes`: Instruction set and operand kinds
//! - `register`: Register indices and their operand encoding
//! - `frame`: Frame layout constants (slot size, parameter placement)
//! - `constant_pool`: Identity-deduplicated constant table
//! - `temporary`: Stack allocation of temporary registers
//! - `builder`: Emission API and finalization
//! - `bytecode_array`: Finalized, immutable output
//! - `decoder` / `disassembler`: Reading the output back
//! - `error`: Decoding errors

pub mod builder;
pub mod bytecode_array;
pub mod bytecodes;
pub mod constant_pool;
pub mod decoder;
pub mod disassembler;
pub mod error;
pub mod frame;
pub mod register;
pub mod temporary;
pub mod token;

// Re-export main types
pub use builder::BytecodeArrayBuilder;
pub use bytecode_array::BytecodeArray;
pub use bytecodes::{Bytecode, OperandType};
pub use decoder::{BytecodeIterator, Instruction, Operand};
pub use disassembler::disassemble;
pub use error::DecodeError;
pub use frame::FrameLayout;
pub use register::Register;
pub use temporary::TemporaryRegisterScope;
pub use token::Token;
