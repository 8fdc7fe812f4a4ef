//! Kindle object model
//!
//! Values handed to the bytecode builder: unboxed small integers (`Smi`),
//! heap objects, and the `Handle`s that reference them. Handles carry an
//! identity so that consumers can tell "the same object" apart from "an
//! equal object".

pub mod factory;
pub mod handle;
pub mod object;

// Re-exports
pub use factory::Factory;
pub use handle::{Handle, Identity};
pub use object::{HeapObject, OddballKind, Smi};
