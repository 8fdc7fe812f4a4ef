//! Constant pool construction

use kindle_types::{Handle, Identity};
use std::collections::HashMap;
use tracing::trace;

/// Largest pool index an `Idx` operand can carry
pub const MAX_CONSTANT_INDEX: usize = u8::MAX as usize;

/// Ordered, identity-deduplicated table of constants.
///
/// Entries are keyed by `Handle::identity`, not by value: two separately
/// allocated heap numbers holding `3.25` get two entries. The pool keeps a
/// clone of every handle, so a heap identity cannot be reused by a new
/// allocation while the pool is alive.
#[derive(Debug, Default)]
pub struct ConstantPoolBuilder {
    entries: Vec<Handle>,
    index: HashMap<Identity, usize>,
}

impl ConstantPoolBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the index of `handle`, adding it on first use
    pub fn insert(&mut self, handle: &Handle) -> usize {
        let identity = handle.identity();
        if let Some(&entry) = self.index.get(&identity) {
            debug_assert!(self.entries[entry].is_identical_to(handle));
            return entry;
        }

        let entry = self.entries.len();
        trace!(entry, constant = %handle, "constant pool entry");
        self.entries.push(handle.clone());
        self.index.insert(identity, entry);
        entry
    }

    pub fn get(&self, index: usize) -> Option<&Handle> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finished pool, in first-use order
    pub fn finish(self) -> Box<[Handle]> {
        self.entries.into_boxed_slice()
    }
}
