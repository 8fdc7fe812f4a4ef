//! Allocation of heap objects and access to the oddball roots

use crate::handle::Handle;
use crate::object::{HeapObject, OddballKind, Smi};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Creates handles and owns the values shared by every function compiled
/// against it: the oddballs and the internalized strings.
///
/// A builder borrows the factory, so the factory outlives every builder.
#[derive(Debug)]
pub struct Factory {
    undefined: Handle,
    null: Handle,
    the_hole: Handle,
    true_value: Handle,
    false_value: Handle,

    /// Internalized strings, keyed by contents
    string_table: RefCell<HashMap<Box<str>, Handle>>,
}

impl Factory {
    pub fn new() -> Self {
        let oddball = |kind| Handle::Heap(Rc::new(HeapObject::Oddball(kind)));
        Self {
            undefined: oddball(OddballKind::Undefined),
            null: oddball(OddballKind::Null),
            the_hole: oddball(OddballKind::TheHole),
            true_value: oddball(OddballKind::True),
            false_value: oddball(OddballKind::False),
            string_table: RefCell::new(HashMap::new()),
        }
    }

    pub fn undefined_value(&self) -> Handle {
        self.undefined.clone()
    }

    pub fn null_value(&self) -> Handle {
        self.null.clone()
    }

    pub fn the_hole_value(&self) -> Handle {
        self.the_hole.clone()
    }

    pub fn true_value(&self) -> Handle {
        self.true_value.clone()
    }

    pub fn false_value(&self) -> Handle {
        self.false_value.clone()
    }

    pub fn to_boolean(&self, value: bool) -> Handle {
        if value {
            self.true_value()
        } else {
            self.false_value()
        }
    }

    /// Check whether `handle` is one of this factory's oddball roots
    pub fn is_root(&self, handle: &Handle) -> bool {
        [
            &self.undefined,
            &self.null,
            &self.the_hole,
            &self.true_value,
            &self.false_value,
        ]
        .iter()
        .any(|root| root.is_identical_to(handle))
    }

    pub fn new_smi(&self, value: i32) -> Handle {
        Handle::Smi(Smi::from_int(value))
    }

    /// Allocate a fresh heap number, even if an equal one already exists
    pub fn new_heap_number(&self, value: f64) -> Handle {
        Handle::Heap(Rc::new(HeapObject::HeapNumber(value)))
    }

    /// Smi for integral values in Smi range, otherwise a fresh heap number
    pub fn new_number(&self, value: f64) -> Handle {
        let is_minus_zero = value == 0.0 && value.is_sign_negative();
        if value.fract() == 0.0 && !is_minus_zero && Smi::is_valid(value as i64) {
            // `as i64` saturates, so out-of-range doubles fail the range check
            self.new_smi(value as i32)
        } else {
            self.new_heap_number(value)
        }
    }

    /// Allocate a fresh string that is not entered in the string table
    pub fn new_string(&self, value: &str) -> Handle {
        Handle::Heap(Rc::new(HeapObject::String(value.into())))
    }

    /// Return the unique string with these contents, allocating it on first use
    pub fn internalize_string(&self, value: &str) -> Handle {
        let mut table = self.string_table.borrow_mut();
        if let Some(existing) = table.get(value) {
            return existing.clone();
        }
        let handle = self.new_string(value);
        table.insert(value.into(), handle.clone());
        handle
    }

    pub fn new_fixed_array(&self, elements: Vec<Handle>) -> Handle {
        Handle::Heap(Rc::new(HeapObject::FixedArray(elements)))
    }
}

impl Default for Factory {
    fn default() -> Self {
        Self::new()
    }
}
