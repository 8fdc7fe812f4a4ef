//! Handles to values and their identities

use crate::object::{HeapObject, OddballKind, Smi};
use serde::{Serialize, Serializer};
use std::fmt;
use std::rc::Rc;

/// Reference to a value owned by the object model.
///
/// Cloning a handle never copies the referenced heap object, so clones are
/// identical to the original.
#[derive(Clone)]
pub enum Handle {
    Smi(Smi),
    Heap(Rc<HeapObject>),
}

/// Identity of the value behind a handle.
///
/// Smis are immediates and are identified by value. Heap objects are
/// identified by their allocation, so structurally equal objects allocated
/// separately have different identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Identity {
    Smi(i32),
    Heap(usize),
}

impl Handle {
    pub fn identity(&self) -> Identity {
        match self {
            Handle::Smi(smi) => Identity::Smi(smi.value()),
            Handle::Heap(object) => Identity::Heap(Rc::as_ptr(object) as usize),
        }
    }

    pub fn is_identical_to(&self, other: &Handle) -> bool {
        self.identity() == other.identity()
    }

    pub fn as_smi(&self) -> Option<Smi> {
        match self {
            Handle::Smi(smi) => Some(*smi),
            Handle::Heap(_) => None,
        }
    }

    pub fn as_heap_object(&self) -> Option<&HeapObject> {
        match self {
            Handle::Smi(_) => None,
            Handle::Heap(object) => Some(object),
        }
    }

    pub fn as_heap_number(&self) -> Option<f64> {
        match self.as_heap_object() {
            Some(HeapObject::HeapNumber(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.as_heap_object() {
            Some(HeapObject::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_oddball(&self) -> Option<OddballKind> {
        match self.as_heap_object() {
            Some(HeapObject::Oddball(kind)) => Some(*kind),
            _ => None,
        }
    }

    pub fn is_oddball(&self) -> bool {
        self.as_oddball().is_some()
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Handle::Smi(_) => "Smi",
            Handle::Heap(object) => object.type_name(),
        }
    }
}

impl From<Smi> for Handle {
    fn from(smi: Smi) -> Self {
        Handle::Smi(smi)
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handle::Smi(smi) => write!(f, "Smi({})", smi.value()),
            Handle::Heap(object) => write!(f, "{:?}@{:#x}", object, Rc::as_ptr(object) as usize),
        }
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handle::Smi(smi) => write!(f, "{}", smi),
            Handle::Heap(object) => write!(f, "{}", object),
        }
    }
}

impl Serialize for Handle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Handle::Smi(smi) => serializer.serialize_newtype_variant("Handle", 0, "Smi", &smi.value()),
            Handle::Heap(object) => object.as_ref().serialize(serializer),
        }
    }
}
