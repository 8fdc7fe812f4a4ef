//! Boxed and unboxed values produced by the object model

use crate::handle::Handle;
use serde::Serialize;
use std::fmt;

/// Small integer carried unboxed in a tagged word.
///
/// A Smi is an immediate: two Smis with the same value are the same object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Smi(i32);

impl Smi {
    pub const MIN_VALUE: i32 = i32::MIN;
    pub const MAX_VALUE: i32 = i32::MAX;

    pub const fn from_int(value: i32) -> Self {
        Smi(value)
    }

    pub const fn value(self) -> i32 {
        self.0
    }

    /// Check whether a wider integer fits in a Smi
    pub fn is_valid(value: i64) -> bool {
        value >= Self::MIN_VALUE as i64 && value <= Self::MAX_VALUE as i64
    }
}

impl From<i32> for Smi {
    fn from(value: i32) -> Self {
        Smi(value)
    }
}

impl fmt::Display for Smi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Singleton values with their own load bytecodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OddballKind {
    Undefined,
    Null,
    TheHole,
    True,
    False,
}

impl OddballKind {
    pub fn name(self) -> &'static str {
        match self {
            OddballKind::Undefined => "undefined",
            OddballKind::Null => "null",
            OddballKind::TheHole => "the_hole",
            OddballKind::True => "true",
            OddballKind::False => "false",
        }
    }
}

/// A value that lives behind a handle
#[derive(Debug, Clone, Serialize)]
pub enum HeapObject {
    /// Boxed double (or an integer outside Smi range)
    HeapNumber(f64),
    String(Box<str>),
    Oddball(OddballKind),
    /// General boxed object: an ordered array of handles
    FixedArray(Vec<Handle>),
}

impl HeapObject {
    pub fn type_name(&self) -> &'static str {
        match self {
            HeapObject::HeapNumber(_) => "HeapNumber",
            HeapObject::String(_) => "String",
            HeapObject::Oddball(_) => "Oddball",
            HeapObject::FixedArray(_) => "FixedArray",
        }
    }
}

impl fmt::Display for HeapObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapObject::HeapNumber(n) => write!(f, "{}", n),
            HeapObject::String(s) => write!(f, "{:?}", s),
            HeapObject::Oddball(kind) => write!(f, "{}", kind.name()),
            HeapObject::FixedArray(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}
