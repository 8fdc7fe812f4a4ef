//! Interpreter frame layout

use crate::register::Register;
use serde::{Deserialize, Serialize};

/// Per-architecture constants describing where parameters and registers live
/// relative to the register file pointer.
///
/// Parameters are pushed by the caller (receiver first) and sit directly above
/// the fixed frame header, so the last parameter's register index is the
/// negated size of that header in slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameLayout {
    /// Bytes per register slot
    pub slot_size: usize,

    /// Register index of the last parameter
    pub last_param_register_index: i32,
}

impl FrameLayout {
    /// 64-bit layout: 8-byte slots, five header slots between the parameters
    /// and the register file
    pub const X64: FrameLayout = FrameLayout {
        slot_size: 8,
        last_param_register_index: -5,
    };

    /// Register holding parameter `index` (0 is the receiver) of a function
    /// taking `parameter_count` parameters.
    pub fn parameter(&self, index: usize, parameter_count: usize) -> Register {
        assert!(
            index < parameter_count,
            "parameter {} out of range for {} parameters",
            index,
            parameter_count
        );
        Register::new(self.last_param_register_index - parameter_count as i32 + index as i32 + 1)
    }

    /// Check whether `index` addresses one of `parameter_count` parameters
    pub fn is_parameter_index(&self, index: i32, parameter_count: usize) -> bool {
        index <= self.last_param_register_index
            && index > self.last_param_register_index - parameter_count as i32
    }

    /// Frame size in bytes for `register_count` slots
    pub fn frame_size(&self, register_count: usize) -> usize {
        register_count * self.slot_size
    }
}

impl Default for FrameLayout {
    fn default() -> Self {
        Self::X64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receiver_is_most_negative() {
        let layout = FrameLayout::default();
        assert_eq!(layout.parameter(0, 1).index(), -5);
        assert_eq!(layout.parameter(0, 8).index(), -12);
        assert_eq!(layout.parameter(7, 8).index(), -5);
        assert_eq!(layout.parameter(4, 8).index(), -8);
    }

    #[test]
    fn test_parameter_range() {
        let layout = FrameLayout::default();
        assert!(layout.is_parameter_index(-5, 1));
        assert!(!layout.is_parameter_index(-6, 1));
        assert!(layout.is_parameter_index(-6, 2));
        assert!(!layout.is_parameter_index(-4, 2));
        assert!(!layout.is_parameter_index(-5, 0));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_parameter_past_count() {
        FrameLayout::default().parameter(2, 2);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let layout: FrameLayout = serde_json::from_str(r#"{"slot_size": 4}"#).unwrap();
        assert_eq!(layout.slot_size, 4);
        assert_eq!(layout.last_param_register_index, -5);
        assert_eq!(layout.frame_size(3), 12);
    }
}
