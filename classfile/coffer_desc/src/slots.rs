//! Local-variable slot arithmetic.
//!
//! `long` and `double` occupy two slots, `void` none, everything else one;
//! instance methods reserve slot 0 for the receiver. Attribute builders
//! size `max_locals` and per-parameter offsets from these numbers.

use crate::{ClassDesc, MethodTypeDesc};

/// Slots one value of this type occupies.
pub fn slot_size(desc: &ClassDesc) -> u32 {
    match desc.descriptor().as_bytes().first() {
        Some(b'V') => 0,
        Some(b'D' | b'J') => 2,
        _ => 1,
    }
}

/// Total slots taken by a method's parameters (receiver excluded).
pub fn parameter_slots(desc: &MethodTypeDesc) -> u32 {
    desc.parameters().iter().map(slot_size).sum()
}

/// Slot offset of each parameter, with slot 0 reserved for the receiver
/// of instance methods.
pub fn parameter_slot_offsets(is_static: bool, desc: &MethodTypeDesc) -> Vec<u32> {
    let mut count = u32::from(!is_static);
    desc.parameters()
        .iter()
        .map(|p| {
            let at = count;
            count += slot_size(p);
            at
        })
        .collect()
}

/// Slots a frame needs for the receiver plus all parameters.
pub fn max_locals(is_static: bool, desc: &MethodTypeDesc) -> u32 {
    u32::from(!is_static) + parameter_slots(desc)
}
