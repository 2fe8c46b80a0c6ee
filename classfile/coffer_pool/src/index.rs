//! Typed one-based indices into a constant pool.
//!
//! Each composite entry references its sub-entries by index. The newtypes
//! here record which tag family an index was assigned for, so a
//! `NameAndType` entry cannot be handed a string index by accident.
//! Index 0 is never assigned; the tables all start at 1.

macro_rules! pool_index {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u16);

        impl $name {
            pub(crate) fn new(raw: u16) -> Self {
                Self(raw)
            }

            /// The raw one-based pool index.
            pub fn raw(self) -> u16 {
                self.0
            }
        }
    };
}

pool_index! {
    /// Index of a `Utf8` entry.
    Utf8Idx
}

pool_index! {
    /// Index of a `Class` entry.
    ClassIdx
}

pool_index! {
    /// Index of a `NameAndType` entry.
    NatIdx
}

pool_index! {
    /// Index of a `FieldRef`, `MethodRef`, or `InterfaceMethodRef` entry.
    MemberIdx
}

pool_index! {
    /// Index of any pool entry, used where the tag family is not tracked.
    EntryIdx
}
