//! Errors raised while building or serializing a constant pool.

use std::error::Error;
use std::fmt;

use coffer_desc::DescError;

/// Failure while interning into or writing out a [`crate::ConstantPool`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// A `Class` entry was requested for a primitive descriptor.
    PrimitiveClassEntry { descriptor: String },
    /// Appending would push the pool past the 65535-slot class-file limit.
    PoolOverflow { size: u16 },
    /// A Utf8 entry encodes to more bytes than its u16 length prefix can hold.
    Utf8TooLong { len: usize },
    /// A referenced index does not resolve to an entry of the required tag.
    BadIndex { index: u16 },
    /// A descriptor handed to an interning operation failed validation.
    Desc(DescError),
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrimitiveClassEntry { descriptor } => {
                write!(f, "cannot represent {descriptor} as a class entry")
            }
            Self::PoolOverflow { size } => {
                write!(f, "constant pool full at {size} slots")
            }
            Self::Utf8TooLong { len } => {
                write!(f, "utf8 constant of {len} bytes exceeds the 65535-byte limit")
            }
            Self::BadIndex { index } => {
                write!(f, "index {index} does not resolve to a compatible entry")
            }
            Self::Desc(e) => write!(f, "{e}"),
        }
    }
}

impl Error for PoolError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Desc(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DescError> for PoolError {
    fn from(e: DescError) -> Self {
        Self::Desc(e)
    }
}
