use std::fmt;

/// Error constructing a descriptor symbol.
///
/// Shape violations are caught here, at construction time; a descriptor
/// that constructs successfully is valid for the rest of its life.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescError {
    /// Not a valid field descriptor (bad letter, unterminated reference,
    /// over-deep array, `void` in a field position).
    InvalidFieldDescriptor { descriptor: String },
    /// Not a valid internal class name (empty segment, illegal character).
    InvalidInternalName { name: String },
    /// Not a valid method descriptor.
    InvalidMethodDescriptor { descriptor: String },
    /// Not a valid unqualified member name.
    InvalidMemberName { name: String },
    /// A method-handle owner must be a class or interface type.
    NotClassOrInterface { descriptor: String },
    /// A field accessor kind was given a method type of the wrong shape.
    BadFieldAccessor { expected: String, found: String },
    /// A constructor kind was given a non-`void` return type.
    NonVoidConstructor { descriptor: String },
    /// `drop_first_parameter` on a method type with no parameters.
    NoLeadingParameter { descriptor: String },
}

impl fmt::Display for DescError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescError::InvalidFieldDescriptor { descriptor } => {
                write!(f, "not a valid field type descriptor: {descriptor}")
            }
            DescError::InvalidInternalName { name } => {
                write!(f, "not a valid internal class name: {name}")
            }
            DescError::InvalidMethodDescriptor { descriptor } => {
                write!(f, "not a valid method descriptor: {descriptor}")
            }
            DescError::InvalidMemberName { name } => {
                write!(f, "not a valid unqualified member name: {name}")
            }
            DescError::NotClassOrInterface { descriptor } => {
                write!(f, "owner must be a class or interface type: {descriptor}")
            }
            DescError::BadFieldAccessor { expected, found } => {
                write!(f, "expected type of {expected} for field accessor, found {found}")
            }
            DescError::NonVoidConstructor { descriptor } => {
                write!(f, "expected type of (T*)V for constructor, found {descriptor}")
            }
            DescError::NoLeadingParameter { descriptor } => {
                write!(f, "method type has no leading parameter to drop: {descriptor}")
            }
        }
    }
}

impl std::error::Error for DescError {}
