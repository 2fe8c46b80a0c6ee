//! Constant-pool tag bytes as defined by JVMS table 4.4-B.

/// Tag byte identifying the shape of a constant-pool entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tag {
    Utf8 = 1,
    Integer = 3,
    Float = 4,
    Long = 5,
    Double = 6,
    Class = 7,
    String = 8,
    FieldRef = 9,
    MethodRef = 10,
    InterfaceMethodRef = 11,
    NameAndType = 12,
    MethodHandle = 15,
    MethodType = 16,
    Dynamic = 17,
    InvokeDynamic = 18,
    Module = 19,
    Package = 20,
}

/// Tag 2 was retired before JDK 1.0 shipped and can never appear in a
/// class file. It is reused here as the hash discriminator for
/// identity-keyed symbolic Utf8 entries, which keeps their hashes
/// disjoint from every content-hashed entry.
pub(crate) const TAG_UNICODE: u8 = 2;

impl Tag {
    /// The wire byte for this tag.
    pub fn raw(self) -> u8 {
        self as u8
    }

    /// Maps a wire byte back to a tag, or `None` for bytes no class-file
    /// version defines.
    pub fn from_raw(byte: u8) -> Option<Self> {
        Some(match byte {
            1 => Self::Utf8,
            3 => Self::Integer,
            4 => Self::Float,
            5 => Self::Long,
            6 => Self::Double,
            7 => Self::Class,
            8 => Self::String,
            9 => Self::FieldRef,
            10 => Self::MethodRef,
            11 => Self::InterfaceMethodRef,
            12 => Self::NameAndType,
            15 => Self::MethodHandle,
            16 => Self::MethodType,
            17 => Self::Dynamic,
            18 => Self::InvokeDynamic,
            19 => Self::Module,
            20 => Self::Package,
            _ => return None,
        })
    }

    /// Long and double constants take two pool slots.
    pub fn is_wide(self) -> bool {
        matches!(self, Self::Long | Self::Double)
    }
}
