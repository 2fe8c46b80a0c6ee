//! In-memory pool entries.
//!
//! An [`Entry`] pairs a structural hash with the tag-shaped payload in
//! [`EntryKind`]. Composite entries hold typed indices, never pointers to
//! other entries, so the whole pool stays a flat table. Utf8 entries can
//! be *symbolic*: interned from a descriptor object and keyed by object
//! identity, with the character content produced only when something
//! actually reads it.

use std::cell::OnceCell;
use std::sync::Arc;

use coffer_desc::{ClassDesc, MethodTypeDesc};
use coffer_utf::{non_zero_ascii_prefix, utf_len};

use crate::hash::{bool_hash, raw_hash2};
use crate::index::{ClassIdx, MemberIdx, NatIdx, Utf8Idx};
use crate::tag::{Tag, TAG_UNICODE};

/// A descriptor object a symbolic Utf8 entry was interned from.
#[derive(Debug, Clone)]
pub enum TypeSym {
    Class(Arc<ClassDesc>),
    MethodType(Arc<MethodTypeDesc>),
}

impl TypeSym {
    /// Hash of the `Arc` pointer itself. Two clones of one `Arc` hash
    /// alike; two value-equal descriptors behind distinct `Arc`s do not.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "the high word is folded into the low word before truncating"
    )]
    pub(crate) fn identity_hash(&self) -> u32 {
        let addr = match self {
            Self::Class(d) => Arc::as_ptr(d) as usize as u64,
            Self::MethodType(d) => Arc::as_ptr(d) as usize as u64,
        };
        (addr ^ (addr >> 32)) as u32
    }

    pub(crate) fn identity_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Class(a), Self::Class(b)) => Arc::ptr_eq(a, b),
            (Self::MethodType(a), Self::MethodType(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub(crate) fn descriptor(&self) -> &str {
        match self {
            Self::Class(d) => d.descriptor(),
            Self::MethodType(d) => d.descriptor(),
        }
    }

    pub(crate) fn descriptor_hash(&self) -> u32 {
        match self {
            Self::Class(d) => d.descriptor_hash(),
            Self::MethodType(d) => d.descriptor_hash(),
        }
    }
}

/// Hash for a symbolic Utf8 entry, keyed on identity plus the spelling
/// flag and discriminated by the retired tag byte.
pub(crate) fn symbol_hash(sym: &TypeSym, internal_name_like: bool) -> u32 {
    raw_hash2(TAG_UNICODE, sym.identity_hash(), bool_hash(internal_name_like))
}

#[derive(Debug)]
enum Utf8State {
    /// Character content known up front.
    Text(Box<str>),
    /// Content owed by a descriptor object. `internal_name_like` picks
    /// the internal-name spelling over the descriptor spelling when the
    /// symbol is a class or interface.
    Symbol {
        sym: TypeSym,
        internal_name_like: bool,
        text: OnceCell<Box<str>>,
    },
}

/// Payload of a Utf8 entry.
#[derive(Debug)]
pub struct Utf8Data {
    state: Utf8State,
    encoded: OnceCell<usize>,
}

impl Utf8Data {
    pub(crate) fn from_text(text: &str) -> Self {
        Self {
            state: Utf8State::Text(text.into()),
            encoded: OnceCell::new(),
        }
    }

    pub(crate) fn from_symbol(sym: TypeSym, internal_name_like: bool) -> Self {
        Self {
            state: Utf8State::Symbol {
                sym,
                internal_name_like,
                text: OnceCell::new(),
            },
            encoded: OnceCell::new(),
        }
    }

    /// The character content, materializing a symbolic entry on first use.
    pub fn text(&self) -> &str {
        match &self.state {
            Utf8State::Text(s) => s,
            Utf8State::Symbol {
                sym,
                internal_name_like,
                text,
            } => text.get_or_init(|| {
                if *internal_name_like {
                    if let TypeSym::Class(d) = sym {
                        if let Some(name) = d.internal_name() {
                            return name.into();
                        }
                    }
                }
                sym.descriptor().into()
            }),
        }
    }

    /// Modified-UTF-8 byte length of the content, computed once.
    pub fn encoded_len(&self) -> usize {
        *self.encoded.get_or_init(|| {
            let text = self.text();
            utf_len(text, non_zero_ascii_prefix(text))
        })
    }

    /// Whether this entry is symbolic and was interned from the same
    /// descriptor object with the same spelling flag. Never materializes.
    pub(crate) fn matches_symbol(&self, sym: &TypeSym, internal_name_like: bool) -> bool {
        match &self.state {
            Utf8State::Text(_) => false,
            Utf8State::Symbol {
                sym: own,
                internal_name_like: own_flag,
                ..
            } => *own_flag == internal_name_like && own.identity_eq(sym),
        }
    }
}

/// One constant-pool entry: its structural hash and tag-shaped payload.
#[derive(Debug)]
pub struct Entry {
    pub(crate) hash: u32,
    pub(crate) kind: EntryKind,
}

impl Entry {
    pub(crate) fn new(hash: u32, kind: EntryKind) -> Self {
        Self { hash, kind }
    }

    /// The structural hash all lookups key on.
    pub fn hash(&self) -> u32 {
        self.hash
    }

    pub fn kind(&self) -> &EntryKind {
        &self.kind
    }

    /// The wire tag this entry serializes under.
    pub fn tag(&self) -> Tag {
        match &self.kind {
            EntryKind::Utf8(_) => Tag::Utf8,
            EntryKind::Integer(_) => Tag::Integer,
            EntryKind::Float(_) => Tag::Float,
            EntryKind::Long(_) => Tag::Long,
            EntryKind::Double(_) => Tag::Double,
            EntryKind::Class { .. } => Tag::Class,
            EntryKind::Str { .. } => Tag::String,
            EntryKind::FieldRef { .. } => Tag::FieldRef,
            EntryKind::MethodRef { .. } => Tag::MethodRef,
            EntryKind::InterfaceMethodRef { .. } => Tag::InterfaceMethodRef,
            EntryKind::NameAndType { .. } => Tag::NameAndType,
            EntryKind::MethodHandle { .. } => Tag::MethodHandle,
            EntryKind::MethodType { .. } => Tag::MethodType,
            EntryKind::Dynamic { .. } => Tag::Dynamic,
            EntryKind::InvokeDynamic { .. } => Tag::InvokeDynamic,
            EntryKind::Module { .. } => Tag::Module,
            EntryKind::Package { .. } => Tag::Package,
        }
    }
}

/// Tag-shaped payload of an entry. Long and double entries occupy two
/// pool slots; the table records the second slot as a gap.
#[derive(Debug)]
pub enum EntryKind {
    Utf8(Utf8Data),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class { name: Utf8Idx },
    Str { utf8: Utf8Idx },
    FieldRef { owner: ClassIdx, name_and_type: NatIdx },
    MethodRef { owner: ClassIdx, name_and_type: NatIdx },
    InterfaceMethodRef { owner: ClassIdx, name_and_type: NatIdx },
    NameAndType { name: Utf8Idx, descriptor: Utf8Idx },
    MethodHandle { ref_kind: u8, member: MemberIdx },
    MethodType { descriptor: Utf8Idx },
    Dynamic { bootstrap: u16, name_and_type: NatIdx },
    InvokeDynamic { bootstrap: u16, name_and_type: NatIdx },
    Module { name: Utf8Idx },
    Package { name: Utf8Idx },
}

/// Bit pattern a float constant is keyed and written as. Every NaN maps
/// to the canonical quiet NaN so NaN payloads cannot split the entry.
pub(crate) fn float_bits(value: f32) -> u32 {
    if value.is_nan() {
        0x7fc0_0000
    } else {
        value.to_bits()
    }
}

/// Bit pattern a double constant is keyed and written as, with the same
/// NaN canonicalization as [`float_bits`].
pub(crate) fn double_bits(value: f64) -> u64 {
    if value.is_nan() {
        0x7ff8_0000_0000_0000
    } else {
        value.to_bits()
    }
}
