//! Parsing the constant-pool region of a class file.
//!
//! [`parse_pool`] reads the `constant_pool_count` and every entry after
//! it, validates that all cross-references resolve to entries of the
//! required tag, and seeds the structural hashes in dependency order so
//! the result can back a derived [`crate::ConstantPool`]. The raw bytes
//! of the entry region are kept so a derived pool re-emits them as-is.

use std::error::Error;
use std::fmt;

use coffer_utf::UtfError;
use tracing::debug;

use crate::entry::{double_bits, float_bits, Entry, EntryKind, Utf8Data};
use crate::hash::{fold64, hash1, hash2, string_hash};
use crate::index::{ClassIdx, MemberIdx, NatIdx, Utf8Idx};
use crate::tag::Tag;

/// Failure while parsing a constant-pool region. Offsets are byte
/// positions into the parsed input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// Input ended inside an entry.
    Truncated { offset: usize },
    /// A tag byte no class-file version defines.
    BadTag { tag: u8, offset: usize },
    /// A method-handle reference kind outside `1..=9`.
    BadRefKind { kind: u8, offset: usize },
    /// A `constant_pool_count` of zero, or one the entries overrun.
    BadCount,
    /// A cross-reference that does not resolve to an entry of the
    /// required tag.
    BadIndex { index: u16 },
    /// A Utf8 entry whose bytes are not well-formed modified UTF-8.
    Utf(UtfError),
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated { offset } => write!(f, "input truncated at byte {offset}"),
            Self::BadTag { tag, offset } => {
                write!(f, "unknown constant tag {tag} at byte {offset}")
            }
            Self::BadRefKind { kind, offset } => {
                write!(f, "invalid method handle kind {kind} at byte {offset}")
            }
            Self::BadCount => write!(f, "constant pool count does not match its entries"),
            Self::BadIndex { index } => {
                write!(f, "index {index} does not resolve to a compatible entry")
            }
            Self::Utf(e) => write!(f, "{e}"),
        }
    }
}

impl Error for ReadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Utf(e) => Some(e),
            _ => None,
        }
    }
}

impl From<UtfError> for ReadError {
    fn from(e: UtfError) -> Self {
        Self::Utf(e)
    }
}

/// A fully parsed and validated constant-pool region.
#[derive(Debug)]
pub struct ParsedPool {
    /// Slot table for indices `1..size`; `None` slots are the second
    /// half of a long or double entry.
    entries: Vec<Option<Entry>>,
    /// The entry region exactly as it appeared on the wire, without the
    /// two count bytes.
    raw: Box<[u8]>,
    size: u16,
    consumed: usize,
}

impl ParsedPool {
    /// The `constant_pool_count` this region was declared with.
    pub fn size(&self) -> u16 {
        self.size
    }

    /// Bytes consumed from the input, count included.
    pub fn byte_len(&self) -> usize {
        self.consumed
    }

    /// The entry at a one-based index.
    pub fn entry(&self, index: u16) -> Option<&Entry> {
        if index == 0 {
            return None;
        }
        self.entries.get(usize::from(index) - 1)?.as_ref()
    }

    pub(crate) fn into_parts(self) -> (Vec<Option<Entry>>, Box<[u8]>, u16) {
        (self.entries, self.raw, self.size)
    }
}

struct ByteReader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> ByteReader<'a> {
    fn u1(&mut self) -> Result<u8, ReadError> {
        let byte = *self
            .bytes
            .get(self.position)
            .ok_or(ReadError::Truncated { offset: self.position })?;
        self.position += 1;
        Ok(byte)
    }

    fn u2(&mut self) -> Result<u16, ReadError> {
        Ok(u16::from_be_bytes([self.u1()?, self.u1()?]))
    }

    fn u4(&mut self) -> Result<u32, ReadError> {
        Ok(u32::from_be_bytes([
            self.u1()?,
            self.u1()?,
            self.u1()?,
            self.u1()?,
        ]))
    }

    fn u8(&mut self) -> Result<u64, ReadError> {
        Ok((u64::from(self.u4()?) << 32) | u64::from(self.u4()?))
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], ReadError> {
        let end = self.position + len;
        let slice = self
            .bytes
            .get(self.position..end)
            .ok_or(ReadError::Truncated { offset: self.bytes.len() })?;
        self.position = end;
        Ok(slice)
    }
}

/// Parses the constant-pool region at the start of `bytes`. Trailing
/// bytes past the last entry are left untouched; [`ParsedPool::byte_len`]
/// reports where the region ended.
pub fn parse_pool(bytes: &[u8]) -> Result<ParsedPool, ReadError> {
    let mut reader = ByteReader { bytes, position: 0 };
    let size = reader.u2()?;
    if size == 0 {
        return Err(ReadError::BadCount);
    }
    let mut entries: Vec<Option<Entry>> = Vec::with_capacity(usize::from(size) - 1);
    let mut index: u16 = 1;
    while index < size {
        let tag_offset = reader.position;
        let tag_byte = reader.u1()?;
        let tag = Tag::from_raw(tag_byte).ok_or(ReadError::BadTag {
            tag: tag_byte,
            offset: tag_offset,
        })?;
        if tag.is_wide() && index + 1 >= size {
            return Err(ReadError::BadCount);
        }
        let kind = read_entry(&mut reader, tag)?;
        entries.push(Some(Entry::new(0, kind)));
        if tag.is_wide() {
            entries.push(None);
            index += 2;
        } else {
            index += 1;
        }
    }
    let consumed = reader.position;
    seed_hashes(&mut entries)?;
    debug!(size, consumed, "parsed constant pool");
    Ok(ParsedPool {
        entries,
        raw: bytes[2..consumed].into(),
        size,
        consumed,
    })
}

#[expect(
    clippy::cast_possible_wrap,
    reason = "literal entries reinterpret the wire bits as signed values"
)]
fn read_entry(reader: &mut ByteReader<'_>, tag: Tag) -> Result<EntryKind, ReadError> {
    Ok(match tag {
        Tag::Utf8 => {
            let len = usize::from(reader.u2()?);
            let start = reader.position;
            let bytes = reader.take(len)?;
            let text = coffer_utf::decode(bytes).map_err(|e| e.with_base_offset(start))?;
            EntryKind::Utf8(Utf8Data::from_text(&text))
        }
        Tag::Integer => EntryKind::Integer(reader.u4()? as i32),
        Tag::Float => EntryKind::Float(f32::from_bits(reader.u4()?)),
        Tag::Long => EntryKind::Long(reader.u8()? as i64),
        Tag::Double => EntryKind::Double(f64::from_bits(reader.u8()?)),
        Tag::Class => EntryKind::Class {
            name: Utf8Idx::new(reader.u2()?),
        },
        Tag::String => EntryKind::Str {
            utf8: Utf8Idx::new(reader.u2()?),
        },
        Tag::FieldRef => EntryKind::FieldRef {
            owner: ClassIdx::new(reader.u2()?),
            name_and_type: NatIdx::new(reader.u2()?),
        },
        Tag::MethodRef => EntryKind::MethodRef {
            owner: ClassIdx::new(reader.u2()?),
            name_and_type: NatIdx::new(reader.u2()?),
        },
        Tag::InterfaceMethodRef => EntryKind::InterfaceMethodRef {
            owner: ClassIdx::new(reader.u2()?),
            name_and_type: NatIdx::new(reader.u2()?),
        },
        Tag::NameAndType => EntryKind::NameAndType {
            name: Utf8Idx::new(reader.u2()?),
            descriptor: Utf8Idx::new(reader.u2()?),
        },
        Tag::MethodHandle => {
            let offset = reader.position;
            let ref_kind = reader.u1()?;
            if !(1..=9).contains(&ref_kind) {
                return Err(ReadError::BadRefKind {
                    kind: ref_kind,
                    offset,
                });
            }
            EntryKind::MethodHandle {
                ref_kind,
                member: MemberIdx::new(reader.u2()?),
            }
        }
        Tag::MethodType => EntryKind::MethodType {
            descriptor: Utf8Idx::new(reader.u2()?),
        },
        Tag::Dynamic => EntryKind::Dynamic {
            bootstrap: reader.u2()?,
            name_and_type: NatIdx::new(reader.u2()?),
        },
        Tag::InvokeDynamic => EntryKind::InvokeDynamic {
            bootstrap: reader.u2()?,
            name_and_type: NatIdx::new(reader.u2()?),
        },
        Tag::Module => EntryKind::Module {
            name: Utf8Idx::new(reader.u2()?),
        },
        Tag::Package => EntryKind::Package {
            name: Utf8Idx::new(reader.u2()?),
        },
    })
}

/// Hash of the already-seeded entry at `index`, required to carry `tag`.
/// Cross-references may point forward, so hashes are seeded in passes by
/// dependency depth and each pass only reads entries a previous pass
/// finished.
fn child_hash(entries: &[Option<Entry>], index: u16, wanted: &[Tag]) -> Result<u32, ReadError> {
    let entry = (index > 0)
        .then(|| entries.get(usize::from(index) - 1))
        .flatten()
        .and_then(Option::as_ref)
        .filter(|e| wanted.contains(&e.tag()))
        .ok_or(ReadError::BadIndex { index })?;
    Ok(entry.hash())
}

#[expect(
    clippy::cast_sign_loss,
    reason = "literal hashes key on the raw bit pattern"
)]
fn seed_hashes(entries: &mut [Option<Entry>]) -> Result<(), ReadError> {
    const MEMBER_TAGS: [Tag; 3] = [Tag::FieldRef, Tag::MethodRef, Tag::InterfaceMethodRef];

    // Pass 1: entries with no cross-references.
    for entry in entries.iter_mut().flatten() {
        entry.hash = match &entry.kind {
            EntryKind::Utf8(data) => hash1(Tag::Utf8, string_hash(data.text())),
            EntryKind::Integer(v) => hash1(Tag::Integer, *v as u32),
            EntryKind::Float(v) => hash1(Tag::Float, float_bits(*v)),
            EntryKind::Long(v) => hash1(Tag::Long, fold64(*v as u64)),
            EntryKind::Double(v) => hash1(Tag::Double, fold64(double_bits(*v))),
            _ => 0,
        };
    }

    // Pass 2: entries referencing only Utf8.
    for slot in 0..entries.len() {
        let hash = match entries[slot].as_ref().map(Entry::kind) {
            Some(EntryKind::Class { name }) => {
                hash1(Tag::Class, child_hash(entries, name.raw(), &[Tag::Utf8])?)
            }
            Some(EntryKind::Str { utf8 }) => {
                hash1(Tag::String, child_hash(entries, utf8.raw(), &[Tag::Utf8])?)
            }
            Some(EntryKind::MethodType { descriptor }) => hash1(
                Tag::MethodType,
                child_hash(entries, descriptor.raw(), &[Tag::Utf8])?,
            ),
            Some(EntryKind::Module { name }) => {
                hash1(Tag::Module, child_hash(entries, name.raw(), &[Tag::Utf8])?)
            }
            Some(EntryKind::Package { name }) => {
                hash1(Tag::Package, child_hash(entries, name.raw(), &[Tag::Utf8])?)
            }
            Some(EntryKind::NameAndType { name, descriptor }) => hash2(
                Tag::NameAndType,
                child_hash(entries, name.raw(), &[Tag::Utf8])?,
                child_hash(entries, descriptor.raw(), &[Tag::Utf8])?,
            ),
            _ => continue,
        };
        if let Some(entry) = entries[slot].as_mut() {
            entry.hash = hash;
        }
    }

    // Pass 3: member refs and dynamic entries.
    for slot in 0..entries.len() {
        let hash = match entries[slot].as_ref().map(Entry::kind) {
            Some(
                EntryKind::FieldRef { owner, name_and_type }
                | EntryKind::MethodRef { owner, name_and_type }
                | EntryKind::InterfaceMethodRef { owner, name_and_type },
            ) => {
                let tag = match entries[slot].as_ref().map(Entry::tag) {
                    Some(t) => t,
                    None => continue,
                };
                hash2(
                    tag,
                    child_hash(entries, owner.raw(), &[Tag::Class])?,
                    child_hash(entries, name_and_type.raw(), &[Tag::NameAndType])?,
                )
            }
            Some(
                EntryKind::Dynamic { bootstrap, name_and_type }
                | EntryKind::InvokeDynamic { bootstrap, name_and_type },
            ) => {
                let tag = match entries[slot].as_ref().map(Entry::tag) {
                    Some(t) => t,
                    None => continue,
                };
                hash2(
                    tag,
                    u32::from(*bootstrap),
                    child_hash(entries, name_and_type.raw(), &[Tag::NameAndType])?,
                )
            }
            _ => continue,
        };
        if let Some(entry) = entries[slot].as_mut() {
            entry.hash = hash;
        }
    }

    // Pass 4: method handles, whose member refs now carry hashes.
    for slot in 0..entries.len() {
        let hash = match entries[slot].as_ref().map(Entry::kind) {
            Some(EntryKind::MethodHandle { ref_kind, member }) => hash2(
                Tag::MethodHandle,
                u32::from(*ref_kind),
                child_hash(entries, member.raw(), &MEMBER_TAGS)?,
            ),
            _ => continue,
        };
        if let Some(entry) = entries[slot].as_mut() {
            entry.hash = hash;
        }
    }

    Ok(())
}
