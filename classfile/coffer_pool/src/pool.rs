//! The split constant pool.
//!
//! A pool is either fresh or derived from a parsed class file. A derived
//! pool keeps the parsed entries as an immutable *parent* range together
//! with the raw bytes they came from, so writing re-emits the parent
//! verbatim. All interning appends into a separate *patch* range that
//! starts where the parent ends. Indices are one-based throughout and
//! long or double entries leave a gap in the slot after them.
//!
//! Every operation returns the index of an existing equal entry when one
//! is present, so equal constants are pooled exactly once. Plain entries
//! match by content; symbolic Utf8 entries match by descriptor-object
//! identity, falling back to a content match against the parent range so
//! a derived pool reuses constants the class file already carries.
//! Symbolic entries stay visible to the content-based operations, so a
//! class interned from a descriptor object and one interned by internal
//! name converge on the same entries.

use std::sync::Arc;

use coffer_desc::{ClassDesc, DescError, DirectMethodHandleDesc, MethodHandleKind, MethodTypeDesc};
use coffer_utf::{non_zero_ascii_prefix, utf_len};
use tracing::{debug, trace};

use crate::entry::{double_bits, float_bits, symbol_hash, Entry, EntryKind, TypeSym, Utf8Data};
use crate::error::PoolError;
use crate::hash::{
    descriptor_hash_of_name, fold64, hash1, hash2, internal_name_hash, string_hash, utf16_len,
};
use crate::index::{ClassIdx, EntryIdx, MemberIdx, NatIdx, Utf8Idx};
use crate::map::EntryMap;
use crate::reader::ParsedPool;
use crate::tag::Tag;

pub(crate) struct ParentPool {
    pub(crate) entries: Vec<Option<Entry>>,
    pub(crate) raw: Box<[u8]>,
    map: EntryMap,
}

/// A class-file constant pool under construction.
pub struct ConstantPool {
    pub(crate) parent: Option<ParentPool>,
    /// Patch range, starting at index `base()`. `None` slots are the
    /// second half of a long or double entry.
    pub(crate) entries: Vec<Option<Entry>>,
    map: EntryMap,
    size: u16,
}

impl Default for ConstantPool {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstantPool {
    /// An empty pool. Index 0 is reserved, so the first entry lands at 1.
    pub fn new() -> Self {
        Self {
            parent: None,
            entries: Vec::new(),
            map: EntryMap::new(),
            size: 1,
        }
    }

    /// A pool seeded from a parsed class file. The parsed entries become
    /// the immutable parent range and interning continues after them.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "parsing bounds the entry count by the u16 pool count"
    )]
    pub fn derived(parsed: ParsedPool) -> Self {
        let (entries, raw, size) = parsed.into_parts();
        let mut map = EntryMap::with_capacity(entries.len());
        for (slot, entry) in entries.iter().enumerate() {
            if let Some(e) = entry {
                map.insert(e.hash(), (slot + 1) as u16);
            }
        }
        debug!(size, "seeded derived pool");
        Self {
            parent: Some(ParentPool { entries, raw, map }),
            entries: Vec::new(),
            map: EntryMap::new(),
            size,
        }
    }

    /// Number of pool slots, counting the reserved slot 0 and the gaps
    /// after wide entries. This is the `constant_pool_count` written out.
    pub fn size(&self) -> u16 {
        self.size
    }

    pub fn is_derived(&self) -> bool {
        self.parent.is_some()
    }

    /// First index of the patch range.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "parsing bounds the parent length by the u16 pool count"
    )]
    fn base(&self) -> u16 {
        match &self.parent {
            Some(p) => p.entries.len() as u16 + 1,
            None => 1,
        }
    }

    /// The entry at a one-based index, or `None` for index 0, the gap
    /// after a wide entry, and anything out of range.
    pub fn entry(&self, index: u16) -> Option<&Entry> {
        if index == 0 || index >= self.size {
            return None;
        }
        let base = self.base();
        if index < base {
            self.parent.as_ref()?.entries[usize::from(index) - 1].as_ref()
        } else {
            self.entries[usize::from(index - base)].as_ref()
        }
    }

    /// Content of a Utf8 entry, materializing a symbolic one.
    pub fn utf8_text(&self, index: Utf8Idx) -> Option<&str> {
        match self.entry(index.raw())?.kind() {
            EntryKind::Utf8(data) => Some(data.text()),
            _ => None,
        }
    }

    // ---- lookup and append ----------------------------------------------

    fn find_parent(&self, hash: u32, matches: impl Fn(&Entry) -> bool) -> Option<u16> {
        let parent = self.parent.as_ref()?;
        let mut token = parent.map.first_token(hash);
        while let Some(t) = token {
            let index = parent.map.index_at(t);
            let slot = parent.entries.get(usize::from(index) - 1);
            if let Some(entry) = slot.and_then(Option::as_ref) {
                if matches(entry) {
                    return Some(index);
                }
            }
            token = parent.map.next_token(hash, t);
        }
        None
    }

    fn find_patch(&self, hash: u32, matches: impl Fn(&Entry) -> bool) -> Option<u16> {
        let base = self.base();
        let mut token = self.map.first_token(hash);
        while let Some(t) = token {
            let index = self.map.index_at(t);
            let slot = self.entries.get(usize::from(index - base));
            if let Some(entry) = slot.and_then(Option::as_ref) {
                if matches(entry) {
                    return Some(index);
                }
            }
            token = self.map.next_token(hash, t);
        }
        None
    }

    fn find(&self, hash: u32, matches: impl Fn(&Entry) -> bool) -> Option<u16> {
        if let Some(index) = self.find_parent(hash, &matches) {
            return Some(index);
        }
        self.find_patch(hash, matches)
    }

    fn append(&mut self, entry: Entry, wide: bool) -> Result<u16, PoolError> {
        let needed: u16 = if wide { 2 } else { 1 };
        if u32::from(self.size) + u32::from(needed) > u32::from(u16::MAX) {
            return Err(PoolError::PoolOverflow { size: self.size });
        }
        let index = self.size;
        let hash = entry.hash();
        trace!(index, tag = ?entry.tag(), "appended pool entry");
        self.entries.push(Some(entry));
        if wide {
            self.entries.push(None);
        }
        self.size += needed;
        self.map.insert(hash, index);
        Ok(index)
    }

    // ---- tag-checked sub-entry hashes -----------------------------------

    fn utf8_hash(&self, index: Utf8Idx) -> Result<u32, PoolError> {
        match self.entry(index.raw()) {
            Some(e) if matches!(e.kind(), EntryKind::Utf8(_)) => Ok(e.hash()),
            _ => Err(PoolError::BadIndex { index: index.raw() }),
        }
    }

    fn class_hash(&self, index: ClassIdx) -> Result<u32, PoolError> {
        match self.entry(index.raw()) {
            Some(e) if matches!(e.kind(), EntryKind::Class { .. }) => Ok(e.hash()),
            _ => Err(PoolError::BadIndex { index: index.raw() }),
        }
    }

    fn nat_hash(&self, index: NatIdx) -> Result<u32, PoolError> {
        match self.entry(index.raw()) {
            Some(e) if matches!(e.kind(), EntryKind::NameAndType { .. }) => Ok(e.hash()),
            _ => Err(PoolError::BadIndex { index: index.raw() }),
        }
    }

    fn member_hash(&self, index: MemberIdx) -> Result<u32, PoolError> {
        let compatible = self.entry(index.raw()).filter(|e| {
            matches!(
                e.kind(),
                EntryKind::FieldRef { .. }
                    | EntryKind::MethodRef { .. }
                    | EntryKind::InterfaceMethodRef { .. }
            )
        });
        match compatible {
            Some(e) => Ok(e.hash()),
            None => Err(PoolError::BadIndex { index: index.raw() }),
        }
    }

    // ---- Utf8 ------------------------------------------------------------

    /// Interns a Utf8 entry by content.
    pub fn intern_utf8(&mut self, text: &str) -> Result<Utf8Idx, PoolError> {
        let hash = hash1(Tag::Utf8, string_hash(text));
        if let Some(index) = self.find(hash, |e| {
            matches!(e.kind(), EntryKind::Utf8(d) if d.text() == text)
        }) {
            return Ok(Utf8Idx::new(index));
        }
        let data = Utf8Data::from_text(text);
        if data.encoded_len() > usize::from(u16::MAX) {
            return Err(PoolError::Utf8TooLong {
                len: data.encoded_len(),
            });
        }
        let index = self.append(Entry::new(hash, EntryKind::Utf8(data)), false)?;
        Ok(Utf8Idx::new(index))
    }

    /// Interns a Utf8 entry owed by a descriptor object, matched by
    /// object identity plus the spelling flag. With `internal_name_like`
    /// set, a class-or-interface symbol materializes as its internal name
    /// rather than its descriptor.
    ///
    /// In a derived pool the parent range is also searched by content,
    /// through the hash correlation, so the parsed class file's own
    /// constants are reused without building any text. A freshly appended
    /// entry is indexed under its content hash as well as its identity
    /// hash, so the content-based operations find it later.
    pub fn intern_symbol_utf8(
        &mut self,
        sym: &TypeSym,
        internal_name_like: bool,
    ) -> Result<Utf8Idx, PoolError> {
        let id_hash = symbol_hash(sym, internal_name_like);
        if let Some(index) = self.find_patch(id_hash, |e| {
            matches!(e.kind(), EntryKind::Utf8(d) if d.matches_symbol(sym, internal_name_like))
        }) {
            return Ok(Utf8Idx::new(index));
        }
        // The spelling the entry will materialize as, without building it.
        let (content_hash, text) = match sym {
            TypeSym::Class(d) if internal_name_like => match d.internal_name() {
                Some(name) => {
                    let units = utf16_len(d.descriptor());
                    (internal_name_hash(d.descriptor_hash(), units), name)
                }
                None => (sym.descriptor_hash(), sym.descriptor()),
            },
            _ => (sym.descriptor_hash(), sym.descriptor()),
        };
        let content_hash = hash1(Tag::Utf8, content_hash);
        if self.parent.is_some() {
            if let Some(index) = self.find_parent(content_hash, |e| {
                matches!(e.kind(), EntryKind::Utf8(d) if d.text() == text)
            }) {
                return Ok(Utf8Idx::new(index));
            }
        }
        let encoded = utf_len(text, non_zero_ascii_prefix(text));
        if encoded > usize::from(u16::MAX) {
            return Err(PoolError::Utf8TooLong { len: encoded });
        }
        let data = Utf8Data::from_symbol(sym.clone(), internal_name_like);
        let index = self.append(Entry::new(id_hash, EntryKind::Utf8(data)), false)?;
        self.map.insert(content_hash, index);
        Ok(Utf8Idx::new(index))
    }

    // ---- Class -----------------------------------------------------------

    /// Interns a `Class` entry for a reference type. Primitives have no
    /// class entry and are rejected.
    pub fn intern_class(&mut self, desc: &Arc<ClassDesc>) -> Result<ClassIdx, PoolError> {
        if desc.is_primitive() {
            return Err(PoolError::PrimitiveClassEntry {
                descriptor: desc.descriptor().to_owned(),
            });
        }
        let name = self.intern_symbol_utf8(&TypeSym::Class(Arc::clone(desc)), false)?;
        self.class_of_utf8(name)
    }

    /// Interns a `Class` entry from an internal name, locating an
    /// existing `L{name};` Utf8 entry through the hash correlation and
    /// building the descriptor text only when none is present.
    pub fn intern_class_by_name(&mut self, internal_name: &str) -> Result<ClassIdx, PoolError> {
        let descriptor_hash =
            descriptor_hash_of_name(string_hash(internal_name), utf16_len(internal_name));
        let hash = hash1(Tag::Utf8, descriptor_hash);
        let found = self.find(hash, |e| {
            matches!(e.kind(), EntryKind::Utf8(d) if {
                let inner = d.text().strip_prefix('L').and_then(|t| t.strip_suffix(';'));
                inner == Some(internal_name)
            })
        });
        let name = match found {
            Some(index) => Utf8Idx::new(index),
            None => {
                let desc = ClassDesc::of_internal_name(internal_name)?;
                let data = Utf8Data::from_text(desc.descriptor());
                if data.encoded_len() > usize::from(u16::MAX) {
                    return Err(PoolError::Utf8TooLong {
                        len: data.encoded_len(),
                    });
                }
                Utf8Idx::new(self.append(Entry::new(hash, EntryKind::Utf8(data)), false)?)
            }
        };
        self.class_of_utf8(name)
    }

    /// Interns a `Class` entry over an already interned name.
    pub fn class_of_utf8(&mut self, name: Utf8Idx) -> Result<ClassIdx, PoolError> {
        let hash = hash1(Tag::Class, self.utf8_hash(name)?);
        if let Some(index) = self.find(hash, |e| {
            matches!(e.kind(), EntryKind::Class { name: n } if *n == name)
        }) {
            return Ok(ClassIdx::new(index));
        }
        let index = self.append(Entry::new(hash, EntryKind::Class { name }), false)?;
        Ok(ClassIdx::new(index))
    }

    // ---- loadable literals ----------------------------------------------

    /// Interns a `String` entry and its Utf8 content.
    pub fn intern_string(&mut self, text: &str) -> Result<EntryIdx, PoolError> {
        let utf8 = self.intern_utf8(text)?;
        let hash = hash1(Tag::String, self.utf8_hash(utf8)?);
        if let Some(index) = self.find(hash, |e| {
            matches!(e.kind(), EntryKind::Str { utf8: u } if *u == utf8)
        }) {
            return Ok(EntryIdx::new(index));
        }
        let index = self.append(Entry::new(hash, EntryKind::Str { utf8 }), false)?;
        Ok(EntryIdx::new(index))
    }

    pub fn intern_int(&mut self, value: i32) -> Result<EntryIdx, PoolError> {
        #[expect(clippy::cast_sign_loss, reason = "the hash keys on the raw bit pattern")]
        let hash = hash1(Tag::Integer, value as u32);
        if let Some(index) = self.find(hash, |e| {
            matches!(e.kind(), EntryKind::Integer(v) if *v == value)
        }) {
            return Ok(EntryIdx::new(index));
        }
        let index = self.append(Entry::new(hash, EntryKind::Integer(value)), false)?;
        Ok(EntryIdx::new(index))
    }

    /// Interns a `Long` entry, which takes two pool slots.
    pub fn intern_long(&mut self, value: i64) -> Result<EntryIdx, PoolError> {
        #[expect(clippy::cast_sign_loss, reason = "the hash keys on the raw bit pattern")]
        let hash = hash1(Tag::Long, fold64(value as u64));
        if let Some(index) = self.find(hash, |e| {
            matches!(e.kind(), EntryKind::Long(v) if *v == value)
        }) {
            return Ok(EntryIdx::new(index));
        }
        let index = self.append(Entry::new(hash, EntryKind::Long(value)), true)?;
        Ok(EntryIdx::new(index))
    }

    /// Interns a `Float` entry. All NaNs collapse onto the canonical
    /// quiet NaN.
    pub fn intern_float(&mut self, value: f32) -> Result<EntryIdx, PoolError> {
        let bits = float_bits(value);
        let hash = hash1(Tag::Float, bits);
        if let Some(index) = self.find(hash, |e| {
            matches!(e.kind(), EntryKind::Float(v) if float_bits(*v) == bits)
        }) {
            return Ok(EntryIdx::new(index));
        }
        let index = self.append(Entry::new(hash, EntryKind::Float(value)), false)?;
        Ok(EntryIdx::new(index))
    }

    /// Interns a `Double` entry, which takes two pool slots. All NaNs
    /// collapse onto the canonical quiet NaN.
    pub fn intern_double(&mut self, value: f64) -> Result<EntryIdx, PoolError> {
        let bits = double_bits(value);
        let hash = hash1(Tag::Double, fold64(bits));
        if let Some(index) = self.find(hash, |e| {
            matches!(e.kind(), EntryKind::Double(v) if double_bits(*v) == bits)
        }) {
            return Ok(EntryIdx::new(index));
        }
        let index = self.append(Entry::new(hash, EntryKind::Double(value)), true)?;
        Ok(EntryIdx::new(index))
    }

    // ---- NameAndType and member refs ------------------------------------

    pub fn intern_name_and_type(
        &mut self,
        name: &str,
        descriptor: &str,
    ) -> Result<NatIdx, PoolError> {
        let name = self.intern_utf8(name)?;
        let descriptor = self.intern_utf8(descriptor)?;
        self.name_and_type_of(name, descriptor)
    }

    /// Interns a `NameAndType` whose descriptor half is a symbolic Utf8.
    pub fn intern_name_and_type_sym(
        &mut self,
        name: &str,
        ty: &TypeSym,
    ) -> Result<NatIdx, PoolError> {
        let name = self.intern_utf8(name)?;
        let descriptor = self.intern_symbol_utf8(ty, false)?;
        self.name_and_type_of(name, descriptor)
    }

    pub fn name_and_type_of(
        &mut self,
        name: Utf8Idx,
        descriptor: Utf8Idx,
    ) -> Result<NatIdx, PoolError> {
        let hash = hash2(
            Tag::NameAndType,
            self.utf8_hash(name)?,
            self.utf8_hash(descriptor)?,
        );
        if let Some(index) = self.find(hash, |e| {
            matches!(
                e.kind(),
                EntryKind::NameAndType { name: n, descriptor: d }
                    if *n == name && *d == descriptor
            )
        }) {
            return Ok(NatIdx::new(index));
        }
        let kind = EntryKind::NameAndType { name, descriptor };
        let index = self.append(Entry::new(hash, kind), false)?;
        Ok(NatIdx::new(index))
    }

    fn member_ref(
        &mut self,
        tag: Tag,
        owner: ClassIdx,
        name_and_type: NatIdx,
        make: fn(ClassIdx, NatIdx) -> EntryKind,
    ) -> Result<MemberIdx, PoolError> {
        let hash = hash2(tag, self.class_hash(owner)?, self.nat_hash(name_and_type)?);
        if let Some(index) = self.find(hash, |e| {
            e.tag() == tag
                && matches!(
                    e.kind(),
                    EntryKind::FieldRef { owner: o, name_and_type: n }
                    | EntryKind::MethodRef { owner: o, name_and_type: n }
                    | EntryKind::InterfaceMethodRef { owner: o, name_and_type: n }
                        if *o == owner && *n == name_and_type
                )
        }) {
            return Ok(MemberIdx::new(index));
        }
        let index = self.append(Entry::new(hash, make(owner, name_and_type)), false)?;
        Ok(MemberIdx::new(index))
    }

    pub fn intern_field_ref(
        &mut self,
        owner: ClassIdx,
        name_and_type: NatIdx,
    ) -> Result<MemberIdx, PoolError> {
        self.member_ref(Tag::FieldRef, owner, name_and_type, |o, n| {
            EntryKind::FieldRef {
                owner: o,
                name_and_type: n,
            }
        })
    }

    pub fn intern_method_ref(
        &mut self,
        owner: ClassIdx,
        name_and_type: NatIdx,
    ) -> Result<MemberIdx, PoolError> {
        self.member_ref(Tag::MethodRef, owner, name_and_type, |o, n| {
            EntryKind::MethodRef {
                owner: o,
                name_and_type: n,
            }
        })
    }

    pub fn intern_interface_method_ref(
        &mut self,
        owner: ClassIdx,
        name_and_type: NatIdx,
    ) -> Result<MemberIdx, PoolError> {
        self.member_ref(Tag::InterfaceMethodRef, owner, name_and_type, |o, n| {
            EntryKind::InterfaceMethodRef {
                owner: o,
                name_and_type: n,
            }
        })
    }

    // ---- MethodType and MethodHandle ------------------------------------

    pub fn intern_method_type(
        &mut self,
        desc: &Arc<MethodTypeDesc>,
    ) -> Result<EntryIdx, PoolError> {
        let descriptor = self.intern_symbol_utf8(&TypeSym::MethodType(Arc::clone(desc)), false)?;
        self.method_type_of(descriptor)
    }

    pub fn method_type_of(&mut self, descriptor: Utf8Idx) -> Result<EntryIdx, PoolError> {
        let hash = hash1(Tag::MethodType, self.utf8_hash(descriptor)?);
        if let Some(index) = self.find(hash, |e| {
            matches!(e.kind(), EntryKind::MethodType { descriptor: d } if *d == descriptor)
        }) {
            return Ok(EntryIdx::new(index));
        }
        let kind = EntryKind::MethodType { descriptor };
        let index = self.append(Entry::new(hash, kind), false)?;
        Ok(EntryIdx::new(index))
    }

    pub fn intern_method_handle(
        &mut self,
        kind: MethodHandleKind,
        member: MemberIdx,
    ) -> Result<EntryIdx, PoolError> {
        let ref_kind = kind.ref_kind();
        let hash = hash2(
            Tag::MethodHandle,
            u32::from(ref_kind),
            self.member_hash(member)?,
        );
        if let Some(index) = self.find(hash, |e| {
            matches!(
                e.kind(),
                EntryKind::MethodHandle { ref_kind: r, member: m }
                    if *r == ref_kind && *m == member
            )
        }) {
            return Ok(EntryIdx::new(index));
        }
        let entry_kind = EntryKind::MethodHandle { ref_kind, member };
        let index = self.append(Entry::new(hash, entry_kind), false)?;
        Ok(EntryIdx::new(index))
    }

    /// Interns a `MethodHandle` entry together with its whole reference
    /// chain: owner class, name-and-type, and the member ref the handle
    /// kind calls for.
    pub fn intern_method_handle_of(
        &mut self,
        handle: &DirectMethodHandleDesc,
    ) -> Result<EntryIdx, PoolError> {
        let Some(owner_name) = handle.owner().internal_name() else {
            return Err(PoolError::Desc(DescError::NotClassOrInterface {
                descriptor: handle.owner().descriptor().to_owned(),
            }));
        };
        let owner = self.intern_class_by_name(owner_name)?;
        let descriptor = handle.lookup_descriptor()?;
        let name_and_type = self.intern_name_and_type(handle.member_name(), &descriptor)?;
        let kind = handle.kind();
        let member = if kind.is_field_accessor() {
            self.intern_field_ref(owner, name_and_type)?
        } else if kind.is_interface() {
            self.intern_interface_method_ref(owner, name_and_type)?
        } else {
            self.intern_method_ref(owner, name_and_type)?
        };
        self.intern_method_handle(kind, member)
    }

    // ---- Dynamic, Module, Package ---------------------------------------

    fn dynamic_entry(
        &mut self,
        tag: Tag,
        bootstrap: u16,
        name_and_type: NatIdx,
        make: fn(u16, NatIdx) -> EntryKind,
    ) -> Result<EntryIdx, PoolError> {
        let hash = hash2(tag, u32::from(bootstrap), self.nat_hash(name_and_type)?);
        if let Some(index) = self.find(hash, |e| {
            e.tag() == tag
                && matches!(
                    e.kind(),
                    EntryKind::Dynamic { bootstrap: b, name_and_type: n }
                    | EntryKind::InvokeDynamic { bootstrap: b, name_and_type: n }
                        if *b == bootstrap && *n == name_and_type
                )
        }) {
            return Ok(EntryIdx::new(index));
        }
        let index = self.append(Entry::new(hash, make(bootstrap, name_and_type)), false)?;
        Ok(EntryIdx::new(index))
    }

    /// Interns a `Dynamic` entry against a bootstrap-method index.
    pub fn intern_dynamic(
        &mut self,
        bootstrap: u16,
        name_and_type: NatIdx,
    ) -> Result<EntryIdx, PoolError> {
        self.dynamic_entry(Tag::Dynamic, bootstrap, name_and_type, |b, n| {
            EntryKind::Dynamic {
                bootstrap: b,
                name_and_type: n,
            }
        })
    }

    /// Interns an `InvokeDynamic` entry against a bootstrap-method index.
    pub fn intern_invoke_dynamic(
        &mut self,
        bootstrap: u16,
        name_and_type: NatIdx,
    ) -> Result<EntryIdx, PoolError> {
        self.dynamic_entry(Tag::InvokeDynamic, bootstrap, name_and_type, |b, n| {
            EntryKind::InvokeDynamic {
                bootstrap: b,
                name_and_type: n,
            }
        })
    }

    fn named_entry(
        &mut self,
        tag: Tag,
        name: &str,
        make: fn(Utf8Idx) -> EntryKind,
    ) -> Result<EntryIdx, PoolError> {
        let utf8 = self.intern_utf8(name)?;
        let hash = hash1(tag, self.utf8_hash(utf8)?);
        if let Some(index) = self.find(hash, |e| {
            e.tag() == tag
                && matches!(
                    e.kind(),
                    EntryKind::Module { name: n } | EntryKind::Package { name: n } if *n == utf8
                )
        }) {
            return Ok(EntryIdx::new(index));
        }
        let index = self.append(Entry::new(hash, make(utf8)), false)?;
        Ok(EntryIdx::new(index))
    }

    pub fn intern_module(&mut self, name: &str) -> Result<EntryIdx, PoolError> {
        self.named_entry(Tag::Module, name, |n| EntryKind::Module { name: n })
    }

    pub fn intern_package(&mut self, name: &str) -> Result<EntryIdx, PoolError> {
        self.named_entry(Tag::Package, name, |n| EntryKind::Package { name: n })
    }
}
