//! Serializing a pool back to class-file bytes.
//!
//! A derived pool writes its parent range byte-for-byte from the parsed
//! input; only patch entries are encoded fresh. Utf8 entries reserve
//! their byte length up front and fill the region unit by unit with
//! [`put_char`], so the length prefix never disagrees with the payload.

use coffer_utf::{non_zero_ascii_prefix, put_char, utf_len};
use tracing::debug;

use crate::entry::{double_bits, float_bits, Entry, EntryKind};
use crate::error::PoolError;
use crate::pool::ConstantPool;

/// Growable big-endian byte sink for class-file structures.
#[derive(Debug, Default)]
pub struct BufWriter {
    bytes: Vec<u8>,
}

impl BufWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_u1(&mut self, value: u8) {
        self.bytes.push(value);
    }

    pub fn write_u2(&mut self, value: u16) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_u4(&mut self, value: u32) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_u8(&mut self, value: u64) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Writes a length-prefixed modified-UTF-8 string.
    pub fn write_utf(&mut self, text: &str) -> Result<(), PoolError> {
        let len = utf_len(text, non_zero_ascii_prefix(text));
        let Ok(prefix) = u16::try_from(len) else {
            return Err(PoolError::Utf8TooLong { len });
        };
        self.write_u2(prefix);
        let start = self.bytes.len();
        self.bytes.resize(start + len, 0);
        let mut offset = start;
        for unit in text.encode_utf16() {
            offset = put_char(&mut self.bytes, offset, unit);
        }
        debug_assert_eq!(offset, start + len);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl ConstantPool {
    /// Appends the serialized pool, count included, to `out`.
    pub fn write_to(&self, out: &mut BufWriter) -> Result<(), PoolError> {
        let start = out.len();
        out.write_u2(self.size());
        if let Some(parent) = &self.parent {
            out.write_bytes(&parent.raw);
        }
        for entry in self.entries.iter().flatten() {
            write_entry(out, entry)?;
        }
        debug!(
            size = self.size(),
            bytes = out.len() - start,
            "serialized constant pool"
        );
        Ok(())
    }

    /// The serialized pool as a fresh byte vector.
    pub fn serialize(&self) -> Result<Vec<u8>, PoolError> {
        let mut out = BufWriter::new();
        self.write_to(&mut out)?;
        Ok(out.into_bytes())
    }
}

#[expect(
    clippy::cast_sign_loss,
    reason = "literal entries are written as their raw bit pattern"
)]
fn write_entry(out: &mut BufWriter, entry: &Entry) -> Result<(), PoolError> {
    out.write_u1(entry.tag().raw());
    match entry.kind() {
        EntryKind::Utf8(data) => out.write_utf(data.text())?,
        EntryKind::Integer(v) => out.write_u4(*v as u32),
        EntryKind::Float(v) => out.write_u4(float_bits(*v)),
        EntryKind::Long(v) => out.write_u8(*v as u64),
        EntryKind::Double(v) => out.write_u8(double_bits(*v)),
        EntryKind::Class { name } => out.write_u2(name.raw()),
        EntryKind::Str { utf8 } => out.write_u2(utf8.raw()),
        EntryKind::FieldRef {
            owner,
            name_and_type,
        }
        | EntryKind::MethodRef {
            owner,
            name_and_type,
        }
        | EntryKind::InterfaceMethodRef {
            owner,
            name_and_type,
        } => {
            out.write_u2(owner.raw());
            out.write_u2(name_and_type.raw());
        }
        EntryKind::NameAndType { name, descriptor } => {
            out.write_u2(name.raw());
            out.write_u2(descriptor.raw());
        }
        EntryKind::MethodHandle { ref_kind, member } => {
            out.write_u1(*ref_kind);
            out.write_u2(member.raw());
        }
        EntryKind::MethodType { descriptor } => out.write_u2(descriptor.raw()),
        EntryKind::Dynamic {
            bootstrap,
            name_and_type,
        }
        | EntryKind::InvokeDynamic {
            bootstrap,
            name_and_type,
        } => {
            out.write_u2(*bootstrap);
            out.write_u2(name_and_type.raw());
        }
        EntryKind::Module { name } | EntryKind::Package { name } => out.write_u2(name.raw()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::BufWriter;

    #[test]
    fn test_scalars_are_big_endian() {
        let mut out = BufWriter::new();
        out.write_u1(0x01);
        out.write_u2(0x0203);
        out.write_u4(0x0405_0607);
        out.write_u8(0x0809_0a0b_0c0d_0e0f);
        assert_eq!(
            out.into_bytes(),
            vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f]
        );
    }

    #[test]
    fn test_write_utf_prefixes_encoded_length() {
        let mut out = BufWriter::new();
        out.write_utf("a\u{0}b").unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(out.into_bytes(), vec![0, 4, b'a', 0xC0, 0x80, b'b']);
    }

    #[test]
    fn test_write_utf_rejects_oversized() {
        let mut out = BufWriter::new();
        let long = "\u{4e2d}".repeat(22_000);
        assert!(out.write_utf(&long).is_err());
    }
}
