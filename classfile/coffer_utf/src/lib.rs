//! Modified UTF-8 codec for class-file text.
//!
//! Class files store text in a variant of UTF-8 where the zero code unit is
//! encoded as the two-byte form `0xC0 0x80` (so encoded text never contains
//! a literal `0x00` byte) and supplementary characters are encoded as their
//! two UTF-16 surrogate units, three bytes each, rather than as one
//! four-byte sequence.
//!
//! # Encoding
//!
//! - [`non_zero_ascii_prefix`] + [`utf_len`] size the output buffer in two
//!   phases, so the common all-ASCII case never rescans.
//! - [`put_char`] writes one UTF-16 code unit at an offset into a pre-sized
//!   buffer and returns the new offset.
//! - [`encode`] is the convenience wrapper over the above.
//!
//! # Decoding
//!
//! - [`is_1byte`] / [`is_2byte`] / [`is_3byte`] classify a leading byte
//!   without consuming further input.
//! - [`read_2byte`] / [`read_3byte`] validate and extract one code unit.
//! - [`decode`] drives the classifiers over a whole buffer, pairing
//!   surrogates unit-by-unit.
//!
//! Decode errors are positional: a truncated trailing sequence is
//! [`UtfError::PartialAtEnd`], a continuation byte that does not match
//! `10xxxxxx` is [`UtfError::MalformedAround`] carrying the offset of the
//! leading byte.

use std::fmt;

/// Error while decoding Modified UTF-8 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtfError {
    /// The buffer ended in the middle of a multi-byte sequence.
    PartialAtEnd,
    /// A continuation byte did not match the `10xxxxxx` pattern; `offset`
    /// is the position of the leading byte of the bad sequence.
    MalformedAround { offset: usize },
    /// A surrogate code unit at `offset` had no partner. The JVM tolerates
    /// lone surrogates in its UTF-16 strings; a Rust `String` cannot carry
    /// one, so the condition is surfaced instead.
    UnpairedSurrogate { offset: usize },
}

impl UtfError {
    /// Shift positional errors by `base`, for callers decoding a slice of
    /// a larger buffer that want absolute offsets.
    pub fn with_base_offset(self, base: usize) -> UtfError {
        match self {
            UtfError::PartialAtEnd => UtfError::PartialAtEnd,
            UtfError::MalformedAround { offset } => UtfError::MalformedAround {
                offset: offset + base,
            },
            UtfError::UnpairedSurrogate { offset } => UtfError::UnpairedSurrogate {
                offset: offset + base,
            },
        }
    }
}

impl fmt::Display for UtfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UtfError::PartialAtEnd => {
                write!(f, "malformed input: partial character at end")
            }
            UtfError::MalformedAround { offset } => {
                write!(f, "malformed input around byte {offset}")
            }
            UtfError::UnpairedSurrogate { offset } => {
                write!(f, "unpaired surrogate at byte {offset}")
            }
        }
    }
}

impl std::error::Error for UtfError {}

/// Count the leading bytes of `s` that are non-zero ASCII.
///
/// Over that prefix one input byte is one output byte, so [`utf_len`] only
/// has to classify the suffix.
#[inline]
pub fn non_zero_ascii_prefix(s: &str) -> usize {
    s.bytes().take_while(|&b| b != 0 && b < 0x80).count()
}

/// Total encoded length of `s` in bytes.
///
/// `prefix` must be a value returned by [`non_zero_ascii_prefix`] for the
/// same string; those bytes are counted as-is and only the remaining
/// UTF-16 code units are classified.
#[inline]
pub fn utf_len(s: &str, prefix: usize) -> usize {
    debug_assert!(s.is_char_boundary(prefix));
    let mut len = prefix;
    for unit in s[prefix..].encode_utf16() {
        len += match unit {
            1..=0x7F => 1,
            0 | 0x80..=0x07FF => 2,
            _ => 3,
        };
    }
    len
}

/// Write one UTF-16 code unit at `offset` and return the new offset.
///
/// The caller pre-sizes `buf` via [`utf_len`]; this is the hot inner loop
/// of Utf8 entry serialization.
#[inline]
#[expect(
    clippy::cast_possible_truncation,
    reason = "payload bits are masked to byte range"
)]
pub fn put_char(buf: &mut [u8], offset: usize, unit: u16) -> usize {
    if unit != 0 && unit < 0x80 {
        buf[offset] = unit as u8;
        offset + 1
    } else if unit >= 0x800 {
        buf[offset] = 0xE0 | ((unit >> 12) as u8 & 0x0F);
        buf[offset + 1] = 0x80 | ((unit >> 6) as u8 & 0x3F);
        buf[offset + 2] = 0x80 | (unit as u8 & 0x3F);
        offset + 3
    } else {
        buf[offset] = 0xC0 | ((unit >> 6) as u8 & 0x1F);
        buf[offset + 1] = 0x80 | (unit as u8 & 0x3F);
        offset + 2
    }
}

/// Encode a whole string into a fresh buffer.
pub fn encode(s: &str) -> Vec<u8> {
    let len = utf_len(s, non_zero_ascii_prefix(s));
    let mut buf = vec![0u8; len];
    let mut offset = 0;
    for unit in s.encode_utf16() {
        offset = put_char(&mut buf, offset, unit);
    }
    debug_assert_eq!(offset, len);
    buf
}

/// Is `b0` the leading byte of a 1-byte value (`0xxxxxxx`)?
#[inline]
pub fn is_1byte(b0: u8) -> bool {
    b0 >> 7 == 0
}

/// Is `b0` the leading byte of a 2-byte value (`110xxxxx`)?
#[inline]
pub fn is_2byte(b0: u8) -> bool {
    b0 >> 5 == 0b110
}

/// Is `b0` the leading byte of a 3-byte value (`1110xxxx`)?
#[inline]
pub fn is_3byte(b0: u8) -> bool {
    b0 >> 4 == 0b1110
}

/// Gather the bits of `value` selected by `mask` into the low bits of the
/// result, preserving order (a software bit-compress).
#[inline]
fn compress_bits(value: u32, mut mask: u32) -> u32 {
    let mut out = 0;
    let mut shift = 0;
    while mask != 0 {
        let low = mask & mask.wrapping_neg();
        if value & low != 0 {
            out |= 1 << shift;
        }
        shift += 1;
        mask &= mask - 1;
    }
    out
}

/// Read a 2-byte value (`110xxxxx 10xxxxxx`, 11 payload bits).
///
/// `b0` is the leading byte, already consumed from `buf[offset]`; `len` is
/// the read limit of the buffer.
#[expect(
    clippy::cast_possible_truncation,
    reason = "compressed payload has at most 11 bits"
)]
pub fn read_2byte(b0: u8, buf: &[u8], offset: usize, len: usize) -> Result<u16, UtfError> {
    if offset + 1 >= len {
        return Err(UtfError::PartialAtEnd);
    }
    let t = u32::from(b0) << 8 | u32::from(buf[offset + 1]);
    if t & 0b1110_0000_1100_0000 != 0b1100_0000_1000_0000 {
        return Err(UtfError::MalformedAround { offset });
    }
    Ok(compress_bits(t, 0b0001_1111_0011_1111) as u16)
}

/// Read a 3-byte value (`1110xxxx 10xxxxxx 10xxxxxx`, 16 payload bits).
#[expect(
    clippy::cast_possible_truncation,
    reason = "compressed payload has exactly 16 bits"
)]
pub fn read_3byte(b0: u8, buf: &[u8], offset: usize, len: usize) -> Result<u16, UtfError> {
    if offset + 2 >= len {
        return Err(UtfError::PartialAtEnd);
    }
    let t = u32::from(b0) << 16 | u32::from(buf[offset + 1]) << 8 | u32::from(buf[offset + 2]);
    if t & 0b1111_0000_1100_0000_1100_0000 != 0b1110_0000_1000_0000_1000_0000 {
        return Err(UtfError::MalformedAround { offset });
    }
    Ok(compress_bits(t, 0b0000_1111_0011_1111_0011_1111) as u16)
}

/// Decode a whole Modified UTF-8 buffer into a `String`.
///
/// Surrogate pairs arrive as two separate 3-byte units and are recombined
/// here; error offsets are relative to the start of `buf`.
pub fn decode(buf: &[u8]) -> Result<String, UtfError> {
    let len = buf.len();
    let mut out = String::with_capacity(len);
    // High surrogate waiting for its partner, with its byte offset.
    let mut pending: Option<(u16, usize)> = None;
    let mut i = 0;
    while i < len {
        let b0 = buf[i];
        let (unit, width) = if is_1byte(b0) {
            (u16::from(b0), 1)
        } else if is_2byte(b0) {
            (read_2byte(b0, buf, i, len)?, 2)
        } else if is_3byte(b0) {
            (read_3byte(b0, buf, i, len)?, 3)
        } else {
            return Err(UtfError::MalformedAround { offset: i });
        };
        match (pending.take(), unit) {
            (Some((high, _)), 0xDC00..=0xDFFF) => {
                let cp =
                    0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(unit) - 0xDC00);
                // cp is in the supplementary planes by construction.
                if let Some(c) = char::from_u32(cp) {
                    out.push(c);
                }
            }
            (Some((_, at)), _) => return Err(UtfError::UnpairedSurrogate { offset: at }),
            (None, 0xD800..=0xDBFF) => pending = Some((unit, i)),
            (None, 0xDC00..=0xDFFF) => return Err(UtfError::UnpairedSurrogate { offset: i }),
            (None, bmp) => {
                // Any BMP unit outside the surrogate range is a scalar value.
                if let Some(c) = char::from_u32(u32::from(bmp)) {
                    out.push(c);
                }
            }
        }
        i += width;
    }
    match pending {
        Some((_, at)) => Err(UtfError::UnpairedSurrogate { offset: at }),
        None => Ok(out),
    }
}
