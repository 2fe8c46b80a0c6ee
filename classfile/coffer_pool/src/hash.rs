//! Structural hashing for pool entries.
//!
//! Every entry hash is derived from its tag and the hashes of its
//! sub-entries with the same wrapping base-31 polynomial that
//! [`coffer_desc::string_hash`] uses over UTF-16 code units. Because the
//! polynomial is linear, the hash of a field descriptor `L{name};` can be
//! computed from the hash of `name` without building the descriptor text,
//! and recovered back again, which lets derived pools match entries across
//! the two spellings without allocating.

pub use coffer_desc::string_hash;

use crate::tag::Tag;

/// Modular inverse of 31 in `u32` arithmetic: `31 * INVERSE_31 == 1`.
pub const INVERSE_31: u32 = 0xbdef_7bdf;

/// Octal digits of the largest exponent `pow31` must support. Pool-bound
/// string lengths fit in 17 bits, so six digits cover them.
const OCTAL_DIGITS: usize = 6;

/// `POWERS[(d - 1) + j * 7]` holds `31^(d * 8^j)` for octal digit `d` in
/// `1..=7` at position `j`, so an arbitrary power is a product of at most
/// one table entry per octal digit of the exponent.
const POWERS: [u32; 7 * OCTAL_DIGITS] = build_powers();

const fn build_powers() -> [u32; 7 * OCTAL_DIGITS] {
    let mut table = [0u32; 7 * OCTAL_DIGITS];
    let mut base: u32 = 31;
    let mut digit = 1;
    while digit <= 7 {
        let mut t = base;
        table[digit - 1] = t;
        let mut j = 1;
        while j < OCTAL_DIGITS {
            // Squaring three times raises t to the eighth power, which
            // shifts the exponent up one octal position.
            t = t.wrapping_mul(t);
            t = t.wrapping_mul(t);
            t = t.wrapping_mul(t);
            table[(digit - 1) + j * 7] = t;
            j += 1;
        }
        base = base.wrapping_mul(31);
        digit += 1;
    }
    table
}

/// `31^exponent` in wrapping `u32` arithmetic, in at most six multiplies.
pub fn pow31(mut exponent: u32) -> u32 {
    let mut result: u32 = 1;
    let mut position = 0;
    while position < OCTAL_DIGITS {
        let digit = (exponent & 0b111) as usize;
        if digit != 0 {
            result = result.wrapping_mul(POWERS[(digit - 1) + position * 7]);
        }
        exponent >>= 3;
        position += 1;
    }
    result
}

/// Hash of an entry with one hashed component.
pub fn hash1(tag: Tag, component: u32) -> u32 {
    u32::from(tag.raw()).wrapping_mul(31).wrapping_add(component)
}

/// Hash of an entry with two hashed components.
pub fn hash2(tag: Tag, first: u32, second: u32) -> u32 {
    u32::from(tag.raw())
        .wrapping_mul(31)
        .wrapping_add(first)
        .wrapping_mul(31)
        .wrapping_add(second)
}

/// Same shape as [`hash1`] but keyed on a raw tag byte, for hashes that
/// must stay disjoint from every real entry tag.
pub(crate) fn raw_hash2(tag: u8, first: u32, second: u32) -> u32 {
    u32::from(tag)
        .wrapping_mul(31)
        .wrapping_add(first)
        .wrapping_mul(31)
        .wrapping_add(second)
}

/// String hash of the field descriptor `L{name};` computed from the
/// string hash of `name` alone. `name_units` is the length of `name` in
/// UTF-16 code units.
pub fn descriptor_hash_of_name(name_hash: u32, name_units: u32) -> u32 {
    u32::from(b'L')
        .wrapping_mul(pow31(name_units + 1))
        .wrapping_add(name_hash.wrapping_mul(31))
        .wrapping_add(u32::from(b';'))
}

/// Inverse of [`descriptor_hash_of_name`]: recovers the string hash of
/// `name` from the hash of `L{name};`. `descriptor_units` is the length
/// of the full descriptor in UTF-16 code units.
pub fn internal_name_hash(descriptor_hash: u32, descriptor_units: u32) -> u32 {
    descriptor_hash
        .wrapping_sub(u32::from(b'L').wrapping_mul(pow31(descriptor_units - 1)))
        .wrapping_sub(u32::from(b';'))
        .wrapping_mul(INVERSE_31)
}

/// Folds a 64-bit bit pattern into the 32-bit hash domain the way
/// `Long.hashCode` does.
#[expect(
    clippy::cast_possible_truncation,
    reason = "the high word is folded into the low word before truncating"
)]
pub(crate) fn fold64(bits: u64) -> u32 {
    (bits ^ (bits >> 32)) as u32
}

/// Length of a string in UTF-16 code units, the unit `string_hash` folds.
pub fn utf16_len(s: &str) -> u32 {
    let mut units = 0u32;
    for c in s.chars() {
        units += if c.len_utf16() == 2 { 2 } else { 1 };
    }
    units
}

/// `Boolean.hashCode` constants, folded into identity hashes so the two
/// spellings a symbolic Utf8 can take never collide with each other.
pub(crate) fn bool_hash(value: bool) -> u32 {
    if value {
        1231
    } else {
        1237
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{
        descriptor_hash_of_name, hash1, hash2, internal_name_hash, pow31, string_hash, utf16_len,
        INVERSE_31,
    };
    use crate::tag::Tag;

    fn pow31_slow(exponent: u32) -> u32 {
        let mut result = 1u32;
        for _ in 0..exponent {
            result = result.wrapping_mul(31);
        }
        result
    }

    #[test]
    fn test_inverse_constant() {
        assert_eq!(31u32.wrapping_mul(INVERSE_31), 1);
    }

    #[test]
    fn test_pow31_matches_repeated_multiplication() {
        for exponent in [0u32, 1, 2, 7, 8, 9, 63, 64, 100, 4095, 65_535, 131_071] {
            assert_eq!(pow31(exponent), pow31_slow(exponent), "exponent {exponent}");
        }
    }

    #[test]
    fn test_forward_correlation_matches_direct_hash() {
        for name in ["hello", "java/lang/Object", "p/\u{4e2d}\u{6587}/C", "A"] {
            let derived = descriptor_hash_of_name(string_hash(name), utf16_len(name));
            let direct = string_hash(&format!("L{name};"));
            assert_eq!(derived, direct, "name {name}");
        }
    }

    #[test]
    fn test_inverse_correlation_recovers_name_hash() {
        for name in ["hello", "java/lang/String", "a/b/\u{10348}c"] {
            let descriptor = format!("L{name};");
            let recovered = internal_name_hash(string_hash(&descriptor), utf16_len(&descriptor));
            assert_eq!(recovered, string_hash(name), "name {name}");
        }
    }

    #[test]
    fn test_hash2_nests_hash1() {
        let h = hash1(Tag::NameAndType, 17);
        assert_eq!(hash2(Tag::NameAndType, 17, 99), h.wrapping_mul(31).wrapping_add(99));
    }

    #[test]
    fn test_utf16_len_counts_code_units() {
        assert_eq!(utf16_len(""), 0);
        assert_eq!(utf16_len("abc"), 3);
        assert_eq!(utf16_len("\u{4e2d}"), 1);
        assert_eq!(utf16_len("\u{10348}"), 2);
    }
}
