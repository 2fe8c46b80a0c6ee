/// Base-31 polynomial hash over the UTF-16 code units of `s`, with 32-bit
/// wraparound: `h = Σ c_i · 31^(n−1−i)`.
///
/// This is the hash the constant pool keys Utf8 content on; descriptor
/// symbols cache it at construction so pool lookups never rescan the
/// descriptor string.
pub fn string_hash(s: &str) -> u32 {
    s.encode_utf16()
        .fold(0u32, |h, unit| h.wrapping_mul(31).wrapping_add(u32::from(unit)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_known_values() {
        // Same recurrence as java.lang.String.hashCode.
        assert_eq!(string_hash(""), 0);
        assert_eq!(string_hash("a"), 97);
        assert_eq!(string_hash("ab"), 97 * 31 + 98);
        assert_eq!(string_hash("hello"), 99_162_322);
    }

    #[test]
    fn test_hashes_utf16_units_not_bytes() {
        // One supplementary char is two code units.
        let h = string_hash("\u{1F600}");
        assert_eq!(h, 0xD83Du32.wrapping_mul(31).wrapping_add(0xDE00));
    }

    #[test]
    fn test_wraps_on_long_input() {
        let s = "x".repeat(100);
        // Just exercise the wraparound path; value is deterministic.
        assert_eq!(string_hash(&s), string_hash(&s));
    }
}
