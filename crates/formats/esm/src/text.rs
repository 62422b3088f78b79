//! Single-byte text encoding for strings stored in content files.
//!
//! Content files store 8-bit Windows code page text. Each byte maps to the
//! Unicode scalar with the same value, so decoding never fails and encoding a
//! decoded string reproduces the original bytes exactly.

/// Decode raw bytes into a string, one char per byte.
pub fn decode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Decode a C string: everything up to (not including) the first NUL.
pub fn decode_c(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    decode(&bytes[..end])
}

/// Encode a string back to single-byte text. Chars above U+00FF become `?`.
pub fn encode(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_bytes_survive_round_trip() {
        let raw = [b'C', 0xE9, b'l', 0x92];
        let s = decode(&raw);
        assert_eq!(s.chars().count(), 4);
        assert_eq!(encode(&s), raw);
    }

    #[test]
    fn c_string_stops_at_nul() {
        assert_eq!(decode_c(b"Iron\0junk"), "Iron");
        assert_eq!(decode_c(b"Iron"), "Iron");
        assert_eq!(decode_c(b"\0"), "");
    }

    #[test]
    fn unrepresentable_chars_are_replaced() {
        assert_eq!(encode("a\u{263A}b"), b"a?b");
    }
}
