//! ASCII hex conversion helpers for message headers.

/// Decodes a pair of ASCII hex digits into a byte.
///
/// Accepts upper- and lower-case digits; returns `None` if either character
/// is not a hex digit.
pub(crate) fn hex_pair_to_byte(hi: u8, lo: u8) -> Option<u8> {
    Some((hex_nibble(hi)? << 4) | hex_nibble(lo)?)
}

fn hex_nibble(ch: u8) -> Option<u8> {
    match ch {
        b'0'..=b'9' => Some(ch - b'0'),
        b'A'..=b'F' => Some(ch - b'A' + 10),
        b'a'..=b'f' => Some(ch - b'a' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_both_cases() {
        assert_eq!(hex_pair_to_byte(b'8', b'0'), Some(0x80));
        assert_eq!(hex_pair_to_byte(b'f', b'F'), Some(0xFF));
        assert_eq!(hex_pair_to_byte(b'0', b'0'), Some(0x00));
    }

    #[test]
    fn rejects_non_hex_digits() {
        assert_eq!(hex_pair_to_byte(b'G', b'0'), None);
        assert_eq!(hex_pair_to_byte(b'0', b' '), None);
    }
}
