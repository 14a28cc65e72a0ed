//! Fixed-width uppercase hexadecimal conversion, shared by every encoder.

/// Format `value` as uppercase hexadecimal, zero-padded to `width` digits.
///
/// Values wider than `width` keep all of their digits; callers bound their
/// values before formatting.
pub fn to_hex(value: u32, width: usize) -> String {
    format!("{value:0>width$X}")
}

/// Parse a string of hexadecimal digits. `None` when empty or malformed.
pub fn from_hex(digits: &str) -> Option<u32> {
    u32::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_to_width() {
        assert_eq!(to_hex(0x1006, 6), "001006");
        assert_eq!(to_hex(0, 2), "00");
        assert_eq!(to_hex(0xF1, 2), "F1");
    }

    #[test]
    fn keeps_wide_values() {
        assert_eq!(to_hex(0x123456, 4), "123456");
    }

    #[test]
    fn round_trips() {
        assert_eq!(from_hex("1006"), Some(0x1006));
        assert_eq!(from_hex(&to_hex(0x7FFF, 4)), Some(0x7FFF));
        assert_eq!(from_hex(""), None);
        assert_eq!(from_hex("G1"), None);
    }
}
