use crate::{Error, Result};

pub struct Utils;
impl Utils {
    /// Parse the byte count argument. It is always hexadecimal; a `0x` prefix is optional.
    pub fn parse_byte_count(s: &str) -> Result<u32> {
        let s = s.trim();
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        u32::from_str_radix(digits, 16)
            .map_err(|e| Error::invalid_input(format!("Invalid byte count '{}': {}", s, e)))
    }

    /// Strict conversion of one hex pair.
    pub fn hex_pair_to_u8(pair: [u8; 2]) -> Option<u8> {
        let hi = (pair[0] as char).to_digit(16)?;
        let lo = (pair[1] as char).to_digit(16)?;
        Some(((hi << 4) | lo) as u8)
    }

    /// Permissive conversion in the manner of C `strtol(s, NULL, 16)`, truncated to a byte.
    ///
    /// Leading whitespace, a sign and a `0x` prefix are accepted, parsing stops at the
    /// first non-hex character, and input with no digits at all yields `0`.
    pub fn lenient_hex_to_u8(text: &[u8]) -> u8 {
        let mut rest = text.trim_ascii_start();

        let negative = match rest {
            [b'-', tail @ ..] => {
                rest = tail;
                true
            }
            [b'+', tail @ ..] => {
                rest = tail;
                false
            }
            _ => false,
        };

        if let [b'0', b'x' | b'X', next, ..] = rest
            && next.is_ascii_hexdigit()
        {
            rest = &rest[2..];
        }

        let mut value: i64 = 0;
        for &c in rest {
            match (c as char).to_digit(16) {
                Some(d) => value = value.saturating_mul(16).saturating_add(d as i64),
                None => break,
            }
        }

        if negative {
            value = -value;
        }
        value as u8
    }
}
