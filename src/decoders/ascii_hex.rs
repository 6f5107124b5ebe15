//! ASCIIHexDecode implementation.
//!
//! Whitespace is ignored, `>` ends the data, and a final odd digit is
//! padded with an implicit '0'.

use crate::decoders::StreamDecoder;
use crate::error::{Error, Result};

/// ASCIIHexDecode filter implementation.
pub struct AsciiHexDecoder;

impl StreamDecoder for AsciiHexDecoder {
    fn decode(&self, input: &[u8]) -> Result<Vec<u8>> {
        let digits = input
            .iter()
            .copied()
            .take_while(|&c| c != b'>')
            .filter(|c| !c.is_ascii_whitespace())
            .map(|c| {
                hex_digit_to_value(c).ok_or_else(|| {
                    Error::Decode(format!("ASCIIHexDecode: invalid hex digit '{}'", c as char))
                })
            })
            .collect::<Result<Vec<u8>>>()?;

        Ok(digits
            .chunks(2)
            .map(|pair| (pair[0] << 4) | pair.get(1).copied().unwrap_or(0))
            .collect())
    }

    fn name(&self) -> &str {
        "ASCIIHexDecode"
    }
}

/// Convert a hexadecimal ASCII character to its numeric value.
pub(crate) fn hex_digit_to_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_hex_decode_with_whitespace() {
        let output = AsciiHexDecoder.decode(b"48 65 6C\n6C 6F").unwrap();
        assert_eq!(output, b"Hello");
    }

    #[test]
    fn test_ascii_hex_decode_odd_length() {
        let output = AsciiHexDecoder.decode(b"486").unwrap();
        assert_eq!(output, b"H`");
    }

    #[test]
    fn test_ascii_hex_decode_stops_at_end_marker() {
        let output = AsciiHexDecoder.decode(b"4869>ZZ").unwrap();
        assert_eq!(output, b"Hi");
    }

    #[test]
    fn test_ascii_hex_decode_invalid_digit() {
        assert!(AsciiHexDecoder.decode(b"4G").is_err());
    }

    #[test]
    fn test_hex_digit_to_value() {
        assert_eq!(hex_digit_to_value(b'0'), Some(0));
        assert_eq!(hex_digit_to_value(b'f'), Some(15));
        assert_eq!(hex_digit_to_value(b'G'), None);
    }
}
