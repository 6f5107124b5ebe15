//! Stream filters needed to read font-related streams.
//!
//! ToUnicode CMaps and embedded font programs are almost always
//! FlateDecode-compressed; ASCIIHexDecode shows up in hand-written and
//! older documents. Anything else is reported as unsupported.

use crate::error::{Error, Result};

mod ascii_hex;
mod flate;

pub use ascii_hex::AsciiHexDecoder;
pub(crate) use ascii_hex::hex_digit_to_value;
pub use flate::FlateDecoder;

/// Trait for PDF stream decoders.
pub trait StreamDecoder {
    /// Decode the input data.
    fn decode(&self, input: &[u8]) -> Result<Vec<u8>>;

    /// Decode the input data, failing once the output exceeds `max_size`
    /// bytes (0 disables the check).
    fn decode_limited(&self, input: &[u8], max_size: usize) -> Result<Vec<u8>> {
        let output = self.decode(input)?;
        check_size(&output, max_size)?;
        Ok(output)
    }

    /// Get the name of this decoder (e.g., "FlateDecode").
    fn name(&self) -> &str;
}

fn decoder_for(filter_name: &str) -> Result<Box<dyn StreamDecoder>> {
    match filter_name {
        "FlateDecode" | "Fl" => Ok(Box::new(FlateDecoder)),
        "ASCIIHexDecode" | "AHx" => Ok(Box::new(AsciiHexDecoder)),
        _ => Err(Error::UnsupportedFilter(filter_name.to_string())),
    }
}

/// Decode stream data by applying `filters` in order.
pub fn decode_stream(data: &[u8], filters: &[String]) -> Result<Vec<u8>> {
    decode_stream_limited(data, filters, 0)
}

/// Decode stream data, failing as soon as any filter's output exceeds
/// `max_size` bytes. A `max_size` of 0 disables the check.
pub fn decode_stream_limited(data: &[u8], filters: &[String], max_size: usize) -> Result<Vec<u8>> {
    let mut current = data.to_vec();

    for filter_name in filters {
        let decoder = decoder_for(filter_name)?;
        current = decoder.decode_limited(&current, max_size)?;
        log::trace!("{}: {} bytes decoded", decoder.name(), current.len());
    }

    // Unfiltered data is its own decoded output
    check_size(&current, max_size)?;
    Ok(current)
}

fn check_size(data: &[u8], max_size: usize) -> Result<()> {
    if max_size > 0 && data.len() > max_size {
        return Err(Error::Decode(format!(
            "decoded size {} bytes exceeds limit {} bytes",
            data.len(),
            max_size
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_stream_no_filters() {
        let data = b"Hello, World!";
        let result = decode_stream(data, &[]).unwrap();
        assert_eq!(result, data);
    }

    #[test]
    fn test_decode_stream_unsupported_filter() {
        let filters = vec!["DCTDecode".to_string()];
        match decode_stream(b"test", &filters) {
            Err(Error::UnsupportedFilter(name)) => assert_eq!(name, "DCTDecode"),
            _ => panic!("Expected UnsupportedFilter error"),
        }
    }

    #[test]
    fn test_decode_stream_abbreviated_name() {
        let filters = vec!["AHx".to_string()];
        assert_eq!(decode_stream(b"4869>", &filters).unwrap(), b"Hi");
    }

    #[test]
    fn test_decode_stream_size_limit() {
        let filters = vec!["ASCIIHexDecode".to_string()];
        let result = decode_stream_limited(b"48656C6C6F", &filters, 4);
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn test_size_limit_applies_without_filters() {
        assert!(decode_stream_limited(b"Hello", &[], 4).is_err());
        assert_eq!(decode_stream_limited(b"Hello", &[], 5).unwrap(), b"Hello");
    }

    #[test]
    fn test_flate_bomb_rejected_under_limit() {
        use flate2::write::ZlibEncoder;
        use flate2::Compression;
        use std::io::Write;

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(&vec![0u8; 8 * 1024 * 1024]).unwrap();
        let bomb = encoder.finish().unwrap();

        let filters = vec!["FlateDecode".to_string()];
        let result = decode_stream_limited(&bomb, &filters, 4096);
        assert!(matches!(result, Err(Error::Decode(_))));
    }
}
