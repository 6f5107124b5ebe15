//! FlateDecode (zlib/deflate) implementation.

use crate::decoders::StreamDecoder;
use crate::error::{Error, Result};
use flate2::read::{DeflateDecoder, ZlibDecoder};
use std::io::Read;

/// FlateDecode filter implementation.
///
/// Reads a zlib stream; when the zlib wrapper is damaged, retries the same
/// bytes as raw deflate. Data recovered before a mid-stream error is kept.
pub struct FlateDecoder;

impl StreamDecoder for FlateDecoder {
    fn decode(&self, input: &[u8]) -> Result<Vec<u8>> {
        self.decode_limited(input, 0)
    }

    fn decode_limited(&self, input: &[u8], max_size: usize) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        let zlib_err = match read_bounded(ZlibDecoder::new(input), max_size, &mut output) {
            Ok(_) => return check_size(output, max_size),
            Err(e) if !output.is_empty() => {
                log::warn!(
                    "FlateDecode partial recovery: {} bytes before corruption: {}",
                    output.len(),
                    e
                );
                return check_size(output, max_size);
            },
            Err(e) => e,
        };

        log::debug!("Zlib decode failed ({}), trying raw deflate", zlib_err);
        output.clear();
        match read_bounded(DeflateDecoder::new(input), max_size, &mut output) {
            Ok(_) => check_size(output, max_size),
            Err(_) if !output.is_empty() => {
                log::warn!("Raw deflate partial recovery: {} bytes", output.len());
                check_size(output, max_size)
            },
            Err(e) => Err(Error::Decode(format!("FlateDecode: {}", e))),
        }
    }

    fn name(&self) -> &str {
        "FlateDecode"
    }
}

/// Inflate at most `max_size + 1` bytes, so an oversized stream is detected
/// without being inflated in full. A `max_size` of 0 reads everything.
fn read_bounded<R: Read>(reader: R, max_size: usize, output: &mut Vec<u8>) -> std::io::Result<usize> {
    if max_size == 0 {
        let mut reader = reader;
        reader.read_to_end(output)
    } else {
        reader.take(max_size as u64 + 1).read_to_end(output)
    }
}

fn check_size(output: Vec<u8>, max_size: usize) -> Result<Vec<u8>> {
    if max_size > 0 && output.len() > max_size {
        return Err(Error::Decode(format!(
            "FlateDecode output exceeds limit of {} bytes",
            max_size
        )));
    }
    Ok(output)
}
