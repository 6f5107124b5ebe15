//! ToUnicode CMap parsing.
//!
//! A ToUnicode stream maps character codes to the Unicode text they stand
//! for. Only the `bfchar` and `bfrange` operators matter for that; the rest
//! of the CMap program (codespace ranges, CIDSystemInfo, PostScript
//! boilerplate) is skipped.
//!
//! Destinations are UTF-16BE hex strings. They may hold one code unit, a
//! surrogate pair, or several characters (ligatures such as `ffi`).

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

/// Upper bound on codes expanded from one sequential `bfrange` entry.
const MAX_RANGE_SPAN: u32 = 0xFFFF;

lazy_static! {
    static ref RE_BFCHAR: Regex = Regex::new(r"<([0-9A-Fa-f]+)>\s*<([0-9A-Fa-f]*)>").unwrap();
    /// `<lo> <hi> [<dst0> <dst1> ...]` (group 3) or `<lo> <hi> <dst>` (group 4)
    static ref RE_BFRANGE: Regex = Regex::new(
        r"<([0-9A-Fa-f]+)>\s*<([0-9A-Fa-f]+)>\s*(?:\[((?:\s*<[0-9A-Fa-f]*>\s*)*)\]|<([0-9A-Fa-f]+)>)"
    )
    .unwrap();
    static ref RE_HEX: Regex = Regex::new(r"<([0-9A-Fa-f]*)>").unwrap();
}

/// Mapping from character codes to Unicode text, built from a ToUnicode CMap.
///
/// An empty map is still a map: a font that carries a ToUnicode entry with
/// no usable mappings decodes every code to the placeholder glyph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToUnicodeMap {
    entries: HashMap<u32, String>,
}

impl ToUnicodeMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the decoded bytes of a ToUnicode stream.
    ///
    /// Parsing is lenient: malformed entries are skipped and later entries
    /// override earlier ones for the same code.
    pub fn parse(data: &[u8]) -> Self {
        let content = String::from_utf8_lossy(data);
        let mut map = Self::new();

        for section in extract_sections(&content, "beginbfchar", "endbfchar") {
            for caps in RE_BFCHAR.captures_iter(section) {
                let Ok(src) = u32::from_str_radix(&caps[1], 16) else {
                    continue;
                };
                if let Some(dst) = decode_utf16_hex(&caps[2]) {
                    log::trace!("ToUnicode bfchar: 0x{:02X} -> {:?}", src, dst);
                    map.entries.insert(src, dst);
                }
            }
        }

        for section in extract_sections(&content, "beginbfrange", "endbfrange") {
            let before = map.entries.len();
            for caps in RE_BFRANGE.captures_iter(section) {
                let (Ok(start), Ok(end)) = (
                    u32::from_str_radix(&caps[1], 16),
                    u32::from_str_radix(&caps[2], 16),
                ) else {
                    continue;
                };
                match (caps.get(3), caps.get(4)) {
                    (Some(list), _) => map.insert_range_list(start, end, list.as_str()),
                    (None, Some(dst)) => map.insert_range_sequential(start, end, dst.as_str()),
                    (None, None) => {},
                }
            }
            log::trace!(
                "ToUnicode bfrange: {} mappings added",
                map.entries.len().saturating_sub(before)
            );
        }

        log::debug!("Parsed ToUnicode CMap with {} entries", map.entries.len());
        map
    }

    /// Insert one mapping.
    pub fn insert(&mut self, code: u32, text: impl Into<String>) {
        self.entries.insert(code, text.into());
    }

    /// Unicode text for `code`.
    pub fn decode(&self, code: u32) -> Option<&str> {
        self.entries.get(&code).map(String::as_str)
    }

    /// Number of mapped codes.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// True if no code is mapped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `<lo> <hi> [<dst0> <dst1> ...]`
    fn insert_range_list(&mut self, start: u32, end: u32, list: &str) {
        let destinations: Vec<&str> = RE_HEX
            .captures_iter(list)
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect();

        let range_size = end.saturating_sub(start) as usize + 1;
        if destinations.len() != range_size {
            log::warn!(
                "ToUnicode bfrange array size mismatch: expected {} entries for range 0x{:X}-0x{:X}, got {}",
                range_size,
                start,
                end,
                destinations.len()
            );
        }

        for (offset, dst_hex) in destinations.iter().take(range_size).enumerate() {
            if let Some(dst) = decode_utf16_hex(dst_hex) {
                self.entries.insert(start + offset as u32, dst);
            }
        }
    }

    /// `<lo> <hi> <dst>`: the last UTF-16 unit is incremented across the range.
    fn insert_range_sequential(&mut self, start: u32, end: u32, dst: &str) {
        let Some(mut units) = hex_to_utf16_units(dst) else {
            return;
        };
        if units.is_empty() || end < start {
            return;
        }

        let span = (end - start).min(MAX_RANGE_SPAN);
        for offset in 0..=span {
            if let Ok(text) = String::from_utf16(&units) {
                self.entries.insert(start + offset, text);
            }
            let Some(last) = units.last_mut() else {
                break;
            };
            *last = last.wrapping_add(1);
        }
    }
}

/// Extract sections between begin and end markers.
fn extract_sections<'a>(content: &'a str, begin: &str, end: &str) -> Vec<&'a str> {
    let mut sections = Vec::new();
    let mut remaining = content;

    while let Some(begin_pos) = remaining.find(begin) {
        let after_begin = &remaining[begin_pos + begin.len()..];
        if let Some(end_pos) = after_begin.find(end) {
            sections.push(&after_begin[..end_pos]);
            remaining = &after_begin[end_pos + end.len()..];
        } else {
            break;
        }
    }

    sections
}

/// Hex digits to UTF-16 code units. An odd trailing digit is padded with 0.
fn hex_to_utf16_units(hex: &str) -> Option<Vec<u16>> {
    let bytes: Vec<u8> = hex
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            let hi = crate::decoders::hex_digit_to_value(pair[0])?;
            let lo = match pair.get(1) {
                Some(&d) => crate::decoders::hex_digit_to_value(d)?,
                None => 0,
            };
            Some((hi << 4) | lo)
        })
        .collect::<Option<_>>()?;

    // A single byte destination is a Latin-1 code unit
    if bytes.len() == 1 {
        return Some(vec![bytes[0] as u16]);
    }

    Some(
        bytes
            .chunks(2)
            .map(|pair| match *pair {
                [hi, lo] => u16::from_be_bytes([hi, lo]),
                [single] => single as u16,
                _ => 0,
            })
            .collect(),
    )
}

/// Decode a hex destination string as UTF-16BE text.
///
/// Lone surrogates are replaced rather than rejected so one bad entry does
/// not lose a whole ligature.
fn decode_utf16_hex(hex: &str) -> Option<String> {
    let units = hex_to_utf16_units(hex)?;
    if units.is_empty() {
        return None;
    }
    Some(String::from_utf16_lossy(&units))
}
