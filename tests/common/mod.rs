//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use flate2::write::ZlibEncoder;
use flate2::Compression;
use pdf_font_core::object::{Object, ObjectRef};
use std::collections::HashMap;
use std::io::Write;

pub type Objects = HashMap<ObjectRef, Object>;

/// Route `log` output through the test harness; safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn name(n: &str) -> Object {
    Object::Name(n.to_string())
}

pub fn int(i: i64) -> Object {
    Object::Integer(i)
}

pub fn ints(values: &[i64]) -> Object {
    Object::Array(values.iter().map(|&v| Object::Integer(v)).collect())
}

pub fn reference(id: u32) -> Object {
    Object::Reference(ObjectRef::new(id, 0))
}

pub fn dict(entries: Vec<(&str, Object)>) -> HashMap<String, Object> {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// An unfiltered stream.
pub fn stream(data: &[u8]) -> Object {
    Object::Stream {
        dict: HashMap::new(),
        data: bytes::Bytes::copy_from_slice(data),
    }
}

/// A FlateDecode-compressed stream holding `data`.
pub fn flate_stream(data: &[u8]) -> Object {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    let compressed = encoder.finish().unwrap();

    Object::Stream {
        dict: dict(vec![("Filter", name("FlateDecode"))]),
        data: bytes::Bytes::from(compressed),
    }
}

/// A ToUnicode CMap program with the given bfchar entries (code, UTF-16 hex).
pub fn tounicode_cmap(entries: &[(u32, &str)]) -> Vec<u8> {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n12 dict begin\nbegincmap\n\
         1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n",
    );
    cmap.push_str(&format!("{} beginbfchar\n", entries.len()));
    for (code, dst) in entries {
        cmap.push_str(&format!("<{:04X}> <{}>\n", code, dst));
    }
    cmap.push_str("endbfchar\nendcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");
    cmap.into_bytes()
}

/// Assemble a minimal TrueType program: head, hhea, maxp, hmtx and,
/// when `mac_cmap` is non-empty, a (1,0) format 0 cmap.
pub fn truetype_program(units_per_em: u16, advances: &[u16], mac_cmap: &[(u8, u8)]) -> Vec<u8> {
    let cmap = if mac_cmap.is_empty() {
        None
    } else {
        let mut glyph_ids = [0u8; 256];
        for &(code, gid) in mac_cmap {
            glyph_ids[code as usize] = gid;
        }
        let mut subtable = Vec::new();
        subtable.extend(0u16.to_be_bytes()); // format 0
        subtable.extend(262u16.to_be_bytes()); // length
        subtable.extend(0u16.to_be_bytes()); // language
        subtable.extend(glyph_ids);
        Some(cmap_table(1, 0, subtable)) // Macintosh Roman
    };
    assemble_truetype(units_per_em, advances, cmap)
}

/// Like [`truetype_program`], with a (0,3) Unicode cmap in format 6 mapping
/// the given scalars to glyph ids.
pub fn truetype_program_unicode(
    units_per_em: u16,
    advances: &[u16],
    unicode_cmap: &[(u16, u16)],
) -> Vec<u8> {
    let first = unicode_cmap.iter().map(|&(c, _)| c).min().unwrap_or(0);
    let last = unicode_cmap.iter().map(|&(c, _)| c).max().unwrap_or(0);
    let mut glyph_ids = vec![0u16; (last - first) as usize + 1];
    for &(scalar, gid) in unicode_cmap {
        glyph_ids[(scalar - first) as usize] = gid;
    }

    let mut subtable = Vec::new();
    subtable.extend(6u16.to_be_bytes()); // format 6
    subtable.extend((10 + 2 * glyph_ids.len() as u16).to_be_bytes()); // length
    subtable.extend(0u16.to_be_bytes()); // language
    subtable.extend(first.to_be_bytes());
    subtable.extend((glyph_ids.len() as u16).to_be_bytes());
    for gid in glyph_ids {
        subtable.extend(gid.to_be_bytes());
    }
    assemble_truetype(units_per_em, advances, Some(cmap_table(0, 3, subtable)))
}

fn cmap_table(platform: u16, encoding: u16, subtable: Vec<u8>) -> Vec<u8> {
    let mut cmap = Vec::new();
    cmap.extend(0u16.to_be_bytes()); // version
    cmap.extend(1u16.to_be_bytes()); // numTables
    cmap.extend(platform.to_be_bytes());
    cmap.extend(encoding.to_be_bytes());
    cmap.extend(12u32.to_be_bytes()); // subtable offset
    cmap.extend(subtable);
    cmap
}

fn assemble_truetype(units_per_em: u16, advances: &[u16], cmap: Option<Vec<u8>>) -> Vec<u8> {
    let num_glyphs = advances.len() as u16;

    let mut head = Vec::new();
    head.extend(0x0001_0000u32.to_be_bytes()); // version
    head.extend(0x0001_0000u32.to_be_bytes()); // fontRevision
    head.extend(0u32.to_be_bytes()); // checkSumAdjustment
    head.extend(0x5F0F_3CF5u32.to_be_bytes()); // magicNumber
    head.extend(0u16.to_be_bytes()); // flags
    head.extend(units_per_em.to_be_bytes());
    head.extend([0u8; 16]); // created, modified
    head.extend([0u8; 8]); // bounding box
    head.extend(0u16.to_be_bytes()); // macStyle
    head.extend(8u16.to_be_bytes()); // lowestRecPPEM
    head.extend(2i16.to_be_bytes()); // fontDirectionHint
    head.extend(0i16.to_be_bytes()); // indexToLocFormat
    head.extend(0i16.to_be_bytes()); // glyphDataFormat

    let mut hhea = Vec::new();
    hhea.extend(0x0001_0000u32.to_be_bytes());
    hhea.extend(800i16.to_be_bytes()); // ascender
    hhea.extend((-200i16).to_be_bytes()); // descender
    hhea.extend(0i16.to_be_bytes()); // lineGap
    hhea.extend(advances.iter().copied().max().unwrap_or(0).to_be_bytes());
    hhea.extend([0u8; 12]); // minLSB .. caretOffset
    hhea.extend([0u8; 8]); // reserved
    hhea.extend(0i16.to_be_bytes()); // metricDataFormat
    hhea.extend(num_glyphs.to_be_bytes());

    let mut maxp = Vec::new();
    maxp.extend(0x0000_5000u32.to_be_bytes());
    maxp.extend(num_glyphs.to_be_bytes());

    let mut hmtx = Vec::new();
    for advance in advances {
        hmtx.extend(advance.to_be_bytes());
        hmtx.extend(0i16.to_be_bytes());
    }

    let mut tables: Vec<(&[u8; 4], Vec<u8>)> = Vec::new();
    if let Some(cmap) = cmap {
        tables.push((b"cmap", cmap));
    }
    tables.push((b"head", head));
    tables.push((b"hhea", hhea));
    tables.push((b"hmtx", hmtx));
    tables.push((b"maxp", maxp));

    let num_tables = tables.len() as u16;
    let mut font = Vec::new();
    font.extend(0x0001_0000u32.to_be_bytes());
    font.extend(num_tables.to_be_bytes());
    font.extend([0u8; 6]); // searchRange, entrySelector, rangeShift

    let mut offset = 12 + 16 * tables.len();
    let mut body = Vec::new();
    for (tag, data) in &tables {
        font.extend(tag.iter());
        font.extend(0u32.to_be_bytes()); // checksum
        font.extend((offset as u32).to_be_bytes());
        font.extend((data.len() as u32).to_be_bytes());

        body.extend(data);
        while body.len() % 4 != 0 {
            body.push(0);
        }
        offset = 12 + 16 * tables.len() + body.len();
    }
    font.extend(body);
    font
}
