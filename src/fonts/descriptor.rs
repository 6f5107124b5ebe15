//! Font descriptors and embedded font programs.
//!
//! The descriptor carries the font-wide metrics a font dictionary points to
//! through /FontDescriptor. When the font program is embedded as TrueType
//! (/FontFile2) or OpenType (/FontFile3 with /Subtype /OpenType), its glyph
//! advances become a last-resort width source for simple fonts.

use super::encoding::Encoding;
use crate::diagnostics::{DiagnosticKind, Reporter};
use crate::object::{Object, ObjectResolver};
use std::collections::HashMap;
use ttf_parser::{Face, GlyphId, PlatformId};

/// Descriptor /Flags bit: all glyphs have the same width.
pub const FLAG_FIXED_PITCH: u32 = 1 << 0;
/// Descriptor /Flags bit: font uses a symbolic character set.
pub const FLAG_SYMBOLIC: u32 = 1 << 2;
/// Descriptor /Flags bit: font uses the standard Latin character set.
pub const FLAG_NONSYMBOLIC: u32 = 1 << 5;
/// Descriptor /Flags bit: glyphs are slanted.
pub const FLAG_ITALIC: u32 = 1 << 6;

/// Glyph advances extracted from an embedded TrueType/OpenType program.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedProgram {
    units_per_em: u16,
    /// Advance width per glyph id, in font units
    advances: Vec<u16>,
    /// Glyph id for single-byte codes; `None` when the program has no usable cmap
    code_to_glyph: Option<Vec<Option<u16>>>,
}

impl EmbeddedProgram {
    /// Parse a TrueType or OpenType program.
    pub fn parse(data: &[u8]) -> Result<Self, ttf_parser::FaceParsingError> {
        Self::parse_with_encoding(data, None)
    }

    /// Parse a program used by a simple font with `encoding`. A Unicode cmap
    /// is then consulted with the character each code encodes rather than
    /// the raw code.
    pub fn parse_with_encoding(
        data: &[u8],
        encoding: Option<&Encoding>,
    ) -> Result<Self, ttf_parser::FaceParsingError> {
        let face = Face::parse(data, 0)?;

        let advances = (0..face.number_of_glyphs())
            .map(|gid| face.glyph_hor_advance(GlyphId(gid)).unwrap_or(0))
            .collect();

        Ok(Self {
            units_per_em: face.units_per_em(),
            advances,
            code_to_glyph: build_code_map(&face, encoding),
        })
    }

    /// Units per em of the program.
    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    /// Number of glyphs in the program.
    pub fn glyph_count(&self) -> usize {
        self.advances.len()
    }

    /// Glyph id a character code selects.
    ///
    /// Codes above 255, or any code when the program has no usable cmap,
    /// are taken as glyph ids directly.
    pub fn glyph_for_code(&self, code: u32) -> Option<u16> {
        match (&self.code_to_glyph, usize::try_from(code).ok()) {
            (Some(map), Some(index)) if index < map.len() => map[index],
            _ => u16::try_from(code).ok(),
        }
    }

    /// Advance of the glyph `code` selects, in font units.
    pub fn advance_for_code(&self, code: u32) -> Option<f64> {
        let gid = self.glyph_for_code(code)?;
        self.advances.get(gid as usize).map(|&w| w as f64)
    }
}

/// Resolve single-byte codes through the program's cmap.
///
/// Lookup order follows the TrueType conventions for PDF simple fonts:
/// the (3,0) symbol subtable at `0xF000 | code`, then the (1,0) Macintosh
/// subtable, then any Unicode subtable. The Unicode subtable is looked up
/// with the character `encoding` gives the code, or the code itself when
/// the encoding maps nothing.
fn build_code_map(face: &Face<'_>, encoding: Option<&Encoding>) -> Option<Vec<Option<u16>>> {
    let cmap = face.tables().cmap?;
    let subtables: Vec<_> = cmap.subtables.into_iter().collect();

    let windows_symbol = subtables
        .iter()
        .find(|s| s.platform_id == PlatformId::Windows && s.encoding_id == 0);
    let mac_roman = subtables
        .iter()
        .find(|s| s.platform_id == PlatformId::Macintosh && s.encoding_id == 0);
    let unicode = subtables.iter().find(|s| s.is_unicode());

    if windows_symbol.is_none() && mac_roman.is_none() && unicode.is_none() {
        log::debug!("Embedded program has no usable cmap subtable; using codes as glyph ids");
        return None;
    }

    let map = (0u32..=0xFF)
        .map(|code| {
            windows_symbol
                .and_then(|s| s.glyph_index(0xF000 | code))
                .or_else(|| mac_roman.and_then(|s| s.glyph_index(code)))
                .or_else(|| unicode.and_then(|s| s.glyph_index(unicode_scalar(encoding, code))))
                .map(|gid| gid.0)
        })
        .collect();
    Some(map)
}

fn unicode_scalar(encoding: Option<&Encoding>, code: u32) -> u32 {
    encoding
        .and_then(|e| e.code_to_text(code))
        .and_then(|text| text.chars().next())
        .map_or(code, u32::from)
}

/// A /FontDescriptor dictionary.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FontDescriptor {
    /// /FontName
    pub font_name: Option<String>,
    /// /Flags bit set
    pub flags: u32,
    /// /MissingWidth, in glyph space (default 0)
    pub missing_width: f64,
    /// /Ascent
    pub ascent: f64,
    /// /Descent
    pub descent: f64,
    /// /ItalicAngle
    pub italic_angle: f64,
    program: Option<EmbeddedProgram>,
}

impl FontDescriptor {
    /// Build a descriptor from its dictionary. Problems with the embedded
    /// program are reported and leave the descriptor without one.
    pub(crate) fn from_dict<R: ObjectResolver + ?Sized>(
        dict: &HashMap<String, Object>,
        resolver: &R,
        max_stream_size: usize,
        encoding: Option<&Encoding>,
        reporter: &Reporter<'_>,
    ) -> Self {
        let number = |key: &str| {
            dict.get(key)
                .and_then(|v| resolver.resolve(v).ok())
                .and_then(|v| v.as_number())
        };

        let font_name = dict
            .get("FontName")
            .and_then(|v| resolver.resolve(v).ok())
            .and_then(|v| v.as_name().map(str::to_string));

        let missing_width = match dict.get("MissingWidth").map(|v| resolver.resolve(v)) {
            Some(Ok(v)) => v.as_number().unwrap_or_else(|| {
                reporter.report(
                    DiagnosticKind::MalformedEntry,
                    format!("/MissingWidth is a {}, not a number", v.type_name()),
                );
                0.0
            }),
            Some(Err(e)) => {
                reporter.report(DiagnosticKind::UnresolvedReference, format!("/MissingWidth: {}", e));
                0.0
            },
            None => 0.0,
        };

        Self {
            font_name,
            flags: number("Flags").map(|f| f as i64 as u32).unwrap_or(0),
            missing_width,
            ascent: number("Ascent").unwrap_or(0.0),
            descent: number("Descent").unwrap_or(0.0),
            italic_angle: number("ItalicAngle").unwrap_or(0.0),
            program: load_program(dict, resolver, max_stream_size, encoding, reporter),
        }
    }

    /// Attach an already-parsed program.
    pub fn with_program(mut self, program: EmbeddedProgram) -> Self {
        self.program = Some(program);
        self
    }

    /// Width used for codes outside a simple font's /Widths table.
    pub fn missing_width(&self) -> f64 {
        self.missing_width
    }

    /// True if an embedded program was found and parsed.
    pub fn has_embedded_program(&self) -> bool {
        self.program.is_some()
    }

    /// The embedded program, if any.
    pub fn program(&self) -> Option<&EmbeddedProgram> {
        self.program.as_ref()
    }

    /// Advance of the glyph for `code`, in the program's font units.
    pub fn find_glyph_width(&self, code: u32) -> Option<f64> {
        self.program.as_ref()?.advance_for_code(code)
    }

    /// Factor converting program units to 1/1000 text space units.
    pub fn glyph_to_document_scale(&self) -> f64 {
        match &self.program {
            Some(p) if p.units_per_em > 0 => 1000.0 / p.units_per_em as f64,
            _ => 1.0,
        }
    }

    /// Symbolic flag set.
    pub fn is_symbolic(&self) -> bool {
        self.flags & FLAG_SYMBOLIC != 0
    }

    /// FixedPitch flag set.
    pub fn is_fixed_pitch(&self) -> bool {
        self.flags & FLAG_FIXED_PITCH != 0
    }

    /// Italic flag set.
    pub fn is_italic(&self) -> bool {
        self.flags & FLAG_ITALIC != 0
    }
}

fn load_program<R: ObjectResolver + ?Sized>(
    dict: &HashMap<String, Object>,
    resolver: &R,
    max_stream_size: usize,
    encoding: Option<&Encoding>,
    reporter: &Reporter<'_>,
) -> Option<EmbeddedProgram> {
    let (key, stream) = ["FontFile2", "FontFile3"].iter().find_map(|&key| {
        let obj = dict.get(key)?;
        match resolver.resolve(obj) {
            Ok(stream) => Some((key, stream)),
            Err(e) => {
                reporter.report(DiagnosticKind::UnresolvedReference, format!("/{}: {}", key, e));
                None
            },
        }
    })?;

    if key == "FontFile3" {
        let subtype = stream
            .as_dict()
            .and_then(|d| d.get("Subtype"))
            .and_then(|s| s.as_name());
        if subtype != Some("OpenType") {
            // Bare CFF and Type1C programs carry no hmtx table
            log::debug!("Skipping /FontFile3 program of subtype {:?}", subtype);
            return None;
        }
    }

    let data = match stream.decode_stream_data_limited(max_stream_size) {
        Ok(data) => data,
        Err(e) => {
            reporter.report(DiagnosticKind::UnsupportedProgram, format!("/{}: {}", key, e));
            return None;
        },
    };

    match EmbeddedProgram::parse_with_encoding(&data, encoding) {
        Ok(program) => {
            log::debug!(
                "Loaded /{} program: {} glyphs, {} units/em",
                key,
                program.glyph_count(),
                program.units_per_em()
            );
            Some(program)
        },
        Err(e) => {
            reporter.report(DiagnosticKind::UnsupportedProgram, format!("/{}: {}", key, e));
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectedDiagnostics;
    use crate::object::ObjectRef;

    fn build(dict: HashMap<String, Object>, sink: &CollectedDiagnostics) -> FontDescriptor {
        let objects: HashMap<ObjectRef, Object> = HashMap::new();
        FontDescriptor::from_dict(&dict, &objects, 0, None, &Reporter::new("Test", sink))
    }

    #[test]
    fn test_descriptor_fields() {
        let mut dict = HashMap::new();
        dict.insert("FontName".to_string(), Object::Name("ABCDEF+Arial".to_string()));
        dict.insert("Flags".to_string(), Object::Integer(32 | 64));
        dict.insert("MissingWidth".to_string(), Object::Integer(250));
        dict.insert("Ascent".to_string(), Object::Integer(905));
        dict.insert("Descent".to_string(), Object::Integer(-212));
        dict.insert("ItalicAngle".to_string(), Object::Real(-12.0));

        let sink = CollectedDiagnostics::new();
        let descriptor = build(dict, &sink);

        assert_eq!(descriptor.font_name.as_deref(), Some("ABCDEF+Arial"));
        assert_eq!(descriptor.missing_width, 250.0);
        assert_eq!(descriptor.descent, -212.0);
        assert!(descriptor.is_italic());
        assert!(!descriptor.is_symbolic());
        assert!(!descriptor.is_fixed_pitch());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_missing_width_defaults_to_zero() {
        let sink = CollectedDiagnostics::new();
        let descriptor = build(HashMap::new(), &sink);
        assert_eq!(descriptor.missing_width, 0.0);
        assert!(!descriptor.has_embedded_program());
        assert_eq!(descriptor.find_glyph_width(65), None);
        assert_eq!(descriptor.glyph_to_document_scale(), 1.0);
    }

    #[test]
    fn test_malformed_missing_width_is_reported() {
        let mut dict = HashMap::new();
        dict.insert("MissingWidth".to_string(), Object::Name("wide".to_string()));

        let sink = CollectedDiagnostics::new();
        let descriptor = build(dict, &sink);
        assert_eq!(descriptor.missing_width, 0.0);
        assert!(sink.has(DiagnosticKind::MalformedEntry));
    }

    #[test]
    fn test_garbage_program_is_reported() {
        let mut dict = HashMap::new();
        dict.insert(
            "FontFile2".to_string(),
            Object::Stream {
                dict: HashMap::new(),
                data: bytes::Bytes::from_static(b"definitely not a font"),
            },
        );

        let sink = CollectedDiagnostics::new();
        let descriptor = build(dict, &sink);
        assert!(!descriptor.has_embedded_program());
        assert!(sink.has(DiagnosticKind::UnsupportedProgram));
    }

    #[test]
    fn test_cff_program_is_skipped_quietly() {
        let mut stream_dict = HashMap::new();
        stream_dict.insert("Subtype".to_string(), Object::Name("Type1C".to_string()));
        let mut dict = HashMap::new();
        dict.insert(
            "FontFile3".to_string(),
            Object::Stream {
                dict: stream_dict,
                data: bytes::Bytes::from_static(b"\x01\x00\x04\x02"),
            },
        );

        let sink = CollectedDiagnostics::new();
        let descriptor = build(dict, &sink);
        assert!(!descriptor.has_embedded_program());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_dangling_program_reference() {
        let mut dict = HashMap::new();
        dict.insert(
            "FontFile2".to_string(),
            Object::Reference(ObjectRef::new(40, 0)),
        );

        let sink = CollectedDiagnostics::new();
        let descriptor = build(dict, &sink);
        assert!(!descriptor.has_embedded_program());
        assert!(sink.has(DiagnosticKind::UnresolvedReference));
    }
}
