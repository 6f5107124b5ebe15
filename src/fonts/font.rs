//! The font core: construction, glyph width resolution, text decoding.
//!
//! A [`Font`] is built once from a font dictionary. Composite (Type0) fonts
//! build their descendant CID font eagerly and own it. Each font has one of
//! four shapes, see [`FontKind`]; width resolution is a match over that
//! shape with a fixed fallback order.
//!
//! Widths are memoized per code. The cache lives in a `RefCell`, so a `Font`
//! is not `Sync`; wrap it in a lock to share it between threads.

use super::cid_widths::CidWidths;
use super::cmap::ToUnicodeMap;
use super::descriptor::FontDescriptor;
use super::encoding::{BaseEncoding, Encoding, EncodingRef, UnpackFormat};
use super::metrics;
use crate::config::FontConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics, LogDiagnostics, Reporter};
use crate::error::{Error, Result};
use crate::object::{Object, ObjectResolver};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

/// Default /DW of CID fonts.
const DEFAULT_CID_WIDTH: f64 = 1000.0;

/// Default /FontMatrix scale of Type3 fonts.
const DEFAULT_TYPE3_SCALE: f64 = 0.001;

/// Font dictionary /Subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontSubtype {
    /// Type 1 (also used for MMType1)
    Type1,
    /// TrueType
    TrueType,
    /// Type 3 (glyphs defined by content streams)
    Type3,
    /// Composite font
    Type0,
    /// CID font with CFF glyph descriptions
    CidFontType0,
    /// CID font with TrueType glyph descriptions
    CidFontType2,
}

impl FontSubtype {
    /// Map a /Subtype name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Type1" | "MMType1" => Some(FontSubtype::Type1),
            "TrueType" => Some(FontSubtype::TrueType),
            "Type3" => Some(FontSubtype::Type3),
            "Type0" => Some(FontSubtype::Type0),
            "CIDFontType0" => Some(FontSubtype::CidFontType0),
            "CIDFontType2" => Some(FontSubtype::CidFontType2),
            _ => None,
        }
    }

    /// The /Subtype name.
    pub fn name(self) -> &'static str {
        match self {
            FontSubtype::Type1 => "Type1",
            FontSubtype::TrueType => "TrueType",
            FontSubtype::Type3 => "Type3",
            FontSubtype::Type0 => "Type0",
            FontSubtype::CidFontType0 => "CIDFontType0",
            FontSubtype::CidFontType2 => "CIDFontType2",
        }
    }

    /// CIDFontType0 or CIDFontType2.
    pub fn is_cid(self) -> bool {
        matches!(self, FontSubtype::CidFontType0 | FontSubtype::CidFontType2)
    }
}

impl fmt::Display for FontSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The width data a font carries, by shape.
#[derive(Debug, Clone)]
pub enum FontKind {
    /// Type1 font without a descriptor; measured with reader-supplied metrics
    Builtin,
    /// Byte-indexed font with a /Widths table (in glyph units)
    Simple {
        /// Widths starting at `first_char`
        widths: Vec<f64>,
        /// Code of `widths[0]`
        first_char: u32,
        /// /LastChar as given
        last_char: Option<u32>,
    },
    /// CID-keyed font
    Cid {
        /// /W overrides
        widths: CidWidths,
        /// /DW
        default_width: f64,
    },
    /// Type0 root delegating to its descendant
    Composite {
        /// Descendant fonts; only the first is consulted
        descendants: Vec<Font>,
    },
}

/// A code to measure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CodeInput<'a> {
    /// A character code
    Code(i64),
    /// No code at all
    Missing,
    /// Encoded bytes; the first code they hold is measured
    Bytes(&'a [u8]),
}

impl From<i64> for CodeInput<'_> {
    fn from(code: i64) -> Self {
        CodeInput::Code(code)
    }
}

impl From<i32> for CodeInput<'_> {
    fn from(code: i32) -> Self {
        CodeInput::Code(code as i64)
    }
}

impl From<u32> for CodeInput<'_> {
    fn from(code: u32) -> Self {
        CodeInput::Code(code as i64)
    }
}

impl<T: Into<i64>> From<Option<T>> for CodeInput<'_> {
    fn from(code: Option<T>) -> Self {
        match code {
            Some(c) => CodeInput::Code(c.into()),
            None => CodeInput::Missing,
        }
    }
}

impl<'a> From<&'a [u8]> for CodeInput<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        CodeInput::Bytes(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for CodeInput<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        CodeInput::Bytes(bytes)
    }
}

/// Result of [`Font::to_utf8`].
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// A decoded string
    Text(String),
    /// Element-wise decoded array, same length and order as the input
    Sequence(Vec<Decoded>),
    /// Input that is neither a string nor an array, returned unchanged
    Passthrough(Object),
}

impl Decoded {
    /// The decoded text, if this is a single string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Decoded::Text(text) => Some(text),
            _ => None,
        }
    }

    /// All text in this value, concatenated in order.
    pub fn flatten(&self) -> String {
        match self {
            Decoded::Text(text) => text.clone(),
            Decoded::Sequence(items) => items.iter().map(Decoded::flatten).collect(),
            Decoded::Passthrough(_) => String::new(),
        }
    }
}

/// A font referenced from a page's resources.
///
/// Width lookups fill a per-font cache through interior mutability, so a
/// `Font` is `Send` but not `Sync`. Share one between threads behind a
/// `Mutex`, or clone it per thread.
#[derive(Debug, Clone)]
pub struct Font {
    subtype: FontSubtype,
    basefont: String,
    kind: FontKind,
    encoding: Option<EncodingRef>,
    unicode_map: Option<ToUnicodeMap>,
    descriptor: Option<FontDescriptor>,
    builtin_fallback_width: f64,
    unknown_glyph: char,
    /// Append-only; `None` records "no width known"
    width_cache: RefCell<HashMap<u32, Option<f64>>>,
}

impl Font {
    /// Build a font with the default configuration, sending findings to the log.
    pub fn load<R: ObjectResolver + ?Sized>(obj: &Object, resolver: &R) -> Result<Self> {
        Self::from_object(obj, resolver, &FontConfig::default(), &LogDiagnostics)
    }

    /// Build a font from a font dictionary or a reference to one.
    pub fn from_object<R: ObjectResolver + ?Sized>(
        obj: &Object,
        resolver: &R,
        config: &FontConfig,
        diagnostics: &dyn Diagnostics,
    ) -> Result<Self> {
        let resolved = resolver.resolve(obj)?;
        let dict = resolved
            .as_dict()
            .ok_or_else(|| Error::invalid_type("Dictionary", resolved.type_name()))?;
        Self::from_dict(dict, resolver, config, diagnostics)
    }

    /// Build a font from its dictionary.
    ///
    /// Malformed but recoverable entries are reported to `diagnostics` and
    /// construction carries on.
    ///
    /// # Errors
    ///
    /// `Font` if /Subtype is missing or unknown, `RecursionLimitExceeded` if
    /// descendant fonts nest deeper than `config.max_descendant_depth`, and
    /// any resolver error raised while loading a descendant.
    pub fn from_dict<R: ObjectResolver + ?Sized>(
        dict: &HashMap<String, Object>,
        resolver: &R,
        config: &FontConfig,
        diagnostics: &dyn Diagnostics,
    ) -> Result<Self> {
        FontBuilder {
            dict,
            resolver,
            config,
            diagnostics,
            depth: 0,
        }
        .build()
    }

    /// /Subtype of this font.
    pub fn subtype(&self) -> FontSubtype {
        self.subtype
    }

    /// /BaseFont, or an empty string if the dictionary has none.
    pub fn basefont(&self) -> &str {
        &self.basefont
    }

    /// Width data by shape.
    pub fn kind(&self) -> &FontKind {
        &self.kind
    }

    /// Type1 font with no descriptor.
    pub fn is_builtin(&self) -> bool {
        matches!(self.kind, FontKind::Builtin)
    }

    /// Type0 font.
    pub fn is_composite(&self) -> bool {
        self.subtype == FontSubtype::Type0
    }

    /// CIDFontType0 or CIDFontType2 font.
    pub fn is_cid(&self) -> bool {
        self.subtype.is_cid()
    }

    /// The font's encoding; `None` means text decoding is unsupported.
    pub fn encoding(&self) -> Option<&EncodingRef> {
        self.encoding.as_ref()
    }

    /// Parsed /ToUnicode map, possibly empty.
    pub fn unicode_map(&self) -> Option<&ToUnicodeMap> {
        self.unicode_map.as_ref()
    }

    /// Parsed /FontDescriptor.
    pub fn font_descriptor(&self) -> Option<&FontDescriptor> {
        self.descriptor.as_ref()
    }

    /// Descendant fonts of a composite font; empty otherwise.
    pub fn descendants(&self) -> &[Font] {
        match &self.kind {
            FontKind::Composite { descendants } => descendants,
            _ => &[],
        }
    }

    /// /Widths of a simple font; empty otherwise.
    pub fn widths(&self) -> &[f64] {
        match &self.kind {
            FontKind::Simple { widths, .. } => widths,
            _ => &[],
        }
    }

    /// /FirstChar of a simple font.
    pub fn first_char(&self) -> Option<u32> {
        match &self.kind {
            FontKind::Simple { first_char, .. } => Some(*first_char),
            _ => None,
        }
    }

    /// /LastChar of a simple font.
    pub fn last_char(&self) -> Option<u32> {
        match &self.kind {
            FontKind::Simple { last_char, .. } => *last_char,
            _ => None,
        }
    }

    /// /W overrides of a CID font.
    pub fn cid_widths(&self) -> Option<&CidWidths> {
        match &self.kind {
            FontKind::Cid { widths, .. } => Some(widths),
            _ => None,
        }
    }

    /// /DW of a CID font.
    pub fn cid_default_width(&self) -> Option<f64> {
        match &self.kind {
            FontKind::Cid { default_width, .. } => Some(*default_width),
            _ => None,
        }
    }

    /// Number of codes whose width has been resolved so far.
    pub fn cached_width_count(&self) -> usize {
        self.width_cache.borrow().len()
    }

    /// Replace the basefont name.
    ///
    /// `Symbol` and `ZapfDingbats` select their built-in encodings; any
    /// other name clears the encoding, which the caller is expected to set
    /// with [`set_encoding`](Self::set_encoding).
    pub fn set_basefont(&mut self, name: impl Into<String>) {
        self.basefont = name.into();
        self.encoding = builtin_encoding_for(&self.basefont)
            .map(|base| EncodingRef::Resolved(Encoding::new(base).with_placeholder(self.unknown_glyph)));
    }

    /// Replace the encoding. Cached widths are kept.
    pub fn set_encoding(&mut self, encoding: Option<EncodingRef>) {
        self.encoding = encoding.map(|e| match e {
            EncodingRef::Resolved(enc) => {
                EncodingRef::Resolved(enc.with_placeholder(self.unknown_glyph))
            },
            unsupported => unsupported,
        });
    }

    /// Split encoded bytes into character codes.
    pub fn unpack(&self, bytes: &[u8]) -> Vec<u32> {
        self.unpack_format().unpack(bytes)
    }

    fn unpack_format(&self) -> UnpackFormat {
        self.resolved_encoding()
            .map(Encoding::unpack_format)
            .unwrap_or(UnpackFormat::SingleByte)
    }

    fn resolved_encoding(&self) -> Option<&Encoding> {
        self.encoding.as_ref().and_then(EncodingRef::resolved)
    }

    /// Advance width of a code in glyph units (1/1000 text space).
    ///
    /// Negative or missing codes measure 0. `None` means no source of width
    /// information applies, which callers must not confuse with a zero width.
    pub fn glyph_width<'a>(&self, input: impl Into<CodeInput<'a>>) -> Option<f64> {
        let code = match input.into() {
            CodeInput::Code(code) => u32::try_from(code).ok(),
            CodeInput::Bytes(bytes) => self.unpack(bytes).first().copied(),
            CodeInput::Missing => None,
        };
        let Some(code) = code else {
            return Some(0.0);
        };

        if let Some(cached) = self.width_cache.borrow().get(&code) {
            return *cached;
        }

        let width = self.resolve_width(code);
        log::trace!("Font '{}': width of 0x{:X} = {:?}", self.basefont, code, width);
        self.width_cache.borrow_mut().insert(code, width);
        width
    }

    fn resolve_width(&self, code: u32) -> Option<f64> {
        match &self.kind {
            FontKind::Builtin => Some(if metrics::is_tabulated(&self.basefont) {
                self.tabulated_width(code)
            } else {
                self.builtin_fallback_width
            }),
            FontKind::Composite { descendants } => descendants
                .first()
                .and_then(|descendant| descendant.glyph_width(code))
                .or_else(|| self.program_width(code)),
            FontKind::Cid {
                widths,
                default_width,
            } => Some(widths.get(code).unwrap_or(*default_width)),
            FontKind::Simple {
                widths, first_char, ..
            } if !widths.is_empty() => {
                let missing = self.missing_width();
                if code < *first_char {
                    return Some(missing);
                }
                Some(
                    widths
                        .get((code - first_char) as usize)
                        .copied()
                        .unwrap_or(missing),
                )
            },
            FontKind::Simple { .. } => self.program_width(code),
        }
    }

    /// Helvetica width, looked up through the font's own single-byte
    /// encoding when it has one.
    fn tabulated_width(&self, code: u32) -> f64 {
        match self.resolved_encoding() {
            Some(enc) if enc.unpack_format() == UnpackFormat::SingleByte => enc
                .code_to_text(code)
                .and_then(|text| text.chars().next())
                .map(metrics::width_for_char)
                .unwrap_or(0.0),
            _ => metrics::width_for(code),
        }
    }

    fn missing_width(&self) -> f64 {
        self.descriptor
            .as_ref()
            .map(FontDescriptor::missing_width)
            .unwrap_or(0.0)
    }

    fn program_width(&self, code: u32) -> Option<f64> {
        let descriptor = self.descriptor.as_ref()?;
        let width = descriptor.find_glyph_width(code)?;
        Some(width * descriptor.glyph_to_document_scale())
    }

    /// True if this font can produce text: it has a non-empty ToUnicode map
    /// or a resolved encoding.
    pub fn can_convert_to_utf8(&self) -> bool {
        self.unicode_map.as_ref().is_some_and(|m| !m.is_empty()) || self.resolved_encoding().is_some()
    }

    /// Decode a string (or an array of strings) shown with this font.
    ///
    /// With a ToUnicode map every code is looked up there, and unmapped
    /// codes become the placeholder glyph. Without one, the bytes go through
    /// the font's encoding.
    ///
    /// # Errors
    ///
    /// `Unsupported` if the font's encoding is unresolved or absent.
    pub fn to_utf8(&self, input: &Object) -> Result<Decoded> {
        let encoding = match &self.encoding {
            Some(EncodingRef::Resolved(encoding)) => encoding,
            Some(EncodingRef::Unsupported(name)) => {
                return Err(Error::Unsupported(format!("font encoding '{}'", name)));
            },
            None => {
                return Err(Error::Unsupported(format!(
                    "text decoding for font '{}' without an encoding",
                    self.basefont
                )));
            },
        };
        Ok(self.decode_object(encoding, input))
    }

    fn decode_object(&self, encoding: &Encoding, input: &Object) -> Decoded {
        match input {
            Object::String(bytes) => Decoded::Text(self.decode_bytes(encoding, bytes)),
            Object::Array(items) => Decoded::Sequence(
                items
                    .iter()
                    .map(|item| self.decode_object(encoding, item))
                    .collect(),
            ),
            other => Decoded::Passthrough(other.clone()),
        }
    }

    fn decode_bytes(&self, encoding: &Encoding, bytes: &[u8]) -> String {
        match &self.unicode_map {
            Some(map) => encoding
                .unpack(bytes)
                .into_iter()
                .map(|code| match map.decode(code) {
                    Some(text) => text.to_string(),
                    None => self.unknown_glyph.to_string(),
                })
                .collect(),
            None => encoding.bytes_to_text(bytes),
        }
    }
}

/// Encoding implied by a basefont name alone.
fn builtin_encoding_for(basefont: &str) -> Option<BaseEncoding> {
    match basefont {
        "Symbol" => Some(BaseEncoding::Symbol),
        "ZapfDingbats" => Some(BaseEncoding::ZapfDingbats),
        _ => None,
    }
}

/// Construction state for one font dictionary.
struct FontBuilder<'a, R: ObjectResolver + ?Sized> {
    dict: &'a HashMap<String, Object>,
    resolver: &'a R,
    config: &'a FontConfig,
    diagnostics: &'a dyn Diagnostics,
    depth: u32,
}

impl<'a, R: ObjectResolver + ?Sized> FontBuilder<'a, R> {
    fn build(self) -> Result<Font> {
        let subtype_name = self
            .get("Subtype")
            .and_then(|s| s.as_name().map(str::to_string))
            .ok_or_else(|| Error::Font("font dictionary has no /Subtype".to_string()))?;
        let subtype = FontSubtype::from_name(&subtype_name)
            .ok_or_else(|| Error::Font(format!("unknown font subtype '{}'", subtype_name)))?;

        let basefont = self
            .get("BaseFont")
            .and_then(|b| b.as_name().map(str::to_string))
            .unwrap_or_default();
        let label = if basefont.is_empty() {
            "<unnamed>"
        } else {
            basefont.as_str()
        };
        let reporter = Reporter::new(label, self.diagnostics);

        log::debug!("Building {} font '{}' (depth {})", subtype, label, self.depth);

        let (encoding, unicode_map) = if subtype.is_cid() {
            (None, None)
        } else {
            (self.encoding(&basefont, &reporter), self.unicode_map(&reporter))
        };
        let descriptor =
            self.descriptor(encoding.as_ref().and_then(EncodingRef::resolved), &reporter);

        if subtype != FontSubtype::Type0 && self.dict.contains_key("DescendantFonts") {
            reporter.report(
                DiagnosticKind::MalformedEntry,
                format!("/DescendantFonts on a {} font ignored", subtype),
            );
        }

        let kind = if subtype == FontSubtype::Type0 {
            FontKind::Composite {
                descendants: self.descendants(&reporter)?,
            }
        } else if subtype.is_cid() {
            self.cid_kind(&reporter)
        } else if subtype == FontSubtype::Type1 && descriptor.is_none() {
            if self.dict.contains_key("Widths") {
                log::debug!("Font '{}': /Widths ignored, standard metrics apply", label);
            }
            FontKind::Builtin
        } else {
            self.simple_kind(subtype, &reporter)
        };

        Ok(Font {
            subtype,
            basefont,
            kind,
            encoding,
            unicode_map,
            descriptor,
            builtin_fallback_width: self.config.builtin_fallback_width,
            unknown_glyph: self.config.unknown_glyph,
            width_cache: RefCell::new(HashMap::new()),
        })
    }

    /// Resolved value of `key`; dangling references count as absent.
    fn get(&self, key: &str) -> Option<Object> {
        let value = self.dict.get(key)?;
        match self.resolver.resolve(value) {
            Ok(resolved) => Some(resolved),
            Err(e) => {
                log::debug!("/{} unresolvable: {}", key, e);
                None
            },
        }
    }

    /// Like [`get`](Self::get), reporting dangling references.
    fn get_reported(&self, key: &str, reporter: &Reporter<'_>) -> Option<Object> {
        let value = self.dict.get(key)?;
        match self.resolver.resolve(value) {
            Ok(resolved) => Some(resolved),
            Err(e) => {
                reporter.report(DiagnosticKind::UnresolvedReference, format!("/{}: {}", key, e));
                None
            },
        }
    }

    fn descriptor(
        &self,
        encoding: Option<&Encoding>,
        reporter: &Reporter<'_>,
    ) -> Option<FontDescriptor> {
        let obj = self.get_reported("FontDescriptor", reporter)?;
        match obj.as_dict() {
            Some(dict) => Some(FontDescriptor::from_dict(
                dict,
                self.resolver,
                self.config.max_stream_size,
                encoding,
                reporter,
            )),
            None => {
                reporter.report(
                    DiagnosticKind::MalformedEntry,
                    format!("/FontDescriptor is a {}", obj.type_name()),
                );
                None
            },
        }
    }

    fn descendants(&self, reporter: &Reporter<'_>) -> Result<Vec<Font>> {
        let Some(entries) = self.get_reported("DescendantFonts", reporter) else {
            reporter.report(DiagnosticKind::MissingRequiredField, "Type0 font has no /DescendantFonts");
            return Ok(Vec::new());
        };

        if self.depth >= self.config.max_descendant_depth {
            return Err(Error::RecursionLimitExceeded(self.config.max_descendant_depth));
        }

        // A single dictionary in place of the one-element array is tolerated
        let entries = match entries {
            Object::Array(items) => items,
            single => vec![single],
        };

        let mut descendants = Vec::with_capacity(entries.len());
        for entry in &entries {
            let resolved = self.resolver.resolve(entry)?;
            let Some(dict) = resolved.as_dict() else {
                reporter.report(
                    DiagnosticKind::MalformedEntry,
                    format!("descendant font is a {}", resolved.type_name()),
                );
                continue;
            };
            let descendant = FontBuilder {
                dict,
                resolver: self.resolver,
                config: self.config,
                diagnostics: self.diagnostics,
                depth: self.depth + 1,
            }
            .build()?;
            descendants.push(descendant);
        }

        if descendants.len() > 1 {
            log::debug!("{} descendant fonts; only the first is used", descendants.len());
        }
        Ok(descendants)
    }

    fn cid_kind(&self, reporter: &Reporter<'_>) -> FontKind {
        let widths = match self.get_reported("W", reporter) {
            Some(Object::Array(items)) => {
                let widths = CidWidths::parse(&items, self.resolver);
                if widths.malformed_entries() > 0 {
                    reporter.report(
                        DiagnosticKind::MalformedEntry,
                        format!("{} unusable items in /W", widths.malformed_entries()),
                    );
                }
                widths
            },
            Some(other) => {
                reporter.report(DiagnosticKind::MalformedEntry, format!("/W is a {}", other.type_name()));
                CidWidths::default()
            },
            None => CidWidths::default(),
        };

        let default_width = match self.get_reported("DW", reporter) {
            Some(dw) => dw.as_number().unwrap_or_else(|| {
                reporter.report(DiagnosticKind::MalformedEntry, format!("/DW is a {}", dw.type_name()));
                DEFAULT_CID_WIDTH
            }),
            None => DEFAULT_CID_WIDTH,
        };

        FontKind::Cid {
            widths,
            default_width,
        }
    }

    fn simple_kind(&self, subtype: FontSubtype, reporter: &Reporter<'_>) -> FontKind {
        let mut widths = match self.get_reported("Widths", reporter) {
            Some(Object::Array(items)) => {
                let mut malformed = 0;
                let widths: Vec<f64> = items
                    .iter()
                    .map(|w| {
                        self.resolver
                            .resolve(w)
                            .ok()
                            .and_then(|w| w.as_number())
                            .unwrap_or_else(|| {
                                malformed += 1;
                                0.0
                            })
                    })
                    .collect();
                if malformed > 0 {
                    reporter.report(
                        DiagnosticKind::MalformedEntry,
                        format!("{} non-numeric /Widths entries read as 0", malformed),
                    );
                }
                widths
            },
            Some(other) => {
                reporter.report(
                    DiagnosticKind::MalformedEntry,
                    format!("/Widths is a {}", other.type_name()),
                );
                Vec::new()
            },
            None => Vec::new(),
        };

        let first_char = match self.get("FirstChar").and_then(|f| f.as_integer()) {
            Some(first) if first >= 0 => first.min(u32::MAX as i64) as u32,
            Some(first) => {
                reporter.report(DiagnosticKind::MalformedEntry, format!("negative /FirstChar {}", first));
                0
            },
            None => {
                if !widths.is_empty() {
                    reporter.report(
                        DiagnosticKind::MissingRequiredField,
                        "/Widths without /FirstChar; assuming 0",
                    );
                }
                0
            },
        };
        let last_char = self
            .get("LastChar")
            .and_then(|l| l.as_integer())
            .and_then(|l| u32::try_from(l).ok());

        if subtype == FontSubtype::Type3 {
            let scale = self.type3_scale();
            for w in &mut widths {
                *w *= scale * 1000.0;
            }
        }

        FontKind::Simple {
            widths,
            first_char,
            last_char,
        }
    }

    /// Horizontal scale of a Type3 /FontMatrix.
    fn type3_scale(&self) -> f64 {
        self.get("FontMatrix")
            .and_then(|m| m.as_array().and_then(|a| a.first()).and_then(|a| a.as_number()))
            .unwrap_or(DEFAULT_TYPE3_SCALE)
    }

    fn encoding(&self, basefont: &str, reporter: &Reporter<'_>) -> Option<EncodingRef> {
        let encoding = match self.get_reported("Encoding", reporter) {
            Some(obj) => {
                let (encoding, skipped) = EncodingRef::from_object(&obj, self.resolver);
                if skipped > 0 {
                    reporter.report(
                        DiagnosticKind::MalformedEntry,
                        format!("{} unusable items in /Differences", skipped),
                    );
                }
                if let EncodingRef::Unsupported(name) = &encoding {
                    log::debug!("Encoding '{}' cannot be decoded", name);
                }
                Some(encoding)
            },
            None if self.depth == 0 => Some(match builtin_encoding_for(basefont) {
                Some(base) => EncodingRef::Resolved(Encoding::new(base)),
                None => EncodingRef::named(&self.config.default_encoding),
            }),
            None => None,
        };

        encoding.map(|e| match e {
            EncodingRef::Resolved(enc) => {
                EncodingRef::Resolved(enc.with_placeholder(self.config.unknown_glyph))
            },
            unsupported => unsupported,
        })
    }

    fn unicode_map(&self, reporter: &Reporter<'_>) -> Option<ToUnicodeMap> {
        let obj = self.get_reported("ToUnicode", reporter)?;
        if !matches!(obj, Object::Stream { .. }) {
            reporter.report(
                DiagnosticKind::MalformedEntry,
                format!("/ToUnicode is a {}, not a stream", obj.type_name()),
            );
            return None;
        }

        match obj.decode_stream_data_limited(self.config.max_stream_size) {
            Ok(data) => {
                let map = ToUnicodeMap::parse(&data);
                if map.is_empty() {
                    log::debug!("/ToUnicode stream holds no mappings");
                }
                Some(map)
            },
            Err(e) => {
                reporter.report(DiagnosticKind::UnsupportedProgram, format!("/ToUnicode: {}", e));
                None
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectedDiagnostics;
    use crate::object::ObjectRef;

    type Objects = HashMap<ObjectRef, Object>;

    fn name(n: &str) -> Object {
        Object::Name(n.to_string())
    }

    fn dict(entries: Vec<(&str, Object)>) -> HashMap<String, Object> {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    fn build(d: HashMap<String, Object>, objects: &Objects) -> (Font, CollectedDiagnostics) {
        let sink = CollectedDiagnostics::new();
        let font = Font::from_dict(&d, objects, &FontConfig::default(), &sink).unwrap();
        (font, sink)
    }

    fn simple_font(first_char: Option<i64>, widths: &[i64]) -> (Font, CollectedDiagnostics) {
        let mut d = dict(vec![
            ("Subtype", name("TrueType")),
            ("BaseFont", name("Arial")),
            (
                "Widths",
                Object::Array(widths.iter().map(|&w| Object::Integer(w)).collect()),
            ),
            (
                "FontDescriptor",
                Object::Dictionary(dict(vec![("FontName", name("Arial"))])),
            ),
        ]);
        if let Some(first) = first_char {
            d.insert("FirstChar".to_string(), Object::Integer(first));
        }
        build(d, &Objects::new())
    }

    #[test]
    fn test_simple_font_table_bounds() {
        let (font, sink) = simple_font(Some(32), &[278, 278, 355]);
        assert!(sink.is_empty());
        assert_eq!(font.glyph_width(32), Some(278.0));
        assert_eq!(font.glyph_width(34), Some(355.0));
        assert_eq!(font.glyph_width(31), Some(0.0));
        assert_eq!(font.glyph_width(35), Some(0.0));
    }

    #[test]
    fn test_missing_first_char_is_reported_not_fatal() {
        let (font, sink) = simple_font(None, &[100, 200]);
        assert!(sink.has(DiagnosticKind::MissingRequiredField));
        assert_eq!(font.first_char(), Some(0));
        assert_eq!(font.glyph_width(1), Some(200.0));
        assert_eq!(font.glyph_width(2), Some(0.0));
    }

    #[test]
    fn test_negative_and_missing_codes() {
        let (font, _) = simple_font(Some(32), &[278]);
        assert_eq!(font.glyph_width(-1), Some(0.0));
        assert_eq!(font.glyph_width(None::<i64>), Some(0.0));
        assert_eq!(font.glyph_width(&b""[..]), Some(0.0));
        assert_eq!(font.cached_width_count(), 0);
    }

    #[test]
    fn test_width_from_encoded_bytes() {
        let (font, _) = simple_font(Some(65), &[600, 700]);
        assert_eq!(font.glyph_width(b"B"), Some(700.0));
    }

    #[test]
    fn test_width_cache() {
        let (font, _) = simple_font(Some(32), &[278]);
        assert_eq!(font.glyph_width(32), font.glyph_width(32));
        assert_eq!(font.glyph_width(500), Some(0.0));
        assert_eq!(font.cached_width_count(), 2);
    }

    #[test]
    fn test_builtin_helvetica_and_fallback() {
        let (helvetica, _) = build(
            dict(vec![("Subtype", name("Type1")), ("BaseFont", name("Helvetica"))]),
            &Objects::new(),
        );
        assert!(helvetica.is_builtin());
        assert_eq!(helvetica.glyph_width(65), Some(667.0));
        assert_eq!(helvetica.glyph_width(0), Some(0.0));

        let (times, _) = build(
            dict(vec![("Subtype", name("Type1")), ("BaseFont", name("Times-Roman"))]),
            &Objects::new(),
        );
        assert_eq!(times.glyph_width(65), Some(500.0));
        assert_eq!(times.glyph_width(200), Some(500.0));
    }

    #[test]
    fn test_builtin_helvetica_measures_through_its_encoding() {
        let (font, _) = build(
            dict(vec![
                ("Subtype", name("Type1")),
                ("BaseFont", name("Helvetica")),
                ("Encoding", name("WinAnsiEncoding")),
            ]),
            &Objects::new(),
        );
        // 0x93 is quotedblleft in WinAnsi
        assert_eq!(font.glyph_width(0x93), Some(333.0));
        assert_eq!(font.glyph_width(0x27), Some(191.0));
    }

    #[test]
    fn test_cid_explicit_zero_override() {
        let (font, _) = build(
            dict(vec![
                ("Subtype", name("CIDFontType2")),
                ("BaseFont", name("Dummy")),
                (
                    "W",
                    Object::Array(vec![Object::Integer(5), Object::Array(vec![Object::Integer(0)])]),
                ),
                ("DW", Object::Integer(1000)),
            ]),
            &Objects::new(),
        );
        assert!(font.is_cid());
        assert!(font.encoding().is_none());
        assert_eq!(font.glyph_width(5), Some(0.0));
        assert_eq!(font.glyph_width(6), Some(1000.0));
    }

    #[test]
    fn test_cid_default_width_when_dw_absent() {
        let (font, _) = build(dict(vec![("Subtype", name("CIDFontType0"))]), &Objects::new());
        assert_eq!(font.cid_default_width(), Some(1000.0));
        assert_eq!(font.glyph_width(1234), Some(1000.0));
    }

    fn composite(objects: &mut Objects) -> Font {
        objects.insert(
            ObjectRef::new(11, 0),
            Object::Dictionary(dict(vec![
                ("Subtype", name("CIDFontType2")),
                ("BaseFont", name("ABCDEF+Gothic")),
                ("W", Object::Array(vec![
                    Object::Integer(3),
                    Object::Array(vec![Object::Integer(250), Object::Integer(333)]),
                ])),
                ("DW", Object::Integer(900)),
            ])),
        );
        let d = dict(vec![
            ("Subtype", name("Type0")),
            ("BaseFont", name("ABCDEF+Gothic")),
            ("Encoding", name("Identity-H")),
            (
                "DescendantFonts",
                Object::Array(vec![Object::Reference(ObjectRef::new(11, 0))]),
            ),
        ]);
        build(d, objects).0
    }

    #[test]
    fn test_composite_delegates_to_descendant() {
        let mut objects = Objects::new();
        let font = composite(&mut objects);
        assert!(font.is_composite());
        assert_eq!(font.descendants().len(), 1);
        for code in [3u32, 4, 5, 60000] {
            assert_eq!(font.glyph_width(code), font.descendants()[0].glyph_width(code));
        }
        assert_eq!(font.glyph_width(4), Some(333.0));
        assert_eq!(font.glyph_width(&[0x00u8, 0x03]), Some(250.0));
    }

    #[test]
    fn test_composite_without_descendants() {
        let (font, sink) = build(
            dict(vec![("Subtype", name("Type0")), ("Encoding", name("Identity-H"))]),
            &Objects::new(),
        );
        assert!(sink.has(DiagnosticKind::MissingRequiredField));
        assert_eq!(font.glyph_width(1), None);
    }

    #[test]
    fn test_descendant_depth_limit() {
        let mut objects = Objects::new();
        objects.insert(
            ObjectRef::new(1, 0),
            Object::Dictionary(dict(vec![
                ("Subtype", name("Type0")),
                (
                    "DescendantFonts",
                    Object::Array(vec![Object::Reference(ObjectRef::new(1, 0))]),
                ),
            ])),
        );
        let result = Font::from_object(
            &Object::Reference(ObjectRef::new(1, 0)),
            &objects,
            &FontConfig::default(),
            &CollectedDiagnostics::new(),
        );
        assert!(matches!(result, Err(Error::RecursionLimitExceeded(4))));
    }

    #[test]
    fn test_descendant_fonts_on_simple_font_ignored() {
        let (font, sink) = build(
            dict(vec![
                ("Subtype", name("Type1")),
                ("BaseFont", name("Helvetica")),
                ("DescendantFonts", Object::Array(vec![])),
            ]),
            &Objects::new(),
        );
        assert!(sink.has(DiagnosticKind::MalformedEntry));
        assert!(font.descendants().is_empty());
    }

    #[test]
    fn test_type3_font_matrix_scaling() {
        let (font, _) = build(
            dict(vec![
                ("Subtype", name("Type3")),
                ("FirstChar", Object::Integer(0)),
                ("Widths", Object::Array(vec![Object::Integer(10), Object::Real(0.5)])),
                (
                    "FontMatrix",
                    Object::Array(vec![
                        Object::Real(0.01),
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Real(0.01),
                        Object::Integer(0),
                        Object::Integer(0),
                    ]),
                ),
            ]),
            &Objects::new(),
        );
        assert!(!font.is_builtin());
        assert_eq!(font.glyph_width(0), Some(100.0));
        assert_eq!(font.glyph_width(1), Some(5.0));
    }

    #[test]
    fn test_no_width_source_is_none() {
        let (font, _) = build(
            dict(vec![
                ("Subtype", name("TrueType")),
                ("BaseFont", name("Arial")),
            ]),
            &Objects::new(),
        );
        assert_eq!(font.glyph_width(65), None);
        assert_eq!(font.cached_width_count(), 1);
    }

    #[test]
    fn test_missing_subtype_is_an_error() {
        let sink = CollectedDiagnostics::new();
        let result = Font::from_dict(
            &dict(vec![("BaseFont", name("Arial"))]),
            &Objects::new(),
            &FontConfig::default(),
            &sink,
        );
        assert!(matches!(result, Err(Error::Font(_))));
    }

    #[test]
    fn test_to_utf8_byte_encoding_mode() {
        let (font, _) = build(
            dict(vec![
                ("Subtype", name("Type1")),
                ("BaseFont", name("Helvetica")),
                ("Encoding", name("WinAnsiEncoding")),
            ]),
            &Objects::new(),
        );
        let decoded = font.to_utf8(&Object::String(b"caf\xE9".to_vec())).unwrap();
        assert_eq!(decoded, Decoded::Text("café".to_string()));
    }

    #[test]
    fn test_to_utf8_shapes() {
        let (font, _) = build(
            dict(vec![("Subtype", name("Type1")), ("BaseFont", name("Helvetica"))]),
            &Objects::new(),
        );
        let seq = Object::Array(vec![
            Object::String(b"A".to_vec()),
            Object::Integer(-120),
            Object::String(b"B".to_vec()),
        ]);
        match font.to_utf8(&seq).unwrap() {
            Decoded::Sequence(items) => {
                assert_eq!(items.len(), 3);
                assert_eq!(items[0].as_text(), Some("A"));
                assert_eq!(items[1], Decoded::Passthrough(Object::Integer(-120)));
                assert_eq!(items[2].as_text(), Some("B"));
            },
            other => panic!("Expected sequence, got {:?}", other),
        }
        assert_eq!(
            font.to_utf8(&Object::Real(1.5)).unwrap(),
            Decoded::Passthrough(Object::Real(1.5))
        );
    }

    #[test]
    fn test_to_utf8_unsupported_encoding() {
        let (font, _) = build(
            dict(vec![
                ("Subtype", name("Type0")),
                ("Encoding", name("UniJIS-UCS2-H")),
            ]),
            &Objects::new(),
        );
        assert!(!font.can_convert_to_utf8());
        match font.to_utf8(&Object::String(vec![0, 1])) {
            Err(Error::Unsupported(msg)) => assert!(msg.contains("UniJIS-UCS2-H")),
            other => panic!("Expected Unsupported, got {:?}", other),
        }
    }

    #[test]
    fn test_set_basefont_selects_symbolic_encodings() {
        let (mut font, _) = build(
            dict(vec![("Subtype", name("Type1")), ("BaseFont", name("Helvetica"))]),
            &Objects::new(),
        );
        font.set_basefont("Symbol");
        assert_eq!(
            font.to_utf8(&Object::String(vec![0x61])).unwrap().as_text(),
            Some("α")
        );

        font.set_basefont("Courier");
        assert!(font.encoding().is_none());
        assert!(font.to_utf8(&Object::String(vec![0x61])).is_err());

        font.set_encoding(Some(EncodingRef::named("MacRomanEncoding")));
        assert_eq!(
            font.to_utf8(&Object::String(vec![0x8E])).unwrap().as_text(),
            Some("é")
        );
    }

    #[test]
    fn test_symbol_basefont_default_encoding() {
        let (font, _) = build(
            dict(vec![("Subtype", name("Type1")), ("BaseFont", name("ZapfDingbats"))]),
            &Objects::new(),
        );
        assert_eq!(
            font.to_utf8(&Object::String(vec![0x33])).unwrap().as_text(),
            Some("✓")
        );
    }

    #[test]
    fn test_unresolved_reference_reported() {
        let (font, sink) = build(
            dict(vec![
                ("Subtype", name("TrueType")),
                ("FontDescriptor", Object::Reference(ObjectRef::new(99, 0))),
            ]),
            &Objects::new(),
        );
        assert!(font.font_descriptor().is_none());
        assert!(sink.has(DiagnosticKind::UnresolvedReference));
    }

    #[test]
    fn test_decoded_flatten() {
        let decoded = Decoded::Sequence(vec![
            Decoded::Text("Hel".to_string()),
            Decoded::Passthrough(Object::Integer(-250)),
            Decoded::Text("lo".to_string()),
        ]);
        assert_eq!(decoded.flatten(), "Hello");
    }
}
