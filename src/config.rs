//! Configuration for font construction and resolution.

/// Default replacement for codes a Unicode map or encoding cannot decode
/// (U+25AF WHITE VERTICAL RECTANGLE).
pub const UNKNOWN_GLYPH: char = '\u{25AF}';

/// Font handling configuration.
#[derive(Debug, Clone)]
pub struct FontConfig {
    /// Encoding assigned to a root font whose dictionary has no /Encoding.
    pub default_encoding: String,

    /// Width reported for every code of a builtin font without tabulated metrics.
    pub builtin_fallback_width: f64,

    /// Placeholder emitted for codes with no Unicode mapping.
    pub unknown_glyph: char,

    /// Maximum nesting of DescendantFonts below a root font.
    pub max_descendant_depth: u32,

    /// Upper bound on decoded ToUnicode / font program stream size (0 = unlimited).
    pub max_stream_size: usize,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl FontConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            default_encoding: "StandardEncoding".to_string(),
            builtin_fallback_width: 500.0,
            unknown_glyph: UNKNOWN_GLYPH,
            max_descendant_depth: 4,
            max_stream_size: 16 * 1024 * 1024,
        }
    }

    /// Set the encoding used for root fonts without an /Encoding entry.
    pub fn with_default_encoding(mut self, name: impl Into<String>) -> Self {
        self.default_encoding = name.into();
        self
    }

    /// Set the width used for builtin fonts without tabulated metrics.
    pub fn with_builtin_fallback_width(mut self, width: f64) -> Self {
        self.builtin_fallback_width = width;
        self
    }

    /// Set the placeholder for undecodable codes.
    pub fn with_unknown_glyph(mut self, glyph: char) -> Self {
        self.unknown_glyph = glyph;
        self
    }

    /// Set the maximum DescendantFonts nesting.
    pub fn with_max_descendant_depth(mut self, depth: u32) -> Self {
        self.max_descendant_depth = depth;
        self
    }

    /// Set the decoded stream size limit.
    pub fn with_max_stream_size(mut self, bytes: usize) -> Self {
        self.max_stream_size = bytes;
        self
    }
}
