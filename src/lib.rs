// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::enum_variant_names)]
#![allow(clippy::should_implement_trait)]
#![allow(clippy::match_like_matches_macro)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # PDF Font Core
//!
//! Glyph widths and text decoding for fonts referenced by PDF documents.
//!
//! ## Core Features
//!
//! - **Width Resolution**: builtin standard metrics, composite (Type0) delegation,
//!   CID `/W` + `/DW` tables, simple `/Widths` tables and embedded TrueType/OpenType
//!   advances, tried in a fixed order and memoized per code
//! - **Text Decoding**: ToUnicode CMaps (bfchar/bfrange, surrogate pairs, ligatures)
//!   or the font's byte encoding (Standard, WinAnsi, MacRoman, PDFDoc, Symbol,
//!   ZapfDingbats, Identity, /Differences)
//! - **Tolerant Construction**: malformed dictionaries degrade instead of failing;
//!   findings go to an injectable [`Diagnostics`] sink
//!
//! ## Quick Start
//!
//! ```
//! use pdf_font_core::fonts::{Decoded, Font};
//! use pdf_font_core::object::{Object, ObjectRef};
//! use std::collections::HashMap;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut font_dict = HashMap::new();
//! font_dict.insert("Subtype".to_string(), Object::Name("Type1".to_string()));
//! font_dict.insert("BaseFont".to_string(), Object::Name("Helvetica".to_string()));
//!
//! let mut objects: HashMap<ObjectRef, Object> = HashMap::new();
//! objects.insert(ObjectRef::new(5, 0), Object::Dictionary(font_dict));
//!
//! let font = Font::load(&Object::Reference(ObjectRef::new(5, 0)), &objects)?;
//! assert_eq!(font.glyph_width(b'A' as u32), Some(667.0));
//!
//! let text = font.to_utf8(&Object::String(b"Hello".to_vec()))?;
//! assert_eq!(text, Decoded::Text("Hello".to_string()));
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 (<http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license (<http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Object model
pub mod object;

// Stream decoders
pub mod decoders;

// Fonts
pub mod fonts;

// Configuration
pub mod config;

// Data-quality reporting
pub mod diagnostics;

// Re-exports
pub use config::FontConfig;
pub use diagnostics::{CollectedDiagnostics, Diagnostic, DiagnosticKind, Diagnostics, LogDiagnostics};
pub use error::{Error, Result};
pub use fonts::{Decoded, Font};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
