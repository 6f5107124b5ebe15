//! Font handling: width resolution and text decoding.
//!
//! [`Font`] is the entry point. The other modules are the pieces it is
//! assembled from and can be used on their own.

pub mod cid_widths;
pub mod cmap;
pub mod descriptor;
pub mod encoding;
mod font;
pub mod glyph_list;
pub mod metrics;

pub use cid_widths::CidWidths;
pub use cmap::ToUnicodeMap;
pub use descriptor::{EmbeddedProgram, FontDescriptor};
pub use encoding::{BaseEncoding, Encoding, EncodingRef, UnpackFormat};
pub use font::{CodeInput, Decoded, Font, FontKind, FontSubtype};
