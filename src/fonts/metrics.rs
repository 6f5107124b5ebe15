//! Builtin metrics for standard fonts a document does not embed.
//!
//! Only Helvetica is tabulated. Other standard fonts measure at a single
//! configurable fallback width (see [`FontConfig`](crate::config::FontConfig)).

use super::encoding::BaseEncoding;
use phf::phf_map;

/// Basefont name whose metrics are tabulated.
pub const HELVETICA: &str = "Helvetica";

/// Helvetica advance widths from the AFM, keyed by Unicode scalar.
static HELVETICA_WIDTHS: phf::Map<char, u16> = phf_map! {
    ' ' => 278, '!' => 278, '"' => 355, '#' => 556, '$' => 556, '%' => 889,
    '&' => 667, '\u{2019}' => 222, '(' => 333, ')' => 333, '*' => 389,
    '+' => 584, ',' => 278, '-' => 333, '.' => 278, '/' => 278,
    '0' => 556, '1' => 556, '2' => 556, '3' => 556, '4' => 556,
    '5' => 556, '6' => 556, '7' => 556, '8' => 556, '9' => 556,
    ':' => 278, ';' => 278, '<' => 584, '=' => 584, '>' => 584, '?' => 556,
    '@' => 1015,
    'A' => 667, 'B' => 667, 'C' => 722, 'D' => 722, 'E' => 667, 'F' => 611,
    'G' => 778, 'H' => 722, 'I' => 278, 'J' => 500, 'K' => 667, 'L' => 556,
    'M' => 833, 'N' => 722, 'O' => 778, 'P' => 667, 'Q' => 778, 'R' => 722,
    'S' => 667, 'T' => 611, 'U' => 722, 'V' => 667, 'W' => 944, 'X' => 667,
    'Y' => 667, 'Z' => 611,
    '[' => 278, '\\' => 278, ']' => 278, '^' => 469, '_' => 556,
    '\u{2018}' => 222,
    'a' => 556, 'b' => 556, 'c' => 500, 'd' => 556, 'e' => 556, 'f' => 278,
    'g' => 556, 'h' => 556, 'i' => 222, 'j' => 222, 'k' => 500, 'l' => 222,
    'm' => 833, 'n' => 556, 'o' => 556, 'p' => 556, 'q' => 556, 'r' => 333,
    's' => 500, 't' => 278, 'u' => 556, 'v' => 500, 'w' => 722, 'x' => 500,
    'y' => 500, 'z' => 500,
    '{' => 334, '|' => 260, '}' => 334, '~' => 584,
    '¡' => 333, '¢' => 556, '£' => 556, '\u{2044}' => 167, '¥' => 556,
    'ƒ' => 556, '§' => 556, '¤' => 556, '\'' => 191, '\u{201C}' => 333,
    '«' => 556, '\u{2039}' => 333, '\u{203A}' => 333, '\u{FB01}' => 500,
    '\u{FB02}' => 500, '\u{2013}' => 556, '†' => 556, '‡' => 556, '·' => 278,
    '¶' => 537, '•' => 350, '\u{201A}' => 222, '\u{201E}' => 333,
    '\u{201D}' => 333, '»' => 556, '…' => 1000, '‰' => 1000, '¿' => 611,
    '`' => 333, '´' => 333, 'ˆ' => 333, '˜' => 333, '¯' => 333, '˘' => 333,
    '˙' => 333, '¨' => 333, '˚' => 333, '¸' => 333, '˝' => 333, '˛' => 333,
    'ˇ' => 333, '\u{2014}' => 1000,
    'Æ' => 1000, 'ª' => 370, 'Ł' => 556, 'Ø' => 778, 'Œ' => 1000, 'º' => 365,
    'æ' => 889, 'ı' => 278, 'ł' => 222, 'ø' => 611, 'œ' => 944, 'ß' => 611,
    '\u{A0}' => 278, '\u{AD}' => 333, '€' => 556, '™' => 1000, '©' => 737,
    '®' => 737, '°' => 400, '±' => 584, '×' => 584, '÷' => 584, '¬' => 584,
    'µ' => 556, '¦' => 260, '¹' => 333, '²' => 333, '³' => 333,
    '¼' => 834, '½' => 834, '¾' => 834, '−' => 584,
    'À' => 667, 'Á' => 667, 'Â' => 667, 'Ã' => 667, 'Ä' => 667, 'Å' => 667,
    'Ç' => 722, 'È' => 667, 'É' => 667, 'Ê' => 667, 'Ë' => 667,
    'Ì' => 278, 'Í' => 278, 'Î' => 278, 'Ï' => 278, 'Ð' => 722, 'Ñ' => 722,
    'Ò' => 778, 'Ó' => 778, 'Ô' => 778, 'Õ' => 778, 'Ö' => 778,
    'Ù' => 722, 'Ú' => 722, 'Û' => 722, 'Ü' => 722, 'Ý' => 667, 'Þ' => 667,
    'à' => 556, 'á' => 556, 'â' => 556, 'ã' => 556, 'ä' => 556, 'å' => 556,
    'ç' => 500, 'è' => 556, 'é' => 556, 'ê' => 556, 'ë' => 556,
    'ì' => 278, 'í' => 278, 'î' => 278, 'ï' => 278, 'ð' => 556, 'ñ' => 556,
    'ò' => 556, 'ó' => 556, 'ô' => 556, 'õ' => 556, 'ö' => 556,
    'ù' => 556, 'ú' => 556, 'û' => 556, 'ü' => 556, 'ý' => 500, 'þ' => 556,
    'ÿ' => 500, 'Š' => 667, 'š' => 500, 'Ž' => 611, 'ž' => 500, 'Ÿ' => 667,
};

/// Width of `ch` in Helvetica, in glyph units; 0 if Helvetica has no such glyph.
pub fn width_for_char(ch: char) -> f64 {
    HELVETICA_WIDTHS.get(&ch).copied().unwrap_or(0) as f64
}

/// Width of a StandardEncoding code in Helvetica, in glyph units.
pub fn width_for(code: u32) -> f64 {
    BaseEncoding::Standard
        .lookup(code)
        .map(width_for_char)
        .unwrap_or(0.0)
}

/// True if `basefont` names the tabulated font.
pub fn is_tabulated(basefont: &str) -> bool {
    basefont == HELVETICA
}
