//! Glyph names to Unicode.
//!
//! Covers the Adobe Glyph List names used by the standard Latin encodings,
//! the Symbol font and the common ligatures, plus the `uniXXXX` / `uXXXX`
//! naming conventions used by subset and custom fonts.

use phf::phf_map;

/// Glyph name → Unicode scalar.
static GLYPH_LIST: phf::Map<&'static str, char> = phf_map! {
    "A" => 'A',
    "AE" => 'Æ',
    "Aacute" => 'Á',
    "Acircumflex" => 'Â',
    "Adieresis" => 'Ä',
    "Agrave" => 'À',
    "Aring" => 'Å',
    "Atilde" => 'Ã',
    "B" => 'B',
    "C" => 'C',
    "Ccedilla" => 'Ç',
    "D" => 'D',
    "E" => 'E',
    "Eacute" => 'É',
    "Ecircumflex" => 'Ê',
    "Edieresis" => 'Ë',
    "Egrave" => 'È',
    "Eth" => 'Ð',
    "Euro" => '€',
    "F" => 'F',
    "G" => 'G',
    "H" => 'H',
    "I" => 'I',
    "Iacute" => 'Í',
    "Icircumflex" => 'Î',
    "Idieresis" => 'Ï',
    "Igrave" => 'Ì',
    "J" => 'J',
    "K" => 'K',
    "L" => 'L',
    "Lslash" => 'Ł',
    "M" => 'M',
    "N" => 'N',
    "Ntilde" => 'Ñ',
    "O" => 'O',
    "OE" => 'Œ',
    "Oacute" => 'Ó',
    "Ocircumflex" => 'Ô',
    "Odieresis" => 'Ö',
    "Ograve" => 'Ò',
    "Oslash" => 'Ø',
    "Otilde" => 'Õ',
    "P" => 'P',
    "Q" => 'Q',
    "R" => 'R',
    "S" => 'S',
    "Scaron" => 'Š',
    "T" => 'T',
    "Thorn" => 'Þ',
    "U" => 'U',
    "Uacute" => 'Ú',
    "Ucircumflex" => 'Û',
    "Udieresis" => 'Ü',
    "Ugrave" => 'Ù',
    "V" => 'V',
    "W" => 'W',
    "X" => 'X',
    "Y" => 'Y',
    "Yacute" => 'Ý',
    "Ydieresis" => 'Ÿ',
    "Z" => 'Z',
    "Zcaron" => 'Ž',
    "a" => 'a',
    "aacute" => 'á',
    "acircumflex" => 'â',
    "acute" => '´',
    "adieresis" => 'ä',
    "ae" => 'æ',
    "agrave" => 'à',
    "ampersand" => '&',
    "aring" => 'å',
    "asciicircum" => '^',
    "asciitilde" => '~',
    "asterisk" => '*',
    "at" => '@',
    "atilde" => 'ã',
    "b" => 'b',
    "backslash" => '\\',
    "bar" => '|',
    "braceleft" => '{',
    "braceright" => '}',
    "bracketleft" => '[',
    "bracketright" => ']',
    "breve" => '˘',
    "brokenbar" => '¦',
    "bullet" => '•',
    "c" => 'c',
    "caron" => 'ˇ',
    "ccedilla" => 'ç',
    "cedilla" => '¸',
    "cent" => '¢',
    "circumflex" => 'ˆ',
    "colon" => ':',
    "comma" => ',',
    "copyright" => '©',
    "currency" => '¤',
    "d" => 'd',
    "dagger" => '†',
    "daggerdbl" => '‡',
    "degree" => '°',
    "dieresis" => '¨',
    "divide" => '÷',
    "dollar" => '$',
    "dotaccent" => '˙',
    "dotlessi" => 'ı',
    "e" => 'e',
    "eacute" => 'é',
    "ecircumflex" => 'ê',
    "edieresis" => 'ë',
    "egrave" => 'è',
    "eight" => '8',
    "ellipsis" => '…',
    "emdash" => '—',
    "endash" => '–',
    "equal" => '=',
    "eth" => 'ð',
    "exclam" => '!',
    "exclamdown" => '¡',
    "f" => 'f',
    "ff" => 'ﬀ',
    "ffi" => 'ﬃ',
    "ffl" => 'ﬄ',
    "fi" => 'ﬁ',
    "five" => '5',
    "fl" => 'ﬂ',
    "florin" => 'ƒ',
    "four" => '4',
    "fraction" => '⁄',
    "g" => 'g',
    "germandbls" => 'ß',
    "grave" => '`',
    "greater" => '>',
    "guillemotleft" => '«',
    "guillemotright" => '»',
    "guilsinglleft" => '‹',
    "guilsinglright" => '›',
    "h" => 'h',
    "hungarumlaut" => '˝',
    "hyphen" => '-',
    "i" => 'i',
    "iacute" => 'í',
    "icircumflex" => 'î',
    "idieresis" => 'ï',
    "igrave" => 'ì',
    "j" => 'j',
    "k" => 'k',
    "l" => 'l',
    "less" => '<',
    "logicalnot" => '¬',
    "lslash" => 'ł',
    "m" => 'm',
    "macron" => '¯',
    "minus" => '−',
    "mu" => 'µ',
    "multiply" => '×',
    "n" => 'n',
    "nbspace" => '\u{A0}',
    "nine" => '9',
    "ntilde" => 'ñ',
    "numbersign" => '#',
    "o" => 'o',
    "oacute" => 'ó',
    "ocircumflex" => 'ô',
    "odieresis" => 'ö',
    "oe" => 'œ',
    "ogonek" => '˛',
    "ograve" => 'ò',
    "one" => '1',
    "onehalf" => '½',
    "onequarter" => '¼',
    "onesuperior" => '¹',
    "ordfeminine" => 'ª',
    "ordmasculine" => 'º',
    "oslash" => 'ø',
    "otilde" => 'õ',
    "p" => 'p',
    "paragraph" => '¶',
    "parenleft" => '(',
    "parenright" => ')',
    "percent" => '%',
    "period" => '.',
    "periodcentered" => '·',
    "perthousand" => '‰',
    "plus" => '+',
    "plusminus" => '±',
    "q" => 'q',
    "question" => '?',
    "questiondown" => '¿',
    "quotedbl" => '"',
    "quotedblbase" => '„',
    "quotedblleft" => '“',
    "quotedblright" => '”',
    "quoteleft" => '‘',
    "quoteright" => '’',
    "quotesinglbase" => '‚',
    "quotesingle" => '\'',
    "r" => 'r',
    "registered" => '®',
    "ring" => '˚',
    "s" => 's',
    "scaron" => 'š',
    "section" => '§',
    "semicolon" => ';',
    "seven" => '7',
    "sfthyphen" => '\u{AD}',
    "six" => '6',
    "slash" => '/',
    "space" => ' ',
    "sterling" => '£',
    "t" => 't',
    "thorn" => 'þ',
    "three" => '3',
    "threequarters" => '¾',
    "threesuperior" => '³',
    "tilde" => '˜',
    "trademark" => '™',
    "two" => '2',
    "twosuperior" => '²',
    "u" => 'u',
    "uacute" => 'ú',
    "ucircumflex" => 'û',
    "udieresis" => 'ü',
    "ugrave" => 'ù',
    "underscore" => '_',
    "v" => 'v',
    "w" => 'w',
    "x" => 'x',
    "y" => 'y',
    "yacute" => 'ý',
    "ydieresis" => 'ÿ',
    "yen" => '¥',
    "z" => 'z',
    "zcaron" => 'ž',
    "zero" => '0',
    "Alpha" => 'Α',
    "Beta" => 'Β',
    "Chi" => 'Χ',
    "Delta" => '∆',
    "Epsilon" => 'Ε',
    "Eta" => 'Η',
    "Gamma" => 'Γ',
    "Iota" => 'Ι',
    "Kappa" => 'Κ',
    "Lambda" => 'Λ',
    "Mu" => 'Μ',
    "Nu" => 'Ν',
    "Omega" => 'Ω',
    "Omicron" => 'Ο',
    "Phi" => 'Φ',
    "Pi" => 'Π',
    "Psi" => 'Ψ',
    "Rho" => 'Ρ',
    "Sigma" => 'Σ',
    "Tau" => 'Τ',
    "Theta" => 'Θ',
    "Upsilon" => 'Υ',
    "Xi" => 'Ξ',
    "Zeta" => 'Ζ',
    "alpha" => 'α',
    "beta" => 'β',
    "chi" => 'χ',
    "delta" => 'δ',
    "epsilon" => 'ε',
    "eta" => 'η',
    "gamma" => 'γ',
    "iota" => 'ι',
    "kappa" => 'κ',
    "lambda" => 'λ',
    "nu" => 'ν',
    "omega" => 'ω',
    "omicron" => 'ο',
    "phi" => 'φ',
    "phi1" => 'ϕ',
    "pi" => 'π',
    "psi" => 'ψ',
    "rho" => 'ρ',
    "sigma" => 'σ',
    "sigma1" => 'ς',
    "tau" => 'τ',
    "theta" => 'θ',
    "theta1" => 'ϑ',
    "upsilon" => 'υ',
    "xi" => 'ξ',
    "zeta" => 'ζ',
    "omega1" => 'ϖ',
    "aleph" => 'ℵ',
    "angle" => '∠',
    "angleleft" => '〈',
    "angleright" => '〉',
    "approxequal" => '≈',
    "arrowboth" => '↔',
    "arrowdown" => '↓',
    "arrowleft" => '←',
    "arrowright" => '→',
    "arrowup" => '↑',
    "arrowdblboth" => '⇔',
    "arrowdbldown" => '⇓',
    "arrowdblleft" => '⇐',
    "arrowdblright" => '⇒',
    "arrowdblup" => '⇑',
    "asteriskmath" => '∗',
    "carriagereturn" => '↵',
    "circlemultiply" => '⊗',
    "circleplus" => '⊕',
    "club" => '♣',
    "congruent" => '≅',
    "diamond" => '♦',
    "dotmath" => '⋅',
    "element" => '∈',
    "emptyset" => '∅',
    "equivalence" => '≡',
    "existential" => '∃',
    "gradient" => '∇',
    "greaterequal" => '≥',
    "heart" => '♥',
    "infinity" => '∞',
    "integral" => '∫',
    "intersection" => '∩',
    "lessequal" => '≤',
    "logicaland" => '∧',
    "logicalor" => '∨',
    "lozenge" => '◊',
    "notelement" => '∉',
    "notequal" => '≠',
    "notsubset" => '⊄',
    "partialdiff" => '∂',
    "perpendicular" => '⊥',
    "product" => '∏',
    "propersubset" => '⊂',
    "propersuperset" => '⊃',
    "proportional" => '∝',
    "radical" => '√',
    "reflexsubset" => '⊆',
    "reflexsuperset" => '⊇',
    "similar" => '∼',
    "spade" => '♠',
    "suchthat" => '∋',
    "summation" => '∑',
    "therefore" => '∴',
    "union" => '∪',
    "universal" => '∀',
    "weierstrass" => '℘',
    "Ifraktur" => 'ℑ',
    "Rfraktur" => 'ℜ',
};

/// Map a glyph name to the Unicode text it represents.
///
/// Suffixes after a period (`a.sc`, `one.oldstyle`) are ignored and
/// underscore-joined ligature names (`f_f_i`) map to the concatenation of
/// their components.
pub fn glyph_name_to_unicode(glyph_name: &str) -> Option<String> {
    let base = glyph_name.split('.').next().unwrap_or(glyph_name);
    if base.is_empty() {
        return None;
    }

    if base.contains('_') {
        return base
            .split('_')
            .map(component_to_unicode)
            .collect::<Option<String>>();
    }
    component_to_unicode(base)
}

fn component_to_unicode(name: &str) -> Option<String> {
    if let Some(&ch) = GLYPH_LIST.get(name) {
        return Some(ch.to_string());
    }

    // uniXXXX, uniXXXXYYYY, ...: groups of exactly four hex digits
    if let Some(hex) = name.strip_prefix("uni") {
        if !hex.is_empty() && hex.len() % 4 == 0 {
            let mut out = String::new();
            for i in (0..hex.len()).step_by(4) {
                let scalar = u32::from_str_radix(hex.get(i..i + 4)?, 16).ok()?;
                out.push(char::from_u32(scalar)?);
            }
            return Some(out);
        }
    }

    // uXXXX .. uXXXXXX
    if let Some(hex) = name.strip_prefix('u') {
        if (4..=6).contains(&hex.len()) && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            let scalar = u32::from_str_radix(hex, 16).ok()?;
            return char::from_u32(scalar).map(|c| c.to_string());
        }
    }

    log::trace!("Unknown glyph name '{}'", name);
    None
}
