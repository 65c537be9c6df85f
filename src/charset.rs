//! GSM 03.38 character map and the codec built on it.
//!
//! The map is an ordered list of `(gsm, unicode)` pairs. Several Unicode
//! characters share a GSM code (`ç`/`Ç`, Greek capitals that look like Latin
//! ones), so lookups in either direction resolve to the first pair in table
//! order.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

use crate::{Result, SmsError};

/// The GSM escape septet that prefixes extension table characters.
pub const ESCAPE: u8 = 0x1B;

/// A GSM code: a single septet, or an escape sequence stored as `0x1Bxx`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GsmCode(pub u16);

impl GsmCode {
    /// Whether this code needs the two septet escape sequence.
    pub fn is_extension(self) -> bool {
        self.0 > 0x7F
    }

    /// Number of septets this code occupies in a message.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(self) -> usize {
        if self.is_extension() { 2 } else { 1 }
    }

    /// The septets for this code, in transmission order.
    pub fn septets(self) -> ([u8; 2], usize) {
        if self.is_extension() {
            ([ESCAPE, (self.0 & 0xFF) as u8], 2)
        } else {
            ([self.0 as u8, 0], 1)
        }
    }
}

impl fmt::Display for GsmCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_extension() {
            write!(f, "0x{:04X}", self.0)
        } else {
            write!(f, "0x{:02X}", self.0)
        }
    }
}

/// Canonical GSM to Unicode table. Order matters: the first entry wins for
/// duplicated codes and duplicated characters.
pub static GSM_TO_UNICODE: &[(u16, char)] = &[
    (0x00, '@'),
    (0x00, '\u{0000}'),
    (0x01, '\u{00A3}'), // £
    (0x02, '$'),
    (0x03, '\u{00A5}'), // ¥
    (0x04, '\u{00E8}'), // è
    (0x05, '\u{00E9}'), // é
    (0x06, '\u{00F9}'), // ù
    (0x07, '\u{00EC}'), // ì
    (0x08, '\u{00F2}'), // ò
    (0x09, '\u{00E7}'), // ç
    (0x09, '\u{00C7}'), // Ç
    (0x0A, '\n'),
    (0x0B, '\u{00D8}'), // Ø
    (0x0C, '\u{00F8}'), // ø
    (0x0D, '\r'),
    (0x0E, '\u{00C5}'), // Å
    (0x0F, '\u{00E5}'), // å
    (0x10, '\u{0394}'), // Δ
    (0x11, '_'),
    (0x12, '\u{03A6}'), // Φ
    (0x13, '\u{0393}'), // Γ
    (0x14, '\u{039B}'), // Λ
    (0x15, '\u{03A9}'), // Ω
    (0x16, '\u{03A0}'), // Π
    (0x17, '\u{03A8}'), // Ψ
    (0x18, '\u{03A3}'), // Σ
    (0x19, '\u{0398}'), // Θ
    (0x1A, '\u{039E}'), // Ξ
    (0x1B, '\u{00A0}'), // bare escape reads as a no-break space
    (0x1B0A, '\u{000C}'),
    (0x1B14, '^'),
    (0x1B28, '{'),
    (0x1B29, '}'),
    (0x1B2F, '\\'),
    (0x1B3C, '['),
    (0x1B3D, '~'),
    (0x1B3E, ']'),
    (0x1B40, '|'),
    (0x1B65, '\u{20AC}'), // €
    (0x1C, '\u{00C6}'),   // Æ
    (0x1D, '\u{00E6}'),   // æ
    (0x1E, '\u{00DF}'),   // ß
    (0x1F, '\u{00C9}'),   // É
    (0x20, ' '),
    (0x21, '!'),
    (0x22, '"'),
    (0x23, '#'),
    (0x24, '\u{00A4}'), // ¤
    (0x25, '%'),
    (0x26, '&'),
    (0x27, '\''),
    (0x28, '('),
    (0x29, ')'),
    (0x2A, '*'),
    (0x2B, '+'),
    (0x2C, ','),
    (0x2D, '-'),
    (0x2E, '.'),
    (0x2F, '/'),
    (0x30, '0'),
    (0x31, '1'),
    (0x32, '2'),
    (0x33, '3'),
    (0x34, '4'),
    (0x35, '5'),
    (0x36, '6'),
    (0x37, '7'),
    (0x38, '8'),
    (0x39, '9'),
    (0x3A, ':'),
    (0x3B, ';'),
    (0x3C, '<'),
    (0x3D, '='),
    (0x3E, '>'),
    (0x3F, '?'),
    (0x40, '\u{00A1}'), // ¡
    (0x41, 'A'),
    (0x41, '\u{0391}'), // Alpha
    (0x42, 'B'),
    (0x42, '\u{0392}'), // Beta
    (0x43, 'C'),
    (0x44, 'D'),
    (0x45, 'E'),
    (0x45, '\u{0395}'), // Epsilon
    (0x46, 'F'),
    (0x47, 'G'),
    (0x48, 'H'),
    (0x48, '\u{0397}'), // Eta
    (0x49, 'I'),
    (0x49, '\u{0399}'), // Iota
    (0x4A, 'J'),
    (0x4B, 'K'),
    (0x4B, '\u{039A}'), // Kappa
    (0x4C, 'L'),
    (0x4D, 'M'),
    (0x4D, '\u{039C}'), // Mu
    (0x4E, 'N'),
    (0x4E, '\u{039D}'), // Nu
    (0x4F, 'O'),
    (0x4F, '\u{039F}'), // Omicron
    (0x50, 'P'),
    (0x50, '\u{03A1}'), // Rho
    (0x51, 'Q'),
    (0x52, 'R'),
    (0x53, 'S'),
    (0x54, 'T'),
    (0x54, '\u{03A4}'), // Tau
    (0x55, 'U'),
    (0x56, 'V'),
    (0x57, 'W'),
    (0x58, 'X'),
    (0x58, '\u{03A7}'), // Chi
    (0x59, 'Y'),
    (0x59, '\u{03A5}'), // Upsilon
    (0x5A, 'Z'),
    (0x5A, '\u{0396}'), // Zeta
    (0x5B, '\u{00C4}'), // Ä
    (0x5C, '\u{00D6}'), // Ö
    (0x5D, '\u{00D1}'), // Ñ
    (0x5E, '\u{00DC}'), // Ü
    (0x5F, '\u{00A7}'), // §
    (0x60, '\u{00BF}'), // ¿
    (0x61, 'a'),
    (0x62, 'b'),
    (0x63, 'c'),
    (0x64, 'd'),
    (0x65, 'e'),
    (0x66, 'f'),
    (0x67, 'g'),
    (0x68, 'h'),
    (0x69, 'i'),
    (0x6A, 'j'),
    (0x6B, 'k'),
    (0x6C, 'l'),
    (0x6D, 'm'),
    (0x6E, 'n'),
    (0x6F, 'o'),
    (0x70, 'p'),
    (0x71, 'q'),
    (0x72, 'r'),
    (0x73, 's'),
    (0x74, 't'),
    (0x75, 'u'),
    (0x76, 'v'),
    (0x77, 'w'),
    (0x78, 'x'),
    (0x79, 'y'),
    (0x7A, 'z'),
    (0x7B, '\u{00E4}'), // ä
    (0x7C, '\u{00F6}'), // ö
    (0x7D, '\u{00F1}'), // ñ
    (0x7E, '\u{00FC}'), // ü
    (0x7F, '\u{00E0}'), // à
];

/// Both lookup directions, built once from [`GSM_TO_UNICODE`].
static GSM_MAPS: Lazy<(HashMap<char, GsmCode>, HashMap<u16, char>)> = Lazy::new(|| {
    let mut char_to_gsm = HashMap::with_capacity(GSM_TO_UNICODE.len());
    let mut gsm_to_char = HashMap::with_capacity(GSM_TO_UNICODE.len());

    // Never overwrite: the first pair in table order wins.
    for &(code, ch) in GSM_TO_UNICODE {
        char_to_gsm.entry(ch).or_insert(GsmCode(code));
        gsm_to_char.entry(code).or_insert(ch);
    }

    (char_to_gsm, gsm_to_char)
});

/// Look up the GSM code for a Unicode character.
pub fn lookup(ch: char) -> Option<GsmCode> {
    GSM_MAPS.0.get(&ch).copied()
}

/// Look up the Unicode character for a GSM code.
pub fn lookup_code(code: GsmCode) -> Option<char> {
    GSM_MAPS.1.get(&code.0).copied()
}

/// Number of septets `message` occupies in GSM 7-bit encoding.
///
/// Returns `None` as soon as a character has no GSM mapping; the caller is
/// expected to fall back to Unicode accounting for the whole message.
pub fn gsm_length(message: &str) -> Option<usize> {
    message
        .chars()
        .try_fold(0usize, |len, ch| lookup(ch).map(|code| len + code.len()))
}

/// Check if a string is representable in GSM 7-bit.
pub fn is_gsm_compatible(message: &str) -> bool {
    gsm_length(message).is_some()
}

/// Configuration options for GSM 7-bit encoding/decoding.
#[derive(Debug, Clone)]
pub struct CodecConfig {
    /// Fail on unsupported input instead of substituting `replacement_char`.
    pub strict: bool,
    /// Substitute for unsupported characters or bytes in non-strict mode.
    pub replacement_char: char,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            strict: false,
            replacement_char: '?',
        }
    }
}

impl CodecConfig {
    /// Create a config with strict mode enabled.
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }
}

/// Encode a string to unpacked GSM septets, replacing unsupported characters.
///
/// ```rust
/// use sms_segments::encode;
///
/// assert_eq!(encode("A{")?, vec![0x41, 0x1B, 0x28]);
/// # Ok::<(), sms_segments::SmsError>(())
/// ```
pub fn encode(content: &str) -> Result<Vec<u8>> {
    encode_with_config(content, &CodecConfig::default())
}

/// Encode a string to unpacked GSM septets with custom configuration.
///
/// U+00A0 counts as one septet but is sent as a plain space: a bare escape
/// septet would swallow the character after it.
///
/// # Errors
///
/// Returns `SmsError::UnsupportedCharacter` in strict mode when `content`
/// contains a character outside the GSM table.
pub fn encode_with_config(content: &str, config: &CodecConfig) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(content.len());

    for ch in content.chars() {
        let code = match lookup(ch) {
            Some(GsmCode(code)) if code == u16::from(ESCAPE) => GsmCode(0x20),
            Some(code) => code,
            None if config.strict => {
                return Err(SmsError::UnsupportedCharacter {
                    character: ch,
                    code: ch as u32,
                });
            }
            // space when the replacement itself has no GSM code
            None => lookup(config.replacement_char).unwrap_or(GsmCode(0x20)),
        };
        let (septets, n) = code.septets();
        bytes.extend_from_slice(&septets[..n]);
    }

    Ok(bytes)
}

/// Decode unpacked GSM septets, replacing invalid input.
pub fn decode(data: &[u8]) -> Result<String> {
    decode_with_config(data, &CodecConfig::default())
}

/// Decode unpacked GSM septets with custom configuration.
///
/// A trailing escape septet decodes to U+00A0, which is what the table maps a
/// bare escape to.
///
/// # Errors
///
/// In strict mode, returns `SmsError::InvalidEscapeSequence` for an escape
/// followed by a code outside the extension table and `SmsError::InvalidByte`
/// for bytes above 0x7F.
pub fn decode_with_config(data: &[u8], config: &CodecConfig) -> Result<String> {
    let mut result = String::with_capacity(data.len());
    let mut bytes = data.iter().copied();

    while let Some(byte) = bytes.next() {
        if byte == ESCAPE {
            let Some(next) = bytes.next() else {
                result.push('\u{00A0}');
                break;
            };
            match lookup_code(GsmCode((u16::from(ESCAPE) << 8) | u16::from(next))) {
                Some(ch) => result.push(ch),
                None if config.strict => {
                    return Err(SmsError::InvalidEscapeSequence { code: next });
                }
                None => result.push(config.replacement_char),
            }
        } else if byte <= 0x7F {
            match lookup_code(GsmCode(u16::from(byte))) {
                Some(ch) => result.push(ch),
                None if config.strict => return Err(SmsError::InvalidByte { byte }),
                None => result.push(config.replacement_char),
            }
        } else if config.strict {
            return Err(SmsError::InvalidByte { byte });
        } else {
            result.push(config.replacement_char);
        }
    }

    Ok(result)
}
