//! Segment accounting for GSM 7-bit and UCS-2 messages.

use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::charset::gsm_length;

/// Septets available in a single-part GSM message.
pub const SINGLE_PART_GSM_LENGTH: usize = 160;
/// Septets available per part of a multi-part GSM message.
pub const MULTI_PART_GSM_LENGTH: usize = 153;
/// Characters available in a single-part UCS-2 message.
pub const SINGLE_PART_UNICODE_LENGTH: usize = 70;
/// Characters available per part of a multi-part UCS-2 message.
pub const MULTI_PART_UNICODE_LENGTH: usize = 67;

/// Encoding a message is sent with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// GSM 03.38 default alphabet.
    Gsm7,
    /// UTF-16 code units, used when any character is outside the GSM table.
    Ucs2,
}

impl Encoding {
    pub fn single_part_limit(self) -> usize {
        match self {
            Encoding::Gsm7 => SINGLE_PART_GSM_LENGTH,
            Encoding::Ucs2 => SINGLE_PART_UNICODE_LENGTH,
        }
    }

    pub fn multi_part_limit(self) -> usize {
        match self {
            Encoding::Gsm7 => MULTI_PART_GSM_LENGTH,
            Encoding::Ucs2 => MULTI_PART_UNICODE_LENGTH,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Gsm7 => f.write_str("gsm7"),
            Encoding::Ucs2 => f.write_str("ucs2"),
        }
    }
}

/// Result of counting a message.
///
/// Displays as `remaining/parts`, the format shown next to the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segments {
    pub encoding: Encoding,
    /// Length in septets (GSM) or UTF-16 code units (UCS-2).
    pub length: usize,
    pub parts: usize,
    /// Characters left before the next part boundary.
    pub remaining: i64,
}

impl fmt::Display for Segments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.remaining, self.parts)
    }
}

/// Count the parts `message` occupies and the characters left in the last one.
///
/// A message that fits the single-part limit is one part even when it is longer
/// than the multi-part limit.
///
/// ```rust
/// use sms_segments::{compute_segments, Encoding};
///
/// let segments = compute_segments(&"a".repeat(161));
/// assert_eq!(segments.encoding, Encoding::Gsm7);
/// assert_eq!(segments.to_string(), "145/2");
/// ```
pub fn compute_segments(message: &str) -> Segments {
    let (encoding, length) = match gsm_length(message) {
        Some(length) => (Encoding::Gsm7, length),
        None => {
            debug!("message has characters outside the GSM table, counting as UCS-2");
            (Encoding::Ucs2, message.encode_utf16().count())
        }
    };

    let single = encoding.single_part_limit();
    let multi = encoding.multi_part_limit();
    let (parts, remaining) = if length <= single {
        (1, single as i64 - length as i64)
    } else {
        let parts = length.div_ceil(multi);
        (parts, (parts * multi) as i64 - length as i64)
    };

    Segments {
        encoding,
        length,
        parts,
        remaining,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(message: &str) -> (Encoding, usize, i64) {
        let s = compute_segments(message);
        (s.encoding, s.parts, s.remaining)
    }

    #[test]
    fn test_empty_message() {
        assert_eq!(count(""), (Encoding::Gsm7, 1, 160));
        assert_eq!(compute_segments("").to_string(), "160/1");
    }

    #[test]
    fn test_single_part_gsm() {
        for len in [1, 42, 152, 153, 154, 159, 160] {
            assert_eq!(
                count(&"x".repeat(len)),
                (Encoding::Gsm7, 1, 160 - len as i64),
                "length {len}"
            );
        }
    }

    #[test]
    fn test_threshold_uses_single_part_limit() {
        assert_eq!(count(&"x".repeat(153)), (Encoding::Gsm7, 1, 7));
        assert_eq!(count(&"x".repeat(154)), (Encoding::Gsm7, 1, 6));
        assert_eq!(count(&"x".repeat(161)), (Encoding::Gsm7, 2, 145));
    }

    #[test]
    fn test_multi_part_gsm() {
        assert_eq!(count(&"x".repeat(306)), (Encoding::Gsm7, 2, 0));
        assert_eq!(count(&"x".repeat(307)), (Encoding::Gsm7, 3, 152));
        assert_eq!(count(&"x".repeat(459)), (Encoding::Gsm7, 3, 0));
    }

    #[test]
    fn test_extension_character_counts_twice() {
        let mut message = "x".repeat(159);
        message.push('{');
        let s = compute_segments(&message);
        assert_eq!(s.length, 161);
        assert_eq!((s.parts, s.remaining), (2, 145));

        let s = compute_segments(&"\u{20AC}".repeat(80));
        assert_eq!((s.length, s.parts, s.remaining), (160, 1, 0));
    }

    #[test]
    fn test_unsupported_character_switches_to_ucs2() {
        // the emoji is two UTF-16 code units
        let s = compute_segments("Hi \u{1F600}");
        assert_eq!(s.encoding, Encoding::Ucs2);
        assert_eq!(s.length, 5);
        assert_eq!((s.parts, s.remaining), (1, 65));
    }

    #[test]
    fn test_whole_message_falls_back() {
        // mostly GSM text, one CJK character
        let mut message = "x".repeat(69);
        message.push('\u{4E2D}');
        assert_eq!(count(&message), (Encoding::Ucs2, 1, 0));

        message.push('x');
        assert_eq!(count(&message), (Encoding::Ucs2, 2, 63));
    }

    #[test]
    fn test_multi_part_ucs2() {
        let message = "\u{4E2D}".repeat(134);
        assert_eq!(count(&message), (Encoding::Ucs2, 2, 0));
        let message = "\u{4E2D}".repeat(135);
        assert_eq!(count(&message), (Encoding::Ucs2, 3, 66));
    }

    #[test]
    fn test_greek_capitals_are_gsm() {
        let s = compute_segments("\u{0391}\u{0394}A");
        assert_eq!((s.encoding, s.length), (Encoding::Gsm7, 3));
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_value(compute_segments("hello")).unwrap();
        assert_eq!(json["encoding"], "gsm7");
        assert_eq!(json["parts"], 1);
        assert_eq!(json["remaining"], 155);
    }
}
