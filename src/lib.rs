//! SMS segment counting with GSM 7-bit awareness.
//!
//! A message is sent in the GSM 03.38 default alphabet when every character
//! is in the GSM table, and as UCS-2 otherwise. This crate works out which
//! encoding applies, how many parts the message needs and how many characters
//! are left before the next part boundary.
//!
//! # Example
//!
//! ```rust
//! use sms_segments::{compute_segments, Encoding};
//!
//! let segments = compute_segments("Hello {world} \u{20AC}!");
//! assert_eq!(segments.encoding, Encoding::Gsm7);
//! assert_eq!(segments.length, 19);
//! assert_eq!(segments.to_string(), "141/1");
//! ```

use thiserror::Error;

pub mod charset;
pub mod counter;
pub mod segments;

pub use charset::{
    CodecConfig, GsmCode, decode, decode_with_config, encode, encode_with_config, gsm_length,
    is_gsm_compatible,
};
pub use counter::{CounterConfig, MaxParts, SmsCounter};
pub use segments::{Encoding, Segments, compute_segments};

/// Errors that can occur while encoding, decoding or validating messages.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SmsError {
    /// Character is not supported in GSM 7-bit encoding.
    #[error("Character not supported in GSM 7-bit: '{character}' (U+{code:04X})")]
    UnsupportedCharacter { character: char, code: u32 },

    /// Invalid escape sequence encountered during decoding.
    #[error("Invalid escape sequence: 0x1B followed by 0x{code:02X}")]
    InvalidEscapeSequence { code: u8 },

    /// Invalid byte encountered during decoding.
    #[error("Invalid GSM 7-bit byte: 0x{byte:02X}")]
    InvalidByte { byte: u8 },

    /// Message needs more parts than allowed.
    #[error("Message too long: {parts} parts, at most {max_parts} allowed")]
    TooManyParts { parts: usize, max_parts: usize },
}

/// Result type for SMS operations.
pub type Result<T> = std::result::Result<T, SmsError>;
