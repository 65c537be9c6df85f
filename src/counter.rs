//! A counter configured with the maximum number of parts a message may use.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::segments::{MULTI_PART_GSM_LENGTH, SINGLE_PART_GSM_LENGTH, Segments, compute_segments};
use crate::{Result, SmsError};

/// Maximum number of parts a message may be split into. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MaxParts(usize);

impl MaxParts {
    /// Clamp a configured part count, treating anything below 1 as 1.
    pub fn new(parts: i64) -> Self {
        if parts <= 0 {
            warn!(parts, "max parts must be positive, using 1");
            return Self(1);
        }
        Self(usize::try_from(parts).unwrap_or(usize::MAX))
    }

    /// Read the part count from an initialization attribute.
    ///
    /// A missing attribute means one part; text that is not an integer is
    /// treated the same way.
    pub fn parse(attribute: Option<&str>) -> Self {
        let Some(value) = attribute else {
            return Self::default();
        };
        match value.trim().parse::<i64>() {
            Ok(parts) => Self::new(parts),
            Err(err) => {
                warn!(value, %err, "invalid max parts, using 1");
                Self::default()
            }
        }
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for MaxParts {
    fn default() -> Self {
        Self(1)
    }
}

impl fmt::Display for MaxParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Counter configuration as supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CounterConfig {
    pub max_parts: i64,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self { max_parts: 1 }
    }
}

impl From<CounterConfig> for SmsCounter {
    fn from(config: CounterConfig) -> Self {
        SmsCounter::new(MaxParts::new(config.max_parts))
    }
}

/// Live segment counter for a text input.
///
/// ```rust
/// use sms_segments::{MaxParts, SmsCounter};
///
/// let counter = SmsCounter::new(MaxParts::new(2));
/// assert_eq!(counter.maximum_length(), 306);
/// assert_eq!(counter.label("Hello"), "155/1");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SmsCounter {
    max_parts: MaxParts,
}

impl SmsCounter {
    pub fn new(max_parts: MaxParts) -> Self {
        Self { max_parts }
    }

    pub fn max_parts(&self) -> MaxParts {
        self.max_parts
    }

    /// Upper bound on input length, in characters.
    ///
    /// Always derived from the GSM limits: a Unicode character typed late in
    /// the message must not truncate text already entered.
    pub fn maximum_length(&self) -> usize {
        match self.max_parts.get() {
            1 => SINGLE_PART_GSM_LENGTH,
            parts => parts.saturating_mul(MULTI_PART_GSM_LENGTH),
        }
    }

    /// Recount `text`. Called on every change to the input.
    pub fn count(&self, text: &str) -> Segments {
        let segments = compute_segments(text);
        debug!(
            encoding = %segments.encoding,
            length = segments.length,
            parts = segments.parts,
            remaining = segments.remaining,
            "recounted message"
        );
        segments
    }

    /// The `remaining/parts` label for `text`.
    pub fn label(&self, text: &str) -> String {
        self.count(text).to_string()
    }

    /// Count `text` and reject it if it needs more parts than allowed.
    ///
    /// # Errors
    ///
    /// Returns `SmsError::TooManyParts` when the message is too long.
    pub fn validate(&self, text: &str) -> Result<Segments> {
        let segments = self.count(text);
        if segments.parts > self.max_parts.get() {
            return Err(SmsError::TooManyParts {
                parts: segments.parts,
                max_parts: self.max_parts.get(),
            });
        }
        Ok(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Encoding;

    #[test]
    fn test_max_parts_clamped() {
        assert_eq!(MaxParts::new(0).get(), 1);
        assert_eq!(MaxParts::new(-3).get(), 1);
        assert_eq!(MaxParts::new(4).get(), 4);
    }

    #[test]
    fn test_max_parts_parse() {
        assert_eq!(MaxParts::parse(None).get(), 1);
        assert_eq!(MaxParts::parse(Some("3")).get(), 3);
        assert_eq!(MaxParts::parse(Some(" 2 ")).get(), 2);
        assert_eq!(MaxParts::parse(Some("0")).get(), 1);
        assert_eq!(MaxParts::parse(Some("-1")).get(), 1);
        assert_eq!(MaxParts::parse(Some("lots")).get(), 1);
    }

    #[test]
    fn test_maximum_length() {
        assert_eq!(SmsCounter::new(MaxParts::new(1)).maximum_length(), 160);
        assert_eq!(SmsCounter::new(MaxParts::new(2)).maximum_length(), 306);
        assert_eq!(SmsCounter::new(MaxParts::new(5)).maximum_length(), 765);
    }

    #[test]
    fn test_label() {
        let counter = SmsCounter::default();
        assert_eq!(counter.label(""), "160/1");
        assert_eq!(counter.label(&"a".repeat(161)), "145/2");
        assert_eq!(counter.label("\u{4F60}\u{597D}"), "68/1");
    }

    #[test]
    fn test_count_ignores_max_parts() {
        let counter = SmsCounter::new(MaxParts::new(1));
        let segments = counter.count(&"a".repeat(400));
        assert_eq!(segments.encoding, Encoding::Gsm7);
        assert_eq!(segments.parts, 3);
    }

    #[test]
    fn test_validate() {
        let counter = SmsCounter::new(MaxParts::new(2));
        assert!(counter.validate(&"a".repeat(306)).is_ok());
        assert_eq!(
            counter.validate(&"a".repeat(307)),
            Err(SmsError::TooManyParts {
                parts: 3,
                max_parts: 2
            })
        );
    }

    #[test]
    fn test_config() {
        let counter: SmsCounter = CounterConfig { max_parts: 3 }.into();
        assert_eq!(counter.max_parts().get(), 3);

        let config: CounterConfig = serde_json::from_str(r#"{"max-parts": 0}"#).unwrap();
        assert_eq!(SmsCounter::from(config).max_parts().get(), 1);

        let config: CounterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, CounterConfig::default());
    }
}
