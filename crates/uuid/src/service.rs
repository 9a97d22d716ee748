//! Internal implementation of assessment identifiers.

use crate::{UuidError, UuidResult};
use std::{fmt, str::FromStr};

/// Re-exported for convenience.
pub use ::uuid::Uuid;

/// Prefix carried by every assessment identifier.
pub const ASSESSMENT_ID_PREFIX: &str = "ASSESS_";

/// Server-allocated identifier for a single symptom assessment.
///
/// This wrapper type guarantees that once constructed, the identifier is in canonical form:
/// [`ASSESSMENT_ID_PREFIX`] followed by 32 lowercase hex characters.
///
/// # Construction
/// - [`AssessmentId::new`] generates a fresh identifier (one per analysis request).
/// - [`AssessmentId::parse`] validates an externally supplied identifier, for example one
///   echoed back by the inference provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AssessmentId(Uuid);

impl Default for AssessmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl AssessmentId {
    /// Generates a new identifier from a random (v4) UUID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates and parses an identifier that must already be in canonical form.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if `input` is not `ASSESS_` followed by 32
    /// lowercase hex characters.
    pub fn parse(input: &str) -> UuidResult<Self> {
        let hex = input
            .strip_prefix(ASSESSMENT_ID_PREFIX)
            .filter(|hex| Self::is_canonical_hex(hex))
            .ok_or_else(|| {
                UuidError::InvalidInput(format!(
                    "assessment id must be '{}' followed by 32 lowercase hex characters, got: '{}'",
                    ASSESSMENT_ID_PREFIX, input
                ))
            })?;

        Uuid::parse_str(hex)
            .map(Self)
            .map_err(|e| UuidError::InvalidInput(e.to_string()))
    }

    /// Returns the underlying UUID.
    pub fn uuid(&self) -> Uuid {
        self.0
    }

    /// Returns true if `input` is a canonical assessment identifier.
    pub fn is_canonical(input: &str) -> bool {
        input
            .strip_prefix(ASSESSMENT_ID_PREFIX)
            .is_some_and(Self::is_canonical_hex)
    }

    fn is_canonical_hex(hex: &str) -> bool {
        hex.len() == 32
            && hex
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }
}

impl fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", ASSESSMENT_ID_PREFIX, self.0.simple())
    }
}

impl FromStr for AssessmentId {
    type Err = UuidError;

    /// Equivalent to [`AssessmentId::parse`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssessmentId::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for AssessmentId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for AssessmentId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        AssessmentId::parse(&raw).map_err(serde::de::Error::custom)
    }
}
