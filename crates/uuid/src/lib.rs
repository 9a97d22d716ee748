//! Assessment identifier utilities.
//!
//! Every symptom assessment carries an identifier allocated by the server *before* the
//! inference provider is contacted. The provider is asked to echo it back, but the value the
//! caller receives is always the one minted here.
//!
//! ## Canonical form
//! `ASSESS_` followed by **32 lowercase hexadecimal characters** (a v4 UUID without hyphens).
//!
//! Example: `ASSESS_550e8400e29b41d4a716446655440000`
//!
//! Notes:
//! - [`AssessmentId::new`] always produces the canonical form.
//! - [`AssessmentId::parse`] accepts only the canonical form; uppercase, hyphenated or
//!   unprefixed values are rejected.

mod service;

pub use service::{AssessmentId, Uuid, ASSESSMENT_ID_PREFIX};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
