//! Construction-time errors.
//!
//! Validation never fails abnormally: a rejected value is a `false` verdict
//! plus diagnostics. The errors here only arise while *building* guards
//! (bad pattern source, unknown schema field, unparseable mode name).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuardError {
    #[error("invalid pattern /{pattern}/: {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("field '{field}' is not declared by the base schema")]
    UnknownField { field: String },
    #[error("unknown diagnostic mode '{0}', expected one of: single, multi, json")]
    UnknownMode(String),
}

impl GuardError {
    pub(crate) fn invalid_pattern(pattern: &str, err: &regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            reason: err.to_string(),
        }
    }
}
