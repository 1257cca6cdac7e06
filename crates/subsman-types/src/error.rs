//! Common error types

use thiserror::Error;

/// A stored or submitted status string did not name a known status
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind} status: {value}")]
pub struct StatusParseError {
    /// Which status enum was being parsed
    pub kind: &'static str,
    /// The rejected input
    pub value: String,
}

impl StatusParseError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
