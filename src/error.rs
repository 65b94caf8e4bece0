//! Configuration errors
//!
//! Runtime feedback never fails: missing collaborators and bad palettes
//! degrade with a logged warning. Only loading a `Tuning` can error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// The tuning JSON did not parse
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value parsed but is outside its usable range
    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
