//! Error types for interaction scoring operations

use thiserror::Error;

/// Minimum number of distinct drugs for an assessment to be meaningful
pub const MIN_SELECTED_DRUGS: usize = 2;

/// Errors that can occur while loading interaction data or preparing an assessment
#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("Insufficient data: at least two distinct medications are required, got {found}")]
    InsufficientDrugs { found: usize },

    #[error("Interaction catalog error in {source_name}: {message}")]
    Catalog { source_name: String, message: String },

    #[error("Invalid scoring configuration: {message}")]
    InvalidConfig { message: String },
}

impl ScoringError {
    pub fn insufficient_drugs(found: usize) -> Self {
        Self::InsufficientDrugs { found }
    }

    pub fn catalog(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Catalog {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig { message: message.into() }
    }
}
