//! Error types for the block library

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LibraryError {
    #[error("Failed to fetch library document: {path}")]
    Fetch { path: String },

    #[error("No variant {index} in {path}")]
    VariantNotFound { path: String, index: usize },
}
