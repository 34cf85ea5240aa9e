//! Error types for the editor

use blockshelf_dom::NodePath;
use blockshelf_library::LibraryError;
use thiserror::Error;

use crate::ids::StableId;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Library error: {0}")]
    Library(#[from] LibraryError),

    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("Preview failed: {0}")]
    Surface(#[from] SurfaceError),

    #[error("Decoration failed: {0}")]
    Decoration(#[from] DecorationError),

    #[error("Invalid source URL: {0}")]
    InvalidSource(#[from] url::ParseError),

    #[error("No variant is being previewed")]
    NoActiveSession,

    #[error("No text generator configured")]
    NoGenerator,

    #[error("Variant has no block to copy")]
    NoBlock,
}

/// Failures reported by a text generator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("{message}: {}", .code.as_deref().unwrap_or("unknown"))]
    Api {
        message: String,
        code: Option<String>,
    },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Response contained no completion")]
    EmptyResponse,

    #[error("Response contained no markup")]
    NoMarkup,
}

/// Failures of the rendering surface and its live tree
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("Surface failed to load: {0}")]
    Load(String),

    #[error("No node at {0:?}")]
    NoSuchNode(NodePath),

    #[error("Node at {0:?} is not text")]
    NotText(NodePath),

    #[error("No live element with id {0}")]
    UnknownId(StableId),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to decorate {block}: {reason}")]
pub struct DecorationError {
    pub block: String,
    pub reason: String,
}
