//! # Blockshelf Library
//!
//! Block library documents: fetching, caching, partitioning into variants,
//! metadata, and search.
//!
//! ```text
//! path ─→ DocumentFetcher ─→ LibraryCache ─→ BlockDocument
//!                                              ├─ default metadata
//!                                              └─ VariantGroup × n ─→ VariantListing
//! ```

mod cache;
mod document;
mod error;
mod fetch;
mod metadata;
mod variant;

pub use cache::LibraryCache;
pub use document::{BlockDocument, VariantGroup};
pub use error::LibraryError;
pub use fetch::{DirectoryFetcher, DocumentFetcher, MemoryFetcher, PLAIN_SUFFIX};
pub use metadata::{
    read_block_config, to_camel_case, to_class_name, LibraryMetadata, MetadataValue,
    LIBRARY_METADATA_CLASS,
};
pub use variant::{search, VariantListing};
