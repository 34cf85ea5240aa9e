use std::fmt;

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Attribute holding an editable element's stable id
pub const LIBRARY_ID_ATTR: &str = "data-library-id";

/// Correspondence key between a canonical node and its live counterpart
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StableId(String);

impl StableId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id carried by an element, if tagged
    pub fn of(element: &blockshelf_dom::Element) -> Option<Self> {
        element.attr(LIBRARY_ID_ATTR).map(Self::new)
    }
}

impl fmt::Display for StableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of fresh stable ids
pub trait IdGenerator: Send {
    fn next_id(&mut self) -> StableId;
}

/// Random v4 UUIDs
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> StableId {
        StableId(Uuid::new_v4().to_string())
    }
}

/// Seed derived from a document path using CRC32
pub fn get_document_seed(path: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(path.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Deterministic `<seed>-<n>` ids
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    seed: String,
    count: u32,
}

impl SequentialIdGenerator {
    pub fn new(path: &str) -> Self {
        Self::from_seed(get_document_seed(path))
    }

    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> StableId {
        self.count += 1;
        StableId(format!("{}-{}", self.seed, self.count))
    }
}
