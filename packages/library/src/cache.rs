//! Process-lifetime document cache.
//!
//! Each path gets one cell. Concurrent requests for the same path wait on
//! the same in-flight fetch; a failed fetch leaves the cell empty so the
//! next request tries again.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OnceCell;
use tracing::{debug, instrument, warn};

use crate::document::{BlockDocument, VariantGroup};
use crate::error::LibraryError;
use crate::fetch::DocumentFetcher;

type Entry = Arc<OnceCell<Arc<BlockDocument>>>;

pub struct LibraryCache {
    fetcher: Arc<dyn DocumentFetcher>,
    entries: Mutex<HashMap<String, Entry>>,
}

impl LibraryCache {
    pub fn new(fetcher: Arc<dyn DocumentFetcher>) -> Self {
        Self {
            fetcher,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entry(&self, path: &str) -> Entry {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.entry(path.to_string()).or_default().clone()
    }

    /// Fetch and partition the document at `path`, at most once per path
    #[instrument(skip(self))]
    pub async fn document(&self, path: &str) -> Result<Arc<BlockDocument>, LibraryError> {
        let entry = self.entry(path);
        let document = entry
            .get_or_try_init(|| async {
                debug!("Fetching library document");
                match self.fetcher.fetch(path).await {
                    Some(body) => Ok(Arc::new(BlockDocument::from_body(path, body))),
                    None => {
                        warn!("Library document fetch failed");
                        Err(LibraryError::Fetch {
                            path: path.to_string(),
                        })
                    }
                }
            })
            .await?;
        Ok(Arc::clone(document))
    }

    /// A document's variant group by index
    pub async fn variant(
        &self,
        path: &str,
        index: usize,
    ) -> Result<(Arc<BlockDocument>, VariantGroup), LibraryError> {
        let document = self.document(path).await?;
        let group = document
            .group(index)
            .cloned()
            .ok_or_else(|| LibraryError::VariantNotFound {
                path: path.to_string(),
                index,
            })?;
        Ok((document, group))
    }

    /// The document at `path` if it has already been fetched
    pub fn cached(&self, path: &str) -> Option<Arc<BlockDocument>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(path)?.get().cloned()
    }
}
