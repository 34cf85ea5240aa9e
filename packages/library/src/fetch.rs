//! # Document Fetching
//!
//! Library documents are fetched by path. The plain-content suffix is
//! appended by the fetcher, so callers always pass bare paths such as
//! `/tools/sidekick/blocks/hero`. A failed fetch yields `None`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use blockshelf_dom::{parse_body, Element};
use futures::future::BoxFuture;
use tracing::debug;

/// Suffix of plain-content documents
pub const PLAIN_SUFFIX: &str = ".plain.html";

/// Fetches and parses library documents
pub trait DocumentFetcher: Send + Sync {
    /// The parsed `body` of the document at `path`, or `None` when the
    /// document could not be retrieved
    fn fetch<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Option<Element>>;
}

/// Reads `<root>/<path>.plain.html` from disk
#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn file_path(&self, path: &str) -> PathBuf {
        let relative = path.trim_start_matches('/');
        self.root.join(format!("{}{}", relative, PLAIN_SUFFIX))
    }
}

impl DocumentFetcher for DirectoryFetcher {
    fn fetch<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Option<Element>> {
        Box::pin(async move {
            let file = self.file_path(path);
            match tokio::fs::read_to_string(&file).await {
                Ok(html) => Some(parse_body(&html)),
                Err(err) => {
                    debug!(file = %file.display(), error = %err, "Library document unavailable");
                    None
                }
            }
        })
    }
}

/// In-memory documents keyed by path, counting fetches
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    documents: HashMap<String, String>,
    fetches: AtomicUsize,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, path: impl Into<String>, html: impl Into<String>) -> Self {
        self.documents.insert(path.into(), html.into());
        self
    }

    /// Number of fetches served, including misses
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl DocumentFetcher for MemoryFetcher {
    fn fetch<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Option<Element>> {
        Box::pin(async move {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            self.documents.get(path).map(|html| parse_body(html))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_directory_fetcher_appends_suffix() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("blocks")).unwrap();
        std::fs::write(
            dir.path().join("blocks/hero.plain.html"),
            r#"<div><div class="hero"></div></div>"#,
        )
        .unwrap();

        let fetcher = DirectoryFetcher::new(dir.path());
        let body = fetcher.fetch("/blocks/hero").await.unwrap();
        assert_eq!(body.outer_html(), r#"<body><div><div class="hero"></div></div></body>"#);
    }

    #[tokio::test]
    async fn test_directory_fetcher_missing_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = DirectoryFetcher::new(dir.path());
        assert!(fetcher.fetch("/blocks/nope").await.is_none());
    }

    #[tokio::test]
    async fn test_memory_fetcher_counts() {
        let fetcher = MemoryFetcher::new().with_document("/a", "<div></div>");
        assert!(fetcher.fetch("/a").await.is_some());
        assert!(fetcher.fetch("/b").await.is_none());
        assert_eq!(fetcher.fetch_count(), 2);
    }
}
