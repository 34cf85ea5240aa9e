use anyhow::{anyhow, Result};
use blockshelf_dom::parse_fragment;
use blockshelf_editor::{Clipboard, Notification, NotificationVariant, Notifier};
use blockshelf_library::{BlockDocument, DirectoryFetcher, LibraryCache, PLAIN_SUFFIX};
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;
use walkdir::WalkDir;

use crate::config::Config;

pub fn open_library(config: &Config, cwd: &Path) -> Arc<LibraryCache> {
    let fetcher = DirectoryFetcher::new(config.get_library_dir(cwd));
    Arc::new(LibraryCache::new(Arc::new(fetcher)))
}

/// Document paths given on the command line, or every document in the
/// library directory
pub fn document_paths(paths: &[String], config: &Config, cwd: &Path) -> Result<Vec<String>> {
    if !paths.is_empty() {
        return Ok(paths.iter().map(|path| normalize_path(path)).collect());
    }

    let library_dir = config.get_library_dir(cwd);
    if !library_dir.exists() {
        return Err(anyhow!("Library directory does not exist: {:?}", library_dir));
    }
    Ok(find_documents(&library_dir))
}

fn normalize_path(path: &str) -> String {
    let path = path.strip_suffix(PLAIN_SUFFIX).unwrap_or(path);
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// Paths of every `.plain.html` document under `dir`, sorted
pub fn find_documents(dir: &Path) -> Vec<String> {
    let mut paths: Vec<String> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let relative = entry.path().strip_prefix(dir).ok()?;
            let relative = relative.to_str()?.replace('\\', "/");
            let path = relative.strip_suffix(PLAIN_SUFFIX)?;
            Some(format!("/{}", path))
        })
        .collect();
    paths.sort();
    paths
}

/// Fetch each document, reporting failures without stopping
pub async fn load_documents(library: &LibraryCache, paths: &[String]) -> Vec<Arc<BlockDocument>> {
    let mut documents = Vec::new();
    for path in paths {
        match library.document(path).await {
            Ok(document) => documents.push(document),
            Err(err) => eprintln!("  {} {}", "✗".red(), err.to_string().red()),
        }
    }
    documents
}

/// Description markup as one line of text
pub fn plain_description(html: &str) -> String {
    parse_fragment(html)
        .iter()
        .map(|node| node.text_content())
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Writes copied tables to stdout
pub struct StdoutClipboard;

impl Clipboard for StdoutClipboard {
    fn copy(&self, bytes: &[u8], _mime_type: &str) {
        println!("{}", String::from_utf8_lossy(bytes));
    }
}

/// Prints notifications to stderr
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        let marker = match notification.variant {
            NotificationVariant::Positive => "✓".green(),
            NotificationVariant::Negative => "✗".red(),
            NotificationVariant::Info => "•".blue(),
        };
        eprintln!("{} {}", marker, notification.message);
    }
}
