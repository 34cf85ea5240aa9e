//! In-memory collaborators, for headless previews and tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use blockshelf_dom::Element;
use futures::future::BoxFuture;

use crate::collaborators::{BlockDecorator, Clipboard, Notification, Notifier, RenderSurface, TextGenerator};
use crate::errors::{DecorationError, GenerationError, SurfaceError};
use crate::live::LiveTree;

/// Returns fragments unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughDecorator;

impl BlockDecorator for PassthroughDecorator {
    fn decorate<'a>(
        &'a self,
        _block_name: &'a str,
        fragment: Element,
    ) -> BoxFuture<'a, Result<Element, DecorationError>> {
        Box::pin(async move { Ok(fragment) })
    }
}

/// Loads fragments into a detached live tree
#[derive(Debug, Default)]
pub struct MemorySurface {
    loads: AtomicUsize,
    failure: Option<String>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface whose every load fails with `reason`
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            loads: AtomicUsize::new(0),
            failure: Some(reason.into()),
        }
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl RenderSurface for MemorySurface {
    fn load(&self, fragment: Element) -> BoxFuture<'_, Result<LiveTree, SurfaceError>> {
        Box::pin(async move {
            self.loads.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            match &self.failure {
                Some(reason) => Err(SurfaceError::Load(reason.clone())),
                None => Ok(LiveTree::new(fragment)),
            }
        })
    }
}

/// Clipboard entry: bytes and MIME type
pub type ClipboardEntry = (Vec<u8>, String);

#[derive(Debug, Default)]
pub struct MemoryClipboard {
    entries: Mutex<Vec<ClipboardEntry>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<ClipboardEntry> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Most recent copy as text
    pub fn last_text(&self) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .last()
            .map(|(bytes, _)| String::from_utf8_lossy(bytes).into_owned())
    }
}

impl Clipboard for MemoryClipboard {
    fn copy(&self, bytes: &[u8], mime_type: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((bytes.to_vec(), mime_type.to_string()));
    }
}

#[derive(Debug, Default)]
pub struct MemoryNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

/// Answers prompts from a script, recording each prompt
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<Result<String, GenerationError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, text: impl Into<String>) -> Self {
        self.push(Ok(text.into()))
    }

    pub fn fail(self, error: GenerationError) -> Self {
        self.push(Err(error))
    }

    fn push(self, response: Result<String, GenerationError>) -> Self {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(response);
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl TextGenerator for ScriptedGenerator {
    fn complete<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, GenerationError>> {
        Box::pin(async move {
            self.prompts
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(prompt.to_string());
            self.responses
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front()
                .unwrap_or(Err(GenerationError::EmptyResponse))
        })
    }
}
