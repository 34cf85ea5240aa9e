//! Seams to the world outside the editor: decoration, rendering, the
//! clipboard, text generation and user notifications.

use blockshelf_dom::Element;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::errors::{DecorationError, GenerationError, SurfaceError};
use crate::live::LiveTree;

/// Prepares a raw block fragment for display (buttons, sections and
/// block-specific behavior)
pub trait BlockDecorator: Send + Sync {
    fn decorate<'a>(
        &'a self,
        block_name: &'a str,
        fragment: Element,
    ) -> BoxFuture<'a, Result<Element, DecorationError>>;
}

/// The isolated frame previews are rendered into. Resolves once the
/// fragment is loaded, handing back the live tree the author edits.
pub trait RenderSurface: Send + Sync {
    fn load(&self, fragment: Element) -> BoxFuture<'_, Result<LiveTree, SurfaceError>>;
}

pub trait Clipboard: Send + Sync {
    fn copy(&self, bytes: &[u8], mime_type: &str);
}

pub trait TextGenerator: Send + Sync {
    fn complete<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, GenerationError>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationVariant {
    Positive,
    Negative,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub variant: NotificationVariant,
}

impl Notification {
    pub fn positive(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            variant: NotificationVariant::Positive,
        }
    }

    pub fn negative(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            variant: NotificationVariant::Negative,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            variant: NotificationVariant::Info,
        }
    }
}

/// Dismissable messages for the author
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}
