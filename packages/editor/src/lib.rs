//! # Blockshelf Editor
//!
//! Live editing of library blocks.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ library: document → VariantGroup fragment   │
//! └─────────────────────────────────────────────┘
//!                     ↓ clone + tag
//! ┌──────────────────────┐   EditBatch   ┌──────────────────────┐
//! │ LiveTree (surface)   │ ────────────→ │ EditMirror           │
//! │  author edits here   │  mpsc, bounded│  canonical tree      │
//! └──────────────────────┘               └──────────────────────┘
//!                                                   ↓ copy
//! ┌─────────────────────────────────────────────┐
//! │ compiler-table: canonical block → <table>   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Two owned trees**: the live and canonical trees never share nodes
//! 2. **One direction**: edits flow live → canonical as [`EditEvent`]s, keyed by [`StableId`]
//! 3. **Misses are not errors**: an edit for an unknown id is counted and dropped
//! 4. **Scoped observation**: an [`EditingSession`] stops observing when it is closed or dropped
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blockshelf_editor::{PreviewOrchestrator, PreviewOptions};
//!
//! let mut preview = PreviewOrchestrator::new(library, PreviewOptions::new(origin));
//! let session = preview.open_variant("/blocks/hero", 0).await?;
//!
//! let id = session.live().root().find(&|el| el.is("h1")).and_then(StableId::of).unwrap();
//! session.live_mut().set_text(&id, "New headline")?;
//!
//! let table = preview.copy()?;
//! ```

mod collaborators;
mod errors;
mod events;
mod generation;
mod ids;
mod live;
mod memory;
mod mirror;
mod orchestrator;
mod session;
mod tagger;

pub use collaborators::{
    BlockDecorator, Clipboard, Notification, NotificationVariant, Notifier, RenderSurface,
    TextGenerator,
};
pub use errors::{DecorationError, EditorError, GenerationError, SurfaceError};
pub use events::{EditBatch, EditEvent};
pub use generation::{
    clean_generated_text, variant_prompt, ApiError, ChatMessage, CompletionChoice,
    CompletionRequest, CompletionResponse,
};
pub use ids::{
    get_document_seed, IdGenerator, SequentialIdGenerator, StableId, UuidGenerator,
    LIBRARY_ID_ATTR,
};
pub use live::{LiveTree, MIRRORED_IMAGE_ATTRIBUTES};
pub use memory::{
    ClipboardEntry, MemoryClipboard, MemoryNotifier, MemorySurface, PassthroughDecorator,
    ScriptedGenerator,
};
pub use mirror::{EditMirror, MirrorStats};
pub use orchestrator::{
    PreviewOptions, PreviewOrchestrator, COPIED_MESSAGE, DEFAULT_OBSERVER_CAPACITY,
    GENERATED_MESSAGE,
};
pub use session::{EditingSession, VariantRef};
pub use tagger::{collect_ids, is_editable, strip_ids, tag_editables};
