//! # Preview Orchestrator
//!
//! Drives one preview at a time:
//!
//! ```text
//! open_variant ─→ fetch ─→ clone + tag ─→ decorate ─→ surface.load ─→ EditingSession
//! copy         ─→ sync ─→ strip ids ─→ compile_to_table(canonical block) ─→ clipboard
//! ```
//!
//! Opening a variant always closes the previous session first, so a stale
//! live tree can never feed edits into a new canonical tree.

use std::sync::Arc;

use blockshelf_compiler_table::{compile_to_table, SerializedTable, ThemeColors};
use blockshelf_dom::{parse_fragment, Element};
use blockshelf_library::{LibraryCache, LibraryError};
use tracing::{info, instrument, warn};
use url::Url;

use crate::collaborators::{
    BlockDecorator, Clipboard, Notification, Notifier, RenderSurface, TextGenerator,
};
use crate::errors::{EditorError, GenerationError};
use crate::generation::{clean_generated_text, variant_prompt};
use crate::ids::{IdGenerator, StableId, UuidGenerator};
use crate::memory::{MemoryClipboard, MemoryNotifier, MemorySurface, PassthroughDecorator};
use crate::mirror::MirrorStats;
use crate::session::{EditingSession, VariantRef};
use crate::tagger::{strip_ids, tag_editables};

pub const DEFAULT_OBSERVER_CAPACITY: usize = 64;

pub const COPIED_MESSAGE: &str = "Copied Block";

pub const GENERATED_MESSAGE: &str = "Generation Complete";

#[derive(Debug, Clone)]
pub struct PreviewOptions {
    /// Origin library paths are resolved against
    pub origin: Url,
    pub theme: ThemeColors,
    /// Bound of the edit batch channel
    pub observer_capacity: usize,
}

impl PreviewOptions {
    pub fn new(origin: Url) -> Self {
        Self {
            origin,
            theme: ThemeColors::default(),
            observer_capacity: DEFAULT_OBSERVER_CAPACITY,
        }
    }
}

pub struct PreviewOrchestrator {
    library: Arc<LibraryCache>,
    decorator: Arc<dyn BlockDecorator>,
    surface: Arc<dyn RenderSurface>,
    clipboard: Arc<dyn Clipboard>,
    notifier: Arc<dyn Notifier>,
    generator: Option<Arc<dyn TextGenerator>>,
    ids: Box<dyn IdGenerator>,
    options: PreviewOptions,
    active: Option<EditingSession>,
}

impl PreviewOrchestrator {
    /// An orchestrator with in-memory collaborators and random ids
    pub fn new(library: Arc<LibraryCache>, options: PreviewOptions) -> Self {
        Self {
            library,
            decorator: Arc::new(PassthroughDecorator),
            surface: Arc::new(MemorySurface::new()),
            clipboard: Arc::new(MemoryClipboard::new()),
            notifier: Arc::new(MemoryNotifier::new()),
            generator: None,
            ids: Box::new(UuidGenerator),
            options,
            active: None,
        }
    }

    pub fn with_decorator(mut self, decorator: Arc<dyn BlockDecorator>) -> Self {
        self.decorator = decorator;
        self
    }

    pub fn with_surface(mut self, surface: Arc<dyn RenderSurface>) -> Self {
        self.surface = surface;
        self
    }

    pub fn with_clipboard(mut self, clipboard: Arc<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn with_ids(mut self, ids: Box<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn session(&self) -> Option<&EditingSession> {
        self.active.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut EditingSession> {
        self.active.as_mut()
    }

    /// Close the current preview, if any
    pub fn close(&mut self) -> Option<MirrorStats> {
        self.active.take().map(EditingSession::close)
    }

    /// Preview variant `index` of the document at `path`
    #[instrument(skip(self))]
    pub async fn open_variant(
        &mut self,
        path: &str,
        index: usize,
    ) -> Result<&mut EditingSession, EditorError> {
        self.close();

        let result = self.resolve_variant(path, index).await;
        let (variant, fragment) = self.notify_on_error(result)?;
        self.start_session(variant, fragment).await
    }

    async fn resolve_variant(
        &self,
        path: &str,
        index: usize,
    ) -> Result<(VariantRef, Element), EditorError> {
        let (document, group) = self.library.variant(path, index).await?;
        let listing = document
            .listing(index)
            .ok_or_else(|| LibraryError::VariantNotFound {
                path: path.to_string(),
                index,
            })?;

        let variant = VariantRef {
            path: path.to_string(),
            index,
            block_name: listing.block_name,
            table_name: listing.name_with_variants,
            display_name: listing.display_name,
            source: self.options.origin.join(path)?,
        };
        Ok((variant, group.fragment))
    }

    /// Tag a fresh copy of `fragment`, render it and start mirroring
    async fn start_session(
        &mut self,
        variant: VariantRef,
        mut canonical: Element,
    ) -> Result<&mut EditingSession, EditorError> {
        tag_editables(&mut canonical, self.ids.as_mut());

        let result = self.render(&variant.block_name, canonical.clone()).await;
        let live = self.notify_on_error(result)?;

        let session = EditingSession::start(
            variant,
            canonical,
            live,
            self.options.observer_capacity,
        );
        Ok(self.active.insert(session))
    }

    async fn render(
        &self,
        block_name: &str,
        fragment: Element,
    ) -> Result<crate::live::LiveTree, EditorError> {
        let decorated = self.decorator.decorate(block_name, fragment).await?;
        Ok(self.surface.load(decorated).await?)
    }

    /// Serialize the canonical block and put it on the clipboard
    #[instrument(skip(self))]
    pub fn copy(&mut self) -> Result<SerializedTable, EditorError> {
        let session = self.active.as_mut().ok_or(EditorError::NoActiveSession)?;
        session.sync();

        let variant = session.variant();
        let mut block = session.block().ok_or(EditorError::NoBlock)?.clone();
        strip_ids(&mut block);
        let table = compile_to_table(&block, &variant.table_name, &variant.source, &self.options.theme);

        self.clipboard.copy(table.as_bytes(), table.mime_type);
        info!(path = %variant.path, index = variant.index, bytes = table.html.len(), "Copied block");
        self.notifier.notify(Notification::info(COPIED_MESSAGE));
        Ok(table)
    }

    /// Replace the text of element `id` with generated text. The text is
    /// written to the live tree and reaches the canonical tree through the
    /// mirror.
    #[instrument(skip(self, prompt), fields(id = %id))]
    pub async fn generate_text(&mut self, id: &StableId, prompt: &str) -> Result<(), EditorError> {
        if self.active.is_none() {
            return Err(EditorError::NoActiveSession);
        }
        let generator = self.generator.clone().ok_or(EditorError::NoGenerator)?;

        let result = generator.complete(prompt).await.map_err(EditorError::from);
        let text = clean_generated_text(&self.notify_on_error(result)?);

        let session = self.active.as_mut().ok_or(EditorError::NoActiveSession)?;
        session.live_mut().set_text(id, text)?;
        session.sync();
        Ok(())
    }

    /// Ask for a rewrite of the whole variant and preview the result in a
    /// new session
    #[instrument(skip(self, prompt))]
    pub async fn generate_variant(&mut self, prompt: &str) -> Result<&mut EditingSession, EditorError> {
        let session = self.active.as_ref().ok_or(EditorError::NoActiveSession)?;
        let generator = self.generator.clone().ok_or(EditorError::NoGenerator)?;

        let full_prompt = variant_prompt(prompt, &session.canonical().outer_html());
        let variant = session.variant().clone();

        let result = generator
            .complete(&full_prompt)
            .await
            .map_err(EditorError::from)
            .and_then(|response| generated_fragment(&response));
        let fragment = self.notify_on_error(result)?;

        self.close();
        self.start_session(variant, fragment).await?;
        self.notifier.notify(Notification::positive(GENERATED_MESSAGE));
        self.active.as_mut().ok_or(EditorError::NoActiveSession)
    }

    fn notify_on_error<T>(&self, result: Result<T, EditorError>) -> Result<T, EditorError> {
        if let Err(err) = &result {
            warn!(error = %err, "Preview action failed");
            self.notifier.notify(Notification::negative(err.to_string()));
        }
        result
    }
}

/// First element of a generated response, as a variant section
fn generated_fragment(response: &str) -> Result<Element, EditorError> {
    let mut first = parse_fragment(response)
        .into_iter()
        .find_map(|node| node.as_element().cloned())
        .ok_or(GenerationError::NoMarkup)?;
    strip_ids(&mut first);

    if first.attributes.contains("class") {
        first = Element::new("div").with_child(first);
    }
    Ok(first)
}
