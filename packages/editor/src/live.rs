//! # Live Tree
//!
//! The copy of a block loaded into the rendering surface, where the author
//! edits. Every change goes through a mutation method; while an observer is
//! attached, each change is recorded as an [`EditEvent`] and recorded
//! events are delivered as one batch per [`LiveTree::flush`].
//!
//! Only three kinds of change are observed:
//!
//! - attribute changes on tagged images (`src`, `width`, `height`)
//! - text changes, reported as the markup of the nearest tagged ancestor
//! - child list changes, flattened to text when directly under a tagged
//!   element
//!
//! Events are recorded when the change happens, so a batch replays in the
//! order the edits were made.

use blockshelf_dom::{Element, Node, NodePath};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, trace};

use crate::errors::SurfaceError;
use crate::events::{EditBatch, EditEvent};
use crate::ids::{StableId, LIBRARY_ID_ATTR};

/// Image attributes mirrored to the canonical tree
pub const MIRRORED_IMAGE_ATTRIBUTES: &[&str] = &["src", "width", "height"];

#[derive(Debug)]
struct Observer {
    sender: mpsc::Sender<EditBatch>,
    pending: EditBatch,
}

#[derive(Debug)]
pub struct LiveTree {
    root: Element,
    observer: Option<Observer>,
    unobserved: usize,
}

impl LiveTree {
    pub fn new(root: Element) -> Self {
        Self {
            root,
            observer: None,
            unobserved: 0,
        }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Start recording changes into batches sent on `sender`
    pub fn observe(&mut self, sender: mpsc::Sender<EditBatch>) {
        self.observer = Some(Observer {
            sender,
            pending: Vec::new(),
        });
    }

    /// Stop recording. Returns events recorded since the last flush.
    pub fn disconnect(&mut self) -> EditBatch {
        self.observer
            .take()
            .map(|observer| observer.pending)
            .unwrap_or_default()
    }

    pub fn is_observed(&self) -> bool {
        self.observer.is_some()
    }

    /// Events recorded and not yet delivered
    pub fn pending(&self) -> usize {
        self.observer.as_ref().map_or(0, |o| o.pending.len())
    }

    /// Changes that could not be attributed to a tagged element
    pub fn unobserved(&self) -> usize {
        self.unobserved
    }

    pub fn path_of(&self, id: &StableId) -> Option<NodePath> {
        self.root.path_to(&|el| el.attr(LIBRARY_ID_ATTR) == Some(id.as_str()))
    }

    pub fn element(&self, id: &StableId) -> Option<&Element> {
        self.root.find_by_attr(LIBRARY_ID_ATTR, id.as_str())
    }

    fn element_mut(&mut self, path: &[usize]) -> Result<&mut Element, SurfaceError> {
        self.root
            .element_at_mut(path)
            .ok_or_else(|| SurfaceError::NoSuchNode(path.to_vec()))
    }

    pub fn set_attribute(
        &mut self,
        path: &[usize],
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), SurfaceError> {
        self.element_mut(path)?.set_attr(name, value);
        self.record_attribute(path, name);
        Ok(())
    }

    pub fn remove_attribute(&mut self, path: &[usize], name: &str) -> Result<(), SurfaceError> {
        self.element_mut(path)?.remove_attr(name);
        self.record_attribute(path, name);
        Ok(())
    }

    /// Replace the content of the text node at `path`
    pub fn set_character_data(
        &mut self,
        path: &[usize],
        text: impl Into<String>,
    ) -> Result<(), SurfaceError> {
        match self.root.descendant_at_mut(path) {
            Some(Node::Text { content }) => *content = text.into(),
            Some(_) => return Err(SurfaceError::NotText(path.to_vec())),
            None => return Err(SurfaceError::NoSuchNode(path.to_vec())),
        }

        if let Some((_, parent_path)) = path.split_last() {
            self.record_markup(parent_path);
        }
        Ok(())
    }

    pub fn insert_child(
        &mut self,
        parent: &[usize],
        index: usize,
        node: Node,
    ) -> Result<(), SurfaceError> {
        let element = self.element_mut(parent)?;
        let index = index.min(element.children.len());
        element.children.insert(index, node.clone());
        self.record_child_list(parent, &[node]);
        Ok(())
    }

    pub fn replace_children(&mut self, parent: &[usize], nodes: Vec<Node>) -> Result<(), SurfaceError> {
        let element = self.element_mut(parent)?;
        element.children = nodes.clone();
        self.record_child_list(parent, &nodes);
        Ok(())
    }

    pub fn remove_child(&mut self, parent: &[usize], index: usize) -> Result<Node, SurfaceError> {
        let element = self.element_mut(parent)?;
        if index >= element.children.len() {
            let mut path = parent.to_vec();
            path.push(index);
            return Err(SurfaceError::NoSuchNode(path));
        }
        let removed = element.children.remove(index);
        self.record_child_list(parent, &[]);
        Ok(removed)
    }

    /// Type `text` into the element tagged `id`, the way an author does in
    /// the preview: an element holding a single text node has that node's
    /// data replaced; any other content is replaced by one text node.
    pub fn set_text(&mut self, id: &StableId, text: impl Into<String>) -> Result<(), SurfaceError> {
        let mut path = self
            .path_of(id)
            .ok_or_else(|| SurfaceError::UnknownId(id.clone()))?;
        let text = text.into();

        let single_text = matches!(
            self.root.element_at(&path).map(|el| el.children.as_slice()),
            Some([Node::Text { .. }])
        );

        if single_text {
            path.push(0);
            self.set_character_data(&path, text)
        } else {
            self.replace_children(&path, vec![Node::text(text)])
        }
    }

    /// Point the image tagged `id` at a new source and size
    pub fn set_image(
        &mut self,
        id: &StableId,
        src: &str,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<(), SurfaceError> {
        let path = self
            .path_of(id)
            .ok_or_else(|| SurfaceError::UnknownId(id.clone()))?;

        self.set_attribute(&path, "src", src)?;
        for (name, value) in [("width", width), ("height", height)] {
            match value {
                Some(value) => self.set_attribute(&path, name, value.to_string())?,
                None => self.remove_attribute(&path, name)?,
            }
        }
        Ok(())
    }

    /// Deliver recorded events as one batch. Returns the number of events
    /// delivered; a full channel keeps them for the next flush, a closed
    /// one ends observation.
    pub fn flush(&mut self) -> usize {
        let Some(observer) = self.observer.as_mut() else {
            return 0;
        };
        if observer.pending.is_empty() {
            return 0;
        }

        let batch = std::mem::take(&mut observer.pending);
        let len = batch.len();
        let closed = match observer.sender.try_send(batch) {
            Ok(()) => {
                debug!(events = len, "Flushed edit batch");
                return len;
            }
            Err(TrySendError::Full(batch)) => {
                observer.pending = batch;
                false
            }
            Err(TrySendError::Closed(_)) => true,
        };

        if closed {
            debug!("Edit mirror gone, observation ended");
            self.observer = None;
        }
        0
    }

    fn record(&mut self, event: Option<EditEvent>) {
        let Some(observer) = self.observer.as_mut() else {
            return;
        };
        match event {
            Some(event) => {
                trace!(?event, "Recorded edit");
                observer.pending.push(event);
            }
            None => self.unobserved += 1,
        }
    }

    fn record_attribute(&mut self, path: &[usize], name: &str) {
        if !self.is_observed() {
            return;
        }
        let event = self.root.element_at(path).and_then(|el| {
            if !el.is("img") || !MIRRORED_IMAGE_ATTRIBUTES.contains(&name) {
                return None;
            }
            Some(EditEvent::AttributeChanged {
                id: StableId::of(el)?,
                name: name.to_string(),
                value: el.attr(name).map(str::to_string),
            })
        });
        self.record(event);
    }

    /// Nearest element at or above `path` that carries a stable id
    fn tagged_ancestor(&self, path: &[usize]) -> Option<(StableId, &Element)> {
        (0..=path.len()).rev().find_map(|len| {
            let element = self.root.element_at(&path[..len])?;
            StableId::of(element).map(|id| (id, element))
        })
    }

    /// Report the whole content of the nearest tagged ancestor
    fn record_markup(&mut self, path: &[usize]) {
        if !self.is_observed() {
            return;
        }
        let event = self
            .tagged_ancestor(path)
            .map(|(id, element)| EditEvent::TextReplaced {
                id,
                html: element.inner_html(),
            });
        self.record(event);
    }

    /// Insertions directly under a tagged element are flattened to the added
    /// nodes' text. Removals, and insertions under untagged descendants, send
    /// the nearest tagged ancestor's markup instead.
    fn record_child_list(&mut self, parent_path: &[usize], added: &[Node]) {
        if !self.is_observed() {
            return;
        }
        let parent_id = self.root.element_at(parent_path).and_then(StableId::of);
        match parent_id {
            Some(id) if !added.is_empty() => self.record(Some(EditEvent::ChildrenReplaced {
                id,
                texts: added.iter().map(Node::text_content).collect(),
            })),
            _ => self.record_markup(parent_path),
        }
    }
}
