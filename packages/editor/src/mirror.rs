//! # Edit Mirror
//!
//! Applies [`EditEvent`] batches to the canonical tree. The mirror owns the
//! canonical tree and nothing else, so applying an edit can never feed
//! back into the live tree.
//!
//! An event whose id has no canonical element is a miss: it is counted and
//! otherwise ignored.

use blockshelf_dom::{parse_fragment, Element, Node};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::events::{EditBatch, EditEvent};
use crate::ids::LIBRARY_ID_ATTR;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MirrorStats {
    pub batches: usize,
    pub applied: usize,
    /// Events whose id matched no canonical element
    pub misses: usize,
}

#[derive(Debug)]
pub struct EditMirror {
    canonical: Element,
    stats: MirrorStats,
}

impl EditMirror {
    pub fn new(canonical: Element) -> Self {
        Self {
            canonical,
            stats: MirrorStats::default(),
        }
    }

    pub fn canonical(&self) -> &Element {
        &self.canonical
    }

    pub fn into_canonical(self) -> Element {
        self.canonical
    }

    pub fn stats(&self) -> MirrorStats {
        self.stats
    }

    /// Apply one event. Returns false on a miss.
    pub fn apply(&mut self, event: &EditEvent) -> bool {
        if let EditEvent::AttributeChanged { name, .. } = event {
            if name == LIBRARY_ID_ATTR {
                return true;
            }
        }

        let Some(target) = self
            .canonical
            .find_by_attr_mut(LIBRARY_ID_ATTR, event.id().as_str())
        else {
            debug!(id = %event.id(), "No canonical element for edit");
            self.stats.misses += 1;
            return false;
        };

        match event {
            EditEvent::AttributeChanged { name, value, .. } => match value {
                Some(value) => target.set_attr(name.as_str(), value.as_str()),
                None => {
                    target.remove_attr(name);
                }
            },
            EditEvent::TextReplaced { html, .. } => {
                target.children = parse_fragment(html);
            }
            EditEvent::ChildrenReplaced { texts, .. } => {
                target.children = texts.iter().map(|text| Node::text(text.as_str())).collect();
            }
        }

        self.stats.applied += 1;
        true
    }

    /// Apply a batch in order, earliest first. Returns events applied.
    pub fn apply_batch(&mut self, batch: &[EditEvent]) -> usize {
        self.stats.batches += 1;
        batch.iter().filter(|event| self.apply(event)).count()
    }

    /// Apply every batch already waiting on `receiver`
    pub fn drain(&mut self, receiver: &mut mpsc::Receiver<EditBatch>) -> usize {
        let mut applied = 0;
        while let Ok(batch) = receiver.try_recv() {
            applied += self.apply_batch(&batch);
        }
        applied
    }

    /// Apply batches until every sender is gone, then hand the mirror back
    #[instrument(skip_all)]
    pub async fn run(mut self, mut receiver: mpsc::Receiver<EditBatch>) -> Self {
        while let Some(batch) = receiver.recv().await {
            self.apply_batch(&batch);
        }
        debug!(stats = ?self.stats, "Edit mirror stopped");
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::StableId;

    fn canonical() -> Element {
        Element::new("div")
            .with_child(
                Element::new("p")
                    .with_attr(LIBRARY_ID_ATTR, "p")
                    .with_text("Old"),
            )
            .with_child(
                Element::new("img")
                    .with_attr("src", "a.png")
                    .with_attr("width", "10")
                    .with_attr(LIBRARY_ID_ATTR, "i"),
            )
    }

    fn text(id: &str, html: &str) -> EditEvent {
        EditEvent::TextReplaced {
            id: StableId::new(id),
            html: html.into(),
        }
    }

    #[test]
    fn test_text_replaced_parses_markup() {
        let mut mirror = EditMirror::new(canonical());
        assert!(mirror.apply(&text("p", "New <em>headline</em>")));

        let p = mirror.canonical().find_by_attr(LIBRARY_ID_ATTR, "p").unwrap();
        assert_eq!(p.inner_html(), "New <em>headline</em>");
    }

    #[test]
    fn test_batches_apply_in_order() {
        let mut mirror = EditMirror::new(canonical());
        let applied = mirror.apply_batch(&[text("p", "first"), text("p", "second")]);

        assert_eq!(applied, 2);
        assert_eq!(mirror.canonical().text_content(), "second");
    }

    #[test]
    fn test_attribute_changes() {
        let mut mirror = EditMirror::new(canonical());
        mirror.apply_batch(&[
            EditEvent::AttributeChanged {
                id: StableId::new("i"),
                name: "src".into(),
                value: Some("b.png".into()),
            },
            EditEvent::AttributeChanged {
                id: StableId::new("i"),
                name: "width".into(),
                value: None,
            },
        ]);

        let img = mirror.canonical().find_by_attr(LIBRARY_ID_ATTR, "i").unwrap();
        assert_eq!(img.attr("src"), Some("b.png"));
        assert_eq!(img.attr("width"), None);
    }

    #[test]
    fn test_children_replaced_flattens_to_text() {
        let mut mirror = EditMirror::new(canonical());
        mirror.apply(&EditEvent::ChildrenReplaced {
            id: StableId::new("p"),
            texts: vec!["Bold".into(), " move".into()],
        });

        let p = mirror.canonical().find_by_attr(LIBRARY_ID_ATTR, "p").unwrap();
        assert_eq!(p.children.len(), 2);
        assert_eq!(p.inner_html(), "Bold move");
    }

    #[test]
    fn test_stale_id_is_a_counted_no_op() {
        let before = canonical();
        let mut mirror = EditMirror::new(before.clone());

        assert!(!mirror.apply(&text("gone", "x")));
        assert_eq!(mirror.canonical(), &before);
        assert_eq!(
            mirror.stats(),
            MirrorStats {
                batches: 0,
                applied: 0,
                misses: 1
            }
        );
    }

    #[test]
    fn test_id_attribute_is_never_rewritten() {
        let before = canonical();
        let mut mirror = EditMirror::new(before.clone());
        mirror.apply(&EditEvent::AttributeChanged {
            id: StableId::new("i"),
            name: LIBRARY_ID_ATTR.into(),
            value: Some("other".into()),
        });
        assert_eq!(mirror.canonical(), &before);
    }

    #[tokio::test]
    async fn test_run_consumes_until_closed() {
        let (tx, rx) = mpsc::channel(8);
        let task = tokio::spawn(EditMirror::new(canonical()).run(rx));

        tx.send(vec![text("p", "one")]).await.unwrap();
        tx.send(vec![text("missing", "x"), text("p", "two")]).await.unwrap();
        drop(tx);

        let mirror = task.await.unwrap();
        assert_eq!(mirror.canonical().text_content(), "two");
        assert_eq!(
            mirror.stats(),
            MirrorStats {
                batches: 2,
                applied: 2,
                misses: 1
            }
        );
    }
}
