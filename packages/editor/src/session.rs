//! # Editing Session
//!
//! One previewed variant: the canonical tree (inside the mirror), the live
//! tree, and the channel between them. Dropping the session drops the
//! receiving end, which ends observation of the live tree on every exit
//! path.

use blockshelf_dom::Element;
use tokio::sync::mpsc;
use tracing::{debug, info};
use url::Url;

use crate::events::EditBatch;
use crate::live::LiveTree;
use crate::mirror::{EditMirror, MirrorStats};

/// Which variant a session previews
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantRef {
    pub path: String,
    pub index: usize,
    pub block_name: String,
    /// Header of the copied table, e.g. `hero (dark)`
    pub table_name: String,
    pub display_name: String,
    /// Absolute URL of the library document
    pub source: Url,
}

#[derive(Debug)]
pub struct EditingSession {
    variant: VariantRef,
    mirror: EditMirror,
    live: LiveTree,
    receiver: mpsc::Receiver<EditBatch>,
}

impl EditingSession {
    /// Start observing `live` and mirroring its edits onto `canonical`.
    /// `live` must already be loaded.
    pub fn start(variant: VariantRef, canonical: Element, mut live: LiveTree, capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        live.observe(sender);
        info!(path = %variant.path, index = variant.index, "Editing session started");

        Self {
            variant,
            mirror: EditMirror::new(canonical),
            live,
            receiver,
        }
    }

    pub fn variant(&self) -> &VariantRef {
        &self.variant
    }

    pub fn live(&self) -> &LiveTree {
        &self.live
    }

    /// The live tree, for the surface to apply author edits to
    pub fn live_mut(&mut self) -> &mut LiveTree {
        &mut self.live
    }

    pub fn canonical(&self) -> &Element {
        self.mirror.canonical()
    }

    /// The block element of the canonical fragment
    pub fn block(&self) -> Option<&Element> {
        self.canonical()
            .find(&|el| el.is("div") && el.attributes.contains("class"))
    }

    pub fn stats(&self) -> MirrorStats {
        self.mirror.stats()
    }

    /// Deliver every recorded edit and apply it to the canonical tree.
    /// Returns the number of events applied.
    pub fn sync(&mut self) -> usize {
        let mut applied = self.mirror.drain(&mut self.receiver);
        while self.live.flush() > 0 {
            applied += self.mirror.drain(&mut self.receiver);
        }
        if self.live.pending() > 0 {
            debug!(pending = self.live.pending(), "Edits still pending after sync");
        }
        applied
    }

    /// Stop observing. Edits not yet synced are discarded.
    pub fn close(mut self) -> MirrorStats {
        let discarded = self.live.disconnect();
        self.receiver.close();
        let stats = self.mirror.stats();
        info!(
            path = %self.variant.path,
            index = self.variant.index,
            discarded = discarded.len(),
            applied = stats.applied,
            misses = stats.misses,
            "Editing session closed"
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{StableId, LIBRARY_ID_ATTR};

    fn variant() -> VariantRef {
        VariantRef {
            path: "/blocks/hero".into(),
            index: 0,
            block_name: "hero".into(),
            table_name: "hero".into(),
            display_name: "hero".into(),
            source: Url::parse("http://localhost:3000/blocks/hero").unwrap(),
        }
    }

    fn fragment() -> Element {
        Element::new("div").with_child(
            Element::new("div").with_attr("class", "hero").with_child(
                Element::new("div").with_child(
                    Element::new("div").with_child(
                        Element::new("h1")
                            .with_attr(LIBRARY_ID_ATTR, "h")
                            .with_text("Welcome"),
                    ),
                ),
            ),
        )
    }

    #[test]
    fn test_sync_mirrors_live_edits() {
        let canonical = fragment();
        let live = LiveTree::new(canonical.clone());
        let mut session = EditingSession::start(variant(), canonical, live, 1);

        let id = StableId::new("h");
        session.live_mut().set_text(&id, "New headline").unwrap();
        assert_eq!(session.sync(), 1);

        let h1 = session.canonical().find_by_attr(LIBRARY_ID_ATTR, "h").unwrap();
        assert_eq!(h1.inner_html(), "New headline");
        assert!(session.block().unwrap().has_class("hero"));
    }

    #[test]
    fn test_unsynced_edits_do_not_reach_canonical() {
        let canonical = fragment();
        let live = LiveTree::new(canonical.clone());
        let mut session = EditingSession::start(variant(), canonical.clone(), live, 4);

        session.live_mut().set_text(&StableId::new("h"), "Draft").unwrap();
        assert_eq!(session.canonical(), &canonical);

        let stats = session.close();
        assert_eq!(stats.applied, 0);
    }
}
