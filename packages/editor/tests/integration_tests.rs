//! Integration tests for the editor crate

use std::sync::Arc;

use blockshelf_dom::{parse_fragment, Element};
use blockshelf_editor::{
    BlockDecorator, DecorationError, EditEvent, EditMirror, EditorError, GenerationError,
    MemoryClipboard, MemoryNotifier, MemorySurface, NotificationVariant, PreviewOptions,
    PreviewOrchestrator, ScriptedGenerator, SequentialIdGenerator, StableId, LIBRARY_ID_ATTR,
};
use blockshelf_library::{LibraryCache, LibraryError, MemoryFetcher};
use futures::future::BoxFuture;
use url::Url;

const HERO_DOC: &str = concat!(
    r#"<div><div class="hero">"#,
    r#"<div><div><h1>Welcome</h1><p>Intro text</p></div></div>"#,
    r#"<div><div><picture><img alt="Hero" height="300" src="./media_1.png?width=750" width="400"></picture></div></div>"#,
    r#"</div></div>"#,
    r#"<div><div class="hero dark"><div><div><h1>Dark</h1></div></div></div>"#,
    r#"<div class="library-metadata"><div><div>name</div><div>Dark Hero</div></div></div></div>"#
);

struct Harness {
    preview: PreviewOrchestrator,
    clipboard: Arc<MemoryClipboard>,
    notifier: Arc<MemoryNotifier>,
}

fn harness() -> Harness {
    let fetcher = MemoryFetcher::new().with_document("/blocks/hero", HERO_DOC);
    let library = Arc::new(LibraryCache::new(Arc::new(fetcher)));
    let clipboard = Arc::new(MemoryClipboard::new());
    let notifier = Arc::new(MemoryNotifier::new());

    let options = PreviewOptions::new(Url::parse("http://localhost:3000").unwrap());
    let preview = PreviewOrchestrator::new(library, options)
        .with_clipboard(clipboard.clone())
        .with_notifier(notifier.clone())
        .with_ids(Box::new(SequentialIdGenerator::from_seed("t")));

    Harness {
        preview,
        clipboard,
        notifier,
    }
}

fn id_of(root: &Element, tag: &str) -> StableId {
    root.find(&|el| el.is(tag))
        .and_then(StableId::of)
        .expect("tagged element")
}

#[tokio::test]
async fn test_edit_then_copy() -> anyhow::Result<()> {
    let mut h = harness();

    let session = h.preview.open_variant("/blocks/hero", 0).await?;
    let heading = id_of(session.live().root(), "h1");
    session.live_mut().set_text(&heading, "New headline")?;

    let table = h.preview.copy()?;

    assert_eq!(
        table.html,
        concat!(
            r#"<table border="1">"#,
            r#"<tr><td colspan="1" style="background-color: #ff8012; color: #ffffff;  height:23px;">hero</td></tr>"#,
            r#"<tr><td><h1>New headline</h1><p>Intro text</p></td></tr>"#,
            r#"<tr><td><picture><img alt="Hero" height="150" src="http://localhost:3000/media_1.png" width="200"></picture></td></tr>"#,
            r#"</table>"#
        )
    );

    let session = h.preview.session().unwrap();
    assert_eq!(StableId::of(session.block().unwrap().find(&|el| el.is("h1")).unwrap()), Some(heading));

    let entries = h.clipboard.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].1, "text/html");
    assert_eq!(h.clipboard.last_text().as_deref(), Some(table.html.as_str()));

    let notifications = h.notifier.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].message, "Copied Block");
    assert_eq!(notifications[0].variant, NotificationVariant::Info);
    Ok(())
}

#[tokio::test]
async fn test_canonical_follows_live_text_for_every_tagged_node() -> anyhow::Result<()> {
    let mut h = harness();
    let session = h.preview.open_variant("/blocks/hero", 0).await?;

    let heading = id_of(session.live().root(), "h1");
    let intro = id_of(session.live().root(), "p");
    let live = session.live_mut();
    live.set_text(&heading, "One")?;
    live.set_text(&intro, "Two & <three>")?;
    live.set_text(&heading, "Four")?;
    session.sync();

    for id in blockshelf_editor::collect_ids(session.live().root()) {
        let live = session.live().element(&id).unwrap();
        let canonical = session
            .canonical()
            .find_by_attr(LIBRARY_ID_ATTR, id.as_str())
            .unwrap();
        assert_eq!(live.text_content(), canonical.text_content(), "id {}", id);
    }
    assert_eq!(session.stats().applied, 3);
    Ok(())
}

#[tokio::test]
async fn test_edits_inside_untagged_descendants_reach_canonical() -> anyhow::Result<()> {
    let doc = concat!(
        r#"<div><div class="cta"><div><div>"#,
        r#"<p><a href="/buy">Go</a></p><p>Body <span>inner</span></p>"#,
        r#"</div></div></div></div>"#
    );
    let fetcher = MemoryFetcher::new().with_document("/blocks/cta", doc);
    let library = Arc::new(LibraryCache::new(Arc::new(fetcher)));
    let options = PreviewOptions::new(Url::parse("http://localhost:3000")?);
    let mut preview = PreviewOrchestrator::new(library, options)
        .with_ids(Box::new(SequentialIdGenerator::from_seed("t")));

    let session = preview.open_variant("/blocks/cta", 0).await?;
    let root = session.live().root();
    let button = root.find(&|el| el.is("a")).unwrap();
    assert_eq!(StableId::of(button), None);

    let mut anchor_text = session.live().path_of(&StableId::new("t-1")).unwrap();
    anchor_text.extend([0, 0]);
    let mut span_text = session.live().path_of(&StableId::new("t-2")).unwrap();
    span_text.extend([1, 0]);

    let live = session.live_mut();
    live.set_character_data(&anchor_text, "Buy now")?;
    live.set_character_data(&span_text, "edited")?;
    assert_eq!(live.unobserved(), 0);
    session.sync();

    for id in blockshelf_editor::collect_ids(session.live().root()) {
        let live = session.live().element(&id).unwrap();
        let canonical = session
            .canonical()
            .find_by_attr(LIBRARY_ID_ATTR, id.as_str())
            .unwrap();
        assert_eq!(live.text_content(), canonical.text_content(), "id {}", id);
    }

    let table = preview.copy()?;
    assert!(table.html.contains(r#"<p><a href="/buy">Buy now</a></p><p>Body <span>edited</span></p>"#));
    Ok(())
}

#[tokio::test]
async fn test_image_edit_reaches_table() -> anyhow::Result<()> {
    let mut h = harness();
    let session = h.preview.open_variant("/blocks/hero", 0).await?;

    let image = id_of(session.live().root(), "img");
    session
        .live_mut()
        .set_image(&image, "/media/new.jpg?v=2", Some(1000), Some(250))?;

    let table = h.preview.copy()?;
    assert!(table.html.contains(
        r#"<img alt="Hero" height="50" src="http://localhost:3000/new.jpg" width="200">"#
    ));
    Ok(())
}

#[tokio::test]
async fn test_stale_id_leaves_canonical_unchanged() {
    let fragment = parse_fragment(r#"<div><h1 data-library-id="a">Title</h1></div>"#)
        .into_iter()
        .find_map(|node| node.as_element().cloned())
        .unwrap();
    let mut mirror = EditMirror::new(fragment.clone());

    let applied = mirror.apply_batch(&[EditEvent::TextReplaced {
        id: StableId::new("from-an-old-preview"),
        html: "Lost".into(),
    }]);

    assert_eq!(applied, 0);
    assert_eq!(mirror.canonical(), &fragment);
    assert_eq!(mirror.stats().misses, 1);
}

#[tokio::test]
async fn test_switching_variants_replaces_session() -> anyhow::Result<()> {
    let mut h = harness();

    let first = h.preview.open_variant("/blocks/hero", 0).await?;
    let heading = id_of(first.live().root(), "h1");
    first.live_mut().set_text(&heading, "Unsynced")?;

    let second = h.preview.open_variant("/blocks/hero", 1).await?;
    assert_eq!(second.variant().index, 1);
    assert_eq!(second.variant().display_name, "Dark Hero");
    assert_eq!(second.variant().table_name, "hero (dark)");
    assert!(second.live().is_observed());
    assert!(!second.canonical().outer_html().contains("library-metadata"));

    let table = h.preview.copy()?;
    assert!(table.html.contains(">hero (dark)</td>"));
    assert!(!table.html.contains("Unsynced"));

    assert!(h.preview.close().is_some());
    assert!(h.preview.session().is_none());
    assert!(matches!(h.preview.copy(), Err(EditorError::NoActiveSession)));
    Ok(())
}

#[tokio::test]
async fn test_fetch_failure_is_notified() {
    let mut h = harness();

    let result = h.preview.open_variant("/blocks/missing", 0).await;
    assert!(matches!(
        result,
        Err(EditorError::Library(LibraryError::Fetch { .. }))
    ));

    let notifications = h.notifier.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].variant, NotificationVariant::Negative);

    assert!(h.preview.open_variant("/blocks/hero", 0).await.is_ok());
}

#[tokio::test]
async fn test_missing_variant_index() {
    let mut h = harness();
    let result = h.preview.open_variant("/blocks/hero", 7).await;
    assert!(matches!(
        result,
        Err(EditorError::Library(LibraryError::VariantNotFound { index: 7, .. }))
    ));
}

struct MarkingDecorator;

impl BlockDecorator for MarkingDecorator {
    fn decorate<'a>(
        &'a self,
        block_name: &'a str,
        mut fragment: Element,
    ) -> BoxFuture<'a, Result<Element, DecorationError>> {
        Box::pin(async move {
            if let Some(block) = fragment.element_children_mut().next() {
                block.set_attr("data-block-status", "loaded");
                block.set_attr("data-block-name", block_name);
            }
            Ok(fragment)
        })
    }
}

struct FailingDecorator;

impl BlockDecorator for FailingDecorator {
    fn decorate<'a>(
        &'a self,
        block_name: &'a str,
        _fragment: Element,
    ) -> BoxFuture<'a, Result<Element, DecorationError>> {
        Box::pin(async move {
            Err(DecorationError {
                block: block_name.to_string(),
                reason: "script error".to_string(),
            })
        })
    }
}

#[tokio::test]
async fn test_decoration_stays_out_of_canonical() -> anyhow::Result<()> {
    let h = harness();
    let mut preview = h.preview.with_decorator(Arc::new(MarkingDecorator));

    let session = preview.open_variant("/blocks/hero", 0).await?;
    assert!(session.live().root().outer_html().contains(r#"data-block-status="loaded""#));
    assert!(!session.canonical().outer_html().contains("data-block-status"));

    let heading = id_of(session.live().root(), "h1");
    session.live_mut().set_text(&heading, "Decorated edit")?;
    let table = preview.copy()?;
    assert!(table.html.contains("Decorated edit"));
    Ok(())
}

#[tokio::test]
async fn test_decoration_and_surface_failures_abandon_the_variant() {
    let h = harness();
    let notifier = h.notifier.clone();
    let mut preview = h.preview.with_decorator(Arc::new(FailingDecorator));

    let result = preview.open_variant("/blocks/hero", 0).await;
    assert!(matches!(result, Err(EditorError::Decoration(_))));
    assert!(preview.session().is_none());

    let surface = Arc::new(MemorySurface::failing("frame crashed"));
    let mut preview = harness().preview.with_surface(surface.clone());
    let result = preview.open_variant("/blocks/hero", 0).await;
    assert!(matches!(result, Err(EditorError::Surface(_))));
    assert_eq!(surface.load_count(), 1);

    let messages: Vec<_> = notifier
        .notifications()
        .into_iter()
        .map(|n| n.message)
        .collect();
    assert_eq!(messages, vec!["Decoration failed: Failed to decorate hero: script error"]);
}

#[tokio::test]
async fn test_generate_text_into_node() -> anyhow::Result<()> {
    let generator = Arc::new(ScriptedGenerator::new().respond("  \"Fresh title\"\n"));
    let h = harness();
    let mut preview = h.preview.with_generator(generator.clone());

    let session = preview.open_variant("/blocks/hero", 0).await?;
    let heading = id_of(session.canonical(), "h1");

    preview.generate_text(&heading, "Write a headline").await?;

    let session = preview.session().unwrap();
    let canonical = session
        .canonical()
        .find_by_attr(LIBRARY_ID_ATTR, heading.as_str())
        .unwrap();
    assert_eq!(canonical.inner_html(), "Fresh title");
    assert_eq!(session.live().element(&heading).unwrap().inner_html(), "Fresh title");
    assert_eq!(generator.prompts(), vec!["Write a headline"]);
    Ok(())
}

#[tokio::test]
async fn test_generation_failure_changes_nothing() -> anyhow::Result<()> {
    let generator = Arc::new(ScriptedGenerator::new().fail(GenerationError::Api {
        message: "Rate limited".into(),
        code: Some("rate_limit_exceeded".into()),
    }));
    let h = harness();
    let notifier = h.notifier.clone();
    let mut preview = h.preview.with_generator(generator);

    let session = preview.open_variant("/blocks/hero", 0).await?;
    let before = session.canonical().clone();
    let heading = id_of(session.canonical(), "h1");

    let result = preview.generate_text(&heading, "Write a headline").await;
    assert!(matches!(result, Err(EditorError::Generation(_))));
    assert_eq!(preview.session().unwrap().canonical(), &before);

    let notifications = notifier.notifications();
    assert_eq!(notifications[0].variant, NotificationVariant::Negative);
    assert_eq!(
        notifications[0].message,
        "Generation failed: Rate limited: rate_limit_exceeded"
    );
    Ok(())
}

#[tokio::test]
async fn test_generate_whole_variant() -> anyhow::Result<()> {
    let generator = Arc::new(ScriptedGenerator::new().respond(concat!(
        r#"<div><div class="hero"><div><div><h1 data-library-id="t-1">Cats</h1>"#,
        r#"<p data-library-id="t-2">All about cats</p></div></div></div></div>"#
    )));
    let h = harness();
    let mut preview = h.preview.with_generator(generator.clone());

    preview.open_variant("/blocks/hero", 0).await?;
    let session = preview.generate_variant("Make it about cats").await?;

    assert_eq!(session.variant().path, "/blocks/hero");
    let heading = id_of(session.canonical(), "h1");
    assert_eq!(heading.as_str(), "t-4");
    assert_eq!(session.canonical().text_content(), "CatsAll about cats");

    let prompts = generator.prompts();
    let prompt = &prompts[0];
    assert!(prompt.starts_with("Make it about cats. Put the response in the following structure {<div>"));
    assert!(prompt.contains("<h1 data-library-id=\"t-1\">Welcome</h1>"));

    let notifications = h.notifier.notifications();
    assert_eq!(notifications[0].message, "Generation Complete");
    assert_eq!(notifications[0].variant, NotificationVariant::Positive);

    let table = preview.copy()?;
    assert!(table.html.contains("All about cats"));
    assert!(!table.html.contains(LIBRARY_ID_ATTR));
    Ok(())
}

#[tokio::test]
async fn test_table_shape_matches_fragment() -> anyhow::Result<()> {
    let doc = concat!(
        r#"<div><div class="cards">"#,
        r#"<div><div><p>a</p></div><div><p>b</p></div><div><p>c</p></div></div>"#,
        r#"<div><div><h2>Wide</h2></div></div>"#,
        r#"<div><div><p>d</p></div><div><p>e</p></div><div><p>f</p></div></div>"#,
        r#"</div></div>"#
    );
    let fetcher = MemoryFetcher::new().with_document("/blocks/cards", doc);
    let library = Arc::new(LibraryCache::new(Arc::new(fetcher)));
    let mut preview = PreviewOrchestrator::new(
        library,
        PreviewOptions::new(Url::parse("http://localhost:3000").unwrap()),
    );

    preview.open_variant("/blocks/cards", 0).await?;
    let table = preview.copy()?;

    assert_eq!(table.html.matches("<tr>").count(), 1 + 3);
    assert_eq!(table.html.matches("<td").count(), 1 + 3 + 1 + 3);
    assert_eq!(table.html.matches(r#"colspan="3""#).count(), 2);
    Ok(())
}
