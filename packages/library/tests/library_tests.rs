use std::sync::Arc;

use blockshelf_library::{search, DirectoryFetcher, LibraryCache, LibraryError};

const HERO_DOC: &str = r#"
<div>
  <div class="library-metadata">
    <div><div>Description</div><div>Page banner</div></div>
    <div><div>Search Tags</div><div>banner, header</div></div>
  </div>
</div>
<div>
  <div class="hero"><div><div><h1>Welcome</h1></div></div></div>
</div>
<div>
  <div class="hero dark"><div><div><h1>Welcome</h1></div></div></div>
  <div class="library-metadata">
    <div><div>Name</div><div>Dark Theme Hero</div></div>
    <div><div>Search Tags</div><div>Hero night</div></div>
  </div>
</div>
"#;

const CARDS_DOC: &str = r#"
<div>
  <div class="cards"><div><div>One</div><div>Two</div></div></div>
</div>
"#;

fn library() -> (tempfile::TempDir, LibraryCache) {
    let dir = tempfile::tempdir().unwrap();
    let blocks = dir.path().join("blocks");
    std::fs::create_dir_all(&blocks).unwrap();
    std::fs::write(blocks.join("hero.plain.html"), HERO_DOC).unwrap();
    std::fs::write(blocks.join("cards.plain.html"), CARDS_DOC).unwrap();

    let cache = LibraryCache::new(Arc::new(DirectoryFetcher::new(dir.path())));
    (dir, cache)
}

#[tokio::test]
async fn test_listings_from_disk() {
    let (_dir, cache) = library();
    let hero = cache.document("/blocks/hero").await.unwrap();

    let listings = hero.listings();
    assert_eq!(listings.len(), 2);

    assert_eq!(listings[0].index, 0);
    assert_eq!(listings[0].display_name, "hero");
    assert_eq!(listings[0].description.as_deref(), Some("Page banner"));

    assert_eq!(listings[1].index, 1);
    assert_eq!(listings[1].display_name, "Dark Theme Hero");
    assert_eq!(listings[1].name_with_variants, "hero (dark)");
    assert_eq!(listings[1].description.as_deref(), Some("Page banner"));
}

#[tokio::test]
async fn test_search_across_library() {
    let (_dir, cache) = library();
    let hero = cache.document("/blocks/hero").await.unwrap();
    let cards = cache.document("/blocks/cards").await.unwrap();

    let found = search([hero.as_ref(), cards.as_ref()], "hero dark");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].display_name, "Dark Theme Hero");

    let found = search([hero.as_ref(), cards.as_ref()], "cards");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].path, "/blocks/cards");

    assert!(search([hero.as_ref(), cards.as_ref()], "").is_empty());
}

#[tokio::test]
async fn test_one_failed_document_does_not_affect_others() {
    let (_dir, cache) = library();

    let missing = cache.document("/blocks/missing").await;
    assert!(matches!(missing, Err(LibraryError::Fetch { .. })));

    assert!(cache.document("/blocks/cards").await.is_ok());
}
