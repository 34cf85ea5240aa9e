use anyhow::Result;
use blockshelf_library::VariantListing;
use clap::Args;
use colored::Colorize;
use std::path::Path;

use super::shared::{document_paths, load_documents, open_library, plain_description};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Library paths to list, e.g. /blocks/hero (default: every document)
    pub paths: Vec<String>,

    /// Print listings as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn list(args: ListArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let library = open_library(&config, cwd);
    let paths = document_paths(&args.paths, &config, cwd)?;

    let documents = load_documents(&library, &paths).await;
    let listings: Vec<VariantListing> = documents
        .iter()
        .flat_map(|document| document.listings())
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&listings)?);
        return Ok(());
    }

    let mut current_path: Option<&str> = None;
    for listing in &listings {
        if current_path != Some(listing.path.as_str()) {
            println!("{}", listing.path.bold());
            current_path = Some(listing.path.as_str());
        }
        print_listing(listing);
    }

    println!();
    println!(
        "   {} variants in {} documents",
        listings.len(),
        documents.len()
    );
    Ok(())
}

pub(super) fn print_listing(listing: &VariantListing) {
    println!(
        "  {} {} {}",
        format!("[{}]", listing.index).dimmed(),
        listing.display_name.green(),
        format!("({})", listing.name_with_variants).dimmed()
    );
    if let Some(description) = &listing.description {
        println!("      {}", plain_description(description));
    }
}
