use anyhow::Result;
use blockshelf_library::search as search_library;
use clap::Args;
use colored::Colorize;
use std::path::Path;

use super::list::print_listing;
use super::shared::{document_paths, load_documents, open_library};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Words every result must contain
    pub query: String,

    /// Limit the search to these library paths
    #[arg(short, long = "path")]
    pub paths: Vec<String>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn search(args: SearchArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let library = open_library(&config, cwd);
    let paths = document_paths(&args.paths, &config, cwd)?;

    let documents = load_documents(&library, &paths).await;
    let results = search_library(documents.iter().map(|document| document.as_ref()), &args.query);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("{} No blocks match \"{}\"", "✗".yellow(), args.query);
        return Ok(());
    }

    for listing in &results {
        println!("{}", listing.path.bold());
        print_listing(listing);
    }
    Ok(())
}
