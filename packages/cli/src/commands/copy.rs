use anyhow::{anyhow, Context, Result};
use blockshelf_editor::{
    collect_ids, PreviewOrchestrator, SequentialIdGenerator, StableId,
};
use clap::Args;
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;

use super::shared::{open_library, ConsoleNotifier, StdoutClipboard};
use crate::config::Config;
use crate::generator::CompletionClient;

#[derive(Args, Debug)]
pub struct CopyArgs {
    /// Library path of the block document, e.g. /blocks/hero
    pub path: String,

    /// Variant index within the document
    #[arg(short, long, default_value = "0")]
    pub index: usize,

    /// Replace the text of an element before copying (ID=TEXT)
    #[arg(short, long = "edit", value_parser = parse_assignment)]
    pub edits: Vec<(String, String)>,

    /// Print the editable element ids instead of copying
    #[arg(long)]
    pub list_ids: bool,

    /// Rewrite the whole variant with generated content
    #[arg(long)]
    pub generate: Option<String>,

    /// Replace the text of an element with generated text (ID=PROMPT)
    #[arg(long = "generate-text", value_parser = parse_assignment)]
    pub generate_text: Vec<(String, String)>,
}

pub async fn copy(args: CopyArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let library = open_library(&config, cwd);

    let mut preview = PreviewOrchestrator::new(library, config.preview_options()?)
        .with_clipboard(Arc::new(StdoutClipboard))
        .with_notifier(Arc::new(ConsoleNotifier))
        .with_ids(Box::new(SequentialIdGenerator::new(&args.path)));

    if args.generate.is_some() || !args.generate_text.is_empty() {
        let client = CompletionClient::from_env().context("Text generation is unavailable")?;
        preview = preview.with_generator(Arc::new(client));
    }

    preview.open_variant(&args.path, args.index).await?;

    if let Some(prompt) = &args.generate {
        preview.generate_variant(prompt).await?;
    }

    for (id, prompt) in &args.generate_text {
        preview.generate_text(&StableId::new(id.as_str()), prompt).await?;
    }

    let session = preview
        .session_mut()
        .ok_or_else(|| anyhow!("No block is being previewed"))?;

    if args.list_ids {
        for id in collect_ids(session.live().root()) {
            if let Some(element) = session.live().element(&id) {
                println!(
                    "{} {} {}",
                    id.as_str().green(),
                    format!("<{}>", element.tag).dimmed(),
                    element.text_content().trim()
                );
            }
        }
        return Ok(());
    }

    for (id, text) in &args.edits {
        session.live_mut().set_text(&StableId::new(id.as_str()), text.as_str())?;
    }

    preview.copy()?;
    Ok(())
}

/// Split `ID=VALUE` at the first `=`
fn parse_assignment(input: &str) -> Result<(String, String), String> {
    match input.split_once('=') {
        Some((id, value)) if !id.is_empty() => Ok((id.to_string(), value.to_string())),
        _ => Err(format!("expected ID=VALUE, got \"{}\"", input)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("abc-1=Hello = world"),
            Ok(("abc-1".to_string(), "Hello = world".to_string()))
        );
        assert_eq!(parse_assignment("abc-1="), Ok(("abc-1".to_string(), String::new())));
        assert!(parse_assignment("=text").is_err());
        assert!(parse_assignment("no-separator").is_err());
    }
}
