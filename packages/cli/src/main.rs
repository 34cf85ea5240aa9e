mod commands;
mod config;
mod generator;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{copy, list, search, CopyArgs, ListArgs, SearchArgs};
use tracing_subscriber::EnvFilter;

/// Blockshelf CLI - browse block libraries and copy blocks as tables
#[derive(Parser, Debug)]
#[command(name = "blockshelf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the variants of library documents
    List(ListArgs),

    /// Search variants by name and tags
    Search(SearchArgs),

    /// Preview a variant, apply edits, and print it as a table
    Copy(CopyArgs),
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match std::env::current_dir() {
        Ok(cwd) => match cli.command {
            Command::List(args) => list(args, &cwd).await,
            Command::Search(args) => search(args, &cwd).await,
            Command::Copy(args) => copy(args, &cwd).await,
        },
        Err(err) => Err(anyhow::anyhow!("Cannot get current directory: {}", err)),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
