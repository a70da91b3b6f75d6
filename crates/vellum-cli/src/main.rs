//! Vellum CLI
//!
//! Command-line interface for Vellum - outline and document management
//! for long-form writing projects.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "vellum")]
#[command(about = "Vellum - structured writing projects from the command line")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new project folder
    New {
        /// Project folder to create
        path: PathBuf,
        /// Project name
        #[arg(long)]
        name: Option<String>,
    },
    /// Show project metadata and tree sizes
    Info {
        /// Project folder
        path: PathBuf,
    },
    /// Print an outline tree
    Tree {
        /// Project folder
        path: PathBuf,
        /// Which tree: story, plot, characters or locations
        #[arg(long, default_value = "story")]
        tree: String,
    },
    /// Add an outline item
    Add {
        /// Project folder
        path: PathBuf,
        /// Item kind: book, partition, chapter, scene, page, group or note
        #[arg(long)]
        kind: String,
        /// Which tree: story, plot, characters or locations
        #[arg(long, default_value = "story")]
        tree: String,
        /// Parent item handle (defaults to the tree root)
        #[arg(long, conflicts_with_all = ["before", "after"])]
        parent: Option<String>,
        /// Insert before this sibling handle
        #[arg(long, conflicts_with = "after")]
        before: Option<String>,
        /// Insert after this sibling handle
        #[arg(long)]
        after: Option<String>,
        /// Insert position among the parent's children
        #[arg(long)]
        position: Option<usize>,
        /// Name for the new item
        #[arg(long)]
        name: Option<String>,
    },
    /// Rename an outline item
    Rename {
        /// Project folder
        path: PathBuf,
        /// Item handle
        handle: String,
        /// New name
        name: String,
        /// Which tree: story, plot, characters or locations
        #[arg(long, default_value = "story")]
        tree: String,
    },
    /// Document body commands
    Doc {
        #[command(subcommand)]
        command: DocCommands,
    },
}

#[derive(Subcommand)]
enum DocCommands {
    /// Print a document body as plain text
    Show {
        /// Project folder
        path: PathBuf,
        /// Owning item handle
        handle: String,
    },
    /// Replace a document body from plain text (file or stdin)
    Import {
        /// Project folder
        path: PathBuf,
        /// Owning item handle
        handle: String,
        /// Input file; reads stdin when omitted
        file: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    match cli.command {
        Commands::New { path, name } => commands::project::new(&path, name.as_deref(), &output),
        Commands::Info { path } => commands::project::info(&path, &output),
        Commands::Tree { path, tree } => commands::item::tree(&path, &tree, &output),
        Commands::Add {
            path,
            kind,
            tree,
            parent,
            before,
            after,
            position,
            name,
        } => commands::item::add(
            &path,
            &tree,
            &kind,
            parent.as_deref(),
            before.as_deref(),
            after.as_deref(),
            position,
            name.as_deref(),
            &output,
        ),
        Commands::Rename {
            path,
            handle,
            name,
            tree,
        } => commands::item::rename(&path, &tree, &handle, &name, &output),
        Commands::Doc { command } => match command {
            DocCommands::Show { path, handle } => commands::doc::show(&path, &handle, &output),
            DocCommands::Import { path, handle, file } => {
                commands::doc::import(&path, &handle, file.as_deref(), &output)
            }
        },
    }
}
