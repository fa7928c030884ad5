//! textstore CLI
//!
//! Command-line interface for textstore - a single-admin store for small
//! text files over a flat key-value substrate.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use textstore_core::{Config, FileStore, FsKv};

mod commands;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "textstore")]
#[command(about = "Single-admin text file store over a flat key-value substrate")]
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
    /// List all files
    #[command(alias = "ls")]
    List,
    /// Create a new file
    #[command(alias = "add")]
    Create {
        /// Public filename (defaults to a placeholder)
        filename: Option<String>,
        /// Display title (defaults to the filename)
        #[arg(short = 'T', long)]
        title: Option<String>,
        /// Body content
        #[arg(short, long, conflicts_with = "stdin")]
        content: Option<String>,
        /// Read the body from stdin
        #[arg(long)]
        stdin: bool,
    },
    /// Show a file with its content
    Show {
        /// File ID (full UUID or prefix)
        id: String,
    },
    /// Print the raw body of a file by its public filename
    Cat {
        /// Public filename
        filename: String,
    },
    /// Rewrite a file. The body is replaced whole: omitting both
    /// --content and --stdin clears it.
    Update {
        /// File ID (full UUID or prefix)
        id: String,
        /// New public filename (omitted keeps the current one)
        #[arg(long)]
        filename: Option<String>,
        /// New display title (defaults to the filename)
        #[arg(short = 'T', long)]
        title: Option<String>,
        /// New body content
        #[arg(short, long, conflicts_with = "stdin")]
        content: Option<String>,
        /// Read the new body from stdin
        #[arg(long)]
        stdin: bool,
    },
    /// Delete a file
    #[command(alias = "rm")]
    Delete {
        /// File ID (full UUID or prefix)
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Export the whole store as a bundle
    Export {
        /// Write the bundle to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Merge a bundle file into the store
    Import {
        /// Bundle file to import
        file: PathBuf,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need the store
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), &output);
    }

    let config = Config::load().context("Failed to load configuration")?;
    let kv = FsKv::open(config.kv_dir()).context("Failed to open data directory")?;
    let store = FileStore::new(kv);

    match cli.command {
        Commands::List => commands::file::list(&store, &output),
        Commands::Create {
            filename,
            title,
            content,
            stdin,
        } => commands::file::create(&store, filename, title, content, stdin, &output),
        Commands::Show { id } => commands::file::show(&store, id, &output),
        Commands::Cat { filename } => commands::file::cat(&store, filename),
        Commands::Update {
            id,
            filename,
            title,
            content,
            stdin,
        } => commands::file::update(&store, id, filename, title, content, stdin, &output),
        Commands::Delete { id, yes } => commands::file::delete(&store, id, yes, &output),
        Commands::Export { output: target } => commands::bundle::export(&store, target, &output),
        Commands::Import { file } => commands::bundle::import(&store, file, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_config_command(command: Option<ConfigCommands>, output: &Output) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(output),
        Some(ConfigCommands::Set { key, value }) => commands::config::set(key, value, output),
    }
}
