//! CLI adapter for xtindex
//!
//! Drives indexing, repair and tree navigation from the command
//! line. This module depends on `core/`; nothing in `core/` depends
//! on it.
//!
//! # Architecture
//!
//! ```text
//!              +------------------+
//!              |     core/        |
//!              |  (domain logic)  |
//!              +--------+---------+
//!                       |
//!                       v
//!              +------------------+
//!              |      cli/        |
//!              | (clap adapter)   |
//!              +------------------+
//! ```

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// xtindex - XML full-text indexing
///
/// Index collections of XML documents into overlapping word chunks,
/// repair databases left by interrupted runs, and walk the stored
/// document trees along XPath-style axes.
#[derive(Parser, Debug)]
#[command(name = "xtindex")]
#[command(version)]
#[command(about = "Chunked full-text indexing for XML collections", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Configuration file (overrides XTINDEX_CONFIG and the XDG lookup)
    #[arg(long, global = true, env = "XTINDEX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Index the XML sources of a configured index
    Index(commands::IndexArgs),

    /// Purge incomplete documents from every index below a directory
    Clean(commands::CleanArgs),

    /// Show how text is split into words
    Tokenize(commands::TokenizeArgs),

    /// Enumerate an axis of a stored document tree
    Navigate(commands::NavigateArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  xtindex completions bash > ~/.local/share/bash-completion/completions/xtindex
    ///   zsh:   xtindex completions zsh > ~/.zfunc/_xtindex
    ///   fish:  xtindex completions fish > ~/.config/fish/completions/xtindex.fish
    Completions(commands::CompletionsArgs),
}

/// Run the CLI with the provided arguments
pub fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;
    use crate::core::services::Services;
    use crate::core::xdg::XdgDirs;

    // Handle completions command early (doesn't need services)
    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    let xdg = XdgDirs::new();
    xdg.log_paths();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load_with_xdg(&xdg)?,
    };
    config.log_config();

    let services = Services::new(config);

    match cli.command {
        Commands::Index(args) => commands::index::execute(args, &services, cli.format),
        Commands::Clean(args) => commands::clean::execute(args, &services, cli.format),
        Commands::Tokenize(args) => commands::tokenize::execute(args, &services, cli.format),
        Commands::Navigate(args) => commands::navigate::execute(args, &services, cli.format),
        Commands::ShowConfig(args) => commands::config::execute(args, &services, &xdg, cli.format),
        Commands::Completions(_) => unreachable!(), // Handled above
    }
}
