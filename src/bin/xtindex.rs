//! xtindex CLI - index and navigate XML document collections
//!
//! # Examples
//!
//! ```bash
//! # Index the sources of the "letters" index from the config file
//! xtindex index letters
//!
//! # Repair every database below a directory
//! xtindex clean ~/.local/share/xtindex/indexes
//!
//! # Walk the children of the document element of a stored tree
//! xtindex navigate letters/trees/1.xml.xtree --node 1 --axis child
//!
//! # Show configuration
//! xtindex show-config
//! ```

use clap::Parser;
use tracing_subscriber::EnvFilter;
use xtindex::cli::output::print_error;
use xtindex::cli::{run, Cli};

fn init_logging(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("xtindex=info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr); // stdout carries command output

    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.json_logs);

    if let Err(e) = run(cli) {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
