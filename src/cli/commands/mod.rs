//! CLI command implementations
//!
//! Each command module handles argument parsing and execution for a
//! single subcommand.

pub mod clean;
pub mod completions;
pub mod config;
pub mod index;
pub mod navigate;
pub mod tokenize;

// Re-export argument types for use in mod.rs
pub use clean::CleanArgs;
pub use completions::CompletionsArgs;
pub use config::ConfigArgs;
pub use index::IndexArgs;
pub use navigate::NavigateArgs;
pub use tokenize::TokenizeArgs;
