//! Config command - show current configuration

use crate::cli::output::{colors, print_warning};
use crate::cli::OutputFormat;
use crate::core::config::{IndexingConfig, TokenizerConfig};
use crate::core::services::Services;
use crate::core::xdg::XdgDirs;
use clap::Args;
use serde::Serialize;

/// Arguments for the show-config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Also list stop words and skip patterns of each index
    #[arg(long, short = 'a')]
    pub all: bool,
}

/// Configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub config_file: String,
    pub index_root: String,
    pub indexing: IndexingConfig,
    pub tokenizer: TokenizerConfig,
    pub indexes: Vec<IndexSummary>,
}

#[derive(Debug, Serialize)]
pub struct IndexSummary {
    pub name: String,
    pub src: String,
    pub db: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stopwords: Option<Vec<String>>,
}

/// Execute the show-config command
pub fn execute(
    args: ConfigArgs,
    services: &Services,
    xdg: &XdgDirs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = &services.config;

    let mut indexes = Vec::new();
    for block in &config.indexes {
        match config.resolve_index(&block.name) {
            Ok(index) => {
                let mut stopwords: Vec<String> = index.stopwords.into_iter().collect();
                stopwords.sort();
                indexes.push(IndexSummary {
                    name: index.name,
                    src: index.src.to_string_lossy().into_owned(),
                    db: index.db.to_string_lossy().into_owned(),
                    chunk_size: index.chunk_size,
                    chunk_overlap: index.chunk_overlap,
                    skip: args.all.then_some(index.skip_patterns),
                    stopwords: args.all.then_some(stopwords),
                });
            }
            Err(e) => print_warning(&format!("Index '{}': {}", block.name, e)),
        }
    }

    let response = ConfigResponse {
        config_file: xdg.config_file().to_string_lossy().into_owned(),
        index_root: config.storage.index_root.to_string_lossy().into_owned(),
        indexing: config.indexing.clone(),
        tokenizer: config.tokenizer.clone(),
        indexes,
    };

    match format {
        OutputFormat::Human => {
            println!("{}", colors::label("Configuration:"));
            println!("  config_file: {}", response.config_file);
            println!("  index_root: {}", response.index_root);
            println!("  indexing:");
            println!("    chunk_size: {}", response.indexing.chunk_size);
            println!("    chunk_overlap: {}", response.indexing.chunk_overlap);
            println!("    max_file_size_mb: {}", response.indexing.max_file_size_mb);
            println!("    commit_every: {}", response.indexing.commit_every);
            println!("  tokenizer:");
            println!(
                "    extra_punctuation: {:?}",
                response.tokenizer.extra_punctuation
            );
            println!("    x_special_case: {}", response.tokenizer.x_special_case);
            println!("  indexes:");
            for index in &response.indexes {
                println!(
                    "    {}: {} -> {} (chunk {}/{})",
                    colors::label(&index.name),
                    colors::file_path(&index.src),
                    colors::file_path(&index.db),
                    index.chunk_size,
                    index.chunk_overlap
                );
                if let Some(skip) = &index.skip {
                    println!("      skip: {skip:?}");
                }
                if let Some(stopwords) = &index.stopwords {
                    println!("      stopwords: {}", stopwords.join(" "));
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
