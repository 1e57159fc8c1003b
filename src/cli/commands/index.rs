//! Index command - index the sources of a configured index

use crate::cli::output::{colors, format_duration};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use clap::Args;
use serde::Serialize;

/// Arguments for the index command
#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Name of an `[[index]]` block in the configuration (case-insensitive)
    pub name: String,

    /// Suppress progress output
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

/// Indexing result response
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub index: String,
    pub src: String,
    pub db: String,
    pub documents_indexed: usize,
    pub documents_skipped: usize,
    pub chunks_created: usize,
    pub words_indexed: usize,
    pub fragments_purged: usize,
    pub duration_secs: f64,
    pub throughput_docs_per_sec: f64,
}

/// Execute the index command
pub fn execute(
    args: IndexArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = services.create_pipeline(&args.name)?;
    let index = pipeline.index();

    if !index.src.is_dir() {
        return Err(format!(
            "Source directory '{}' of index '{}' does not exist.",
            index.src.display(),
            index.name
        )
        .into());
    }

    if !args.quiet && format == OutputFormat::Human {
        eprintln!(
            "Indexing {} into {}...",
            colors::file_path(&index.src.display().to_string()),
            colors::file_path(&index.db.display().to_string())
        );
    }

    let stats = pipeline.run()?;

    let duration_secs = stats.duration_ms as f64 / 1000.0;
    let throughput = if duration_secs > 0.0 {
        stats.documents_indexed as f64 / duration_secs
    } else {
        0.0
    };

    let response = IndexResponse {
        index: stats.index,
        src: index.src.to_string_lossy().into_owned(),
        db: index.db.to_string_lossy().into_owned(),
        documents_indexed: stats.documents_indexed,
        documents_skipped: stats.documents_skipped,
        chunks_created: stats.chunks_created,
        words_indexed: stats.words_indexed,
        fragments_purged: stats.fragments_purged,
        duration_secs,
        throughput_docs_per_sec: throughput,
    };

    match format {
        OutputFormat::Human => {
            if response.fragments_purged > 0 {
                println!(
                    "{} {} incomplete fragment(s) from an earlier run",
                    colors::warning("Purged"),
                    colors::number(&response.fragments_purged.to_string())
                );
            }
            println!(
                "{} {} documents ({} chunks, {} words) in {}",
                colors::success("Indexed"),
                colors::number(&response.documents_indexed.to_string()),
                colors::number(&response.chunks_created.to_string()),
                colors::number(&response.words_indexed.to_string()),
                colors::number(&format_duration(response.duration_secs))
            );
            if response.documents_skipped > 0 {
                println!(
                    "{} {} unreadable or malformed documents",
                    colors::warning("Skipped"),
                    colors::number(&response.documents_skipped.to_string())
                );
            }
            println!(
                "Throughput: {} documents/sec",
                colors::number(&format!("{:.0}", response.throughput_docs_per_sec))
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
