//! Clean command - repair every index below a directory

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::services::Services;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the clean command
#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Directory to scan recursively for chunk stores
    pub dir: PathBuf,
}

/// Execute the clean command
pub fn execute(
    args: CleanArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = services.create_cleaner().process_dir(&args.dir)?;

    match format {
        OutputFormat::Human => {
            println!(
                "{} {} store(s) under {}",
                colors::success("Scanned"),
                colors::number(&report.stores_scanned.to_string()),
                colors::file_path(&args.dir.display().to_string())
            );
            println!(
                "  Fragments purged: {}",
                colors::number(&report.fragments_purged.to_string())
            );
            println!(
                "  Empty stores deleted: {}",
                colors::number(&report.stores_deleted.to_string())
            );
            println!(
                "  Directories removed: {}",
                colors::number(&report.dirs_removed.to_string())
            );
            if report.stores_skipped > 0 {
                println!(
                    "  {} {} store(s) could not be opened",
                    colors::warning("Skipped:"),
                    colors::number(&report.stores_skipped.to_string())
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
