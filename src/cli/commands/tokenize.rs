//! Tokenize command - show the words the indexer would see

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::tokenizer::{FastTokenizer, PreciseTokenizer, TokenKind};
use clap::Args;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

/// Arguments for the tokenize command
#[derive(Args, Debug)]
pub struct TokenizeArgs {
    /// Text to tokenize
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    pub text: Option<String>,

    /// Read the text from a file instead
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,

    /// Use only the Unicode word-boundary tokenizer
    #[arg(long)]
    pub precise: bool,
}

#[derive(Debug, Serialize)]
pub struct TokenRow {
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub kind: TokenKind,
}

/// Tokenize response
#[derive(Debug, Serialize)]
pub struct TokenizeResponse {
    pub tokenizer: &'static str,
    pub count: usize,
    /// Spans the fast scanner handed to the precise tokenizer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallbacks: Option<usize>,
    pub tokens: Vec<TokenRow>,
}

/// Execute the tokenize command
pub fn execute(
    args: TokenizeArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = match (&args.text, &args.file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?,
        (None, None) => return Err("Provide text or --file".into()),
    };

    let response = if args.precise {
        let tokens: Vec<TokenRow> = PreciseTokenizer::new()
            .tokenize(&text)
            .into_iter()
            .map(|(start, word, kind)| TokenRow {
                text: word.to_string(),
                start,
                end: start + word.len(),
                kind,
            })
            .collect();
        TokenizeResponse {
            tokenizer: "precise",
            count: tokens.len(),
            fallbacks: None,
            tokens,
        }
    } else {
        let table = services.config.tokenizer.char_table();
        let mut tokenizer = FastTokenizer::with_table(&text, &table);
        let mut tokens = Vec::new();
        while let Some(token) = tokenizer.next_token() {
            tokens.push(TokenRow {
                text: token.text.to_string(),
                start: token.start,
                end: token.end,
                kind: token.kind,
            });
        }
        TokenizeResponse {
            tokenizer: "fast",
            count: tokens.len(),
            fallbacks: Some(tokenizer.fallback_count()),
            tokens,
        }
    };

    match format {
        OutputFormat::Human => {
            for token in &response.tokens {
                println!(
                    "{:>6}..{:<6} {} {}",
                    token.start,
                    token.end,
                    colors::dim(&format!("{:<10}", format!("{:?}", token.kind).to_lowercase())),
                    token.text
                );
            }
            print!(
                "{} {} token(s)",
                colors::label("Total:"),
                colors::number(&response.count.to_string())
            );
            match response.fallbacks {
                Some(n) => println!(" ({} precise fallback(s))", colors::number(&n.to_string())),
                None => println!(),
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
