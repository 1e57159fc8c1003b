//! Configuration management for xtindex.
//!
//! Configuration is loaded from a TOML file and environment
//! variables, with defaults for every setting. Each `[[index]]`
//! block names one document collection: where its XML sources live,
//! where its database goes and how it is chunked.
//!
//! ```toml
//! [indexing]
//! chunk_size = 100
//! chunk_overlap = 50
//!
//! [[index]]
//! name = "letters"
//! src = "/data/letters"
//! chunk = { size = 200, overlap = 20 }
//! skip = "*.draft.xml, tmp*"
//! stopwords = ["a", "an", "the"]
//! ```

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, XtIndexError};
use crate::core::indexer::chunker::MIN_CHUNK_SIZE;
use crate::core::tokenizer::charclass::CharClassTable;
use crate::core::xdg::XdgDirs;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub indexing: IndexingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub tokenizer: TokenizerConfig,

    /// Named index definitions (`[[index]]` blocks)
    #[serde(default, rename = "index")]
    pub indexes: Vec<IndexConfig>,
}

/// Indexing defaults, used by indexes without their own chunk settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexingConfig {
    /// Words per chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Words shared between consecutive chunks
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Maximum source file size in MB (skip larger files)
    #[serde(default = "default_max_file_size")]
    pub max_file_size_mb: usize,

    /// Chunks appended between intermediate commits
    #[serde(default = "default_commit_every")]
    pub commit_every: usize,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Parent directory of index databases without an explicit `db`
    #[serde(default = "default_index_root")]
    pub index_root: PathBuf,
}

/// Tokenizer character table adjustments
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenizerConfig {
    /// Characters treated as word-internal punctuation in addition
    /// to the built-in set
    #[serde(default)]
    pub extra_punctuation: String,

    /// Keep a lone "x" before punctuation as its own token
    #[serde(default = "default_true")]
    pub x_special_case: bool,
}

/// Chunk settings of one index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChunkSpec {
    pub size: Option<usize>,
    pub overlap: Option<usize>,
}

/// Stop words, inline or from a file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum StopwordsSpec {
    List(Vec<String>),
    Inline(String),
    File { file: PathBuf },
}

/// One `[[index]]` block
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexConfig {
    pub name: String,

    /// Database directory; defaults to `<index_root>/<name>`
    #[serde(default)]
    pub db: Option<PathBuf>,

    /// Directory holding the XML sources
    pub src: PathBuf,

    #[serde(default)]
    pub chunk: Option<ChunkSpec>,

    /// Wildcard file name patterns to skip, comma or space separated
    #[serde(default)]
    pub skip: Option<String>,

    #[serde(default)]
    pub stopwords: Option<StopwordsSpec>,

    #[serde(default)]
    pub display_style: Option<String>,
}

/// An index definition with every default applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedIndex {
    pub name: String,
    pub db: PathBuf,
    pub src: PathBuf,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub skip_patterns: Vec<String>,

    /// Lowercased stop words
    pub stopwords: HashSet<String>,
    pub display_style: Option<String>,
}

impl ResolvedIndex {
    /// Directory of the chunk store
    pub fn chunks_dir(&self) -> PathBuf {
        self.db.join("chunks")
    }

    /// Directory of persisted document trees
    pub fn trees_dir(&self) -> PathBuf {
        self.db.join("trees")
    }
}

// Default value functions
fn default_chunk_size() -> usize {
    100
}

fn default_chunk_overlap() -> usize {
    50
}

fn default_max_file_size() -> usize {
    50
}

fn default_commit_every() -> usize {
    1000
}

fn default_index_root() -> PathBuf {
    PathBuf::from("./indexes")
}

fn default_true() -> bool {
    true
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            max_file_size_mb: default_max_file_size(),
            commit_every: default_commit_every(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            index_root: default_index_root(),
        }
    }
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            extra_punctuation: String::new(),
            x_special_case: true,
        }
    }
}

impl TokenizerConfig {
    /// Build the character table for these settings
    pub fn char_table(&self) -> CharClassTable {
        let table = CharClassTable::with_extra_punctuation(self.extra_punctuation.chars());
        if self.x_special_case {
            table
        } else {
            table.with_single_char_words([])
        }
    }

    /// Whether the built-in table can be used as is
    pub fn is_default(&self) -> bool {
        self.extra_punctuation.is_empty() && self.x_special_case
    }
}

/// Resolve per-index chunk settings against the global defaults.
///
/// Without a size both defaults apply. A size below
/// [`MIN_CHUNK_SIZE`] is raised to it. Without an overlap the
/// overlap equals the size.
pub fn resolve_chunking(spec: Option<ChunkSpec>, defaults: &IndexingConfig) -> Result<(usize, usize)> {
    let (size, overlap) = match spec.and_then(|s| s.size.map(|size| (size, s.overlap))) {
        None => (defaults.chunk_size, defaults.chunk_overlap),
        Some((0, _)) => {
            return Err(XtIndexError::ConfigError(
                "Chunk size must be non-zero".to_string(),
            ))
        }
        Some((size, overlap)) => {
            let size = size.max(MIN_CHUNK_SIZE);
            (size, overlap.unwrap_or(size))
        }
    };

    if overlap > size {
        return Err(XtIndexError::ConfigError(format!(
            "Chunk overlap {overlap} exceeds chunk size {size}"
        )));
    }

    Ok((size, overlap))
}

/// Read a non-negative integer from an environment variable
fn env_number(name: &str) -> Result<Option<usize>> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map(Some).map_err(|_| {
            XtIndexError::ConfigError(format!(
                "{name} must be a non-negative integer, got '{raw}'"
            ))
        }),
        Err(_) => Ok(None),
    }
}

/// Split a skip list on commas and whitespace
pub fn parse_skip_patterns(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

fn load_stopwords(spec: &StopwordsSpec) -> Result<HashSet<String>> {
    let words = match spec {
        StopwordsSpec::List(words) => words.clone(),
        StopwordsSpec::Inline(raw) => raw.split_whitespace().map(str::to_string).collect(),
        StopwordsSpec::File { file } => fs::read_to_string(file)
            .map_err(|e| {
                XtIndexError::ConfigError(format!(
                    "Failed to read stopwords file {}: {e}",
                    file.display()
                ))
            })?
            .split_whitespace()
            .map(str::to_string)
            .collect(),
    };

    Ok(words.into_iter().map(|w| w.to_lowercase()).collect())
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            XtIndexError::ConfigError(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// Priority order:
    /// 1. XTINDEX_CONFIG env var
    /// 2. XDG config file (~/.config/xtindex/config.toml)
    /// 3. ./xtindex.toml
    /// 4. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("XTINDEX_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else if Path::new("xtindex.toml").exists() {
                Self::from_file("xtindex.toml")?
            } else {
                Self::default()
            }
        };

        // Store indexes under the XDG data directory unless told otherwise
        if env::var("XTINDEX_INDEX_ROOT").is_err()
            && config.storage.index_root == default_index_root()
        {
            config.storage.index_root = xdg.indexes_dir();
        }

        config.merge_env()?;
        config.validate()?;

        Ok(config)
    }

    /// Load from an explicit file, then apply environment overrides
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::from_file(path)?;
        config.merge_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Merge configuration with environment variables.
    ///
    /// A numeric variable that does not parse is a configuration
    /// error, never silently ignored.
    pub fn merge_env(&mut self) -> Result<()> {
        if let Some(size) = env_number("XTINDEX_CHUNK_SIZE")? {
            self.indexing.chunk_size = size;
        }
        if let Some(overlap) = env_number("XTINDEX_CHUNK_OVERLAP")? {
            self.indexing.chunk_overlap = overlap;
        }
        if let Some(size) = env_number("XTINDEX_MAX_FILE_SIZE_MB")? {
            self.indexing.max_file_size_mb = size;
        }
        if let Ok(root) = env::var("XTINDEX_INDEX_ROOT") {
            self.storage.index_root = PathBuf::from(root);
        }
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.indexing.chunk_size < MIN_CHUNK_SIZE {
            return Err(XtIndexError::ConfigError(format!(
                "Chunk size must be at least {MIN_CHUNK_SIZE}"
            )));
        }

        if self.indexing.chunk_overlap > self.indexing.chunk_size {
            return Err(XtIndexError::ConfigError(
                "Overlap must not exceed chunk size".to_string(),
            ));
        }

        if self.indexing.max_file_size_mb == 0 {
            return Err(XtIndexError::ConfigError(
                "Max file size must be non-zero".to_string(),
            ));
        }

        if self.indexing.commit_every == 0 {
            return Err(XtIndexError::ConfigError(
                "Commit batch size must be non-zero".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for index in &self.indexes {
            if index.name.trim().is_empty() {
                return Err(XtIndexError::ConfigError(
                    "Index name must not be empty".to_string(),
                ));
            }
            if !seen.insert(index.name.to_lowercase()) {
                return Err(XtIndexError::ConfigError(format!(
                    "Duplicate index name '{}'",
                    index.name
                )));
            }
            resolve_chunking(index.chunk, &self.indexing).map_err(|e| match e {
                XtIndexError::ConfigError(m) => {
                    XtIndexError::ConfigError(format!("Index '{}': {m}", index.name))
                }
                other => other,
            })?;
        }

        Ok(())
    }

    /// Find an index block by name, ignoring case
    pub fn find_index(&self, name: &str) -> Result<&IndexConfig> {
        self.indexes
            .iter()
            .find(|index| index.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| XtIndexError::ConfigError(format!("No index named '{name}'")))
    }

    /// Resolve an index block with all defaults applied
    pub fn resolve_index(&self, name: &str) -> Result<ResolvedIndex> {
        let index = self.find_index(name)?;
        let (chunk_size, chunk_overlap) = resolve_chunking(index.chunk, &self.indexing)?;

        let stopwords = match &index.stopwords {
            Some(spec) => load_stopwords(spec)?,
            None => HashSet::new(),
        };

        Ok(ResolvedIndex {
            name: index.name.clone(),
            db: index
                .db
                .clone()
                .unwrap_or_else(|| self.storage.index_root.join(&index.name)),
            src: index.src.clone(),
            chunk_size,
            chunk_overlap,
            skip_patterns: index
                .skip
                .as_deref()
                .map(parse_skip_patterns)
                .unwrap_or_default(),
            stopwords,
            display_style: index.display_style.clone(),
        })
    }

    /// Log configuration
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Chunk size: {} words", self.indexing.chunk_size);
        tracing::info!("  Overlap: {} words", self.indexing.chunk_overlap);
        tracing::info!("  Max file size: {} MB", self.indexing.max_file_size_mb);
        tracing::info!("  Commit every: {} chunks", self.indexing.commit_every);
        tracing::info!("  Index root: {:?}", self.storage.index_root);
        tracing::info!("  Indexes: {}", self.indexes.len());
        if !self.tokenizer.is_default() {
            tracing::info!(
                "  Tokenizer: extra punctuation {:?}, x special case {}",
                self.tokenizer.extra_punctuation,
                self.tokenizer.x_special_case
            );
        }
    }
}
