// Test fixtures for integration testing

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A small book; node ids in document order are:
///
/// 0 document, 1 book, 2 @lang, 3 title, 4 "Rust Trees",
/// 5 ch, 6 @n, 7 p, 8 "First words here.", 9 comment,
/// 10 ch, 11 @n, 12 p, 13 "Second chapter text."
#[allow(dead_code)] // Used in integration tests
pub const BOOK_XML: &str = r#"<?xml version="1.0"?>
<book lang="en">
  <title>Rust Trees</title>
  <ch n="1"><p>First words here.</p><!-- draft --></ch>
  <ch n="2"><p>Second chapter text.</p></ch>
</book>"#;

#[allow(dead_code)] // Used in integration tests
pub const LETTER_XML: &str = r#"<letter date="1851-03-02">
  <salute>Dear Ann,</salute>
  <p>The weather at Whitby has been fine &amp; dry; we walked to the abbey twice.</p>
  <p>Write soon, and give my love to the family.</p>
  <close>Yours, E.</close>
</letter>"#;

/// Directory of XML sources for indexing tests
#[allow(dead_code)] // Used in integration tests
pub struct TestCorpus {
    pub dir: TempDir,
    pub files: Vec<PathBuf>,
}

impl TestCorpus {
    /// Two well-formed documents in nested directories
    #[allow(dead_code)] // Used in integration tests
    pub fn small() -> Self {
        Self::with_files(&[("books/book.xml", BOOK_XML), ("letters/1851.xml", LETTER_XML)])
    }

    /// `count` generated documents of `words` words each
    #[allow(dead_code)] // Used in integration tests
    pub fn generated(count: usize, words: usize) -> Self {
        let files: Vec<(String, String)> = (0..count)
            .map(|i| {
                let body: Vec<String> = (0..words).map(|w| format!("word{i}x{w}")).collect();
                (
                    format!("doc_{i:03}.xml"),
                    format!("<doc id=\"{i}\"><p>{}</p></doc>", body.join(" ")),
                )
            })
            .collect();

        Self::with_files(
            files
                .iter()
                .map(|(f, c)| (f.as_str(), c.as_str()))
                .collect::<Vec<_>>()
                .as_slice(),
        )
    }

    /// Create with custom files
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().unwrap();
        let mut paths = Vec::new();

        for (path, content) in files {
            let full_path = dir.path().join(path);
            std::fs::create_dir_all(full_path.parent().unwrap()).unwrap();
            std::fs::write(&full_path, content).unwrap();
            paths.push(full_path);
        }

        Self { dir, files: paths }
    }

    /// Get path to the corpus root
    #[allow(dead_code)] // Used in integration tests
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}
