//! Input text as an indexable symbol sequence.
//!
//! The whole document is loaded once. Counting and packing both read the same
//! `SourceText`, so the two passes always observe identical content.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

/// The full input document, one `char` per symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceText {
    symbols: Vec<char>,
}

impl SourceText {
    /// Split `text` into symbols.
    pub fn new(text: &str) -> Self {
        Self {
            symbols: text.chars().collect(),
        }
    }

    /// Read a UTF-8 file to completion.
    ///
    /// # Errors
    /// Returns `Error::InvalidInput` if the file cannot be read or is not valid UTF-8.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| Error::InvalidInput(format!("{}: {}", path.display(), e)))?;
        let source = Self::new(&text);
        debug!(path = %path.display(), symbols = source.len(), "loaded source text");
        Ok(source)
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// True if the document has no symbols.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbol at `index`.
    pub fn get(&self, index: usize) -> Option<char> {
        self.symbols.get(index).copied()
    }

    /// All symbols in document order.
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// Reassemble the document.
    pub fn to_text(&self) -> String {
        self.symbols.iter().collect()
    }
}

impl From<&str> for SourceText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for SourceText {
    fn from(text: String) -> Self {
        Self::new(&text)
    }
}
