//! File locations for an encode run.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Input document and the two artifacts produced from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// UTF-8 text to encode
    pub input: PathBuf,
    /// Packed data file
    pub packed_output: PathBuf,
    /// Code table file
    pub code_table_output: PathBuf,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self::for_input("input.txt")
    }
}

impl CodecConfig {
    /// Place both artifacts next to `input`: `<stem>-compressed.bin` and `<stem>-codes.txt`.
    pub fn for_input<P: AsRef<Path>>(input: P) -> Self {
        let input = input.as_ref().to_path_buf();
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "input".to_string());
        let dir = input.parent().unwrap_or_else(|| Path::new("")).to_path_buf();
        Self {
            packed_output: dir.join(format!("{stem}-compressed.bin")),
            code_table_output: dir.join(format!("{stem}-codes.txt")),
            input,
        }
    }

    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidInput(format!("config: {e}")))
    }
}
