//! Error types for Huffman coding.

use thiserror::Error;

/// Error variants for the encode and decode pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// The source is empty where data is required, or could not be read.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A merge tree or code table violates the strict binary / prefix-free structure.
    #[error("invalid tree: {0}")]
    InvalidTree(String),

    /// A symbol in the stream has no code. The code table was built from different input.
    #[error("symbol {symbol:?} at position {position} has no code")]
    UnknownSymbol {
        /// The offending symbol.
        symbol: char,
        /// Index of the symbol in the input stream.
        position: usize,
    },

    /// Packed byte count disagrees with the number of bits produced.
    #[error("packing overflow: expected {expected_bytes} bytes, produced {actual_bytes}")]
    PackingOverflow {
        /// `ceil(total_bits / 8)`.
        expected_bytes: usize,
        /// Bytes actually emitted.
        actual_bytes: usize,
    },

    /// A bit sequence or artifact could not be resolved to a complete symbol sequence.
    #[error("decode error: {0}")]
    Decode(String),

    /// An I/O error occurred while reading or writing an artifact.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for Huffman operations.
pub type Result<T> = std::result::Result<T, Error>;
