//! # Static Huffman Coding
//!
//! *Per-document prefix codes and dense bit packing for text.*
//!
//! ## Intuition First
//!
//! Frequent characters should cost fewer bits than rare ones. Huffman's
//! algorithm finds, for a fixed set of character counts, the prefix code with
//! the smallest total length: keep merging the two lightest subtrees until one
//! tree remains, then read each character's code off its root-to-leaf path.
//!
//! ## Pipeline
//!
//! ```text
//! SourceText ──count_frequencies──▶ FrequencyTable
//!            ──build_tree────────▶ MergeNode
//!            ──extract_codes─────▶ CodeTable ──┐
//! SourceText ──pack──────────────────────────▶ PackedStream
//!                                              └─▶ artifacts (packed data + code table)
//! ```
//!
//! Every stage is a function from the previous stage's output to a new value.
//!
//! ## Padding
//!
//! The last packed byte is padded with zero bits. A short code such as `0` can
//! look exactly like padding, so the packed stream always carries the number of
//! meaningful bits in its last byte and the number of symbols it holds. The
//! decoder reads only significant bits and stops at the symbol count.
//!
//! ## Determinism
//!
//! Leaves enter the priority queue in ascending symbol order; equal weights
//! leave it in insertion order. The same input always yields the same codes.
//!
//! ## Example
//!
//! ```
//! use huffpack::{decode, encode, SourceText};
//!
//! let encoded = encode(&SourceText::new("aaabbc"))?;
//! assert_eq!(encoded.packed.total_bits(), 9);
//! assert_eq!(encoded.packed.bytes().len(), 2);
//! assert_eq!(decode(&encoded.packed, &encoded.codes)?, "aaabbc");
//! # Ok::<(), huffpack::Error>(())
//! ```
//!
//! ## References
//!
//! - Huffman, D. A. (1952). "A Method for the Construction of Minimum-Redundancy Codes."

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod artifact;
pub mod codes;
pub mod config;
pub mod decode;
pub mod error;
pub mod frequency;
pub mod pack;
pub mod pipeline;
pub mod source;
pub mod tree;

pub use codes::{extract_codes, Code, CodeTable};
pub use config::CodecConfig;
pub use error::{Error, Result};
pub use frequency::{count_frequencies, FrequencyTable};
pub use pack::{pack, PackedStream};
pub use pipeline::{decode, decode_files, encode, encode_files, EncodeReport, Encoded, StageTimings};
pub use source::SourceText;
pub use tree::{build_tree, MergeNode};
