//! End-to-end encode and decode.
//!
//! Each stage takes the previous stage's output by reference and returns a
//! new value; nothing is shared or mutated between stages.

use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::artifact::{read_code_table, read_packed, stage_code_table, stage_packed};
use crate::codes::{extract_codes, CodeTable};
use crate::config::CodecConfig;
use crate::decode::decode as decode_symbols;
use crate::error::Result;
use crate::frequency::{count_frequencies, FrequencyTable};
use crate::pack::{pack, PackedStream};
use crate::source::SourceText;
use crate::tree::build_tree;

/// Everything produced by encoding one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    /// Per-symbol counts.
    pub frequencies: FrequencyTable,
    /// Prefix code per symbol.
    pub codes: CodeTable,
    /// Packed bitstream.
    pub packed: PackedStream,
}

/// Wall-clock time spent in each encode stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageTimings {
    /// Frequency counting.
    pub count: Duration,
    /// Tree construction and code extraction.
    pub build: Duration,
    /// Bit packing.
    pub encode: Duration,
    /// Artifact writes (zero when nothing was written).
    pub write: Duration,
}

/// Summary of an encode run.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeReport {
    /// Symbols in the input.
    pub symbols: u64,
    /// Distinct symbols.
    pub distinct_symbols: usize,
    /// Significant bits in the packed stream.
    pub total_bits: u64,
    /// Packed bytes.
    pub packed_bytes: usize,
    /// UTF-8 size of the input.
    pub input_bytes: usize,
    /// Time per stage.
    pub timings: StageTimings,
}

impl EncodeReport {
    /// Mean code length in bits per symbol (0 for empty input).
    pub fn bits_per_symbol(&self) -> f64 {
        if self.symbols == 0 {
            0.0
        } else {
            self.total_bits as f64 / self.symbols as f64
        }
    }

    /// Packed size over input size (0 for empty input).
    pub fn compression_ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            self.packed_bytes as f64 / self.input_bytes as f64
        }
    }
}

/// Encode `source`.
///
/// Empty input yields empty tables and an empty packed stream without
/// building a tree.
pub fn encode(source: &SourceText) -> Result<Encoded> {
    encode_timed(source).map(|(encoded, _)| encoded)
}

fn encode_timed(source: &SourceText) -> Result<(Encoded, StageTimings)> {
    let mut timings = StageTimings::default();

    let start = Instant::now();
    let frequencies = count_frequencies(source.symbols());
    timings.count = start.elapsed();
    debug!(
        symbols = source.len(),
        distinct = frequencies.len(),
        elapsed = ?timings.count,
        "counted frequencies"
    );

    if frequencies.is_empty() {
        debug!("empty input, nothing to encode");
        return Ok((
            Encoded {
                frequencies,
                codes: CodeTable::default(),
                packed: PackedStream::default(),
            },
            timings,
        ));
    }

    let start = Instant::now();
    let root = build_tree(&frequencies)?;
    let codes = extract_codes(&root)?;
    timings.build = start.elapsed();
    debug!(
        depth = root.depth(),
        max_code_len = codes.max_code_len(),
        elapsed = ?timings.build,
        "built merge tree and codes"
    );

    let start = Instant::now();
    let packed = pack(source.symbols(), &codes)?;
    timings.encode = start.elapsed();
    debug!(bytes = packed.bytes().len(), elapsed = ?timings.encode, "encoded message");

    Ok((
        Encoded {
            frequencies,
            codes,
            packed,
        },
        timings,
    ))
}

/// Decode a packed stream into text.
pub fn decode(packed: &PackedStream, codes: &CodeTable) -> Result<String> {
    Ok(decode_symbols(packed, codes)?.into_iter().collect())
}

/// Read `config.input`, encode it, and write both artifacts.
pub fn encode_files(config: &CodecConfig) -> Result<EncodeReport> {
    let source = SourceText::from_path(&config.input)?;
    let (encoded, mut timings) = encode_timed(&source)?;

    let start = Instant::now();
    let packed = stage_packed(&config.packed_output, &encoded.packed)?;
    let table = stage_code_table(&config.code_table_output, &encoded.codes)?;
    packed.commit()?;
    table.commit()?;
    timings.write = start.elapsed();

    let report = EncodeReport {
        symbols: encoded.packed.symbol_count(),
        distinct_symbols: encoded.codes.len(),
        total_bits: encoded.packed.total_bits(),
        packed_bytes: encoded.packed.bytes().len(),
        input_bytes: source.symbols().iter().map(|c| c.len_utf8()).sum(),
        timings,
    };
    info!(
        input = %config.input.display(),
        symbols = report.symbols,
        distinct = report.distinct_symbols,
        bytes = report.packed_bytes,
        bits_per_symbol = report.bits_per_symbol(),
        write_elapsed = ?timings.write,
        "encoded document"
    );
    Ok(report)
}

/// Decode the artifacts written by [`encode_files`].
pub fn decode_files<P: AsRef<Path>, Q: AsRef<Path>>(packed_path: P, codes_path: Q) -> Result<String> {
    let packed = read_packed(packed_path)?;
    let codes = read_code_table(codes_path)?;
    decode(&packed, &codes)
}
