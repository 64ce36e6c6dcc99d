//! Bit packing of code sequences.
//!
//! Codes are concatenated in input order and packed most-significant-bit
//! first. The final byte is padded with zeros on its low end, and the number
//! of meaningful bits in it is recorded so that padding is never mistaken for
//! data.

use tracing::debug;

use crate::codes::CodeTable;
use crate::error::{Error, Result};

/// Packed code bits plus what is needed to read them back exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackedStream {
    bytes: Vec<u8>,
    /// 1..=8 when `bytes` is non-empty, 0 otherwise.
    valid_bits_in_last_byte: u8,
    symbol_count: u64,
}

impl PackedStream {
    /// Reassemble a stream, e.g. after reading it from disk.
    ///
    /// # Errors
    /// Returns `Error::Decode` if `valid_bits_in_last_byte` is outside 1..=8 for
    /// a non-empty stream, or non-zero for an empty one, or if `symbol_count`
    /// is zero for a non-empty stream or exceeds the significant bit count.
    pub fn from_parts(bytes: Vec<u8>, valid_bits_in_last_byte: u8, symbol_count: u64) -> Result<Self> {
        if bytes.is_empty() {
            if valid_bits_in_last_byte != 0 || symbol_count != 0 {
                return Err(Error::Decode(format!(
                    "empty stream with {valid_bits_in_last_byte} valid bits and {symbol_count} symbols"
                )));
            }
        } else if !(1..=8).contains(&valid_bits_in_last_byte) {
            return Err(Error::Decode(format!(
                "valid bits in last byte must be 1..=8, got {valid_bits_in_last_byte}"
            )));
        } else if symbol_count == 0 {
            return Err(Error::Decode("non-empty stream with zero symbols".into()));
        }
        let stream = Self {
            bytes,
            valid_bits_in_last_byte,
            symbol_count,
        };
        // Every code is at least one bit long.
        if stream.symbol_count > stream.total_bits() {
            return Err(Error::Decode(format!(
                "{} symbols cannot fit in {} significant bits",
                stream.symbol_count,
                stream.total_bits()
            )));
        }
        Ok(stream)
    }

    /// Packed bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Meaningful bits in the last byte (0 for an empty stream).
    pub fn valid_bits_in_last_byte(&self) -> u8 {
        self.valid_bits_in_last_byte
    }

    /// Number of symbols encoded.
    pub fn symbol_count(&self) -> u64 {
        self.symbol_count
    }

    /// Number of significant bits.
    pub fn total_bits(&self) -> u64 {
        match self.bytes.len() {
            0 => 0,
            n => (n as u64 - 1) * 8 + self.valid_bits_in_last_byte as u64,
        }
    }

    /// Zero bits appended to complete the last byte.
    pub fn padding_bits(&self) -> u8 {
        if self.bytes.is_empty() {
            0
        } else {
            8 - self.valid_bits_in_last_byte
        }
    }

    /// True if nothing was encoded.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Significant bit at `index` (MSB-first within each byte).
    pub(crate) fn bit(&self, index: u64) -> u8 {
        let byte = self.bytes[(index / 8) as usize];
        (byte >> (7 - (index % 8))) & 1
    }
}

/// MSB-first bit accumulator.
#[derive(Debug, Default)]
struct BitWriter {
    out: Vec<u8>,
    acc: u8,
    filled: u8,
    total_bits: u64,
}

impl BitWriter {
    fn push_bit(&mut self, bit: u8) {
        self.acc = (self.acc << 1) | (bit & 1);
        self.filled += 1;
        self.total_bits += 1;
        if self.filled == 8 {
            self.out.push(self.acc);
            self.acc = 0;
            self.filled = 0;
        }
    }

    /// Flush any partial byte and return `(bytes, valid bits in last byte, total bits)`.
    fn finish(mut self) -> (Vec<u8>, u8, u64) {
        let valid = match (self.filled, self.out.is_empty()) {
            (0, true) => 0,
            (0, false) => 8,
            (n, _) => {
                self.out.push(self.acc << (8 - n));
                n
            }
        };
        (self.out, valid, self.total_bits)
    }
}

/// Encode `symbols` with `codes` into a packed stream.
///
/// # Errors
/// Returns `Error::UnknownSymbol` if a symbol has no code, and
/// `Error::PackingOverflow` if the emitted byte count is not `ceil(bits / 8)`.
pub fn pack(symbols: &[char], codes: &CodeTable) -> Result<PackedStream> {
    let mut writer = BitWriter {
        out: Vec::with_capacity(symbols.len() / 2),
        ..BitWriter::default()
    };

    for (position, &symbol) in symbols.iter().enumerate() {
        let code = codes
            .get(symbol)
            .ok_or(Error::UnknownSymbol { symbol, position })?;
        for &bit in code.bits() {
            writer.push_bit(bit);
        }
    }

    let (bytes, valid_bits_in_last_byte, total_bits) = writer.finish();
    let expected_bytes = total_bits.div_ceil(8) as usize;
    if bytes.len() != expected_bytes {
        return Err(Error::PackingOverflow {
            expected_bytes,
            actual_bytes: bytes.len(),
        });
    }

    debug!(
        symbols = symbols.len(),
        bits = total_bits,
        bytes = bytes.len(),
        valid_bits_in_last_byte,
        "packed symbols"
    );

    Ok(PackedStream {
        bytes,
        valid_bits_in_last_byte,
        symbol_count: symbols.len() as u64,
    })
}
