//! On-disk artifacts: the packed data file and the code table file.
//!
//! Packed data file layout:
//!
//! ```text
//! magic         4 bytes    "HUFP"
//! version       1 byte     1
//! valid_bits    1 byte     meaningful bits in the last byte (0 only when empty)
//! symbol_count  8 bytes    u64, little-endian
//! byte_len      8 bytes    u64, little-endian
//! bytes         byte_len   packed data
//! ```
//!
//! The code table is UTF-8 text with one `<symbol>:<bits>` line per symbol in
//! ascending symbol order. Backslash, newline, carriage return and tab are
//! escaped as `\\`, `\n`, `\r`, `\t`. A line is split at its last `:`, so a
//! literal `:` symbol needs no escape.
//!
//! Both writers go through a temporary file in the destination directory that
//! is persisted over the destination only after every byte is written and synced.
//! Callers producing several artifacts stage each one first and commit them
//! together, so a failed write leaves no artifact behind.

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::codes::{Code, CodeTable};
use crate::error::{Error, Result};
use crate::pack::PackedStream;

const MAGIC: &[u8; 4] = b"HUFP";
const VERSION: u8 = 1;

/// Serialize `packed` into `writer`.
pub fn encode_packed<W: Write>(writer: &mut W, packed: &PackedStream) -> io::Result<()> {
    writer.write_all(MAGIC)?;
    writer.write_all(&[VERSION, packed.valid_bits_in_last_byte()])?;
    writer.write_all(&packed.symbol_count().to_le_bytes())?;
    writer.write_all(&(packed.bytes().len() as u64).to_le_bytes())?;
    writer.write_all(packed.bytes())?;
    Ok(())
}

/// Read a packed stream from `reader`, which must hold exactly one stream.
///
/// # Errors
/// Returns `Error::Decode` on a bad header, a truncated body, or trailing bytes.
pub fn decode_packed<R: Read>(reader: &mut R) -> Result<PackedStream> {
    let mut magic = [0u8; 4];
    read_header_field(reader, &mut magic, "magic")?;
    if &magic != MAGIC {
        return Err(Error::Decode(format!("bad magic {magic:02x?}")));
    }

    let mut version_and_bits = [0u8; 2];
    read_header_field(reader, &mut version_and_bits, "version")?;
    let [version, valid_bits] = version_and_bits;
    if version != VERSION {
        return Err(Error::Decode(format!("unsupported version {version}")));
    }

    let mut word = [0u8; 8];
    read_header_field(reader, &mut word, "symbol count")?;
    let symbol_count = u64::from_le_bytes(word);
    read_header_field(reader, &mut word, "byte length")?;
    let byte_len = u64::from_le_bytes(word);

    let mut bytes = Vec::new();
    reader.by_ref().take(byte_len).read_to_end(&mut bytes)?;
    if bytes.len() as u64 != byte_len {
        return Err(Error::Decode(format!(
            "truncated body: expected {byte_len} bytes, found {}",
            bytes.len()
        )));
    }
    let mut extra = [0u8; 1];
    if reader.read(&mut extra)? != 0 {
        return Err(Error::Decode("trailing bytes after packed data".into()));
    }

    PackedStream::from_parts(bytes, valid_bits, symbol_count)
}

fn read_header_field<R: Read>(reader: &mut R, buf: &mut [u8], field: &str) -> Result<()> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => Error::Decode(format!("truncated header at {field}")),
        _ => Error::Io(e),
    })
}

/// Write the packed data file atomically.
pub fn write_packed<P: AsRef<Path>>(path: P, packed: &PackedStream) -> Result<()> {
    stage_packed(path.as_ref(), packed)?.commit()
}

/// Write the packed data next to `path` without replacing it yet.
pub(crate) fn stage_packed(path: &Path, packed: &PackedStream) -> Result<Staged> {
    let staged = Staged::write(path, |w| encode_packed(w, packed))?;
    debug!(
        path = %path.display(),
        bytes = packed.bytes().len(),
        symbols = packed.symbol_count(),
        "staged packed data"
    );
    Ok(staged)
}

/// Read a packed data file.
pub fn read_packed<P: AsRef<Path>>(path: P) -> Result<PackedStream> {
    let mut reader = BufReader::new(File::open(path)?);
    decode_packed(&mut reader)
}

/// Render `codes` in the code table text format.
pub fn format_code_table(codes: &CodeTable) -> String {
    let mut out = String::new();
    for (symbol, code) in codes.iter() {
        escape_symbol(symbol, &mut out);
        out.push(':');
        out.push_str(&code.to_string());
        out.push('\n');
    }
    out
}

/// Parse the code table text format.
///
/// # Errors
/// Returns `Error::Decode` naming the 1-based line of a malformed entry, and
/// `Error::InvalidTree` if the entries are not a valid prefix code.
pub fn parse_code_table(text: &str) -> Result<CodeTable> {
    let mut entries = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let lineno = idx + 1;
        if line.is_empty() {
            continue;
        }
        let (symbol, bits) = line
            .rsplit_once(':')
            .ok_or_else(|| Error::Decode(format!("line {lineno}: missing ':'")))?;
        let symbol = unescape_symbol(symbol)
            .map_err(|msg| Error::Decode(format!("line {lineno}: {msg}")))?;
        let code: Code = bits.parse().map_err(|e| match e {
            Error::Decode(msg) => Error::Decode(format!("line {lineno}: {msg}")),
            other => other,
        })?;
        entries.push((symbol, code));
    }
    CodeTable::from_entries(entries)
}

/// Write the code table file atomically.
pub fn write_code_table<P: AsRef<Path>>(path: P, codes: &CodeTable) -> Result<()> {
    stage_code_table(path.as_ref(), codes)?.commit()
}

/// Write the code table next to `path` without replacing it yet.
pub(crate) fn stage_code_table(path: &Path, codes: &CodeTable) -> Result<Staged> {
    let text = format_code_table(codes);
    let staged = Staged::write(path, |w| w.write_all(text.as_bytes()))?;
    debug!(path = %path.display(), entries = codes.len(), "staged code table");
    Ok(staged)
}

/// Read a code table file.
pub fn read_code_table<P: AsRef<Path>>(path: P) -> Result<CodeTable> {
    let text = std::fs::read_to_string(path)?;
    parse_code_table(&text)
}

/// A fully written and synced temporary file waiting to replace its destination.
///
/// Dropping it without calling [`Staged::commit`] removes the temporary file.
#[derive(Debug)]
pub(crate) struct Staged {
    tmp: NamedTempFile,
    dest: PathBuf,
}

impl Staged {
    fn write<F>(dest: &Path, write: F) -> Result<Self>
    where
        F: FnOnce(&mut io::BufWriter<&mut NamedTempFile>) -> io::Result<()>,
    {
        let dir = match dest.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = io::BufWriter::new(&mut tmp);
            write(&mut writer)?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        Ok(Self {
            tmp,
            dest: dest.to_path_buf(),
        })
    }

    /// Rename the temporary file over the destination.
    pub(crate) fn commit(self) -> Result<()> {
        self.tmp.persist(&self.dest).map_err(|e| Error::Io(e.error))?;
        debug!(path = %self.dest.display(), "committed artifact");
        Ok(())
    }
}

fn escape_symbol(symbol: char, out: &mut String) {
    match symbol {
        '\\' => out.push_str("\\\\"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        c => out.push(c),
    }
}

fn unescape_symbol(field: &str) -> std::result::Result<char, String> {
    let mut chars = field.chars();
    let symbol = match (chars.next(), chars.next()) {
        (Some('\\'), Some(esc)) => match esc {
            '\\' => '\\',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            other => return Err(format!("unknown escape \\{other}")),
        },
        (Some('\\'), None) => return Err("dangling backslash".into()),
        (Some(c), None) => return Ok(c),
        (Some(_), Some(_)) => return Err(format!("{field:?} is not a single symbol")),
        (None, _) => return Err("missing symbol".into()),
    };
    match chars.next() {
        None => Ok(symbol),
        Some(_) => Err(format!("{field:?} is not a single symbol")),
    }
}
