//! FASTA input for the primer pipeline.
//!
//! ### Design
//! - Plain FASTA is parsed with `bio::io::fasta`; gzip, bzip2, xz and zstd
//!   input is recognised by its magic bytes and decoded by `needletail`.
//! - Sequences are kept **verbatim**: no case folding, no alphabet checks. Bad
//!   bases surface later, per candidate, as oracle errors.
//! - Records come back in file order. A header with no sequence lines is an
//!   empty record wherever it sits, and blank lines before the first header
//!   are ignored.
//!
//! ### Errors
//! - path missing: [`PrimerError::NotFound`]
//! - content not FASTA (no `>` header, FASTQ, broken compressed stream): [`PrimerError::FileFormat`]
//! - empty (or whitespace-only) file: zero records, not an error
//!
//! ### Example
//! ```no_run
//! let records = rpaprime::seqio::read_fasta("genome.fasta").unwrap();
//! for r in &records { println!("{} {} nt", r.id, r.seq.len()); }
//! ```
use std::io::Cursor;
use std::path::Path;

use bio::io::fasta;
use needletail::errors::ParseErrorKind;
use needletail::parse_fastx_reader;

use crate::error::{PrimerError, Result};

/// Leading bytes of the compressed containers needletail can decode.
const COMPRESSED_MAGIC: [&[u8]; 4] = [b"\x1f\x8b", b"BZh", b"\xfd7zXZ\x00", b"\x28\xb5\x2f\xfd"];

/// One FASTA record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    /// Header text after `>` up to the first whitespace.
    pub id: String,
    /// Sequence bytes with line breaks removed, case preserved.
    pub seq: Vec<u8>,
}

impl FastaRecord {
    pub fn new(id: impl Into<String>, seq: impl Into<Vec<u8>>) -> Self {
        Self { id: id.into(), seq: seq.into() }
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
}

fn is_compressed(bytes: &[u8]) -> bool {
    COMPRESSED_MAGIC.iter().any(|m| bytes.starts_with(m))
}

fn header_id(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    text.split_whitespace().next().unwrap_or("").to_string()
}

/// Read every record of a FASTA file, preserving order.
pub fn read_fasta<P: AsRef<Path>>(path: P) -> Result<Vec<FastaRecord>> {
    let p = path.as_ref();
    if !p.exists() {
        return Err(PrimerError::NotFound { path: p.to_path_buf() });
    }
    let bytes = std::fs::read(p)?;
    if is_compressed(&bytes) {
        read_compressed(p, bytes)
    } else {
        read_plain(p, &bytes)
    }
}

fn format_err(p: &Path, reason: String) -> PrimerError {
    PrimerError::FileFormat { path: p.to_path_buf(), reason }
}

fn read_plain(p: &Path, bytes: &[u8]) -> Result<Vec<FastaRecord>> {
    let first = bytes.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(bytes.len());
    let reader = fasta::Reader::new(&bytes[first..]);
    let mut records = Vec::new();
    for record in reader.records() {
        let rec = record.map_err(|e| format_err(p, e.to_string()))?;
        records.push(FastaRecord::new(rec.id(), rec.seq()));
    }
    Ok(records)
}

fn read_compressed(p: &Path, bytes: Vec<u8>) -> Result<Vec<FastaRecord>> {
    let mut reader = match parse_fastx_reader(Cursor::new(bytes)) {
        Ok(r) => r,
        Err(e) if matches!(e.kind, ParseErrorKind::EmptyFile) => return Ok(Vec::new()),
        Err(e) if matches!(e.kind, ParseErrorKind::Io) => {
            return Err(PrimerError::Io(std::io::Error::other(e.to_string())))
        }
        Err(e) => return Err(format_err(p, e.to_string())),
    };

    let mut records = Vec::new();
    while let Some(record) = reader.next() {
        let rec = record.map_err(|e| format_err(p, e.to_string()))?;
        if rec.qual().is_some() {
            return Err(format_err(p, "FASTQ record found; expected FASTA".to_string()));
        }
        records.push(FastaRecord { id: header_id(rec.id()), seq: rec.seq().to_vec() });
    }
    Ok(records)
}
