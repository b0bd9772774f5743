//! Error types for loading, evaluating and reporting primers.
//!
//! Two layers:
//! - [`OracleError`]: a single thermodynamic/folding computation failed for one
//!   candidate string. Oracles return it; they never know about files or records.
//! - [`PrimerError`]: everything the library surfaces to callers. A failed oracle
//!   call becomes [`PrimerError::PropertyComputation`] with the record and offset
//!   attached.
//!
//! The CLI wraps these in `anyhow` for top-level reporting.
use std::path::PathBuf;

use thiserror::Error;

/// Failure of one oracle call on one candidate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OracleError {
    /// The candidate contains a byte outside `ACGTacgt`.
    #[error("invalid nucleotide '{base}' at position {position}")]
    InvalidBase { base: char, position: usize },
    /// The candidate is too short for a nearest-neighbour model.
    #[error("sequence of {len} nt is too short (need at least {min})")]
    TooShort { len: usize, min: usize },
    /// The per-candidate deadline elapsed after the named oracle returned.
    #[error("{oracle} exceeded the {limit_ms} ms per-candidate deadline")]
    Timeout { oracle: &'static str, limit_ms: u64 },
    /// The oracle produced NaN or infinity.
    #[error("{oracle} returned a non-finite value")]
    NonFinite { oracle: &'static str },
    /// Free-form failure reported by an external oracle implementation.
    #[error("{0}")]
    Failed(String),
}

/// Errors surfaced by the library.
#[derive(Debug, Error)]
pub enum PrimerError {
    /// The input path does not exist.
    #[error("{} not found", path.display())]
    NotFound { path: PathBuf },

    /// The input exists but is not parseable FASTA.
    #[error("malformed FASTA in {}: {reason}", path.display())]
    FileFormat { path: PathBuf, reason: String },

    /// An oracle failed for one candidate (fatal only under the `abort` policy).
    #[error("property computation failed for record {record} offset {start} ({sequence}): {source}")]
    PropertyComputation {
        record: String,
        start: usize,
        sequence: String,
        #[source]
        source: OracleError,
    },

    /// The design configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A configuration file could not be read.
    #[error("cannot read configuration {}: {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file is not valid JSON for [`crate::config::DesignConfig`].
    #[error("cannot parse configuration {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("table rendering failed: {0}")]
    Table(#[from] polars::prelude::PolarsError),
}

/// Crate-wide result alias.
pub type Result<T, E = PrimerError> = std::result::Result<T, E>;
