#![forbid(unsafe_code)]
//! # rpaprime
//!
//! Primer selection for **Recombinase Polymerase Amplification** (RPA) from
//! genomic FASTA input. Every fixed-length window of every record is scored for
//! melting temperature, GC content, hairpin and homodimer stability, filtered by
//! an acceptance predicate, and the most stable folders (lowest ΔG) are kept per
//! record.
//!
//! ## Highlights
//! - 🧬 **Exhaustive**: every window of length `L` (default 30) is a candidate.
//! - 🌡️ **Built-in thermodynamics**: nearest-neighbour Tm, hairpin/homodimer Tm
//!   and minimum-free-energy folding, all behind replaceable oracle traits.
//! - ⚙️ **Explicit configuration**: every default lives in [`DesignConfig`] and
//!   can be loaded from JSON.
//! - 🧵 **Deterministic parallelism**: candidates are evaluated on a rayon pool,
//!   the report is identical for any thread count.
//!
//! ## Pipeline
//! | stage | module |
//! |---|---|
//! | FASTA loading | [`seqio`] |
//! | sliding windows | [`window`] |
//! | oracles | [`thermo`] |
//! | acceptance predicate | [`evaluate`] |
//! | ΔG ranking, top-N | [`rank`] |
//! | driver, report | [`pipeline`] |
//! | text/CSV/JSON/table | [`output`] |
//!
//! ## Examples
//! ```rust
//! use rpaprime::{design_records, DesignConfig, FastaRecord, Oracles};
//! let cfg = DesignConfig { threads: Some(1), ..DesignConfig::default() };
//! let records = [FastaRecord::new("amplicon", "ACGTTAGCATGCATTGCAACGTTAGCATGCATTGCAACGT")];
//! let report = design_records(&records, &cfg, &Oracles::builtin(&cfg)).unwrap();
//! assert_eq!(report.records[0].candidates, 11);
//! // every selected primer passed the acceptance bounds
//! for p in &report.primers {
//!     assert!(p.tm >= cfg.bounds.tm_min && p.tm <= cfg.bounds.tm_max);
//! }
//! ```
//!
//! ## Version
//! See [`VERSION`].

pub mod config;
pub mod error;
pub mod evaluate;
pub mod output;
pub mod pipeline;
pub mod rank;
pub mod seqio;
pub mod thermo;
pub mod window;
pub mod data { pub mod loops; pub mod nearest_neighbor; }

#[cfg(test)]
mod testing;

use std::path::Path;

pub use config::{AcceptanceBounds, DesignConfig, ErrorPolicy, Material, Preset};
pub use error::{OracleError, PrimerError, Result};
pub use evaluate::{EvaluatedPrimer, Rejection};
pub use pipeline::{design_primers, design_records, DesignReport};
pub use seqio::FastaRecord;
pub use thermo::Oracles;

/// Crate version string (from `CARGO_PKG_VERSION`).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Design RPA primers for a FASTA file with the default configuration and the
/// built-in oracles, returning only the result set.
///
/// # Examples
/// ```
/// let err = rpaprime::design_rpa_primers("does/not/exist.fasta").unwrap_err();
/// assert!(matches!(err, rpaprime::PrimerError::NotFound { .. }));
/// ```
pub fn design_rpa_primers<P: AsRef<Path>>(path: P) -> Result<Vec<EvaluatedPrimer>> {
    let cfg = DesignConfig::default();
    let report = design_primers(path, &cfg, &Oracles::builtin(&cfg))?;
    Ok(report.primers)
}
