//! Rendering of a result set.
//!
//! | format | shape |
//! |---|---|
//! | `text` | `Primer: <seq>, Tm: <x.xx>, GC: <x.xx>%, ΔG: <x.xx>`, one line per primer |
//! | `csv` | header + one row per primer, provenance columns first |
//! | `json` | pretty-printed array of primer objects |
//! | `table` | polars `DataFrame` pretty print |
//!
//! ```
//! use rpaprime::evaluate::EvaluatedPrimer;
//! use rpaprime::output::{write_primers, OutputFormat};
//! let p = EvaluatedPrimer {
//!     record_index: 0, record_id: "chr1".into(), start: 12,
//!     sequence: "ATGCATTGCAATGCATTGCAATGCATTGCA".into(),
//!     tm: 39.456, gc_percent: 40.0, hairpin_tm: 0.0, homodimer_tm: 0.0, delta_g: -1.5,
//! };
//! let mut out = Vec::new();
//! write_primers(&mut out, &[p], OutputFormat::Text).unwrap();
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     "Primer: ATGCATTGCAATGCATTGCAATGCATTGCA, Tm: 39.46, GC: 40.00%, ΔG: -1.50\n"
//! );
//! ```
use std::fmt;
use std::io::Write;

use polars::prelude::{DataFrame, PolarsResult};

use crate::error::Result;
use crate::evaluate::EvaluatedPrimer;
use crate::pipeline::DesignReport;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OutputFormat {
    #[default]
    Text,
    Csv,
    Json,
    Table,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutputFormat::Text => "text",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Table => "table",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "table" => Ok(Self::Table),
            other => Err(format!("Unknown output format: {} (expected text, csv, json or table)", other)),
        }
    }
}

/// The classic one-line rendering of a primer.
pub fn primer_line(p: &EvaluatedPrimer) -> String {
    format!("Primer: {}, Tm: {:.2}, GC: {:.2}%, ΔG: {:.2}", p.sequence, p.tm, p.gc_percent, p.delta_g)
}

/// Build a `DataFrame` with one row per primer.
pub fn primers_frame(primers: &[EvaluatedPrimer]) -> PolarsResult<DataFrame> {
    polars::df!(
        "record"       => primers.iter().map(|p| p.record_id.clone()).collect::<Vec<_>>(),
        "start"        => primers.iter().map(|p| p.start as u64).collect::<Vec<_>>(),
        "sequence"     => primers.iter().map(|p| p.sequence.clone()).collect::<Vec<_>>(),
        "tm"           => primers.iter().map(|p| p.tm).collect::<Vec<_>>(),
        "gc_percent"   => primers.iter().map(|p| p.gc_percent).collect::<Vec<_>>(),
        "hairpin_tm"   => primers.iter().map(|p| p.hairpin_tm).collect::<Vec<_>>(),
        "homodimer_tm" => primers.iter().map(|p| p.homodimer_tm).collect::<Vec<_>>(),
        "delta_g"      => primers.iter().map(|p| p.delta_g).collect::<Vec<_>>(),
    )
}

/// Write `primers` to `w` in the requested format.
pub fn write_primers<W: Write>(mut w: W, primers: &[EvaluatedPrimer], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for p in primers {
                writeln!(w, "{}", primer_line(p))?;
            }
        }
        OutputFormat::Csv => {
            let mut wtr = ::csv::Writer::from_writer(&mut w);
            for p in primers {
                wtr.serialize(p)?;
            }
            wtr.flush()?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut w, primers)?;
            writeln!(w)?;
        }
        OutputFormat::Table => {
            let df = primers_frame(primers)?;
            writeln!(w, "{}", df)?;
        }
    }
    w.flush()?;
    Ok(())
}

/// Per-record counts followed by every skipped candidate.
pub fn write_summary<W: Write>(mut w: W, report: &DesignReport) -> std::io::Result<()> {
    for r in &report.records {
        writeln!(
            w,
            "{}\tlength={}\tcandidates={}\taccepted={}\tselected={}\trejected(tm={},gc={},hairpin={},homodimer={})\tfailed={}",
            r.id,
            r.length,
            r.candidates,
            r.accepted,
            r.selected,
            r.rejected.tm,
            r.rejected.gc,
            r.rejected.hairpin,
            r.rejected.homodimer,
            r.failed
        )?;
    }
    for f in &report.failures {
        writeln!(w, "skipped {}:{} {}: {}", f.record_id, f.start, f.sequence, f.reason)?;
    }
    Ok(())
}
