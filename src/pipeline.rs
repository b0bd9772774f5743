//! End-to-end primer design: load, window, evaluate, rank, concatenate.
//!
//! ### Design
//! - Records are processed one after another, in file order. Within a record,
//!   candidates are evaluated on a local rayon pool in chunks; results are
//!   collected back in start order, so any thread count gives the same report.
//! - Bound rejections are normal outcomes and only counted. Oracle failures
//!   follow [`ErrorPolicy`]: `skip` records them in [`DesignReport::failures`],
//!   `abort` returns the first one (lowest record, then lowest offset).
//! - Ranking is per record; the result set is the concatenation of each
//!   record's top-N.
//!
//! ```no_run
//! use rpaprime::config::DesignConfig;
//! use rpaprime::pipeline::design_primers;
//! use rpaprime::thermo::Oracles;
//!
//! let cfg = DesignConfig::default();
//! let report = design_primers("genome.fasta", &cfg, &Oracles::builtin(&cfg)).unwrap();
//! for p in &report.primers {
//!     println!("{} {:.2}", p.sequence, p.delta_g);
//! }
//! ```
use std::path::Path;

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::Serialize;

use crate::config::{DesignConfig, ErrorPolicy};
use crate::error::{OracleError, PrimerError, Result};
use crate::evaluate::{EvaluatedPrimer, Evaluation, Evaluator, Rejection};
use crate::rank::select_top;
use crate::seqio::{read_fasta, FastaRecord};
use crate::thermo::Oracles;
use crate::window::{candidate_count, Candidate};

/// Candidates evaluated per parallel batch.
const CHUNK: usize = 1 << 16;

/// Rejected candidates per failed bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RejectionCounts {
    pub tm: usize,
    pub gc: usize,
    pub hairpin: usize,
    pub homodimer: usize,
}

impl RejectionCounts {
    fn add(&mut self, why: Rejection) {
        match why {
            Rejection::Tm => self.tm += 1,
            Rejection::Gc => self.gc += 1,
            Rejection::Hairpin => self.hairpin += 1,
            Rejection::Homodimer => self.homodimer += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.tm + self.gc + self.hairpin + self.homodimer
    }
}

/// What happened to one input record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordSummary {
    pub index: usize,
    pub id: String,
    pub length: usize,
    pub candidates: usize,
    /// Candidates that passed every bound.
    pub accepted: usize,
    /// Primers kept after ranking (at most `top_n`).
    pub selected: usize,
    pub rejected: RejectionCounts,
    /// Candidates skipped because an oracle failed.
    pub failed: usize,
}

/// A candidate skipped under [`ErrorPolicy::Skip`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateFailure {
    pub record_index: usize,
    pub record_id: String,
    pub start: usize,
    pub sequence: String,
    pub reason: String,
}

/// Result set plus bookkeeping for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DesignReport {
    /// Selected primers, per-record blocks in file order, each block by ascending ΔG.
    pub primers: Vec<EvaluatedPrimer>,
    pub records: Vec<RecordSummary>,
    pub failures: Vec<CandidateFailure>,
}

impl DesignReport {
    pub fn total_candidates(&self) -> usize {
        self.records.iter().map(|r| r.candidates).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.primers.is_empty()
    }
}

/// Read `path` and design primers for every record.
///
/// A missing file returns [`PrimerError::NotFound`] before any oracle is called.
pub fn design_primers<P: AsRef<Path>>(path: P, config: &DesignConfig, oracles: &Oracles) -> Result<DesignReport> {
    config.validate()?;
    let records = read_fasta(path)?;
    design_records(&records, config, oracles)
}

/// Design primers for records that are already in memory.
pub fn design_records(records: &[FastaRecord], config: &DesignConfig, oracles: &Oracles) -> Result<DesignReport> {
    config.validate()?;
    let pool = ThreadPoolBuilder::new().num_threads(config.effective_threads()).build()?;
    let evaluator = Evaluator::new(oracles, config);
    let window_len = config.window_len;

    let mut report = DesignReport::default();
    for (index, record) in records.iter().enumerate() {
        let count = candidate_count(record.len(), window_len);
        let mut summary = RecordSummary {
            index,
            id: record.id.clone(),
            length: record.len(),
            candidates: count,
            accepted: 0,
            selected: 0,
            rejected: RejectionCounts::default(),
            failed: 0,
        };
        let mut accepted = Vec::new();

        let mut chunk_start = 0;
        while chunk_start < count {
            let chunk_end = (chunk_start + CHUNK).min(count);
            let outcomes: Vec<std::result::Result<Evaluation, OracleError>> = pool.install(|| {
                (chunk_start..chunk_end)
                    .into_par_iter()
                    .map(|start| {
                        let cand = Candidate { start, seq: &record.seq[start..start + window_len] };
                        evaluator.evaluate(index, &record.id, &cand)
                    })
                    .collect()
            });

            for (start, outcome) in (chunk_start..chunk_end).zip(outcomes) {
                match outcome {
                    Ok(Evaluation::Accepted(p)) => accepted.push(p),
                    Ok(Evaluation::Rejected(why)) => summary.rejected.add(why),
                    Err(source) => {
                        let sequence = String::from_utf8_lossy(&record.seq[start..start + window_len]).into_owned();
                        match config.on_error {
                            ErrorPolicy::Abort => {
                                return Err(PrimerError::PropertyComputation {
                                    record: record.id.clone(),
                                    start,
                                    sequence,
                                    source,
                                })
                            }
                            ErrorPolicy::Skip => {
                                summary.failed += 1;
                                report.failures.push(CandidateFailure {
                                    record_index: index,
                                    record_id: record.id.clone(),
                                    start,
                                    sequence,
                                    reason: source.to_string(),
                                });
                            }
                        }
                    }
                }
            }
            chunk_start = chunk_end;
        }

        summary.accepted = accepted.len();
        let top = select_top(accepted, config.top_n);
        summary.selected = top.len();
        report.primers.extend(top);
        report.records.push(summary);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FixtureOracle;
    use std::io::Write;
    use std::time::Duration;

    // every 30-nt window is 40% GC
    const REPEAT40: &[u8] = b"ATGCATTGCAATGCATTGCAATGCATTGCAATGCATTGCA";
    const MIXED40: &[u8] = b"ACGTTAGCATGCATTGCAACGTTAGCATGCATTGCAACGT";

    fn win(seq: &[u8], start: usize) -> &[u8] {
        &seq[start..start + 30]
    }

    fn sequential() -> DesignConfig {
        DesignConfig { threads: Some(1), ..DesignConfig::default() }
    }

    fn wide_gc() -> DesignConfig {
        let mut c = sequential();
        c.bounds.gc_min = 0.0;
        c.bounds.gc_max = 100.0;
        c
    }

    #[test]
    fn forty_nt_record_yields_eleven_candidates_and_two_primers() {
        let fixture = FixtureOracle::rejecting()
            .accept(win(REPEAT40, 2), 38.0, -3.0)
            .accept(win(REPEAT40, 5), 41.0, -4.0);
        let records = [FastaRecord::new("seq1", REPEAT40)];
        let report = design_records(&records, &sequential(), &fixture.oracles()).unwrap();

        assert_eq!(report.records[0].candidates, 11);
        assert_eq!(report.primers.len(), 2);
        assert_eq!(report.primers[0].start, 5);
        assert_eq!(report.primers[1].start, 2);
        assert_eq!(report.primers[0].delta_g, -4.0);
        assert_eq!(report.records[0].rejected.tm, 9);
        assert_eq!(fixture.fold_calls(), 2);
        assert_eq!(fixture.tm_calls(), 11);
    }

    #[test]
    fn every_bound_excludes_on_its_own() {
        let cases = [
            (36.9, 0.0, 0.0, "tm"),
            (42.1, 0.0, 0.0, "tm"),
            (40.0, 35.0, 0.0, "hairpin"),
            (40.0, 0.0, 35.0, "homodimer"),
        ];
        for (tm, hp, dimer, bound) in cases {
            let fixture = FixtureOracle::rejecting().with_props(win(REPEAT40, 0), tm, hp, dimer, -1.0);
            let records = [FastaRecord::new("r", REPEAT40)];
            let report = design_records(&records, &sequential(), &fixture.oracles()).unwrap();
            assert!(report.primers.is_empty(), "{bound} bound let a primer through");
        }

        let fixture = FixtureOracle::rejecting().with_props(win(REPEAT40, 0), 40.0, 34.99, 34.99, -1.0);
        let records = [FastaRecord::new("r", REPEAT40)];
        let report = design_records(&records, &sequential(), &fixture.oracles()).unwrap();
        assert_eq!(report.primers.len(), 2, "offsets 0 and 10 are the same string");

        let mut narrow = sequential();
        narrow.bounds.gc_max = 39.0;
        let report = design_records(&records, &narrow, &fixture.oracles()).unwrap();
        assert!(report.primers.is_empty());
        assert_eq!(report.records[0].rejected.gc, 2);
    }

    #[test]
    fn selection_is_capped_and_ordered_by_delta_g() {
        let dgs = [-1.0, -5.0, -2.0, -7.0, -0.5, -3.0, -6.0, -4.0, -8.0, -2.5, -9.0];
        let fixture = dgs
            .iter()
            .enumerate()
            .fold(FixtureOracle::rejecting(), |f, (i, &g)| f.accept(win(MIXED40, i), 40.0, g));
        let records = [FastaRecord::new("r", MIXED40)];
        let report = design_records(&records, &wide_gc(), &fixture.oracles()).unwrap();

        let starts: Vec<_> = report.primers.iter().map(|p| p.start).collect();
        assert_eq!(starts, [10, 8, 3, 6, 1]);
        assert_eq!(report.records[0].accepted, 11);
        assert_eq!(report.records[0].selected, 5);
        for p in &report.primers {
            assert_eq!(p.sequence.as_bytes(), win(MIXED40, p.start));
        }
    }

    #[test]
    fn records_are_never_cross_ranked() {
        let fixture = FixtureOracle::rejecting()
            .accept(win(MIXED40, 3), 40.0, -1.0)
            .accept(win(REPEAT40, 4), 40.0, -9.0);
        let records = [FastaRecord::new("a", MIXED40), FastaRecord::new("b", REPEAT40)];
        let report = design_records(&records, &wide_gc(), &fixture.oracles()).unwrap();
        let origin: Vec<_> = report.primers.iter().map(|p| (p.record_id.as_str(), p.start)).collect();
        assert_eq!(origin, [("a", 3), ("b", 4)]);
        assert_eq!(report.primers[1].record_index, 1);
    }

    #[test]
    fn missing_file_calls_no_oracle() {
        let fixture = FixtureOracle::rejecting();
        let err = design_primers("/no/such/genome.fasta", &sequential(), &fixture.oracles()).unwrap_err();
        assert!(matches!(err, PrimerError::NotFound { .. }));
        assert_eq!(fixture.total_calls(), 0);
    }

    #[test]
    fn no_passing_candidates_gives_an_empty_result() {
        let mut f = tempfile::Builder::new().suffix(".fasta").tempfile().unwrap();
        writeln!(f, ">one\n{}\n>two\n{}", String::from_utf8_lossy(REPEAT40), String::from_utf8_lossy(MIXED40)).unwrap();
        f.flush().unwrap();
        let fixture = FixtureOracle::rejecting();
        let report = design_primers(f.path(), &sequential(), &fixture.oracles()).unwrap();
        assert!(report.is_empty());
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.total_candidates(), 22);
        assert!(report.failures.is_empty());
    }

    #[test]
    fn short_and_empty_records_have_no_candidates() {
        let records = [FastaRecord::new("short", b"ACGT".as_slice()), FastaRecord::new("empty", Vec::<u8>::new())];
        let fixture = FixtureOracle::rejecting();
        let report = design_records(&records, &sequential(), &fixture.oracles()).unwrap();
        assert_eq!(report.total_candidates(), 0);
        assert_eq!(fixture.total_calls(), 0);
    }

    #[test]
    fn skip_records_failures_and_keeps_going() {
        let fixture = FixtureOracle::rejecting()
            .fail_on(win(MIXED40, 3))
            .accept(win(MIXED40, 7), 40.0, -2.0);
        let records = [FastaRecord::new("r", MIXED40)];
        let report = design_records(&records, &wide_gc(), &fixture.oracles()).unwrap();
        assert_eq!(report.primers.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].start, 3);
        assert!(report.failures[0].reason.contains("fixture refuses"));
        assert_eq!(report.records[0].failed, 1);
        assert_eq!(report.records[0].rejected.total(), 9);
    }

    #[test]
    fn abort_stops_at_the_first_failure() {
        let fixture = FixtureOracle::rejecting()
            .fail_on(win(MIXED40, 6))
            .fail_on(win(MIXED40, 3));
        let records = [FastaRecord::new("r", MIXED40)];
        let cfg = DesignConfig { on_error: ErrorPolicy::Abort, ..wide_gc() };
        match design_records(&records, &cfg, &fixture.oracles()) {
            Err(PrimerError::PropertyComputation { record, start, sequence, .. }) => {
                assert_eq!(record, "r");
                assert_eq!(start, 3);
                assert_eq!(sequence.as_bytes(), win(MIXED40, 3));
            }
            other => panic!("expected abort, got {:?}", other),
        }
    }

    #[test]
    fn deadline_turns_slow_candidates_into_failures() {
        let fixture = FixtureOracle::rejecting().with_delay(Duration::from_millis(5));
        let records = [FastaRecord::new("r", MIXED40)];
        let cfg = DesignConfig { oracle_timeout_ms: Some(1), ..sequential() };
        let report = design_records(&records, &cfg, &fixture.oracles()).unwrap();
        assert_eq!(report.failures.len(), 11);
        assert!(report.failures.iter().all(|f| f.reason.contains("deadline")));
    }

    #[test]
    fn builtin_oracles_reject_ambiguous_bases_per_candidate() {
        let mut seq = MIXED40.to_vec();
        seq[35] = b'N';
        let records = [FastaRecord::new("n", seq)];
        let cfg = sequential();
        let report = design_records(&records, &cfg, &Oracles::builtin(&cfg)).unwrap();
        // windows 6..=10 cover offset 35
        let failed: Vec<_> = report.failures.iter().map(|f| f.start).collect();
        assert_eq!(failed, [6, 7, 8, 9, 10]);
        assert_eq!(report.records[0].rejected.total() + report.records[0].accepted, 6);
    }

    #[test]
    fn thread_count_does_not_change_the_report() {
        let dgs = [-1.0, -5.0, -2.0, -7.0, -0.5, -3.0, -6.0, -4.0, -8.0, -2.5, -9.0];
        let fixture = dgs
            .iter()
            .enumerate()
            .fold(FixtureOracle::rejecting().fail_on(win(MIXED40, 4)), |f, (i, &g)| {
                f.accept(win(MIXED40, i), 40.0, g)
            });
        let records = [FastaRecord::new("x", MIXED40), FastaRecord::new("y", REPEAT40)];
        let one = design_records(&records, &wide_gc(), &fixture.oracles()).unwrap();
        let many = design_records(&records, &DesignConfig { threads: Some(4), ..wide_gc() }, &fixture.oracles()).unwrap();
        assert_eq!(one, many);
    }

    #[test]
    fn invalid_config_is_refused_up_front() {
        let fixture = FixtureOracle::rejecting();
        let cfg = DesignConfig { window_len: 0, ..DesignConfig::default() };
        assert!(matches!(
            design_records(&[FastaRecord::new("r", MIXED40)], &cfg, &fixture.oracles()),
            Err(PrimerError::Config(_))
        ));
        assert_eq!(fixture.total_calls(), 0);
    }
}
