//! Property evaluation and the acceptance predicate.
//!
//! For each candidate the [`Evaluator`] asks the oracles for Tm, hairpin Tm and
//! homodimer Tm, computes GC% locally, and applies [`AcceptanceBounds::check`].
//! Only candidates that pass are folded for ΔG: the folding energy is not part
//! of the predicate, so skipping it for rejected windows does not change the
//! result.
//!
//! Failing a bound is a normal outcome ([`Evaluation::Rejected`]); an oracle
//! failure is an error ([`OracleError`]) and is handled by the pipeline's
//! error policy.
use std::fmt;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::config::{AcceptanceBounds, DesignConfig, Material};
use crate::error::OracleError;
use crate::thermo::tm::gc_percent;
use crate::thermo::Oracles;
use crate::window::Candidate;

/// The four properties the acceptance predicate looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimerProperties {
    pub tm: f64,
    pub gc_percent: f64,
    pub hairpin_tm: f64,
    pub homodimer_tm: f64,
}

/// The first bound a candidate failed, in predicate order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Rejection {
    Tm,
    Gc,
    Hairpin,
    Homodimer,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Rejection::Tm => "tm",
            Rejection::Gc => "gc",
            Rejection::Hairpin => "hairpin",
            Rejection::Homodimer => "homodimer",
        };
        f.write_str(s)
    }
}

impl AcceptanceBounds {
    /// `tm_min <= Tm <= tm_max`, `gc_min <= GC% <= gc_max`,
    /// hairpin Tm `< hairpin_tm_max`, homodimer Tm `< homodimer_tm_max`.
    pub fn check(&self, p: &PrimerProperties) -> Result<(), Rejection> {
        if !(self.tm_min <= p.tm && p.tm <= self.tm_max) {
            return Err(Rejection::Tm);
        }
        if !(self.gc_min <= p.gc_percent && p.gc_percent <= self.gc_max) {
            return Err(Rejection::Gc);
        }
        if !(p.hairpin_tm < self.hairpin_tm_max) {
            return Err(Rejection::Hairpin);
        }
        if !(p.homodimer_tm < self.homodimer_tm_max) {
            return Err(Rejection::Homodimer);
        }
        Ok(())
    }
}

/// An accepted primer with its properties and where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluatedPrimer {
    /// 0-based index of the input record, in file order.
    pub record_index: usize,
    pub record_id: String,
    /// 0-based offset of the window in its record.
    pub start: usize,
    pub sequence: String,
    /// Melting temperature, °C.
    pub tm: f64,
    pub gc_percent: f64,
    /// Hairpin Tm, °C.
    pub hairpin_tm: f64,
    /// Homodimer Tm, °C.
    pub homodimer_tm: f64,
    /// Folding free energy, kcal/mol.
    pub delta_g: f64,
}

/// Outcome of evaluating one candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    Accepted(EvaluatedPrimer),
    Rejected(Rejection),
}

/// Post-call deadline: compared against the clock after each oracle returns.
struct Deadline {
    started: Instant,
    limit: Option<Duration>,
}

impl Deadline {
    fn start(limit: Option<Duration>) -> Self {
        Self { started: Instant::now(), limit }
    }

    fn check(&self, oracle: &'static str) -> Result<(), OracleError> {
        match self.limit {
            Some(limit) if self.started.elapsed() > limit => Err(OracleError::Timeout {
                oracle,
                limit_ms: limit.as_millis() as u64,
            }),
            _ => Ok(()),
        }
    }
}

fn finite(value: Result<f64, OracleError>, oracle: &'static str) -> Result<f64, OracleError> {
    let v = value?;
    if v.is_finite() { Ok(v) } else { Err(OracleError::NonFinite { oracle }) }
}

/// Evaluates candidates against one configuration and oracle set.
pub struct Evaluator<'a> {
    oracles: &'a Oracles,
    bounds: &'a AcceptanceBounds,
    material: Material,
    temperature_c: f64,
    timeout: Option<Duration>,
}

impl<'a> Evaluator<'a> {
    pub fn new(oracles: &'a Oracles, config: &'a DesignConfig) -> Self {
        Self {
            oracles,
            bounds: &config.bounds,
            material: config.material,
            temperature_c: config.temperature_c,
            timeout: config.oracle_timeout_ms.map(Duration::from_millis),
        }
    }

    fn predicate_properties(&self, seq: &[u8], deadline: &Deadline) -> Result<PrimerProperties, OracleError> {
        let tm = finite(self.oracles.tm.melting_temperature(seq), "melting temperature")?;
        deadline.check("melting temperature")?;
        let gc = gc_percent(seq);
        let hairpin_tm = finite(self.oracles.hairpin.hairpin_tm(seq), "hairpin")?;
        deadline.check("hairpin")?;
        let homodimer_tm = finite(self.oracles.dimer.homodimer_tm(seq), "homodimer")?;
        deadline.check("homodimer")?;
        Ok(PrimerProperties { tm, gc_percent: gc, hairpin_tm, homodimer_tm })
    }

    /// Tm, GC%, hairpin Tm and homodimer Tm of a raw sequence.
    pub fn properties(&self, seq: &[u8]) -> Result<PrimerProperties, OracleError> {
        self.predicate_properties(seq, &Deadline::start(self.timeout))
    }

    /// Evaluate one window of record `record_index`.
    pub fn evaluate(&self, record_index: usize, record_id: &str, cand: &Candidate<'_>) -> Result<Evaluation, OracleError> {
        let deadline = Deadline::start(self.timeout);
        let props = self.predicate_properties(cand.seq, &deadline)?;
        if let Err(why) = self.bounds.check(&props) {
            return Ok(Evaluation::Rejected(why));
        }
        let delta_g = finite(
            self.oracles.folding.minimum_free_energy(cand.seq, self.material, self.temperature_c),
            "folding",
        )?;
        deadline.check("folding")?;
        Ok(Evaluation::Accepted(EvaluatedPrimer {
            record_index,
            record_id: record_id.to_string(),
            start: cand.start,
            sequence: cand.to_text(),
            tm: props.tm,
            gc_percent: props.gc_percent,
            hairpin_tm: props.hairpin_tm,
            homodimer_tm: props.homodimer_tm,
            delta_g,
        }))
    }
}
