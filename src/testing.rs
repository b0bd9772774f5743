//! Table-driven oracles for unit tests.
//!
//! Unknown sequences report Tm 0 °C, so they fail the default bounds; known
//! ones return exactly what was registered. Every call is counted.
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Material;
use crate::error::OracleError;
use crate::thermo::{DimerOracle, FoldingOracle, HairpinOracle, MeltingTemperatureOracle, Oracles};

#[derive(Clone, Copy, Debug)]
struct Entry {
    tm: f64,
    hairpin: f64,
    dimer: f64,
    dg: f64,
}

#[derive(Default, Debug)]
struct Calls {
    tm: AtomicUsize,
    hairpin: AtomicUsize,
    dimer: AtomicUsize,
    fold: AtomicUsize,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct FixtureOracle {
    entries: HashMap<Vec<u8>, Entry>,
    failing: HashSet<Vec<u8>>,
    delay: Option<Duration>,
    calls: Arc<Calls>,
}

impl FixtureOracle {
    pub(crate) fn rejecting() -> Self {
        Self::default()
    }

    /// Register a structure-free candidate with the given Tm and ΔG.
    pub(crate) fn accept(self, seq: &[u8], tm: f64, dg: f64) -> Self {
        self.with_props(seq, tm, 0.0, 0.0, dg)
    }

    pub(crate) fn with_props(mut self, seq: &[u8], tm: f64, hairpin: f64, dimer: f64, dg: f64) -> Self {
        self.entries.insert(seq.to_vec(), Entry { tm, hairpin, dimer, dg });
        self
    }

    /// Make the Tm oracle fail for `seq`.
    pub(crate) fn fail_on(mut self, seq: &[u8]) -> Self {
        self.failing.insert(seq.to_vec());
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn oracles(&self) -> Oracles {
        let shared = Arc::new(self.clone());
        Oracles::new(shared.clone(), shared.clone(), shared.clone(), shared)
    }

    pub(crate) fn tm_calls(&self) -> usize {
        self.calls.tm.load(Ordering::SeqCst)
    }

    pub(crate) fn fold_calls(&self) -> usize {
        self.calls.fold.load(Ordering::SeqCst)
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.tm_calls()
            + self.calls.hairpin.load(Ordering::SeqCst)
            + self.calls.dimer.load(Ordering::SeqCst)
            + self.fold_calls()
    }

    fn lookup(&self, seq: &[u8]) -> Option<Entry> {
        if let Some(d) = self.delay {
            std::thread::sleep(d);
        }
        self.entries.get(seq).copied()
    }
}

impl MeltingTemperatureOracle for FixtureOracle {
    fn melting_temperature(&self, seq: &[u8]) -> Result<f64, OracleError> {
        self.calls.tm.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(seq) {
            return Err(OracleError::Failed(format!("fixture refuses {}", String::from_utf8_lossy(seq))));
        }
        Ok(self.lookup(seq).map_or(0.0, |e| e.tm))
    }
}

impl HairpinOracle for FixtureOracle {
    fn hairpin_tm(&self, seq: &[u8]) -> Result<f64, OracleError> {
        self.calls.hairpin.fetch_add(1, Ordering::SeqCst);
        Ok(self.lookup(seq).map_or(0.0, |e| e.hairpin))
    }
}

impl DimerOracle for FixtureOracle {
    fn homodimer_tm(&self, seq: &[u8]) -> Result<f64, OracleError> {
        self.calls.dimer.fetch_add(1, Ordering::SeqCst);
        Ok(self.lookup(seq).map_or(0.0, |e| e.dimer))
    }
}

impl FoldingOracle for FixtureOracle {
    fn minimum_free_energy(&self, seq: &[u8], _material: Material, _celsius: f64) -> Result<f64, OracleError> {
        self.calls.fold.fetch_add(1, Ordering::SeqCst);
        Ok(self.lookup(seq).map_or(0.0, |e| e.dg))
    }
}
