//! Primer melting temperature and GC content.
//!
//! [`NearestNeighborTm`] reproduces the two-state nearest-neighbour model with
//! Biopython `Tm_NN` defaults: Allawi & SantaLucia (1997) stacks, terminal
//! A·T / G·C initiation, non-self-complementary strands at 25 nM each and the
//! entropy salt correction `0.368·(N−1)·ln[Na+]`.
use crate::config::TmConditions;
use crate::data::nearest_neighbor::{NnTable, ALLAWI_1997, KELVIN, R};
use crate::error::OracleError;
use crate::thermo::energy::{is_weak, normalize, stack_index};
use crate::thermo::MeltingTemperatureOracle;

/// Two-state duplex Tm oracle.
#[derive(Clone, Debug)]
pub struct NearestNeighborTm {
    conditions: TmConditions,
    table: &'static NnTable,
}

impl NearestNeighborTm {
    pub fn new(conditions: TmConditions) -> Self {
        Self { conditions, table: &ALLAWI_1997 }
    }

    /// Use a different stack table (e.g. [`crate::data::nearest_neighbor::SANTALUCIA_2004`]).
    pub fn with_table(mut self, table: &'static NnTable) -> Self {
        self.table = table;
        self
    }
}

impl Default for NearestNeighborTm {
    fn default() -> Self {
        Self::new(TmConditions::default())
    }
}

impl MeltingTemperatureOracle for NearestNeighborTm {
    fn melting_temperature(&self, seq: &[u8]) -> Result<f64, OracleError> {
        let s = normalize(seq)?;
        let n = s.len();
        if n < 2 {
            return Err(OracleError::TooShort { len: n, min: 2 });
        }
        let tbl = self.table;
        let mut dh = tbl.init.dh;
        let mut ds = tbl.init.ds;
        for end in [s[0], s[n - 1]] {
            let term = if is_weak(end) { tbl.terminal_at } else { tbl.terminal_gc };
            dh += term.dh;
            ds += term.ds;
        }
        for w in s.windows(2) {
            let st = tbl.stacks[stack_index(w[0], w[1])];
            dh += st.dh;
            ds += st.ds;
        }
        let c = &self.conditions;
        ds += 0.368 * (n - 1) as f64 * (c.na_mm / 1000.0).ln();
        let k = (c.dnac1_nm - c.dnac2_nm / 2.0) * 1e-9;
        Ok(1000.0 * dh / (ds + R * k.ln()) - KELVIN)
    }
}

/// GC content in percent, case-insensitive.
///
/// `S` counts as G/C and `W` as A/T; other letters are left out of the
/// denominator. Returns 0.0 when nothing countable is present.
///
/// ```
/// assert_eq!(rpaprime::thermo::tm::gc_percent(b"ATGCATTGCA"), 40.0);
/// assert_eq!(rpaprime::thermo::tm::gc_percent(b"ggcc"), 100.0);
/// ```
pub fn gc_percent(seq: &[u8]) -> f64 {
    let mut gc = 0usize;
    let mut total = 0usize;
    for b in seq.iter().map(|b| b.to_ascii_uppercase()) {
        match b {
            b'G' | b'C' | b'S' => {
                gc += 1;
                total += 1;
            }
            b'A' | b'T' | b'W' => total += 1,
            _ => {}
        }
    }
    if total == 0 { 0.0 } else { 100.0 * gc as f64 / total as f64 }
}
