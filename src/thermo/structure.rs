//! Hairpin and self-dimer melting temperatures.
//!
//! [`ThermoAligner`] scans every antiparallel register of a strand against
//! itself (for dimers) or against its own downstream part (for hairpins) and
//! scores contiguous Watson–Crick stems with SantaLucia & Hicks (2004) stacks,
//! terminal A·T penalties and a salt-corrected entropy. Conditions default to
//! 50 mM monovalent, 1.5 mM Mg2+, 0.6 mM dNTP and 50 nM oligo.
//!
//! - A **hairpin** is a stem of at least two pairs closing a loop of at least
//!   three bases; its Tm is unimolecular, `ΔH / ΔS`.
//! - A **homodimer** is an ungapped duplex of at least two consecutive pairs
//!   between two copies of the strand; its Tm uses the self-complementary
//!   two-state expression `ΔH / (ΔS + R·ln C)`.
//!
//! The reported Tm is that of the structure melting highest. Strands with no
//! structure above 0 °C report 0.0.
use crate::config::StructureConditions;
use crate::data::loops::{HAIRPIN, MIN_HAIRPIN_LOOP};
use crate::data::nearest_neighbor::{NnTable, KELVIN, R, SANTALUCIA_2004, T37};
use crate::error::OracleError;
use crate::thermo::energy::{is_weak, loop_dg, normalize, pairs, salt_entropy_per_stack, stack_index};
use crate::thermo::{DimerOracle, HairpinOracle};

/// Stem scorer shared by the hairpin and homodimer oracles.
#[derive(Clone, Debug)]
pub struct ThermoAligner {
    conditions: StructureConditions,
    table: &'static NnTable,
}

impl Default for ThermoAligner {
    fn default() -> Self {
        Self::new(StructureConditions::default())
    }
}

impl ThermoAligner {
    pub fn new(conditions: StructureConditions) -> Self {
        Self { conditions, table: &SANTALUCIA_2004 }
    }

    /// ΔH (kcal/mol) and ΔS (cal/K/mol) of the stem `s[outer..=inner]` paired
    /// along one antiparallel register, without initiation or loop terms.
    fn stem(&self, s: &[u8], outer: usize, inner: usize) -> (f64, f64) {
        let tbl = self.table;
        let mut dh = 0.0;
        let mut ds = 0.0;
        for i in outer..inner {
            let st = tbl.stacks[stack_index(s[i], s[i + 1])];
            dh += st.dh;
            ds += st.ds;
        }
        for end in [s[outer], s[inner]] {
            if is_weak(end) {
                dh += tbl.terminal_at.dh;
                ds += tbl.terminal_at.ds;
            }
        }
        ds += salt_entropy_per_stack(&self.conditions) * (inner - outer) as f64;
        (dh, ds)
    }

    fn dimer_tm(&self, s: &[u8], outer: usize, inner: usize) -> f64 {
        let (dh, ds) = self.stem(s, outer, inner);
        let dh = dh + self.table.init.dh;
        let ds = ds + self.table.init.ds;
        let conc = self.conditions.dna_nm * 1e-9;
        1000.0 * dh / (ds + R * conc.ln()) - KELVIN
    }

    fn hairpin_tm_of(&self, s: &[u8], outer: usize, inner: usize, loop_len: usize) -> f64 {
        let (dh, ds) = self.stem(s, outer, inner);
        let ds = ds - loop_dg(HAIRPIN, loop_len) * 1000.0 / T37;
        1000.0 * dh / ds - KELVIN
    }

    /// Highest dimer Tm over all registers, `None` if nothing melts above 0 °C.
    pub fn best_homodimer(&self, s: &[u8]) -> Option<f64> {
        let n = s.len();
        if n < 2 {
            return None;
        }
        let mut best: Option<f64> = None;
        // register d pairs s[i] with s[d - i] of the second copy
        for d in 0..(2 * n - 1) {
            let lo = d.saturating_sub(n - 1);
            let hi = d.min(n - 1);
            let mut run_start: Option<usize> = None;
            for i in lo..=hi + 1 {
                let paired = i <= hi && pairs(s[i], s[d - i]);
                match (paired, run_start) {
                    (true, None) => run_start = Some(i),
                    (false, Some(a)) => {
                        if i - 1 > a {
                            keep_highest(&mut best, self.dimer_tm(s, a, i - 1));
                        }
                        run_start = None;
                    }
                    _ => {}
                }
            }
        }
        best
    }

    /// Highest hairpin Tm over all stems and loops, `None` if none melts above 0 °C.
    pub fn best_hairpin(&self, s: &[u8]) -> Option<f64> {
        let n = s.len();
        if n < MIN_HAIRPIN_LOOP + 4 {
            return None;
        }
        let mut best: Option<f64> = None;
        // pairs (i, d - i) with i < d - i lie on the same register
        for d in 0..(2 * n - 1) {
            let lo = d.saturating_sub(n - 1);
            let mut run: Option<(usize, usize)> = None;
            let mut i = lo;
            loop {
                let inside = 2 * i < d;
                let paired = inside && {
                    let j = d - i;
                    j - i > MIN_HAIRPIN_LOOP && pairs(s[i], s[j])
                };
                if paired {
                    run = Some(run.map_or((i, i), |(a, _)| (a, i)));
                } else if let Some((a, b)) = run.take() {
                    self.hairpin_stems(s, d, a, b, &mut best);
                }
                if !inside {
                    break;
                }
                i += 1;
            }
        }
        best
    }

    /// Every sub-stem of the run `a..=b` on register `d`.
    fn hairpin_stems(&self, s: &[u8], d: usize, a: usize, b: usize, best: &mut Option<f64>) {
        for outer in a..=b {
            for inner in (outer + 1)..=b {
                let loop_len = (d - inner) - inner - 1;
                keep_highest(best, self.hairpin_tm_of(s, outer, inner, loop_len));
            }
        }
    }
}

fn keep_highest(best: &mut Option<f64>, tm: f64) {
    if tm > 0.0 && best.map_or(true, |b| tm > b) {
        *best = Some(tm);
    }
}

impl HairpinOracle for ThermoAligner {
    fn hairpin_tm(&self, seq: &[u8]) -> Result<f64, OracleError> {
        let s = normalize(seq)?;
        Ok(self.best_hairpin(&s).unwrap_or(0.0))
    }
}

impl DimerOracle for ThermoAligner {
    fn homodimer_tm(&self, seq: &[u8]) -> Result<f64, OracleError> {
        let s = normalize(seq)?;
        Ok(self.best_homodimer(&s).unwrap_or(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn homopolymer_has_no_structure() {
        let t = ThermoAligner::default();
        let poly_a = [b'A'; 30];
        assert_eq!(t.hairpin_tm(&poly_a).unwrap(), 0.0);
        assert_eq!(t.homodimer_tm(&poly_a).unwrap(), 0.0);
    }

    #[test]
    fn designed_hairpin_melts_high() {
        let t = ThermoAligner::default();
        let tm = t.hairpin_tm(b"GCGCGCTTTTGCGCGC").unwrap();
        assert!(close(tm, 82.654), "hairpin tm = {tm}");
        let tm = t.hairpin_tm(b"GGGGGGAAAACCCCCC").unwrap();
        assert!(close(tm, 77.379), "hairpin tm = {tm}");
    }

    #[test]
    fn palindromic_repeat_dimerises() {
        let t = ThermoAligner::default();
        let tm = t.homodimer_tm(b"ACGTACGTACGTACGTACGTACGT").unwrap();
        assert!(close(tm, 64.953), "dimer tm = {tm}");
        let tm = t.homodimer_tm(b"acgtacgtacgtacgtacgtacgt").unwrap();
        assert!(close(tm, 64.953));
    }

    #[test]
    fn weak_structures_stay_low() {
        let t = ThermoAligner::default();
        let hp = t.hairpin_tm(b"CGTTCCAAAGATGTGGGCATGAGCTTAC").unwrap();
        assert!(close(hp, 13.261), "hairpin tm = {hp}");
        assert_eq!(t.homodimer_tm(b"CGTTCCAAAGATGTGGGCATGAGCTTAC").unwrap(), 0.0);
    }

    #[test]
    fn short_strands_do_not_panic() {
        let t = ThermoAligner::default();
        let cases: [&[u8]; 4] = [b"", b"A", b"AT", b"ACGT"];
        for s in cases {
            assert_eq!(t.hairpin_tm(s).unwrap(), 0.0);
        }
        assert_eq!(t.homodimer_tm(b"").unwrap(), 0.0);
        assert_eq!(t.homodimer_tm(b"A").unwrap(), 0.0);
    }

    #[test]
    fn invalid_bases_are_errors() {
        let t = ThermoAligner::default();
        assert!(t.hairpin_tm(b"ACGTNACGT").is_err());
        assert!(t.homodimer_tm(b"ACGTNACGT").is_err());
    }
}
