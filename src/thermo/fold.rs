//! Minimum-free-energy folding of a single DNA strand.
//!
//! A Zuker-style recursion over Watson–Crick pairs:
//!
//! - `V(i, j)`: best energy of the segment `i..=j` given that `i` pairs with `j`
//!   (hairpin, stack, bulge, internal loop or multiloop closed by `i·j`);
//! - `WM(i, j)`: best energy of `i..=j` as part of a multiloop;
//! - `W(j)`: best exterior-loop energy of the prefix of length `j`.
//!
//! Stacks come from SantaLucia & Hicks (2004) and are evaluated at the requested
//! temperature from ΔH/ΔS; loop initiation terms are treated as purely entropic
//! and scaled from 37 °C. No salt correction is applied (1 M Na+ reference).
use crate::config::Material;
use crate::data::loops::{
    ASYMMETRY_MAX, ASYMMETRY_PER_NT, BULGE, HAIRPIN, INTERIOR, MAX_INTERNAL_LOOP, MIN_HAIRPIN_LOOP,
    MULTILOOP_A, MULTILOOP_B, MULTILOOP_C,
};
use crate::data::nearest_neighbor::{NnTable, KELVIN, SANTALUCIA_2004, T37};
use crate::error::OracleError;
use crate::thermo::energy::{dg_at, is_weak, loop_dg, normalize, pairs, stack_index};
use crate::thermo::FoldingOracle;

/// Built-in folding oracle.
#[derive(Clone, Debug)]
pub struct ZukerFolder {
    table: &'static NnTable,
}

impl Default for ZukerFolder {
    fn default() -> Self {
        Self { table: &SANTALUCIA_2004 }
    }
}

impl ZukerFolder {
    /// MFE in kcal/mol of an uppercase ACGT strand at `celsius`.
    pub fn fold(&self, s: &[u8], celsius: f64) -> f64 {
        let n = s.len();
        if n < MIN_HAIRPIN_LOOP + 2 {
            return 0.0;
        }
        let kelvin = celsius + KELVIN;
        let scale = kelvin / T37;
        let tbl = self.table;
        let stack = |a: u8, b: u8| dg_at(tbl.stacks[stack_index(a, b)], kelvin);
        let at_penalty = dg_at(tbl.terminal_at, kelvin);
        let terminal = |i: usize| if is_weak(s[i]) { at_penalty } else { 0.0 };
        let can_pair = |i: usize, j: usize| j > i + MIN_HAIRPIN_LOOP && pairs(s[i], s[j]);
        let (ml_a, ml_b, ml_c) = (MULTILOOP_A * scale, MULTILOOP_B * scale, MULTILOOP_C * scale);

        let inf = f64::INFINITY;
        let mut v = vec![vec![inf; n]; n];
        let mut wm = vec![vec![inf; n]; n];

        for span in (MIN_HAIRPIN_LOOP + 1)..n {
            for i in 0..(n - span) {
                let j = i + span;
                if can_pair(i, j) {
                    let mut e = loop_dg(HAIRPIN, j - i - 1) * scale + terminal(i);

                    // stacks, bulges and internal loops closed by (i, j) around (p, q)
                    for p in (i + 1)..(j - MIN_HAIRPIN_LOOP - 1) {
                        let l1 = p - i - 1;
                        let mut q = j - 1;
                        while q > p + MIN_HAIRPIN_LOOP {
                            let l2 = j - q - 1;
                            if l1 + l2 > MAX_INTERNAL_LOOP {
                                break;
                            }
                            if v[p][q].is_finite() {
                                let g = if l1 == 0 && l2 == 0 {
                                    stack(s[i], s[p])
                                } else if l1 == 0 || l2 == 0 {
                                    let size = l1 + l2;
                                    let closing = if size == 1 { stack(s[i], s[p]) } else { terminal(i) + terminal(p) };
                                    loop_dg(BULGE, size) * scale + closing
                                } else {
                                    let asym = (ASYMMETRY_PER_NT * l1.abs_diff(l2) as f64).min(ASYMMETRY_MAX);
                                    (loop_dg(INTERIOR, l1 + l2) + asym) * scale + terminal(i) + terminal(p)
                                };
                                e = e.min(v[p][q] + g);
                            }
                            q -= 1;
                        }
                    }

                    for k in (i + 2)..(j - 1) {
                        e = e.min(wm[i + 1][k] + wm[k + 1][j - 1] + ml_a + ml_c + terminal(i));
                    }
                    v[i][j] = e;
                }

                let mut m = inf;
                if v[i][j].is_finite() {
                    m = v[i][j] + ml_c + terminal(i);
                }
                m = m.min(wm[i + 1][j] + ml_b).min(wm[i][j - 1] + ml_b);
                for k in (i + 1)..j {
                    m = m.min(wm[i][k] + wm[k + 1][j]);
                }
                wm[i][j] = m;
            }
        }

        let mut w = vec![0.0_f64; n + 1];
        for j in 1..=n {
            let mut best = w[j - 1];
            for i in 0..j {
                if v[i][j - 1].is_finite() {
                    best = best.min(w[i] + v[i][j - 1] + terminal(i));
                }
            }
            w[j] = best;
        }
        w[n]
    }
}

impl FoldingOracle for ZukerFolder {
    fn minimum_free_energy(&self, seq: &[u8], material: Material, celsius: f64) -> Result<f64, OracleError> {
        match material {
            Material::Dna => {
                let s = normalize(seq)?;
                Ok(self.fold(&s, celsius))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mfe(s: &[u8]) -> f64 {
        ZukerFolder::default().minimum_free_energy(s, Material::Dna, 37.0).unwrap()
    }

    #[test]
    fn unstructured_strands_fold_to_zero() {
        assert_eq!(mfe(&[b'A'; 30]), 0.0);
        assert_eq!(mfe(b"ACGT"), 0.0);
        assert_eq!(mfe(b""), 0.0);
        assert_eq!(mfe(b"CGTTCCAAAGATGTGGGCATGAGCTTAC"), 0.0);
    }

    #[test]
    fn stem_loops_are_negative() {
        assert!((mfe(b"GCGCGCTTTTGCGCGC") - -7.525).abs() < 0.01);
        assert!((mfe(b"GGGGGGAAAACCCCCC") - -5.640).abs() < 0.01);
        assert!((mfe(b"ACGTACGTACGTACGTACGTACGT") - -9.219).abs() < 0.01);
    }

    #[test]
    fn never_positive() {
        let cases: [&[u8]; 3] = [b"TTATTAAATAATTTAAATTATTATTTAATA", b"GAATTCCAGTTACGATAATACGTAATCCAG", b"ATATATATATAT"];
        for s in cases {
            assert!(mfe(s) <= 0.0);
        }
    }

    #[test]
    fn heat_destabilises() {
        let f = ZukerFolder::default();
        let cold = f.minimum_free_energy(b"GCGCGCTTTTGCGCGC", Material::Dna, 25.0).unwrap();
        let warm = f.minimum_free_energy(b"GCGCGCTTTTGCGCGC", Material::Dna, 60.0).unwrap();
        assert!(cold < warm);
    }

    #[test]
    fn lowercase_folds_like_uppercase() {
        assert_eq!(mfe(b"gcgcgcttttgcgcgc"), mfe(b"GCGCGCTTTTGCGCGC"));
        assert!(ZukerFolder::default().minimum_free_energy(b"GCGCNN", Material::Dna, 37.0).is_err());
    }
}
