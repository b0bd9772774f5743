//! Shared helpers for the built-in nearest-neighbour models.
use bio::alphabets::dna;

use crate::config::StructureConditions;
use crate::data::loops::JACOBSON_STOCKMAYER;
use crate::data::nearest_neighbor::{Thermo, R, T37};
use crate::error::OracleError;

/// Validate against `ACGTacgt` and return an uppercase copy.
pub fn normalize(seq: &[u8]) -> Result<Vec<u8>, OracleError> {
    let alphabet = dna::alphabet();
    if let Some(position) = seq.iter().position(|&b| !alphabet.is_word([b])) {
        return Err(OracleError::InvalidBase { base: seq[position] as char, position });
    }
    Ok(seq.to_ascii_uppercase())
}

#[inline]
fn base_index(b: u8) -> usize {
    match b {
        b'A' => 0,
        b'C' => 1,
        b'G' => 2,
        _ => 3,
    }
}

/// Index of the 5'→3' dinucleotide `ab` in a stack table. Expects uppercase ACGT.
#[inline]
pub fn stack_index(a: u8, b: u8) -> usize {
    4 * base_index(a) + base_index(b)
}

/// Watson–Crick complementarity of two uppercase bases.
#[inline]
pub fn pairs(a: u8, b: u8) -> bool {
    dna::complement(a) == b
}

/// A or T: the pair it forms carries the terminal A·T penalty.
#[inline]
pub fn is_weak(b: u8) -> bool {
    b == b'A' || b == b'T'
}

/// ΔG at `kelvin` from enthalpy/entropy.
#[inline]
pub fn dg_at(th: Thermo, kelvin: f64) -> f64 {
    th.dh - kelvin * th.ds / 1000.0
}

/// Loop initiation ΔG°37 for a loop of `n` nt.
///
/// Exact table hits are returned as-is; other sizes extrapolate from the nearest
/// smaller tabulated size (or the smallest entry) with Jacobson–Stockmayer.
pub fn loop_dg(table: &[(usize, f64)], n: usize) -> f64 {
    let mut reference = table[0];
    for &(size, dg) in table {
        if size == n {
            return dg;
        }
        if size < n {
            reference = (size, dg);
        }
    }
    let (size, dg) = reference;
    dg + JACOBSON_STOCKMAYER * R * T37 * (n as f64 / size as f64).ln() / 1000.0
}

/// Entropy salt correction per nearest-neighbour stack, cal/(K·mol).
///
/// Divalent cations not bound by dNTPs are folded into a sodium equivalent.
pub fn salt_entropy_per_stack(c: &StructureConditions) -> f64 {
    let free_mg = (c.dv_mm - c.dntp_mm).max(0.0);
    let na_equivalent = c.mv_mm + 120.0 * free_mg.sqrt();
    0.368 * (na_equivalent / 1000.0).ln()
}
