//! Ranking of accepted primers.
//!
//! Primers are ordered by ascending ΔG (most negative first). The sort is
//! stable, so primers with equal ΔG keep the order they were evaluated in,
//! i.e. ascending window offset.
use std::cmp::Ordering;

use crate::evaluate::EvaluatedPrimer;

/// Order by ΔG and keep at most `n`.
pub fn select_top(mut primers: Vec<EvaluatedPrimer>, n: usize) -> Vec<EvaluatedPrimer> {
    primers.sort_by(by_delta_g);
    primers.truncate(n);
    primers
}

fn by_delta_g(a: &EvaluatedPrimer, b: &EvaluatedPrimer) -> Ordering {
    a.delta_g.total_cmp(&b.delta_g)
}
