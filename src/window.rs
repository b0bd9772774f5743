//! Sliding-window candidate generation.
//!
//! Every contiguous substring of length `L` is a candidate; adjacent candidates
//! overlap by `L - 1` bases. Unsuitable windows are left for the evaluator to
//! reject.
//!
//! ```
//! use rpaprime::window::candidates;
//! let c: Vec<_> = candidates(b"ACGTAC", 4).collect();
//! assert_eq!(c.len(), 3);
//! assert_eq!(c[2].start, 2);
//! assert_eq!(c[2].seq, b"GTAC");
//! ```

/// One candidate primer: a borrowed window of a record plus its offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<'a> {
    /// 0-based start offset within the record.
    pub start: usize,
    pub seq: &'a [u8],
}

impl Candidate<'_> {
    /// Lossy UTF-8 rendering of the window (input bytes are kept verbatim).
    pub fn to_text(&self) -> String {
        String::from_utf8_lossy(self.seq).into_owned()
    }
}

/// Number of windows of length `window_len` in a sequence of length `n`.
#[inline]
pub fn candidate_count(n: usize, window_len: usize) -> usize {
    if window_len == 0 || n < window_len { 0 } else { n - window_len + 1 }
}

/// Iterate all windows of `window_len` in ascending start order.
///
/// Yields nothing if the sequence is shorter than the window or `window_len` is 0.
pub fn candidates(seq: &[u8], window_len: usize) -> impl Iterator<Item = Candidate<'_>> + '_ {
    // `windows(0)` panics, so a zero length degrades to an empty chunk list.
    let size = window_len.max(1);
    let take = candidate_count(seq.len(), window_len);
    seq.windows(size)
        .take(take)
        .enumerate()
        .map(|(start, seq)| Candidate { start, seq })
}
