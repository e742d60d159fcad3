//! Content similarity measurement.
//!
//! The node matcher weighs candidates by a pluggable 0..1 similarity over the
//! elements' serialized content. The default, [`QGramSimilarity`], normalizes
//! the Q-gram distance (Ukkonen92) by the number of grams on both sides.

use rustc_hash::FxHashMap;

/// A textual similarity function.
///
/// Implementations must be pure: the same inputs always give the same score,
/// which keeps comparisons deterministic.
pub trait ContentSimilarity: Send + Sync {
    /// Returns a score in `0.0..=1.0`, where 1.0 means identical.
    fn similarity(&self, a: &str, b: &str) -> f64;
}

impl<F> ContentSimilarity for F
where
    F: Fn(&str, &str) -> f64 + Send + Sync,
{
    fn similarity(&self, a: &str, b: &str) -> f64 {
        self(a, b)
    }
}

/// Q-gram based similarity.
#[derive(Debug, Clone, Copy, Default)]
pub struct QGramSimilarity;

impl ContentSimilarity for QGramSimilarity {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let total = a.len() + b.len();
        if total == 0 {
            return 1.0;
        }
        let dist = q_gram_distance(&a, &b);
        (1.0 - dist as f64 / total as f64).clamp(0.0, 1.0)
    }
}

/// Determines Q-gram size based on combined length (thesis equation 6.1).
/// Returns q=1 for very short strings, q=2 for medium, q=4 for long.
fn decide_q(combined_len: usize) -> usize {
    if combined_len < 5 {
        1
    } else if combined_len < 50 {
        2
    } else {
        4
    }
}

/// Counts the Q-grams of a sequence, including the shorter grams at its tail.
fn build_q_grams(s: &[char], q: usize) -> FxHashMap<&[char], usize> {
    let mut grams = FxHashMap::with_capacity_and_hasher(s.len(), Default::default());
    for i in 0..s.len() {
        let end = (i + q).min(s.len());
        *grams.entry(&s[i..end]).or_insert(0) += 1;
    }
    grams
}

/// Q-gram distance: the total difference in gram counts between `a` and `b`.
///
/// Each side contributes one gram per character, so the distance never
/// exceeds `a.len() + b.len()`.
pub fn q_gram_distance(a: &[char], b: &[char]) -> usize {
    let q = decide_q(a.len() + b.len());
    let a_grams = build_q_grams(a, q);
    let b_grams = build_q_grams(b, q);

    let mut dist = 0;
    for (gram, &count_a) in &a_grams {
        let count_b = b_grams.get(gram).copied().unwrap_or(0);
        dist += count_a.abs_diff(count_b);
    }
    // Grams present in b but not in a
    for (gram, &count_b) in &b_grams {
        if !a_grams.contains_key(gram) {
            dist += count_b;
        }
    }
    dist
}
