//! Node matching.
//!
//! For one element of a version, the [`NodeMatcher`] picks the corresponding
//! element among a sibling list of the other version. Stable identifiers pin
//! a match outright; otherwise same-named elements are ranked by closeness in
//! document order and by content similarity.

mod policy;

pub use policy::{ComparePolicy, OptionsPolicy};

use rustc_hash::FxHashSet;

use crate::config::MatchWeights;
use crate::measure::ContentSimilarity;
use crate::node::Element;

/// Outcome of [`NodeMatcher::best_match`].
///
/// `Unmatched` and `Ignored` are distinct outcomes: an unmatched element is
/// shown as added or removed, an ignored one takes no part in the comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchResult {
    /// The candidate at `index` corresponds to the source element.
    Matched { index: usize, rank: f64 },
    /// No candidate scored above zero.
    Unmatched,
    /// The source element is excluded from the comparison.
    Ignored,
}

impl MatchResult {
    /// Returns the matched candidate index, if any.
    pub fn index(&self) -> Option<usize> {
        match self {
            MatchResult::Matched { index, .. } => Some(*index),
            MatchResult::Unmatched | MatchResult::Ignored => None,
        }
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, MatchResult::Ignored)
    }
}

/// Rank given to a stable identifier match.
pub const ID_MATCH_RANK: f64 = f64::MAX;

/// Ranks candidate elements against a source element.
pub struct NodeMatcher<'a> {
    policy: &'a dyn ComparePolicy,
    similarity: &'a dyn ContentSimilarity,
    weights: MatchWeights,
    /// Identifiers present in both versions.
    shared_ids: FxHashSet<&'a str>,
}

impl<'a> NodeMatcher<'a> {
    /// Creates a matcher. `shared_ids` are the stable identifiers that occur
    /// in both versions; an identifier found in one version only pins nothing.
    pub fn new(
        policy: &'a dyn ComparePolicy,
        similarity: &'a dyn ContentSimilarity,
        weights: MatchWeights,
        shared_ids: FxHashSet<&'a str>,
    ) -> Self {
        NodeMatcher {
            policy,
            similarity,
            weights,
            shared_ids,
        }
    }

    /// Finds the candidate corresponding to `source`.
    ///
    /// Candidates are scanned from `search_from` to the end, then from the
    /// start up to `search_from`; on equal rank the first one in that order
    /// wins.
    pub fn best_match(
        &self,
        candidates: &[Element<'_>],
        source: Element<'_>,
        search_from: usize,
    ) -> MatchResult {
        if self.policy.is_ignored(source) {
            return MatchResult::Ignored;
        }

        let start = search_from.min(candidates.len());
        let scan_order = (start..candidates.len()).chain(0..start);

        if let Some(id) = self.pinned_id(source) {
            return scan_order
                .into_iter()
                .find(|&i| {
                    self.pinned_id(candidates[i]) == Some(id)
                        && !self.policy.is_ignored(candidates[i])
                })
                .map(|index| MatchResult::Matched {
                    index,
                    rank: ID_MATCH_RANK,
                })
                .unwrap_or(MatchResult::Unmatched);
        }

        let mut best: Option<(usize, f64)> = None;
        for i in scan_order {
            let candidate = candidates[i];
            if candidate.tag_name() != source.tag_name()
                || self.pinned_id(candidate).is_some()
                || self.policy.is_ignored(candidate)
            {
                continue;
            }
            let rank = self.rank(source, candidate);
            tracing::trace!(source = ?source, candidate = ?candidate, rank, "ranked candidate");
            if rank > 0.0 && best.is_none_or(|(_, best_rank)| rank > best_rank) {
                best = Some((i, rank));
            }
        }

        match best {
            Some((index, rank)) => MatchResult::Matched { index, rank },
            None => MatchResult::Unmatched,
        }
    }

    /// Heuristic rank of an identifier-less pair.
    pub fn rank(&self, source: Element<'_>, candidate: Element<'_>) -> f64 {
        let distance = source.node_index().abs_diff(candidate.node_index());
        let similarity = self
            .similarity
            .similarity(source.raw_content(), candidate.raw_content());
        self.distance_score(distance) + self.weights.similarity_weight * similarity
    }

    /// Linear decay from the maximum score at distance 0 to 0 at the
    /// configured maximum distance.
    fn distance_score(&self, distance: usize) -> f64 {
        let max = self.weights.max_node_distance;
        if max == 0 || distance >= max {
            return 0.0;
        }
        self.weights.max_distance_score * (1.0 - distance as f64 / max as f64)
    }

    fn pinned_id<'e>(&self, element: Element<'e>) -> Option<&'e str> {
        element
            .stable_id()
            .filter(|id| self.shared_ids.contains(*id))
    }
}
