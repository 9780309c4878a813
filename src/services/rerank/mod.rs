mod padding;

pub use padding::ResultPadder;

use crate::config::RerankConfig;
use tracing::debug;

/// Preference Reranker
///
/// Reorders final scores so that preference-matched items with enough
/// popularity evidence are guaranteed a quota of top slots. Runs
/// identically regardless of which upstream path (cold blend, warm
/// calibration, pure popularity) produced the score vector.
pub struct PreferenceReranker {
    config: RerankConfig,
}

impl PreferenceReranker {
    pub fn new(config: RerankConfig) -> Self {
        Self { config }
    }

    /// Number of top slots reserved for preferred items.
    ///
    /// At least `min_preferred_slots` when any preferred item qualifies,
    /// capped at half the limit or the qualifying count, and never more
    /// than the limit itself.
    pub fn preferred_quota(&self, qualifying: usize, limit: usize) -> usize {
        qualifying
            .min((limit / 2).max(self.config.min_preferred_slots))
            .min(limit)
    }

    /// Select up to `limit` candidate indices, preference-matched first.
    ///
    /// All three slices are aligned by index. Sorting is stable: equal
    /// scores keep the original candidate order, so identical inputs always
    /// produce identical output.
    ///
    /// Preference-flagged items below the minimum prior carry too little
    /// evidence to justify a reserved slot; they are left for the padder
    /// rather than competing in either partition.
    pub fn rerank(
        &self,
        scores: &[f32],
        is_pref: &[bool],
        priors: &[f32],
        limit: usize,
    ) -> Vec<usize> {
        let mut order: Vec<usize> = (0..scores.len()).collect();
        order.sort_by(|&a, &b| {
            scores[b]
                .partial_cmp(&scores[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let pref_indices: Vec<usize> = order
            .iter()
            .copied()
            .filter(|&i| is_pref[i] && priors[i] >= self.config.min_prior)
            .collect();

        if pref_indices.is_empty() {
            return order.into_iter().take(limit).collect();
        }

        let nonpref_indices: Vec<usize> = order.iter().copied().filter(|&i| !is_pref[i]).collect();

        let quota = self.preferred_quota(pref_indices.len(), limit);
        let need = limit - quota;

        debug!(
            preferred = pref_indices.len(),
            quota, limit, "preference quota applied"
        );

        pref_indices
            .into_iter()
            .take(quota)
            .chain(nonpref_indices.into_iter().take(need))
            .collect()
    }
}
