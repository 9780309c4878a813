use crate::models::{Candidate, InteractionKind, ItemId, PriorMap};
use crate::utils::max_normalize;
use std::collections::HashMap;
use tracing::debug;

/// Prior Layer - population-level popularity evidence
///
/// Turns a cohort-filtered interaction aggregate into a normalized
/// popularity prior per candidate. Normalization is max-based (the
/// strongest item maps to 1.0); this is not a probability distribution.
pub struct PriorLayer;

impl Default for PriorLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl PriorLayer {
    pub fn new() -> Self {
        Self
    }

    /// Build the prior map from pre-weighted aggregate rows.
    ///
    /// Candidates without an aggregate row get prior 0.0. An empty
    /// aggregate yields an all-zero map; it is not an error.
    pub fn compute(&self, candidates: &[Candidate], aggregate: &[(ItemId, f32)]) -> PriorMap {
        let raw_by_item: HashMap<ItemId, f32> = aggregate.iter().copied().collect();

        let raw: Vec<f32> = candidates
            .iter()
            .map(|c| raw_by_item.get(&c.item_id).copied().unwrap_or(0.0))
            .collect();
        let normalized = max_normalize(&raw);

        if aggregate.is_empty() {
            debug!(
                candidates = candidates.len(),
                "empty popularity aggregate, priors default to zero"
            );
        }

        PriorMap::new(
            candidates
                .iter()
                .zip(normalized)
                .map(|(c, norm)| (c.item_id, norm))
                .collect(),
        )
    }

    /// Build the prior map from raw interaction events, applying the
    /// purchase/cart/view weighting before normalization.
    pub fn compute_from_events(
        &self,
        candidates: &[Candidate],
        events: &[(ItemId, InteractionKind)],
    ) -> PriorMap {
        let mut weighted: HashMap<ItemId, f32> = HashMap::new();
        for (item_id, kind) in events {
            *weighted.entry(*item_id).or_insert(0.0) += kind.weight();
        }

        let aggregate: Vec<(ItemId, f32)> = weighted.into_iter().collect();
        self.compute(candidates, &aggregate)
    }
}
