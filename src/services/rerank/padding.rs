use std::collections::HashSet;
use tracing::debug;

/// Result Padder
///
/// When reranking selects fewer items than requested, remaining candidates
/// are appended by descending popularity prior until the limit is met or
/// candidates run out. Padded entries have no trustworthy scorer output,
/// so callers display the prior as their score.
pub struct ResultPadder;

impl Default for ResultPadder {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultPadder {
    pub fn new() -> Self {
        Self
    }

    /// Candidate indices to append after `selected`, best prior first.
    /// Ties keep the original candidate order.
    pub fn pad(&self, selected: &[usize], priors: &[f32], limit: usize) -> Vec<usize> {
        if selected.len() >= limit {
            return Vec::new();
        }

        let taken: HashSet<usize> = selected.iter().copied().collect();
        let mut remaining: Vec<usize> = (0..priors.len()).filter(|i| !taken.contains(i)).collect();
        remaining.sort_by(|&a, &b| {
            priors[b]
                .partial_cmp(&priors[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let need = limit - selected.len();
        remaining.truncate(need);

        if !remaining.is_empty() {
            debug!(padded = remaining.len(), "padded result up to limit");
        }

        remaining
    }
}
