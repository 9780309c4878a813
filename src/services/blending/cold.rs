use crate::config::BlendConfig;
use crate::models::{Candidate, PriorMap, UserContext};
use crate::utils::{min_max_normalize, sigmoid};
use tracing::debug;

/// Cold-Start Blender
///
/// For users below the cold threshold the learned scorer has little signal,
/// so its output is blended against the cohort popularity prior. The blend
/// weight follows a sigmoid over the user's interaction count: at zero
/// history the prior dominates, approaching the threshold the scorer takes
/// over. Preference matches boost the prior, but only where popularity
/// evidence already exists (the boost is scaled by the prior itself).
pub struct ColdStartBlender {
    config: BlendConfig,
}

impl ColdStartBlender {
    pub fn new(config: BlendConfig) -> Self {
        Self { config }
    }

    /// Blend raw scorer output with popularity priors.
    ///
    /// Input and output are aligned by index with `candidates`. All-equal
    /// raw scores and all-zero priors are handled, never an error.
    pub fn blend(
        &self,
        raw_scores: &[f32],
        candidates: &[Candidate],
        ctx: &UserContext,
        priors: &PriorMap,
    ) -> Vec<f32> {
        let normalized = min_max_normalize(raw_scores);

        let history = ctx.history_count as f32;
        let threshold = self.config.cold_threshold as f32;
        let coldness = 1.0 - sigmoid(self.config.sigmoid_steepness * (history - threshold));

        let has_prefs = ctx.has_preferences();
        let axis_weight = if has_prefs {
            self.config.strong_pref_weight
        } else {
            self.config.weak_pref_weight
        };

        let adjusted_priors: Vec<f32> = candidates
            .iter()
            .map(|c| {
                let prior = priors.prior(c.item_id);
                let brand = c.matches_brand(ctx);
                let category = c.matches_category(ctx);

                let mut boost = 0.0;
                if brand {
                    boost += axis_weight;
                }
                if category {
                    boost += axis_weight;
                }
                if brand && category {
                    boost += self.config.dual_match_bonus;
                }

                // Boosts only apply where popularity evidence exists
                (prior + coldness * boost * prior).clamp(0.0, 1.0)
            })
            .collect();

        let mut alpha = sigmoid(self.config.sigmoid_steepness * (history - threshold));
        alpha = if has_prefs {
            // Preference evidence outranks a cold model
            alpha.min(self.config.alpha_cap)
        } else {
            (alpha * 0.5).max(self.config.alpha_floor)
        };

        debug!(
            history_count = ctx.history_count,
            coldness, alpha, "cold-start blend weights"
        );

        normalized
            .iter()
            .zip(&adjusted_priors)
            .map(|(&norm, &prior)| {
                let blended = alpha * norm + (1.0 - alpha) * prior;
                // Items without contextual popularity lose up to half their score
                blended * (0.5 + 0.5 * prior)
            })
            .collect()
    }
}
