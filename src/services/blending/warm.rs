use crate::config::BlendConfig;
use crate::models::{Candidate, PriorMap, UserContext};
use tracing::debug;

/// Warm Calibrator
///
/// Users at or above the cold threshold get their scorer output mostly
/// trusted; the cohort prior and preference matches only nudge it. No
/// normalization happens here, the raw score scale is preserved.
pub struct WarmCalibrator {
    config: BlendConfig,
    /// Minimum prior before a preference match earns the flat bonus.
    min_prior: f32,
}

impl WarmCalibrator {
    pub fn new(config: BlendConfig, min_prior: f32) -> Self {
        Self { config, min_prior }
    }

    /// Nudge raw scorer output with priors and preference signals.
    pub fn calibrate(
        &self,
        raw_scores: &[f32],
        candidates: &[Candidate],
        ctx: &UserContext,
        priors: &PriorMap,
    ) -> Vec<f32> {
        let calibrated: Vec<f32> = raw_scores
            .iter()
            .zip(candidates)
            .map(|(&raw, c)| {
                let prior = priors.prior(c.item_id);
                let mut score = raw + self.config.warm_prior_weight * prior;
                if prior >= self.min_prior && c.matches_preference(ctx) {
                    score += self.config.warm_pref_bonus;
                }
                score
            })
            .collect();

        debug!(
            history_count = ctx.history_count,
            candidates = candidates.len(),
            "warm calibration applied"
        );

        calibrated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CohortFilters, Gender, ItemId};
    use chrono::Utc;
    use std::collections::{HashMap, HashSet};

    fn candidate(item_id: ItemId, brand: Option<&str>) -> Candidate {
        Candidate {
            item_id,
            brand_id: brand.map(String::from),
            category_id: None,
        }
    }

    fn warm_context(brands: &[&str]) -> UserContext {
        UserContext {
            history_count: 25,
            preferred_brands: brands.iter().map(|s| s.to_string()).collect(),
            preferred_categories: HashSet::new(),
            cohort: CohortFilters::from_local_time(&Utc::now(), Gender::Unknown),
        }
    }

    #[test]
    fn test_prior_nudge() {
        let calibrator = WarmCalibrator::new(BlendConfig::default(), 0.25);
        let candidates = vec![candidate(1, None), candidate(2, None)];
        let ctx = warm_context(&[]);
        let priors = PriorMap::new(HashMap::from([(1, 0.8)]));

        let calibrated = calibrator.calibrate(&[0.5, 0.5], &candidates, &ctx, &priors);

        assert!((calibrated[0] - (0.5 + 0.15 * 0.8)).abs() < 1e-6);
        assert!((calibrated[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_preference_bonus_needs_sufficient_prior() {
        let calibrator = WarmCalibrator::new(BlendConfig::default(), 0.25);
        let candidates = vec![candidate(1, Some("B1")), candidate(2, Some("B1"))];
        let ctx = warm_context(&["B1"]);
        // Item 1 clears the 0.25 bar, item 2 does not
        let priors = PriorMap::new(HashMap::from([(1, 0.3), (2, 0.2)]));

        let calibrated = calibrator.calibrate(&[0.5, 0.5], &candidates, &ctx, &priors);

        assert!((calibrated[0] - (0.5 + 0.15 * 0.3 + 0.07)).abs() < 1e-6);
        assert!((calibrated[1] - (0.5 + 0.15 * 0.2)).abs() < 1e-6);
    }

    #[test]
    fn test_raw_score_scale_is_preserved() {
        let calibrator = WarmCalibrator::new(BlendConfig::default(), 0.25);
        let candidates = vec![candidate(1, None), candidate(2, None)];
        let ctx = warm_context(&[]);

        // Without priors the output is exactly the raw scorer output
        let calibrated = calibrator.calibrate(&[3.2, -1.5], &candidates, &ctx, &PriorMap::default());

        assert_eq!(calibrated, vec![3.2, -1.5]);
    }
}
