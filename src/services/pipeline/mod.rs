use crate::config::Config;
use crate::error::{RankError, Result};
use crate::models::{
    Candidate, CohortFilters, ItemId, RankPath, RankedItem, RankingStats, UserContext,
};
use crate::services::blending::{ColdStartBlender, WarmCalibrator};
use crate::services::priors::PriorLayer;
use crate::services::rerank::{PreferenceReranker, ResultPadder};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Supplies the availability-filtered candidate set for a user.
#[async_trait]
pub trait CandidateProvider: Send + Sync {
    async fn candidates(&self, ctx: &UserContext) -> anyhow::Result<Vec<Candidate>>;
}

/// Produces one raw relevance score per candidate. Any model mapping
/// (user, item, context) to a real value fits; internals are not our
/// concern here.
#[async_trait]
pub trait Scorer: Send + Sync {
    async fn score(&self, ctx: &UserContext, candidates: &[Candidate]) -> anyhow::Result<Vec<f32>>;
}

/// Supplies the cohort-filtered popularity aggregate: raw interaction
/// weight per item, restricted by the given cohort filters.
#[async_trait]
pub trait InteractionStore: Send + Sync {
    async fn popularity_aggregate(
        &self,
        cohort: &CohortFilters,
        candidates: &[Candidate],
    ) -> anyhow::Result<Vec<(ItemId, f32)>>;
}

/// A fully ranked result list plus a summary of how it was produced.
#[derive(Debug, Clone)]
pub struct RankedList {
    pub items: Vec<RankedItem>,
    pub path: RankPath,
    pub stats: RankingStats,
}

/// The synchronous ranking core: one candidate set, one context, one
/// aggregate snapshot in; one length-guaranteed ranked list out. Stateless
/// per request, safe to share across concurrent requests.
pub struct Ranker {
    config: Config,
    priors: PriorLayer,
    cold: ColdStartBlender,
    warm: WarmCalibrator,
    reranker: PreferenceReranker,
    padder: ResultPadder,
}

impl Ranker {
    pub fn new(config: Config) -> Self {
        let cold = ColdStartBlender::new(config.blend.clone());
        let warm = WarmCalibrator::new(config.blend.clone(), config.rerank.min_prior);
        let reranker = PreferenceReranker::new(config.rerank.clone());

        Self {
            config,
            priors: PriorLayer::new(),
            cold,
            warm,
            reranker,
            padder: ResultPadder::new(),
        }
    }

    /// Rank candidates for one request.
    ///
    /// `raw_scores = None` means the scorer is unavailable: the popularity
    /// prior is used directly as the score vector and no blending happens.
    /// Reranking and padding apply on every path.
    ///
    /// Returns a fully valid list or an error, never a partial result.
    pub fn rank(
        &self,
        candidates: &[Candidate],
        raw_scores: Option<&[f32]>,
        ctx: &UserContext,
        prior_aggregate: &[(ItemId, f32)],
        limit: usize,
    ) -> Result<RankedList> {
        if limit == 0 {
            return Err(RankError::InvalidLimit);
        }
        if let Some(scores) = raw_scores {
            if scores.len() != candidates.len() {
                return Err(RankError::ScoreAlignment {
                    expected: candidates.len(),
                    got: scores.len(),
                });
            }
        }

        let path = self.select_path(raw_scores, ctx);

        if candidates.is_empty() {
            return Ok(RankedList {
                items: Vec::new(),
                path,
                stats: RankingStats::default(),
            });
        }

        // One prior computation per request, shared by blending, reranking
        // and padding alike.
        let prior_map = self.priors.compute(candidates, prior_aggregate);
        let priors = prior_map.aligned_with(candidates);

        let scores = match (raw_scores, path) {
            (None, _) => priors.clone(),
            (Some(raw), RankPath::ColdBlend) => self.cold.blend(raw, candidates, ctx, &prior_map),
            (Some(raw), _) => self.warm.calibrate(raw, candidates, ctx, &prior_map),
        };
        debug_assert_eq!(scores.len(), candidates.len());

        let is_pref: Vec<bool> = candidates
            .iter()
            .map(|c| c.matches_preference(ctx))
            .collect();

        let selected = self.reranker.rerank(&scores, &is_pref, &priors, limit);
        let padded = self.padder.pad(&selected, &priors, limit);

        let qualifying = is_pref
            .iter()
            .zip(&priors)
            .filter(|(&p, &prior)| p && prior >= self.config.rerank.min_prior)
            .count();
        let stats = RankingStats {
            total_candidates: candidates.len(),
            preferred_quota: if qualifying > 0 {
                self.reranker.preferred_quota(qualifying, limit)
            } else {
                0
            },
            selected_count: selected.len(),
            padded_count: padded.len(),
        };

        let items = selected
            .iter()
            .map(|&i| (candidates[i].item_id, scores[i]))
            // Padded entries display their prior: no trustworthy scorer
            // output exists for them.
            .chain(padded.iter().map(|&i| (candidates[i].item_id, priors[i])))
            .enumerate()
            .map(|(pos, (item_id, score))| RankedItem {
                item_id,
                score,
                rank: pos + 1,
            })
            .collect();

        Ok(RankedList { items, path, stats })
    }

    fn select_path(&self, raw_scores: Option<&[f32]>, ctx: &UserContext) -> RankPath {
        match raw_scores {
            None => RankPath::Popularity,
            Some(_) if ctx.history_count < self.config.blend.cold_threshold => RankPath::ColdBlend,
            Some(_) => RankPath::WarmCalibration,
        }
    }
}

/// Async orchestrator wiring the ranking core to its collaborators.
///
/// Scorer inference and aggregate fetch are independent and run
/// concurrently; both must complete before blending. Collaborator failures
/// downgrade the request (popularity fallback, zero priors) instead of
/// failing it; retry and timeout policy belongs to the caller.
pub struct RankingEngine {
    provider: Arc<dyn CandidateProvider>,
    scorer: Option<Arc<dyn Scorer>>,
    store: Arc<dyn InteractionStore>,
    ranker: Ranker,
}

impl RankingEngine {
    pub fn new(
        provider: Arc<dyn CandidateProvider>,
        scorer: Option<Arc<dyn Scorer>>,
        store: Arc<dyn InteractionStore>,
        config: Config,
    ) -> Self {
        Self {
            provider,
            scorer,
            store,
            ranker: Ranker::new(config),
        }
    }

    pub async fn rank_for_user(
        &self,
        ctx: &UserContext,
        limit: usize,
    ) -> anyhow::Result<RankedList> {
        let request_id = Uuid::new_v4();

        let candidates = self.provider.candidates(ctx).await?;
        if candidates.is_empty() {
            info!(%request_id, "no eligible candidates");
            return Ok(self.ranker.rank(&[], None, ctx, &[], limit)?);
        }

        let scores_fut = async {
            match &self.scorer {
                Some(scorer) => match scorer.score(ctx, &candidates).await {
                    Ok(scores) => Some(scores),
                    Err(e) => {
                        warn!(%request_id, error = %e, "scorer failed, falling back to popularity");
                        None
                    }
                },
                None => None,
            }
        };
        let aggregate_fut = async {
            match self
                .store
                .popularity_aggregate(&ctx.cohort, &candidates)
                .await
            {
                Ok(aggregate) => aggregate,
                Err(e) => {
                    warn!(%request_id, error = %e, "aggregate fetch failed, priors default to zero");
                    Vec::new()
                }
            }
        };
        let (raw_scores, aggregate) = tokio::join!(scores_fut, aggregate_fut);

        let ranked = self
            .ranker
            .rank(&candidates, raw_scores.as_deref(), ctx, &aggregate, limit)?;

        info!(
            %request_id,
            path = ranked.path.as_str(),
            total_candidates = ranked.stats.total_candidates,
            selected = ranked.stats.selected_count,
            padded = ranked.stats.padded_count,
            "ranking completed"
        );

        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;
    use chrono::Utc;
    use std::collections::HashSet;

    fn candidate(item_id: ItemId, brand: Option<&str>) -> Candidate {
        Candidate {
            item_id,
            brand_id: brand.map(String::from),
            category_id: None,
        }
    }

    fn context(history_count: u32, brands: &[&str]) -> UserContext {
        UserContext {
            history_count,
            preferred_brands: brands.iter().map(|s| s.to_string()).collect(),
            preferred_categories: HashSet::new(),
            cohort: CohortFilters::from_local_time(&Utc::now(), Gender::Unknown),
        }
    }

    fn ranker() -> Ranker {
        Ranker::new(Config::default())
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        let result = ranker().rank(&[candidate(1, None)], None, &context(0, &[]), &[], 0);
        assert!(matches!(result, Err(RankError::InvalidLimit)));
    }

    #[test]
    fn test_misaligned_scores_are_rejected() {
        let candidates = vec![candidate(1, None), candidate(2, None)];
        let result = ranker().rank(&candidates, Some(&[0.5]), &context(0, &[]), &[], 5);

        assert!(matches!(
            result,
            Err(RankError::ScoreAlignment {
                expected: 2,
                got: 1
            })
        ));
    }

    #[test]
    fn test_empty_candidates_yield_empty_list() {
        let ranked = ranker()
            .rank(&[], Some(&[]), &context(0, &[]), &[], 5)
            .unwrap();
        assert!(ranked.items.is_empty());
    }

    #[test]
    fn test_cold_warm_boundary() {
        let ranker = ranker();
        let candidates = vec![candidate(1, None)];
        let scores = [0.5];

        let cold = ranker
            .rank(&candidates, Some(&scores), &context(9, &[]), &[], 1)
            .unwrap();
        let warm = ranker
            .rank(&candidates, Some(&scores), &context(10, &[]), &[], 1)
            .unwrap();

        assert_eq!(cold.path, RankPath::ColdBlend);
        assert_eq!(warm.path, RankPath::WarmCalibration);
    }

    #[test]
    fn test_missing_scores_use_popularity_path() {
        let ranked = ranker()
            .rank(&[candidate(1, None)], None, &context(50, &[]), &[], 1)
            .unwrap();
        assert_eq!(ranked.path, RankPath::Popularity);
    }

    #[test]
    fn test_length_invariant() {
        let ranker = ranker();
        let candidates: Vec<Candidate> = (0..8).map(|i| candidate(i, None)).collect();
        let scores: Vec<f32> = (0..8).map(|i| i as f32 * 0.1).collect();
        let ctx = context(0, &[]);

        for limit in 1..12 {
            let ranked = ranker
                .rank(&candidates, Some(&scores), &ctx, &[], limit)
                .unwrap();
            assert_eq!(ranked.items.len(), limit.min(candidates.len()));
        }
    }

    #[test]
    fn test_ranks_are_one_based_and_contiguous() {
        let candidates: Vec<Candidate> = (0..4).map(|i| candidate(i, None)).collect();
        let ranked = ranker()
            .rank(&candidates, Some(&[0.4, 0.3, 0.2, 0.1]), &context(0, &[]), &[], 4)
            .unwrap();

        let ranks: Vec<usize> = ranked.items.iter().map(|i| i.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_cold_preferred_item_reaches_top_slots() {
        // Scenario: preferred brand on the lowest-scored item, backed by
        // enough cohort popularity to clear the evidence bar.
        let ranker = ranker();
        let candidates = vec![
            candidate(10, None),
            candidate(11, None),
            candidate(12, None),
            candidate(13, Some("B1")),
            candidate(14, None),
        ];
        let aggregate = vec![(10, 10.0), (13, 3.0)]; // prior: 1.0 and 0.3
        let ctx = context(0, &["B1"]);

        let ranked = ranker
            .rank(
                &candidates,
                Some(&[0.1, 0.9, 0.5, 0.3, 0.7]),
                &ctx,
                &aggregate,
                5,
            )
            .unwrap();

        let top3: Vec<ItemId> = ranked.items.iter().take(3).map(|i| i.item_id).collect();
        assert!(top3.contains(&13), "preferred item must hold a top slot");
        assert_eq!(ranked.stats.preferred_quota, 1);
    }

    #[test]
    fn test_padded_items_display_prior_as_score() {
        // Two qualifying preferred items, two preferred-but-unproven ones.
        // The latter enter neither rerank partition and come back as padding.
        let ranker = ranker();
        let candidates = vec![
            candidate(1, Some("B1")),
            candidate(2, Some("B1")),
            candidate(3, Some("B1")),
            candidate(4, Some("B1")),
        ];
        let aggregate = vec![(1, 10.0), (2, 8.0), (3, 1.0)]; // priors 1.0, 0.8, 0.1, 0.0
        let ctx = context(0, &["B1"]);

        let ranked = ranker
            .rank(&candidates, Some(&[0.9, 0.8, 0.7, 0.6]), &ctx, &aggregate, 10)
            .unwrap();

        assert_eq!(ranked.items.len(), 4);
        assert_eq!(ranked.stats.selected_count, 2);
        assert_eq!(ranked.stats.padded_count, 2);

        // Padding is ordered by prior and displays the prior as score
        assert_eq!(ranked.items[2].item_id, 3);
        assert!((ranked.items[2].score - 0.1).abs() < 1e-6);
        assert_eq!(ranked.items[3].item_id, 4);
        assert_eq!(ranked.items[3].score, 0.0);
    }
}
