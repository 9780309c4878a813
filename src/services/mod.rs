pub mod blending;
pub mod pipeline;
pub mod priors;
pub mod rerank;

pub use blending::{ColdStartBlender, WarmCalibrator};
pub use pipeline::{
    CandidateProvider, InteractionStore, RankedList, Ranker, RankingEngine, Scorer,
};
pub use priors::PriorLayer;
pub use rerank::{PreferenceReranker, ResultPadder};
