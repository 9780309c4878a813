pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use error::{RankError, Result};
pub use services::{
    CandidateProvider, ColdStartBlender, InteractionStore, PreferenceReranker, PriorLayer,
    RankedList, Ranker, RankingEngine, ResultPadder, Scorer, WarmCalibrator,
};
