use serde::Deserialize;

/// Engine tuning knobs. Every constant of the blend/rerank math can be
/// overridden through `RANKING_*` environment variables; the defaults are
/// the production values.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub blend: BlendConfig,
    pub rerank: RerankConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlendConfig {
    /// Users with fewer interactions than this are treated as cold.
    #[serde(default = "default_cold_threshold")]
    pub cold_threshold: u32,
    /// Steepness of the sigmoid mapping history count to blend weight.
    #[serde(default = "default_sigmoid_steepness")]
    pub sigmoid_steepness: f32,
    /// Per-axis preference boost when the user has any stated preference.
    #[serde(default = "default_strong_pref_weight")]
    pub strong_pref_weight: f32,
    /// Per-axis preference boost without stated preferences.
    #[serde(default = "default_weak_pref_weight")]
    pub weak_pref_weight: f32,
    /// Extra boost when both brand and category match.
    #[serde(default = "default_dual_match_bonus")]
    pub dual_match_bonus: f32,
    /// Minimum model weight for users without stated preferences.
    #[serde(default = "default_alpha_floor")]
    pub alpha_floor: f32,
    /// Maximum model weight for users with stated preferences.
    #[serde(default = "default_alpha_cap")]
    pub alpha_cap: f32,
    /// Prior contribution in the warm calibration nudge.
    #[serde(default = "default_warm_prior_weight")]
    pub warm_prior_weight: f32,
    /// Flat bonus for preference matches with sufficient prior evidence.
    #[serde(default = "default_warm_pref_bonus")]
    pub warm_pref_bonus: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RerankConfig {
    /// Minimum popularity prior before a preference match is trusted.
    #[serde(default = "default_min_prior")]
    pub min_prior: f32,
    /// Floor of top slots reserved for preferred items when any qualify.
    #[serde(default = "default_min_preferred_slots")]
    pub min_preferred_slots: usize,
}

fn default_cold_threshold() -> u32 {
    10
}
fn default_sigmoid_steepness() -> f32 {
    0.5
}
fn default_strong_pref_weight() -> f32 {
    0.8
}
fn default_weak_pref_weight() -> f32 {
    0.3
}
fn default_dual_match_bonus() -> f32 {
    0.2
}
fn default_alpha_floor() -> f32 {
    0.2
}
fn default_alpha_cap() -> f32 {
    0.35
}
fn default_warm_prior_weight() -> f32 {
    0.15
}
fn default_warm_pref_bonus() -> f32 {
    0.07
}
fn default_min_prior() -> f32 {
    0.25
}
fn default_min_preferred_slots() -> usize {
    3
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            cold_threshold: default_cold_threshold(),
            sigmoid_steepness: default_sigmoid_steepness(),
            strong_pref_weight: default_strong_pref_weight(),
            weak_pref_weight: default_weak_pref_weight(),
            dual_match_bonus: default_dual_match_bonus(),
            alpha_floor: default_alpha_floor(),
            alpha_cap: default_alpha_cap(),
            warm_prior_weight: default_warm_prior_weight(),
            warm_pref_bonus: default_warm_pref_bonus(),
        }
    }
}

impl Default for RerankConfig {
    fn default() -> Self {
        Self {
            min_prior: default_min_prior(),
            min_preferred_slots: default_min_preferred_slots(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();

        Ok(Config {
            blend: envy::prefixed("RANKING_").from_env::<BlendConfig>()?,
            rerank: envy::prefixed("RANKING_").from_env::<RerankConfig>()?,
        })
    }
}
