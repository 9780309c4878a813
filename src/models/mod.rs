use chrono::{DateTime, Datelike, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub type ItemId = i64;

/// An eligible item within one ranking request. Supplied already filtered
/// for availability by the candidate provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub item_id: ItemId,
    pub brand_id: Option<String>,
    pub category_id: Option<String>,
}

impl Candidate {
    pub fn matches_brand(&self, ctx: &UserContext) -> bool {
        self.brand_id
            .as_ref()
            .is_some_and(|b| ctx.preferred_brands.contains(b))
    }

    pub fn matches_category(&self, ctx: &UserContext) -> bool {
        self.category_id
            .as_ref()
            .is_some_and(|c| ctx.preferred_categories.contains(c))
    }

    /// True when the item matches any stated brand or category preference.
    pub fn matches_preference(&self, ctx: &UserContext) -> bool {
        self.matches_brand(ctx) || self.matches_category(ctx)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
    Unknown,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "FE",
            Gender::Other => "O",
            Gender::Unknown => "unknown",
        }
    }
}

/// Time-of-day bucket used for cohort filtering. Resolved once by the
/// context collaborator; downstream code never sees raw hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeBucket {
    Night,     // 00:00 - 06:00
    Morning,   // 06:00 - 12:00
    Afternoon, // 12:00 - 18:00
    Evening,   // 18:00 - 24:00
}

impl TimeBucket {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=5 => TimeBucket::Night,
            6..=11 => TimeBucket::Morning,
            12..=17 => TimeBucket::Afternoon,
            _ => TimeBucket::Evening,
        }
    }

    /// Half-open hour range [start, end) covered by this bucket.
    pub fn hour_bounds(&self) -> (u32, u32) {
        match self {
            TimeBucket::Night => (0, 6),
            TimeBucket::Morning => (6, 12),
            TimeBucket::Afternoon => (12, 18),
            TimeBucket::Evening => (18, 24),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeBucket::Night => "night",
            TimeBucket::Morning => "morning",
            TimeBucket::Afternoon => "afternoon",
            TimeBucket::Evening => "evening",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    /// `month` is 1-based (chrono convention).
    pub fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            _ => Season::Autumn,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
        }
    }
}

/// Restriction of the popularity aggregate to interactions sharing
/// contextual attributes with the current request. Consumed by the
/// interaction store when building the aggregate; opaque to the blend math.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortFilters {
    pub gender: Gender,
    pub time_bucket: TimeBucket,
    pub season: Season,
    pub weekend: bool,
    /// Trailing window of interaction history to aggregate, in days.
    pub window_days: u32,
}

pub const DEFAULT_WINDOW_DAYS: u32 = 180;

impl CohortFilters {
    /// Derive the time-based cohort fields from a wall-clock timestamp.
    pub fn from_local_time<Tz: TimeZone>(now: &DateTime<Tz>, gender: Gender) -> Self {
        let weekday = now.weekday().num_days_from_monday();
        Self {
            gender,
            time_bucket: TimeBucket::from_hour(now.hour()),
            season: Season::from_month(now.month()),
            weekend: weekday >= 5,
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

/// Per-request view of the user, assembled by the external context
/// collaborator. Read-only inside the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserContext {
    pub history_count: u32,
    pub preferred_brands: HashSet<String>,
    pub preferred_categories: HashSet<String>,
    pub cohort: CohortFilters,
}

impl UserContext {
    pub fn has_preferences(&self) -> bool {
        !self.preferred_brands.is_empty() || !self.preferred_categories.is_empty()
    }
}

/// Weighted interaction kinds feeding the popularity aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionKind {
    View,
    Cart,
    Purchase,
}

impl InteractionKind {
    pub fn weight(&self) -> f32 {
        match self {
            InteractionKind::View => 1.0,
            InteractionKind::Cart => 2.0,
            InteractionKind::Purchase => 3.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::View => "view",
            InteractionKind::Cart => "cart",
            InteractionKind::Purchase => "purchase",
        }
    }
}

/// Normalized popularity evidence per item, in [0, 1]. Items absent from
/// the cohort aggregate default to 0.
#[derive(Debug, Clone, Default)]
pub struct PriorMap {
    priors: HashMap<ItemId, f32>,
}

impl PriorMap {
    pub fn new(priors: HashMap<ItemId, f32>) -> Self {
        Self { priors }
    }

    pub fn prior(&self, item_id: ItemId) -> f32 {
        self.priors.get(&item_id).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.priors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.priors.is_empty()
    }

    /// Priors aligned by index to a candidate slice.
    pub fn aligned_with(&self, candidates: &[Candidate]) -> Vec<f32> {
        candidates.iter().map(|c| self.prior(c.item_id)).collect()
    }
}

/// Final output unit. `score` is the displayed (post-blend) score, not
/// necessarily the raw scorer output; `rank` is the 1-based position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedItem {
    pub item_id: ItemId,
    pub score: f32,
    pub rank: usize,
}

/// Which scoring path produced the final list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankPath {
    ColdBlend,
    WarmCalibration,
    Popularity,
}

impl RankPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankPath::ColdBlend => "cold_blend",
            RankPath::WarmCalibration => "warm_calibration",
            RankPath::Popularity => "popularity",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RankingStats {
    pub total_candidates: usize,
    pub preferred_quota: usize,
    pub selected_count: usize,
    pub padded_count: usize,
}
