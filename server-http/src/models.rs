use memo::MemoStats;
use serde::{Deserialize, Serialize};

// === Counter Models ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedCount {
    pub cached: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawCount {
    pub raw: u64,
}

// === Service Models ===

#[derive(Serialize)]
pub struct HealthResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: MemoStats,
    pub hit_ratio: f64,
}

impl From<MemoStats> for StatsResponse {
    fn from(stats: MemoStats) -> Self {
        Self {
            hit_ratio: stats.hit_ratio(),
            stats,
        }
    }
}
