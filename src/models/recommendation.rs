use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::MovieCandidate;

/// Ordering applied to the fused recommendation list.
///
/// Two policies are supported; which keys win is the only difference:
/// distance-priority ranks movies confirmed by both vector spaces first,
/// score-priority ranks by blended quality/popularity first. Ties beyond
/// the listed keys always break by ascending `movie_id` so a given input
/// produces one reproducible ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingPolicy {
    /// `source_count` descending, then `avg_distance` ascending
    #[default]
    DistancePriority,
    /// `avg_composite_score` descending, then `source_count` descending
    ScorePriority,
}

impl Display for RankingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankingPolicy::DistancePriority => write!(f, "distance_priority"),
            RankingPolicy::ScorePriority => write!(f, "score_priority"),
        }
    }
}

/// A candidate with its within-list normalized distance and blended score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub movie: MovieCandidate,
    /// Min-max normalized distance within the source list, in [0,1]
    pub normalized_distance: f64,
    /// Normalized vote average times normalized popularity, in [0,1]
    pub composite_score: f64,
}

/// One row of the fused ranking.
///
/// Per-source fields are `None` exactly when the movie was absent from
/// that retrieval list; they are never zeroed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRecommendation {
    pub movie_id: i32,
    pub tmdb_id: Option<i64>,
    pub title: String,
    pub genres: Option<String>,
    pub poster_url: Option<String>,
    /// Mean of normalized distances over the lists containing this movie
    pub avg_distance: f64,
    /// Mean of composite scores over the lists containing this movie
    pub avg_composite_score: f64,
    /// Number of retrieval lists containing this movie, 1 or 2
    pub source_count: u32,
    pub content_distance: Option<f64>,
    pub collaborative_distance: Option<f64>,
    pub content_composite_score: Option<f64>,
    pub collaborative_composite_score: Option<f64>,
}

/// Full recommendation payload returned to the client.
///
/// Carries the two per-source scored lists alongside the fused ranking so
/// callers can inspect what each signal contributed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub movie_id: i32,
    pub policy: RankingPolicy,
    pub generated_at: DateTime<Utc>,
    pub recommendations: Vec<MergedRecommendation>,
    pub content_candidates: Vec<ScoredCandidate>,
    pub collaborative_candidates: Vec<ScoredCandidate>,
}
