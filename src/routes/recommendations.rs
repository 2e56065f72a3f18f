use axum::{extract::State, Json};
use serde::Deserialize;

use crate::{
    cached,
    db::CacheKey,
    error::{AppError, AppResult},
    models::{RankingPolicy, RecommendationResponse},
    services::recommendations,
    state::AppState,
};

const RECOMMENDATION_CACHE_TTL: u64 = 3600; // 1 hour

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub movie_id: i32,
    pub n_recommendations: u32,
    /// Overrides the configured default ranking policy when present
    #[serde(default)]
    pub policy: Option<RankingPolicy>,
}

/// Handler for the recommendations endpoint
///
/// Validates the request before any backend I/O, then serves the fused
/// ranking from cache or computes it on a miss.
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    if request.n_recommendations == 0 {
        return Err(AppError::InvalidInput(
            "n_recommendations must be at least 1".to_string(),
        ));
    }

    let policy = request.policy.unwrap_or(state.default_policy);
    let key = CacheKey::Recommendations {
        movie_id: request.movie_id,
        k: request.n_recommendations,
        policy,
    };

    let retrieval = state.retrieval.clone();
    let response: RecommendationResponse =
        cached!(state.cache, key, RECOMMENDATION_CACHE_TTL, async move {
            recommendations::build_recommendations(
                retrieval.as_ref(),
                request.movie_id,
                request.n_recommendations,
                policy,
            )
            .await
        })?;

    Ok(Json(response))
}
