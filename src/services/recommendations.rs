use crate::{
    error::{AppError, AppResult},
    models::{RankingPolicy, RecommendationResponse},
    services::ranking::{self, rank_by_composite},
    services::retrieval::{VectorRetrieval, VectorSpace},
};
use chrono::Utc;

/// Builds the fused recommendation payload for one query movie.
///
/// The content-based and collaborative retrievals are independent, so they
/// run concurrently; a failure on either side fails the whole request
/// rather than returning a one-sided ranking. Each list is scored within
/// itself, merged under the requested policy, and the fused ranking is
/// truncated to `n_recommendations`. The per-source lists travel along in
/// their list-local composite ordering so callers can see what each signal
/// contributed.
pub async fn build_recommendations(
    retrieval: &dyn VectorRetrieval,
    movie_id: i32,
    n_recommendations: u32,
    policy: RankingPolicy,
) -> AppResult<RecommendationResponse> {
    if n_recommendations == 0 {
        return Err(AppError::InvalidInput(
            "n_recommendations must be at least 1".to_string(),
        ));
    }

    let (content_raw, collaborative_raw) = tokio::try_join!(
        retrieval.nearest_neighbors(movie_id, VectorSpace::Content, n_recommendations),
        retrieval.nearest_neighbors(movie_id, VectorSpace::Interaction, n_recommendations),
    )?;

    tracing::debug!(
        movie_id,
        content_candidates = content_raw.len(),
        collaborative_candidates = collaborative_raw.len(),
        "Candidate retrieval completed"
    );

    let content = ranking::score_candidates(&content_raw)?;
    let collaborative = ranking::score_candidates(&collaborative_raw)?;

    let mut recommendations = ranking::merge_recommendations(&content, &collaborative, policy);
    recommendations.truncate(n_recommendations as usize);

    tracing::info!(
        movie_id,
        %policy,
        returned = recommendations.len(),
        "Recommendations fused"
    );

    Ok(RecommendationResponse {
        movie_id,
        policy,
        generated_at: Utc::now(),
        recommendations,
        content_candidates: rank_by_composite(content),
        collaborative_candidates: rank_by_composite(collaborative),
    })
}
