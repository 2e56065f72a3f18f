use crate::error::{AppError, AppResult};
use crate::models::ScoredCandidate;
use crate::services::ranking::normalize::min_max_normalize;

/// Blends quality and popularity into one composite score per candidate.
///
/// Both sequences are min-max normalized independently, then multiplied
/// pairwise. The multiplicative combination means a candidate only scores
/// highly when both normalized metrics are high; a runaway popularity with
/// a poor rating (or vice versa) is pulled toward zero.
pub fn blend_quality_scores(vote_averages: &[f64], popularities: &[f64]) -> AppResult<Vec<f64>> {
    if vote_averages.len() != popularities.len() {
        return Err(AppError::Internal(format!(
            "metric length mismatch: {} vote averages vs {} popularities",
            vote_averages.len(),
            popularities.len()
        )));
    }

    let quality = min_max_normalize(vote_averages)?;
    let popularity = min_max_normalize(popularities)?;

    Ok(quality
        .iter()
        .zip(popularity.iter())
        .map(|(q, p)| q * p)
        .collect())
}

/// Orders one scored list descending by composite score.
///
/// This is the list-local single-source view: it ranks candidates within
/// one retrieval list for display and never feeds the fuser, which
/// consumes lists in retrieval order. Ties break by ascending `movie_id`.
pub fn rank_by_composite(mut candidates: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
    candidates.sort_by(|a, b| {
        b.composite_score
            .total_cmp(&a.composite_score)
            .then_with(|| a.movie.movie_id.cmp(&b.movie.movie_id))
    });
    candidates
}
