//! Fusion of content-based and collaborative nearest-neighbor lists.
//!
//! The two retrieval lists come from unrelated embedding spaces, so their
//! raw distances are never compared directly. Each list is first scored on
//! its own (distance normalization plus quality/popularity blending), then
//! a single deterministic merge over the union of movie ids produces the
//! fused ranking.

pub mod blend;
pub mod normalize;

use std::collections::HashMap;

use crate::error::AppResult;
use crate::models::{MergedRecommendation, MovieCandidate, RankingPolicy, ScoredCandidate};

pub use blend::{blend_quality_scores, rank_by_composite};
pub use normalize::min_max_normalize;

/// Scores one retrieval list in isolation.
///
/// Normalizes distances within the list and attaches the blended
/// quality/popularity composite. Output order matches input order
/// (retrieval order, ascending raw distance). An empty list scores to an
/// empty list.
pub fn score_candidates(candidates: &[MovieCandidate]) -> AppResult<Vec<ScoredCandidate>> {
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let distances: Vec<f64> = candidates.iter().map(|c| c.raw_distance).collect();
    let vote_averages: Vec<f64> = candidates.iter().map(|c| c.vote_average).collect();
    let popularities: Vec<f64> = candidates.iter().map(|c| c.popularity).collect();

    let normalized = min_max_normalize(&distances)?;
    let composites = blend_quality_scores(&vote_averages, &popularities)?;

    Ok(candidates
        .iter()
        .cloned()
        .zip(normalized)
        .zip(composites)
        .map(
            |((movie, normalized_distance), composite_score)| ScoredCandidate {
                movie,
                normalized_distance,
                composite_score,
            },
        )
        .collect())
}

/// Merges the two scored lists into one ranked output.
///
/// Builds a per-source map keyed by `movie_id` (within a list, the first
/// and therefore closest occurrence of a duplicated id wins), then folds
/// the union of
/// ids into [`MergedRecommendation`] rows. When a movie appears in both
/// lists its metadata is taken from the content list; per-source fields
/// are `None` for the list the movie was absent from. The result is sorted
/// by `policy` with ascending `movie_id` as the final tie-break, so equal
/// inputs always produce the same ordering.
pub fn merge_recommendations(
    content: &[ScoredCandidate],
    collaborative: &[ScoredCandidate],
    policy: RankingPolicy,
) -> Vec<MergedRecommendation> {
    let content_by_id = index_by_id(content);
    let collaborative_by_id = index_by_id(collaborative);

    let mut movie_ids: Vec<i32> = content_by_id
        .keys()
        .chain(collaborative_by_id.keys())
        .copied()
        .collect();
    movie_ids.sort_unstable();
    movie_ids.dedup();

    let mut merged: Vec<MergedRecommendation> = movie_ids
        .into_iter()
        .filter_map(|movie_id| {
            let content_hit = content_by_id.get(&movie_id).copied();
            let collaborative_hit = collaborative_by_id.get(&movie_id).copied();

            // Content metadata takes precedence when both lists contain the movie
            let meta = &content_hit.or(collaborative_hit)?.movie;

            let source_count =
                content_hit.is_some() as u32 + collaborative_hit.is_some() as u32;
            let distance_sum: f64 = content_hit
                .map_or(0.0, |c| c.normalized_distance)
                + collaborative_hit.map_or(0.0, |c| c.normalized_distance);
            let composite_sum: f64 = content_hit.map_or(0.0, |c| c.composite_score)
                + collaborative_hit.map_or(0.0, |c| c.composite_score);

            Some(MergedRecommendation {
                movie_id,
                tmdb_id: meta.tmdb_id,
                title: meta.title.clone(),
                genres: meta.genres.clone(),
                poster_url: meta.poster_url.clone(),
                avg_distance: distance_sum / source_count as f64,
                avg_composite_score: composite_sum / source_count as f64,
                source_count,
                content_distance: content_hit.map(|c| c.normalized_distance),
                collaborative_distance: collaborative_hit.map(|c| c.normalized_distance),
                content_composite_score: content_hit.map(|c| c.composite_score),
                collaborative_composite_score: collaborative_hit.map(|c| c.composite_score),
            })
        })
        .collect();

    sort_by_policy(&mut merged, policy);
    merged
}

fn index_by_id(candidates: &[ScoredCandidate]) -> HashMap<i32, &ScoredCandidate> {
    let mut by_id = HashMap::with_capacity(candidates.len());
    for candidate in candidates {
        by_id.entry(candidate.movie.movie_id).or_insert(candidate);
    }
    by_id
}

fn sort_by_policy(recommendations: &mut [MergedRecommendation], policy: RankingPolicy) {
    match policy {
        RankingPolicy::DistancePriority => recommendations.sort_by(|a, b| {
            b.source_count
                .cmp(&a.source_count)
                .then_with(|| a.avg_distance.total_cmp(&b.avg_distance))
                .then_with(|| a.movie_id.cmp(&b.movie_id))
        }),
        RankingPolicy::ScorePriority => recommendations.sort_by(|a, b| {
            b.avg_composite_score
                .total_cmp(&a.avg_composite_score)
                .then_with(|| b.source_count.cmp(&a.source_count))
                .then_with(|| a.movie_id.cmp(&b.movie_id))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(movie_id: i32, raw_distance: f64) -> MovieCandidate {
        MovieCandidate {
            movie_id,
            tmdb_id: Some(movie_id as i64 * 10),
            title: format!("movie-{}", movie_id),
            genres: Some("Drama".to_string()),
            poster_url: None,
            vote_average: 7.0,
            popularity: 20.0,
            raw_distance,
        }
    }

    fn candidate_with_metrics(
        movie_id: i32,
        raw_distance: f64,
        vote_average: f64,
        popularity: f64,
    ) -> MovieCandidate {
        MovieCandidate {
            vote_average,
            popularity,
            ..candidate(movie_id, raw_distance)
        }
    }

    fn score(candidates: &[MovieCandidate]) -> Vec<ScoredCandidate> {
        score_candidates(candidates).unwrap()
    }

    #[test]
    fn test_score_candidates_preserves_retrieval_order() {
        let scored = score(&[candidate(1, 0.0), candidate(2, 2.0), candidate(3, 4.0)]);
        let ids: Vec<i32> = scored.iter().map(|c| c.movie.movie_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        let distances: Vec<f64> = scored.iter().map(|c| c.normalized_distance).collect();
        assert_eq!(distances, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_score_candidates_empty_list_is_empty() {
        assert!(score_candidates(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_score_candidates_degenerate_distances() {
        let scored = score(&[candidate(1, 5.0), candidate(2, 5.0), candidate(3, 5.0)]);
        assert!(scored.iter().all(|c| c.normalized_distance == 1.0));
    }

    #[test]
    fn test_merge_six_movie_scenario_distance_priority() {
        // Content and collaborative lists overlap on movies 2 and 3
        let content = score(&[candidate(1, 0.0), candidate(2, 2.0), candidate(3, 4.0)]);
        let collaborative = score(&[candidate(2, 1.0), candidate(3, 3.0), candidate(4, 5.0)]);

        let merged =
            merge_recommendations(&content, &collaborative, RankingPolicy::DistancePriority);

        let ids: Vec<i32> = merged.iter().map(|r| r.movie_id).collect();
        assert_eq!(ids, vec![2, 3, 1, 4]);

        assert_eq!(merged[0].source_count, 2);
        assert_eq!(merged[0].avg_distance, 0.25); // (0.5 + 0.0) / 2
        assert_eq!(merged[1].source_count, 2);
        assert_eq!(merged[1].avg_distance, 0.75); // (1.0 + 0.5) / 2
        assert_eq!(merged[2].source_count, 1);
        assert_eq!(merged[2].avg_distance, 0.0);
        assert_eq!(merged[3].source_count, 1);
        assert_eq!(merged[3].avg_distance, 1.0);
    }

    #[test]
    fn test_merge_per_source_fields_null_iff_absent() {
        let content = score(&[candidate(1, 0.0), candidate(2, 2.0)]);
        let collaborative = score(&[candidate(2, 1.0), candidate(3, 3.0)]);

        let merged =
            merge_recommendations(&content, &collaborative, RankingPolicy::DistancePriority);
        let by_id: HashMap<i32, &MergedRecommendation> =
            merged.iter().map(|r| (r.movie_id, r)).collect();

        let only_content = by_id[&1];
        assert!(only_content.content_distance.is_some());
        assert!(only_content.collaborative_distance.is_none());
        assert!(only_content.collaborative_composite_score.is_none());

        let both = by_id[&2];
        assert!(both.content_distance.is_some());
        assert!(both.collaborative_distance.is_some());

        let only_collaborative = by_id[&3];
        assert!(only_collaborative.content_distance.is_none());
        assert!(only_collaborative.collaborative_distance.is_some());
    }

    #[test]
    fn test_merge_source_count_matches_membership() {
        let content = score(&[candidate(1, 0.0), candidate(2, 2.0)]);
        let collaborative = score(&[candidate(2, 1.0), candidate(3, 3.0)]);

        let merged =
            merge_recommendations(&content, &collaborative, RankingPolicy::DistancePriority);

        for rec in &merged {
            let expected = if rec.movie_id == 2 { 2 } else { 1 };
            assert_eq!(rec.source_count, expected);
        }
    }

    #[test]
    fn test_merge_is_commutative_in_aggregates() {
        let left = score(&[candidate(1, 0.0), candidate(2, 2.0), candidate(3, 4.0)]);
        let right = score(&[candidate(2, 1.0), candidate(3, 3.0), candidate(4, 5.0)]);

        let forward = merge_recommendations(&left, &right, RankingPolicy::DistancePriority);
        let swapped = merge_recommendations(&right, &left, RankingPolicy::DistancePriority);

        let forward_stats: HashMap<i32, (u32, f64)> = forward
            .iter()
            .map(|r| (r.movie_id, (r.source_count, r.avg_distance)))
            .collect();
        let swapped_stats: HashMap<i32, (u32, f64)> = swapped
            .iter()
            .map(|r| (r.movie_id, (r.source_count, r.avg_distance)))
            .collect();

        assert_eq!(forward_stats, swapped_stats);
    }

    #[test]
    fn test_merge_content_metadata_wins_on_overlap() {
        let mut content_candidate = candidate(2, 2.0);
        content_candidate.title = "content title".to_string();
        let mut collaborative_candidate = candidate(2, 1.0);
        collaborative_candidate.title = "collaborative title".to_string();

        let content = score(&[candidate(1, 0.0), content_candidate]);
        let collaborative = score(&[collaborative_candidate, candidate(3, 3.0)]);

        let merged =
            merge_recommendations(&content, &collaborative, RankingPolicy::DistancePriority);
        let overlap = merged.iter().find(|r| r.movie_id == 2).unwrap();
        assert_eq!(overlap.title, "content title");
    }

    #[test]
    fn test_merge_empty_collaborative_side() {
        let content = score(&[candidate(1, 0.0), candidate(2, 2.0)]);

        let merged = merge_recommendations(&content, &[], RankingPolicy::DistancePriority);

        assert_eq!(merged.len(), 2);
        for rec in &merged {
            assert_eq!(rec.source_count, 1);
            assert!(rec.collaborative_distance.is_none());
            assert!(rec.collaborative_composite_score.is_none());
        }
    }

    #[test]
    fn test_merge_both_sides_empty() {
        let merged = merge_recommendations(&[], &[], RankingPolicy::DistancePriority);
        assert!(merged.is_empty());
    }

    #[test]
    fn test_merge_duplicate_id_within_list_keeps_closest() {
        // Retrieval order is ascending distance, so the first hit is closest
        let content = score(&[candidate(7, 0.0), candidate(7, 2.0), candidate(8, 4.0)]);

        let merged = merge_recommendations(&content, &[], RankingPolicy::DistancePriority);

        assert_eq!(merged.len(), 2);
        let seven = merged.iter().find(|r| r.movie_id == 7).unwrap();
        assert_eq!(seven.content_distance, Some(0.0));
    }

    #[test]
    fn test_distance_priority_ties_break_by_movie_id() {
        // Same source_count and identical distances: order must be by id
        let content = score(&[candidate(9, 1.0), candidate(4, 1.0), candidate(6, 1.0)]);

        let merged = merge_recommendations(&content, &[], RankingPolicy::DistancePriority);
        let ids: Vec<i32> = merged.iter().map(|r| r.movie_id).collect();
        assert_eq!(ids, vec![4, 6, 9]);
    }

    #[test]
    fn test_score_priority_ranks_by_composite_first() {
        // Movie 2 is strong on both metrics, movie 1 only on popularity,
        // movie 3 only on rating; composites separate them cleanly.
        let content = score(&[
            candidate_with_metrics(1, 0.0, 2.0, 90.0),
            candidate_with_metrics(2, 1.0, 8.0, 80.0),
            candidate_with_metrics(3, 2.0, 9.0, 5.0),
        ]);

        let merged = merge_recommendations(&content, &[], RankingPolicy::ScorePriority);
        assert_eq!(merged[0].movie_id, 2);
    }

    #[test]
    fn test_score_priority_falls_back_to_source_count() {
        // Flat metrics force every composite to 1.0; the movie present in
        // both lists must outrank the single-source ones.
        let content = score(&[candidate(1, 0.0), candidate(2, 2.0)]);
        let collaborative = score(&[candidate(2, 1.0), candidate(3, 3.0)]);

        let merged = merge_recommendations(&content, &collaborative, RankingPolicy::ScorePriority);
        assert_eq!(merged[0].movie_id, 2);
        assert_eq!(merged[0].source_count, 2);
    }
}
