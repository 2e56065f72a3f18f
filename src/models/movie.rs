use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

/// One nearest-neighbor record retrieved from a single vector space.
///
/// `raw_distance` is meaningful only relative to other candidates from the
/// same retrieval list; content-space and interaction-space distances live
/// on unrelated scales and must be normalized before they can be combined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieCandidate {
    pub movie_id: i32,
    pub tmdb_id: Option<i64>,
    pub title: String,
    pub genres: Option<String>,
    pub poster_url: Option<String>,
    /// Quality metric (mean user rating on the source's scale)
    pub vote_average: f64,
    /// Popularity metric on the source's scale
    pub popularity: f64,
    /// Raw embedding-space distance; smaller = more similar
    pub raw_distance: f64,
}

/// Raw row shape coming off the k-NN query.
///
/// The distance is an SQL expression and therefore nullable at the type
/// level; metadata columns that are nullable in the schema stay optional.
#[derive(Debug, Clone, FromRow)]
pub struct CandidateRow {
    pub movie_id: i32,
    pub tmdb_id: Option<i64>,
    pub title: String,
    pub genres: Option<String>,
    pub poster_url: Option<String>,
    pub vote_average: Option<f64>,
    pub popularity: Option<f64>,
    pub distance: Option<f64>,
}

impl TryFrom<CandidateRow> for MovieCandidate {
    type Error = AppError;

    fn try_from(row: CandidateRow) -> Result<Self, Self::Error> {
        let raw_distance = row.distance.ok_or_else(|| {
            AppError::InvalidCandidate(format!("movie {} has no distance", row.movie_id))
        })?;

        if !raw_distance.is_finite() || raw_distance < 0.0 {
            return Err(AppError::InvalidCandidate(format!(
                "movie {} has invalid distance {}",
                row.movie_id, raw_distance
            )));
        }

        Ok(MovieCandidate {
            movie_id: row.movie_id,
            tmdb_id: row.tmdb_id,
            title: row.title,
            genres: row.genres,
            poster_url: row.poster_url,
            vote_average: row.vote_average.unwrap_or(0.0),
            popularity: row.popularity.unwrap_or(0.0),
            raw_distance,
        })
    }
}

/// One trigram title-search match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieSearchResult {
    pub movie_id: i32,
    pub tmdb_id: Option<i64>,
    pub title: String,
    pub genres: Option<String>,
    pub poster_url: Option<String>,
    /// Trigram similarity to the query, higher = closer match
    pub score: f32,
}

/// Row shape for the title-search query
#[derive(Debug, Clone, FromRow)]
pub struct SearchRow {
    pub movie_id: i32,
    pub tmdb_id: Option<i64>,
    pub title: String,
    pub genres: Option<String>,
    pub poster_url: Option<String>,
    pub score: Option<f32>,
}

impl From<SearchRow> for MovieSearchResult {
    fn from(row: SearchRow) -> Self {
        MovieSearchResult {
            movie_id: row.movie_id,
            tmdb_id: row.tmdb_id,
            title: row.title,
            genres: row.genres,
            poster_url: row.poster_url,
            score: row.score.unwrap_or(0.0),
        }
    }
}
