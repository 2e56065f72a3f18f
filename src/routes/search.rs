use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    cached, db::CacheKey, error::AppError, error::AppResult, models::MovieSearchResult,
    services::movie_search, state::AppState,
};

const SEARCH_CACHE_TTL: u64 = 3600; // 1 hour

fn default_limit() -> u32 {
    10
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: String,
    #[serde(default = "default_limit")]
    limit: u32,
}

/// Handler for the title search endpoint
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<MovieSearchResult>>> {
    let query = params.q.trim().to_string();
    if query.is_empty() {
        return Err(AppError::InvalidInput(
            "Search query cannot be empty".to_string(),
        ));
    }

    let key = CacheKey::TitleSearch {
        query: query.clone(),
        limit: params.limit,
    };

    let db_pool = state.db_pool.clone();
    let results: Vec<MovieSearchResult> = cached!(state.cache, key, SEARCH_CACHE_TTL, async move {
        movie_search::search_movies(&db_pool, &query, params.limit).await
    })?;

    Ok(Json(results))
}
