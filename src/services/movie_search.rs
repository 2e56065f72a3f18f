use sqlx::PgPool;

use crate::{
    error::{AppError, AppResult},
    models::{MovieSearchResult, SearchRow},
};

/// Fuzzy title lookup backed by Postgres trigram matching.
///
/// A sibling of the recommendation pipeline with no shared logic: it only
/// resolves a typed title to candidate movie ids. Matches are ranked by
/// `similarity()` score descending.
pub async fn search_movies(
    db_pool: &PgPool,
    query: &str,
    limit: u32,
) -> AppResult<Vec<MovieSearchResult>> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::InvalidInput(
            "Search query cannot be empty".to_string(),
        ));
    }

    let rows: Vec<SearchRow> = sqlx::query_as(
        r#"
        SELECT movie_id, tmdb_id, title, genres, poster_url,
               similarity(title, $1) AS score
        FROM movies
        WHERE title % $1 OR title ILIKE $2
        ORDER BY score DESC
        LIMIT $3
        "#,
    )
    .bind(query)
    .bind(format!("%{}%", query))
    .bind(i64::from(limit))
    .fetch_all(db_pool)
    .await?;

    let results: Vec<MovieSearchResult> = rows.into_iter().map(MovieSearchResult::from).collect();

    tracing::info!(
        query = %query,
        results = results.len(),
        "Title search completed"
    );

    Ok(results)
}
