use pgvector::Vector;
use sqlx::PgPool;

use crate::{
    error::{AppError, AppResult},
    models::{CandidateRow, MovieCandidate},
};

/// Which stored embedding a k-NN query runs against.
///
/// The two columns live in unrelated metric spaces; a distance from one is
/// never comparable to a distance from the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorSpace {
    /// Semantic embedding of the movie's metadata
    Content,
    /// Embedding aggregated from user interaction patterns
    Interaction,
}

impl VectorSpace {
    fn column(self) -> &'static str {
        match self {
            VectorSpace::Content => "embedding",
            VectorSpace::Interaction => "interaction_embedding",
        }
    }

    fn label(self) -> &'static str {
        match self {
            VectorSpace::Content => "content",
            VectorSpace::Interaction => "interaction",
        }
    }
}

/// Nearest-neighbor retrieval over stored movie embeddings
///
/// Returns up to `k` neighbors of the query movie in the requested vector
/// space, excluding the query movie itself, ordered by ascending distance.
/// Fails with `NotFound` when the query movie has no stored vector in that
/// space.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait VectorRetrieval: Send + Sync {
    async fn nearest_neighbors(
        &self,
        movie_id: i32,
        space: VectorSpace,
        k: u32,
    ) -> AppResult<Vec<MovieCandidate>>;
}

/// Postgres/pgvector-backed retrieval over the `movies` table
#[derive(Clone)]
pub struct PgVectorRetrieval {
    db_pool: PgPool,
}

impl PgVectorRetrieval {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Loads the query movie's stored vector for the given space
    async fn query_vector(&self, movie_id: i32, space: VectorSpace) -> AppResult<Vector> {
        let sql = format!("SELECT {} FROM movies WHERE movie_id = $1", space.column());

        let row: Option<(Option<Vector>,)> = sqlx::query_as(&sql)
            .bind(movie_id)
            .fetch_optional(&self.db_pool)
            .await?;

        match row {
            Some((Some(vector),)) => Ok(vector),
            Some((None,)) => Err(AppError::NotFound(format!(
                "movie {} has no stored {} vector",
                movie_id,
                space.label()
            ))),
            None => Err(AppError::NotFound(format!("movie {} not found", movie_id))),
        }
    }
}

#[async_trait::async_trait]
impl VectorRetrieval for PgVectorRetrieval {
    async fn nearest_neighbors(
        &self,
        movie_id: i32,
        space: VectorSpace,
        k: u32,
    ) -> AppResult<Vec<MovieCandidate>> {
        let vector = self.query_vector(movie_id, space).await?;

        // Column names come from the VectorSpace enum, not user input
        let sql = format!(
            r#"
            SELECT movie_id, tmdb_id, title, genres, poster_url,
                   vote_average, popularity,
                   {col} <-> $1 AS distance
            FROM movies
            WHERE movie_id != $2 AND {col} IS NOT NULL
            ORDER BY {col} <-> $1
            LIMIT $3
            "#,
            col = space.column()
        );

        let rows: Vec<CandidateRow> = sqlx::query_as(&sql)
            .bind(&vector)
            .bind(movie_id)
            .bind(i64::from(k))
            .fetch_all(&self.db_pool)
            .await?;

        let candidates = rows
            .into_iter()
            .map(MovieCandidate::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        tracing::debug!(
            movie_id,
            space = space.label(),
            requested = k,
            retrieved = candidates.len(),
            "Nearest-neighbor retrieval completed"
        );

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_space_columns_are_distinct() {
        assert_eq!(VectorSpace::Content.column(), "embedding");
        assert_eq!(VectorSpace::Interaction.column(), "interaction_embedding");
        assert_ne!(
            VectorSpace::Content.column(),
            VectorSpace::Interaction.column()
        );
    }

    #[test]
    fn test_vector_space_labels() {
        assert_eq!(VectorSpace::Content.label(), "content");
        assert_eq!(VectorSpace::Interaction.label(), "interaction");
    }
}
