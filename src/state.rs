use std::sync::Arc;

use sqlx::PgPool;

use crate::db::Cache;
use crate::models::RankingPolicy;
use crate::services::retrieval::VectorRetrieval;

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub cache: Cache,
    pub retrieval: Arc<dyn VectorRetrieval>,
    /// Policy applied when a request does not specify one
    pub default_policy: RankingPolicy,
}

impl AppState {
    pub fn new(
        db_pool: PgPool,
        cache: Cache,
        retrieval: Arc<dyn VectorRetrieval>,
        default_policy: RankingPolicy,
    ) -> Self {
        Self {
            db_pool,
            cache,
            retrieval,
            default_policy,
        }
    }
}
