/// Read-through caching over a Redis-backed [`Cache`](crate::db::Cache).
///
/// Looks the key up first; on a hit the cached value is returned as-is.
/// On a miss the block runs, its result is queued for a background cache
/// write, and the freshly computed value is returned.
///
/// # Arguments
/// * `$cache`: cache instance providing `get_from_cache` / `set_in_background`.
/// * `$key`: the [`CacheKey`](crate::db::CacheKey) to store under.
/// * `$ttl`: time-to-live in seconds for the cached value.
/// * `$block`: async block computing the value on a cache miss.
///
/// # Example
/// ```rust,ignore
/// let results = cached!(cache, key, SEARCH_CACHE_TTL, async move {
///     search_movies(&pool, &query, limit).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let __cached_result: $crate::error::AppResult<_> =
            if let Some(cached) = $cache.get_from_cache(&$key).await? {
                Ok(cached)
            } else {
                let value = $block.await?;
                $cache.set_in_background(&$key, &value, $ttl);
                Ok(value)
            };
        __cached_result
    }};
}
