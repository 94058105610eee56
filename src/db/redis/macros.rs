/// Read-through lookup against a [`Cache`](crate::db::Cache).
///
/// Evaluates to `AppResult<T>`: the cached value under `$key` when present,
/// otherwise the result of awaiting `$fetch`, which is also queued for
/// storage with the key's TTL. Cache trouble counts as a miss; errors from
/// `$fetch` propagate with `?`, so the enclosing function must return an
/// `AppResult`.
///
/// ```rust,ignore
/// let list: AppResult<ApiGenreList> = cached!(self.cache, CacheKey::Genres, async move {
///     self.get_json("/genre/movie/list", &[]).await
/// });
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $fetch:expr) => {{
        let key = $key;
        match $cache.get(&key).await {
            Some(hit) => Ok(hit),
            None => {
                let fresh = $fetch.await?;
                $cache.put(&key, &fresh);
                Ok(fresh)
            }
        }
    }};
}
