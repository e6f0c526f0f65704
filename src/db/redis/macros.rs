/// A macro to simplify caching logic using Redis.
///
/// Checks the cache for `$key`; on a hit the cached value is returned, on a
/// miss `$block` computes the value, which is stored in the background and
/// returned.
///
/// # Arguments
/// * `$cache`: The cache instance. Must expose `get_from_cache` and
///   `set_in_background`.
/// * `$key`: The key to cache the value under.
/// * `$ttl`: The time-to-live for the cached value in seconds.
/// * `$block`: The block of code to execute on a cache miss.
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        // Attempt to get the value from cache
        if let Some(cached) = $cache.get_from_cache(&$key).await? {
            Ok(cached)
        } else {
            // If not in cache, execute the block to compute the value
            let value = $block.await?;
            // Store the computed value in cache
            $cache.set_in_background(&$key, &value, $ttl);
            Ok(value)
        }
    }};
}
