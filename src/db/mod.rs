pub mod accounts;
pub mod postgres;
pub mod redis;
pub mod reviews;

pub use accounts::AccountStore;
pub use postgres::create_pool;
pub use redis::create_redis_client;
pub use redis::Cache;
pub use redis::CacheKey;
pub use reviews::ReviewStore;
