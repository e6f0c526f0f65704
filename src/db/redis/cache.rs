use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use tokio::sync::mpsc;

use crate::error::AppError;
use crate::error::AppResult;

/// Keys for values cached in Redis
///
/// Only TMDb detail lookups are cached. Critic-review text is deliberately
/// never cached: sentiment must be recomputed from freshly fetched text on
/// every recommendation request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Poster reference for a movie id
    PosterRef(i64),
    /// Full TMDb detail payload for a movie id
    MovieDetail(i64),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::PosterRef(movie_id) => write!(f, "poster:{}", movie_id),
            CacheKey::MovieDetail(movie_id) => write!(f, "detail:{}", movie_id),
        }
    }
}

/// Creates a Redis client for caching
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Message for asynchronous cache writes
struct CacheWriteMessage {
    key: String,
    value: String,
    ttl: u64,
}

/// Cache handler for storing and retrieving data from Redis
///
/// Writes go through a background worker so cache population never blocks
/// a response.
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    write_tx: mpsc::UnboundedSender<CacheWriteMessage>,
}

impl Cache {
    /// Creates a new Cache instance with an async write background task
    pub fn new(redis_client: Client) -> Self {
        let (write_tx, write_rx) = mpsc::unbounded_channel();

        let client = redis_client.clone();
        tokio::spawn(async move {
            Self::cache_writer_task(client, write_rx).await;
        });

        Self {
            redis_client,
            write_tx,
        }
    }

    /// Background task that drains cache write messages
    async fn cache_writer_task(client: Client, mut write_rx: mpsc::UnboundedReceiver<CacheWriteMessage>) {
        tracing::info!("Cache writer task started");

        while let Some(msg) = write_rx.recv().await {
            if let Err(e) = Self::write_to_redis(&client, msg).await {
                tracing::error!(error = %e, "Failed to write to Redis cache");
            }
        }

        tracing::info!("Cache writer task stopped");
    }

    /// Writes a single message to Redis
    async fn write_to_redis(client: &Client, msg: CacheWriteMessage) -> AppResult<()> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(msg.key, msg.value, msg.ttl).await?;
        Ok(())
    }

    /// Retrieves a value from the cache by key
    ///
    /// Returns `None` on a miss. Deserialization failures surface as errors
    /// rather than being treated as misses.
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(format!("{}", key)).await?;

        match cached {
            Some(json) => {
                let data = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    /// Stores a value in the cache asynchronously without blocking
    ///
    /// Serializes the value and hands it to the background worker; the
    /// Redis write happens later, so this returns immediately and gives no
    /// confirmation the write succeeded.
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let msg = CacheWriteMessage {
            key: format!("{}", key),
            value: json,
            ttl,
        };

        if let Err(e) = self.write_tx.send(msg) {
            tracing::error!(error = %e, "Failed to send cache write message");
        }
    }
}
