use redis::{Client, RedisError, aio::ConnectionManager};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use uuid::Uuid;

/// JSON values in Redis behind a shared connection manager.
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
}

impl RedisCache {
    pub async fn new(redis_url: &str) -> Result<Self, RedisError> {
        let client = Client::open(redis_url)?;
        let connection = ConnectionManager::new(client).await?;
        Ok(Self { connection })
    }

    /// Read and decode a JSON value. A payload that no longer decodes into
    /// `T` surfaces as a `TypeError`, which callers treat as a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> redis::RedisResult<Option<T>> {
        let raw: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut self.connection.clone())
            .await?;

        raw.map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(|e| json_error("cached value did not decode", e))
    }

    /// Store `value` as JSON, expiring after `ttl_seconds`.
    pub async fn set<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl_seconds: u64,
    ) -> redis::RedisResult<()> {
        let json = serde_json::to_string(value)
            .map_err(|e| json_error("value could not be encoded", e))?;

        redis::cmd("SET")
            .arg(key)
            .arg(json)
            .arg("EX")
            .arg(ttl_seconds)
            .query_async(&mut self.connection.clone())
            .await
    }

    /// Drop one key.
    pub async fn delete(&self, key: &str) -> redis::RedisResult<()> {
        redis::cmd("DEL")
            .arg(key)
            .query_async(&mut self.connection.clone())
            .await
    }

    /// Drop every key matching a glob such as `artists:list:*`.
    pub async fn delete_pattern(&self, pattern: &str) -> redis::RedisResult<()> {
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(pattern)
            .query_async(&mut self.connection.clone())
            .await?;

        if !keys.is_empty() {
            let _: () = redis::cmd("DEL")
                .arg(&keys)
                .query_async(&mut self.connection.clone())
                .await?;
        }

        Ok(())
    }
}

fn json_error(what: &'static str, e: serde_json::Error) -> RedisError {
    RedisError::from((redis::ErrorKind::TypeError, what, e.to_string()))
}

/// Key layout for cached artist reads.
pub mod keys {
    use uuid::Uuid;

    pub const ARTIST_LIST_PATTERN: &str = "artists:list:*";

    /// One page of the public listing, per page size.
    pub fn artist_list(page: u64, limit: u64) -> String {
        format!("artists:list:{page}:{limit}")
    }

    /// The public detail view of a profile.
    pub fn artist(profile_id: Uuid) -> String {
        format!("artist:{profile_id}")
    }
}

/// Read-through cache for public artist reads.
///
/// Without Redis every call is a miss. Cache failures are logged and treated
/// as misses; they never fail a request.
#[derive(Clone)]
pub struct ResponseCache {
    redis: Option<RedisCache>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn disabled() -> Self {
        Self {
            redis: None,
            ttl: Duration::ZERO,
        }
    }

    pub fn new(redis: RedisCache, ttl: Duration) -> Self {
        Self {
            redis: Some(redis),
            ttl,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let redis = self.redis.as_ref()?;
        match redis.get(key).await {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!(%key, error = %e, "cache read failed");
                None
            }
        }
    }

    pub async fn put<T: Serialize>(&self, key: &str, value: &T) {
        let Some(redis) = self.redis.as_ref() else {
            return;
        };
        if let Err(e) = redis.set(key, value, self.ttl.as_secs().max(1)).await {
            tracing::warn!(%key, error = %e, "cache write failed");
        }
    }

    /// Drop everything a write to `profile_id` may have made stale.
    pub async fn invalidate_artist(&self, profile_id: Uuid) {
        let Some(redis) = self.redis.as_ref() else {
            return;
        };
        if let Err(e) = redis.delete(&keys::artist(profile_id)).await {
            tracing::warn!(%profile_id, error = %e, "cache invalidation failed");
        }
        if let Err(e) = redis.delete_pattern(keys::ARTIST_LIST_PATTERN).await {
            tracing::warn!(error = %e, "artist list invalidation failed");
        }
    }
}
