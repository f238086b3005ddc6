use crate::models::FindMatchesResponse;
use moka::future::Cache;
use redis::aio::ConnectionManager;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors that can occur with the match cache
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalidation error: {0}")]
    InvalidationError(String),
}

/// Short-lived store of computed match lists
///
/// Redis holds one hash per user (`matches:<user>`) with a field per limit,
/// so a refresh drops every limit of that user in a single `DEL`. The hash
/// expires `ttl_secs` after its last write. A `moka` tier in front mirrors
/// individual fields for this process.
pub struct MatchCache {
    redis: Arc<Mutex<ConnectionManager>>,
    local: Cache<(String, usize), Arc<FindMatchesResponse>>,
    ttl_secs: u64,
}

impl MatchCache {
    /// Connect to Redis and size the in-process tier
    pub async fn connect(redis_url: &str, local_capacity: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;

        let local = Cache::builder()
            .max_capacity(local_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .support_invalidation_closures()
            .build();

        Ok(Self {
            redis: Arc::new(Mutex::new(redis)),
            local,
            ttl_secs,
        })
    }

    /// Cached match list for `user_id` at `limit`, if any
    pub async fn get_matches(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Option<FindMatchesResponse>, CacheError> {
        let local_key = (user_id.to_string(), limit);

        if let Some(hit) = self.local.get(&local_key).await {
            tracing::trace!("Local match cache hit: {}/{}", user_id, limit);
            return Ok(Some(FindMatchesResponse::clone(&hit)));
        }

        let stored: Option<String> = {
            let mut conn = self.redis.lock().await;
            redis::cmd("HGET")
                .arg(user_key(user_id))
                .arg(limit)
                .query_async(&mut *conn)
                .await?
        };

        let Some(json) = stored else {
            return Ok(None);
        };

        let response: FindMatchesResponse = serde_json::from_str(&json)?;
        self.local.insert(local_key, Arc::new(response.clone())).await;

        tracing::trace!("Redis match cache hit: {}/{}", user_id, limit);
        Ok(Some(response))
    }

    /// Store a freshly computed match list
    pub async fn put_matches(
        &self,
        user_id: &str,
        limit: usize,
        response: &FindMatchesResponse,
    ) -> Result<(), CacheError> {
        let json = serde_json::to_string(response)?;
        let key = user_key(user_id);

        {
            let mut conn = self.redis.lock().await;
            let _: () = redis::pipe()
                .atomic()
                .cmd("HSET").arg(&key).arg(limit).arg(json).ignore()
                .cmd("EXPIRE").arg(&key).arg(self.ttl_secs).ignore()
                .query_async(&mut *conn)
                .await?;
        }

        self.local
            .insert((user_id.to_string(), limit), Arc::new(response.clone()))
            .await;

        Ok(())
    }

    /// Drop every cached list of `user_id`, whatever the limit
    pub async fn invalidate_user(&self, user_id: &str) -> Result<(), CacheError> {
        let owner = user_id.to_string();
        self.local
            .invalidate_entries_if(move |key, _| key.0 == owner)
            .map_err(|e| CacheError::InvalidationError(e.to_string()))?;

        let mut conn = self.redis.lock().await;
        let _: () = redis::cmd("DEL")
            .arg(user_key(user_id))
            .query_async(&mut *conn)
            .await?;

        tracing::debug!("Invalidated cached matches for {}", user_id);
        Ok(())
    }
}

/// Redis key of a user's match hash
pub fn user_key(user_id: &str) -> String {
    format!("matches:{}", user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(limit: usize) -> FindMatchesResponse {
        FindMatchesResponse {
            matches: Vec::new(),
            total_candidates: 3,
            limit,
        }
    }

    #[tokio::test]
    #[ignore = "Requires Redis"]
    async fn test_refresh_drops_every_limit() {
        let cache = MatchCache::connect("redis://127.0.0.1:6379", 100, 60)
            .await
            .expect("Failed to connect to Redis");

        let user = format!("cache-test-{}", uuid::Uuid::new_v4());

        cache.put_matches(&user, 5, &response(5)).await.unwrap();
        cache.put_matches(&user, 20, &response(20)).await.unwrap();

        let hit = cache.get_matches(&user, 20).await.unwrap().unwrap();
        assert_eq!(hit.limit, 20);
        assert!(cache.get_matches(&user, 7).await.unwrap().is_none());

        cache.invalidate_user(&user).await.unwrap();

        assert!(cache.get_matches(&user, 5).await.unwrap().is_none());
        assert!(cache.get_matches(&user, 20).await.unwrap().is_none());
    }

    #[test]
    fn test_user_key() {
        assert_eq!(user_key("user123"), "matches:user123");
    }
}
