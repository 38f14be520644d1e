//! Redis-backed key-value store.
//!
//! Keys map one-to-one onto Redis string keys. Values are written with plain
//! `SET` (no expiry); anything Redis evicts or expires on its own is simply
//! absent on the next `get`.

/// Backend name reported in errors and metrics.
const BACKEND: &str = "redis";

#[cfg(feature = "redis")]
mod implementation {
    use super::BACKEND;
    use crate::models::KeyValuePair;
    use crate::storage::traits::KeyValueStore;
    use crate::{Error, Result};
    use async_trait::async_trait;
    use redis::AsyncCommands;
    use redis::aio::ConnectionManager;

    /// Redis-backed key-value store.
    ///
    /// Holds one multiplexed [`ConnectionManager`] for the process lifetime;
    /// clones of it share the underlying connection and reconnect on failure.
    #[derive(Clone)]
    pub struct RedisStore {
        /// Shared connection manager.
        manager: ConnectionManager,
    }

    impl RedisStore {
        /// Connects to Redis and verifies the connection with `PING`.
        ///
        /// # Errors
        ///
        /// Returns an error if the URL is invalid, the server is unreachable,
        /// or the liveness check fails.
        pub async fn connect(connection_url: &str) -> Result<Self> {
            let client = redis::Client::open(connection_url)?;
            let manager = ConnectionManager::new(client).await?;

            let store = Self { manager };
            store.ping().await?;

            tracing::debug!(backend = BACKEND, "Redis connection established");
            Ok(store)
        }

        /// Sends `PING` and expects `PONG`.
        ///
        /// # Errors
        ///
        /// Returns the client error if the command fails.
        pub async fn ping(&self) -> Result<()> {
            let mut conn = self.manager.clone();
            let reply: String = redis::cmd("PING").query_async(&mut conn).await?;
            if reply.eq_ignore_ascii_case("PONG") {
                Ok(())
            } else {
                Err(Error::OperationFailed {
                    operation: "redis_ping".to_string(),
                    cause: format!("unexpected reply: {reply}"),
                })
            }
        }
    }

    #[async_trait]
    impl KeyValueStore for RedisStore {
        fn name(&self) -> &'static str {
            BACKEND
        }

        async fn get(&self, key: &str) -> Result<KeyValuePair> {
            let mut conn = self.manager.clone();
            let value: Option<String> = conn.get(key).await?;

            value
                .map(|value| KeyValuePair::new(key, value))
                .ok_or(Error::KeyNotFound { backend: BACKEND })
        }

        async fn set(&self, pair: &KeyValuePair) -> Result<()> {
            let mut conn = self.manager.clone();
            let _: () = conn.set(&pair.key, &pair.value).await?;
            Ok(())
        }
    }
}

#[cfg(feature = "redis")]
pub use implementation::RedisStore;

#[cfg(not(feature = "redis"))]
mod stub {
    use super::BACKEND;
    use crate::models::KeyValuePair;
    use crate::storage::traits::KeyValueStore;
    use crate::{Error, Result};
    use async_trait::async_trait;

    /// Stub Redis store when feature is not enabled.
    pub struct RedisStore;

    impl RedisStore {
        /// Connects to Redis (stub).
        ///
        /// # Errors
        ///
        /// Always returns an error because the feature is not enabled.
        pub async fn connect(_connection_url: &str) -> Result<Self> {
            Err(Error::FeatureNotEnabled(BACKEND.to_string()))
        }
    }

    #[async_trait]
    impl KeyValueStore for RedisStore {
        fn name(&self) -> &'static str {
            BACKEND
        }

        async fn get(&self, _key: &str) -> Result<KeyValuePair> {
            Err(Error::FeatureNotEnabled(BACKEND.to_string()))
        }

        async fn set(&self, _pair: &KeyValuePair) -> Result<()> {
            Err(Error::FeatureNotEnabled(BACKEND.to_string()))
        }
    }
}

#[cfg(not(feature = "redis"))]
pub use stub::RedisStore;
