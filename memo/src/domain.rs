use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::{Result, TtlSecs};
use std::time::Duration;

pub const CONTENT_TYPE_JSON: &str = "application/json";

pub mod response {
    #[derive(Clone, Debug)]
    pub struct PutResponse {
        pub created: bool,
        pub message: String,
    }

    impl PutResponse {
        pub fn new(created: bool, message: impl Into<String>) -> Self {
            Self {
                created,
                message: message.into(),
            }
        }
    }
}

/// Synthetic locator an entry is stored under
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A cached value: byte body plus header-like metadata
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredEntry {
    pub body: Bytes,
    pub content_type: String,
    pub cache_control: String,
}

impl StoredEntry {
    pub fn new(
        body: impl Into<Bytes>,
        content_type: impl Into<String>,
        cache_control: impl Into<String>,
    ) -> Self {
        Self {
            body: body.into(),
            content_type: content_type.into(),
            cache_control: cache_control.into(),
        }
    }

    /// Serialize `value` as a JSON entry that the store should keep for `ttl`
    pub fn json<T: Serialize + ?Sized>(value: &T, ttl: TtlSecs) -> Result<Self> {
        let body = serde_json::to_vec(value)?;
        Ok(Self::new(
            body,
            CONTENT_TYPE_JSON,
            format!("max-age={}", ttl.0),
        ))
    }

    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// `max-age` directive of the cache-control value, if present and well formed
    pub fn max_age(&self) -> Option<Duration> {
        self.cache_control
            .split(',')
            .filter_map(|directive| directive.trim().split_once('='))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("max-age"))
            .and_then(|(_, secs)| secs.trim().trim_matches('"').parse::<u64>().ok())
            .map(Duration::from_secs)
    }
}
