// shared/src/lib.rs

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("invalid cache key: {0}")]
    InvalidKey(String),
    #[error("storage: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Time-to-live in whole seconds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TtlSecs(pub u64);

impl TtlSecs {
    pub const DEFAULT: TtlSecs = TtlSecs(3600);
}

impl Default for TtlSecs {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for TtlSecs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub mod config;
