use crate::TtlSecs;
use tracing::warn;

pub struct Config {
    pub host: String,
    pub http_port: u16,
    pub cache_name: String,
    pub ttl: TtlSecs,
    pub debug: bool,
    pub max_entries: Option<u64>,
}

impl Config {
    const DEFAULT_HOST: &'static str = "0.0.0.0";
    const DEFAULT_HTTP_PORT: u16 = 8080;
    pub const DEFAULT_CACHE_NAME: &'static str = "default";

    pub fn from_env() -> Self {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup, so tests don't have to touch the process env
    pub fn from_source(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let http_port = parse_or(&lookup, "MEMO_HTTP_PORT", Self::DEFAULT_HTTP_PORT);
        let ttl = TtlSecs(parse_or(&lookup, "MEMO_TTL_SECS", TtlSecs::DEFAULT.0));

        let max_entries = lookup("MEMO_MAX_ENTRIES").and_then(|raw| match raw.trim().parse() {
            Ok(capacity) => Some(capacity),
            Err(_) => {
                warn!("MEMO_MAX_ENTRIES={raw:?} is not a number, partitions will be unbounded");
                None
            }
        });

        Self {
            host: lookup("MEMO_HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_string()),
            http_port,
            cache_name: lookup("MEMO_CACHE_NAME")
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| Self::DEFAULT_CACHE_NAME.to_string()),
            ttl,
            debug: lookup("MEMO_DEBUG").is_some_and(|raw| is_truthy(&raw)),
            max_entries,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_source(|_| None)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{key}={raw:?} could not be parsed, using default {default}");
            default
        }),
        None => default,
    }
}

fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_source(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.cache_name, "default");
        assert_eq!(config.ttl, TtlSecs(3600));
        assert!(!config.debug);
        assert!(config.max_entries.is_none());
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("MEMO_HOST", "127.0.0.1"),
            ("MEMO_HTTP_PORT", "9090"),
            ("MEMO_CACHE_NAME", "counters"),
            ("MEMO_TTL_SECS", "60"),
            ("MEMO_DEBUG", "TRUE"),
            ("MEMO_MAX_ENTRIES", "500"),
        ]);

        assert_eq!(config.bind_addr(), "127.0.0.1:9090");
        assert_eq!(config.cache_name, "counters");
        assert_eq!(config.ttl, TtlSecs(60));
        assert!(config.debug);
        assert_eq!(config.max_entries, Some(500));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("MEMO_HTTP_PORT", "not-a-port"),
            ("MEMO_TTL_SECS", "-5"),
            ("MEMO_CACHE_NAME", "  "),
            ("MEMO_DEBUG", "nope"),
            ("MEMO_MAX_ENTRIES", "lots"),
        ]);

        assert_eq!(config.http_port, 8080);
        assert_eq!(config.ttl, TtlSecs::DEFAULT);
        assert_eq!(config.cache_name, "default");
        assert!(!config.debug);
        assert!(config.max_entries.is_none());
    }
}
