use anyhow::Context;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::scrapers::RetryPolicy;

pub const DEFAULT_BASE_URL: &str = "https://www.expat-dakar.com";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub rate_limit_retries: u32,
    pub rate_limit_backoff: Duration,
    /// `None` keeps cached results for the life of the process
    pub cache_ttl: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            rate_limit_retries: 3,
            rate_limit_backoff: Duration::from_millis(1000),
            cache_ttl: None,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            base_url: lookup("EXPAT_BASE_URL").unwrap_or(defaults.base_url),
            user_agent: lookup("SCOUT_USER_AGENT").unwrap_or(defaults.user_agent),
            timeout: parse_var(&lookup, "SCOUT_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            rate_limit_retries: parse_var(&lookup, "SCOUT_RATE_LIMIT_RETRIES")?
                .unwrap_or(defaults.rate_limit_retries),
            rate_limit_backoff: parse_var(&lookup, "SCOUT_RATE_LIMIT_BACKOFF_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.rate_limit_backoff),
            cache_ttl: parse_var(&lookup, "SCOUT_CACHE_TTL_SECS")?.map(Duration::from_secs),
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.rate_limit_retries,
            initial_backoff: self.rate_limit_backoff,
            ..RetryPolicy::default()
        }
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("invalid value {raw:?} for {key}"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert_eq!(cfg.rate_limit_retries, 3);
        assert_eq!(cfg.cache_ttl, None);
    }

    #[test]
    fn reads_overrides() {
        let cfg = config(&[
            ("EXPAT_BASE_URL", "http://localhost:8080"),
            ("SCOUT_TIMEOUT_SECS", "5"),
            ("SCOUT_RATE_LIMIT_RETRIES", "0"),
            ("SCOUT_RATE_LIMIT_BACKOFF_MS", "250"),
            ("SCOUT_CACHE_TTL_SECS", " 600 "),
        ])
        .unwrap();

        assert_eq!(cfg.base_url, "http://localhost:8080");
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.cache_ttl, Some(Duration::from_secs(600)));

        let retry = cfg.retry_policy();
        assert_eq!(retry.max_retries, 0);
        assert_eq!(retry.initial_backoff, Duration::from_millis(250));
    }

    #[test]
    fn invalid_number_names_the_variable() {
        let err = config(&[("SCOUT_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(err.to_string().contains("SCOUT_TIMEOUT_SECS"));
    }
}
