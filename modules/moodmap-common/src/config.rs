use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Result count returned by search when the caller does not supply a limit.
    pub default_search_limit: usize,
    /// Minimum closure weight for a mood to count as "related" in catalog queries.
    pub min_related_weight: f64,
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults.
    /// Panics with a clear message if a variable is present but malformed.
    pub fn from_env() -> Self {
        Self {
            default_search_limit: env::var("DEFAULT_SEARCH_LIMIT")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("DEFAULT_SEARCH_LIMIT must be a number"),
            min_related_weight: env::var("MIN_RELATED_WEIGHT")
                .unwrap_or_else(|_| "0.1".to_string())
                .parse()
                .expect("MIN_RELATED_WEIGHT must be a number"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_search_limit: 10,
            min_related_weight: 0.1,
        }
    }
}
