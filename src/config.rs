use dotenv::dotenv;
use std::env;

const EVENT_CAPACITY: &str = "EVENT_CAPACITY";
const LOG_FILTER: &str = "LOG_FILTER";

/// Runtime configuration, loaded once at process start.
#[derive(Debug, Clone)]
pub struct Config {
    /// Capacity of the `EventBus` broadcast channel.
    pub event_capacity: usize,
    /// `tracing-subscriber` env-filter directive, e.g. "info" or "matching_engine=debug".
    pub log_filter: String,
}

impl Config {
    /// Loads configuration from the environment (and `.env` if present), falling
    /// back to sensible defaults rather than panicking — there is no required
    /// external service to reach at startup, unlike the façade this crate's
    /// Non-goals exclude.
    pub fn from_env() -> Config {
        dotenv().ok();

        let event_capacity = env::var(EVENT_CAPACITY)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1024);
        let log_filter = env::var(LOG_FILTER).unwrap_or_else(|_| "info".to_string());

        Config {
            event_capacity,
            log_filter,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            event_capacity: 1024,
            log_filter: "info".to_string(),
        }
    }
}
