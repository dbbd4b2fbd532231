// src/config.rs
use std::time::Duration;

/// Runtime knobs, read once at startup. Defaults match the observed
/// production behavior; every value can be overridden by env var.
#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub db_path: String,
    /// Minimum time between checks of the same target.
    pub cooldown_hours: i64,
    /// Classifier verdicts below this score are treated as no-change.
    pub min_confidence: f64,
    pub fetch_timeout: Duration,
    /// Pause between targets so we don't hammer external origins.
    pub inter_target_delay: Duration,
    /// Time between scheduled check cycles.
    pub cycle_interval: Duration,
    /// Character budget for the diff context sent to the classifier.
    pub max_context_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            db_path: "pricewatch.sqlite3".to_string(),
            cooldown_hours: 24,
            min_confidence: 0.6,
            fetch_timeout: Duration::from_secs(15),
            inter_target_delay: Duration::from_secs(2),
            cycle_interval: Duration::from_secs(24 * 60 * 60),
            max_context_chars: 3000,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("DATABASE_PATH") {
            config.db_path = v;
        }
        if let Some(v) = env_parse::<u16>("PORT") {
            config.port = v;
        }
        if let Some(v) = env_parse::<i64>("COOLDOWN_HOURS") {
            config.cooldown_hours = v;
        }
        if let Some(v) = env_parse::<f64>("MIN_CONFIDENCE") {
            config.min_confidence = v;
        }
        if let Some(v) = env_parse::<u64>("FETCH_TIMEOUT_SECS") {
            config.fetch_timeout = Duration::from_secs(v);
        }
        if let Some(v) = env_parse::<u64>("TARGET_DELAY_SECS") {
            config.inter_target_delay = Duration::from_secs(v);
        }
        if let Some(v) = env_parse::<u64>("CYCLE_INTERVAL_SECS") {
            config.cycle_interval = Duration::from_secs(v);
        }

        config
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
