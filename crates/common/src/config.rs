use std::time::Duration;

const DEFAULT_PAIRS: &[&str] = &["EUR/USD", "AUD/USD"];
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_INTERVAL_SECS: u64 = 60;
const DEFAULT_WARMUP_SECS: u64 = 5;

/// All configuration loaded from environment variables at startup.
///
/// Every value is optional. Missing Telegram credentials only disable
/// notifications; missing numbers fall back to their defaults.
#[derive(Debug, Clone)]
pub struct Config {
    // Market data
    pub twelvedata_api_key: Option<String>,

    // Telegram
    pub telegram_token: Option<String>,
    pub telegram_chat_id: Option<String>,

    // Status endpoint
    pub port: u16,

    // Poller
    pub pairs: Vec<String>,
    pub check_interval: Duration,
    pub warmup: Duration,
}

impl Config {
    /// Load all configuration from environment variables.
    /// Loads `.env` if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // ignore error if .env not present
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let pairs = optional("SNIPER_PAIRS")
            .map(|raw| parse_pairs(&raw))
            .filter(|pairs| !pairs.is_empty())
            .unwrap_or_else(|| DEFAULT_PAIRS.iter().map(|p| p.to_string()).collect());

        Config {
            twelvedata_api_key: optional("TWELVEDATA_API_KEY"),
            telegram_token: optional("TELEGRAM_TOKEN"),
            telegram_chat_id: optional("TELEGRAM_CHAT_ID"),
            port: optional("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            pairs,
            check_interval: Duration::from_secs(
                optional("SNIPER_INTERVAL")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_INTERVAL_SECS),
            ),
            warmup: Duration::from_secs(
                optional("SNIPER_WARMUP")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_WARMUP_SECS),
            ),
        }
    }

    /// Both the bot token and the destination chat are present.
    pub fn telegram_enabled(&self) -> bool {
        self.telegram_token.is_some() && self.telegram_chat_id.is_some()
    }
}

fn parse_pairs(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
