use once_cell::sync::Lazy;
use std::{env, time::Duration};

/// Holds all tunables, read-once from ENV with fallbacks.
pub struct Settings {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub default_page_size: u32,
}

impl Settings {
    fn from_env() -> Self {
        // optionally load .env
        let _ = dotenvy::dotenv();

        fn parse_u32(var: &str, default: u32) -> u32 {
            env::var(var)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }

        fn parse_secs(var: &str, default_secs: u64) -> Duration {
            env::var(var)
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or_else(|| Duration::from_secs(default_secs))
        }

        Settings {
            api_base_url: env::var("VIDORA_API_URL")
                .unwrap_or_else(|_| "http://localhost:5000/api".to_string()),
            request_timeout: parse_secs("REQUEST_TIMEOUT_SECS", 30),
            connect_timeout: parse_secs("CONNECT_TIMEOUT_SECS", 10),
            default_page_size: parse_u32("DEFAULT_PAGE_SIZE", 12),
        }
    }
}

/// Global settings instance
pub static SETTINGS: Lazy<Settings> = Lazy::new(Settings::from_env);
