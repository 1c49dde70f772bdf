pub mod analytics;
pub mod client;
pub mod domain;
pub mod recommend;
pub mod wizard;

pub mod config {
    use anyhow::Context;
    use std::time::Duration;

    const DEFAULT_PORT: u16 = 3001;
    const DEFAULT_API_URL: &str = "http://localhost:3001";
    const DEFAULT_API_TIMEOUT_SECS: u64 = 5;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub port: u16,
        pub sentry_dsn: Option<String>,
        pub crop_profiles_path: Option<String>,
        pub api_url: String,
        pub api_timeout: Duration,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let port = match std::env::var("PORT") {
                Ok(v) => v
                    .parse::<u16>()
                    .with_context(|| format!("PORT must be a port number (got {v:?})"))?,
                Err(_) => DEFAULT_PORT,
            };

            let api_timeout_secs = match std::env::var("MANDI_API_TIMEOUT_SECS") {
                Ok(v) => v.parse::<u64>().with_context(|| {
                    format!("MANDI_API_TIMEOUT_SECS must be a whole number of seconds (got {v:?})")
                })?,
                Err(_) => DEFAULT_API_TIMEOUT_SECS,
            };

            Ok(Self {
                port,
                sentry_dsn: non_empty_var("SENTRY_DSN"),
                crop_profiles_path: non_empty_var("CROP_PROFILES_PATH"),
                api_url: non_empty_var("MANDI_API_URL")
                    .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
                api_timeout: Duration::from_secs(api_timeout_secs),
            })
        }
    }

    impl Default for Settings {
        fn default() -> Self {
            Self {
                port: DEFAULT_PORT,
                sentry_dsn: None,
                crop_profiles_path: None,
                api_url: DEFAULT_API_URL.to_string(),
                api_timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
            }
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|s| !s.trim().is_empty())
    }
}
