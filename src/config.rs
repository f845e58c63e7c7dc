use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_ANSWERS_CACHE: &str = "answers.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub store_url: Option<String>,
    pub store_api_key: Option<String>,
    pub store_timeout: Duration,
    pub answers_cache: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            store_url: None,
            store_api_key: None,
            store_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            answers_cache: PathBuf::from(DEFAULT_ANSWERS_CACHE),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build the config from a variable lookup. Blank values count as unset.
    pub fn from_vars<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|s| !s.trim().is_empty());

        let store_url = var("PROFILE_STORE_URL")
            .map(|url| {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    anyhow::bail!("PROFILE_STORE_URL must start with http:// or https://");
                }
                Ok(url.trim_end_matches('/').to_string())
            })
            .transpose()?;

        let timeout_secs: u64 = var("PROFILE_STORE_TIMEOUT_SECS")
            .unwrap_or_else(|| DEFAULT_TIMEOUT_SECS.to_string())
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("PROFILE_STORE_TIMEOUT_SECS must be a number of seconds"))?;
        if !(1..=60).contains(&timeout_secs) {
            anyhow::bail!("PROFILE_STORE_TIMEOUT_SECS must be between 1 and 60");
        }

        let config = Config {
            store_url,
            store_api_key: var("PROFILE_STORE_API_KEY"),
            store_timeout: Duration::from_secs(timeout_secs),
            answers_cache: var("ANSWERS_CACHE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ANSWERS_CACHE)),
        };

        tracing::debug!(
            store_configured = config.store_url.is_some(),
            timeout_secs,
            cache = %config.answers_cache.display(),
            "configuration loaded"
        );
        Ok(config)
    }
}
