use crate::error::QuoteError;
use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Fixed category label given to every record fetched from the remote source.
pub const SERVER_CATEGORY: &str = "Server";

/// Prefix of the environment variables read by [`Config::from_env`].
pub const ENV_PREFIX: &str = "QUOTES_";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub listen_addr: String,
    pub database_url: String,
    pub loglevel: String,
    pub remote_url: Url,
    pub proxy: Option<Url>,
    pub sync_interval_secs: u64,
    pub sync_batch_size: usize,
    /// Also POST every newly added quote to `remote_url`.
    pub post_new_quotes: bool,
    /// A quotes file imported once at startup.
    pub import_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            database_url: "sqlite://quotes.db".to_string(),
            loglevel: "info".to_string(),
            remote_url: Url::parse("https://jsonplaceholder.typicode.com/posts")
                .expect("default remote url is valid"),
            proxy: None,
            sync_interval_secs: 60,
            sync_batch_size: 5,
            post_new_quotes: false,
            import_path: None,
        }
    }
}

impl Config {
    /// Defaults overlaid with `QUOTES_*` environment variables.
    pub fn from_env() -> Result<Self, QuoteError> {
        Self::figment()
            .extract()
            .map_err(|e| QuoteError::Config(Box::new(e)))
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("QUOTES_SYNC_INTERVAL_SECS", "15");
            jail.set_env("QUOTES_SYNC_BATCH_SIZE", "3");
            jail.set_env("QUOTES_REMOTE_URL", "http://localhost:9000/items");

            let cfg = Config::from_env().expect("config should extract");
            assert_eq!(cfg.sync_interval_secs, 15);
            assert_eq!(cfg.sync_batch_size, 3);
            assert_eq!(cfg.remote_url.as_str(), "http://localhost:9000/items");
            assert_eq!(cfg.loglevel, "info");
            assert!(cfg.import_path.is_none());
            Ok(())
        });
    }

    #[test]
    fn zero_interval_is_clamped() {
        let cfg = Config {
            sync_interval_secs: 0,
            ..Config::default()
        };
        assert_eq!(cfg.sync_interval(), Duration::from_secs(1));
    }
}
