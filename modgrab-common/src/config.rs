// modgrab-common/src/config.rs
use std::env;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{ModError, Result};

pub const DEFAULT_API_BASE_URL: &str = "https://api.modrinth.com/v2";
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 300;
pub const DEFAULT_WORKERS: usize = 4;
pub const DEFAULT_DOWNLOAD_DIR: &str = "mods";

/// Everything one run needs to know: the target platform, the dependency
/// policy, and the resource ceilings.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub game_version: String,
    pub loader: String,
    pub require_client: bool,
    pub require_server: bool,
    pub allow_optional: bool,
    pub workers: usize,
    pub download_dir: PathBuf,
    pub requests_per_minute: u32,
}

impl Config {
    /// Defaults for a target platform. The registry base URL can be
    /// overridden through `MODGRAB_API_BASE`.
    pub fn new(game_version: impl Into<String>, loader: impl Into<String>) -> Self {
        let api_base_url = env::var("MODGRAB_API_BASE")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        debug!("Using registry base URL: {}", api_base_url);

        Self {
            api_base_url,
            game_version: game_version.into(),
            loader: loader.into(),
            require_client: true,
            require_server: true,
            allow_optional: false,
            workers: DEFAULT_WORKERS,
            download_dir: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
            requests_per_minute: DEFAULT_REQUESTS_PER_MINUTE,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.game_version.is_empty() {
            return Err(ModError::Config("game version must not be empty".into()));
        }
        if self.loader.is_empty() {
            return Err(ModError::Config("loader must not be empty".into()));
        }
        if !self.require_client && !self.require_server {
            return Err(ModError::Config(
                "at least one of client or server support must be required".into(),
            ));
        }
        if self.workers < 1 {
            return Err(ModError::Config("worker count must be at least 1".into()));
        }
        if self.requests_per_minute < 1 {
            return Err(ModError::Config(
                "requests-per-minute ceiling must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::new("1.20.1", "fabric").validate().is_ok());
    }

    #[test]
    fn rejects_requiring_neither_side() {
        let mut config = Config::new("1.20.1", "fabric");
        config.require_client = false;
        config.require_server = false;
        assert!(matches!(config.validate(), Err(ModError::Config(_))));
    }

    #[test]
    fn rejects_zero_workers() {
        let mut config = Config::new("1.20.1", "fabric");
        config.workers = 0;
        assert!(matches!(config.validate(), Err(ModError::Config(_))));
    }
}
