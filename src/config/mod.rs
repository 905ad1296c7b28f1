use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Backend root; endpoint paths are joined onto it
    pub base_url: String,
    pub timeout_secs: u64,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive when RUST_LOG is unset
    pub filter: String,
    pub debug_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Where persisted tokens live; `None` means ~/.config/mdir
    pub state_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("MDIR_API_URL") {
            if !v.trim().is_empty() {
                self.api.base_url = v.trim().to_string();
            }
        }
        if let Ok(v) = env::var("MDIR_API_TIMEOUT_SECS") {
            self.api.timeout_secs = v.parse().unwrap_or(self.api.timeout_secs);
        }
        if let Ok(v) = env::var("MDIR_API_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }

        if let Ok(v) = env::var("MDIR_LOG") {
            self.logging.filter = v;
        }
        if let Ok(v) = env::var("MDIR_DEBUG_LOGGING") {
            self.logging.debug_logging = v.parse().unwrap_or(self.logging.debug_logging);
        }

        if let Ok(v) = env::var("MDIR_STATE_DIR") {
            self.storage.state_dir = Some(PathBuf::from(v));
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: "http://localhost:8000/api/".to_string(),
                timeout_secs: 30,
                enable_request_logging: true,
            },
            logging: LoggingConfig {
                filter: "member_directory=debug,mdir=debug".to_string(),
                debug_logging: true,
            },
            storage: StorageConfig { state_dir: None },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                base_url: "https://staging.example.org/api/".to_string(),
                timeout_secs: 15,
                enable_request_logging: true,
            },
            logging: LoggingConfig {
                filter: "member_directory=info".to_string(),
                debug_logging: false,
            },
            storage: StorageConfig { state_dir: None },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                base_url: "https://experts.example.org/api/".to_string(),
                timeout_secs: 10,
                enable_request_logging: false,
            },
            logging: LoggingConfig {
                filter: "warn".to_string(),
                debug_logging: false,
            },
            storage: StorageConfig { state_dir: None },
        }
    }

    /// Directory holding persisted session state
    pub fn state_dir(&self) -> anyhow::Result<PathBuf> {
        if let Some(dir) = &self.storage.state_dir {
            return Ok(dir.clone());
        }
        let home = env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        Ok(PathBuf::from(home).join(".config").join("mdir"))
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_development {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Development)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_points_at_a_local_backend() {
        let config = AppConfig::development();
        assert!(config.api.base_url.starts_with("http://localhost"));
        assert!(config.api.base_url.ends_with('/'));
        assert!(config.logging.debug_logging);
    }

    #[test]
    fn production_is_quiet_and_strict() {
        let config = AppConfig::production();
        assert!(config.api.base_url.starts_with("https://"));
        assert!(!config.api.enable_request_logging);
        assert_eq!(config.api.timeout_secs, 10);
    }

    #[test]
    fn explicit_state_dir_wins() {
        let mut config = AppConfig::development();
        config.storage.state_dir = Some(PathBuf::from("/tmp/mdir-test"));
        assert_eq!(config.state_dir().unwrap(), PathBuf::from("/tmp/mdir-test"));
    }
}
