//! Global client configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables (and a `.env`
//! file when present). Tests override individual fields through the setters.

use std::env;
use std::str::FromStr;
use std::sync::{OnceLock, RwLock};

/// Represents the complete client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub api_base_url: String,
    pub storage_dir: String,
    pub request_timeout_secs: u64,
    pub page_limit: u32,
    pub user_storage_key: String,
    pub token_storage_key: String,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.into())
}

fn parsed_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// Every key has a default, so this never fails; malformed numeric values
    /// fall back to their defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            env: var_or("APP_ENV", "development"),
            project_name: var_or("PROJECT_NAME", "vividstream"),
            log_level: var_or("LOG_LEVEL", "info"),
            log_dir: var_or("LOG_DIR", "logs"),
            log_file: var_or("LOG_FILE", "vividstream.log"),
            log_to_stdout: var_or("LOG_TO_STDOUT", "false") == "true",
            api_base_url: var_or("API_BASE_URL", "http://localhost:3000/api")
                .trim_end_matches('/')
                .to_string(),
            storage_dir: var_or("STORAGE_DIR", ".vividstream"),
            request_timeout_secs: parsed_or("REQUEST_TIMEOUT_SECS", 15),
            page_limit: parsed_or("PAGE_LIMIT", 10),
            user_storage_key: var_or("USER_STORAGE_KEY", "vividstream_user"),
            token_storage_key: var_or("TOKEN_STORAGE_KEY", "token"),
        }
    }

    /// Returns a snapshot of the global configuration.
    ///
    /// A poisoned lock still yields the last written value.
    pub fn global() -> AppConfig {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        match lock.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            let mut guard = match lock.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            *guard = AppConfig::from_env();
        }
    }

    /// Generic internal setter for any field in the config.
    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = match lock.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    pub fn set_env(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.env = value.into());
    }

    pub fn set_log_level(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.log_level = value.into());
    }

    pub fn set_log_to_stdout(value: bool) {
        AppConfig::set_field(|cfg| cfg.log_to_stdout = value);
    }

    /// Override the API base URL. A trailing slash is dropped.
    pub fn set_api_base_url(value: impl Into<String>) {
        let value: String = value.into();
        AppConfig::set_field(|cfg| cfg.api_base_url = value.trim_end_matches('/').to_string());
    }

    pub fn set_storage_dir(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.storage_dir = value.into());
    }

    pub fn set_request_timeout_secs(value: u64) {
        AppConfig::set_field(|cfg| cfg.request_timeout_secs = value);
    }

    pub fn set_page_limit(value: u32) {
        AppConfig::set_field(|cfg| cfg.page_limit = value);
    }
}
