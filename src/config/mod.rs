//! Configuration module for the roster client.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::ClientError;
use crate::models::{FormOptions, JobFunction, Role};

/// Wording of the success toasts, one per mutation kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastMessages {
    pub created: String,
    pub updated: String,
    pub deleted: String,
}

impl Default for ToastMessages {
    fn default() -> Self {
        Self {
            created: "New Member Added".to_string(),
            updated: "Member Updated".to_string(),
            deleted: "Member Deleted".to_string(),
        }
    }
}

/// Log output format for the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote collection service
    pub base_url: String,
    /// Path of the member collection below the base URL
    pub collection_path: String,
    /// Pre-shared API key sent with every request
    pub api_key: Option<String>,
    /// Quiet period before a query change is fetched
    pub debounce: Duration,
    /// How long a toast stays visible
    pub toast_duration: Duration,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,
    pub toast_messages: ToastMessages,
    pub form_options: FormOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            collection_path: "/api/team-members".to_string(),
            api_key: None,
            debounce: Duration::from_millis(300),
            toast_duration: Duration::from_millis(3200),
            request_timeout: Duration::from_millis(10_000),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            toast_messages: ToastMessages::default(),
            form_options: FormOptions::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ClientError> {
        dotenvy::dotenv().ok();
        Self::from_vars()
    }

    /// Load a specific dotenv file, then read the environment.
    pub fn from_env_file(path: &Path) -> Result<Self, ClientError> {
        dotenvy::from_path(path).map_err(|e| {
            ClientError::Config(format!("Failed to load {}: {}", path.display(), e))
        })?;
        Self::from_vars()
    }

    fn from_vars() -> Result<Self, ClientError> {
        let defaults = Config::default();

        let base_url = env::var("ROSTER_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.base_url);

        let collection_path = env::var("ROSTER_COLLECTION_PATH")
            .map(|path| normalize_path(&path))
            .unwrap_or(defaults.collection_path);

        let api_key = env::var("ROSTER_API_KEY").ok().filter(|k| !k.is_empty());

        let debounce = millis_var("ROSTER_DEBOUNCE_MS")?.unwrap_or(defaults.debounce);
        let toast_duration = millis_var("ROSTER_TOAST_MS")?.unwrap_or(defaults.toast_duration);
        let request_timeout =
            millis_var("ROSTER_REQUEST_TIMEOUT_MS")?.unwrap_or(defaults.request_timeout);

        let log_level = env::var("ROSTER_LOG_LEVEL").unwrap_or(defaults.log_level);
        let log_format = match env::var("ROSTER_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("pretty") | Err(_) => LogFormat::Pretty,
            Ok(other) => {
                return Err(ClientError::Config(format!(
                    "Invalid ROSTER_LOG_FORMAT '{}' (expected pretty or json)",
                    other
                )))
            }
        };

        let toast_messages = ToastMessages {
            created: env::var("ROSTER_TOAST_CREATED").unwrap_or(defaults.toast_messages.created),
            updated: env::var("ROSTER_TOAST_UPDATED").unwrap_or(defaults.toast_messages.updated),
            deleted: env::var("ROSTER_TOAST_DELETED").unwrap_or(defaults.toast_messages.deleted),
        };

        let functions = list_var("ROSTER_FUNCTION_OPTIONS", JobFunction::parse)?
            .unwrap_or_else(|| JobFunction::ALL.to_vec());
        let roles = list_var("ROSTER_ROLE_OPTIONS", Role::parse)?.unwrap_or_else(|| Role::ALL.to_vec());

        Ok(Self {
            base_url,
            collection_path,
            api_key,
            debounce,
            toast_duration,
            request_timeout,
            log_level,
            log_format,
            toast_messages,
            form_options: FormOptions::new(functions, roles),
        })
    }

    /// Full URL of the member collection.
    pub fn collection_url(&self) -> String {
        format!("{}{}", self.base_url, self.collection_path)
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

fn millis_var(name: &str) -> Result<Option<Duration>, ClientError> {
    match env::var(name) {
        Ok(raw) => u64::from_str(raw.trim())
            .map(|ms| Some(Duration::from_millis(ms)))
            .map_err(|_| ClientError::Config(format!("Invalid {} '{}'", name, raw))),
        Err(_) => Ok(None),
    }
}

fn list_var<T>(name: &str, parse: impl Fn(&str) -> Option<T>) -> Result<Option<Vec<T>>, ClientError> {
    let Ok(raw) = env::var(name) else {
        return Ok(None);
    };
    let values = raw
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| {
            parse(part).ok_or_else(|| {
                ClientError::Config(format!("Invalid value '{}' in {}", part.trim(), name))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    if values.is_empty() {
        return Err(ClientError::Config(format!("{} must not be empty", name)));
    }
    Ok(Some(values))
}
