//! Configuration handling for the survey

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Endpoint used when neither the environment nor the config file names one
pub const DEFAULT_QUESTIONS_URL: &str = "https://simple-books-api.glitch.me/books";

/// Environment variable overriding the question service address
pub const QUESTIONS_URL_ENV: &str = "SURVEY_QUESTIONS_URL";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// User configuration for the survey
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SurveyConfig {
    /// Question service address
    pub questions_url: Option<String>,
    /// Per-request timeout for question fetches
    pub request_timeout_secs: Option<u64>,
}

impl SurveyConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("io", "survey", "survey-tui")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: SurveyConfig = serde_json::from_str(&content)?;
                tracing::debug!(path = %path.display(), "loaded survey config");
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Question service address: environment, then file, then default
    pub fn questions_url(&self) -> String {
        std::env::var(QUESTIONS_URL_ENV)
            .ok()
            .or_else(|| self.questions_url.clone())
            .unwrap_or_else(|| DEFAULT_QUESTIONS_URL.to_string())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}

/// Run `test` with the question service variable set or removed, then
/// restore it. Tests that read the variable go through here so they never
/// observe each other's overrides.
#[cfg(test)]
pub(crate) fn with_questions_url_env(value: Option<&str>, test: impl FnOnce()) {
    use std::sync::{Mutex, OnceLock};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard = ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    let saved = std::env::var_os(QUESTIONS_URL_ENV);
    match value {
        Some(value) => std::env::set_var(QUESTIONS_URL_ENV, value),
        None => std::env::remove_var(QUESTIONS_URL_ENV),
    }

    test();

    match saved {
        Some(value) => std::env::set_var(QUESTIONS_URL_ENV, value),
        None => std::env::remove_var(QUESTIONS_URL_ENV),
    }
}
