//! Provider runtime configuration.
//!
//! This module defines configuration that is resolved once at process startup and then
//! passed into the assessment pipeline. Request handling never reads process-wide
//! environment variables, so tests can build any configuration they need without mutating
//! the environment.

use crate::constants::{
    API_KEY_ENV, APP_TITLE, APP_URL_ENV, CORS_ORIGINS_ENV, DEFAULT_APP_URL,
    DEFAULT_CORS_ORIGINS, DEFAULT_MODELS, DEFAULT_PROVIDER_URL, DEFAULT_TEMPERATURE,
    DEFAULT_TIMEOUT_SECS, MODELS_ENV, PROVIDER_URL_ENV, TIMEOUT_SECS_ENV,
};
use crate::{ConfigError, ConfigResult};
use reqwest::Url;
use std::time::Duration;

/// Raw provider settings as read from the environment.
///
/// Every field is optional; [`ProviderConfig::from_env_values`] applies defaults and
/// validation.
#[derive(Clone, Debug, Default)]
pub struct ProviderEnv {
    pub api_key: Option<String>,
    pub provider_url: Option<String>,
    pub models: Option<String>,
    pub timeout_secs: Option<String>,
    pub app_url: Option<String>,
}

impl ProviderEnv {
    /// Snapshot the provider variables from the process environment.
    ///
    /// Call this once at startup, after loading any `.env` file.
    pub fn from_process_env() -> Self {
        Self {
            api_key: std::env::var(API_KEY_ENV).ok(),
            provider_url: std::env::var(PROVIDER_URL_ENV).ok(),
            models: std::env::var(MODELS_ENV).ok(),
            timeout_secs: std::env::var(TIMEOUT_SECS_ENV).ok(),
            app_url: std::env::var(APP_URL_ENV).ok(),
        }
    }
}

/// Inference provider configuration resolved at startup.
///
/// The credential may be absent. The rest of the service still starts; only the analysis
/// endpoint reports that it is not configured.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    api_key: Option<String>,
    endpoint: Url,
    models: Vec<String>,
    timeout: Duration,
    temperature: f32,
    app_url: String,
    app_title: String,
}

impl ProviderConfig {
    /// Create a new `ProviderConfig`.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Provider credential; blank values are treated as absent.
    /// * `endpoint` - Chat-completion URL (must be http or https).
    /// * `models` - Candidate model identifiers in fallback order.
    /// * `timeout` - Per-call timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidInput`] if the endpoint is not an http(s) URL, the
    /// candidate list is empty or contains a blank entry, or the timeout is zero.
    pub fn new(
        api_key: Option<String>,
        endpoint: &str,
        models: Vec<String>,
        timeout: Duration,
    ) -> ConfigResult<Self> {
        let endpoint = parse_http_url("provider URL", endpoint)?;

        if models.is_empty() {
            return Err(ConfigError::InvalidInput(
                "at least one model candidate is required".into(),
            ));
        }
        if models.iter().any(|m| m.trim().is_empty()) {
            return Err(ConfigError::InvalidInput(
                "model candidates cannot be blank".into(),
            ));
        }
        if timeout.is_zero() {
            return Err(ConfigError::InvalidInput(
                "provider timeout must be greater than zero".into(),
            ));
        }

        Ok(Self {
            api_key: api_key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()),
            endpoint,
            models,
            timeout,
            temperature: DEFAULT_TEMPERATURE,
            app_url: DEFAULT_APP_URL.into(),
            app_title: APP_TITLE.into(),
        })
    }

    /// Build the configuration from raw environment values, applying defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidInput`] if any supplied value fails validation.
    pub fn from_env_values(env: ProviderEnv) -> ConfigResult<Self> {
        let endpoint = non_blank(env.provider_url).unwrap_or_else(|| DEFAULT_PROVIDER_URL.into());

        let models = match non_blank(env.models) {
            Some(raw) => split_list(&raw),
            None => DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
        };

        let timeout_secs = match non_blank(env.timeout_secs) {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                ConfigError::InvalidInput(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    TIMEOUT_SECS_ENV, raw
                ))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let mut cfg = Self::new(
            env.api_key,
            &endpoint,
            models,
            Duration::from_secs(timeout_secs),
        )?;

        if let Some(app_url) = non_blank(env.app_url) {
            cfg = cfg.with_app_url(&app_url)?;
        }

        Ok(cfg)
    }

    /// Replace the `HTTP-Referer` value sent to the provider.
    pub fn with_app_url(mut self, app_url: &str) -> ConfigResult<Self> {
        parse_http_url("app URL", app_url)?;
        self.app_url = app_url.trim().to_string();
        Ok(self)
    }

    /// Returns true when a credential is present.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn app_url(&self) -> &str {
        &self.app_url
    }

    pub fn app_title(&self) -> &str {
        &self.app_title
    }
}

/// Parse the CORS allow-list from an optional comma-separated value.
///
/// If `value` is `None` or blank, returns the frontend's development origins.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidInput`] if an entry is not an http(s) origin.
pub fn cors_origins_from_env_value(value: Option<String>) -> ConfigResult<Vec<String>> {
    let Some(raw) = non_blank(value) else {
        return Ok(DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect());
    };

    split_list(&raw)
        .into_iter()
        .map(|origin| -> ConfigResult<String> {
            parse_http_url(CORS_ORIGINS_ENV, &origin)?;
            // Browsers send the Origin header without a trailing slash.
            Ok(origin.trim_end_matches('/').to_string())
        })
        .collect()
}

fn parse_http_url(what: &str, raw: &str) -> ConfigResult<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidInput(format!("{what} '{raw}' is not a valid URL: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ConfigError::InvalidInput(format!(
            "{what} '{raw}' must be an http(s) URL with a host"
        )));
    }

    Ok(url)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
