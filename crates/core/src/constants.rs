//! Constants used throughout the HealthSense core crate.
//!
//! Provider defaults and environment variable names live here so the server binary, the
//! CLI and the tests agree on them.

/// Environment variable holding the inference provider credential.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Environment variable overriding the chat-completion endpoint.
pub const PROVIDER_URL_ENV: &str = "HEALTHSENSE_PROVIDER_URL";

/// Environment variable overriding the candidate model list (comma-separated).
pub const MODELS_ENV: &str = "HEALTHSENSE_MODELS";

/// Environment variable overriding the per-call timeout in seconds.
pub const TIMEOUT_SECS_ENV: &str = "HEALTHSENSE_PROVIDER_TIMEOUT_SECS";

/// Environment variable overriding the `HTTP-Referer` sent to the provider.
pub const APP_URL_ENV: &str = "HEALTHSENSE_APP_URL";

/// Environment variable overriding the CORS allow-list (comma-separated origins).
pub const CORS_ORIGINS_ENV: &str = "HEALTHSENSE_CORS_ORIGINS";

/// Environment variable overriding the REST bind address.
pub const REST_ADDR_ENV: &str = "HEALTHSENSE_REST_ADDR";

pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:8000";

/// OpenRouter chat-completion endpoint.
pub const DEFAULT_PROVIDER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Candidate models, in the order they are attempted.
pub const DEFAULT_MODELS: &[&str] = &[
    "google/gemini-2.0-flash-exp:free",
    "meta-llama/llama-3.3-70b-instruct:free",
    "mistralai/mistral-small-3.1-24b-instruct:free",
];

/// Per-call timeout applied to every candidate attempt.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Sampling temperature sent with every attempt.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Default `HTTP-Referer` value (the web frontend's dev origin).
pub const DEFAULT_APP_URL: &str = "http://localhost:5173";

/// Client title sent as `X-Title`.
pub const APP_TITLE: &str = "HealthSense AI";

/// Frontend origins allowed by CORS when no override is configured.
pub const DEFAULT_CORS_ORIGINS: &[&str] = &["http://localhost:3000", "http://localhost:5173"];

/// Maximum characters of model output quoted in a malformed-generation error.
pub const MALFORMED_EXCERPT_CHARS: usize = 200;

/// Maximum characters of a provider envelope quoted in an unexpected-envelope error.
pub const ENVELOPE_EXCERPT_CHARS: usize = 1_000;

/// Maximum characters of a failed response body kept per candidate failure.
pub const FAILURE_BODY_CHARS: usize = 500;
