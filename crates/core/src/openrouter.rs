//! OpenRouter chat-completion client.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};

use crate::constants::FAILURE_BODY_CHARS;
use crate::error::excerpt;
use crate::provider::{CompletionProvider, CompletionRequest};
use crate::{ConfigError, ConfigResult, ProviderConfig, ProviderFailure};

/// HTTP client for an OpenAI-compatible chat-completion endpoint (OpenRouter by default).
///
/// Every request carries the bearer credential, a JSON content type, an `HTTP-Referer`
/// identifying the web app and an `X-Title` naming the client. The connection pool is shared
/// by all concurrent analyses.
#[derive(Clone)]
pub struct OpenRouterClient {
    client: reqwest::Client,
    endpoint: reqwest::Url,
    api_key: Option<String>,
    timeout_secs: u64,
}

impl OpenRouterClient {
    /// Create a client from the resolved provider configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a header value is not valid HTTP or the underlying client
    /// cannot be built.
    pub fn new(config: &ProviderConfig) -> ConfigResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("http-referer", header_value("app URL", config.app_url())?);
        headers.insert("x-title", header_value("app title", config.app_title())?);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            client,
            endpoint: config.endpoint().clone(),
            api_key: config.api_key().map(str::to_string),
            timeout_secs: config.timeout().as_secs(),
        })
    }

    fn classify(&self, err: reqwest::Error) -> ProviderFailure {
        if err.is_timeout() {
            ProviderFailure::Timeout(self.timeout_secs)
        } else {
            ProviderFailure::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenRouterClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderFailure> {
        let mut builder = self.client.post(self.endpoint.clone()).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderFailure::Status {
                status: status.as_u16(),
                body: excerpt(&body, FAILURE_BODY_CHARS),
            });
        }

        response.text().await.map_err(|e| self.classify(e))
    }
}

fn header_value(what: &str, value: &str) -> ConfigResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| ConfigError::InvalidInput(format!("{what} is not a valid header value: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{ChatMessage, Role};
    use axum::{
        extract::State,
        http::{HeaderMap as AxumHeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct Captured {
        headers: Arc<Mutex<Vec<AxumHeaderMap>>>,
        bodies: Arc<Mutex<Vec<serde_json::Value>>>,
    }

    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub");
        let addr = listener.local_addr().expect("stub addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("serve stub");
        });
        format!("http://{addr}/api/v1/chat/completions")
    }

    fn config_for(endpoint: &str, timeout: Duration) -> ProviderConfig {
        ProviderConfig::new(
            Some("sk-test".into()),
            endpoint,
            vec!["vendor/model".into()],
            timeout,
        )
        .expect("config")
    }

    fn request() -> CompletionRequest {
        CompletionRequest::new(
            "vendor/model",
            vec![ChatMessage {
                role: Role::User,
                content: "hi".into(),
            }],
            0.3,
        )
    }

    #[tokio::test]
    async fn sends_headers_and_body_and_returns_raw_envelope() {
        let captured = Captured::default();
        let router = Router::new()
            .route(
                "/api/v1/chat/completions",
                post(
                    |State(captured): State<Captured>,
                     headers: AxumHeaderMap,
                     Json(body): Json<serde_json::Value>| async move {
                        captured.headers.lock().expect("lock").push(headers);
                        captured.bodies.lock().expect("lock").push(body);
                        r#"{"choices":[{"message":{"content":"{}"}}]}"#
                    },
                ),
            )
            .with_state(captured.clone());
        let endpoint = spawn_stub(router).await;

        let client = OpenRouterClient::new(&config_for(&endpoint, Duration::from_secs(5)))
            .expect("client");
        let body = client.complete(&request()).await.expect("success");
        assert_eq!(body, r#"{"choices":[{"message":{"content":"{}"}}]}"#);

        let headers = captured.headers.lock().expect("lock")[0].clone();
        assert_eq!(headers["authorization"], "Bearer sk-test");
        assert_eq!(headers["content-type"], "application/json");
        assert_eq!(headers["http-referer"], "http://localhost:5173");
        assert_eq!(headers["x-title"], "HealthSense AI");

        let sent = captured.bodies.lock().expect("lock")[0].clone();
        assert_eq!(sent["model"], "vendor/model");
        assert_eq!(sent["messages"][0]["role"], "user");
        assert_eq!(sent["response_format"]["type"], "json_object");
    }

    #[tokio::test]
    async fn non_success_status_is_a_failure_with_body() {
        let router = Router::new().route(
            "/api/v1/chat/completions",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "model overloaded") }),
        );
        let endpoint = spawn_stub(router).await;

        let client = OpenRouterClient::new(&config_for(&endpoint, Duration::from_secs(5)))
            .expect("client");
        let failure = client.complete(&request()).await.expect_err("should fail");

        match failure {
            ProviderFailure::Status { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "model overloaded");
            }
            other => panic!("expected Status failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_endpoint_times_out() {
        let router = Router::new().route(
            "/api/v1/chat/completions",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        );
        let endpoint = spawn_stub(router).await;

        let client = OpenRouterClient::new(&config_for(&endpoint, Duration::from_millis(1000)))
            .expect("client");
        let failure = client.complete(&request()).await.expect_err("should time out");

        assert!(matches!(failure, ProviderFailure::Timeout(1)), "got {failure:?}");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_failure() {
        // Bind then drop a listener to get a port nothing is serving on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let endpoint = format!("http://{addr}/api/v1/chat/completions");
        let client = OpenRouterClient::new(&config_for(&endpoint, Duration::from_secs(5)))
            .expect("client");
        let failure = client.complete(&request()).await.expect_err("should fail");

        assert!(matches!(failure, ProviderFailure::Transport(_)), "got {failure:?}");
    }
}
