//! # API REST
//!
//! REST surface for the HealthSense symptom checker.
//!
//! Hosts the assessment pipeline behind axum with an OpenAPI document, Swagger UI and a
//! CORS allow-list. All assessment logic lives in `healthsense-core`; this crate only maps
//! HTTP onto it.

pub mod error;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderValue,
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{
    ErrorRes, HealthRes, HealthService, PossibleCondition, ServiceInfoRes, SymptomAssessment,
    SymptomRequest, UrgencyLevel,
};
use healthsense_core::AssessmentPipeline;

pub use error::ApiError;

pub const DOCS_PATH: &str = "/swagger-ui";
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";
pub const ANALYZE_PATH: &str = "/api/v1/symptoms/analyze";

/// Application state shared across REST API handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: AssessmentPipeline,
}

#[derive(OpenApi)]
#[openapi(
    paths(root, health, analyze_symptoms),
    components(schemas(
        SymptomRequest,
        SymptomAssessment,
        PossibleCondition,
        UrgencyLevel,
        HealthRes,
        ServiceInfoRes,
        ErrorRes
    )),
    tags((name = "symptoms", description = "AI symptom assessment"))
)]
pub struct ApiDoc;

/// Build the REST router.
///
/// # Errors
///
/// Returns an error if one of `cors_origins` is not a valid header value.
pub fn router(state: AppState, cors_origins: &[String]) -> anyhow::Result<Router> {
    Ok(Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route(ANALYZE_PATH, post(analyze_symptoms))
        .merge(SwaggerUi::new(DOCS_PATH).url(OPENAPI_PATH, ApiDoc::openapi()))
        .layer(cors_layer(cors_origins)?)
        .with_state(state))
}

/// Bind `addr` and serve `app` until the process is stopped.
pub async fn serve(addr: &str, app: Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("++ Starting HealthSense REST on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| HeaderValue::from_str(origin))
        .collect::<Result<Vec<_>, _>>()?;

    // Credentials rule out wildcards, so methods and headers mirror the preflight.
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service banner", body = ServiceInfoRes)
    )
)]
/// Service banner naming the API, its version and where the docs live.
async fn root() -> Json<ServiceInfoRes> {
    Json(HealthService::service_info(DOCS_PATH))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Reports healthy whenever the process is serving, including when the provider credential
/// is missing.
async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/api/v1/symptoms/analyze",
    tag = "symptoms",
    request_body = SymptomRequest,
    responses(
        (status = 200, description = "Validated assessment", body = SymptomAssessment),
        (status = 422, description = "Request body missing fields or out of bounds", body = ErrorRes),
        (status = 502, description = "Provider failed or returned unusable output", body = ErrorRes),
        (status = 503, description = "Provider credential not configured", body = ErrorRes)
    )
)]
/// Analyse symptoms with the configured model candidates
///
/// Body rejections from the JSON extractor are rendered with the same `{"detail"}` shape
/// as pipeline errors.
///
/// # Returns
/// * `Ok(Json<SymptomAssessment>)` - Assessment under a server-generated identifier
/// * `Err(ApiError)` - 422, 502 or 503 depending on the failure class
async fn analyze_symptoms(
    State(state): State<AppState>,
    payload: Result<Json<SymptomRequest>, JsonRejection>,
) -> Result<Json<SymptomAssessment>, ApiError> {
    let Json(request) = payload?;
    let assessment = state.pipeline.analyze(&request).await?;
    Ok(Json(assessment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use healthsense_core::testing::{
        completion_envelope, sample_generation, status_failure, ScriptedProvider,
    };
    use healthsense_core::{AssessmentId, ProviderConfig, ProviderFailure};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    const MODELS: [&str; 3] = ["vendor/a", "vendor/b", "vendor/c"];

    fn config(api_key: Option<&str>) -> ProviderConfig {
        ProviderConfig::new(
            api_key.map(str::to_string),
            "http://127.0.0.1:9/v1/chat/completions",
            MODELS.iter().map(|m| m.to_string()).collect(),
            Duration::from_secs(60),
        )
        .expect("config")
    }

    fn app_with(
        api_key: Option<&str>,
        script: Vec<Result<String, ProviderFailure>>,
    ) -> (Router, Arc<ScriptedProvider>) {
        let provider = Arc::new(ScriptedProvider::new(script));
        let pipeline = AssessmentPipeline::new(Arc::new(config(api_key)), provider.clone());
        let origins = vec!["http://localhost:5173".to_string()];
        let app = router(AppState { pipeline }, &origins).expect("router");
        (app, provider)
    }

    fn analyze_request(body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(ANALYZE_PATH)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    fn valid_body() -> Value {
        json!({
            "symptoms": "Fever and sore throat",
            "age": 30,
            "gender": "female",
            "duration": "3 days",
            "severity": 5
        })
    }

    async fn json_body(response: Response) -> Value {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn health_reports_healthy() {
        let (app, _) = app_with(None, vec![]);
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"status": "healthy"}));
    }

    #[tokio::test]
    async fn root_points_at_docs() {
        let (app, _) = app_with(None, vec![]);
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["docs"], DOCS_PATH);
        assert_eq!(body["version"], api_shared::API_VERSION);
    }

    #[tokio::test]
    async fn openapi_document_lists_analyze_route() {
        let (app, _) = app_with(None, vec![]);
        let response = app
            .oneshot(Request::get(OPENAPI_PATH).body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body["paths"][ANALYZE_PATH]["post"].is_object());
        assert!(body["components"]["schemas"]["SymptomAssessment"].is_object());
    }

    #[tokio::test]
    async fn analyze_returns_assessment() {
        let envelope = completion_envelope(&sample_generation().to_string());
        let (app, provider) = app_with(Some("sk-test"), vec![Ok(envelope)]);

        let response = app.oneshot(analyze_request(valid_body())).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let id: AssessmentId = body["assessment_id"]
            .as_str()
            .expect("id string")
            .parse()
            .expect("canonical id");
        assert_ne!(id.to_string(), sample_generation()["assessment_id"]);
        assert_eq!(body["urgency_level"], "MODERATE");
        assert_eq!(body["possible_conditions"][0]["probability"], 70);
        assert_eq!(provider.called_models(), ["vendor/a"]);
    }

    #[tokio::test]
    async fn missing_credential_is_503_without_provider_calls() {
        let (app, provider) = app_with(None, vec![]);

        let response = app.oneshot(analyze_request(valid_body())).await.expect("response");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = json_body(response).await;
        assert!(body["detail"]
            .as_str()
            .expect("detail")
            .contains("OPENROUTER_API_KEY"));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_field_is_422() {
        let (app, provider) = app_with(Some("sk-test"), vec![]);
        let mut body = valid_body();
        body.as_object_mut().expect("object").remove("severity");

        let response = app.oneshot(analyze_request(body)).await.expect("response");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(json_body(response).await["detail"].is_string());
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn out_of_bound_severity_is_422() {
        let (app, provider) = app_with(Some("sk-test"), vec![]);
        let mut body = valid_body();
        body["severity"] = json!(11);

        let response = app.oneshot(analyze_request(body)).await.expect("response");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let detail = json_body(response).await["detail"].clone();
        assert!(detail.as_str().expect("detail").contains("severity"));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn exhausted_candidates_is_502_naming_last_failure() {
        let (app, provider) = app_with(
            Some("sk-test"),
            vec![
                Err(status_failure(500)),
                Err(ProviderFailure::Timeout(60)),
                Err(status_failure(429)),
            ],
        );

        let response = app.oneshot(analyze_request(valid_body())).await.expect("response");

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let detail = json_body(response).await["detail"].clone();
        let detail = detail.as_str().expect("detail");
        assert!(detail.contains("vendor/c"));
        assert!(detail.contains("429"));
        assert_eq!(provider.called_models(), MODELS);
    }

    #[tokio::test]
    async fn schema_violation_is_502() {
        let mut generation = sample_generation();
        generation["possible_conditions"][0]["probability"] = json!(150);
        let (app, _) = app_with(
            Some("sk-test"),
            vec![Ok(completion_envelope(&generation.to_string()))],
        );

        let response = app.oneshot(analyze_request(valid_body())).await.expect("response");

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let detail = json_body(response).await["detail"].clone();
        assert!(detail.as_str().expect("detail").contains("probability"));
    }

    #[tokio::test]
    async fn malformed_generation_is_502() {
        let (app, _) = app_with(
            Some("sk-test"),
            vec![Ok(completion_envelope("I think it is a cold."))],
        );

        let response = app.oneshot(analyze_request(valid_body())).await.expect("response");

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn cors_allows_configured_origin_only() {
        let (app, _) = app_with(None, vec![]);
        let preflight = |origin: &str| {
            Request::builder()
                .method(Method::OPTIONS)
                .uri(ANALYZE_PATH)
                .header(header::ORIGIN, origin)
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .expect("request")
        };

        let allowed = app
            .clone()
            .oneshot(preflight("http://localhost:5173"))
            .await
            .expect("response");
        assert_eq!(
            allowed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:5173"
        );
        assert_eq!(
            allowed.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
            "true"
        );

        let denied = app
            .oneshot(preflight("https://evil.example"))
            .await
            .expect("response");
        assert!(denied
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
