//! HTTP Endpoints
//!
//! - `POST /translate`        JSON `{"text", "strategy"?}` → `{"gloss"}`
//! - `POST /translate-audio`  multipart `audio` (+ `strategy`) → `{"transcribed_text", "gloss"}`
//! - `GET  /health`, `GET /ready`, `GET /metrics`

use axum::{
    extract::{
        multipart::{Multipart, MultipartRejection},
        rejection::JsonRejection,
        DefaultBodyLimit, State,
    },
    http::{HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use isl_gloss_config::ServerConfig;
use isl_gloss_core::GlossStrategy;
use isl_gloss_pipeline::{ServiceHandle, Translation};

use crate::metrics::{metrics_handler, record_error, record_request, record_translation};
use crate::state::AppState;
use crate::ServerError;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let server = &state.config.server;

    let mut router = Router::new()
        .route("/translate", post(translate))
        .route("/translate-audio", post(translate_audio))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check));

    if state.config.observability.metrics_enabled {
        router = router.route("/metrics", get(metrics_handler));
    }

    router = router
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(server.max_audio_bytes))
        .layer(TraceLayer::new_for_http());

    if server.cors_enabled {
        router = router.layer(cors_layer(server));
    }

    router.with_state(state)
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if server.cors_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = server
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

/// Text translation request
#[derive(Debug, Deserialize)]
struct TranslateRequest {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    strategy: Option<String>,
}

#[derive(Debug, Serialize)]
struct TranslateResponse {
    gloss: Vec<String>,
}

#[derive(Debug, Serialize)]
struct TranslateAudioResponse {
    transcribed_text: String,
    gloss: Vec<String>,
}

fn parse_strategy(raw: Option<&str>) -> Result<Option<GlossStrategy>, ServerError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<GlossStrategy>()
            .map(Some)
            .map_err(ServerError::InvalidRequest),
    }
}

fn observe(result: Result<Translation, ServerError>) -> Result<Translation, ServerError> {
    match &result {
        Ok(translation) => record_translation(&translation.timings, translation.gloss.len()),
        Err(err) => record_error(err.code()),
    }
    result
}

/// Translate English text
async fn translate(
    State(state): State<AppState>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> Result<Json<TranslateResponse>, ServerError> {
    record_request("translate");

    let translation = observe(run_translate(&state, payload).await)?;
    Ok(Json(TranslateResponse {
        gloss: translation.gloss_strings(),
    }))
}

async fn run_translate(
    state: &AppState,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> Result<Translation, ServerError> {
    let Json(request) =
        payload.map_err(|rejection| ServerError::InvalidRequest(rejection.body_text()))?;
    let text = request
        .text
        .ok_or_else(|| ServerError::InvalidRequest("missing field `text`".to_string()))?;
    let strategy = parse_strategy(request.strategy.as_deref())?;

    Ok(state.translator.translate_text(&text, strategy).await?)
}

/// Uploaded audio plus the optional strategy field
struct AudioUpload {
    bytes: Vec<u8>,
    filename: Option<String>,
    strategy: Option<String>,
}

async fn read_upload(mut multipart: Multipart) -> Result<AudioUpload, ServerError> {
    let mut audio = None;
    let mut strategy = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::InvalidRequest(e.body_text()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("audio") => {
                let filename = field.file_name().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ServerError::InvalidRequest(e.body_text()))?;
                audio = Some((bytes.to_vec(), filename));
            }
            Some("strategy") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ServerError::InvalidRequest(e.body_text()))?;
                strategy = Some(value);
            }
            other => {
                tracing::debug!(field = ?other, "Ignoring unknown multipart field");
            }
        }
    }

    let (bytes, filename) = audio
        .ok_or_else(|| ServerError::InvalidRequest("missing multipart field `audio`".to_string()))?;

    Ok(AudioUpload {
        bytes,
        filename,
        strategy,
    })
}

/// Transcribe an audio clip and translate the transcript
async fn translate_audio(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<TranslateAudioResponse>, ServerError> {
    record_request("translate_audio");

    let translation = observe(run_translate_audio(&state, multipart).await)?;
    Ok(Json(TranslateAudioResponse {
        gloss: translation.gloss_strings(),
        transcribed_text: translation.transcribed_text.unwrap_or_default(),
    }))
}

async fn run_translate_audio(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Translation, ServerError> {
    let multipart =
        multipart.map_err(|rejection| ServerError::InvalidRequest(rejection.body_text()))?;
    let upload = read_upload(multipart).await?;
    let strategy = parse_strategy(upload.strategy.as_deref())?;

    Ok(state
        .translator
        .translate_audio(&upload.bytes, upload.filename.as_deref(), strategy)
        .await?)
}

/// Health check
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

fn service_status<S: ?Sized>(handle: &ServiceHandle<S>) -> serde_json::Value {
    match handle.reason() {
        None => serde_json::json!({ "available": true }),
        Some(reason) => serde_json::json!({ "available": false, "reason": reason }),
    }
}

/// Readiness check
///
/// 503 while either collaborator is unavailable.
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let translator = &state.translator;
    let ready = translator.annotator().is_available() && translator.transcriber().is_available();

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(serde_json::json!({
            "status": if ready { "ready" } else { "degraded" },
            "strategy": translator.default_strategy().as_str(),
            "annotation": service_status(translator.annotator()),
            "transcription": service_status(translator.transcriber()),
        })),
    )
}
