//! HTTP client for a Whisper-compatible transcription service
//!
//! Posts the audio file as multipart form data to
//! `{endpoint}/v1/audio/transcriptions` and reads `{"text": ...}` back.

use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use isl_gloss_config::TranscriptionConfig;
use isl_gloss_core::{Result, SpeechToText};

use crate::PipelineError;

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Whisper-compatible transcription client
#[derive(Debug, Clone)]
pub struct HttpTranscriber {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    language: Option<String>,
    api_key: Option<String>,
}

impl HttpTranscriber {
    /// Build the client (no network traffic)
    pub fn new(config: &TranscriptionConfig) -> std::result::Result<Self, PipelineError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| PipelineError::Transcription(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            language: config.language.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Check that the service is reachable
    pub async fn probe(&self) -> std::result::Result<(), PipelineError> {
        let url = format!("{}/health", self.endpoint);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PipelineError::Transcription(format!("service unreachable at {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(PipelineError::Transcription(format!(
                "health check at {} returned {}",
                url,
                response.status()
            )));
        }

        Ok(())
    }

    async fn request(&self, audio_path: &Path) -> std::result::Result<String, PipelineError> {
        let bytes = tokio::fs::read(audio_path)
            .await
            .map_err(|e| PipelineError::Audio(format!("failed to read {}: {}", audio_path.display(), e)))?;

        let file_name = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.wav")
            .to_string();
        let mime = mime_for(audio_path);

        let file_part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime)
            .map_err(|e| PipelineError::Transcription(format!("invalid multipart part: {}", e)))?;

        let mut form = multipart::Form::new()
            .text("model", self.model.clone())
            .text("response_format", "json")
            .part("file", file_part);
        if let Some(language) = &self.language {
            form = form.text("language", language.clone());
        }

        let url = format!("{}/v1/audio/transcriptions", self.endpoint);
        let mut request = self.client.post(&url).multipart(form);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PipelineError::Transcription(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::Transcription(format!(
                "service returned {}: {}",
                status,
                body.trim()
            )));
        }

        let payload: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::Transcription(format!("malformed response: {}", e)))?;

        Ok(payload.text.trim().to_string())
    }
}

/// MIME type from the file extension
fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("ogg") | Some("oga") => "audio/ogg",
        Some("webm") => "audio/webm",
        Some("m4a") | Some("mp4") => "audio/mp4",
        Some("flac") => "audio/flac",
        _ => "application/octet-stream",
    }
}

#[async_trait]
impl SpeechToText for HttpTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Result<String> {
        let text = self.request(audio_path).await?;
        tracing::debug!(chars = text.len(), "Transcribed audio");
        Ok(text)
    }

    fn name(&self) -> &str {
        "http-transcriber"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Multipart,
        http::{HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use isl_gloss_core::Error;
    use std::io::Write;

    async fn spawn_service(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn config(endpoint: String) -> TranscriptionConfig {
        TranscriptionConfig {
            endpoint,
            api_key: Some("secret".to_string()),
            timeout_seconds: 5,
            ..Default::default()
        }
    }

    async fn transcriptions(headers: HeaderMap, mut multipart: Multipart) -> Json<serde_json::Value> {
        assert_eq!(headers["authorization"], "Bearer secret");

        let mut fields = Vec::new();
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap_or_default().to_string();
            if name == "file" {
                assert_eq!(field.content_type(), Some("audio/wav"));
                let data = field.bytes().await.unwrap();
                assert_eq!(&data[..], b"RIFF-fake-audio");
            } else {
                let value = field.text().await.unwrap();
                fields.push(format!("{}={}", name, value));
            }
        }
        fields.sort();
        assert_eq!(fields, vec!["language=en", "model=base", "response_format=json"]);

        Json(serde_json::json!({"text": "  I do not eat food \n"}))
    }

    fn audio_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".wav").tempfile().unwrap();
        file.write_all(b"RIFF-fake-audio").unwrap();
        file
    }

    #[tokio::test]
    async fn test_transcribe_posts_multipart() {
        let router = Router::new().route("/v1/audio/transcriptions", post(transcriptions));
        let endpoint = spawn_service(router).await;

        let transcriber = HttpTranscriber::new(&config(endpoint)).unwrap();
        let file = audio_file();
        let text = transcriber.transcribe(file.path()).await.unwrap();
        assert_eq!(text, "I do not eat food");
    }

    #[tokio::test]
    async fn test_service_error_is_unavailable() {
        let router = Router::new().route(
            "/v1/audio/transcriptions",
            post(|| async { (StatusCode::BAD_GATEWAY, "decoder crashed") }),
        );
        let endpoint = spawn_service(router).await;

        let transcriber = HttpTranscriber::new(&config(endpoint)).unwrap();
        let file = audio_file();
        match transcriber.transcribe(file.path()).await.unwrap_err() {
            Error::TranscriptionServiceUnavailable(msg) => assert!(msg.contains("decoder crashed")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        let transcriber = HttpTranscriber::new(&config("http://127.0.0.1:9".to_string())).unwrap();
        assert!(transcriber.probe().await.is_err());

        let file = audio_file();
        assert!(matches!(
            transcriber.transcribe(file.path()).await,
            Err(Error::TranscriptionServiceUnavailable(_))
        ));
    }

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for(Path::new("a.WAV")), "audio/wav");
        assert_eq!(mime_for(Path::new("a.webm")), "audio/webm");
        assert_eq!(mime_for(Path::new("a")), "application/octet-stream");
    }
}
