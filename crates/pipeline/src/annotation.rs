//! HTTP client for the annotation sidecar
//!
//! The sidecar wraps a spaCy-style English model and exposes:
//! - `GET  /health`   → 2xx once the model is loaded
//! - `POST /annotate` → `{"tokens": [{text, lemma, pos, dep, head, is_stop, is_punct}]}`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use isl_gloss_config::AnnotationConfig;
use isl_gloss_core::{AnnotatedToken, Result, TokenAnnotator};

use crate::PipelineError;

#[derive(Debug, Serialize)]
struct AnnotateRequest<'a> {
    text: &'a str,
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    tokens: Vec<AnnotatedToken>,
}

/// Annotation sidecar client
#[derive(Debug, Clone)]
pub struct HttpAnnotator {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl HttpAnnotator {
    /// Build the client (no network traffic)
    pub fn new(config: &AnnotationConfig) -> std::result::Result<Self, PipelineError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| PipelineError::Annotation(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Check that the sidecar is up and its model is loaded
    pub async fn probe(&self) -> std::result::Result<(), PipelineError> {
        let url = format!("{}/health", self.endpoint);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PipelineError::Annotation(format!("sidecar unreachable at {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(PipelineError::Annotation(format!(
                "sidecar health check at {} returned {}",
                url,
                response.status()
            )));
        }

        Ok(())
    }

    async fn request(&self, text: &str) -> std::result::Result<Vec<AnnotatedToken>, PipelineError> {
        let url = format!("{}/annotate", self.endpoint);
        let response = self
            .client
            .post(&url)
            .json(&AnnotateRequest {
                text,
                model: &self.model,
            })
            .send()
            .await
            .map_err(|e| PipelineError::Annotation(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::Annotation(format!(
                "sidecar returned {}: {}",
                status,
                body.trim()
            )));
        }

        let payload: AnnotateResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::Annotation(format!("malformed sidecar response: {}", e)))?;

        Ok(payload.tokens)
    }
}

#[async_trait]
impl TokenAnnotator for HttpAnnotator {
    async fn annotate(&self, text: &str) -> Result<Vec<AnnotatedToken>> {
        let tokens = self.request(text).await?;
        tracing::debug!(tokens = tokens.len(), "Annotated text");
        Ok(tokens)
    }

    fn name(&self) -> &str {
        "http-annotator"
    }
}
