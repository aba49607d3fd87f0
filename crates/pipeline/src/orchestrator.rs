//! Request orchestration
//!
//! ```text
//!   audio ─► AudioArtifact ─► SpeechToText ─┐
//!                                           ├─► prepare ─► TokenAnnotator ─► GlossPipeline
//!   text  ──────────────────────────────────┘
//! ```

use std::time::{Duration, Instant};

use isl_gloss_config::Settings;
use isl_gloss_core::{Error, GlossStrategy, GlossToken, Result, SpeechToText, TokenAnnotator};
use isl_gloss_text_processing::GlossPipeline;

use crate::audio::AudioArtifact;
use crate::service::{connect_annotator, connect_transcriber, ServiceHandle};

/// What the caller sent
#[derive(Debug, Clone)]
pub enum TranslationInput {
    Text(String),
    Audio {
        bytes: Vec<u8>,
        filename: Option<String>,
    },
}

/// Time spent in each stage of one request
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StageTimings {
    pub transcription: Option<Duration>,
    pub annotation: Option<Duration>,
    pub mapping: Option<Duration>,
}

impl StageTimings {
    pub fn total(&self) -> Duration {
        [self.transcription, self.annotation, self.mapping]
            .into_iter()
            .flatten()
            .sum()
    }
}

/// Result of one translation request
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    /// Transcript, for audio requests only
    pub transcribed_text: Option<String>,
    /// Mapper output before synonym normalization
    pub raw_gloss: Vec<GlossToken>,
    /// Final gloss
    pub gloss: Vec<GlossToken>,
    pub strategy: GlossStrategy,
    pub timings: StageTimings,
}

impl Translation {
    fn empty(transcribed_text: Option<String>, strategy: GlossStrategy, timings: StageTimings) -> Self {
        Self {
            transcribed_text,
            raw_gloss: Vec::new(),
            gloss: Vec::new(),
            strategy,
            timings,
        }
    }

    /// Gloss as plain strings
    pub fn gloss_strings(&self) -> Vec<String> {
        self.gloss.iter().map(|t| t.as_str().to_string()).collect()
    }
}

/// Text/audio to gloss translator
///
/// Built once at startup and shared across requests.
pub struct GlossTranslator {
    annotator: ServiceHandle<dyn TokenAnnotator>,
    transcriber: ServiceHandle<dyn SpeechToText>,
    pipeline: GlossPipeline,
    default_strategy: GlossStrategy,
    lowercase_input: bool,
}

impl GlossTranslator {
    pub fn new(
        annotator: ServiceHandle<dyn TokenAnnotator>,
        transcriber: ServiceHandle<dyn SpeechToText>,
        pipeline: GlossPipeline,
    ) -> Self {
        Self {
            annotator,
            transcriber,
            pipeline,
            default_strategy: GlossStrategy::default(),
            lowercase_input: true,
        }
    }

    /// Connect both collaborators as configured
    pub async fn connect(settings: &Settings, pipeline: GlossPipeline) -> Self {
        let annotator = connect_annotator(&settings.annotation).await;
        let transcriber = connect_transcriber(&settings.transcription).await;

        Self::new(annotator, transcriber, pipeline)
            .with_default_strategy(settings.gloss.strategy)
            .with_lowercase_input(settings.gloss.lowercase_input)
    }

    pub fn with_default_strategy(mut self, strategy: GlossStrategy) -> Self {
        self.default_strategy = strategy;
        self
    }

    pub fn with_lowercase_input(mut self, lowercase: bool) -> Self {
        self.lowercase_input = lowercase;
        self
    }

    pub fn annotator(&self) -> &ServiceHandle<dyn TokenAnnotator> {
        &self.annotator
    }

    pub fn transcriber(&self) -> &ServiceHandle<dyn SpeechToText> {
        &self.transcriber
    }

    pub fn default_strategy(&self) -> GlossStrategy {
        self.default_strategy
    }

    /// Translate text or audio
    pub async fn translate(
        &self,
        input: TranslationInput,
        strategy: Option<GlossStrategy>,
    ) -> Result<Translation> {
        match input {
            TranslationInput::Text(text) => self.translate_text(&text, strategy).await,
            TranslationInput::Audio { bytes, filename } => {
                self.translate_audio(&bytes, filename.as_deref(), strategy).await
            }
        }
    }

    /// Translate an English sentence
    pub async fn translate_text(
        &self,
        text: &str,
        strategy: Option<GlossStrategy>,
    ) -> Result<Translation> {
        let strategy = strategy.unwrap_or(self.default_strategy);
        let mut timings = StageTimings::default();
        self.gloss_text(text, None, strategy, &mut timings).await
    }

    /// Transcribe an audio clip, then translate the transcript
    ///
    /// The temp file is removed as soon as transcription returns,
    /// whether it succeeded or not.
    pub async fn translate_audio(
        &self,
        bytes: &[u8],
        filename: Option<&str>,
        strategy: Option<GlossStrategy>,
    ) -> Result<Translation> {
        let strategy = strategy.unwrap_or(self.default_strategy);
        if bytes.is_empty() {
            return Err(Error::invalid_request("audio upload is empty"));
        }

        let transcriber = self
            .transcriber
            .get()
            .map_err(Error::transcription_unavailable)?;

        let mut timings = StageTimings::default();
        let artifact = AudioArtifact::write(bytes, filename)?;

        let start = Instant::now();
        let transcript = transcriber.transcribe(artifact.path()).await;
        timings.transcription = Some(start.elapsed());
        drop(artifact);

        let transcript = transcript?;
        tracing::info!(
            backend = transcriber.name(),
            audio_bytes = bytes.len(),
            chars = transcript.len(),
            "Transcribed audio"
        );

        self.gloss_text(&transcript, Some(transcript.clone()), strategy, &mut timings)
            .await
    }

    /// Trim, then lowercase when configured
    fn prepare(&self, text: &str) -> String {
        let trimmed = text.trim();
        if self.lowercase_input {
            trimmed.to_lowercase()
        } else {
            trimmed.to_string()
        }
    }

    async fn gloss_text(
        &self,
        text: &str,
        transcribed_text: Option<String>,
        strategy: GlossStrategy,
        timings: &mut StageTimings,
    ) -> Result<Translation> {
        let prepared = self.prepare(text);
        if prepared.is_empty() {
            tracing::debug!("Empty input, returning empty gloss");
            return Ok(Translation::empty(transcribed_text, strategy, *timings));
        }

        let annotator = self
            .annotator
            .get()
            .map_err(Error::annotation_unavailable)?;

        let start = Instant::now();
        let tokens = annotator.annotate(&prepared).await?;
        timings.annotation = Some(start.elapsed());

        let start = Instant::now();
        let output = self.pipeline.process(&tokens, strategy);
        timings.mapping = Some(start.elapsed());

        tracing::info!(
            backend = annotator.name(),
            strategy = %strategy,
            tokens = tokens.len(),
            gloss_len = output.gloss.len(),
            "Translated to gloss"
        );

        Ok(Translation {
            transcribed_text,
            raw_gloss: output.raw,
            gloss: output.gloss,
            strategy,
            timings: *timings,
        })
    }
}

impl std::fmt::Debug for GlossTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlossTranslator")
            .field("annotator", &self.annotator)
            .field("transcriber", &self.transcriber)
            .field("default_strategy", &self.default_strategy)
            .field("lowercase_input", &self.lowercase_input)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use isl_gloss_core::{AnnotatedToken, DependencyRelation, PartOfSpeech};
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Annotator that returns canned tokens and records what it saw
    #[derive(Default)]
    struct FakeAnnotator {
        calls: AtomicUsize,
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TokenAnnotator for FakeAnnotator {
        async fn annotate(&self, text: &str) -> Result<Vec<AnnotatedToken>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().push(text.to_string());
            Ok(vec![
                AnnotatedToken::new("i", "I", PartOfSpeech::Pronoun),
                AnnotatedToken::new("do", "do", PartOfSpeech::Other),
                AnnotatedToken::new("not", "not", PartOfSpeech::Other)
                    .with_dependency(DependencyRelation::Negation),
                AnnotatedToken::new("eat", "eat", PartOfSpeech::Verb)
                    .with_dependency(DependencyRelation::Root)
                    .with_head(3),
                AnnotatedToken::new("food", "food", PartOfSpeech::Noun)
                    .with_dependency(DependencyRelation::DirectObject)
                    .with_head(3),
            ])
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    struct FakeTranscriber {
        transcript: std::result::Result<String, String>,
        seen_path: Mutex<Option<PathBuf>>,
    }

    impl FakeTranscriber {
        fn returning(transcript: &str) -> Self {
            Self {
                transcript: Ok(transcript.to_string()),
                seen_path: Mutex::new(None),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                transcript: Err(message.to_string()),
                seen_path: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl SpeechToText for FakeTranscriber {
        async fn transcribe(&self, audio_path: &Path) -> Result<String> {
            assert!(audio_path.exists());
            *self.seen_path.lock() = Some(audio_path.to_path_buf());
            self.transcript
                .clone()
                .map_err(Error::transcription_unavailable)
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    fn translator(
        annotator: &Arc<FakeAnnotator>,
        transcriber: &Arc<FakeTranscriber>,
    ) -> GlossTranslator {
        let annotator: Arc<dyn TokenAnnotator> = annotator.clone();
        let transcriber: Arc<dyn SpeechToText> = transcriber.clone();
        GlossTranslator::new(
            ServiceHandle::ready(annotator),
            ServiceHandle::ready(transcriber),
            GlossPipeline::default(),
        )
    }

    #[tokio::test]
    async fn test_translate_text() {
        let annotator = Arc::new(FakeAnnotator::default());
        let transcriber = Arc::new(FakeTranscriber::returning("unused"));
        let translator = translator(&annotator, &transcriber);

        let result = translator
            .translate_text("  I do NOT eat food  ", None)
            .await
            .unwrap();

        assert_eq!(result.transcribed_text, None);
        assert_eq!(result.raw_gloss, vec!["I", "NOT", "EAT", "FOOD"]);
        assert_eq!(result.gloss_strings(), vec!["I", "NOT", "EAT", "EAT"]);
        assert_eq!(result.strategy, GlossStrategy::ContentWords);
        assert!(result.timings.annotation.is_some());
        assert_eq!(annotator.seen.lock().as_slice(), ["i do not eat food"]);
    }

    #[tokio::test]
    async fn test_request_strategy_overrides_default() {
        let annotator = Arc::new(FakeAnnotator::default());
        let transcriber = Arc::new(FakeTranscriber::returning("unused"));
        let translator = translator(&annotator, &transcriber);

        let result = translator
            .translate(
                TranslationInput::Text("i do not eat food".into()),
                Some(GlossStrategy::SubjectObjectVerb),
            )
            .await
            .unwrap();
        assert_eq!(result.raw_gloss, vec!["FOOD", "EAT"]);
        assert_eq!(result.strategy, GlossStrategy::SubjectObjectVerb);
    }

    #[tokio::test]
    async fn test_lowercasing_can_be_disabled() {
        let annotator = Arc::new(FakeAnnotator::default());
        let transcriber = Arc::new(FakeTranscriber::returning("unused"));
        let translator = translator(&annotator, &transcriber).with_lowercase_input(false);

        translator.translate_text(" Hello There ", None).await.unwrap();
        assert_eq!(annotator.seen.lock().as_slice(), ["Hello There"]);
    }

    #[tokio::test]
    async fn test_empty_text_skips_annotation() {
        let annotator = Arc::new(FakeAnnotator::default());
        let transcriber = Arc::new(FakeTranscriber::returning("unused"));
        let translator = translator(&annotator, &transcriber);

        let result = translator.translate_text(" \t\n", None).await.unwrap();
        assert!(result.gloss.is_empty());
        assert_eq!(annotator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_translate_audio_removes_temp_file() {
        let annotator = Arc::new(FakeAnnotator::default());
        let transcriber = Arc::new(FakeTranscriber::returning("I do not eat food"));
        let translator = translator(&annotator, &transcriber);

        let result = translator
            .translate_audio(b"RIFF", Some("clip.wav"), None)
            .await
            .unwrap();

        assert_eq!(result.transcribed_text.as_deref(), Some("I do not eat food"));
        assert_eq!(result.gloss_strings(), vec!["I", "NOT", "EAT", "EAT"]);
        assert!(result.timings.transcription.is_some());

        let path = transcriber.seen_path.lock().clone().unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_empty_transcript_skips_annotation() {
        let annotator = Arc::new(FakeAnnotator::default());
        let transcriber = Arc::new(FakeTranscriber::returning("   "));
        let translator = translator(&annotator, &transcriber);

        let result = translator
            .translate_audio(b"RIFF", None, None)
            .await
            .unwrap();

        assert_eq!(result.transcribed_text.as_deref(), Some("   "));
        assert!(result.gloss.is_empty());
        assert_eq!(annotator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_transcription_failure_still_removes_temp_file() {
        let annotator = Arc::new(FakeAnnotator::default());
        let transcriber = Arc::new(FakeTranscriber::failing("decoder crashed"));
        let translator = translator(&annotator, &transcriber);

        let err = translator
            .translate_audio(b"RIFF", Some("clip.ogg"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::TranscriptionServiceUnavailable(_)));

        let path = transcriber.seen_path.lock().clone().unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_empty_upload_is_invalid() {
        let annotator = Arc::new(FakeAnnotator::default());
        let transcriber = Arc::new(FakeTranscriber::returning("hi"));
        let translator = translator(&annotator, &transcriber);

        let err = translator.translate_audio(b"", None, None).await.unwrap_err();
        assert!(err.is_client_error());
        assert!(transcriber.seen_path.lock().is_none());
    }

    #[tokio::test]
    async fn test_unavailable_services_return_cached_error() {
        let translator = GlossTranslator::new(
            ServiceHandle::unavailable("model en_core_web_sm not found"),
            ServiceHandle::unavailable("whisper not installed"),
            GlossPipeline::default(),
        );

        for _ in 0..2 {
            match translator.translate_text("hello", None).await.unwrap_err() {
                Error::AnnotationServiceUnavailable(reason) => {
                    assert_eq!(reason, "model en_core_web_sm not found")
                }
                other => panic!("unexpected error: {:?}", other),
            }
        }

        match translator.translate_audio(b"RIFF", None, None).await.unwrap_err() {
            Error::TranscriptionServiceUnavailable(reason) => {
                assert_eq!(reason, "whisper not installed")
            }
            other => panic!("unexpected error: {:?}", other),
        }

        // Nothing to annotate, so no error even with the parser down
        let result = translator.translate_text("", None).await.unwrap();
        assert!(result.gloss.is_empty());
    }

    #[test]
    fn test_stage_timings_total() {
        let timings = StageTimings {
            transcription: Some(Duration::from_millis(30)),
            annotation: None,
            mapping: Some(Duration::from_millis(2)),
        };
        assert_eq!(timings.total(), Duration::from_millis(32));
    }
}
