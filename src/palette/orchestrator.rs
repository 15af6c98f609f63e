//! Sequences generation, extraction and extension for one prompt.

use std::sync::Arc;

use super::{Palette, PaletteOutcome, PaletteSource, PipelineStage};
use crate::color::ColorTriple;
use crate::config::ServiceConfig;
use crate::error::{excerpt, PaletteError, PaletteResult};
use crate::extract::{self, SEED_COUNT};
use crate::prompt;
use crate::services::{ExtensionClient, GenerationClient};
use crate::traits::HttpClient;

/// Generated text is truncated to this many characters in extraction errors.
const EXTRACTION_EXCERPT_CHARS: usize = 200;

/// Drives the prompt-to-palette pipeline.
///
/// Holds only immutable configuration and clients, so one instance is shared
/// across all concurrent requests behind an `Arc`.
#[derive(Clone)]
pub struct PaletteOrchestrator {
    generation: GenerationClient,
    extension: ExtensionClient,
}

impl PaletteOrchestrator {
    pub fn new(generation: GenerationClient, extension: ExtensionClient) -> Self {
        Self {
            generation,
            extension,
        }
    }

    /// Build both service clients on one shared HTTP client.
    pub fn from_config(http: Arc<dyn HttpClient>, config: &ServiceConfig) -> Self {
        Self::new(
            GenerationClient::new(Arc::clone(&http), config.generation_url.clone()),
            ExtensionClient::new(
                http,
                config.extension_url.clone(),
                config.extension_model.clone(),
            ),
        )
    }

    /// Run the full pipeline for `prompt`.
    ///
    /// Fails on a missing prompt, a generation failure or an extraction
    /// failure. Extension problems never fail the request; they only change
    /// [`PaletteOutcome::source`] to [`PaletteSource::Seeds`].
    pub async fn generate_palette(&self, prompt: &str) -> PaletteResult<PaletteOutcome> {
        let mut stage = StageTracker::new();

        let instruction = match prompt::build_instruction(prompt) {
            Ok(instruction) => instruction,
            Err(e) => return Err(stage.fail(e)),
        };
        tracing::info!(prompt = %prompt, "Received prompt");

        stage.advance(PipelineStage::AwaitingGeneration);
        let text = match self.generation.generate(&instruction).await {
            Ok(text) => text,
            Err(e) => return Err(stage.fail(e.into())),
        };

        stage.advance(PipelineStage::Extracting);
        let seeds = match extract::extract_colors(&text) {
            Some(seeds) => seeds,
            None => {
                let err = PaletteError::Extraction {
                    found: extract::extract_all(&text).len(),
                    excerpt: excerpt(&text, EXTRACTION_EXCERPT_CHARS),
                };
                return Err(stage.fail(err));
            }
        };
        tracing::info!(
            seeds = %seeds.iter().map(ToString::to_string).collect::<Vec<_>>().join(" "),
            "Extracted seed colors"
        );
        if seeds.iter().any(|s| !s.is_in_gamut()) {
            tracing::warn!("Seed colors include channels above 255; passing them through");
        }

        stage.advance(PipelineStage::AwaitingExtension);
        let outcome = assemble(seeds, self.extension.extend(&seeds).await);

        stage.advance(PipelineStage::Assembled);
        tracing::info!(
            colors = outcome.palette.len(),
            source = outcome.source.as_str(),
            "Palette assembled"
        );
        Ok(outcome)
    }
}

/// Prefer a usable extension result, otherwise the seeds.
fn assemble(
    seeds: [ColorTriple; SEED_COUNT],
    extended: Option<Vec<ColorTriple>>,
) -> PaletteOutcome {
    if let Some(colors) = extended {
        let len = colors.len();
        if let Some(palette) = Palette::from_extension(colors) {
            return PaletteOutcome {
                palette,
                source: PaletteSource::Extended,
            };
        }
        tracing::warn!(
            colors = len,
            "Extension result has an unusable length; falling back to seed colors"
        );
    }

    PaletteOutcome {
        palette: Palette::from_seeds(seeds),
        source: PaletteSource::Seeds,
    }
}

/// Tracks and logs stage transitions for one request.
struct StageTracker {
    stage: PipelineStage,
}

impl StageTracker {
    fn new() -> Self {
        Self {
            stage: PipelineStage::Idle,
        }
    }

    fn advance(&mut self, next: PipelineStage) {
        debug_assert!(
            self.stage.can_transition_to(next),
            "illegal transition {} -> {}",
            self.stage,
            next
        );
        tracing::debug!(from = %self.stage, stage = %next, "Pipeline stage");
        self.stage = next;
    }

    /// Move to `Failed` and hand the error back for returning.
    fn fail(&mut self, err: PaletteError) -> PaletteError {
        let category = err.category();
        if category.log_level() == tracing::Level::ERROR {
            tracing::error!(
                from = %self.stage,
                category = %category,
                code = err.error_code(),
                "Palette request failed: {}",
                err
            );
        } else {
            tracing::warn!(
                from = %self.stage,
                category = %category,
                code = err.error_code(),
                "Palette request rejected: {}",
                err
            );
        }
        self.advance(PipelineStage::Failed);
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockHttpClient;
    use crate::traits::HttpError;

    const GEN_URL: &str = "http://gen.test/generate";
    const EXT_URL: &str = "http://ext.test/api/";

    fn orchestrator(mock: &MockHttpClient) -> PaletteOrchestrator {
        let config = ServiceConfig::default()
            .with_generation_url(GEN_URL)
            .with_extension_url(EXT_URL);
        PaletteOrchestrator::from_config(Arc::new(mock.clone()), &config)
    }

    fn seeds() -> Vec<ColorTriple> {
        vec![
            ColorTriple::new(12, 200, 5),
            ColorTriple::new(300, 0, 9),
            ColorTriple::new(1, 2, 3),
        ]
    }

    fn mock_generation(mock: &MockHttpClient) {
        mock.set_json(
            GEN_URL,
            200,
            serde_json::json!({
                "response": "sure! [12, 200, 5] and also [300, 0, 9], [1,2,3] extra [9,9,9]"
            }),
        );
    }

    #[tokio::test]
    async fn test_extended_palette_used_exactly() {
        let mock = MockHttpClient::new();
        mock_generation(&mock);
        let extended =
            serde_json::json!([[10, 10, 10], [20, 20, 20], [30, 30, 30], [40, 40, 40], [50, 50, 50]]);
        mock.set_json(EXT_URL, 200, serde_json::json!({ "result": extended }));

        let outcome = orchestrator(&mock).generate_palette("forest").await.unwrap();
        assert_eq!(outcome.source, PaletteSource::Extended);
        assert_eq!(serde_json::to_value(&outcome.palette).unwrap(), extended);
    }

    #[tokio::test]
    async fn test_extension_seeds_and_placeholders_sent() {
        let mock = MockHttpClient::new();
        mock_generation(&mock);
        mock.set_json(EXT_URL, 200, serde_json::json!({"result": []}));

        orchestrator(&mock).generate_palette("forest").await.unwrap();

        let sent = mock.requests_to(EXT_URL)[0].body_json().unwrap();
        assert_eq!(
            sent,
            serde_json::json!({
                "model": "default",
                "input": [[12, 200, 5], [300, 0, 9], [1, 2, 3], "N", "N"]
            })
        );
    }

    #[tokio::test]
    async fn test_falls_back_to_seeds_when_extension_unreachable() {
        let mock = MockHttpClient::new();
        mock_generation(&mock);
        mock.set_error(EXT_URL, HttpError::ConnectionFailed("refused".into()));

        let outcome = orchestrator(&mock).generate_palette("forest").await.unwrap();
        assert_eq!(outcome.source, PaletteSource::Seeds);
        assert_eq!(outcome.palette.colors(), seeds().as_slice());
    }

    #[tokio::test]
    async fn test_falls_back_to_seeds_on_html_and_malformed() {
        for body in ["<html><body>502</body></html>", "{not json", "{\"result\": 5}"] {
            let mock = MockHttpClient::new();
            mock_generation(&mock);
            mock.set_text(EXT_URL, 200, body);

            let outcome = orchestrator(&mock).generate_palette("forest").await.unwrap();
            assert_eq!(outcome.palette.colors(), seeds().as_slice(), "body: {}", body);
        }
    }

    #[tokio::test]
    async fn test_falls_back_to_seeds_on_short_extension_result() {
        let mock = MockHttpClient::new();
        mock_generation(&mock);
        mock.set_json(EXT_URL, 200, serde_json::json!({"result": [[1, 1, 1]]}));

        let outcome = orchestrator(&mock).generate_palette("forest").await.unwrap();
        assert_eq!(outcome.source, PaletteSource::Seeds);
        assert_eq!(outcome.palette.len(), 3);
    }

    #[tokio::test]
    async fn test_blank_prompt_makes_no_calls() {
        let mock = MockHttpClient::new();
        mock_generation(&mock);

        for prompt in ["", "   ", "\n\t"] {
            let err = orchestrator(&mock).generate_palette(prompt).await.unwrap_err();
            assert!(matches!(err, PaletteError::MissingPrompt));
        }
        assert!(mock.get_requests().is_empty());
    }

    #[tokio::test]
    async fn test_generation_500_skips_extension() {
        let mock = MockHttpClient::new();
        mock.set_json(GEN_URL, 500, serde_json::json!({"error": "boom"}));
        mock.set_json(EXT_URL, 200, serde_json::json!({"result": []}));

        let err = orchestrator(&mock).generate_palette("forest").await.unwrap_err();
        assert!(matches!(err, PaletteError::Generation(_)));
        assert_eq!(mock.requests_to(GEN_URL).len(), 1);
        assert!(mock.requests_to(EXT_URL).is_empty());
    }

    #[tokio::test]
    async fn test_empty_generation_text() {
        let mock = MockHttpClient::new();
        mock.set_json(GEN_URL, 200, serde_json::json!({"response": ""}));

        let err = orchestrator(&mock).generate_palette("forest").await.unwrap_err();
        assert!(matches!(err, PaletteError::EmptyResponse(_)));
        assert!(mock.requests_to(EXT_URL).is_empty());
    }

    #[tokio::test]
    async fn test_two_colors_is_extraction_error() {
        let mock = MockHttpClient::new();
        mock.set_json(
            GEN_URL,
            200,
            serde_json::json!({"response": "I can only think of [1, 2, 3] and [4, 5, 6]."}),
        );

        let err = orchestrator(&mock).generate_palette("forest").await.unwrap_err();
        match err {
            PaletteError::Extraction { found, excerpt } => {
                assert_eq!(found, 2);
                assert!(excerpt.contains("[4, 5, 6]"));
            }
            other => panic!("Expected Extraction, got {:?}", other),
        }
        assert!(mock.requests_to(EXT_URL).is_empty());
    }

    #[tokio::test]
    async fn test_instruction_embeds_prompt() {
        let mock = MockHttpClient::new();
        mock_generation(&mock);
        mock.set_json(EXT_URL, 200, serde_json::json!({}));

        orchestrator(&mock).generate_palette("autumn 'cabin'").await.unwrap();

        let sent = mock.requests_to(GEN_URL)[0].body_json().unwrap();
        let instruction = sent["prompt"].as_str().unwrap();
        assert!(instruction.contains("theme 'autumn 'cabin''"));
        assert!(instruction.contains("[[R, G, B], [R, G, B], [R, G, B]]"));
    }
}
