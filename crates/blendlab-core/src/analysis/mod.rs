pub mod gemini;
pub mod prompt;

use crate::error::BlendError;
use crate::model::CompositionResult;

/// Returned instead of a blank analysis when the service answers with no text.
pub const NO_RESULT: &str = "분석 결과가 없습니다.";

/// Trait for text-generation backends.
pub trait TextGenerator: Send + Sync {
    /// Send one prompt and return the generated text, which may be empty.
    fn generate(&self, api_key: &str, prompt: &str) -> Result<String, BlendError>;

    /// Model identifier (for diagnostics).
    fn model(&self) -> &str;
}

/// Ask the text service to analyze a composition.
///
/// Makes exactly one request. An empty composition or a missing key fails
/// before anything is sent.
pub fn analyze(
    generator: &dyn TextGenerator,
    composition: &[CompositionResult],
    api_key: Option<&str>,
) -> Result<String, BlendError> {
    if composition.is_empty() {
        return Err(BlendError::EmptyBlend);
    }
    let api_key = require_key(api_key)?;

    let prompt = prompt::build_analysis_prompt(composition);
    tracing::info!(
        model = generator.model(),
        components = composition.len(),
        "requesting blend analysis"
    );

    let text = generator.generate(api_key, &prompt)?;
    if text.trim().is_empty() {
        tracing::warn!("analysis service returned no text");
        return Ok(NO_RESULT.to_string());
    }
    Ok(text)
}

/// Check that `api_key` is accepted by sending a minimal prompt.
pub fn test_connection(generator: &dyn TextGenerator, api_key: &str) -> Result<(), BlendError> {
    let api_key = require_key(Some(api_key))?;
    generator.generate(api_key, prompt::CONNECTION_TEST_PROMPT)?;
    tracing::info!(model = generator.model(), "connection test succeeded");
    Ok(())
}

fn require_key(api_key: Option<&str>) -> Result<&str, BlendError> {
    api_key
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or(BlendError::MissingCredential)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    /// Records prompts and replies with a fixed result.
    struct MockGenerator {
        reply: Result<String, String>,
        prompts: Mutex<Vec<String>>,
    }

    impl MockGenerator {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    impl TextGenerator for MockGenerator {
        fn generate(&self, _api_key: &str, prompt: &str) -> Result<String, BlendError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone().map_err(BlendError::Service)
        }

        fn model(&self) -> &str {
            "mock"
        }
    }

    fn composition() -> Vec<CompositionResult> {
        vec![CompositionResult {
            name: "Linalool".into(),
            value: dec!(100),
        }]
    }

    #[test]
    fn test_empty_composition_rejected_before_call() {
        let generator = MockGenerator::replying("text");
        let err = analyze(&generator, &[], Some("key")).unwrap_err();
        assert!(matches!(err, BlendError::EmptyBlend));
        assert_eq!(generator.calls(), 0);
    }

    #[test]
    fn test_missing_key_is_distinct() {
        let generator = MockGenerator::replying("text");
        for key in [None, Some(""), Some("  ")] {
            let err = analyze(&generator, &composition(), key).unwrap_err();
            assert!(err.is_missing_credential());
        }
        assert_eq!(generator.calls(), 0);
    }

    #[test]
    fn test_success_returns_text() {
        let generator = MockGenerator::replying("## 분석");
        let text = analyze(&generator, &composition(), Some("key")).unwrap();
        assert_eq!(text, "## 분석");
        assert_eq!(generator.calls(), 1);
        assert!(generator.prompts.lock().unwrap()[0].contains("Linalool: 100%"));
    }

    #[test]
    fn test_blank_reply_uses_fallback() {
        let generator = MockGenerator::replying("  \n");
        let text = analyze(&generator, &composition(), Some("key")).unwrap();
        assert_eq!(text, NO_RESULT);
    }

    #[test]
    fn test_service_failure_single_attempt() {
        let generator = MockGenerator::failing("quota exceeded");
        let err = analyze(&generator, &composition(), Some("key")).unwrap_err();
        assert!(matches!(err, BlendError::Service(ref m) if m == "quota exceeded"));
        assert_eq!(generator.calls(), 1);
    }

    #[test]
    fn test_connection_sends_hello() {
        let generator = MockGenerator::replying("Hi");
        test_connection(&generator, "key").unwrap();
        assert_eq!(
            generator.prompts.lock().unwrap().as_slice(),
            [prompt::CONNECTION_TEST_PROMPT.to_string()]
        );
        assert!(test_connection(&generator, " ").unwrap_err().is_missing_credential());
    }
}
