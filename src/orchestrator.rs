//! Provider selection, fallback policy, and word/phrase classification.
//!
//! This is the only layer that interprets provider failures: adapters
//! surface raw errors, and the policy below decides which of them get a
//! fallback hop and which error ultimately reaches the caller.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::dictionary::DictionaryEntry;
use crate::error::{TranslateError, TranslateResult};
use crate::providers::{LookupProvider, TranslateProvider};
use crate::settings::Settings;
use crate::types::{ProviderKind, TranslationRequest, TranslationResult};

/// Closed character class: Latin letters, CJK ideographs, kana, Hangul.
/// Deliberately not a general word-boundary algorithm.
static SINGLE_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z\u{4E00}-\u{9FFF}\u{3040}-\u{309F}\u{30A0}-\u{30FF}\u{AC00}-\u{D7AF}]+$",
    )
    .expect("single-word pattern is valid")
});

/// A word iff the trimmed text contains no whitespace and consists solely of
/// letters from the allowed scripts. Digits, punctuation, and anything with
/// embedded whitespace classify as a phrase.
pub fn is_single_word(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && SINGLE_WORD.is_match(trimmed)
}

/// Resolves translation requests against the configured backends.
pub struct Orchestrator {
    default_free: Arc<dyn TranslateProvider>,
    alt_free: Arc<dyn TranslateProvider>,
    ai: Arc<dyn LookupProvider>,
}

impl Orchestrator {
    pub fn new(
        default_free: Arc<dyn TranslateProvider>,
        alt_free: Arc<dyn TranslateProvider>,
        ai: Arc<dyn LookupProvider>,
    ) -> Self {
        Self {
            default_free,
            alt_free,
            ai,
        }
    }

    /// Build the real provider set from persisted settings.
    pub fn from_settings(settings: &Settings) -> TranslateResult<Self> {
        Ok(Self::new(
            Arc::new(crate::providers::MyMemoryProvider::new()?),
            Arc::new(crate::providers::LibreTranslateProvider::new()?),
            Arc::new(crate::providers::AiProvider::new(
                settings.api_key.clone(),
                settings.api_base_url.clone(),
            )?),
        ))
    }

    /// Resolve one request into a result, applying the fallback policy.
    ///
    /// Fails only once every applicable fallback has been exhausted:
    /// - alt-free requests propagate their own failure (no hop defined),
    /// - AI requests fall back once to the alternate free translator but
    ///   surface the original AI error if the hop also fails,
    /// - everything else goes through the default free translator with one
    ///   hop to the alternate, surfacing the second failure.
    pub async fn resolve(
        &self,
        request: &TranslationRequest,
    ) -> TranslateResult<TranslationResult> {
        let text = request.text.trim();
        if text.is_empty() {
            return Err(TranslateError::Protocol("nothing to translate".to_string()));
        }
        let provider = request.provider.unwrap_or_default();

        if provider == ProviderKind::Ai && is_single_word(text) {
            match self.ai.lookup_word(text, &request.target, &|_: &str| {}).await {
                Ok(entry) => return Ok(TranslationResult::WordLookup { entry }),
                Err(err) => {
                    // Degrade to plain translation; the failure is recorded
                    // here because the user will never see it.
                    tracing::warn!(
                        provider = self.ai.name(),
                        error = %err,
                        "word lookup failed, degrading to plain translation"
                    );
                }
            }
        }

        let translation = match provider {
            ProviderKind::AltFree => self.alt_free.translate(text, &request.target).await?,
            ProviderKind::Ai => match self.ai.translate(text, &request.target).await {
                Ok(translation) => translation,
                // A missing credential is fatal for the request: falling
                // back would mask a fixable configuration problem
                Err(err @ TranslateError::Config(_)) => return Err(err),
                Err(ai_err) => {
                    tracing::debug!(
                        provider = self.ai.name(),
                        error = %ai_err,
                        "falling back to alternate translator"
                    );
                    match self.alt_free.translate(text, &request.target).await {
                        Ok(translation) => translation,
                        // Root cause beats the fallback error
                        Err(_) => return Err(ai_err),
                    }
                }
            },
            ProviderKind::DefaultFree => {
                match self.default_free.translate(text, &request.target).await {
                    Ok(translation) => translation,
                    Err(err) => {
                        tracing::debug!(
                            provider = self.default_free.name(),
                            error = %err,
                            "falling back to alternate translator"
                        );
                        self.alt_free.translate(text, &request.target).await?
                    }
                }
            }
        };

        Ok(TranslationResult::Plain { translation })
    }

    /// Streaming dictionary lookup. Terminal on failure: a broken stream
    /// cannot be retried mid-flight, so no fallback applies here.
    pub async fn lookup_stream(
        &self,
        word: &str,
        target: &str,
        on_partial: &(dyn for<'a> Fn(&'a str) + Send + Sync),
    ) -> TranslateResult<DictionaryEntry> {
        self.ai.lookup_word(word.trim(), target, on_partial).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{MockLookup, MockMode, MockTranslator};

    fn network_error(msg: &str) -> TranslateError {
        TranslateError::Network(msg.to_string())
    }

    struct Fixture {
        default_free: Arc<MockTranslator>,
        alt_free: Arc<MockTranslator>,
        ai: Arc<MockLookup>,
    }

    impl Fixture {
        fn new(default_mode: MockMode, alt_mode: MockMode, ai: MockLookup) -> Self {
            Self {
                default_free: Arc::new(MockTranslator::new("default-free", default_mode)),
                alt_free: Arc::new(MockTranslator::new("alt-free", alt_mode)),
                ai: Arc::new(ai),
            }
        }

        fn orchestrator(&self) -> Orchestrator {
            Orchestrator::new(
                self.default_free.clone(),
                self.alt_free.clone(),
                self.ai.clone(),
            )
        }
    }

    #[test]
    fn test_single_word_classification() {
        assert!(is_single_word("hello"));
        assert!(is_single_word("  hello  "));
        assert!(is_single_word("你好"));
        assert!(is_single_word("カタカナ"));
        assert!(is_single_word("안녕"));
    }

    #[test]
    fn test_whitespace_means_phrase() {
        assert!(!is_single_word("hello world"));
        assert!(!is_single_word("hello\tworld"));
        assert!(!is_single_word("hello\nworld"));
        assert!(!is_single_word(""));
        assert!(!is_single_word("   "));
    }

    #[test]
    fn test_classification_is_a_closed_class() {
        assert!(!is_single_word("don't"));
        assert!(!is_single_word("hello!"));
        assert!(!is_single_word("42"));
        assert!(!is_single_word("résumé"));
    }

    #[tokio::test]
    async fn test_default_provider_success() {
        let fixture = Fixture::new(
            MockMode::Suffix,
            MockMode::Suffix,
            MockLookup::new("ai", MockMode::Suffix, vec![]),
        );
        let result = fixture
            .orchestrator()
            .resolve(&TranslationRequest::new("hello", "zh"))
            .await
            .unwrap();
        assert_eq!(
            result,
            TranslationResult::Plain {
                translation: "hello:zh".to_string()
            }
        );
        assert_eq!(fixture.default_free.call_count(), 1);
        assert_eq!(fixture.alt_free.call_count(), 0);
    }

    #[tokio::test]
    async fn test_default_provider_falls_back_exactly_once() {
        let fixture = Fixture::new(
            MockMode::Fail(network_error("HTTP 500")),
            MockMode::Fixed("fallback output".to_string()),
            MockLookup::new("ai", MockMode::Suffix, vec![]),
        );
        let result = fixture
            .orchestrator()
            .resolve(&TranslationRequest::new("hello world", "zh"))
            .await
            .unwrap();
        assert_eq!(
            result,
            TranslationResult::Plain {
                translation: "fallback output".to_string()
            }
        );
        assert_eq!(fixture.default_free.call_count(), 1);
        assert_eq!(fixture.alt_free.call_count(), 1);
    }

    #[tokio::test]
    async fn test_default_path_surfaces_second_failure() {
        let fixture = Fixture::new(
            MockMode::Fail(network_error("primary down")),
            MockMode::Fail(network_error("fallback down")),
            MockLookup::new("ai", MockMode::Suffix, vec![]),
        );
        let err = fixture
            .orchestrator()
            .resolve(&TranslationRequest::new("hello world", "zh"))
            .await
            .unwrap_err();
        assert_eq!(err, network_error("fallback down"));
    }

    #[tokio::test]
    async fn test_alt_free_failure_propagates_without_fallback() {
        let fixture = Fixture::new(
            MockMode::Suffix,
            MockMode::Fail(network_error("HTTP 429")),
            MockLookup::new("ai", MockMode::Suffix, vec![]),
        );
        let err = fixture
            .orchestrator()
            .resolve(&TranslationRequest::new("hello", "zh").with_provider(ProviderKind::AltFree))
            .await
            .unwrap_err();
        assert_eq!(err, network_error("HTTP 429"));
        assert_eq!(fixture.default_free.call_count(), 0);
        assert_eq!(fixture.alt_free.call_count(), 1);
    }

    #[tokio::test]
    async fn test_ai_phrase_translation_uses_ai() {
        let fixture = Fixture::new(
            MockMode::Suffix,
            MockMode::Suffix,
            MockLookup::new("ai", MockMode::Fixed("ai output".to_string()), vec![]),
        );
        let result = fixture
            .orchestrator()
            .resolve(
                &TranslationRequest::new("hello there", "zh").with_provider(ProviderKind::Ai),
            )
            .await
            .unwrap();
        assert_eq!(
            result,
            TranslationResult::Plain {
                translation: "ai output".to_string()
            }
        );
        assert_eq!(fixture.ai.lookup_calls(), 0);
    }

    #[tokio::test]
    async fn test_ai_failure_surfaces_original_error() {
        // Both the AI call and the fallback fail: the caller must see the
        // AI error, preserving the root cause
        let fixture = Fixture::new(
            MockMode::Suffix,
            MockMode::Fail(network_error("fallback down")),
            MockLookup::new(
                "ai",
                MockMode::Fail(network_error("ai down")),
                vec![],
            ),
        );
        let err = fixture
            .orchestrator()
            .resolve(&TranslationRequest::new("hello there", "zh").with_provider(ProviderKind::Ai))
            .await
            .unwrap_err();
        assert_eq!(err, network_error("ai down"));
        assert_eq!(fixture.alt_free.call_count(), 1);
    }

    #[tokio::test]
    async fn test_ai_failure_with_working_fallback() {
        let fixture = Fixture::new(
            MockMode::Suffix,
            MockMode::Fixed("fallback output".to_string()),
            MockLookup::new("ai", MockMode::Fail(network_error("ai down")), vec![]),
        );
        let result = fixture
            .orchestrator()
            .resolve(&TranslationRequest::new("hello there", "zh").with_provider(ProviderKind::Ai))
            .await
            .unwrap();
        assert_eq!(
            result,
            TranslationResult::Plain {
                translation: "fallback output".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_ai_single_word_returns_word_lookup() {
        let entry: DictionaryEntry = serde_json::from_str(r#"{"word":"hello"}"#).unwrap();
        let fixture = Fixture::new(
            MockMode::Suffix,
            MockMode::Suffix,
            MockLookup::streaming_entry("ai", MockMode::Suffix, &entry),
        );
        let result = fixture
            .orchestrator()
            .resolve(&TranslationRequest::new("hello", "zh").with_provider(ProviderKind::Ai))
            .await
            .unwrap();
        assert_eq!(result, TranslationResult::WordLookup { entry });
    }

    #[tokio::test]
    async fn test_ai_single_word_lookup_failure_degrades_silently() {
        // The lookup failure is swallowed and the request continues down the
        // generic AI translation path
        let fixture = Fixture::new(
            MockMode::Suffix,
            MockMode::Suffix,
            MockLookup::failing(
                "ai",
                MockMode::Fixed("plain ai".to_string()),
                TranslateError::MalformedResponse("bad stream".to_string()),
            ),
        );
        let result = fixture
            .orchestrator()
            .resolve(&TranslationRequest::new("hello", "zh").with_provider(ProviderKind::Ai))
            .await
            .unwrap();
        assert_eq!(
            result,
            TranslationResult::Plain {
                translation: "plain ai".to_string()
            }
        );
        assert_eq!(fixture.ai.lookup_calls(), 1);
        assert_eq!(fixture.ai.translate_calls(), 1);
    }

    #[tokio::test]
    async fn test_default_provider_never_attempts_lookup() {
        let fixture = Fixture::new(
            MockMode::Suffix,
            MockMode::Suffix,
            MockLookup::new("ai", MockMode::Suffix, vec![]),
        );
        let result = fixture
            .orchestrator()
            .resolve(&TranslationRequest::new("hello", "zh"))
            .await
            .unwrap();
        assert!(matches!(result, TranslationResult::Plain { .. }));
        assert_eq!(fixture.ai.lookup_calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_text_is_rejected() {
        let fixture = Fixture::new(
            MockMode::Suffix,
            MockMode::Suffix,
            MockLookup::new("ai", MockMode::Suffix, vec![]),
        );
        let err = fixture
            .orchestrator()
            .resolve(&TranslationRequest::new("   ", "zh"))
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::Protocol(_)));
        assert_eq!(fixture.default_free.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_credential_is_fatal_without_fallback() {
        // An unconfigured AI credential degrades the lookup pre-step, but
        // the generic AI call then fails fast with no fallback hop
        let fixture = Fixture::new(
            MockMode::Suffix,
            MockMode::Fixed("fallback output".to_string()),
            MockLookup::failing(
                "ai",
                MockMode::Fail(TranslateError::Config("no key".to_string())),
                TranslateError::Config("no key".to_string()),
            ),
        );
        let err = fixture
            .orchestrator()
            .resolve(&TranslationRequest::new("hello", "zh").with_provider(ProviderKind::Ai))
            .await
            .unwrap_err();
        assert_eq!(err, TranslateError::Config("no key".to_string()));
        assert_eq!(fixture.alt_free.call_count(), 0);
    }
}
