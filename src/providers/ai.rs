//! OpenAI-compatible chat-completions provider.
//!
//! One backend, two operations: a single-shot translation that instructs the
//! model to emit the translated text only, and a streaming dictionary lookup
//! whose chunks are handed to the incremental decoder as they arrive. The
//! provider is configured with a user-supplied bearer token and an optional
//! base URL; a blank base URL resolves to the well-known endpoint.
//!
//! # Authentication
//!
//! Requests without a configured API key fail fast with a configuration
//! error before any network call is made.

use async_trait::async_trait;
use futures_util::StreamExt;
use serde_json::json;

use crate::dictionary::DictionaryEntry;
use crate::error::{TranslateError, TranslateResult};
use crate::providers::{LookupProvider, TranslateProvider};
use crate::stream::LookupStream;

/// Well-known chat-completions base, used when the configured URL is blank.
pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";

const DEFAULT_MODEL: &str = "deepseek-chat";

const TRANSLATE_SYSTEM_PROMPT: &str = "You are a professional translator. \
Translate the given text accurately while preserving its tone and style. \
Do not add explanations or notes. Only output the translated text.";

/// LLM-backed provider offering single-shot translation and streaming
/// structured dictionary lookup.
#[derive(Clone)]
pub struct AiProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl AiProvider {
    /// Create a provider from a bearer token and base URL. Either may be
    /// blank: a blank base URL falls back to the default endpoint, and a
    /// blank key defers the failure to the first request.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> TranslateResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| TranslateError::Network(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = base_url.into();
        let base_url = if base_url.trim().is_empty() {
            DEFAULT_BASE_URL.to_string()
        } else {
            base_url
        };

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url,
            model: DEFAULT_MODEL.to_string(),
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn require_key(&self) -> TranslateResult<&str> {
        let key = self.api_key.trim();
        if key.is_empty() {
            return Err(TranslateError::Config(
                "AI provider API key is not configured".to_string(),
            ));
        }
        Ok(key)
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Dictionary prompt. The entry must be a single JSON object, and every
    /// human-readable field is requested in the target language so the
    /// rendered pane matches the UI language. This is a content contract
    /// with the model, not something the decoder enforces.
    fn lookup_system_prompt(target: &str) -> String {
        format!(
            "You are a dictionary. Reply with exactly one JSON object and \
nothing else, in this shape: {{\"word\": string, \"phonetic\": string, \
\"part_of_speech\": [{{\"pos\": string, \"definitions\": [string], \
\"examples\": [string]}}], \"translations\": {{\"{target}\": [string]}}, \
\"frequency\": \"high\"|\"medium\"|\"low\", \"tags\": [string]}}. \
Write definitions, examples and tags in the {target} language. \
Do not wrap the object in markdown fences."
        )
    }

    async fn post_completion(
        &self,
        key: &str,
        body: &serde_json::Value,
    ) -> TranslateResult<reqwest::Response> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(key)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TranslateError::Network(format!("HTTP {}: {}", status, body)));
        }
        Ok(response)
    }
}

impl std::fmt::Debug for AiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiProvider")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl TranslateProvider for AiProvider {
    async fn translate(&self, text: &str, target: &str) -> TranslateResult<String> {
        let key = self.require_key()?;

        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": TRANSLATE_SYSTEM_PROMPT },
                {
                    "role": "user",
                    "content": format!(
                        "Translate the following text into {}:\n\n{}",
                        target, text
                    ),
                },
            ],
            "temperature": 0.3,
            "stream": false,
        });

        let response = self.post_completion(key, &body).await?;
        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranslateError::Protocol(format!("Failed to parse response: {}", e)))?;

        json.pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .ok_or_else(|| {
                TranslateError::Protocol(
                    "Invalid response: missing 'choices[0].message.content'".to_string(),
                )
            })
    }

    fn name(&self) -> &str {
        "AI"
    }
}

#[async_trait]
impl LookupProvider for AiProvider {
    async fn lookup_word(
        &self,
        word: &str,
        target: &str,
        on_partial: &(dyn for<'a> Fn(&'a str) + Send + Sync),
    ) -> TranslateResult<DictionaryEntry> {
        let key = self.require_key()?;

        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": Self::lookup_system_prompt(target) },
                { "role": "user", "content": word },
            ],
            "temperature": 0.3,
            "stream": true,
        });

        let response = self.post_completion(key, &body).await?;

        let mut stream = response.bytes_stream();
        let mut session = LookupStream::new();

        while let Some(chunk) = stream.next().await {
            let bytes =
                chunk.map_err(|e| TranslateError::Network(format!("Error reading stream: {}", e)))?;
            session.feed(&String::from_utf8_lossy(&bytes), &mut |partial| {
                on_partial(partial)
            });
            if session.is_closed() {
                break;
            }
        }

        session.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_base_url_uses_default() {
        let provider = AiProvider::new("key", "").unwrap();
        assert_eq!(provider.endpoint(), format!("{}/chat/completions", DEFAULT_BASE_URL));
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let provider = AiProvider::new("key", "https://example.com/v1/").unwrap();
        assert_eq!(provider.endpoint(), "https://example.com/v1/chat/completions");
    }

    #[tokio::test]
    async fn test_translate_without_key_fails_fast() {
        let provider = AiProvider::new("", "").unwrap();
        match provider.translate("hello", "zh").await {
            Err(TranslateError::Config(msg)) => assert!(msg.contains("not configured")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_lookup_without_key_fails_fast() {
        let provider = AiProvider::new("   ", "").unwrap();
        let result = provider.lookup_word("hello", "zh", &|_: &str| {}).await;
        assert!(matches!(result, Err(TranslateError::Config(_))));
    }

    #[test]
    fn test_lookup_prompt_names_target_language() {
        let prompt = AiProvider::lookup_system_prompt("zh-CN");
        assert!(prompt.contains("\"zh-CN\""));
        assert!(prompt.contains("in the zh-CN language"));
    }

    #[test]
    fn test_debug_masks_api_key() {
        let provider = AiProvider::new("secret-key", "").unwrap();
        let debug = format!("{:?}", provider);
        assert!(debug.contains("***"));
        assert!(!debug.contains("secret-key"));
    }
}
