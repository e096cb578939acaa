//! LibreTranslate provider (POST-based, public demo server).
//!
//! Used as the alternate free backend and as the single fallback hop for
//! the other providers. The public instance may rate limit.

use async_trait::async_trait;
use serde_json::json;

use crate::error::{TranslateError, TranslateResult};
use crate::providers::TranslateProvider;

const DEFAULT_BASE_URL: &str = "https://libretranslate.de";

/// Free POST-based translator
#[derive(Debug, Clone)]
pub struct LibreTranslateProvider {
    client: reqwest::Client,
    base_url: String,
}

impl LibreTranslateProvider {
    pub fn new() -> TranslateResult<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the adapter at a different endpoint, e.g. a self-hosted server.
    pub fn with_base_url(base_url: impl Into<String>) -> TranslateResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| TranslateError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl TranslateProvider for LibreTranslateProvider {
    async fn translate(&self, text: &str, target: &str) -> TranslateResult<String> {
        if text.is_empty() {
            return Ok(String::new());
        }

        let url = format!("{}/translate", self.base_url);
        let body = json!({
            "q": text,
            "source": "auto",
            "target": target,
            "format": "text",
        });

        let response = self.client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TranslateError::Network(format!("HTTP {}: {}", status, body)));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranslateError::Protocol(format!("Failed to parse response: {}", e)))?;

        json.get("translatedText")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| {
                TranslateError::Protocol("Invalid response: missing 'translatedText'".to_string())
            })
    }

    fn name(&self) -> &str {
        "LibreTranslate"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_succeeds() {
        let provider = LibreTranslateProvider::new();
        assert!(provider.is_ok());
        assert_eq!(provider.unwrap().name(), "LibreTranslate");
    }

    #[tokio::test]
    async fn test_translate_empty_text() {
        let provider = LibreTranslateProvider::new().unwrap();
        let result = provider.translate("", "fr").await.unwrap();
        assert_eq!(result, "");
    }
}
