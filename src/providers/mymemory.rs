//! MyMemory free translation provider (GET-based lookup).
//!
//! No credential is required. The service expects a `langpair` of the form
//! `SRC|TGT` with its own uppercase code flavor, so the adapter detects the
//! source script and maps both ends before issuing the request.

use async_trait::async_trait;

use crate::detect::detect;
use crate::error::{TranslateError, TranslateResult};
use crate::providers::TranslateProvider;

const DEFAULT_BASE_URL: &str = "https://api.mymemory.translated.net";

/// Free GET-based lookup translator
#[derive(Debug, Clone)]
pub struct MyMemoryProvider {
    client: reqwest::Client,
    base_url: String,
}

impl MyMemoryProvider {
    pub fn new() -> TranslateResult<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the adapter at a different endpoint, e.g. a test server.
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

    /// Map a generic language code to MyMemory's flavor.
    ///
    /// Chinese needs the region suffix (`ZH-CN`/`ZH-TW`); everything else is
    /// simply uppercased.
    fn language_code(lang: &str) -> String {
        match lang.to_lowercase().as_str() {
            "zh" | "zh-cn" | "cn" => "ZH-CN".to_string(),
            "zh-tw" => "ZH-TW".to_string(),
            "" => "EN".to_string(),
            other => other.to_uppercase(),
        }
    }
}

#[async_trait]
impl TranslateProvider for MyMemoryProvider {
    async fn translate(&self, text: &str, target: &str) -> TranslateResult<String> {
        if text.is_empty() {
            return Ok(String::new());
        }

        let langpair = format!(
            "{}|{}",
            Self::language_code(detect(text)),
            Self::language_code(target)
        );
        let url = format!("{}/get", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("q", text), ("langpair", langpair.as_str())])
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

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranslateError::Protocol(format!("Failed to parse response: {}", e)))?;

        json.pointer("/responseData/translatedText")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| {
                TranslateError::Protocol(
                    "Invalid response: missing 'responseData.translatedText'".to_string(),
                )
            })
    }

    fn name(&self) -> &str {
        "MyMemory"
    }
}
