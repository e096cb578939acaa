//! Request and result types shared across the engine.

use serde::{Deserialize, Serialize};

use crate::dictionary::DictionaryEntry;

/// Backend selection for a translation request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    /// Free GET-based lookup translator (MyMemory)
    #[default]
    DefaultFree,
    /// Free POST-based translator (LibreTranslate)
    AltFree,
    /// OpenAI-compatible chat-completions provider
    Ai,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::DefaultFree => "default-free",
            ProviderKind::AltFree => "alt-free",
            ProviderKind::Ai => "ai",
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default-free" | "mymemory" => Ok(ProviderKind::DefaultFree),
            "alt-free" | "libre" => Ok(ProviderKind::AltFree),
            "ai" | "deepseek" => Ok(ProviderKind::Ai),
            other => Err(format!("unknown provider: {}", other)),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One user-initiated translation. Immutable, consumed once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub text: String,
    /// Target language code, e.g. "zh", "en", "fr"
    pub target: String,
    /// Requested backend; `None` falls back to the default free provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderKind>,
}

impl TranslationRequest {
    pub fn new(text: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target: target.into(),
            provider: None,
        }
    }

    pub fn with_provider(mut self, provider: ProviderKind) -> Self {
        self.provider = Some(provider);
        self
    }
}

/// Outcome of a resolved request: either a plain translated string or, for
/// single words looked up through the AI provider, a full dictionary entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TranslationResult {
    Plain { translation: String },
    WordLookup { entry: DictionaryEntry },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_round_trip() {
        for kind in [
            ProviderKind::DefaultFree,
            ProviderKind::AltFree,
            ProviderKind::Ai,
        ] {
            let encoded = serde_json::to_string(&kind).unwrap();
            let decoded: ProviderKind = serde_json::from_str(&encoded).unwrap();
            assert_eq!(decoded, kind);
        }
    }

    #[test]
    fn test_provider_kind_wire_names() {
        assert_eq!(
            serde_json::to_string(&ProviderKind::DefaultFree).unwrap(),
            "\"default-free\""
        );
        assert_eq!(
            serde_json::to_string(&ProviderKind::AltFree).unwrap(),
            "\"alt-free\""
        );
        assert_eq!(serde_json::to_string(&ProviderKind::Ai).unwrap(), "\"ai\"");
    }

    #[test]
    fn test_provider_kind_from_str_aliases() {
        assert_eq!(
            "mymemory".parse::<ProviderKind>().unwrap(),
            ProviderKind::DefaultFree
        );
        assert_eq!(
            "libre".parse::<ProviderKind>().unwrap(),
            ProviderKind::AltFree
        );
        assert_eq!("ai".parse::<ProviderKind>().unwrap(), ProviderKind::Ai);
        assert!("bing".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_request_without_provider_deserializes() {
        let request: TranslationRequest =
            serde_json::from_str(r#"{"text":"hello","target":"zh"}"#).unwrap();
        assert_eq!(request.provider, None);
    }

    #[test]
    fn test_result_is_tagged() {
        let result = TranslationResult::Plain {
            translation: "bonjour".to_string(),
        };
        let encoded = serde_json::to_string(&result).unwrap();
        assert!(encoded.contains("\"kind\":\"plain\""));
    }
}
