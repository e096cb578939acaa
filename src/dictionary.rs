//! Dictionary entry model and its plain-text rendering.
//!
//! The entry mirrors the JSON document the AI provider is prompted to emit.
//! Every field except `word` defaults when absent, so a minimal payload such
//! as `{"word":"hi"}` still deserializes into a usable entry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Rich lookup result for a single word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub part_of_speech: Vec<PartOfSpeech>,
    /// Per-language sense translations, keyed by language code
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub translations: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// One part-of-speech block with its definitions and usage examples.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartOfSpeech {
    #[serde(default)]
    pub pos: String,
    #[serde(default)]
    pub definitions: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
}

/// Rough usage frequency of the word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    High,
    Medium,
    Low,
}

impl Frequency {
    pub fn label(&self) -> &'static str {
        match self {
            Frequency::High => "high",
            Frequency::Medium => "medium",
            Frequency::Low => "low",
        }
    }
}

/// Render an entry as the plain text shown in the result pane.
pub fn format_entry(entry: &DictionaryEntry) -> String {
    let mut out = format!("📖 {}\n", entry.word);

    if let Some(phonetic) = &entry.phonetic {
        out.push_str(&format!("🔊 {}\n", phonetic));
    }

    for (index, pos) in entry.part_of_speech.iter().enumerate() {
        out.push('\n');
        out.push_str(&format!("{}. {}\n", index + 1, pos.pos));
        for (def_index, definition) in pos.definitions.iter().enumerate() {
            out.push_str(&format!("   {}) {}\n", def_index + 1, definition));
        }
        for example in &pos.examples {
            out.push_str(&format!("   💡 {}\n", example));
        }
    }

    for (lang, senses) in &entry.translations {
        out.push('\n');
        out.push_str(&format!("🌍 {}:\n", lang));
        for (index, sense) in senses.iter().enumerate() {
            out.push_str(&format!("   {}) {}\n", index + 1, sense));
        }
    }

    if let Some(frequency) = entry.frequency {
        out.push_str(&format!("\n📊 frequency: {}\n", frequency.label()));
    }

    if !entry.tags.is_empty() {
        out.push_str(&format!("🏷️ {}\n", entry.tags.join(", ")));
    }

    out.trim_end().to_string()
}

/// Best-effort rendering of a partial stream buffer.
///
/// If the buffer already parses as a complete entry it is rendered in full;
/// otherwise the raw text is shown under a progress banner so the user sees
/// the response grow instead of an empty pane.
pub fn format_partial(raw: &str) -> String {
    match serde_json::from_str::<DictionaryEntry>(raw) {
        Ok(entry) => format_entry(&entry),
        Err(_) => format!("🔄 looking up…\n\n{}", raw),
    }
}
