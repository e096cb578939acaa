//! Translation backend abstraction.
//!
//! This module defines the provider traits the orchestrator depends on,
//! keeping the engine decoupled from any particular backend. Each adapter
//! owns its request shaping (language-code mapping, prompt templates, auth
//! headers); callers see only the contracts below.
//!
//! # Example
//!
//! ```ignore
//! use quick_translator::providers::{MyMemoryProvider, TranslateProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = MyMemoryProvider::new()?;
//!     let result = provider.translate("Hello, world!", "fr").await?;
//!     println!("{}", result);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;

use crate::dictionary::DictionaryEntry;
use crate::error::TranslateResult;

pub mod ai;
pub mod libre;
pub mod mock;
pub mod mymemory;

pub use ai::AiProvider;
pub use libre::LibreTranslateProvider;
pub use mock::{MockLookup, MockMode, MockTranslator};
pub use mymemory::MyMemoryProvider;

/// Generic trait for translation providers
///
/// Implementations surface raw failures (`Network` on transport problems or
/// non-success status, `Protocol` on unparsable payloads); interpreting those
/// failures into fallback decisions is the orchestrator's job alone.
#[async_trait]
pub trait TranslateProvider: Send + Sync {
    /// Translate `text` into the `target` language code.
    async fn translate(&self, text: &str, target: &str) -> TranslateResult<String>;

    /// Provider name used for logging and debugging.
    fn name(&self) -> &str;
}

/// Streaming dictionary-lookup capability on top of plain translation.
#[async_trait]
pub trait LookupProvider: TranslateProvider {
    /// Look up a single word, streaming the response.
    ///
    /// `on_partial` receives the accumulated raw buffer after every content
    /// delta so the caller can render visible progress before the final
    /// structure exists. Returns the validated entry, or
    /// `MalformedResponse` if the stream never produced a valid structure.
    async fn lookup_word(
        &self,
        word: &str,
        target: &str,
        on_partial: &(dyn for<'a> Fn(&'a str) + Send + Sync),
    ) -> TranslateResult<DictionaryEntry>;
}
