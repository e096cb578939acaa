//! Quick-translator: a selection-translation engine.
//!
//! Select text, get a translation; select a single word, get a streamed
//! AI dictionary entry. The crate implements the orchestration core of that
//! flow: provider adapters with one-hop fallback, an incremental decoder for
//! token-streamed responses, the serialized message contract between the
//! privileged background service and the page UI, and the page-side panel
//! state machine. Rendering, layout, and storage of the page itself are the
//! host's problem.

pub mod controller;
pub mod detect;
pub mod dictionary;
pub mod error;
pub mod messaging;
pub mod orchestrator;
pub mod providers;
pub mod settings;
pub mod stream;
pub mod types;


pub use controller::{PanelController, PanelState, PanelView};
pub use detect::detect;
pub use dictionary::{DictionaryEntry, Frequency, PartOfSpeech, format_entry, format_partial};
pub use error::{TranslateError, TranslateResult};
pub use messaging::{Background, Delivery, Event, LookupRequest, PageSink, Request, Response};
pub use orchestrator::{Orchestrator, is_single_word};
pub use providers::{
    AiProvider, LibreTranslateProvider, LookupProvider, MockLookup, MockMode, MockTranslator,
    MyMemoryProvider, TranslateProvider,
};
pub use settings::{Settings, SettingsStore};
pub use stream::{LineBuffer, LookupStream};
pub use types::{ProviderKind, TranslationRequest, TranslationResult};
