//! Page-side selection and panel state machine.
//!
//! Drives selection capture → floating affordance → panel lifecycle, kept
//! free of any rendering concern: the host feeds selections, responses, and
//! stream events in, and reads the current pane text and affordance state
//! back out. All panel state lives in one explicit session object per page
//! context, so at most one panel and one floating affordance can exist.

use crate::dictionary::{format_entry, format_partial};
use crate::messaging::{Event, LookupRequest, Request, Response};
use crate::orchestrator::is_single_word;
use crate::settings::Settings;
use crate::types::{ProviderKind, TranslationRequest, TranslationResult};

const TRANSLATING_BANNER: &str = "translating…";

/// Selection / panel lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelState {
    Idle,
    /// Text is selected and the floating affordance is visible
    AffordanceShown { text: String },
    /// The panel is open over `source` text
    PanelOpen { source: String, view: PanelView },
}

/// What the open panel is currently showing.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelView {
    /// A translate request is in flight
    Translating,
    /// A result is rendered, nothing further offered
    ShowingResult { rendered: String },
    /// A result is rendered and the AI-lookup affordance is offered
    AwaitingAiLookup { word: String, rendered: String },
    /// A lookup stream is live-updating the pane
    StreamingAiLookup { word: String, rendered: String },
}

/// Per-page panel session.
pub struct PanelController {
    settings: Settings,
    state: PanelState,
}

impl PanelController {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            state: PanelState::Idle,
        }
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Apply a settings change notification. Open panel state is untouched;
    /// the new settings take effect on the next submission.
    pub fn apply_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    /// Current text pane contents, if a panel is open.
    pub fn display(&self) -> Option<&str> {
        match &self.state {
            PanelState::PanelOpen { view, .. } => Some(match view {
                PanelView::Translating => TRANSLATING_BANNER,
                PanelView::ShowingResult { rendered }
                | PanelView::AwaitingAiLookup { rendered, .. }
                | PanelView::StreamingAiLookup { rendered, .. } => rendered.as_str(),
            }),
            _ => None,
        }
    }

    /// Whether the AI-lookup affordance is currently offered.
    pub fn ai_affordance_visible(&self) -> bool {
        matches!(
            self.state,
            PanelState::PanelOpen {
                view: PanelView::AwaitingAiLookup { .. },
                ..
            }
        )
    }

    /// A new selection on the page. Replaces any previous affordance; an
    /// empty selection clears it. Ignored while the panel is open.
    pub fn on_selection(&mut self, text: &str) {
        if matches!(self.state, PanelState::PanelOpen { .. }) {
            return;
        }
        let trimmed = text.trim();
        self.state = if trimmed.is_empty() {
            PanelState::Idle
        } else {
            PanelState::AffordanceShown {
                text: trimmed.to_string(),
            }
        };
    }

    /// Activate the floating affordance: open the panel over the selected
    /// text and submit it. Returns the request to send, if any.
    pub fn activate_affordance(&mut self) -> Option<Request> {
        let PanelState::AffordanceShown { text } = &self.state else {
            return None;
        };
        let text = text.clone();
        self.open_with_selection(&text)
    }

    /// Open the panel directly over `text` (hotkey path). Supersedes and
    /// removes any floating affordance.
    pub fn open_with_selection(&mut self, text: &str) -> Option<Request> {
        let trimmed = text.trim().to_string();
        if trimmed.is_empty() {
            self.state = PanelState::PanelOpen {
                source: trimmed,
                view: PanelView::ShowingResult {
                    rendered: String::new(),
                },
            };
            return None;
        }
        self.state = PanelState::PanelOpen {
            source: trimmed.clone(),
            view: PanelView::Translating,
        };
        Some(self.translate_request(&trimmed))
    }

    /// Submit (or re-submit) panel text for translation.
    pub fn submit(&mut self, text: &str) -> Option<Request> {
        let trimmed = text.trim().to_string();
        if trimmed.is_empty() {
            return None;
        }
        let PanelState::PanelOpen { source, view } = &mut self.state else {
            return None;
        };
        *source = trimmed.clone();
        *view = PanelView::Translating;
        Some(self.translate_request(&trimmed))
    }

    /// Single words under the AI provider get the public translation first;
    /// the AI lookup is offered afterwards as a follow-up affordance.
    fn translate_request(&self, text: &str) -> Request {
        let provider = if self.settings.provider == ProviderKind::Ai && is_single_word(text) {
            ProviderKind::DefaultFree
        } else {
            self.settings.provider
        };
        Request::Translate(
            TranslationRequest::new(text, self.settings.target_language.clone())
                .with_provider(provider),
        )
    }

    /// Translation response for the in-flight request. Responses arriving
    /// after the panel closed, or for a superseded submission, are dropped.
    pub fn on_response(&mut self, response: &Response) {
        let PanelState::PanelOpen { source, view } = &mut self.state else {
            return;
        };
        if !matches!(view, PanelView::Translating) {
            return;
        }

        if !response.ok {
            let message = response.error.as_deref().unwrap_or("unknown error");
            *view = PanelView::ShowingResult {
                rendered: format!("translation failed: {}", message),
            };
            return;
        }

        match &response.data {
            Some(TranslationResult::Plain { translation }) => {
                let offer_lookup =
                    self.settings.provider == ProviderKind::Ai && is_single_word(source);
                *view = if offer_lookup {
                    PanelView::AwaitingAiLookup {
                        word: source.clone(),
                        rendered: translation.clone(),
                    }
                } else {
                    PanelView::ShowingResult {
                        rendered: translation.clone(),
                    }
                };
            }
            Some(TranslationResult::WordLookup { entry }) => {
                *view = PanelView::ShowingResult {
                    rendered: format_entry(entry),
                };
            }
            None => {
                *view = PanelView::ShowingResult {
                    rendered: "translation failed: empty response".to_string(),
                };
            }
        }
    }

    /// Activate the AI-lookup affordance, starting the stream.
    pub fn request_ai_lookup(&mut self) -> Option<Request> {
        let PanelState::PanelOpen { view, .. } = &mut self.state else {
            return None;
        };
        let PanelView::AwaitingAiLookup { word, rendered } = view else {
            return None;
        };
        let word = word.clone();
        let rendered = rendered.clone();
        *view = PanelView::StreamingAiLookup {
            word: word.clone(),
            rendered,
        };
        Some(Request::LookupStream(LookupRequest {
            word,
            target: self.settings.target_language.clone(),
            provider: Some(ProviderKind::Ai),
        }))
    }

    /// Stream event from the background. `command:translate-selection` is
    /// not handled here: the host owns the page selection and routes it
    /// through [`Self::open_with_selection`].
    pub fn on_event(&mut self, event: &Event) {
        let PanelState::PanelOpen { view, .. } = &mut self.state else {
            return;
        };
        let PanelView::StreamingAiLookup { word, .. } = view else {
            return;
        };
        let word = word.clone();

        match event {
            Event::StreamUpdate { data } => {
                *view = PanelView::StreamingAiLookup {
                    word,
                    rendered: format_partial(data),
                };
            }
            Event::StreamComplete { data } => {
                // Affordance retracted: the lookup already happened
                *view = PanelView::ShowingResult {
                    rendered: format_entry(data),
                };
            }
            Event::StreamError { error } => {
                // Affordance restored so the user may retry
                *view = PanelView::AwaitingAiLookup {
                    word,
                    rendered: format!("lookup failed: {}", error),
                };
            }
            Event::TranslateSelection => {}
        }
    }

    /// Close the panel and drop all panel state.
    pub fn close(&mut self) {
        self.state = PanelState::Idle;
    }
}
