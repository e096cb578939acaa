//! Deterministic providers for exercising the engine without network access.
//!
//! # Example
//!
//! ```ignore
//! use quick_translator::providers::{MockMode, MockTranslator, TranslateProvider};
//!
//! #[tokio::test]
//! async fn test_translation() {
//!     let mock = MockTranslator::new("default", MockMode::Suffix);
//!     let result = mock.translate("hello", "fr").await.unwrap();
//!     assert_eq!(result, "hello:fr");
//! }
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::dictionary::DictionaryEntry;
use crate::error::{TranslateError, TranslateResult};
use crate::providers::{LookupProvider, TranslateProvider};
use crate::stream::LookupStream;

/// Mock translation modes for testing different scenarios
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Append the target code: "hello" → "hello:fr"
    Suffix,
    /// Always return the same canned output
    Fixed(String),
    /// Always fail with the given error
    Fail(TranslateError),
}

/// Deterministic translator with a call counter, so tests can assert how
/// many provider calls a policy actually made.
#[derive(Debug)]
pub struct MockTranslator {
    name: String,
    mode: MockMode,
    delay_ms: u64,
    calls: AtomicUsize,
}

impl MockTranslator {
    pub fn new(name: &str, mode: MockMode) -> Self {
        Self {
            name: name.to_string(),
            mode,
            delay_ms: 0,
            calls: AtomicUsize::new(0),
        }
    }

    /// Simulate network latency on every call.
    pub fn with_delay(name: &str, mode: MockMode, delay_ms: u64) -> Self {
        Self {
            delay_ms,
            ..Self::new(name, mode)
        }
    }

    /// Number of `translate` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn apply(&self, text: &str, target: &str) -> TranslateResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
        match &self.mode {
            MockMode::Suffix => Ok(format!("{}:{}", text, target)),
            MockMode::Fixed(output) => Ok(output.clone()),
            MockMode::Fail(err) => Err(err.clone()),
        }
    }
}

#[async_trait]
impl TranslateProvider for MockTranslator {
    async fn translate(&self, text: &str, target: &str) -> TranslateResult<String> {
        self.apply(text, target).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Scripted lookup provider: plain translation behaves like
/// [`MockTranslator`], and `lookup_word` replays raw stream chunks through a
/// real [`LookupStream`] so tests exercise the actual decoder.
#[derive(Debug)]
pub struct MockLookup {
    inner: MockTranslator,
    script: Vec<String>,
    lookup_failure: Option<TranslateError>,
    lookup_calls: AtomicUsize,
}

impl MockLookup {
    /// Lookup replays `script` chunks and finalizes whatever they build.
    pub fn new(name: &str, translate_mode: MockMode, script: Vec<&str>) -> Self {
        Self {
            inner: MockTranslator::new(name, translate_mode),
            script: script.into_iter().map(|s| s.to_string()).collect(),
            lookup_failure: None,
            lookup_calls: AtomicUsize::new(0),
        }
    }

    /// Lookup always fails with `err` before producing any chunk.
    pub fn failing(name: &str, translate_mode: MockMode, err: TranslateError) -> Self {
        Self {
            lookup_failure: Some(err),
            ..Self::new(name, translate_mode, Vec::new())
        }
    }

    /// Convenience script that streams `entry` as two deltas plus sentinel.
    pub fn streaming_entry(name: &str, translate_mode: MockMode, entry: &DictionaryEntry) -> Self {
        let encoded = serde_json::to_string(entry).expect("entry serializes to JSON");
        // Split roughly in half, nudged to a char boundary
        let mut mid = encoded.len() / 2;
        while !encoded.is_char_boundary(mid) {
            mid += 1;
        }
        let (head, tail) = encoded.split_at(mid);
        let script = vec![
            format!(
                "data: {}\n",
                serde_json::json!({ "delta": head })
            ),
            format!(
                "data: {}\n",
                serde_json::json!({ "delta": tail })
            ),
            "data: [DONE]\n".to_string(),
        ];
        Self {
            inner: MockTranslator::new(name, translate_mode),
            script,
            lookup_failure: None,
            lookup_calls: AtomicUsize::new(0),
        }
    }

    pub fn translate_calls(&self) -> usize {
        self.inner.call_count()
    }

    pub fn lookup_calls(&self) -> usize {
        self.lookup_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranslateProvider for MockLookup {
    async fn translate(&self, text: &str, target: &str) -> TranslateResult<String> {
        self.inner.translate(text, target).await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[async_trait]
impl LookupProvider for MockLookup {
    async fn lookup_word(
        &self,
        _word: &str,
        _target: &str,
        on_partial: &(dyn for<'a> Fn(&'a str) + Send + Sync),
    ) -> TranslateResult<DictionaryEntry> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.lookup_failure {
            return Err(err.clone());
        }
        let mut session = LookupStream::new();
        for chunk in &self.script {
            session.feed(chunk, &mut |partial| on_partial(partial));
        }
        session.finish()
    }
}
