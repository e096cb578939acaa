/// Error types for the translation engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    /// Missing or unusable credential; fatal for the request, never falls back
    Config(String),
    /// Transport failure or non-success HTTP status
    Network(String),
    /// A payload arrived but could not be interpreted
    Protocol(String),
    /// A stream finished without ever producing a valid structure
    MalformedResponse(String),
    /// Settings persistence failure
    Storage(String),
}

impl std::fmt::Display for TranslateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslateError::Config(msg) => write!(f, "Configuration error: {}", msg),
            TranslateError::Network(msg) => write!(f, "Network error: {}", msg),
            TranslateError::Protocol(msg) => write!(f, "Protocol error: {}", msg),
            TranslateError::MalformedResponse(msg) => write!(f, "Malformed response: {}", msg),
            TranslateError::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for TranslateError {}

impl From<reqwest::Error> for TranslateError {
    fn from(err: reqwest::Error) -> Self {
        TranslateError::Network(err.to_string())
    }
}

/// Result type for translation operations
pub type TranslateResult<T> = Result<T, TranslateError>;
