use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Language code meaning "let the provider detect it"
pub const AUTO_DETECT: &str = "auto";

/// Result returned by a translation provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderTranslation {
    pub translated_text: String,
    /// Detected or echoed source language
    pub source_language: String,
    pub target_language: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    Timeout,
    Connect,
    Other,
}

impl std::fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportFailure::Timeout => write!(f, "timed out"),
            TransportFailure::Connect => write!(f, "connection failed"),
            TransportFailure::Other => write!(f, "transport error"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Unsupported language pair: {0}")]
    UnsupportedLanguagePair(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Provider call {0}")]
    Transport(TransportFailure),

    #[error("Provider error: {0}")]
    Unknown(String),
}

/// Translation provider interface
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Short provider name used in logs and the health route
    fn name(&self) -> &str;

    /// Translate `text` from `source` (or [`AUTO_DETECT`]) into `target`
    async fn translate_text(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<ProviderTranslation, ProviderError>;
}
