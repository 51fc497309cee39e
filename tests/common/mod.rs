#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use serde_json::Value;
use translate_gateway::translate::{
    ProviderError, ProviderTranslation, TranslationProvider, TransportFailure,
};
use translate_gateway::{create_app, AppState, Config};

/// What the mock provider should answer with
#[derive(Clone)]
pub enum MockOutcome {
    Success,
    UnsupportedPair,
    InvalidRequest,
    Failure,
    Timeout,
}

/// Provider returning a fixed answer and recording what it was asked
pub struct MockTranslator {
    outcome: MockOutcome,
    pub calls: Mutex<Vec<(String, String, String)>>,
}

impl MockTranslator {
    pub fn new(outcome: MockOutcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl TranslationProvider for MockTranslator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn translate_text(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<ProviderTranslation, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), source.to_string(), target.to_string()));

        match self.outcome {
            MockOutcome::Success => Ok(ProviderTranslation {
                translated_text: "¡Hola mundo!".to_string(),
                source_language: "en".to_string(),
                target_language: target.to_string(),
            }),
            MockOutcome::UnsupportedPair => Err(ProviderError::UnsupportedLanguagePair(
                "Unsupported language pair: en to xx".to_string(),
            )),
            MockOutcome::InvalidRequest => Err(ProviderError::InvalidRequest(
                "Text contains invalid characters".to_string(),
            )),
            MockOutcome::Failure => Err(ProviderError::Unknown(
                "AWS Translate service error: secret internals".to_string(),
            )),
            MockOutcome::Timeout => Err(ProviderError::Transport(TransportFailure::Timeout)),
        }
    }
}

pub fn test_app(translator: Arc<dyn TranslationProvider>) -> Router {
    test_app_with_config(Config::default(), translator)
}

pub fn test_app_with_config(config: Config, translator: Arc<dyn TranslationProvider>) -> Router {
    let state = AppState::with_translator(config, translator).unwrap();
    create_app(state)
}

pub fn post_json(uri: &str, body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
