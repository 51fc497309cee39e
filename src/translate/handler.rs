use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Response,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use super::interface::ProviderError;
use super::validation::validate_translation_request;
use crate::response::{CorsHeaders, ErrorBody};
use crate::routes::request_id;
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub translated_text: String,
    pub detected_source_language: String,
    pub target_language: String,
    pub timestamp: String,
}

pub async fn translate_preflight(State(state): State<AppState>) -> Response {
    CorsHeaders::translate(&state.config.cors).preflight()
}

#[tracing::instrument(skip_all, fields(req_id = tracing::field::Empty))]
pub async fn translate(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let cors = CorsHeaders::translate(&state.config.cors);
    let req_id = request_id(&headers);
    if let Some(id) = &req_id {
        tracing::Span::current().record("req_id", id.as_str());
    }
    info!(
        "Processing translation request at {}",
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    );

    let body: Value = match serde_json::from_slice(&body) {
        Ok(body) => body,
        Err(e) => {
            error!("Invalid JSON in request: {}", e);
            return cors.error(
                StatusCode::BAD_REQUEST,
                ErrorBody::new("Invalid JSON in request body"),
            );
        }
    };

    let request =
        match validate_translation_request(&body, state.config.translate.max_text_length) {
            Ok(request) => request,
            Err(errors) => {
                warn!("Invalid input received: fields={:?}", errors.fields());
                return cors.error(StatusCode::BAD_REQUEST, ErrorBody::new(errors.to_string()));
            }
        };

    info!(
        "Translating text from {} to {} via {}",
        request.source_language,
        request.target_language,
        state.translator.name()
    );

    let outcome = state
        .translator
        .translate_text(
            &request.text,
            &request.source_language,
            &request.target_language,
        )
        .await;

    match outcome {
        Ok(translation) => {
            info!("Translation completed successfully");
            let result = TranslationResult {
                translated_text: translation.translated_text,
                detected_source_language: translation.source_language,
                target_language: translation.target_language,
                timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            };
            cors.json(StatusCode::OK, &result)
        }
        Err(ProviderError::UnsupportedLanguagePair(detail)) => {
            error!("Unsupported language pair: {}", detail);
            cors.error(
                StatusCode::BAD_REQUEST,
                ErrorBody::new("Unsupported language pair").with_detail(detail),
            )
        }
        Err(ProviderError::InvalidRequest(detail)) => {
            error!("Invalid request: {}", detail);
            cors.error(StatusCode::BAD_REQUEST, ErrorBody::new(detail))
        }
        Err(e) => {
            error!("Unexpected error: {}", e);
            cors.error(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new("Internal server error").with_request_id(req_id),
            )
        }
    }
}
