use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Response,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info, warn};
use url::Url;

use super::extractor::extract_content;
use crate::response::{CorsHeaders, ErrorBody};
use crate::routes::request_id;
use crate::state::AppState;

/// Accepted for API compatibility; extraction always keeps formatting
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFetchOptions {
    #[serde(default = "default_preserve_formatting")]
    pub preserve_formatting: bool,
}

fn default_preserve_formatting() -> bool {
    true
}

pub async fn fetch_content_preflight(State(state): State<AppState>) -> Response {
    CorsHeaders::content(&state.config.cors).preflight()
}

#[tracing::instrument(skip_all, fields(req_id = tracing::field::Empty))]
pub async fn fetch_content(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let cors = CorsHeaders::content(&state.config.cors);
    if let Some(id) = request_id(&headers) {
        tracing::Span::current().record("req_id", id.as_str());
    }

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

    let target = match body.get("url") {
        None | Some(Value::Null) => None,
        Some(Value::String(url)) if url.is_empty() => None,
        Some(other) => Some(other),
    };
    let Some(target) = target else {
        return cors.error(StatusCode::BAD_REQUEST, ErrorBody::new("URL is required"));
    };

    let Some(url) = target.as_str().and_then(parse_http_url) else {
        warn!("Rejected malformed URL: {}", target);
        return cors.error(StatusCode::BAD_REQUEST, ErrorBody::new("Invalid URL format"));
    };

    let preserve_formatting = serde_json::from_value::<ContentFetchOptions>(body.clone())
        .map(|o| o.preserve_formatting)
        .unwrap_or(true);
    info!(
        "Fetching content from {} (preserve_formatting={})",
        url, preserve_formatting
    );

    let html = match state.fetcher.fetch_html(url.as_str()).await {
        Ok(html) => html,
        Err(e) => {
            error!("Error fetching {}: {}", url, e);
            let status =
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            return cors.error(status, ErrorBody::new(e.public_message()));
        }
    };

    let extracted = match tokio::task::spawn_blocking(move || extract_content(&html)).await {
        Ok(extracted) => extracted,
        Err(e) => {
            error!("Extraction task for {} failed: {}", url, e);
            return cors.error(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new("Failed to fetch content"),
            );
        }
    };
    info!(
        "Extracted {} words in {} paragraphs from {}",
        extracted.metadata.word_count, extracted.metadata.paragraph_count, url
    );
    cors.json(StatusCode::OK, &extracted)
}

/// Absolute http(s) URL or nothing
fn parse_http_url(raw: &str) -> Option<Url> {
    let url = Url::parse(raw.trim()).ok()?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Some(url),
        _ => None,
    }
}
