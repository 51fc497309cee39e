use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use serde::Serialize;
use tracing::error;

use crate::config::CorsConfig;

/// Error payload shared by every endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: None,
            request_id: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }
}

/// Header set attached to every response of an endpoint.
///
/// All handler branches, errors included, build their response through
/// [`CorsHeaders::json`] or [`CorsHeaders::preflight`].
#[derive(Debug, Clone)]
pub struct CorsHeaders {
    allow_origin: String,
    allow_credentials: bool,
    allow_headers: Option<String>,
    allow_methods: Option<String>,
}

impl CorsHeaders {
    /// Headers for `/translate`, including the allowed headers and methods
    pub fn translate(cors: &CorsConfig) -> Self {
        Self {
            allow_origin: cors.allowed_origin.clone(),
            allow_credentials: cors.allow_credentials,
            allow_headers: Some(cors.allowed_headers.clone()),
            allow_methods: Some(cors.allowed_methods.clone()),
        }
    }

    /// Headers for `/fetch-content` and the health route
    pub fn content(cors: &CorsConfig) -> Self {
        Self {
            allow_origin: cors.allowed_origin.clone(),
            allow_credentials: cors.allow_credentials,
            allow_headers: None,
            allow_methods: None,
        }
    }

    pub fn json<T: Serialize>(&self, status: StatusCode, body: &T) -> Response {
        match serde_json::to_string(body) {
            Ok(json) => self.build(status, Body::from(json)),
            Err(e) => {
                error!("Failed to serialize response body: {}", e);
                self.build(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Body::from(r#"{"error":"Internal server error"}"#),
                )
            }
        }
    }

    pub fn error(&self, status: StatusCode, body: ErrorBody) -> Response {
        self.json(status, &body)
    }

    /// Empty 200 answer to a CORS preflight
    pub fn preflight(&self) -> Response {
        self.build(StatusCode::OK, Body::empty())
    }

    fn build(&self, status: StatusCode, body: Body) -> Response {
        let mut response = Response::new(body);
        *response.status_mut() = status;

        let headers = response.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        insert_header(headers, header::ACCESS_CONTROL_ALLOW_ORIGIN, &self.allow_origin);
        if self.allow_credentials {
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
                HeaderValue::from_static("true"),
            );
        }
        if let Some(allow_headers) = &self.allow_headers {
            insert_header(headers, header::ACCESS_CONTROL_ALLOW_HEADERS, allow_headers);
        }
        if let Some(allow_methods) = &self.allow_methods {
            insert_header(headers, header::ACCESS_CONTROL_ALLOW_METHODS, allow_methods);
        }

        response
    }
}

fn insert_header(headers: &mut axum::http::HeaderMap, name: header::HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(_) => error!("Invalid header value configured for {}: {:?}", name, value),
    }
}
