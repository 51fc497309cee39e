use axum::{
    extract::State,
    http::{HeaderMap, Request, StatusCode},
    response::Response,
    routing::{get, post},
    Router,
};
use serde_json::json;
use tower_http::{
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::content::handler::{fetch_content, fetch_content_preflight};
use crate::response::CorsHeaders;
use crate::state::AppState;
use crate::translate::handler::{translate, translate_preflight};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn create_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/api/health", get(health_check))
        .route("/translate", post(translate).options(translate_preflight))
        .route(
            "/fetch-content",
            post(fetch_content).options(fetch_content_preflight),
        )
}

/// Full application: routes, request ids and request tracing
pub fn create_app(state: AppState) -> Router {
    create_routes()
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

/// Request id sent by the client or assigned by [`SetRequestIdLayer`]
pub fn request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

#[derive(Clone, Copy, Default)]
struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

async fn health_check(State(state): State<AppState>) -> Response {
    CorsHeaders::content(&state.config.cors).json(
        StatusCode::OK,
        &json!({
            "status": "ok",
            "translateProvider": state.translator.name()
        }),
    )
}
