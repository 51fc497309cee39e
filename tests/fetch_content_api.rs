//! Tests for the /fetch-content endpoint, served against a local upstream

mod common;

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::Path,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use common::{body_bytes, body_json, post_json, test_app, test_app_with_config, MockOutcome, MockTranslator};
use serde_json::json;
use tower::ServiceExt;
use translate_gateway::config::FetchConfig;
use translate_gateway::Config;

const ARTICLE_HTML: &str = r#"<!DOCTYPE html>
<html>
  <head><title>Local Article</title><script>tracking()</script></head>
  <body>
    <nav>Home | About</nav>
    <article>
      <h2>Heading</h2>
      <p>First <strong>bold</strong> paragraph.</p>
      <p>See <a href="https://example.com/more">more</a><img src="pic.png"></p>
    </article>
    <footer>Copyright</footer>
  </body>
</html>"#;

/// `/hop/n` redirects to `/hop/n-1`; `/hop/0` is the page itself
async fn hop(Path(remaining): Path<u32>) -> Response {
    if remaining == 0 {
        ([(header::CONTENT_TYPE, "text/html")], "<p>done</p>").into_response()
    } else {
        Redirect::temporary(&format!("/hop/{}", remaining - 1)).into_response()
    }
}

/// Start an upstream server on an ephemeral port
async fn spawn_upstream() -> SocketAddr {
    let upstream = Router::new()
        .route(
            "/article",
            get(|| async { ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], ARTICLE_HTML) }),
        )
        .route(
            "/data.json",
            get(|| async { ([(header::CONTENT_TYPE, "application/json")], r#"{"html": "<p>no</p>"}"#) }),
        )
        .route(
            "/forbidden",
            get(|| async { (StatusCode::FORBIDDEN, "nope").into_response() }),
        )
        .route(
            "/broken",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response() }),
        )
        .route(
            "/unavailable",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "later").into_response() }),
        )
        .route("/hop/:remaining", get(hop))
        .route(
            "/huge",
            get(|| async {
                let html = format!("<p>{}</p>", "word ".repeat(2048));
                ([(header::CONTENT_TYPE, "text/html")], html)
            }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                ([(header::CONTENT_TYPE, "text/html")], "<p>late</p>")
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, upstream).await.unwrap();
    });
    addr
}

fn fetch_request(url: &str) -> Request<Body> {
    post_json("/fetch-content", json!({"url": url}).to_string())
}

#[tokio::test]
async fn test_extracts_article() {
    let addr = spawn_upstream().await;
    let app = test_app(MockTranslator::new(MockOutcome::Success));

    let response = app
        .oneshot(fetch_request(&format!("http://{}/article", addr)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let body = body_json(response).await;
    assert_eq!(body["title"], "Local Article");

    let content = body["content"].as_str().unwrap();
    assert!(content.starts_with("## Heading"));
    assert!(content.contains("First **bold** paragraph."));
    assert!(content.contains("more [https://example.com/more]"));
    assert!(!content.contains("Home | About"));
    assert!(!content.contains("Copyright"));

    assert_eq!(body["metadata"]["hasImages"], true);
    assert_eq!(body["metadata"]["paragraphCount"], 3);
    assert!(body["metadata"]["wordCount"].as_u64().unwrap() >= 8);
}

#[tokio::test]
async fn test_non_html_content_type_rejected() {
    let addr = spawn_upstream().await;
    let app = test_app(MockTranslator::new(MockOutcome::Success));

    let response = app
        .oneshot(fetch_request(&format!("http://{}/data.json", addr)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "URL does not point to an HTML page");
}

#[tokio::test]
async fn test_upstream_statuses_are_mapped() {
    let addr = spawn_upstream().await;
    let cases = [
        ("/missing", StatusCode::NOT_FOUND, "Page not found"),
        ("/forbidden", StatusCode::FORBIDDEN, "Access forbidden"),
        ("/broken", StatusCode::INTERNAL_SERVER_ERROR, "Target server error"),
    ];

    for (path, status, message) in cases {
        let app = test_app(MockTranslator::new(MockOutcome::Success));
        let response = app
            .oneshot(fetch_request(&format!("http://{}{}", addr, path)))
            .await
            .unwrap();

        assert_eq!(response.status(), status, "{}", path);
        assert_eq!(body_json(response).await["error"], message);
    }

    let app = test_app(MockTranslator::new(MockOutcome::Success));
    let response = app
        .oneshot(fetch_request(&format!("http://{}/unavailable", addr)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_client_timeout_maps_to_408() {
    let addr = spawn_upstream().await;
    let config = Config {
        fetch: FetchConfig {
            timeout_secs: 1,
            ..FetchConfig::default()
        },
        ..Config::default()
    };
    let app = test_app_with_config(config, MockTranslator::new(MockOutcome::Success));

    let response = app
        .oneshot(fetch_request(&format!("http://{}/slow", addr)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    assert_eq!(body_json(response).await["error"], "Request timeout");
}

#[tokio::test]
async fn test_follows_up_to_five_redirects() {
    let addr = spawn_upstream().await;

    let app = test_app(MockTranslator::new(MockOutcome::Success));
    let response = app
        .oneshot(fetch_request(&format!("http://{}/hop/5", addr)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["content"], "done");

    let app = test_app(MockTranslator::new(MockOutcome::Success));
    let response = app
        .oneshot(fetch_request(&format!("http://{}/hop/6", addr)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "Failed to fetch content");
}

#[tokio::test]
async fn test_unknown_domain() {
    let app = test_app(MockTranslator::new(MockOutcome::Success));
    let response = app
        .oneshot(fetch_request("http://no-such-host.invalid/"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Domain not found");
}

#[tokio::test]
async fn test_oversized_page_rejected() {
    let addr = spawn_upstream().await;
    let config = Config {
        fetch: FetchConfig {
            max_body_bytes: 1024,
            ..FetchConfig::default()
        },
        ..Config::default()
    };
    let app = test_app_with_config(config, MockTranslator::new(MockOutcome::Success));

    let response = app
        .oneshot(fetch_request(&format!("http://{}/huge", addr)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Page is too large to process");

    let app = test_app(MockTranslator::new(MockOutcome::Success));
    let response = app
        .oneshot(fetch_request(&format!("http://{}/huge", addr)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["metadata"]["wordCount"], 2048);
}

#[tokio::test]
async fn test_missing_url() {
    for body in [json!({}), json!({"url": ""}), json!({"url": null, "preserveFormatting": false})] {
        let app = test_app(MockTranslator::new(MockOutcome::Success));
        let response = app
            .oneshot(post_json("/fetch-content", body.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "URL is required");
    }
}

#[tokio::test]
async fn test_invalid_url_format() {
    for url in [json!("not a url"), json!("/relative"), json!(42)] {
        let app = test_app(MockTranslator::new(MockOutcome::Success));
        let response = app
            .oneshot(post_json("/fetch-content", json!({"url": url}).to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Invalid URL format");
    }
}

#[tokio::test]
async fn test_invalid_json() {
    let app = test_app(MockTranslator::new(MockOutcome::Success));
    let response = app
        .oneshot(post_json("/fetch-content", "{\"url\": "))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Invalid JSON in request body"
    );
}

#[tokio::test]
async fn test_preflight() {
    let app = test_app(MockTranslator::new(MockOutcome::Success));
    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/fetch-content")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert!(body_bytes(response).await.is_empty());
}
