//! Vision-client tests against a mock HTTP service.

use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use demark_detect::{DetectError, GeminiClient};
use demark_models::PixelBox;

fn generate_body(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [
            { "content": { "parts": [ { "text": text } ] } }
        ]
    })
}

#[tokio::test]
async fn detect_parses_observations() {
    let server = MockServer::start().await;

    let text = r#"Here are the detections:
[
  {"ts": "00:00", "boxes": [{"label": "watermark", "box_2d": [100, 100, 200, 300], "score": 0.9}]},
  {"ts": "00:05", "boxes": [{"label": "watermark", "box_2d": [110, 100, 210, 300], "score": 0.85}]}
]"#;

    Mock::given(method("POST"))
        .and(path_regex(r"^/v1beta/models/.*:generateContent$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(generate_body(text)))
        .mount(&server)
        .await;

    let client = GeminiClient::new("test-key").with_base_url(server.uri());
    let observations = client
        .detect_watermarks(b"fake video bytes", "video/mp4", 2)
        .await
        .unwrap();

    assert_eq!(observations.len(), 2);
    assert_eq!(observations[0].ts, "00:00");
    assert_eq!(observations[0].boxes[0].box_2d, [100, 100, 200, 300]);
}

#[tokio::test]
async fn detect_surfaces_empty_result_as_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(generate_body("[]")))
        .mount(&server)
        .await;

    let client = GeminiClient::new("test-key").with_base_url(server.uri());
    let result = client.detect_watermarks(b"bytes", "video/mp4", 2).await;

    assert!(matches!(result, Err(DetectError::NoDetections)));
}

#[tokio::test]
async fn detect_fails_on_prose_without_json() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(generate_body("I could not find any watermarks.")),
        )
        .mount(&server)
        .await;

    let client = GeminiClient::new("test-key").with_base_url(server.uri());
    let result = client.detect_watermarks(b"bytes", "video/mp4", 2).await;

    // Both models fail the same way, so the fallback wrapper reports it.
    assert!(matches!(result, Err(DetectError::AllModelsFailed(_))));
}

#[tokio::test]
async fn track_drops_zero_confidence_samples() {
    let server = MockServer::start().await;

    let text = r#"[
  {"ts": "00:00", "box": {"x": 10, "y": 20, "w": 100, "h": 50}, "confidence": 0.9},
  {"ts": "00:01", "box": {"x": 0, "y": 0, "w": 0, "h": 0}, "confidence": 0},
  {"ts": "00:02", "box": {"x": 15, "y": 25, "w": 100, "h": 50}, "confidence": 0.8}
]"#;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(generate_body(text)))
        .mount(&server)
        .await;

    let client = GeminiClient::new("test-key").with_base_url(server.uri());
    let reference = PixelBox { x: 10, y: 20, w: 100, h: 50 };
    let points = client
        .track_watermark(b"bytes", "video/mp4", reference, 2)
        .await
        .unwrap();

    assert_eq!(points.len(), 2);
    assert_eq!(points[0].ts, "00:00");
    assert_eq!(points[1].region.x, 15);
}

#[tokio::test]
async fn transport_failure_is_reported_after_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend exploded"))
        .mount(&server)
        .await;

    let client = GeminiClient::new("test-key").with_base_url(server.uri());
    let result = client.detect_watermarks(b"bytes", "video/mp4", 2).await;

    match result {
        Err(DetectError::AllModelsFailed(cause)) => {
            assert!(cause.contains("500"));
        }
        other => panic!("expected AllModelsFailed, got {:?}", other.map(|_| ())),
    }
}
