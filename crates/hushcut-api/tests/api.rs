//! Router-level tests exercising the HTTP surface without a codec.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use hushcut_api::{create_router, ApiConfig, AppState};

const BOUNDARY: &str = "hushcut-test-boundary";

fn test_router() -> axum::Router {
    create_router(AppState::new(ApiConfig::default()))
}

/// Build a multipart body from (field, filename, data) parts.
fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, filename, data) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match filename {
            Some(fname) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\r\n",
                    name, fname
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
            ),
        }
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn multipart_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_no_active_jobs() {
    let response = test_router()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["active_jobs"], 0);
}

#[tokio::test]
async fn home_describes_default_policy() {
    let response = test_router()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["parameters"]["min_silence_len"], 45);
    assert_eq!(json["parameters"]["silence_thresh"], -45.0);
    assert_eq!(json["parameters"]["keep_silence"], 30);
}

#[tokio::test]
async fn upload_without_files_is_rejected() {
    // A form field but no file parts
    let body = multipart_body(&[("output_format", None, b"mp3")]);
    let response = test_router()
        .oneshot(multipart_request("/process-audio", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"], "Bad request: No files provided");
}

#[tokio::test]
async fn empty_filename_is_rejected() {
    let body = multipart_body(&[("file", Some(""), b"data")]);
    let response = test_router()
        .oneshot(multipart_request("/process-audio", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert!(json["error"].as_str().unwrap().contains("No file selected"));
}

#[tokio::test]
async fn disallowed_extension_is_rejected() {
    let body = multipart_body(&[("file", Some("movie.mkv"), b"data")]);
    let response = test_router()
        .oneshot(multipart_request("/process-audio", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("File type not allowed"));
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let mut config = ApiConfig::default();
    config.max_upload_bytes = 1024;
    let router = create_router(AppState::new(config));

    let payload = vec![0u8; 1500];
    let body = multipart_body(&[("file", Some("big.wav"), &payload)]);
    let response = router
        .oneshot(multipart_request("/process-audio", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn unknown_job_is_not_found() {
    let response = test_router()
        .oneshot(
            Request::get("/job/4aa9c6ba-0000-0000-0000-000000000000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = json_body(response).await;
    assert!(json["error"].as_str().unwrap().contains("Job not found"));
}

#[tokio::test]
async fn async_submit_rejects_multiple_files() {
    let body = multipart_body(&[
        ("file", Some("a.wav"), b"x"),
        ("file", Some("b.wav"), b"y"),
    ]);
    let response = test_router()
        .oneshot(multipart_request("/process-audio-async", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
