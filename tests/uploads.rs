//! Signed-URL generation against mock OAuth and IAM endpoints, plus the
//! token cache behavior.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::routing::post;
use axum::{Json, Router};
use base64::Engine;
use reqwest::StatusCode;
use serde_json::{json, Value};

use omnia_gateway::Credentials;

fn google_mocks(oauth_hits: Arc<AtomicUsize>) -> Router {
    Router::new()
        .route(
            "/token",
            post(move || {
                let hits = oauth_hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(json!({"access_token": "test-token", "expires_in": 3600}))
                }
            }),
        )
        .route(
            "/v1/projects/{*rest}",
            post(|| async {
                let signed =
                    base64::engine::general_purpose::STANDARD.encode("signature-bytes");
                Json(json!({"signedBlob": signed}))
            }),
        )
}

fn google_credentials() -> Credentials {
    Credentials {
        google_credentials_base64: Some(common::encoded_service_account()),
        google_storage_bucket: Some("omnia-files".into()),
        ..Credentials::default()
    }
}

#[tokio::test]
async fn upload_url_pair_has_expected_shape_and_expiries() {
    let mock = common::spawn_mock(google_mocks(Arc::new(AtomicUsize::new(0)))).await;

    let mut config = common::fast_config();
    config.upstreams.oauth_token_url = format!("{mock}/token");
    config.upstreams.iam_url = mock;
    let base = common::spawn_gateway(config, google_credentials()).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/get-upload-url"))
        .json(&json!({
            "fileName": "smlouva.pdf",
            "fileType": "application/pdf",
            "fileSize": 1024,
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);

    let upload_url = body["uploadUrl"].as_str().unwrap();
    let download_url = body["downloadUrl"].as_str().unwrap();
    assert!(upload_url.starts_with("https://storage.googleapis.com/omnia-files/documents/uploads/"));
    assert!(upload_url.contains("X-Goog-Expires=900"));
    assert!(upload_url.contains("X-Goog-Signature="));
    assert!(download_url.contains("X-Goog-Expires=3600"));

    assert!(body["gcsUri"]
        .as_str()
        .unwrap()
        .starts_with("gs://omnia-files/documents/uploads/"));
    assert!(body["objectName"].as_str().unwrap().ends_with(".pdf"));
}

#[tokio::test]
async fn access_token_is_cached_across_requests() {
    let oauth_hits = Arc::new(AtomicUsize::new(0));
    let mock = common::spawn_mock(google_mocks(oauth_hits.clone())).await;

    let mut config = common::fast_config();
    config.upstreams.oauth_token_url = format!("{mock}/token");
    config.upstreams.iam_url = mock;
    let base = common::spawn_gateway(config, google_credentials()).await;

    let client = reqwest::Client::new();
    for _ in 0..2 {
        let response = client
            .post(format!("{base}/api/get-upload-url"))
            .json(&json!({"fileName": "a.pdf", "fileType": "application/pdf"}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(oauth_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn oversized_declared_file_is_rejected() {
    let base = common::spawn_gateway(common::fast_config(), google_credentials()).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/get-upload-url"))
        .json(&json!({
            "fileName": "velky.pdf",
            "fileType": "application/pdf",
            "fileSize": 51 * 1024 * 1024,
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

fn document_ai_mocks() -> Router {
    Router::new()
        .route(
            "/token",
            post(|| async {
                Json(json!({"access_token": "test-token", "expires_in": 3600}))
            }),
        )
        .route(
            "/v1/projects/{*rest}",
            post(|| async {
                Json(json!({
                    "document": {
                        "text": "Smlouva o dílo",
                        "pages": [{}, {}],
                    }
                }))
            }),
        )
}

fn document_ai_credentials() -> Credentials {
    Credentials {
        google_credentials_base64: Some(common::encoded_service_account()),
        google_project_id: Some("omnia-test".into()),
        document_ai_location: Some("eu".into()),
        document_ai_processor_id: Some("proc-1".into()),
        ..Credentials::default()
    }
}

#[tokio::test]
async fn process_document_accepts_a_multipart_file() {
    let mock = common::spawn_mock(document_ai_mocks()).await;

    let mut config = common::fast_config();
    config.upstreams.oauth_token_url = format!("{mock}/token");
    config.upstreams.documentai_url = mock;
    let base = common::spawn_gateway(config, document_ai_credentials()).await;

    let part = reqwest::multipart::Part::bytes(b"%PDF-1.4 test".to_vec())
        .file_name("smlouva.pdf")
        .mime_str("application/pdf")
        .unwrap();
    let form = reqwest::multipart::Form::new().part("file", part);

    let response = reqwest::Client::new()
        .post(format!("{base}/api/process-document"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["extractedText"], "Smlouva o dílo");
    assert_eq!(body["pageCount"], 2);
    assert_eq!(body["fileName"], "smlouva.pdf");
}

#[tokio::test]
async fn process_document_without_a_file_field_is_400() {
    let base =
        common::spawn_gateway(common::fast_config(), document_ai_credentials()).await;

    let form = reqwest::multipart::Form::new().text("note", "no file here");
    let response = reqwest::Client::new()
        .post(format!("{base}/api/process-document"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("file"));
}

#[tokio::test]
async fn missing_google_credentials_is_500() {
    let base =
        common::spawn_gateway(common::fast_config(), Credentials::default()).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/get-upload-url"))
        .json(&json!({"fileName": "a.pdf", "fileType": "application/pdf"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("GOOGLE_CREDENTIALS_BASE64"));
}
