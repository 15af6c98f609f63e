//! HTTP-level tests for `POST /api/generate-palette`.

mod common;

use std::time::Duration;

use common::TestService;
use webmuse::server::{ErrorBody, PaletteBody, HEALTH_ROUTE, PALETTE_ROUTE};
use wiremock::ResponseTemplate;

const SEED_TEXT: &str = "Here you go: [[12, 200, 5], [300, 0, 9], [1,2,3]] enjoy";

async fn post_prompt(service: &TestService, body: serde_json::Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(service.url(PALETTE_ROUTE))
        .json(&body)
        .send()
        .await
        .unwrap()
}

fn triples(body: &PaletteBody) -> Vec<[u16; 3]> {
    body.palette.colors().iter().map(|c| c.channels()).collect()
}

#[tokio::test]
async fn test_extended_palette_returned_as_is() {
    let service = TestService::start().await;
    service.mock_generation(SEED_TEXT).await;
    service
        .mock_extension(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result": [[12, 200, 5], [250, 0, 9], [1, 2, 3], [40, 40, 40], [90, 10, 200]]
        })))
        .await;

    let response = post_prompt(&service, serde_json::json!({"prompt": "sunset"})).await;
    assert_eq!(response.status(), 200);

    let body: PaletteBody = response.json().await.unwrap();
    assert_eq!(
        triples(&body),
        vec![[12, 200, 5], [250, 0, 9], [1, 2, 3], [40, 40, 40], [90, 10, 200]]
    );

    let sent = &service.extension.received_requests().await.unwrap()[0];
    let sent: serde_json::Value = serde_json::from_slice(&sent.body).unwrap();
    assert_eq!(
        sent["input"],
        serde_json::json!([[12, 200, 5], [300, 0, 9], [1, 2, 3], "N", "N"])
    );
}

#[tokio::test]
async fn test_extension_html_falls_back_to_seeds() {
    let service = TestService::start().await;
    service.mock_generation(SEED_TEXT).await;
    service
        .mock_extension(
            ResponseTemplate::new(200).set_body_string("<html><body>maintenance</body></html>"),
        )
        .await;

    let response = post_prompt(&service, serde_json::json!({"prompt": "sunset"})).await;
    assert_eq!(response.status(), 200);
    let body: PaletteBody = response.json().await.unwrap();
    assert_eq!(triples(&body), vec![[12, 200, 5], [300, 0, 9], [1, 2, 3]]);
}

#[tokio::test]
async fn test_extension_error_status_falls_back_to_seeds() {
    let service = TestService::start().await;
    service.mock_generation(SEED_TEXT).await;
    service.mock_extension(ResponseTemplate::new(503)).await;

    let response = post_prompt(&service, serde_json::json!({"prompt": "sunset"})).await;
    assert_eq!(response.status(), 200);
    let body: PaletteBody = response.json().await.unwrap();
    assert_eq!(body.palette.len(), 3);
}

#[tokio::test]
async fn test_slow_extension_falls_back_to_seeds() {
    let service = TestService::start_with_timeout(Duration::from_millis(300)).await;
    service.mock_generation(SEED_TEXT).await;
    service
        .mock_extension(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"result": [[1, 1, 1], [2, 2, 2], [3, 3, 3]]}))
                .set_delay(Duration::from_secs(2)),
        )
        .await;

    let response = post_prompt(&service, serde_json::json!({"prompt": "sunset"})).await;
    assert_eq!(response.status(), 200);
    let body: PaletteBody = response.json().await.unwrap();
    assert_eq!(triples(&body), vec![[12, 200, 5], [300, 0, 9], [1, 2, 3]]);
}

#[tokio::test]
async fn test_slow_generation_is_generation_error() {
    let service = TestService::start_with_timeout(Duration::from_millis(300)).await;
    wiremock::Mock::given(wiremock::matchers::method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"response": SEED_TEXT}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&service.generation)
        .await;

    let response = post_prompt(&service, serde_json::json!({"prompt": "sunset"})).await;
    assert_eq!(response.status(), 500);
    let error: ErrorBody = response.json().await.unwrap();
    assert_eq!(error.error, "Failed to generate base colors");
    assert_eq!(service.extension_calls().await, 0);
}

#[tokio::test]
async fn test_blank_prompt_rejected_without_upstream_calls() {
    let service = TestService::start().await;

    for body in [
        serde_json::json!({}),
        serde_json::json!({"prompt": ""}),
        serde_json::json!({"prompt": "   "}),
        serde_json::json!({"prompt": 42}),
    ] {
        let response = post_prompt(&service, body).await;
        assert_eq!(response.status(), 400);
        let error: ErrorBody = response.json().await.unwrap();
        assert_eq!(error.error, "Prompt is required");
    }

    assert_eq!(service.generation_calls().await, 0);
    assert_eq!(service.extension_calls().await, 0);
}

#[tokio::test]
async fn test_non_json_body_rejected() {
    let service = TestService::start().await;
    let response = reqwest::Client::new()
        .post(service.url(PALETTE_ROUTE))
        .header("content-type", "application/json")
        .body("prompt=sunset")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_generation_failure_skips_extension() {
    let service = TestService::start().await;
    wiremock::Mock::given(wiremock::matchers::method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model crashed"))
        .mount(&service.generation)
        .await;

    let response = post_prompt(&service, serde_json::json!({"prompt": "sunset"})).await;
    assert_eq!(response.status(), 500);
    let error: ErrorBody = response.json().await.unwrap();
    assert_eq!(error.error, "Failed to generate base colors");
    assert!(!error.error.contains("model crashed"));
    assert_eq!(service.extension_calls().await, 0);
}

#[tokio::test]
async fn test_too_few_colors_is_extraction_error() {
    let service = TestService::start().await;
    service.mock_generation("only [1, 2, 3] and [4, 5, 6]").await;

    let response = post_prompt(&service, serde_json::json!({"prompt": "sunset"})).await;
    assert_eq!(response.status(), 500);
    let error: ErrorBody = response.json().await.unwrap();
    assert_eq!(error.error, "Could not extract three valid RGB colors");
    assert_eq!(service.extension_calls().await, 0);
}

#[tokio::test]
async fn test_missing_generation_text() {
    let service = TestService::start().await;
    wiremock::Mock::given(wiremock::matchers::method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&service.generation)
        .await;

    let response = post_prompt(&service, serde_json::json!({"prompt": "sunset"})).await;
    assert_eq!(response.status(), 500);
    let error: ErrorBody = response.json().await.unwrap();
    assert_eq!(error.error, "No valid response from the generation service");
}

#[tokio::test]
async fn test_health() {
    let service = TestService::start().await;
    let body: serde_json::Value = reqwest::get(service.url(HEALTH_ROUTE))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, serde_json::json!({"status": "ok"}));
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let service = TestService::start().await;
    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, service.url(PALETTE_ROUTE))
        .header("origin", "http://example.com")
        .header("access-control-request-method", "POST")
        .send()
        .await
        .unwrap();
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
