//! Integration tests for the pitch deck export and upload endpoints.

mod common;

use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::json;
use tempfile::TempDir;

use launchdesk::adapters::ai::MockAIProvider;

use common::{body_bytes, body_json, get, post_json, test_app, FakeRenderer, TestApp};

fn app(renderer: FakeRenderer, dir: &TempDir) -> TestApp {
    test_app(
        MockAIProvider::new(),
        MockAIProvider::new(),
        renderer,
        "http://127.0.0.1:9",
        dir.path(),
        12,
    )
}

// =============================================================================
// Export
// =============================================================================

#[tokio::test]
async fn export_returns_pdf_attachment() {
    let dir = TempDir::new().unwrap();
    let app = app(FakeRenderer::default(), &dir);

    let response = post_json(
        &app.router,
        "/api/pitchdeck/export",
        json!({
            "deckId": "deck_1_abc",
            "slides": [
                { "title": "Problem", "icon": "🔥", "content": ["Too slow"] },
                { "title": "Solution", "content": "One tap" }
            ]
        }),
    )
    .await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["content-type"], "application/pdf");
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=\"pitch-deck-deck_1_abc.pdf\""
    );
    assert!(body_bytes(response).await.starts_with(b"%PDF"));
    assert_eq!(app.renderer.slide_counts(), vec![2]);
}

#[tokio::test]
async fn export_with_no_slides_still_renders() {
    let dir = TempDir::new().unwrap();
    let app = app(FakeRenderer::default(), &dir);

    let response = post_json(
        &app.router,
        "/api/pitchdeck/export",
        json!({ "deckId": "deck_2", "slides": [] }),
    )
    .await;

    assert_eq!(response.status(), 200);
    assert_eq!(app.renderer.slide_counts(), vec![0]);
}

#[tokio::test]
async fn export_missing_parameters_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let app = app(FakeRenderer::default(), &dir);

    for body in [
        json!({ "slides": [] }),
        json!({ "deckId": "deck_3" }),
        json!({ "deckId": "", "slides": [] }),
    ] {
        let response = post_json(&app.router, "/api/pitchdeck/export", body).await;
        assert_eq!(response.status(), 400);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Missing required parameters" })
        );
    }
    assert!(app.renderer.slide_counts().is_empty());
}

#[tokio::test]
async fn export_quotes_in_deck_id_cannot_inject_header_parameters() {
    let dir = TempDir::new().unwrap();
    let app = app(FakeRenderer::default(), &dir);

    let response = post_json(
        &app.router,
        "/api/pitchdeck/export",
        json!({ "deckId": "x\"; filename=\"evil.exe", "slides": [] }),
    )
    .await;

    assert_eq!(response.status(), 200);
    let disposition = response.headers()["content-disposition"].to_str().unwrap().to_string();
    assert_eq!(disposition, "attachment; filename=\"pitch-deck-x___filename__evil.exe.pdf\"");
    assert_eq!(disposition.matches("filename=").count(), 1);
}

#[tokio::test]
async fn export_rejects_control_characters_in_deck_id() {
    let dir = TempDir::new().unwrap();
    let app = app(FakeRenderer::default(), &dir);

    let response = post_json(
        &app.router,
        "/api/pitchdeck/export",
        json!({ "deckId": "deck\r\nSet-Cookie: session=1", "slides": [] }),
    )
    .await;

    assert_eq!(response.status(), 400);
    assert_eq!(body_json(response).await, json!({ "error": "Invalid deckId" }));
    assert!(app.renderer.slide_counts().is_empty());
}

#[tokio::test]
async fn export_render_failure_is_server_error() {
    let dir = TempDir::new().unwrap();
    let app = app(FakeRenderer::failing(), &dir);

    let response = post_json(
        &app.router,
        "/api/pitchdeck/export",
        json!({ "deckId": "deck_4", "slides": [{ "title": "Hi", "content": [] }] }),
    )
    .await;

    assert_eq!(response.status(), 500);
    assert_eq!(body_json(response).await, json!({ "error": "Failed to generate PDF" }));
}

// =============================================================================
// Upload
// =============================================================================

#[tokio::test]
async fn upload_stores_base64_pdf_and_serves_it() {
    let dir = TempDir::new().unwrap();
    let app = app(FakeRenderer::default(), &dir);

    let response = post_json(
        &app.router,
        "/api/pitchdeck/upload",
        json!({ "pdfBuffer": STANDARD.encode(b"%PDF-1.7 deck"), "fileName": "deck.pdf" }),
    )
    .await;

    assert_eq!(response.status(), 200);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(
        body["pdf_url"],
        "http://localhost:8080/files/product_images/pitch-decks/deck.pdf"
    );

    let stored = std::fs::read(dir.path().join("product_images/pitch-decks/deck.pdf")).unwrap();
    assert_eq!(stored, b"%PDF-1.7 deck");

    let served = get(&app.router, "/files/product_images/pitch-decks/deck.pdf").await;
    assert_eq!(served.status(), 200);
    assert_eq!(body_bytes(served).await, b"%PDF-1.7 deck");
}

#[tokio::test]
async fn upload_overwrites_existing_file() {
    let dir = TempDir::new().unwrap();
    let app = app(FakeRenderer::default(), &dir);

    for content in [[1u8, 2, 3].as_slice(), [4u8, 5].as_slice()] {
        let response = post_json(
            &app.router,
            "/api/pitchdeck/upload",
            json!({ "pdfBuffer": content, "fileName": "same.pdf" }),
        )
        .await;
        assert_eq!(response.status(), 200);
    }

    let stored = std::fs::read(dir.path().join("product_images/pitch-decks/same.pdf")).unwrap();
    assert_eq!(stored, vec![4u8, 5]);
}

#[tokio::test]
async fn upload_rejects_missing_and_undecodable_buffers() {
    let dir = TempDir::new().unwrap();
    let app = app(FakeRenderer::default(), &dir);

    let response = post_json(&app.router, "/api/pitchdeck/upload", json!({ "fileName": "a.pdf" })).await;
    assert_eq!(response.status(), 400);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Missing required parameters" })
    );

    let response = post_json(&app.router, "/api/pitchdeck/upload", json!({ "pdfBuffer": "AAAA" })).await;
    assert_eq!(response.status(), 400);

    let response = post_json(
        &app.router,
        "/api/pitchdeck/upload",
        json!({ "pdfBuffer": "%%% not base64 %%%", "fileName": "a.pdf" }),
    )
    .await;
    assert_eq!(response.status(), 400);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn upload_rejects_path_traversal() {
    let dir = TempDir::new().unwrap();
    let app = app(FakeRenderer::default(), &dir);

    let response = post_json(
        &app.router,
        "/api/pitchdeck/upload",
        json!({ "pdfBuffer": "AAAA", "fileName": "../escape.pdf" }),
    )
    .await;

    assert_eq!(response.status(), 400);
    assert!(!dir.path().join("product_images/escape.pdf").exists());
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn health_reports_ok() {
    let dir = TempDir::new().unwrap();
    let app = app(FakeRenderer::default(), &dir);

    let response = get(&app.router, "/health").await;

    assert_eq!(response.status(), 200);
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));
}
