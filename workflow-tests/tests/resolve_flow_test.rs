//! Slug resolution, end to end: real router, real backend client, mock API.

mod common;

use reqwest::StatusCode;
use std::sync::atomic::Ordering;
use workflow_tests::{frontend_settings, spawn_frontend};

#[tokio::test]
async fn link_slug_redirects_and_never_queries_microsites() {
    let harness = common::setup().await;

    let response = harness
        .client
        .get(harness.url("/abc123"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers().get("location").unwrap(),
        "https://example.com/page"
    );
    assert_eq!(harness.backend.link_hits.load(Ordering::SeqCst), 1);
    assert_eq!(harness.backend.microsite_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn microsite_slug_renders_its_attributes() {
    let harness = common::setup().await;

    let response = harness
        .client
        .get(harness.url("/mysite"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = response.text().await.unwrap();
    assert!(html.contains("Jane"));
    assert!(html.contains("@jane.gram"));

    assert_eq!(harness.backend.link_hits.load(Ordering::SeqCst), 1);
    assert_eq!(harness.backend.microsite_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unknown_slug_redirects_to_root() {
    let harness = common::setup().await;

    let response = harness
        .client
        .get(harness.url("/ghost"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers().get("location").unwrap(), "/");
}

#[tokio::test]
async fn backend_outage_surfaces_bad_gateway() {
    // Nothing listens on this port; the resolver must answer 502, not
    // pretend the slug does not exist.
    let frontend_url = spawn_frontend(frontend_settings("http://127.0.0.1:9", None))
        .await
        .unwrap();

    let response = workflow_tests::browser()
        .get(format!("{}/abc123", frontend_url))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}
