// SPDX-License-Identifier: MIT

//! OAuth flow surface tests: consent redirect and callback error handling.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

fn location(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn test_auth_start_redirects_to_google() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/google")
                .header(header::HOST, "localhost:8080")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

    let target = location(&response);
    assert!(target.starts_with("https://accounts.google.com/o/oauth2/v2/auth"));
    assert!(target.contains("client_id=test_client_id"));
    assert!(target.contains("state="));
    assert!(target.contains(
        "redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fauth%2Fgoogle%2Fcallback"
    ));
    // The client secret must never appear in the consent URL.
    assert!(!target.contains("test_secret"));
}

#[tokio::test]
async fn test_callback_with_provider_error_redirects_to_login() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/google/callback?state=bogus&error=access_denied")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

    let target = location(&response);
    // Tampered/bogus state falls back to the configured frontend URL.
    assert!(target.starts_with("http://localhost:3000/login"));
    assert!(target.contains("error=access_denied"));
}

#[tokio::test]
async fn test_callback_without_code_redirects_with_error() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/google/callback?state=bogus")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert!(location(&response).contains("error=missing_code"));
}

#[tokio::test]
async fn test_callback_with_unreachable_provider_denies_sign_in() {
    // A fabricated code can never be exchanged (the provider rejects it, or
    // is unreachable): the user must land back on the login page without a
    // session token.
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/google/callback?state=bogus&code=fake-code")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

    let target = location(&response);
    assert!(target.contains("error=signin_failed"));
    assert!(!target.contains("token="));
}

#[tokio::test]
async fn test_logout_redirects() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
}
