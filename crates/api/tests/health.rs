//! `/health` plus routing and middleware behaviour shared by every route.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, default_app, get};
use tower::ServiceExt;

#[tokio::test]
async fn health_check_returns_ok_with_json() {
    let app = default_app();
    let response = get(&app.router, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["store_healthy"], true);
    assert_eq!(json["summary_image"], false);
}

#[tokio::test]
async fn health_reports_summary_image_after_refresh() {
    let app = default_app();
    let response = common::post(&app.router, "/countries/refresh").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get(&app.router, "/health").await).await;
    assert_eq!(json["summary_image"], true);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = default_app();
    let response = get(&app.router, "/this-route-does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn refresh_only_accepts_post() {
    let app = default_app();
    let response = get(&app.router, "/countries/refresh").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = default_app();
    let response = get(&app.router, "/health").await;

    let request_id = response.headers().get("x-request-id");
    assert!(
        request_id.is_some(),
        "Response must contain an x-request-id header"
    );
    assert_eq!(request_id.unwrap().to_str().unwrap().len(), 36);
}

#[tokio::test]
async fn cors_preflight_returns_correct_headers() {
    let app = default_app();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/countries")
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "GET")
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );
}
