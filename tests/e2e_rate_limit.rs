use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use codegrant::presentation::http::{
    middleware::rate_limit::RateLimitSettings,
    routes::{RouterOptions, build_router},
    state::HttpState,
};
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt as _;

mod support;

use support::{OWNER, OWNER_PASSWORD, TestApp};

fn login_from(ip: &str) -> Request<Body> {
    let payload = serde_json::json!({ "username": OWNER, "password": OWNER_PASSWORD });
    Request::builder()
        .method(Method::POST)
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", ip)
        .body(Body::from(payload.to_string()))
        .unwrap()
}

#[tokio::test]
async fn limiter_admits_the_configured_rate_per_second() {
    let app = TestApp::new().await;
    let router = build_router(
        HttpState {
            services: Arc::clone(&app.services),
        },
        RouterOptions {
            allowed_origins: Vec::new(),
            rate_limit: Some(RateLimitSettings {
                per_second: 5,
                burst: 2,
            }),
        },
    );

    for _ in 0..2 {
        let resp = router.clone().oneshot(login_from("203.0.113.7")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = router.clone().oneshot(login_from("203.0.113.7")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    // Another address has its own bucket.
    let resp = router.clone().oneshot(login_from("198.51.100.9")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Five per second means a permit comes back every 200ms.
    tokio::time::sleep(Duration::from_millis(450)).await;
    let resp = router.oneshot(login_from("203.0.113.7")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
