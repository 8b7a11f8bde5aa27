use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use codegrant::application::ports::issued_token::IssuedTokenStore;
use serde_json::json;

mod support;

use support::{
    OWNER, OWNER_PASSWORD, REDIRECT_URI, TestApp, body_json, form_request, json_request, location,
    query_param,
};

#[tokio::test]
async fn full_authorization_code_flow() {
    let app = TestApp::new().await;
    let client = app.register_client(&[REDIRECT_URI], Some("profile email")).await;

    let resp = app
        .authorize(&[
            ("response_type", "code"),
            ("client_id", client.client_id.as_str()),
            ("redirect_uri", REDIRECT_URI),
            ("scope", "profile"),
            ("state", "xyz 123"),
        ])
        .await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let target = location(&resp);
    assert!(target.starts_with(REDIRECT_URI));
    assert_eq!(query_param(&target, "state").as_deref(), Some("xyz 123"));
    let code = query_param(&target, "code").expect("code");

    let resp = app.exchange_code(&client, &code).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-store"
    );
    let tokens = body_json(resp).await;
    assert_eq!(tokens["token_type"], "Bearer");
    assert_eq!(tokens["expires_in"], 3600);
    assert_eq!(tokens["scope"], "profile");
    assert!(tokens["refresh_token"].is_string());
    let access_token = tokens["access_token"].as_str().unwrap().to_string();

    let resp = app.validate(&access_token).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let introspection = body_json(resp).await;
    assert_eq!(introspection["active"], true);
    assert_eq!(introspection["client_id"], client.client_id.as_str());
    assert_eq!(introspection["sub"], OWNER);
    assert_eq!(introspection["scope"], "profile");

    let resp = app
        .send(json_request(
            Method::POST,
            "/logout",
            &json!({ "access_token": access_token }),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["status"], "revoked");

    let resp = app.validate(&access_token).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn code_cannot_be_exchanged_twice_over_http() {
    let app = TestApp::new().await;
    let client = app.register_client(&[REDIRECT_URI], None).await;
    let code = app.obtain_code(&client, &[]).await;

    let first = app.exchange_code(&client, &code).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = app.exchange_code(&client, &code).await;
    support::assert_error_response(second, StatusCode::BAD_REQUEST, "invalid_grant").await;
}

#[tokio::test]
async fn redirect_keeps_the_registered_query() {
    let app = TestApp::new().await;
    let registered = "https://client.example/cb?tenant=7";
    let client = app.register_client(&[registered], None).await;

    let resp = app
        .authorize(&[
            ("response_type", "code"),
            ("client_id", client.client_id.as_str()),
            ("redirect_uri", registered),
        ])
        .await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let target = location(&resp);
    assert!(target.starts_with("https://client.example/cb?tenant=7&code="));
    assert_eq!(query_param(&target, "tenant").as_deref(), Some("7"));
    assert!(query_param(&target, "state").is_none());
}

#[tokio::test]
async fn login_form_posted_to_auth_issues_a_code() {
    let app = TestApp::new().await;
    let client = app.register_client(&[REDIRECT_URI], None).await;

    let resp = app
        .send(form_request(
            "/auth",
            &[
                ("username", OWNER),
                ("password", OWNER_PASSWORD),
                ("response_type", "code"),
                ("client_id", client.client_id.as_str()),
                ("redirect_uri", REDIRECT_URI),
                ("state", "s1"),
            ],
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let target = location(&resp);
    assert_eq!(query_param(&target, "state").as_deref(), Some("s1"));
    let code = query_param(&target, "code").expect("code");

    let resp = app.exchange_code(&client, &code).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_form_with_wrong_password_is_rejected() {
    let app = TestApp::new().await;
    let client = app.register_client(&[REDIRECT_URI], None).await;

    let resp = app
        .send(form_request(
            "/auth",
            &[
                ("username", OWNER),
                ("password", "not-it"),
                ("response_type", "code"),
                ("client_id", client.client_id.as_str()),
                ("redirect_uri", REDIRECT_URI),
            ],
        ))
        .await;
    support::assert_error_response(resp, StatusCode::UNAUTHORIZED, "Unauthorized").await;
    assert!(app.codes.is_empty());
}

#[tokio::test]
async fn token_endpoint_accepts_basic_client_credentials() {
    let app = TestApp::new().await;
    let client = app.register_client(&[REDIRECT_URI], None).await;
    let code = app.obtain_code(&client, &[]).await;

    let basic = STANDARD.encode(format!("{}:{}", client.client_id, client.client_secret));
    let request = Request::builder()
        .method(Method::POST)
        .uri("/token")
        .header(header::AUTHORIZATION, format!("Basic {basic}"))
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(
            serde_urlencoded::to_string([
                ("grant_type", "authorization_code"),
                ("code", code.as_str()),
                ("redirect_uri", REDIRECT_URI),
            ])
            .unwrap(),
        ))
        .unwrap();

    let resp = app.send(request).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn pkce_flow_over_http() {
    let app = TestApp::new().await;
    let client = app.register_client(&[REDIRECT_URI], None).await;
    let verifier = "a-plain-verifier-that-is-long-enough-for-rfc7636";

    let code = app
        .obtain_code(
            &client,
            &[
                ("code_challenge", verifier),
                ("code_challenge_method", "plain"),
            ],
        )
        .await;

    let without = app.exchange_code(&client, &code).await;
    support::assert_error_response(without, StatusCode::BAD_REQUEST, "invalid_grant").await;

    let resp = app
        .token(&[
            ("grant_type", "authorization_code"),
            ("code", code.as_str()),
            ("redirect_uri", REDIRECT_URI),
            ("client_id", client.client_id.as_str()),
            ("client_secret", client.client_secret.as_str()),
            ("code_verifier", verifier),
        ])
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn validate_accepts_the_token_as_query_parameter() {
    let app = TestApp::new().await;
    let client = app.register_client(&[REDIRECT_URI], None).await;
    let code = app.obtain_code(&client, &[]).await;
    let tokens = body_json(app.exchange_code(&client, &code).await).await;
    let access_token = tokens["access_token"].as_str().unwrap();

    let query = serde_urlencoded::to_string([("access_token", access_token)]).unwrap();
    let request = Request::builder()
        .method(Method::POST)
        .uri(format!("/validate?{query}"))
        .body(Body::empty())
        .unwrap();

    let resp = app.send(request).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn access_token_expires_with_the_clock() {
    let app = TestApp::new().await;
    let client = app.register_client(&[REDIRECT_URI], None).await;
    let code = app.obtain_code(&client, &[]).await;
    let tokens = body_json(app.exchange_code(&client, &code).await).await;
    let access_token = tokens["access_token"].as_str().unwrap().to_string();

    app.clock.advance(chrono::Duration::seconds(3600));

    let resp = app.validate(&access_token).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(app.tokens.find(&access_token).await.unwrap().is_none());
}

#[tokio::test]
async fn logout_is_idempotent() {
    let app = TestApp::new().await;

    for _ in 0..2 {
        let resp = app
            .send(json_request(
                Method::POST,
                "/logout",
                &json!({ "access_token": "never-issued" }),
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
