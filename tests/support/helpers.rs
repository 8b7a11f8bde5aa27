// tests/support/helpers.rs
use super::mocks::{ManualClock, PlainPasswordHasher, ScriptedSecrets};
use axum::body::{self, Body};
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use chrono::Duration;
use codegrant::application::{
    commands::clients::RegisterClientCommand,
    ports::{
        authorization_code::AuthorizationCodeStore,
        issued_token::IssuedTokenStore,
        resource_owner::ResourceOwnerDirectory,
        security::{PasswordHasher, SecretGenerator, TokenManager},
        time::Clock,
    },
    services::{ApplicationServices, GrantSettings, ServicePorts},
};
use codegrant::domain::client::ClientRegistry;
use codegrant::infrastructure::{
    repositories::InMemoryClientRegistry,
    security::{
        authorization_code_store::InMemoryAuthorizationCodeStore,
        issued_token_store::InMemoryIssuedTokenStore,
        resource_owners::InMemoryResourceOwnerDirectory, token::JwtTokenManager,
    },
};
use codegrant::presentation::http::{
    routes::{RouterOptions, build_router},
    state::HttpState,
};
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt as _;

pub const TEST_JWT_SECRET: &[u8] = b"test-secret-test-secret-test-secret!";
pub const TEST_ISSUER: &str = "http://codegrant.test";
pub const OWNER: &str = "alice";
pub const OWNER_PASSWORD: &str = "wonderland";
pub const REDIRECT_URI: &str = "https://client.example/callback";

/// Fully wired application over in-process stores, with handles on the
/// pieces tests want to inspect or steer.
pub struct TestApp {
    pub router: axum::Router,
    pub services: Arc<ApplicationServices>,
    pub clock: Arc<ManualClock>,
    pub secrets: Arc<ScriptedSecrets>,
    pub codes: Arc<InMemoryAuthorizationCodeStore>,
    pub tokens: Arc<InMemoryIssuedTokenStore>,
}

pub struct TestClient {
    pub client_id: String,
    pub client_secret: String,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_settings(GrantSettings::default()).await
    }

    pub async fn with_settings(settings: GrantSettings) -> Self {
        let clock = Arc::new(ManualClock::starting_now());
        let secrets = Arc::new(ScriptedSecrets::default());
        let codes = Arc::new(InMemoryAuthorizationCodeStore::new());
        let tokens = Arc::new(InMemoryIssuedTokenStore::new());

        let password_hasher: Arc<dyn PasswordHasher> = Arc::new(PlainPasswordHasher);
        let resource_owners: Arc<dyn ResourceOwnerDirectory> = Arc::new(
            InMemoryResourceOwnerDirectory::from_credentials(
                &[(OWNER.to_string(), OWNER_PASSWORD.to_string())],
                Arc::clone(&password_hasher),
            )
            .await
            .expect("resource owners"),
        );
        let clock_port: Arc<dyn Clock> = clock.clone();
        let token_manager: Arc<dyn TokenManager> = Arc::new(
            JwtTokenManager::new(
                TEST_JWT_SECRET,
                TEST_ISSUER,
                Duration::seconds(3600),
                Duration::seconds(900),
                Arc::clone(&clock_port),
            )
            .expect("token manager"),
        );
        let client_registry: Arc<dyn ClientRegistry> = Arc::new(InMemoryClientRegistry::new());
        let authorization_codes: Arc<dyn AuthorizationCodeStore> = codes.clone();
        let issued_tokens: Arc<dyn IssuedTokenStore> = tokens.clone();
        let secret_port: Arc<dyn SecretGenerator> = secrets.clone();

        let services = Arc::new(ApplicationServices::new(
            ServicePorts {
                client_registry,
                authorization_codes,
                issued_tokens,
                resource_owners,
                password_hasher,
                token_manager,
                secrets: secret_port,
                clock: clock_port,
            },
            settings,
        ));

        let router = build_router(
            HttpState {
                services: Arc::clone(&services),
            },
            RouterOptions::default(),
        );

        Self {
            router,
            services,
            clock,
            secrets,
            codes,
            tokens,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.expect("router call")
    }

    /// Register through the service layer; HTTP registration has its own tests.
    pub async fn register_client(&self, redirect_uris: &[&str], scope: Option<&str>) -> TestClient {
        let credentials = self
            .services
            .client_commands
            .register(RegisterClientCommand {
                redirect_uris: redirect_uris.iter().map(|uri| uri.to_string()).collect(),
                scope: scope.map(str::to_string),
            })
            .await
            .expect("register client");

        TestClient {
            client_id: credentials.client_id,
            client_secret: credentials.client_secret,
        }
    }

    pub async fn login(&self) -> String {
        let resp = self
            .send(json_request(
                Method::POST,
                "/login",
                &serde_json::json!({ "username": OWNER, "password": OWNER_PASSWORD }),
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        json["session_token"].as_str().expect("session token").to_string()
    }

    /// `GET /auth` with a fresh session; returns the raw response.
    pub async fn authorize(&self, params: &[(&str, &str)]) -> Response {
        let session = self.login().await;
        let query = serde_urlencoded::to_string(params).unwrap();
        let request = Request::builder()
            .method(Method::GET)
            .uri(format!("/auth?{query}"))
            .header(header::AUTHORIZATION, format!("Bearer {session}"))
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Run the authorization step for `client` and return the issued code.
    pub async fn obtain_code(&self, client: &TestClient, extra: &[(&str, &str)]) -> String {
        let mut params = vec![
            ("response_type", "code"),
            ("client_id", client.client_id.as_str()),
            ("redirect_uri", REDIRECT_URI),
        ];
        params.extend_from_slice(extra);

        let resp = self.authorize(&params).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        let location = location(&resp);
        query_param(&location, "code").expect("code in redirect")
    }

    pub async fn token(&self, params: &[(&str, &str)]) -> Response {
        self.send(form_request("/token", params)).await
    }

    pub async fn exchange_code(&self, client: &TestClient, code: &str) -> Response {
        self.token(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", REDIRECT_URI),
            ("client_id", client.client_id.as_str()),
            ("client_secret", client.client_secret.as_str()),
        ])
        .await
    }

    pub async fn validate(&self, access_token: &str) -> Response {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/validate")
            .header(header::AUTHORIZATION, format!("Bearer {access_token}"))
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }
}

pub fn form_request(uri: &str, params: &[(&str, &str)]) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(serde_urlencoded::to_string(params).unwrap()))
        .unwrap()
}

pub fn json_request(method: Method, uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

pub async fn body_json(resp: Response) -> Value {
    let bytes = body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

pub fn location(resp: &Response) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("location header")
        .to_string()
}

pub fn query_param(location: &str, name: &str) -> Option<String> {
    let url = url::Url::parse(location).expect("absolute location");
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Assert that a response is an ErrorResponse JSON with the expected status and error string.
pub async fn assert_error_response(resp: Response, expected_status: StatusCode, expected_error: &str) {
    assert_eq!(resp.status(), expected_status);
    let ct = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    assert!(ct.starts_with("application/json"), "unexpected content-type: {ct}");
    let json = body_json(resp).await;
    let err_field = json.get("error").and_then(|v| v.as_str()).unwrap_or("");
    let msg_field = json.get("message").and_then(|v| v.as_str()).unwrap_or("");
    assert_eq!(err_field, expected_error, "unexpected error field: {err_field}");
    assert!(!msg_field.is_empty(), "expected non-empty message field in ErrorResponse");
}
