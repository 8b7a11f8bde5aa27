use chrono::{Duration, Utc};
use codegrant::application::ports::{
    authorization_code::AuthorizationCodeStore, issued_token::IssuedTokenStore,
};
use codegrant::application::error::ApplicationError;
use codegrant::domain::{
    client::{ClientId, RedirectUri, Scope},
    grant::{AuthorizationCode, IssuedToken, TokenKind},
};
use codegrant::infrastructure::security::{
    redis_authorization_code_store::RedisAuthorizationCodeStore,
    redis_issued_token_store::{RedisIssuedTokenStore, client_index_key},
};
use std::env;
use std::sync::Arc;
use tokio::time::{Duration as StdDuration, timeout};

/// `REDIS_URL` or the local default, if something answers on it.
async fn redis_url() -> Option<String> {
    let url = env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".into());

    let host_port = {
        let mut s = url.as_str();
        if let Some(i) = s.find("://") {
            s = &s[i + 3..];
        }
        if let Some(i) = s.rfind('/') {
            s = &s[..i];
        }
        if let Some(i) = s.rfind('@') {
            s = &s[i + 1..];
        }
        s.to_string()
    };

    match timeout(StdDuration::from_secs(2), tokio::net::TcpStream::connect(host_port)).await {
        Ok(Ok(_)) => Some(url),
        Ok(Err(e)) => {
            eprintln!("Skipping redis store test because connection failed: {}", e);
            None
        }
        Err(_) => {
            eprintln!("Skipping redis store test because connection timed out");
            None
        }
    }
}

fn code_record(code: &str, client: &str, ttl: Duration) -> AuthorizationCode {
    AuthorizationCode::new(
        code.to_string(),
        ClientId::new(client).unwrap(),
        RedirectUri::new("https://client.example/callback").unwrap(),
        "alice".into(),
        Scope::empty(),
        None,
        Utc::now(),
        ttl,
    )
    .unwrap()
}

fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4())
}

#[tokio::test]
async fn redis_code_store_put_get_and_conflict() {
    let Some(url) = redis_url().await else { return };
    let store = RedisAuthorizationCodeStore::from_url(&url).expect("create store");
    let code = unique("code");

    store
        .put(code_record(&code, "c1", Duration::minutes(5)))
        .await
        .expect("put");

    let fetched = store.get(&code).await.expect("get").expect("present");
    assert_eq!(fetched.code, code);
    assert_eq!(fetched.client_id.as_str(), "c1");

    let dup = store.put(code_record(&code, "c2", Duration::minutes(5))).await;
    assert!(matches!(dup, Err(ApplicationError::Conflict(_))));

    let kept = store.get(&code).await.unwrap().unwrap();
    assert_eq!(kept.client_id.as_str(), "c1");
}

#[tokio::test]
async fn redis_code_store_delete_if_match_respects_predicate() {
    let Some(url) = redis_url().await else { return };
    let store = RedisAuthorizationCodeStore::from_url(&url).expect("create store");
    let code = unique("code");
    store
        .put(code_record(&code, "c1", Duration::minutes(5)))
        .await
        .unwrap();

    let other = ClientId::new("c2").unwrap();
    let none = store
        .delete_if_match(&code, &|record: &AuthorizationCode| record.client_id == other)
        .await
        .unwrap();
    assert!(none.is_none());
    assert!(store.get(&code).await.unwrap().is_some());

    let taken = store
        .delete_if_match(&code, &|record: &AuthorizationCode| record.client_id.as_str() == "c1")
        .await
        .unwrap();
    assert!(taken.is_some());
    assert!(store.get(&code).await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn redis_code_store_has_a_single_winner() {
    let Some(url) = redis_url().await else { return };
    let store = Arc::new(RedisAuthorizationCodeStore::from_url(&url).expect("create store"));
    let code = unique("code");
    store
        .put(code_record(&code, "c1", Duration::minutes(5)))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let store = Arc::clone(&store);
        let code = code.clone();
        handles.push(tokio::spawn(async move {
            store
                .delete_if_match(&code, &|_: &AuthorizationCode| true)
                .await
                .unwrap()
                .is_some()
        }));
    }

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);
}

#[tokio::test]
async fn redis_code_expires_with_its_ttl() {
    let Some(url) = redis_url().await else { return };
    let store = RedisAuthorizationCodeStore::from_url(&url).expect("create store");
    let code = unique("code");
    store
        .put(code_record(&code, "c1", Duration::milliseconds(200)))
        .await
        .unwrap();

    tokio::time::sleep(StdDuration::from_millis(400)).await;
    assert!(store.get(&code).await.unwrap().is_none());
}

fn issued(token: &str, client: &ClientId, kind: TokenKind) -> IssuedToken {
    issued_for(token, client, kind, Duration::minutes(5))
}

fn issued_for(token: &str, client: &ClientId, kind: TokenKind, ttl: Duration) -> IssuedToken {
    let now = Utc::now();
    IssuedToken {
        token: token.to_string(),
        kind,
        client_id: client.clone(),
        subject: Some("alice".into()),
        scope: Scope::empty(),
        issued_at: now,
        expires_at: now + ttl,
    }
}

#[tokio::test]
async fn redis_token_store_take_and_revoke_for_client() {
    let Some(url) = redis_url().await else { return };
    let store = RedisIssuedTokenStore::from_url(&url).expect("create store");
    let client = ClientId::new(unique("client")).unwrap();
    let bystander = ClientId::new(unique("client")).unwrap();

    let access = unique("access");
    let refresh = unique("refresh");
    let other = unique("access");
    store.save(issued(&access, &client, TokenKind::Access)).await.unwrap();
    store.save(issued(&refresh, &client, TokenKind::Refresh)).await.unwrap();
    store.save(issued(&other, &bystander, TokenKind::Access)).await.unwrap();

    let wrong_kind = store
        .take_if_match(&access, &|record: &IssuedToken| record.kind == TokenKind::Refresh)
        .await
        .unwrap();
    assert!(wrong_kind.is_none());
    assert!(store.find(&access).await.unwrap().is_some());

    let revoked = store.revoke_for_client(&client).await.unwrap();
    assert_eq!(revoked, 2);
    assert!(store.find(&access).await.unwrap().is_none());
    assert!(store.find(&refresh).await.unwrap().is_none());
    assert!(store.find(&other).await.unwrap().is_some());

    assert!(store.revoke(&other).await.unwrap());
    assert!(!store.revoke(&other).await.unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn redis_refresh_token_has_a_single_taker() {
    let Some(url) = redis_url().await else { return };
    let store = Arc::new(RedisIssuedTokenStore::from_url(&url).expect("create store"));
    let client = ClientId::new(unique("client")).unwrap();
    let refresh = unique("refresh");
    store
        .save(issued(&refresh, &client, TokenKind::Refresh))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let store = Arc::clone(&store);
        let refresh = refresh.clone();
        handles.push(tokio::spawn(async move {
            store
                .take_if_match(&refresh, &|record: &IssuedToken| record.kind == TokenKind::Refresh)
                .await
                .unwrap()
                .is_some()
        }));
    }

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);
    assert!(store.find(&refresh).await.unwrap().is_none());
}

#[tokio::test]
async fn redis_client_index_drops_expired_tokens_and_expires() {
    let Some(url) = redis_url().await else { return };
    let store = RedisIssuedTokenStore::from_url(&url).expect("create store");
    let client = ClientId::new(unique("client")).unwrap();

    for _ in 0..5 {
        let token = unique("access");
        store
            .save(issued_for(&token, &client, TokenKind::Access, Duration::milliseconds(100)))
            .await
            .unwrap();
    }
    tokio::time::sleep(StdDuration::from_millis(300)).await;

    let live = unique("access");
    store
        .save(issued_for(&live, &client, TokenKind::Access, Duration::minutes(5)))
        .await
        .unwrap();

    let redis = redis::Client::open(url.as_str()).expect("redis client");
    let mut conn = redis
        .get_multiplexed_async_connection()
        .await
        .expect("redis connection");
    let index = client_index_key(&client);

    let members: i64 = redis::cmd("ZCARD")
        .arg(&index)
        .query_async(&mut conn)
        .await
        .unwrap();
    assert_eq!(members, 1);

    let ttl_ms: i64 = redis::cmd("PTTL")
        .arg(&index)
        .query_async(&mut conn)
        .await
        .unwrap();
    assert!(ttl_ms > 0 && ttl_ms <= 6 * 60 * 1000, "index ttl {ttl_ms}");

    assert_eq!(store.revoke_for_client(&client).await.unwrap(), 1);
}
