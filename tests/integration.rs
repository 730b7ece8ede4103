//! Integration tests for the edgenote API.
//!
//! Each test spawns the full application on an ephemeral port, backed by an
//! in-memory store, and drives it over HTTP.

use edgenote::{
    auth::{sign, AppState},
    config::Config,
    routes,
    storage::{KvStore, MemoryStore},
};
use reqwest::{header, redirect, StatusCode};
use std::sync::Arc;
use zeroize::Zeroizing;

const PASSWORD: &str = "correct horse battery staple";
const SECRET: &str = "integration-test-secret";

fn test_config() -> Config {
    Config {
        admin_password: Zeroizing::new(PASSWORD.to_string()),
        secret_key: Zeroizing::new(SECRET.to_string()),
        redis_url: "redis://unused".to_string(),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        static_dir: "static".to_string(),
        max_body_bytes: 16 * 1024,
        session_max_age_secs: 2_592_000,
        rate_limit_login_per_min: 5,
    }
}

/// Spin up a test server and return its base URL and the backing store.
async fn spawn_test_server() -> (String, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store.clone(), test_config());
    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
        )
        .await
        .unwrap();
    });

    (format!("http://{}", addr), store)
}

/// Client that surfaces redirects instead of following them.
fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(redirect::Policy::none())
        .build()
        .unwrap()
}

/// Log in and return the `name=value` part of the issued cookie.
async fn login(client: &reqwest::Client, base_url: &str) -> String {
    let resp = client
        .post(format!("{}/api/login", base_url))
        .json(&serde_json::json!({ "password": PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);

    let set_cookie = resp.headers()[header::SET_COOKIE].to_str().unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

async fn list_pages(client: &reqwest::Client, base_url: &str) -> Vec<String> {
    let body: serde_json::Value = client
        .get(format!("{}/api/pages", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    serde_json::from_value(body["pages"].clone()).unwrap()
}

// ============================================================================
// Session Tests
// ============================================================================

#[tokio::test]
async fn test_login_sets_session_cookie() {
    let (base_url, _store) = spawn_test_server().await;
    let client = client();

    let resp = client
        .post(format!("{}/api/login", base_url))
        .form(&[("password", PASSWORD)])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()[header::LOCATION], "/admin");
    assert_eq!(
        resp.headers()[header::SET_COOKIE].to_str().unwrap(),
        format!(
            "edgenote={}; Max-Age=2592000; Path=/; HttpOnly; Secure; SameSite=Strict",
            sign(SECRET.as_bytes())
        )
    );
}

#[tokio::test]
async fn test_login_wrong_password() {
    let (base_url, _store) = spawn_test_server().await;
    let client = client();

    let resp = client
        .post(format!("{}/api/login", base_url))
        .json(&serde_json::json!({ "password": "guess" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_session_status_follows_cookie() {
    let (base_url, _store) = spawn_test_server().await;
    let client = client();

    let body: serde_json::Value = client
        .get(format!("{}/api/session", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["authenticated"], false);

    let cookie = login(&client, &base_url).await;
    let body: serde_json::Value = client
        .get(format!("{}/api/session", base_url))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["authenticated"], true);

    let resp = client
        .post(format!("{}/api/logout", base_url))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(resp.headers()[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .starts_with("edgenote=;"));
}

#[tokio::test]
async fn test_login_rate_limited() {
    let (base_url, store) = spawn_test_server().await;
    let client = client();

    for _ in 0..5 {
        let resp = client
            .post(format!("{}/api/login", base_url))
            .json(&serde_json::json!({ "password": "guess" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    let resp = client
        .post(format!("{}/api/login", base_url))
        .json(&serde_json::json!({ "password": PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(resp.headers().get(header::SET_COOKIE).is_none());

    assert_eq!(
        store.get("ratelimit:login:127.0.0.1").await.unwrap().as_deref(),
        Some("6")
    );
}

// ============================================================================
// Page Tests
// ============================================================================

#[tokio::test]
async fn test_end_to_end_page_lifecycle() {
    let (base_url, store) = spawn_test_server().await;
    let client = client();

    // Fresh store lists only the default page
    assert_eq!(list_pages(&client, &base_url).await, vec!["page1"]);

    let cookie = login(&client, &base_url).await;

    // Create
    let resp = client
        .post(format!("{}/api/pages", base_url))
        .header(header::COOKIE, &cookie)
        .json(&serde_json::json!({ "name": "Diary" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: serde_json::Value = resp.json().await.unwrap();
    let id = body["id"].as_str().unwrap().to_string();

    let pages = list_pages(&client, &base_url).await;
    assert_eq!(pages, vec!["page1".to_string(), id.clone()]);

    // Save and read back
    let resp = client
        .post(format!("{}/api/save", base_url))
        .header(header::COOKIE, &cookie)
        .json(&serde_json::json!({ "pageId": id, "content": "dear diary" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let page: serde_json::Value = client
        .get(format!("{}/api/page/{}", base_url, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page["title"], "Diary");
    assert_eq!(page["content"], "dear diary");

    // Delete
    let resp = client
        .post(format!("{}/api/delete/{}", base_url, id))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    assert_eq!(list_pages(&client, &base_url).await, vec!["page1"]);
    assert_eq!(store.get(&format!("note:{}", id)).await.unwrap(), None);
    assert_eq!(store.get(&format!("title:{}", id)).await.unwrap(), None);

    let page: serde_json::Value = client
        .get(format!("{}/api/page/{}", base_url, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page["title"], id.as_str());
    assert_eq!(page["content"], "");
}

#[tokio::test]
async fn test_default_page_cannot_be_deleted() {
    let (base_url, store) = spawn_test_server().await;
    let client = client();
    let cookie = login(&client, &base_url).await;

    let resp = client
        .post(format!("{}/api/delete/page1", base_url))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert_eq!(list_pages(&client, &base_url).await, vec!["page1"]);
    assert_eq!(store.get("pages:list").await.unwrap(), None);
    assert_eq!(store.get("note:page1").await.unwrap(), None);
}

#[tokio::test]
async fn test_anonymous_mutations_forbidden() {
    let (base_url, store) = spawn_test_server().await;
    let client = client();

    let resp = client
        .post(format!("{}/api/pages", base_url))
        .json(&serde_json::json!({ "name": "Sneaky" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = client
        .post(format!("{}/api/save", base_url))
        .header(header::COOKIE, "edgenote=00000000")
        .body("overwrite")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_save_raw_text_goes_to_default_page() {
    let (base_url, store) = spawn_test_server().await;
    let client = client();
    let cookie = login(&client, &base_url).await;

    let resp = client
        .post(format!("{}/api/save", base_url))
        .header(header::COOKIE, &cookie)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body("line one\nline two")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    assert_eq!(
        store.get("note:page1").await.unwrap().as_deref(),
        Some("line one\nline two")
    );
}

#[tokio::test]
async fn test_body_limit_enforced() {
    let (base_url, store) = spawn_test_server().await;
    let client = client();
    let cookie = login(&client, &base_url).await;

    let resp = client
        .post(format!("{}/api/save", base_url))
        .header(header::COOKIE, &cookie)
        .header(header::CONTENT_TYPE, "text/plain")
        .body("x".repeat(20 * 1024))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(store.get("note:page1").await.unwrap(), None);
}

// ============================================================================
// Settings Tests
// ============================================================================

#[tokio::test]
async fn test_opacity_settings_round_trip() {
    let (base_url, _store) = spawn_test_server().await;
    let client = client();
    let cookie = login(&client, &base_url).await;

    let resp = client
        .post(format!("{}/api/save-opacity", base_url))
        .header(header::COOKIE, &cookie)
        .json(&serde_json::json!({ "key": "sidebar", "value": "0.6" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let body: serde_json::Value = client
        .get(format!("{}/api/opacity", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["sidebar"], 0.6);
    assert_eq!(body["card"], 0.28);
}

#[tokio::test]
async fn test_security_headers_present() {
    let (base_url, _store) = spawn_test_server().await;
    let client = client();

    let resp = client
        .get(format!("{}/api/pages", base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.headers()["cache-control"], "no-store");
    assert_eq!(resp.headers()["x-content-type-options"], "nosniff");
    assert_eq!(resp.headers()["x-frame-options"], "DENY");
}
