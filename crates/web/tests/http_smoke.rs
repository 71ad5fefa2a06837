//! End-to-end HTTP tests over the full router, session layer included,
//! using `tower::ServiceExt::oneshot` without binding a socket.

#![allow(clippy::unwrap_used)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use secrecy::SecretString;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use veloport_web::config::AppConfig;
use veloport_web::db::{MIGRATOR, TransportRepository};
use veloport_web::services::auth::AuthService;
use veloport_web::state::AppState;

async fn test_app() -> (Router, SqlitePool) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    MIGRATOR.run(&pool).await.unwrap();

    let config = AppConfig {
        database_url: SecretString::from("sqlite::memory:"),
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 1.0,
    };

    let app = veloport_web::app(AppState::new(config, pool.clone()))
        .await
        .unwrap();
    (app, pool)
}

fn get(path: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn form_post(path: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

fn session_cookie(response: &axum::response::Response) -> String {
    let raw = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    raw.split(';').next().unwrap().to_string()
}

/// Log in and return the session cookie.
async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(form_post(
            "/login",
            &format!("username={username}&password={password}"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    session_cookie(&response)
}

// =============================================================================
// Public surface
// =============================================================================

#[tokio::test]
async fn health_endpoints_need_no_auth() {
    let (app, _pool) = test_app().await;

    let response = app.clone().oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/health/ready", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn home_is_public() {
    let (app, _pool) = test_app().await;

    let response = app.oneshot(get("/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn anonymous_fleet_view_redirects_to_login() {
    let (app, _pool) = test_app().await;

    let response = app.oneshot(get("/transports", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn anonymous_mutation_redirects_to_login() {
    let (app, pool) = test_app().await;

    let response = app
        .oneshot(form_post(
            "/transport/add",
            "kind=bicycle&model=X&status=available&price_per_hour=5&location=",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let count = TransportRepository::new(&pool).list(None).await.unwrap().len();
    assert_eq!(count, 0);
}

// =============================================================================
// Registration and login
// =============================================================================

#[tokio::test]
async fn register_login_browse_flow() {
    let (app, _pool) = test_app().await;

    let response = app
        .clone()
        .oneshot(form_post(
            "/register",
            "username=rider1&password=pw&confirm=pw",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let cookie = login(&app, "rider1", "pw").await;

    let response = app
        .oneshot(get("/transports", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn register_rejects_mismatched_passwords() {
    let (app, pool) = test_app().await;

    // Re-rendered form, not a redirect.
    let response = app
        .oneshot(form_post(
            "/register",
            "username=rider1&password=pw&confirm=other",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let users = AuthService::new(&pool).list_users().await.unwrap();
    assert!(users.is_empty());
}

#[tokio::test]
async fn register_rejects_short_username() {
    let (app, pool) = test_app().await;

    let response = app
        .oneshot(form_post("/register", "username=abc&password=pw&confirm=pw", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(AuthService::new(&pool).list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn bad_credentials_rerender_login() {
    let (app, pool) = test_app().await;
    AuthService::new(&pool).bootstrap_admin().await.unwrap();

    let response = app
        .oneshot(form_post("/login", "username=admin&password=nope", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::LOCATION).is_none());
}

#[tokio::test]
async fn authenticated_login_page_redirects_home() {
    let (app, pool) = test_app().await;
    AuthService::new(&pool).bootstrap_admin().await.unwrap();
    let cookie = login(&app, "admin", "admin123").await;

    let response = app
        .clone()
        .oneshot(get("/login", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let response = app.oneshot(get("/register", Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn logout_ends_the_session() {
    let (app, pool) = test_app().await;
    AuthService::new(&pool).bootstrap_admin().await.unwrap();
    let cookie = login(&app, "admin", "admin123").await;

    let response = app
        .clone()
        .oneshot(get("/logout", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    // The old cookie no longer authenticates.
    let response = app.oneshot(get("/transports", Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

// =============================================================================
// Fleet management
// =============================================================================

#[tokio::test]
async fn admin_creates_transport() {
    let (app, pool) = test_app().await;
    AuthService::new(&pool).bootstrap_admin().await.unwrap();
    let cookie = login(&app, "admin", "admin123").await;

    let response = app
        .oneshot(form_post(
            "/transport/add",
            "kind=bicycle&model=City+Cruiser&status=available&price_per_hour=10&location=Dock+4",
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/transports");

    let transports = TransportRepository::new(&pool).list(None).await.unwrap();
    assert_eq!(transports.len(), 1);
    assert_eq!(transports[0].model, "City Cruiser");
    assert_eq!(transports[0].location.as_deref(), Some("Dock 4"));
}

#[tokio::test]
async fn invalid_transport_form_persists_nothing() {
    let (app, pool) = test_app().await;
    AuthService::new(&pool).bootstrap_admin().await.unwrap();
    let cookie = login(&app, "admin", "admin123").await;

    // Bad kind, empty model, negative price: re-rendered with errors.
    let response = app
        .oneshot(form_post(
            "/transport/add",
            "kind=tricycle&model=&status=available&price_per_hour=-1&location=",
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert!(TransportRepository::new(&pool).list(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn non_admin_cannot_mutate_fleet() {
    let (app, pool) = test_app().await;

    app.clone()
        .oneshot(form_post(
            "/register",
            "username=rider1&password=pw&confirm=pw",
            None,
        ))
        .await
        .unwrap();
    let cookie = login(&app, "rider1", "pw").await;

    let response = app
        .oneshot(form_post(
            "/transport/add",
            "kind=bicycle&model=X&status=available&price_per_hour=5&location=",
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/transports");

    assert!(TransportRepository::new(&pool).list(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_status_filter_shows_everything() {
    let (app, pool) = test_app().await;
    AuthService::new(&pool).bootstrap_admin().await.unwrap();
    let cookie = login(&app, "admin", "admin123").await;

    // The handler treats garbage filters as "no filter"; the page renders.
    let response = app
        .oneshot(get("/transports?status=broken", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Account management
// =============================================================================

#[tokio::test]
async fn non_admin_cannot_view_users() {
    let (app, _pool) = test_app().await;

    app.clone()
        .oneshot(form_post(
            "/register",
            "username=rider1&password=pw&confirm=pw",
            None,
        ))
        .await
        .unwrap();
    let cookie = login(&app, "rider1", "pw").await;

    let response = app.oneshot(get("/users", Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn admin_cannot_delete_own_account() {
    let (app, pool) = test_app().await;
    let auth = AuthService::new(&pool);
    let admin = auth.bootstrap_admin().await.unwrap().unwrap();
    let cookie = login(&app, "admin", "admin123").await;

    let response = app
        .oneshot(form_post(
            &format!("/user/delete/{}", admin.id),
            "",
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/users");

    assert!(auth.get_user(admin.id).await.is_ok());
}

#[tokio::test]
async fn admin_deletes_other_user() {
    let (app, pool) = test_app().await;
    let auth = AuthService::new(&pool);
    auth.bootstrap_admin().await.unwrap();
    let rider = auth.register("rider1", "pw").await.unwrap();
    let cookie = login(&app, "admin", "admin123").await;

    let response = app
        .oneshot(form_post(
            &format!("/user/delete/{}", rider.id),
            "",
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/users");

    assert!(auth.get_user(rider.id).await.is_err());
}

#[tokio::test]
async fn admin_edits_user_with_blank_password_keeps_old_one() {
    let (app, pool) = test_app().await;
    let auth = AuthService::new(&pool);
    auth.bootstrap_admin().await.unwrap();
    let rider = auth.register("rider1", "pw").await.unwrap();
    let cookie = login(&app, "admin", "admin123").await;

    let response = app
        .oneshot(form_post(
            &format!("/user/edit/{}", rider.id),
            "username=rider2&password=",
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/users");

    // Renamed, password unchanged.
    assert!(auth.authenticate("rider2", "pw").await.is_ok());
}
