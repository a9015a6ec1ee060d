use autoims_database::{Database, Migration};
use autoims_kernel::domain::config::ApiConfig;
use autoims_kernel::server::{ApiState, AuthUser};
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tower::ServiceExt;

const USERS: Migration = Migration::new(
    "users",
    "0001",
    "CREATE TABLE users (user_id INTEGER PRIMARY KEY, email TEXT NOT NULL);
     INSERT INTO users (user_id, email) VALUES (1, 'owner@garage.test');",
);

async fn whoami(user: AuthUser) -> Json<Value> {
    Json(json!({ "user_id": user.user_id }))
}

async fn app() -> (Router, ApiState) {
    let db = Database::builder().in_memory().migrations([USERS]).init().await.expect("db");
    let state = ApiState::builder().config(ApiConfig::default()).db(db).build().expect("state");
    let router = Router::new().route("/whoami", get(whoami)).with_state(state.clone());
    (router, state)
}

async fn call(router: Router, auth: Option<String>) -> (StatusCode, Value) {
    let mut request = Request::get("/whoami");
    if let Some(auth) = auth {
        request = request.header(header::AUTHORIZATION, auth);
    }
    let response = router.oneshot(request.body(Body::empty()).expect("request")).await.expect("call");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    (status, serde_json::from_slice(&bytes).expect("json"))
}

#[tokio::test]
async fn valid_token_resolves_the_user() {
    let (router, state) = app().await;
    let token = state.tokens.issue(1).expect("issue");

    let (status, body) = call(router, Some(format!("Bearer {token}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], 1);
    assert!(state.sessions.contains_key(&1));
}

#[tokio::test]
async fn missing_header_is_rejected() {
    let (router, _) = app().await;
    let (status, body) = call(router, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Token is missing");
}

#[tokio::test]
async fn garbage_token_is_invalid() {
    let (router, _) = app().await;
    let (status, body) = call(router, Some("Bearer nope".to_owned())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Token is invalid");
}

#[tokio::test]
async fn deleted_user_is_not_found() {
    let (router, state) = app().await;
    let token = state.tokens.issue(2).expect("issue");

    let (status, body) = call(router, Some(format!("Bearer {token}"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "User not found");
}
