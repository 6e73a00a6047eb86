//! JSON REST API for moot.
//!
//! Exposes an axum [`Router`] backed by any [`moot_core::store::RosterStore`].
//! TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! axum::serve(listener, moot_api::api_router(store.clone())).await?;
//! ```

pub mod error;
pub mod meetings;
pub mod participants;
pub mod password;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{delete, get},
};
use moot_core::store::RosterStore;
use serde::Deserialize;

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and/or
/// `MOOT_*` environment variables. Every field has a default so the server
/// runs with no config file at all.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }
fn default_store_path() -> PathBuf { PathBuf::from("moot.db") }

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: RosterStore + 'static,
{
  Router::new()
    // Participants
    .route(
      "/participants",
      get(participants::list::<S>).post(participants::create::<S>),
    )
    .route(
      "/participants/{login}",
      get(participants::get_one::<S>)
        .put(participants::update::<S>)
        .delete(participants::delete::<S>),
    )
    // Meetings
    .route("/meetings", get(meetings::list::<S>).post(meetings::create::<S>))
    .route(
      "/meetings/{id}",
      get(meetings::get_one::<S>)
        .put(meetings::update::<S>)
        .delete(meetings::delete::<S>),
    )
    // Enrollment
    .route(
      "/meetings/{id}/participants",
      get(meetings::roster::<S>).post(meetings::enroll::<S>),
    )
    .route(
      "/meetings/{id}/participants/{login}",
      delete(meetings::unenroll::<S>),
    )
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use moot_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn test_app() -> (Router, Arc<SqliteStore>) {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    (api_router(store.clone()), store)
  }

  async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: Value,
  ) -> axum::response::Response {
    let req = Request::builder()
      .method(method)
      .uri(uri)
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string()))
      .unwrap();
    app.clone().oneshot(req).await.unwrap()
  }

  async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    body: &str,
  ) -> axum::response::Response {
    let req = Request::builder()
      .method(method)
      .uri(uri)
      .body(Body::from(body.to_string()))
      .unwrap();
    app.clone().oneshot(req).await.unwrap()
  }

  async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  async fn create_participant(app: &Router, login: &str) -> axum::response::Response {
    send_json(
      app,
      "POST",
      "/participants",
      json!({ "login": login, "password": "pw", "firstName": "F", "lastName": "L" }),
    )
    .await
  }

  async fn create_meeting(app: &Router, title: &str) -> i64 {
    let resp = send_json(app, "POST", "/meetings", json!({ "title": title })).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await["id"].as_i64().unwrap()
  }

  // ── Participants ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_participant_returns_201_without_credentials() {
    let (app, _) = test_app().await;
    let resp = create_participant(&app, "alice").await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body = body_json(resp).await;
    assert_eq!(body["login"], "alice");
    assert_eq!(body["firstName"], "F");
    assert!(body.get("password").is_none(), "plaintext echoed: {body}");
    assert!(body.get("passwordHash").is_none(), "hash echoed: {body}");
  }

  #[tokio::test]
  async fn duplicate_login_returns_409_and_never_overwrites() {
    let (app, store) = test_app().await;
    assert_eq!(create_participant(&app, "alice").await.status(), StatusCode::CREATED);

    let original_hash = store
      .get_participant("alice".into())
      .await
      .unwrap()
      .unwrap()
      .password_hash;

    let resp = send_json(
      &app,
      "POST",
      "/participants",
      json!({ "login": "alice", "password": "other" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let kept = store.get_participant("alice".into()).await.unwrap().unwrap();
    assert_eq!(kept.password_hash, original_hash);
  }

  #[tokio::test]
  async fn stored_password_is_hashed_and_verifiable() {
    let (app, store) = test_app().await;
    create_participant(&app, "alice").await;

    let stored = store.get_participant("alice".into()).await.unwrap().unwrap();
    assert_ne!(stored.password_hash, "pw");
    assert!(crate::password::verify_password("pw", &stored.password_hash));
  }

  #[tokio::test]
  async fn get_unknown_participant_returns_404() {
    let (app, _) = test_app().await;
    let resp = send_raw(&app, "GET", "/participants/nobody", "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn list_filters_and_sorts_by_login() {
    let (app, _) = test_app().await;
    for login in ["joanna", "bob", "anna", "hannah"] {
      create_participant(&app, login).await;
    }

    // key=ann restricts to substring matches.
    let resp = send_raw(&app, "GET", "/participants?key=ann", "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let logins: Vec<&str> =
      body.as_array().unwrap().iter().map(|p| p["login"].as_str().unwrap()).collect();
    assert_eq!(logins.len(), 3);
    assert!(logins.iter().all(|l| l.contains("ann")), "{logins:?}");

    // sortBy=login&sortOrder=DESC yields non-increasing logins.
    let resp =
      send_raw(&app, "GET", "/participants?sortBy=login&sortOrder=DESC", "").await;
    let body = body_json(resp).await;
    let logins: Vec<String> = body
      .as_array()
      .unwrap()
      .iter()
      .map(|p| p["login"].as_str().unwrap().to_string())
      .collect();
    assert_eq!(logins, vec!["joanna", "hannah", "bob", "anna"]);
  }

  #[tokio::test]
  async fn put_replaces_only_the_password() {
    let (app, store) = test_app().await;
    create_participant(&app, "alice").await;

    let resp = send_json(
      &app,
      "PUT",
      "/participants/alice",
      json!({ "password": "new-pw", "firstName": "Ignored" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let stored = store.get_participant("alice".into()).await.unwrap().unwrap();
    assert!(crate::password::verify_password("new-pw", &stored.password_hash));
    assert!(!crate::password::verify_password("pw", &stored.password_hash));
    // Display fields are immutable through PUT.
    assert_eq!(stored.first_name, "F");
  }

  #[tokio::test]
  async fn put_unknown_participant_returns_404() {
    let (app, _) = test_app().await;
    let resp =
      send_json(&app, "PUT", "/participants/nobody", json!({ "password": "x" })).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn delete_participant_then_404() {
    let (app, _) = test_app().await;
    create_participant(&app, "alice").await;

    let resp = send_raw(&app, "DELETE", "/participants/alice", "").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send_raw(&app, "GET", "/participants/alice", "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = send_raw(&app, "DELETE", "/participants/alice", "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── Meetings ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_and_get_meeting() {
    let (app, _) = test_app().await;
    let resp = send_json(
      &app,
      "POST",
      "/meetings",
      json!({
        "title": "Sync",
        "description": "weekly",
        "date": "2026-09-01T10:00:00Z"
      }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["participants"], json!([]));

    let resp = send_raw(&app, "GET", &format!("/meetings/{id}"), "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["title"], "Sync");
    assert_eq!(body["description"], "weekly");
  }

  #[tokio::test]
  async fn get_unknown_meeting_returns_404() {
    let (app, _) = test_app().await;
    let resp = send_raw(&app, "GET", "/meetings/99", "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn put_meeting_applies_the_new_fields() {
    let (app, _) = test_app().await;
    let id = create_meeting(&app, "Old title").await;

    let resp = send_json(
      &app,
      "PUT",
      &format!("/meetings/{id}"),
      json!({ "title": "New title", "description": "moved" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(send_raw(&app, "GET", &format!("/meetings/{id}"), "").await).await;
    assert_eq!(body["title"], "New title");
    assert_eq!(body["description"], "moved");
  }

  #[tokio::test]
  async fn put_unknown_meeting_returns_404() {
    let (app, _) = test_app().await;
    let resp = send_json(&app, "PUT", "/meetings/99", json!({ "title": "x" })).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn delete_meeting_then_404() {
    let (app, _) = test_app().await;
    let id = create_meeting(&app, "Doomed").await;

    let resp = send_raw(&app, "DELETE", &format!("/meetings/{id}"), "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = send_raw(&app, "DELETE", &format!("/meetings/{id}"), "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── Enrollment ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn enroll_rejects_missing_meeting_then_unknown_login() {
    let (app, _) = test_app().await;
    let resp = send_raw(&app, "POST", "/meetings/99/participants", "alice").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let id = create_meeting(&app, "Sync").await;
    let resp =
      send_raw(&app, "POST", &format!("/meetings/{id}/participants"), "ghost").await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
  }

  #[tokio::test]
  async fn double_enroll_conflicts_and_leaves_one_entry() {
    let (app, _) = test_app().await;
    create_participant(&app, "alice").await;
    let id = create_meeting(&app, "Sync").await;

    let resp =
      send_raw(&app, "POST", &format!("/meetings/{id}/participants"), "alice").await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp =
      send_raw(&app, "POST", &format!("/meetings/{id}/participants"), "alice").await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let body =
      body_json(send_raw(&app, "GET", &format!("/meetings/{id}/participants"), "").await)
        .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn enroll_accepts_json_quoted_login() {
    let (app, _) = test_app().await;
    create_participant(&app, "alice").await;
    let id = create_meeting(&app, "Sync").await;

    let resp =
      send_raw(&app, "POST", &format!("/meetings/{id}/participants"), "\"alice\"").await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    assert_eq!(body["participants"][0]["login"], "alice");
  }

  #[tokio::test]
  async fn unenroll_non_member_conflicts_and_set_is_unchanged() {
    let (app, _) = test_app().await;
    create_participant(&app, "alice").await;
    create_participant(&app, "bob").await;
    let id = create_meeting(&app, "Sync").await;
    send_raw(&app, "POST", &format!("/meetings/{id}/participants"), "alice").await;

    let resp =
      send_raw(&app, "DELETE", &format!("/meetings/{id}/participants/bob"), "").await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let body =
      body_json(send_raw(&app, "GET", &format!("/meetings/{id}/participants"), "").await)
        .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["login"], "alice");
  }

  #[tokio::test]
  async fn deleting_a_participant_clears_their_enrollments() {
    let (app, _) = test_app().await;
    create_participant(&app, "alice").await;
    let id = create_meeting(&app, "Sync").await;
    send_raw(&app, "POST", &format!("/meetings/{id}/participants"), "alice").await;

    send_raw(&app, "DELETE", "/participants/alice", "").await;

    let body =
      body_json(send_raw(&app, "GET", &format!("/meetings/{id}/participants"), "").await)
        .await;
    assert_eq!(body, json!([]));
  }

  #[tokio::test]
  async fn roster_of_unknown_meeting_returns_404() {
    let (app, _) = test_app().await;
    let resp = send_raw(&app, "GET", "/meetings/99/participants", "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── End to end ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn full_scenario() {
    let (app, _) = test_app().await;

    let resp = send_json(
      &app,
      "POST",
      "/participants",
      json!({ "login": "alice", "password": "pw" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = send_json(&app, "POST", "/meetings", json!({ "title": "Sync" })).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let id = body_json(resp).await["id"].as_i64().unwrap();
    assert_eq!(id, 1);

    let resp =
      send_raw(&app, "POST", &format!("/meetings/{id}/participants"), "alice").await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    assert_eq!(body["participants"][0]["login"], "alice");

    let resp =
      send_raw(&app, "DELETE", &format!("/meetings/{id}/participants/alice"), "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["participants"], json!([]));
  }
}
