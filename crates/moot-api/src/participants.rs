//! Handlers for `/participants` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/participants` | Optional `?sortBy=login&sortOrder=DESC&key=ann` |
//! | `GET`    | `/participants/:login` | 404 if not found |
//! | `POST`   | `/participants` | Body: full record, plaintext password; 409 if login taken |
//! | `PUT`    | `/participants/:login` | Only the password field is honored |
//! | `DELETE` | `/participants/:login` | Cascades out of every meeting |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use moot_core::{
  participant::{NewParticipant, Participant},
  store::{ParticipantQuery, RosterStore, SortOrder},
};
use serde::Deserialize;

use crate::{error::ApiError, password};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  /// Only `login` is recognised; anything else leaves store order.
  pub sort_by:    Option<String>,
  /// `ASC` (default) or `DESC`, case-insensitive.
  pub sort_order: Option<String>,
  /// Case-sensitive substring filter over logins.
  pub key:        Option<String>,
}

/// `GET /participants[?sortBy=login][&sortOrder=DESC][&key=<substring>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Participant>>, ApiError>
where
  S: RosterStore,
{
  let query = ParticipantQuery {
    sort_by: params.sort_by,
    order:   SortOrder::from_param(params.sort_order.as_deref().unwrap_or("")),
    key:     params.key,
  };
  let participants = store.list_participants(query).await?;
  Ok(Json(participants))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /participants/:login`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(login): Path<String>,
) -> Result<Json<Participant>, ApiError>
where
  S: RosterStore,
{
  let participant = store
    .get_participant(login.clone())
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("participant not found: {login}")))?;
  Ok(Json(participant))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody {
  pub login:    String,
  pub password: String,
  #[serde(default)]
  pub first_name: String,
  #[serde(default)]
  pub last_name:  String,
}

/// `POST /participants` — hashes the password, then inserts. The store
/// rejects a taken login with a conflict; the response never carries the
/// hash.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RosterStore,
{
  if body.login.is_empty() {
    return Err(ApiError::BadRequest("login must not be empty".into()));
  }

  let password_hash =
    password::hash_password(&body.password).map_err(|e| ApiError::Hash(e.to_string()))?;

  let participant = store
    .add_participant(NewParticipant {
      login:         body.login,
      password_hash,
      first_name:    body.first_name,
      last_name:     body.last_name,
    })
    .await?;

  Ok((StatusCode::CREATED, Json(participant)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// Inbound PUT body. Other fields may be present but only the password is
/// honored — the restricted-update contract; login and names are immutable
/// through this endpoint.
#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub password: String,
}

/// `PUT /participants/:login`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(login): Path<String>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<Participant>, ApiError>
where
  S: RosterStore,
{
  let password_hash =
    password::hash_password(&body.password).map_err(|e| ApiError::Hash(e.to_string()))?;
  let participant = store.set_password(login, password_hash).await?;
  Ok(Json(participant))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /participants/:login`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path(login): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: RosterStore,
{
  store.remove_participant(login).await?;
  Ok(StatusCode::OK)
}
