//! Handlers for `/meetings` endpoints, including the nested enrollment
//! operations.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/meetings` | — |
//! | `GET`    | `/meetings/:id` | 404 if not found |
//! | `POST`   | `/meetings` | Body: `{"title": ..., "description"?, "date"?}` |
//! | `PUT`    | `/meetings/:id` | Replaces title/description/date |
//! | `DELETE` | `/meetings/:id` | Enrollment rows go with it |
//! | `GET`    | `/meetings/:id/participants` | The enrollment set |
//! | `POST`   | `/meetings/:id/participants` | Body: raw login string; 409 on duplicate or unknown login |
//! | `DELETE` | `/meetings/:id/participants/:login` | 409 if not enrolled |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use moot_core::{
  meeting::{Meeting, MeetingUpdate, NewMeeting},
  participant::Participant,
  store::RosterStore,
};
use serde::Deserialize;

use crate::error::ApiError;

// ─── Bodies ──────────────────────────────────────────────────────────────────

/// Inbound meeting record for POST and PUT. Title is required; the rest
/// defaults so a meeting can be created from a title alone.
#[derive(Debug, Deserialize)]
pub struct MeetingBody {
  pub title:       String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub date:        Option<DateTime<Utc>>,
}

/// The enroll body is the login itself, not a JSON object. Accept either a
/// bare string or a JSON string literal so `curl -d alice` and
/// `curl -d '"alice"'` both work.
fn login_from_body(body: &str) -> Result<String, ApiError> {
  let trimmed = body.trim();
  let login = trimmed
    .strip_prefix('"')
    .and_then(|s| s.strip_suffix('"'))
    .unwrap_or(trimmed);
  if login.is_empty() {
    return Err(ApiError::BadRequest("participant login must not be empty".into()));
  }
  Ok(login.to_string())
}

// ─── CRUD ─────────────────────────────────────────────────────────────────────

/// `GET /meetings`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Meeting>>, ApiError>
where
  S: RosterStore,
{
  let meetings = store.list_meetings().await?;
  Ok(Json(meetings))
}

/// `GET /meetings/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Meeting>, ApiError>
where
  S: RosterStore,
{
  let meeting = store
    .get_meeting(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("meeting not found: {id}")))?;
  Ok(Json(meeting))
}

/// `POST /meetings`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<MeetingBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RosterStore,
{
  let meeting = store
    .add_meeting(NewMeeting {
      title:       body.title,
      description: body.description,
      date:        body.date,
    })
    .await?;
  Ok((StatusCode::CREATED, Json(meeting)))
}

/// `PUT /meetings/:id` — copies the client-supplied mutable fields onto the
/// stored record. The enrollment set is untouched.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(body): Json<MeetingBody>,
) -> Result<Json<Meeting>, ApiError>
where
  S: RosterStore,
{
  let meeting = store
    .update_meeting(id, MeetingUpdate {
      title:       body.title,
      description: body.description,
      date:        body.date,
    })
    .await?;
  Ok(Json(meeting))
}

/// `DELETE /meetings/:id`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: RosterStore,
{
  store.remove_meeting(id).await?;
  Ok(StatusCode::OK)
}

// ─── Enrollment ──────────────────────────────────────────────────────────────

/// `GET /meetings/:id/participants`
pub async fn roster<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Vec<Participant>>, ApiError>
where
  S: RosterStore,
{
  let participants = store.meeting_roster(id).await?;
  Ok(Json(participants))
}

/// `POST /meetings/:id/participants` — body is the login to enroll.
pub async fn enroll<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  body: String,
) -> Result<impl IntoResponse, ApiError>
where
  S: RosterStore,
{
  let login = login_from_body(&body)?;
  let meeting = store.enroll(id, login).await?;
  Ok((StatusCode::CREATED, Json(meeting)))
}

/// `DELETE /meetings/:id/participants/:login`
pub async fn unenroll<S>(
  State(store): State<Arc<S>>,
  Path((id, login)): Path<(i64, String)>,
) -> Result<Json<Meeting>, ApiError>
where
  S: RosterStore,
{
  let meeting = store.unenroll(id, login).await?;
  Ok(Json(meeting))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn login_body_accepts_bare_and_quoted() {
    assert_eq!(login_from_body("alice").unwrap(), "alice");
    assert_eq!(login_from_body("\"alice\"").unwrap(), "alice");
    assert_eq!(login_from_body("  alice\n").unwrap(), "alice");
  }

  #[test]
  fn empty_login_body_is_rejected() {
    assert!(login_from_body("").is_err());
    assert!(login_from_body("\"\"").is_err());
    assert!(login_from_body("   ").is_err());
  }
}
