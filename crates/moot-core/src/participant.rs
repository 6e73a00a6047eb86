//! Participant — a person record keyed by a unique login.

use serde::{Deserialize, Serialize};

/// A registered participant.
///
/// The login is the primary key and is immutable after creation. The
/// password hash is an argon2 PHC string; it is skipped on serialize so no
/// API response ever carries a credential, hashed or otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
  pub login:         String,
  #[serde(skip_serializing, default)]
  pub password_hash: String,
  pub first_name:    String,
  pub last_name:     String,
}

/// Input for [`RosterStore::add_participant`](crate::store::RosterStore).
/// The password must already be hashed by the caller.
#[derive(Debug, Clone)]
pub struct NewParticipant {
  pub login:         String,
  pub password_hash: String,
  pub first_name:    String,
  pub last_name:     String,
}
