//! Meeting — an event record with a set of enrolled participants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::participant::Participant;

/// A meeting and its current enrollment set.
///
/// `participants` is a set keyed by login; the store returns it ordered by
/// login so responses are deterministic, but no ordering is part of the
/// contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meeting {
  pub id:           i64,
  pub title:        String,
  pub description:  String,
  pub date:         Option<DateTime<Utc>>,
  pub participants: Vec<Participant>,
}

/// Input for [`RosterStore::add_meeting`](crate::store::RosterStore).
/// The id is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewMeeting {
  pub title:       String,
  pub description: String,
  pub date:        Option<DateTime<Utc>>,
}

/// The mutable fields applied by
/// [`RosterStore::update_meeting`](crate::store::RosterStore). The id and
/// the enrollment set are never touched by an update; enrollment changes go
/// through the dedicated enroll/unenroll operations.
#[derive(Debug, Clone)]
pub struct MeetingUpdate {
  pub title:       String,
  pub description: String,
  pub date:        Option<DateTime<Utc>>,
}
