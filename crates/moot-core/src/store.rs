//! The `RosterStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `moot-store-sqlite`).
//! The HTTP layer (`moot-api`) depends on this abstraction, not on any
//! concrete backend.
//!
//! The trait carries the service semantics, not just raw persistence: every
//! uniqueness and membership rule (duplicate login, double enrollment,
//! dangling enrollee) is checked inside the store operation, in the same
//! atomic unit of work as the write. There is exactly one place where each
//! rule lives.

use std::future::Future;

use crate::{
  Result,
  meeting::{Meeting, MeetingUpdate, NewMeeting},
  participant::{NewParticipant, Participant},
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Sort direction for [`ParticipantQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
  #[default]
  Asc,
  Desc,
}

impl SortOrder {
  /// Parse a `sortOrder` query parameter. `"desc"` (any case) selects
  /// descending; everything else, including the empty string, falls back to
  /// ascending.
  pub fn from_param(s: &str) -> Self {
    if s.eq_ignore_ascii_case("desc") { SortOrder::Desc } else { SortOrder::Asc }
  }
}

/// Parameters for [`RosterStore::list_participants`].
#[derive(Debug, Clone, Default)]
pub struct ParticipantQuery {
  /// Field to sort by. Only `"login"` is recognised; any other value leaves
  /// the result in store-default order. Inherited limitation of the original
  /// API, kept on purpose.
  pub sort_by: Option<String>,
  /// Direction applied when `sort_by` is recognised.
  pub order:   SortOrder,
  /// Case-sensitive substring filter over logins. Empty or absent means no
  /// filter.
  pub key:     Option<String>,
}

impl ParticipantQuery {
  /// The filter key, if it actually restricts anything.
  pub fn effective_key(&self) -> Option<&str> {
    self.key.as_deref().filter(|k| !k.is_empty())
  }

  /// Whether the query asks for login ordering.
  pub fn sorts_by_login(&self) -> bool {
    self.sort_by.as_deref() == Some("login")
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a moot roster store backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (tokio with `axum`). Every mutating
/// operation is atomic: either all of its reads+writes commit, or none do.
pub trait RosterStore: Send + Sync {
  // ── Participants ──────────────────────────────────────────────────────

  /// List participants, filtered and ordered per `query`.
  fn list_participants(
    &self,
    query: ParticipantQuery,
  ) -> impl Future<Output = Result<Vec<Participant>>> + Send + '_;

  /// Exact-match lookup by login. Returns `None` if not found.
  fn get_participant(
    &self,
    login: String,
  ) -> impl Future<Output = Result<Option<Participant>>> + Send + '_;

  /// Create and persist a participant. The password must already be hashed.
  ///
  /// Errors with [`Error::LoginTaken`](crate::Error::LoginTaken) if the
  /// login exists; never overwrites.
  fn add_participant(
    &self,
    input: NewParticipant,
  ) -> impl Future<Output = Result<Participant>> + Send + '_;

  /// Replace the stored password hash — the only mutable participant field.
  ///
  /// Errors with [`Error::ParticipantNotFound`](crate::Error::ParticipantNotFound)
  /// if the login does not exist. Returns the updated record.
  fn set_password(
    &self,
    login: String,
    password_hash: String,
  ) -> impl Future<Output = Result<Participant>> + Send + '_;

  /// Delete a participant and cascade-remove them from every meeting's
  /// enrollment set, atomically.
  ///
  /// Errors with [`Error::ParticipantNotFound`](crate::Error::ParticipantNotFound)
  /// if the login does not exist.
  fn remove_participant(
    &self,
    login: String,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  // ── Meetings ──────────────────────────────────────────────────────────

  /// List all meetings, each with its enrollment set.
  fn list_meetings(
    &self,
  ) -> impl Future<Output = Result<Vec<Meeting>>> + Send + '_;

  /// Lookup by id. Returns `None` if not found.
  fn get_meeting(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Meeting>>> + Send + '_;

  /// Create and persist a meeting with an empty enrollment set. The id is
  /// assigned by the store.
  fn add_meeting(
    &self,
    input: NewMeeting,
  ) -> impl Future<Output = Result<Meeting>> + Send + '_;

  /// Copy the mutable fields onto the stored meeting and persist. Returns
  /// the updated record.
  ///
  /// Errors with [`Error::MeetingNotFound`](crate::Error::MeetingNotFound)
  /// if the id does not exist.
  fn update_meeting(
    &self,
    id: i64,
    changes: MeetingUpdate,
  ) -> impl Future<Output = Result<Meeting>> + Send + '_;

  /// Delete a meeting; its enrollment rows go with it.
  ///
  /// Errors with [`Error::MeetingNotFound`](crate::Error::MeetingNotFound)
  /// if the id does not exist.
  fn remove_meeting(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  // ── Enrollment ────────────────────────────────────────────────────────

  /// The enrollment set of one meeting.
  ///
  /// Errors with [`Error::MeetingNotFound`](crate::Error::MeetingNotFound)
  /// if the id does not exist.
  fn meeting_roster(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Vec<Participant>>> + Send + '_;

  /// Enroll `login` in meeting `id` and return the updated meeting.
  ///
  /// Errors, in check order:
  /// [`MeetingNotFound`](crate::Error::MeetingNotFound) if the meeting is
  /// absent, [`AlreadyEnrolled`](crate::Error::AlreadyEnrolled) if the login
  /// is in the set, [`UnknownParticipant`](crate::Error::UnknownParticipant)
  /// if no such participant exists.
  fn enroll(
    &self,
    id: i64,
    login: String,
  ) -> impl Future<Output = Result<Meeting>> + Send + '_;

  /// Remove `login` from meeting `id` and return the updated meeting.
  ///
  /// Errors with [`MeetingNotFound`](crate::Error::MeetingNotFound) if the
  /// meeting is absent, [`NotEnrolled`](crate::Error::NotEnrolled) if the
  /// login is not in the set.
  fn unenroll(
    &self,
    id: i64,
    login: String,
  ) -> impl Future<Output = Result<Meeting>> + Send + '_;
}
