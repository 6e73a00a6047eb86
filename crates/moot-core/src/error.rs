//! Error types for `moot-core`.
//!
//! One taxonomy for the whole workspace: store backends produce these
//! directly, and the API layer maps them onto HTTP status codes. Not-found
//! and conflict variants are kept distinct per operation so that callers can
//! tell "the addressed resource is absent" (404) apart from "the request
//! violates a uniqueness or membership rule" (409).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A participant with this login already exists. Conflict.
  #[error("a participant with login {0:?} already exists")]
  LoginTaken(String),

  /// The addressed participant does not exist. Not found.
  #[error("participant not found: {0}")]
  ParticipantNotFound(String),

  /// The addressed meeting does not exist. Not found.
  #[error("meeting not found: {0}")]
  MeetingNotFound(i64),

  /// The login is already in the meeting's enrollment set. Conflict.
  #[error("participant {login:?} is already enrolled in meeting {meeting}")]
  AlreadyEnrolled { meeting: i64, login: String },

  /// The login is not in the meeting's enrollment set. Conflict.
  #[error("participant {login:?} is not enrolled in meeting {meeting}")]
  NotEnrolled { meeting: i64, login: String },

  /// An enrollment named a login with no participant record. Conflict —
  /// distinct from [`Error::ParticipantNotFound`] because the participant is
  /// referenced by the request body, not addressed by the request path.
  #[error("no participant with login {0:?} exists in the system")]
  UnknownParticipant(String),

  /// A stored value could not be decoded back into its domain type.
  #[error("malformed stored value: {0}")]
  Malformed(String),

  /// Any other backend failure.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap an arbitrary backend error.
  pub fn store(err: impl std::error::Error + Send + Sync + 'static) -> Self {
    Error::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
