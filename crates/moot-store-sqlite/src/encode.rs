//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings; everything else is already
//! text or an integer rowid.

use chrono::{DateTime, Utc};
use moot_core::{
  Error, Result,
  meeting::Meeting,
  participant::Participant,
};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Malformed(format!("bad stored date {s:?}: {e}")))
}

// ─── LIKE patterns ───────────────────────────────────────────────────────────

/// Escape LIKE metacharacters so a filter key matches literally. The caller
/// wraps the result in `%...%` and queries with `ESCAPE '\'`.
pub fn escape_like(key: &str) -> String {
  key
    .replace('\\', "\\\\")
    .replace('%', "\\%")
    .replace('_', "\\_")
}

// ─── Row mapping ─────────────────────────────────────────────────────────────

/// Map a `login, password_hash, first_name, last_name` row.
pub fn participant_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Participant> {
  Ok(Participant {
    login:         row.get(0)?,
    password_hash: row.get(1)?,
    first_name:    row.get(2)?,
    last_name:     row.get(3)?,
  })
}

/// Raw strings read directly from a `meetings` row, before the date column
/// is decoded.
pub struct RawMeeting {
  pub id:          i64,
  pub title:       String,
  pub description: String,
  pub date:        Option<String>,
}

impl RawMeeting {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawMeeting {
      id:          row.get(0)?,
      title:       row.get(1)?,
      description: row.get(2)?,
      date:        row.get(3)?,
    })
  }

  pub fn into_meeting(self, participants: Vec<Participant>) -> Result<Meeting> {
    Ok(Meeting {
      id:          self.id,
      title:       self.title,
      description: self.description,
      date:        self.date.as_deref().map(decode_dt).transpose()?,
      participants,
    })
  }
}
