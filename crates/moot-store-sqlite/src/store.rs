//! [`SqliteStore`] — the SQLite implementation of [`RosterStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;

use moot_core::{
  Error, Result,
  meeting::{Meeting, MeetingUpdate, NewMeeting},
  participant::{NewParticipant, Participant},
  store::{ParticipantQuery, RosterStore, SortOrder},
};

use crate::{
  encode::{RawMeeting, encode_dt, escape_like, participant_from_row},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A moot roster store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All
/// statements for one operation run inside one `call` closure, so each
/// operation executes atomically on the store's dedicated thread; concurrent
/// writers are serialised by construction, with the schema's uniqueness
/// constraints as the final backstop.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path)
      .await
      .map_err(Error::store)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(Error::store)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
      .map_err(Error::store)
  }
}

// ─── Closure-side helpers ────────────────────────────────────────────────────
//
// These run on the connection thread, inside a `call` closure (and usually
// inside a transaction), so they speak plain rusqlite.

fn participant_exists(conn: &rusqlite::Connection, login: &str) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM participants WHERE login = ?1",
        rusqlite::params![login],
        |_| Ok(true),
      )
      .optional()?
      .unwrap_or(false),
  )
}

fn enrollment_exists(
  conn: &rusqlite::Connection,
  meeting_id: i64,
  login: &str,
) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM enrollments WHERE meeting_id = ?1 AND login = ?2",
        rusqlite::params![meeting_id, login],
        |_| Ok(true),
      )
      .optional()?
      .unwrap_or(false),
  )
}

/// Read one participant row, if present.
fn load_participant(
  conn: &rusqlite::Connection,
  login: &str,
) -> rusqlite::Result<Option<Participant>> {
  conn
    .query_row(
      "SELECT login, password_hash, first_name, last_name
       FROM participants WHERE login = ?1",
      rusqlite::params![login],
      participant_from_row,
    )
    .optional()
}

/// A meeting's enrollment set, ordered by login for deterministic output.
fn load_roster(
  conn: &rusqlite::Connection,
  meeting_id: i64,
) -> rusqlite::Result<Vec<Participant>> {
  let mut stmt = conn.prepare(
    "SELECT p.login, p.password_hash, p.first_name, p.last_name
     FROM participants p
     JOIN enrollments e ON e.login = p.login
     WHERE e.meeting_id = ?1
     ORDER BY p.login",
  )?;
  let rows = stmt
    .query_map(rusqlite::params![meeting_id], participant_from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

/// Read one meeting row with its roster, if present.
fn load_meeting(
  conn: &rusqlite::Connection,
  meeting_id: i64,
) -> rusqlite::Result<Option<(RawMeeting, Vec<Participant>)>> {
  let raw = conn
    .query_row(
      "SELECT meeting_id, title, description, date
       FROM meetings WHERE meeting_id = ?1",
      rusqlite::params![meeting_id],
      RawMeeting::from_row,
    )
    .optional()?;

  match raw {
    Some(raw) => {
      let roster = load_roster(conn, meeting_id)?;
      Ok(Some((raw, roster)))
    }
    None => Ok(None),
  }
}

/// Whether a `call` failed on a uniqueness (or other) constraint. Used to
/// translate the schema backstop into the matching domain conflict.
fn is_constraint_violation(err: &tokio_rusqlite::Error) -> bool {
  matches!(
    err,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _))
      if e.code == rusqlite::ErrorCode::ConstraintViolation
  )
}

// ─── RosterStore impl ────────────────────────────────────────────────────────

impl RosterStore for SqliteStore {
  // ── Participants ──────────────────────────────────────────────────────────

  async fn list_participants(&self, query: ParticipantQuery) -> Result<Vec<Participant>> {
    let key_pattern = query
      .effective_key()
      .map(|k| format!("%{}%", escape_like(k)));

    let order_sql = if query.sorts_by_login() {
      match query.order {
        SortOrder::Asc => " ORDER BY login ASC",
        SortOrder::Desc => " ORDER BY login DESC",
      }
    } else {
      // Any other sort field is a no-op: store-default (insertion) order.
      ""
    };

    let base = "SELECT login, password_hash, first_name, last_name FROM participants";
    let sql = match &key_pattern {
      Some(_) => format!("{base} WHERE login LIKE ?1 ESCAPE '\\'{order_sql}"),
      None => format!("{base}{order_sql}"),
    };

    self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = match key_pattern {
          Some(pattern) => stmt
            .query_map(rusqlite::params![pattern], participant_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
          None => stmt
            .query_map([], participant_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(rows)
      })
      .await
      .map_err(Error::store)
  }

  async fn get_participant(&self, login: String) -> Result<Option<Participant>> {
    self
      .conn
      .call(move |conn| load_participant(conn, &login).map_err(Into::into))
      .await
      .map_err(Error::store)
  }

  async fn add_participant(&self, input: NewParticipant) -> Result<Participant> {
    let login_for_conflict = input.login.clone();

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if participant_exists(&tx, &input.login)? {
          return Ok(Err(Error::LoginTaken(input.login)));
        }
        tx.execute(
          "INSERT INTO participants (login, password_hash, first_name, last_name)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![
            input.login,
            input.password_hash,
            input.first_name,
            input.last_name,
          ],
        )?;
        tx.commit()?;
        Ok(Ok(Participant {
          login:         input.login,
          password_hash: input.password_hash,
          first_name:    input.first_name,
          last_name:     input.last_name,
        }))
      })
      .await;

    match outcome {
      Ok(inner) => inner,
      Err(e) if is_constraint_violation(&e) => Err(Error::LoginTaken(login_for_conflict)),
      Err(e) => Err(Error::store(e)),
    }
  }

  async fn set_password(&self, login: String, password_hash: String) -> Result<Participant> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE participants SET password_hash = ?1 WHERE login = ?2",
          rusqlite::params![password_hash, login],
        )?;
        if changed == 0 {
          return Ok(Err(Error::ParticipantNotFound(login)));
        }
        let updated = load_participant(&tx, &login)?;
        tx.commit()?;
        match updated {
          Some(p) => Ok(Ok(p)),
          None => Ok(Err(Error::ParticipantNotFound(login))),
        }
      })
      .await
      .map_err(Error::store)?
  }

  async fn remove_participant(&self, login: String) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        // Cascade clears the enrollments; one statement, one transaction.
        let removed = conn.execute(
          "DELETE FROM participants WHERE login = ?1",
          rusqlite::params![login],
        )?;
        if removed == 0 {
          return Ok(Err(Error::ParticipantNotFound(login)));
        }
        Ok(Ok(()))
      })
      .await
      .map_err(Error::store)?
  }

  // ── Meetings ──────────────────────────────────────────────────────────────

  async fn list_meetings(&self) -> Result<Vec<Meeting>> {
    let raws: Vec<(RawMeeting, Vec<Participant>)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT meeting_id, title, description, date FROM meetings",
        )?;
        let metas = stmt
          .query_map([], RawMeeting::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut out = Vec::with_capacity(metas.len());
        for raw in metas {
          let roster = load_roster(conn, raw.id)?;
          out.push((raw, roster));
        }
        Ok(out)
      })
      .await
      .map_err(Error::store)?;

    raws
      .into_iter()
      .map(|(raw, roster)| raw.into_meeting(roster))
      .collect()
  }

  async fn get_meeting(&self, id: i64) -> Result<Option<Meeting>> {
    let loaded = self
      .conn
      .call(move |conn| load_meeting(conn, id).map_err(Into::into))
      .await
      .map_err(Error::store)?;

    loaded
      .map(|(raw, roster)| raw.into_meeting(roster))
      .transpose()
  }

  async fn add_meeting(&self, input: NewMeeting) -> Result<Meeting> {
    let date_str = input.date.map(encode_dt);
    let title = input.title.clone();
    let description = input.description.clone();

    let (id, date_back) = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO meetings (title, description, date) VALUES (?1, ?2, ?3)",
          rusqlite::params![input.title, input.description, date_str],
        )?;
        Ok((conn.last_insert_rowid(), date_str))
      })
      .await
      .map_err(Error::store)?;

    // Round-trip the date through its stored encoding so the returned record
    // matches what a later read will produce.
    let date = match date_back.as_deref() {
      Some(s) => Some(crate::encode::decode_dt(s)?),
      None => None,
    };

    Ok(Meeting { id, title, description, date, participants: Vec::new() })
  }

  async fn update_meeting(&self, id: i64, changes: MeetingUpdate) -> Result<Meeting> {
    let date_str = changes.date.map(encode_dt);

    let loaded = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE meetings SET title = ?1, description = ?2, date = ?3
           WHERE meeting_id = ?4",
          rusqlite::params![changes.title, changes.description, date_str, id],
        )?;
        if changed == 0 {
          return Ok(Err(Error::MeetingNotFound(id)));
        }
        let loaded = load_meeting(&tx, id)?;
        tx.commit()?;
        match loaded {
          Some(found) => Ok(Ok(found)),
          None => Ok(Err(Error::MeetingNotFound(id))),
        }
      })
      .await
      .map_err(Error::store)??;

    let (raw, roster) = loaded;
    raw.into_meeting(roster)
  }

  async fn remove_meeting(&self, id: i64) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        // Cascade clears the enrollment rows.
        let removed = conn.execute(
          "DELETE FROM meetings WHERE meeting_id = ?1",
          rusqlite::params![id],
        )?;
        if removed == 0 {
          return Ok(Err(Error::MeetingNotFound(id)));
        }
        Ok(Ok(()))
      })
      .await
      .map_err(Error::store)?
  }

  // ── Enrollment ────────────────────────────────────────────────────────────

  async fn meeting_roster(&self, id: i64) -> Result<Vec<Participant>> {
    self
      .conn
      .call(move |conn| {
        let exists: bool = conn
          .query_row(
            "SELECT 1 FROM meetings WHERE meeting_id = ?1",
            rusqlite::params![id],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !exists {
          return Ok(Err(Error::MeetingNotFound(id)));
        }
        Ok(Ok(load_roster(conn, id)?))
      })
      .await
      .map_err(Error::store)?
  }

  async fn enroll(&self, id: i64, login: String) -> Result<Meeting> {
    let conflict_login = login.clone();

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let raw = match tx
          .query_row(
            "SELECT meeting_id, title, description, date
             FROM meetings WHERE meeting_id = ?1",
            rusqlite::params![id],
            RawMeeting::from_row,
          )
          .optional()?
        {
          Some(raw) => raw,
          None => return Ok(Err(Error::MeetingNotFound(id))),
        };

        if enrollment_exists(&tx, id, &login)? {
          return Ok(Err(Error::AlreadyEnrolled { meeting: id, login }));
        }
        if !participant_exists(&tx, &login)? {
          return Ok(Err(Error::UnknownParticipant(login)));
        }

        tx.execute(
          "INSERT INTO enrollments (meeting_id, login) VALUES (?1, ?2)",
          rusqlite::params![id, login],
        )?;
        let roster = load_roster(&tx, id)?;
        tx.commit()?;
        Ok(Ok((raw, roster)))
      })
      .await;

    let (raw, roster) = match outcome {
      Ok(inner) => inner?,
      Err(e) if is_constraint_violation(&e) => {
        return Err(Error::AlreadyEnrolled { meeting: id, login: conflict_login });
      }
      Err(e) => return Err(Error::store(e)),
    };

    raw.into_meeting(roster)
  }

  async fn unenroll(&self, id: i64, login: String) -> Result<Meeting> {
    let loaded = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let raw = match tx
          .query_row(
            "SELECT meeting_id, title, description, date
             FROM meetings WHERE meeting_id = ?1",
            rusqlite::params![id],
            RawMeeting::from_row,
          )
          .optional()?
        {
          Some(raw) => raw,
          None => return Ok(Err(Error::MeetingNotFound(id))),
        };

        let removed = tx.execute(
          "DELETE FROM enrollments WHERE meeting_id = ?1 AND login = ?2",
          rusqlite::params![id, login],
        )?;
        if removed == 0 {
          return Ok(Err(Error::NotEnrolled { meeting: id, login }));
        }

        let roster = load_roster(&tx, id)?;
        tx.commit()?;
        Ok(Ok((raw, roster)))
      })
      .await
      .map_err(Error::store)??;

    let (raw, roster) = loaded;
    raw.into_meeting(roster)
  }
}
