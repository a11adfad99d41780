//! [`SqliteStore`] — the SQLite implementation of [`UserStore`].

use std::{
  collections::{HashMap, HashSet},
  path::Path,
};

use rusqlite::{Connection, OptionalExtension as _};
use scimlet_core::{
  store::{UserFilter, UserStore},
  user::{Email, NewUser, User},
};

use crate::{
  Result,
  encode::{EMAIL_COLUMNS, RawUser, USER_COLUMNS, decode_email},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A user store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
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
      .await?;
    Ok(())
  }
}

// ─── Statement helpers ───────────────────────────────────────────────────────
//
// These take a plain `&Connection` so they can run either directly or inside
// a `rusqlite::Transaction` (which derefs to `Connection`).

fn select_emails(conn: &Connection, user_id: i64) -> rusqlite::Result<Vec<Email>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {EMAIL_COLUMNS} FROM emails WHERE user_id = ?1 ORDER BY rowid"
  ))?;
  let rows = stmt.query_map(rusqlite::params![user_id], decode_email)?;
  rows.map(|row| row.map(|(_, email)| email)).collect()
}

fn select_user(conn: &Connection, id: i64) -> rusqlite::Result<Option<User>> {
  let raw = conn
    .query_row(
      &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
      rusqlite::params![id],
      RawUser::from_row,
    )
    .optional()?;

  match raw {
    Some(raw) => {
      let emails = select_emails(conn, raw.id)?;
      Ok(Some(raw.into_user(emails)))
    }
    None => Ok(None),
  }
}

fn insert_email(conn: &Connection, user_id: i64, email: &Email) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT INTO emails (value, user_id, type, is_primary) VALUES (?1, ?2, ?3, ?4)",
    rusqlite::params![email.value, user_id, email.kind, email.primary],
  )?;
  Ok(())
}

/// Bring the stored emails of `user_id` in line with `inbound`, matching rows
/// by value. Matched rows are updated in place rather than re-inserted.
fn reconcile_emails(
  conn: &Connection,
  user_id: i64,
  inbound: &[Email],
) -> rusqlite::Result<()> {
  let existing = select_emails(conn, user_id)?;
  let existing_values: HashSet<&str> =
    existing.iter().map(|e| e.value.as_str()).collect();
  let inbound_values: HashSet<&str> =
    inbound.iter().map(|e| e.value.as_str()).collect();

  for stale in existing.iter().filter(|e| !inbound_values.contains(e.value.as_str())) {
    conn.execute(
      "DELETE FROM emails WHERE user_id = ?1 AND value = ?2",
      rusqlite::params![user_id, stale.value],
    )?;
  }

  for email in inbound {
    if existing_values.contains(email.value.as_str()) {
      conn.execute(
        "UPDATE emails SET type = ?1, is_primary = ?2 WHERE user_id = ?3 AND value = ?4",
        rusqlite::params![email.kind, email.primary, user_id, email.value],
      )?;
    } else {
      insert_email(conn, user_id, email)?;
    }
  }

  Ok(())
}

// ─── UserStore impl ──────────────────────────────────────────────────────────

impl UserStore for SqliteStore {
  type Error = crate::Error;

  async fn get_user(&self, id: i64) -> Result<Option<User>> {
    let user = self
      .conn
      .call(move |conn| Ok(select_user(conn, id)?))
      .await?;
    Ok(user)
  }

  async fn list_users(&self, filter: &UserFilter) -> Result<Vec<User>> {
    let user_name = filter.user_name.clone();

    let users = self
      .conn
      .call(move |conn| {
        // Both reads see the same snapshot.
        let tx = conn.transaction()?;

        let raws = {
          let mut stmt = tx.prepare(&format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE (?1 IS NULL OR user_name = ?1)
             ORDER BY id DESC"
          ))?;
          stmt
            .query_map(rusqlite::params![user_name], RawUser::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };

        let mut emails_by_user: HashMap<i64, Vec<Email>> = HashMap::new();
        {
          let mut stmt = tx.prepare(
            "SELECT e.user_id, e.type, e.value, e.is_primary
             FROM emails e
             JOIN users u ON u.id = e.user_id
             WHERE (?1 IS NULL OR u.user_name = ?1)
             ORDER BY e.rowid",
          )?;
          let rows = stmt.query_map(rusqlite::params![user_name], decode_email)?;
          for row in rows {
            let (user_id, email) = row?;
            emails_by_user.entry(user_id).or_default().push(email);
          }
        }

        tx.commit()?;

        Ok(
          raws
            .into_iter()
            .map(|raw| {
              let emails = emails_by_user.remove(&raw.id).unwrap_or_default();
              raw.into_user(emails)
            })
            .collect::<Vec<_>>(),
        )
      })
      .await?;

    Ok(users)
  }

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let user = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        tx.execute(
          "INSERT INTO users (
             external_id, user_name, first_name, middle_name,
             last_name, display_name, active
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            input.external_id,
            input.user_name,
            input.first_name,
            input.middle_name,
            input.last_name,
            input.display_name,
            input.active,
          ],
        )?;
        let id = tx.last_insert_rowid();

        for email in &input.emails {
          insert_email(&tx, id, email)?;
        }

        tx.commit()?;

        Ok(User {
          id,
          external_id: input.external_id,
          user_name: input.user_name,
          first_name: input.first_name,
          middle_name: input.middle_name,
          last_name: input.last_name,
          display_name: input.display_name,
          active: input.active,
          emails: input.emails,
        })
      })
      .await?;

    tracing::debug!(id = user.id, "inserted user");
    Ok(user)
  }

  async fn replace_user(&self, id: i64, input: NewUser) -> Result<Option<User>> {
    let user = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let updated = tx.execute(
          "UPDATE users SET
             external_id  = ?1,
             user_name    = ?2,
             first_name   = ?3,
             middle_name  = ?4,
             last_name    = ?5,
             display_name = ?6,
             active       = ?7
           WHERE id = ?8",
          rusqlite::params![
            input.external_id,
            input.user_name,
            input.first_name,
            input.middle_name,
            input.last_name,
            input.display_name,
            input.active,
            id,
          ],
        )?;

        if updated == 0 {
          return Ok(None);
        }

        reconcile_emails(&tx, id, &input.emails)?;
        let user = select_user(&tx, id)?;

        tx.commit()?;
        Ok(user)
      })
      .await?;

    Ok(user)
  }

  async fn set_active(&self, id: i64, active: bool) -> Result<Option<User>> {
    let user = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let updated = tx.execute(
          "UPDATE users SET active = ?1 WHERE id = ?2",
          rusqlite::params![active, id],
        )?;
        if updated == 0 {
          return Ok(None);
        }

        let user = select_user(&tx, id)?;
        tx.commit()?;
        Ok(user)
      })
      .await?;

    Ok(user)
  }
}
