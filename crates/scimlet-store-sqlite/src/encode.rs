//! Row decoding between SQLite result rows and the core user model.
//!
//! Booleans are stored as `0`/`1` integers. Emails are read in `rowid` order,
//! which is insertion order and is preserved by in-place updates.

use scimlet_core::user::{Email, User};

/// Column list matching [`RawUser::from_row`].
pub const USER_COLUMNS: &str = "id, external_id, user_name, first_name, \
                                middle_name, last_name, display_name, active";

/// Column list matching [`decode_email`].
pub const EMAIL_COLUMNS: &str = "user_id, type, value, is_primary";

// ─── Row types ───────────────────────────────────────────────────────────────

/// Scalar columns read directly from a `users` row.
pub struct RawUser {
  pub id:           i64,
  pub external_id:  Option<String>,
  pub user_name:    String,
  pub first_name:   String,
  pub middle_name:  Option<String>,
  pub last_name:    String,
  pub display_name: String,
  pub active:       bool,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawUser {
      id:           row.get(0)?,
      external_id:  row.get(1)?,
      user_name:    row.get(2)?,
      first_name:   row.get(3)?,
      middle_name:  row.get(4)?,
      last_name:    row.get(5)?,
      display_name: row.get(6)?,
      active:       row.get(7)?,
    })
  }

  pub fn into_user(self, emails: Vec<Email>) -> User {
    User {
      id: self.id,
      external_id: self.external_id,
      user_name: self.user_name,
      first_name: self.first_name,
      middle_name: self.middle_name,
      last_name: self.last_name,
      display_name: self.display_name,
      active: self.active,
      emails,
    }
  }
}

/// Decode an `emails` row into its owning user id and the email itself.
pub fn decode_email(row: &rusqlite::Row<'_>) -> rusqlite::Result<(i64, Email)> {
  Ok((row.get(0)?, Email {
    kind:    row.get(1)?,
    value:   row.get(2)?,
    primary: row.get(3)?,
  }))
}
