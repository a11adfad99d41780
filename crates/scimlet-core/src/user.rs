//! The persisted user model.
//!
//! A user owns its email rows outright: emails are created, updated, and
//! removed only through the owning user, and never outlive it.

use serde::{Deserialize, Serialize};

// ─── Email ───────────────────────────────────────────────────────────────────

/// An email address owned by a [`User`].
///
/// `value` is unique per user. Nothing constrains how many of a user's
/// emails are marked primary; that is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
  /// Free-form label, e.g. `"work"` or `"personal"`.
  #[serde(rename = "type")]
  pub kind:    String,
  pub value:   String,
  pub primary: bool,
}

// ─── User ────────────────────────────────────────────────────────────────────

/// A stored user together with all of its emails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  /// Store-assigned surrogate key; never changes after creation.
  pub id:           i64,
  /// Opaque identifier set by the identity provider.
  pub external_id:  Option<String>,
  /// Globally unique login name.
  pub user_name:    String,
  pub first_name:   String,
  pub middle_name:  Option<String>,
  pub last_name:    String,
  pub display_name: String,
  pub active:       bool,
  pub emails:       Vec<Email>,
}

// ─── NewUser ─────────────────────────────────────────────────────────────────

/// Input to [`crate::store::UserStore::create_user`] and
/// [`crate::store::UserStore::replace_user`].
/// `id` is always assigned by the store; it is not accepted from callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
  pub external_id:  Option<String>,
  pub user_name:    String,
  pub first_name:   String,
  pub middle_name:  Option<String>,
  pub last_name:    String,
  pub display_name: String,
  pub active:       bool,
  #[serde(default)]
  pub emails:       Vec<Email>,
}

impl From<User> for NewUser {
  fn from(u: User) -> Self {
    NewUser {
      external_id:  u.external_id,
      user_name:    u.user_name,
      first_name:   u.first_name,
      middle_name:  u.middle_name,
      last_name:    u.last_name,
      display_name: u.display_name,
      active:       u.active,
      emails:       u.emails,
    }
  }
}
