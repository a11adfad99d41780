//! Partial-update interpretation for `PATCH /Users/{id}`.
//!
//! Only `replace` operations without a `path` whose value object carries an
//! `active` boolean are acted on; this is the one mutation identity
//! providers send when (de)activating a user. Every other operation is
//! skipped without error.

use scimlet_core::{store::UserStore, user::User};
use serde_json::Value;

use crate::{error::ApiError, wire::PatchOperation};

/// A recognised mutation, ready to commit to a stored user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserPatch {
  SetActive(bool),
}

impl UserPatch {
  /// Write this one attribute of user `id`; nothing else is touched.
  pub async fn commit<S: UserStore>(
    self,
    store: &S,
    id: i64,
  ) -> Result<Option<User>, S::Error> {
    match self {
      UserPatch::SetActive(active) => store.set_active(id, active).await,
    }
  }
}

/// Translate `operations` into the mutations to apply, in order.
///
/// The whole list is validated before anything is applied, so a malformed
/// operation anywhere in the request leaves the user untouched.
pub fn interpret(operations: &[PatchOperation]) -> Result<Vec<UserPatch>, ApiError> {
  let mut patches = Vec::new();

  for (index, operation) in operations.iter().enumerate() {
    if operation.op != "replace" || operation.path.is_some() {
      tracing::debug!(index, op = %operation.op, path = ?operation.path, "skipping patch operation");
      continue;
    }

    let fields = match &operation.value {
      Some(Value::Object(fields)) => fields,
      Some(_) => {
        return Err(ApiError::InvalidValue(format!(
          "Operations[{index}]: replace value must be an object"
        )));
      }
      None => {
        return Err(ApiError::InvalidValue(format!(
          "Operations[{index}]: replace operation has no value"
        )));
      }
    };

    match fields.get("active") {
      Some(Value::Bool(active)) => patches.push(UserPatch::SetActive(*active)),
      Some(_) => {
        return Err(ApiError::InvalidValue(format!(
          "Operations[{index}]: active must be a boolean"
        )));
      }
      None => {
        tracing::debug!(index, "replace operation does not touch active; skipping");
      }
    }
  }

  Ok(patches)
}
