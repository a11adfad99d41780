//! The `UserStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `scimlet-store-sqlite`).
//! The SCIM layer depends on this abstraction, never on a live database
//! handle.

use std::future::Future;

use crate::{
  error::StoreError,
  user::{NewUser, User},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Predicate for [`UserStore::list_users`]. The default matches every user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
  /// Exact, case-sensitive match on `user_name`.
  pub user_name: Option<String>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a user store backend.
///
/// Every write that touches a user and its emails is committed as a single
/// unit: a reader never observes a user with a partially-written email set.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait UserStore: Send + Sync {
  type Error: StoreError;

  /// Retrieve a user and its emails. Returns `None` if not found.
  fn get_user(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// All users matching `filter`, newest id first, each with its emails.
  fn list_users<'a>(
    &'a self,
    filter: &'a UserFilter,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + 'a;

  /// Insert a user and its emails. The store assigns the id.
  ///
  /// A duplicate `user_name` fails with an error whose
  /// [`StoreError::is_conflict`] is `true`; nothing is written.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Overwrite every scalar field of user `id` and reconcile its emails
  /// against `input.emails` by value:
  ///
  /// - existing emails whose value is absent from the input are removed;
  /// - existing emails whose value matches an input email are updated in
  ///   place;
  /// - input emails with no existing match are added.
  ///
  /// Returns the resulting state, or `None` if `id` does not exist.
  fn replace_user(
    &self,
    id: i64,
    input: NewUser,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Set the `active` flag of user `id`, leaving every other attribute and
  /// the email set as currently stored.
  ///
  /// Returns the resulting state, or `None` if `id` does not exist.
  fn set_active(
    &self,
    id: i64,
    active: bool,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;
}
