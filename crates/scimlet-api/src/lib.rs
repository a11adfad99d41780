//! SCIM 2.0 `/Users` endpoint for scimlet.
//!
//! Exposes an axum [`Router`] backed by any [`scimlet_core::store::UserStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/scim/v2", scimlet_api::api_router(store.clone(), "https://idp.example/scim/v2"))
//! ```

pub mod error;
pub mod extract;
pub mod patch;
pub mod query;
pub mod translate;
pub mod users;
pub mod wire;

use std::sync::Arc;

use axum::{Router, routing::get};
use scimlet_core::store::UserStore;

pub use error::ApiError;

/// Shared state threaded through the user handlers.
pub struct ApiState<S> {
  pub store:         Arc<S>,
  /// Externally visible SCIM base URL, without a trailing slash. Used to
  /// build `Location` headers.
  pub location_base: Arc<str>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:         Arc::clone(&self.store),
      location_base: Arc::clone(&self.location_base),
    }
  }
}

impl<S> ApiState<S> {
  /// The canonical URL of user `id`.
  pub fn location(&self, id: i64) -> String {
    format!("{}/users/{id}", self.location_base)
  }
}

/// Build a fully-materialised SCIM router for `store`.
///
/// Routes are registered under both `/users` and `/Users`; identity
/// providers differ in which casing they send.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, location_base: &str) -> Router<()>
where
  S: UserStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let state = ApiState {
    store,
    location_base: Arc::from(location_base.trim_end_matches('/')),
  };

  let collection = get(users::list::<S>).post(users::create::<S>);
  let member = get(users::get_one::<S>)
    .put(users::replace::<S>)
    .patch(users::patch::<S>);

  Router::new()
    .route("/users", collection.clone())
    .route("/Users", collection)
    .route("/users/{id}", member.clone())
    .route("/Users/{id}", member)
    .with_state(state)
}
