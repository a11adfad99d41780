//! Demo data for local development, inserted through [`UserStore`].

use scimlet_core::{
  StoreError,
  store::{UserFilter, UserStore},
  user::NewUser,
};
use thiserror::Error;

const DEMO_USERS: &str = include_str!("../demo_users.json");

#[derive(Debug, Error)]
pub enum SeedError {
  #[error("demo fixture is malformed: {0}")]
  Fixture(#[from] serde_json::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// The users inserted by [`seed_demo_users`].
pub fn demo_users() -> Result<Vec<NewUser>, SeedError> {
  Ok(serde_json::from_str(DEMO_USERS)?)
}

/// Insert the demo users if the store holds no users at all.
///
/// Returns how many users were inserted.
pub async fn seed_demo_users<S: UserStore>(store: &S) -> Result<usize, SeedError> {
  let existing = store
    .list_users(&UserFilter::default())
    .await
    .map_err(store_error)?;
  if !existing.is_empty() {
    tracing::info!(existing = existing.len(), "store not empty; skipping demo seed");
    return Ok(0);
  }

  let users = demo_users()?;
  let count = users.len();
  for user in users {
    let created = store.create_user(user).await.map_err(store_error)?;
    tracing::debug!(id = created.id, user_name = %created.user_name, "seeded user");
  }
  Ok(count)
}

fn store_error<E: StoreError>(e: E) -> SeedError { SeedError::Store(Box::new(e)) }
