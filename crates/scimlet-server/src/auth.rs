//! Request authentication: bearer token or HTTP Basic, both checked against
//! argon2 PHC hashes from the configuration.

use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  extract::{Request, State},
  http::{HeaderMap, header},
  middleware::Next,
  response::Response,
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;

use crate::{ServerConfig, error::Error};

/// Credentials accepted as valid for this server instance.
///
/// A scheme whose hash is absent is disabled.
#[derive(Clone, Default)]
pub struct AuthConfig {
  /// PHC string of the bearer token, e.g. `$argon2id$v=19$…`
  pub token_hash:    Option<String>,
  pub username:      Option<String>,
  /// PHC string of the Basic-auth password.
  pub password_hash: Option<String>,
}

impl AuthConfig {
  pub fn is_empty(&self) -> bool {
    self.token_hash.is_none()
      && (self.username.is_none() || self.password_hash.is_none())
  }
}

impl From<&ServerConfig> for AuthConfig {
  fn from(c: &ServerConfig) -> Self {
    AuthConfig {
      token_hash:    c.auth_token_hash.clone(),
      username:      c.auth_username.clone(),
      password_hash: c.auth_password_hash.clone(),
    }
  }
}

/// Verify the `Authorization` header against `config`.
pub fn verify_auth(headers: &HeaderMap, config: &AuthConfig) -> Result<(), Error> {
  let header_val = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  if let Some(token) = header_val.strip_prefix("Bearer ") {
    let hash = config.token_hash.as_deref().ok_or(Error::Unauthorized)?;
    return verify_secret(token.trim(), hash);
  }

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded.trim()).map_err(|_| Error::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| Error::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;

  match (&config.username, &config.password_hash) {
    (Some(expected), Some(hash)) if username == expected => {
      verify_secret(password, hash)
    }
    _ => Err(Error::Unauthorized),
  }
}

fn verify_secret(secret: &str, phc: &str) -> Result<(), Error> {
  let parsed_hash = PasswordHash::new(phc).map_err(|_| Error::Unauthorized)?;

  Argon2::default()
    .verify_password(secret.as_bytes(), &parsed_hash)
    .map_err(|_| Error::Unauthorized)
}

/// Middleware rejecting every request that fails [`verify_auth`].
pub async fn require_auth(
  State(auth): State<Arc<AuthConfig>>,
  req: Request,
  next: Next,
) -> Result<Response, Error> {
  if let Err(e) = verify_auth(req.headers(), &auth) {
    tracing::warn!(method = %req.method(), uri = %req.uri(), "rejected unauthenticated request");
    return Err(e);
  }
  Ok(next.run(req).await)
}
