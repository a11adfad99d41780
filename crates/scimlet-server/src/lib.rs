//! HTTP host for the scimlet SCIM endpoint.
//!
//! Wraps the [`scimlet_api`] router with authentication and request tracing
//! and mounts it under `/scim/v2`.

pub mod auth;
pub mod error;
pub mod seed;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, middleware};
use scimlet_core::store::UserStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::{AuthConfig, require_auth};

/// Path prefix of every SCIM route.
pub const SCIM_PREFIX: &str = "/scim/v2";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `SCIMLET_*` environment variables.
#[derive(Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  /// Externally visible origin, e.g. `https://scim.example.com`.
  pub base_url:           String,
  pub store_path:         PathBuf,
  pub auth_token_hash:    Option<String>,
  pub auth_username:      Option<String>,
  pub auth_password_hash: Option<String>,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:               "127.0.0.1".to_string(),
      port:               5000,
      base_url:           "http://localhost:5000".to_string(),
      store_path:         PathBuf::from("scimlet.db"),
      auth_token_hash:    None,
      auth_username:      None,
      auth_password_hash: None,
    }
  }
}

impl ServerConfig {
  /// The externally visible SCIM base URL, e.g. `https://scim.example.com/scim/v2`.
  pub fn scim_base_url(&self) -> String {
    format!("{}{SCIM_PREFIX}", self.base_url.trim_end_matches('/'))
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete application router.
pub fn router<S>(store: Arc<S>, config: &ServerConfig) -> Router
where
  S: UserStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let auth = Arc::new(AuthConfig::from(config));

  Router::new()
    .nest(
      SCIM_PREFIX,
      scimlet_api::api_router(store, &config.scim_base_url()),
    )
    .layer(middleware::from_fn_with_state(auth, require_auth))
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use rand_core::OsRng;
  use scimlet_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  const TOKEN: &str = "provisioning-token";

  async fn make_app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    crate::seed::seed_demo_users(&store).await.unwrap();

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(TOKEN.as_bytes(), &salt)
      .unwrap()
      .to_string();

    let config = ServerConfig {
      base_url: "https://scim.example.com/".to_string(),
      auth_token_hash: Some(hash),
      ..ServerConfig::default()
    };
    router(Arc::new(store), &config)
  }

  async fn oneshot(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
      builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
      Some(body) => builder
        .header(header::CONTENT_TYPE, "application/scim+json")
        .body(Body::from(body.to_string())),
      None => builder.body(Body::empty()),
    }
    .unwrap();
    app.oneshot(req).await.unwrap()
  }

  async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  #[tokio::test]
  async fn unauthenticated_requests_get_a_scim_401() {
    let app = make_app().await;
    let resp = oneshot(app, "GET", "/scim/v2/Users", None, None).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));
    let body = json_body(resp).await;
    assert_eq!(body["schemas"], json!(["urn:ietf:params:scim:api:messages:2.0:Error"]));
    assert_eq!(body["status"], 401);
  }

  #[tokio::test]
  async fn wrong_token_is_rejected() {
    let app = make_app().await;
    let resp = oneshot(app, "GET", "/scim/v2/users/1", Some("guess"), None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn authenticated_list_reaches_the_store() {
    let app = make_app().await;
    let resp = oneshot(app, "GET", "/scim/v2/users?count=2", Some(TOKEN), None).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["totalResults"], 3);
    assert_eq!(body["Resources"].as_array().unwrap().len(), 2);
  }

  #[tokio::test]
  async fn location_uses_configured_base_url() {
    let app = make_app().await;
    let resp = oneshot(
      app,
      "POST",
      "/scim/v2/Users",
      Some(TOKEN),
      Some(json!({
        "userName": "new.hire@fake.domain",
        "name": { "givenName": "New", "familyName": "Hire" },
        "displayName": "New Hire",
        "active": true
      })),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let location = resp
      .headers()
      .get(header::LOCATION)
      .unwrap()
      .to_str()
      .unwrap()
      .to_owned();
    let body = json_body(resp).await;
    let id = body["id"].as_str().unwrap();
    assert_eq!(location, format!("https://scim.example.com/scim/v2/users/{id}"));
  }

  #[test]
  fn config_defaults_fill_missing_keys() {
    let cfg: ServerConfig = config::Config::builder()
      .set_override("port", 8443)
      .unwrap()
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();
    assert_eq!(cfg.port, 8443);
    assert_eq!(cfg.host, "127.0.0.1");
    assert!(cfg.auth_token_hash.is_none());
    assert_eq!(cfg.scim_base_url(), "http://localhost:5000/scim/v2");
  }
}
