//! Extractors whose rejections are reported as SCIM error envelopes instead
//! of axum's plain-text defaults.

use axum::extract::{FromRequest, FromRequestParts, Path, Query};
use serde::Deserialize;

use crate::error::ApiError;

/// JSON request body. Accepts `application/json` and `application/scim+json`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ScimJson<T>(pub T);

/// Query-string parameters.
#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(ApiError))]
pub struct ScimQuery<T>(pub T);

/// The `{id}` path segment of a member route.
#[derive(Deserialize, FromRequestParts)]
#[from_request(via(Path), rejection(ApiError))]
pub struct UserId(pub i64);
