//! SCIM wire representation.
//!
//! These types are what the identity provider sends and receives. They are
//! never persisted directly; see [`crate::translate`] for the mapping to the
//! stored model. Absent optionals are omitted on output rather than written
//! as `null`.

use serde::{Deserialize, Serialize};

/// Schema URN carried by every user resource.
pub const USER_SCHEMA: &str = "urn:ietf:params:scim:schemas:core:2.0:User";
/// Schema URN of the list response envelope.
pub const LIST_RESPONSE_SCHEMA: &str =
  "urn:ietf:params:scim:api:messages:2.0:ListResponse";
/// Schema URN of the error envelope.
pub const ERROR_SCHEMA: &str = "urn:ietf:params:scim:api:messages:2.0:Error";

// ─── User ────────────────────────────────────────────────────────────────────

/// A SCIM core User resource (the subset this endpoint supports).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimUser {
  #[serde(default)]
  pub schemas:      Vec<String>,
  /// String form of the store-assigned id. Ignored on input.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id:           Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub external_id:  Option<String>,
  pub user_name:    String,
  #[serde(default)]
  pub name:         ScimName,
  #[serde(default)]
  pub display_name: String,
  #[serde(default)]
  pub emails:       Vec<ScimEmail>,
  #[serde(default)]
  pub active:       bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimName {
  #[serde(default)]
  pub given_name:  String,
  #[serde(default)]
  pub family_name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub middle_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScimEmail {
  pub value:   String,
  #[serde(rename = "type", default)]
  pub kind:    String,
  #[serde(default)]
  pub primary: bool,
}

// ─── Envelopes ───────────────────────────────────────────────────────────────

/// `urn:ietf:params:scim:api:messages:2.0:ListResponse`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
  pub schemas:        [&'static str; 1],
  /// Size of the filtered result set before pagination.
  pub total_results:  usize,
  pub start_index:    i64,
  pub items_per_page: i64,
  #[serde(rename = "Resources")]
  pub resources:      Vec<T>,
}

/// `urn:ietf:params:scim:api:messages:2.0:Error`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
  pub schemas:   [&'static str; 1],
  pub detail:    String,
  pub status:    u16,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub scim_type: Option<&'static str>,
}

impl ErrorResponse {
  pub fn new(status: u16, detail: impl Into<String>, scim_type: Option<&'static str>) -> Self {
    Self {
      schemas: [ERROR_SCHEMA],
      detail: detail.into(),
      status,
      scim_type,
    }
  }
}

// ─── Patch ───────────────────────────────────────────────────────────────────

/// Body of `PATCH /Users/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct PatchRequest {
  #[serde(rename = "Operations")]
  pub operations: Vec<PatchOperation>,
}

/// One entry of a patch request's `Operations` array.
#[derive(Debug, Clone, Deserialize)]
pub struct PatchOperation {
  pub op:    String,
  #[serde(default)]
  pub path:  Option<String>,
  #[serde(default)]
  pub value: Option<serde_json::Value>,
}
