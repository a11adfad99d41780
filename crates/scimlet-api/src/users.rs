//! Handlers for the SCIM `/Users` endpoints.
//!
//! | Method  | Path          | Notes |
//! |---------|---------------|-------|
//! | `GET`   | `/Users`      | `?filter`, `?startIndex` (1-based), `?count` |
//! | `GET`   | `/Users/{id}` | 404 if not found |
//! | `POST`  | `/Users`      | Body: [`ScimUser`]; returns 201 + `Location` |
//! | `PUT`   | `/Users/{id}` | Body: [`ScimUser`]; full replace, emails reconciled by value |
//! | `PATCH` | `/Users/{id}` | Body: [`PatchRequest`]; only `active` is applied |

use axum::{
  Json,
  extract::State,
  http::{StatusCode, header},
  response::IntoResponse,
};
use scimlet_core::{
  store::UserStore,
  user::NewUser,
};

use crate::{
  ApiState,
  error::ApiError,
  extract::{ScimJson, ScimQuery, UserId},
  patch,
  query::{ListParams, ListQuery},
  wire::{LIST_RESPONSE_SCHEMA, ListResponse, PatchRequest, ScimUser},
};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /Users[?filter=...][&startIndex=...][&count=...]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  ScimQuery(params): ScimQuery<ListParams>,
) -> Result<Json<ListResponse<ScimUser>>, ApiError>
where
  S: UserStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let query = ListQuery::from(params);

  let users = state
    .store
    .list_users(&query.filter)
    .await
    .map_err(ApiError::from_store)?;

  let page = query.paginate(users);
  tracing::debug!(
    filter = ?query.filter.user_name,
    total = page.total_results,
    returned = page.resources.len(),
    "listed users"
  );

  Ok(Json(ListResponse {
    schemas:        [LIST_RESPONSE_SCHEMA],
    total_results:  page.total_results,
    start_index:    query.start_index,
    items_per_page: query.count,
    resources:      page.resources.iter().map(ScimUser::from).collect(),
  }))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /Users/{id}`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  UserId(id): UserId,
) -> Result<Json<ScimUser>, ApiError>
where
  S: UserStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let user = state
    .store
    .get_user(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(ApiError::NotFound)?;
  Ok(Json(ScimUser::from(&user)))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /Users` — returns 201, a `Location` header, and the stored user.
///
/// Any client-supplied `id` is ignored; the store assigns one.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  ScimJson(body): ScimJson<ScimUser>,
) -> Result<impl IntoResponse, ApiError>
where
  S: UserStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let user = state
    .store
    .create_user(NewUser::from(body))
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(id = user.id, user_name = %user.user_name, "created user");

  Ok((
    StatusCode::CREATED,
    [(header::LOCATION, state.location(user.id))],
    Json(ScimUser::from(&user)),
  ))
}

// ─── Replace ──────────────────────────────────────────────────────────────────

/// `PUT /Users/{id}` — overwrite every attribute of an existing user.
pub async fn replace<S>(
  State(state): State<ApiState<S>>,
  UserId(id): UserId,
  ScimJson(body): ScimJson<ScimUser>,
) -> Result<Json<ScimUser>, ApiError>
where
  S: UserStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let user = state
    .store
    .replace_user(id, NewUser::from(body))
    .await
    .map_err(ApiError::from_store)?
    .ok_or(ApiError::NotFound)?;

  tracing::info!(id, emails = user.emails.len(), "replaced user");
  Ok(Json(ScimUser::from(&user)))
}

// ─── Patch ────────────────────────────────────────────────────────────────────

/// `PATCH /Users/{id}` — body: `{"Operations":[{"op":"replace","value":{"active":false}}]}`.
///
/// Each recognised operation writes only the attribute it names, so changes
/// committed by other requests since the read are preserved.
pub async fn patch<S>(
  State(state): State<ApiState<S>>,
  UserId(id): UserId,
  ScimJson(body): ScimJson<PatchRequest>,
) -> Result<Json<ScimUser>, ApiError>
where
  S: UserStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut user = state
    .store
    .get_user(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(ApiError::NotFound)?;

  let patches = patch::interpret(&body.operations)?;

  for change in patches {
    user = change
      .commit(state.store.as_ref(), id)
      .await
      .map_err(ApiError::from_store)?
      .ok_or(ApiError::NotFound)?;
    tracing::info!(id, ?change, "patched user");
  }

  Ok(Json(ScimUser::from(&user)))
}
