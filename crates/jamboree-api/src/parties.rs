//! Handlers for party endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `POST`  | `/parties` | Body: `{"username":"ana"}`; 201 + `{name, admin_code}` |
//! | `GET`   | `/party` | Exactly one of `?name=` or `?admin_code=` |
//! | `GET`   | `/parties/{name}` | 404 if not found |
//! | `PATCH` | `/parties/{name}/settings` | Requires `X-Admin-Code` |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use jamboree_core::{
  party::{Party, SettingsPatch},
  store::PartyStore,
};
use serde::Deserialize;

use crate::{
  Service,
  admin::AdminCode,
  error::{ApiError, JsonBody},
};

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub username: String,
}

/// `POST /parties`
pub async fn create<S: PartyStore>(
  State(service): State<Service<S>>,
  JsonBody(body): JsonBody<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let created = service.create_party(&body.username).await?;
  Ok((StatusCode::CREATED, Json(created)))
}

// ─── Lookup ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LookupParams {
  pub name:       Option<String>,
  pub admin_code: Option<String>,
}

/// `GET /party?name=<name>` or `GET /party?admin_code=<code>`
pub async fn lookup<S: PartyStore>(
  State(service): State<Service<S>>,
  Query(params): Query<LookupParams>,
) -> Result<Json<Party>, ApiError> {
  let party = service
    .lookup_party(params.name.as_deref(), params.admin_code.as_deref())
    .await?;
  Ok(Json(party))
}

/// `GET /parties/{name}`
pub async fn get_one<S: PartyStore>(
  State(service): State<Service<S>>,
  Path(name): Path<String>,
) -> Result<Json<Party>, ApiError> {
  Ok(Json(service.lookup_party(Some(&name), None).await?))
}

// ─── Settings ─────────────────────────────────────────────────────────────────

/// `PATCH /parties/{name}/settings`, body: any subset of the six toggles.
pub async fn update_settings<S: PartyStore>(
  State(service): State<Service<S>>,
  Path(name): Path<String>,
  admin: AdminCode,
  JsonBody(patch): JsonBody<SettingsPatch>,
) -> Result<Json<Party>, ApiError> {
  let party = service
    .update_party_settings(&name, admin.as_deref(), patch)
    .await?;
  Ok(Json(party))
}
