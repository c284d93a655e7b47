//! Handlers for supply endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/parties/{name}/supplies` | Oldest first |
//! | `POST`   | `/parties/{name}/supplies` | Body: [`NewSupply`]; quantity defaults to 1 |
//! | `GET`    | `/supplies/{id}` | |
//! | `PATCH`  | `/supplies/{id}` | Body: [`SupplyPatch`] |
//! | `DELETE` | `/supplies/{id}` | |
//! | `POST`   | `/supplies/{id}/assign` | Body: `{"username":"ana"}` |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use jamboree_core::{
  store::PartyStore,
  supply::{NewSupply, Supply, SupplyPatch},
};
use serde::Deserialize;

use crate::{
  Service,
  error::{ApiError, JsonBody},
};

/// `GET /parties/{name}/supplies`
pub async fn list<S: PartyStore>(
  State(service): State<Service<S>>,
  Path(name): Path<String>,
) -> Result<Json<Vec<Supply>>, ApiError> {
  Ok(Json(service.list_supplies(&name).await?))
}

/// `POST /parties/{name}/supplies`
pub async fn create<S: PartyStore>(
  State(service): State<Service<S>>,
  Path(name): Path<String>,
  JsonBody(input): JsonBody<NewSupply>,
) -> Result<impl IntoResponse, ApiError> {
  let supply = service.add_supply(&name, input).await?;
  Ok((StatusCode::CREATED, Json(supply)))
}

/// `GET /supplies/{id}`
pub async fn get_one<S: PartyStore>(
  State(service): State<Service<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Supply>, ApiError> {
  Ok(Json(service.get_supply(id).await?))
}

/// `PATCH /supplies/{id}`
pub async fn edit<S: PartyStore>(
  State(service): State<Service<S>>,
  Path(id): Path<i64>,
  JsonBody(patch): JsonBody<SupplyPatch>,
) -> Result<Json<Supply>, ApiError> {
  Ok(Json(service.edit_supply(id, patch).await?))
}

/// `DELETE /supplies/{id}`
pub async fn delete_one<S: PartyStore>(
  State(service): State<Service<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
  service.delete_supply(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct AssignBody {
  pub username: String,
}

/// `POST /supplies/{id}/assign`
pub async fn assign<S: PartyStore>(
  State(service): State<Service<S>>,
  Path(id): Path<i64>,
  JsonBody(body): JsonBody<AssignBody>,
) -> Result<Json<Supply>, ApiError> {
  Ok(Json(service.assign_supply(id, &body.username).await?))
}
