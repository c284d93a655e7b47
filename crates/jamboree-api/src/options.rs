//! Handlers for date, location and playlist options and their votes.
//!
//! `{kind}` is one of `dates`, `locations` or `playlists`.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/parties/{name}/{kind}` | Options of one kind, oldest first |
//! | `POST`   | `/parties/{name}/{kind}` | Body: [`OptionBody`]; gated by party settings |
//! | `GET`    | `/{kind}/{id}` | 404 if absent or of another kind |
//! | `PATCH`  | `/{kind}/{id}` | Body: [`OptionBody`]; empty body is a no-op |
//! | `DELETE` | `/{kind}/{id}` | Also removes the option's votes |
//! | `GET`    | `/{kind}/{id}/votes` | |
//! | `POST`   | `/{kind}/{id}/votes` | Body: `{"username":"ana"}`; 201 + vote or 200 + `null` |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use jamboree_core::{
  proposal::{OptionKind, OptionPatch, OptionPayload, PartyOption, Vote, parse_unix_timestamp},
  store::PartyStore,
};
use serde::Deserialize;

use crate::{
  Service,
  admin::AdminCode,
  error::{ApiError, JsonBody},
};

fn parse_kind(collection: &str) -> Result<OptionKind, ApiError> {
  OptionKind::from_collection(collection)
    .ok_or_else(|| ApiError::BadRequest(format!("unknown option collection: {collection}")))
}

// ─── Body ─────────────────────────────────────────────────────────────────────

/// The value of an option. Only the field matching the collection is read:
/// `date` (unix seconds, as a string) for dates, `location` for locations,
/// `link` for playlists.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionBody {
  pub date:     Option<String>,
  pub location: Option<String>,
  pub link:     Option<String>,
}

impl OptionBody {
  /// The payload for `kind`, or `None` if the matching field is absent.
  fn payload(self, kind: OptionKind) -> Result<Option<OptionPayload>, ApiError> {
    Ok(match kind {
      OptionKind::Date => match self.date {
        Some(raw) => Some(OptionPayload::Date(parse_unix_timestamp(&raw)?)),
        None => None,
      },
      OptionKind::Location => self.location.map(OptionPayload::Location),
      OptionKind::Playlist => self.link.map(OptionPayload::Playlist),
    })
  }

  fn require_payload(self, kind: OptionKind) -> Result<OptionPayload, ApiError> {
    let field = match kind {
      OptionKind::Date => "date",
      OptionKind::Location => "location",
      OptionKind::Playlist => "link",
    };
    self
      .payload(kind)?
      .ok_or_else(|| ApiError::BadRequest(format!("missing field `{field}`")))
  }
}

// ─── Collection ───────────────────────────────────────────────────────────────

/// `GET /parties/{name}/{kind}`
pub async fn list<S: PartyStore>(
  State(service): State<Service<S>>,
  Path((name, collection)): Path<(String, String)>,
) -> Result<Json<Vec<PartyOption>>, ApiError> {
  let kind = parse_kind(&collection)?;
  Ok(Json(service.list_options(&name, kind).await?))
}

/// `POST /parties/{name}/{kind}`
pub async fn create<S: PartyStore>(
  State(service): State<Service<S>>,
  Path((name, collection)): Path<(String, String)>,
  admin: AdminCode,
  JsonBody(body): JsonBody<OptionBody>,
) -> Result<impl IntoResponse, ApiError> {
  let kind = parse_kind(&collection)?;
  let payload = body.require_payload(kind)?;
  let option = service.add_option(&name, admin.as_deref(), payload).await?;
  Ok((StatusCode::CREATED, Json(option)))
}

// ─── Single option ────────────────────────────────────────────────────────────

/// `GET /{kind}/{id}`
pub async fn get_one<S: PartyStore>(
  State(service): State<Service<S>>,
  Path((collection, id)): Path<(String, i64)>,
) -> Result<Json<PartyOption>, ApiError> {
  let kind = parse_kind(&collection)?;
  Ok(Json(service.get_option(kind, id).await?))
}

/// `PATCH /{kind}/{id}`
pub async fn edit<S: PartyStore>(
  State(service): State<Service<S>>,
  Path((collection, id)): Path<(String, i64)>,
  JsonBody(body): JsonBody<OptionBody>,
) -> Result<Json<PartyOption>, ApiError> {
  let kind = parse_kind(&collection)?;
  let patch = OptionPatch { payload: body.payload(kind)? };
  Ok(Json(service.edit_option(kind, id, patch).await?))
}

/// `DELETE /{kind}/{id}`
pub async fn delete_one<S: PartyStore>(
  State(service): State<Service<S>>,
  Path((collection, id)): Path<(String, i64)>,
) -> Result<StatusCode, ApiError> {
  let kind = parse_kind(&collection)?;
  service.delete_option(kind, id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Votes ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct VoteBody {
  pub username: String,
}

/// `GET /{kind}/{id}/votes`
pub async fn list_votes<S: PartyStore>(
  State(service): State<Service<S>>,
  Path((collection, id)): Path<(String, i64)>,
) -> Result<Json<Vec<Vote>>, ApiError> {
  let kind = parse_kind(&collection)?;
  Ok(Json(service.list_votes(kind, id).await?))
}

/// `POST /{kind}/{id}/votes`
pub async fn toggle_vote<S: PartyStore>(
  State(service): State<Service<S>>,
  Path((collection, id)): Path<(String, i64)>,
  JsonBody(body): JsonBody<VoteBody>,
) -> Result<(StatusCode, Json<Option<Vote>>), ApiError> {
  let kind = parse_kind(&collection)?;
  let vote = service.toggle_vote(kind, id, &body.username).await?;
  let status = if vote.is_some() { StatusCode::CREATED } else { StatusCode::OK };
  Ok((status, Json(vote)))
}
