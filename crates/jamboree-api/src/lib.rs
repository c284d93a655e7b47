//! JSON REST API for Jamboree.
//!
//! Exposes an axum [`Router`] backed by a [`PartyService`] over any
//! [`PartyStore`]. TLS and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", jamboree_api::api_router(service.clone()))
//! ```

pub mod admin;
pub mod error;
pub mod options;
pub mod parties;
pub mod supplies;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, patch, post},
};
use jamboree_core::{PartyService, store::PartyStore};

pub use admin::AdminCode;
pub use error::ApiError;

/// Shared handler state.
pub type Service<S> = Arc<PartyService<S>>;

/// Build a fully-materialised API router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(service: Service<S>) -> Router<()>
where
  S: PartyStore + 'static,
{
  Router::new()
    // Parties
    .route("/parties", post(parties::create::<S>))
    .route("/party", get(parties::lookup::<S>))
    .route("/parties/{name}", get(parties::get_one::<S>))
    .route("/parties/{name}/settings", patch(parties::update_settings::<S>))
    // Supplies
    .route(
      "/parties/{name}/supplies",
      get(supplies::list::<S>).post(supplies::create::<S>),
    )
    .route(
      "/supplies/{id}",
      get(supplies::get_one::<S>)
        .patch(supplies::edit::<S>)
        .delete(supplies::delete_one::<S>),
    )
    .route("/supplies/{id}/assign", post(supplies::assign::<S>))
    // Options and votes
    .route(
      "/parties/{name}/{kind}",
      get(options::list::<S>).post(options::create::<S>),
    )
    .route(
      "/{kind}/{id}",
      get(options::get_one::<S>)
        .patch(options::edit::<S>)
        .delete(options::delete_one::<S>),
    )
    .route(
      "/{kind}/{id}/votes",
      get(options::list_votes::<S>).post(options::toggle_vote::<S>),
    )
    .with_state(service)
}

#[cfg(test)]
mod tests;
