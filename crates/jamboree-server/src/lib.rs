//! HTTP server wiring for Jamboree: configuration loading and the top-level
//! router.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use jamboree_core::{PartyService, store::PartyStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

impl ServerConfig {
  /// Layer built-in defaults, the optional TOML file at `path`, and
  /// `JAMBOREE_*` environment variables, in that order.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "0.0.0.0")?
      .set_default("port", 5001)?
      .set_default("store_path", "jamboree.db")?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("JAMBOREE"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The API router with request tracing attached.
pub fn router<S>(service: Arc<PartyService<S>>) -> Router
where
  S: PartyStore + 'static,
{
  jamboree_api::api_router(service).layer(TraceLayer::new_for_http())
}
