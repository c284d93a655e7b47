//! Error type for `jamboree-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] jamboree_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown option kind: {0:?}")]
  UnknownOptionKind(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Domain failures pass through unchanged; everything else is opaque to
/// callers of the core.
impl From<Error> for jamboree_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(inner) => inner,
      other => jamboree_core::Error::Store(Box::new(other)),
    }
  }
}
