//! Error types for `jamboree-core`.

use thiserror::Error;

use crate::proposal::OptionKind;

#[derive(Debug, Error)]
pub enum Error {
  #[error("party not found: {0}")]
  PartyNotFound(String),

  #[error("{kind} option not found: {id}")]
  OptionNotFound { kind: OptionKind, id: i64 },

  #[error("supply not found: {0}")]
  SupplyNotFound(i64),

  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  #[error("no free party name after {0} attempts")]
  NameSpaceExhausted(usize),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Coarse classification of [`Error`], used by transports to pick a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  NotFound,
  Forbidden,
  InvalidArgument,
  Internal,
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::PartyNotFound(_)
      | Self::OptionNotFound { .. }
      | Self::SupplyNotFound(_) => ErrorKind::NotFound,
      Self::Forbidden(_) => ErrorKind::Forbidden,
      Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
      Self::NameSpaceExhausted(_) | Self::Store(_) => ErrorKind::Internal,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn not_found_variants_share_a_kind() {
    assert_eq!(Error::PartyNotFound("x".into()).kind(), ErrorKind::NotFound);
    assert_eq!(
      Error::OptionNotFound { kind: OptionKind::Date, id: 4 }.kind(),
      ErrorKind::NotFound
    );
    assert_eq!(Error::SupplyNotFound(1).kind(), ErrorKind::NotFound);
  }

  #[test]
  fn option_not_found_message_names_the_kind() {
    let e = Error::OptionNotFound { kind: OptionKind::Playlist, id: 7 };
    assert_eq!(e.to_string(), "playlist option not found: 7");
  }

  #[test]
  fn exhausted_names_are_internal() {
    assert_eq!(Error::NameSpaceExhausted(64).kind(), ErrorKind::Internal);
  }
}
