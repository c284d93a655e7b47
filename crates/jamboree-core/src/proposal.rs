//! Options proposed for a party (dates, locations, playlists) and the votes
//! cast on them.
//!
//! All three kinds share one shape: an option belongs to a party, carries a
//! kind-specific payload, and collects at most one vote per username.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{Error, Result};

// ─── Kind ────────────────────────────────────────────────────────────────────

/// Which collection an option belongs to.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OptionKind {
  Date,
  Location,
  Playlist,
}

impl OptionKind {
  /// The plural collection name used in URLs, e.g. `dates`.
  pub fn collection(self) -> &'static str {
    match self {
      Self::Date => "dates",
      Self::Location => "locations",
      Self::Playlist => "playlists",
    }
  }

  /// Inverse of [`OptionKind::collection`].
  pub fn from_collection(s: &str) -> Option<Self> {
    match s {
      "dates" => Some(Self::Date),
      "locations" => Some(Self::Location),
      "playlists" => Some(Self::Playlist),
      _ => None,
    }
  }
}

// ─── Payload ─────────────────────────────────────────────────────────────────

/// The proposed value. The variant determines the option's kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum OptionPayload {
  Date(DateTime<Utc>),
  /// Free-text place description.
  Location(String),
  /// Link to a song playlist.
  Playlist(String),
}

impl OptionPayload {
  pub fn kind(&self) -> OptionKind {
    match self {
      Self::Date(_) => OptionKind::Date,
      Self::Location(_) => OptionKind::Location,
      Self::Playlist(_) => OptionKind::Playlist,
    }
  }
}

/// Parse a date option given as whole seconds since the unix epoch.
pub fn parse_unix_timestamp(raw: &str) -> Result<DateTime<Utc>> {
  let secs: i64 = raw.trim().parse().map_err(|_| {
    Error::InvalidArgument(format!("date must be unix seconds, got {raw:?}"))
  })?;
  DateTime::from_timestamp(secs, 0)
    .ok_or_else(|| Error::InvalidArgument(format!("date out of range: {secs}")))
}

// ─── Option ──────────────────────────────────────────────────────────────────

/// A persisted proposal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyOption {
  pub id:         i64,
  pub party_name: String,
  pub payload:    OptionPayload,
  pub created_at: DateTime<Utc>,
}

impl PartyOption {
  pub fn kind(&self) -> OptionKind { self.payload.kind() }
}

/// Partial update for an option. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptionPatch {
  pub payload: Option<OptionPayload>,
}

impl OptionPatch {
  /// Apply to `option`, refusing to change its kind.
  pub fn apply(self, option: &mut PartyOption) -> Result<()> {
    if let Some(payload) = self.payload {
      if payload.kind() != option.kind() {
        return Err(Error::InvalidArgument(format!(
          "cannot store a {} value in {} option {}",
          payload.kind(),
          option.kind(),
          option.id
        )));
      }
      option.payload = payload;
    }
    Ok(())
  }
}

// ─── Vote ────────────────────────────────────────────────────────────────────

/// One user's vote on one option. At most one exists per (option, username).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
  pub id:         i64,
  pub option_id:  i64,
  pub username:   String,
  pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use strum::IntoEnumIterator;

  use super::*;

  fn location(id: i64, place: &str) -> PartyOption {
    PartyOption {
      id,
      party_name: "quiet-teal-otter".into(),
      payload: OptionPayload::Location(place.into()),
      created_at: Utc::now(),
    }
  }

  #[test]
  fn kind_names_round_trip_through_strum_and_collections() {
    for kind in OptionKind::iter() {
      assert_eq!(OptionKind::from_str(&kind.to_string()).unwrap(), kind);
      assert_eq!(OptionKind::from_collection(kind.collection()), Some(kind));
    }
    assert_eq!(OptionKind::from_collection("supplies"), None);
  }

  #[test]
  fn parses_unix_seconds() {
    let dt = parse_unix_timestamp("1700000000").unwrap();
    assert_eq!(dt.timestamp(), 1_700_000_000);
    assert_eq!(parse_unix_timestamp(" 0 ").unwrap().timestamp(), 0);
  }

  #[test]
  fn malformed_timestamp_is_invalid_argument() {
    for raw in ["", "tomorrow", "12.5", "99999999999999999999"] {
      assert!(
        matches!(parse_unix_timestamp(raw), Err(Error::InvalidArgument(_))),
        "{raw:?} should be rejected"
      );
    }
  }

  #[test]
  fn out_of_range_timestamp_is_invalid_argument() {
    let raw = i64::MAX.to_string();
    assert!(matches!(
      parse_unix_timestamp(&raw),
      Err(Error::InvalidArgument(_))
    ));
  }

  #[test]
  fn empty_patch_leaves_option_untouched() {
    let mut opt = location(1, "The Barn");
    OptionPatch::default().apply(&mut opt).unwrap();
    assert_eq!(opt.payload, OptionPayload::Location("The Barn".into()));
  }

  #[test]
  fn patch_replaces_payload_of_same_kind() {
    let mut opt = location(1, "The Barn");
    OptionPatch { payload: Some(OptionPayload::Location("Rooftop".into())) }
      .apply(&mut opt)
      .unwrap();
    assert_eq!(opt.payload, OptionPayload::Location("Rooftop".into()));
  }

  #[test]
  fn patch_refuses_kind_change() {
    let mut opt = location(1, "The Barn");
    let err = OptionPatch {
      payload: Some(OptionPayload::Playlist("https://example.com/p".into())),
    }
    .apply(&mut opt)
    .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert_eq!(opt.kind(), OptionKind::Location);
  }

  #[test]
  fn payload_serialises_with_kind_tag() {
    let json =
      serde_json::to_value(OptionPayload::Playlist("https://x.test".into()))
        .unwrap();
    assert_eq!(json, serde_json::json!({ "kind": "playlist", "value": "https://x.test" }));
  }
}
