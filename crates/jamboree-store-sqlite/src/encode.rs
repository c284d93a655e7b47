//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Option payloads are stored
//! as a `kind` discriminant plus a text `value`. Booleans use SQLite's
//! integer affinity.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use jamboree_core::{
  party::{KindSettings, Party, PartySettings},
  proposal::{OptionKind, OptionPayload, PartyOption, Vote},
  supply::Supply,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Options ─────────────────────────────────────────────────────────────────

pub fn encode_option_kind(kind: OptionKind) -> &'static str { kind.into() }

pub fn decode_option_kind(s: &str) -> Result<OptionKind> {
  OptionKind::from_str(s).map_err(|_| Error::UnknownOptionKind(s.to_owned()))
}

pub fn encode_option_value(payload: &OptionPayload) -> String {
  match payload {
    OptionPayload::Date(dt) => encode_dt(*dt),
    OptionPayload::Location(text) | OptionPayload::Playlist(text) => text.clone(),
  }
}

pub fn decode_option_payload(kind: OptionKind, value: String) -> Result<OptionPayload> {
  Ok(match kind {
    OptionKind::Date => OptionPayload::Date(decode_dt(&value)?),
    OptionKind::Location => OptionPayload::Location(value),
    OptionKind::Playlist => OptionPayload::Playlist(value),
  })
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const PARTY_COLUMNS: &str = "name, admin_secret, creator,
  date_options_enabled, date_voting_enabled,
  location_options_enabled, location_voting_enabled,
  playlist_options_enabled, playlist_voting_enabled,
  created_at";

/// Raw values read directly from a `parties` row.
pub struct RawParty {
  pub name:                     String,
  pub admin_secret:             String,
  pub creator:                  String,
  pub date_options_enabled:     bool,
  pub date_voting_enabled:      bool,
  pub location_options_enabled: bool,
  pub location_voting_enabled:  bool,
  pub playlist_options_enabled: bool,
  pub playlist_voting_enabled:  bool,
  pub created_at:               String,
}

impl RawParty {
  /// Map a row selected with [`PARTY_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      name:                     row.get(0)?,
      admin_secret:             row.get(1)?,
      creator:                  row.get(2)?,
      date_options_enabled:     row.get(3)?,
      date_voting_enabled:      row.get(4)?,
      location_options_enabled: row.get(5)?,
      location_voting_enabled:  row.get(6)?,
      playlist_options_enabled: row.get(7)?,
      playlist_voting_enabled:  row.get(8)?,
      created_at:               row.get(9)?,
    })
  }

  pub fn into_party(self) -> Result<Party> {
    Ok(Party {
      name:         self.name,
      admin_secret: self.admin_secret,
      creator:      self.creator,
      settings:     PartySettings {
        dates:     KindSettings {
          options_enabled: self.date_options_enabled,
          voting_enabled:  self.date_voting_enabled,
        },
        locations: KindSettings {
          options_enabled: self.location_options_enabled,
          voting_enabled:  self.location_voting_enabled,
        },
        playlists: KindSettings {
          options_enabled: self.playlist_options_enabled,
          voting_enabled:  self.playlist_voting_enabled,
        },
      },
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

pub const OPTION_COLUMNS: &str = "id, party_name, kind, value, created_at";

/// Raw values read directly from an `options` row.
pub struct RawOption {
  pub id:         i64,
  pub party_name: String,
  pub kind:       String,
  pub value:      String,
  pub created_at: String,
}

impl RawOption {
  /// Map a row selected with [`OPTION_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      party_name: row.get(1)?,
      kind:       row.get(2)?,
      value:      row.get(3)?,
      created_at: row.get(4)?,
    })
  }

  pub fn into_option(self) -> Result<PartyOption> {
    let kind = decode_option_kind(&self.kind)?;
    Ok(PartyOption {
      id:         self.id,
      party_name: self.party_name,
      payload:    decode_option_payload(kind, self.value)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub const VOTE_COLUMNS: &str = "id, option_id, username, created_at";

/// Raw values read directly from a `votes` row.
pub struct RawVote {
  pub id:         i64,
  pub option_id:  i64,
  pub username:   String,
  pub created_at: String,
}

impl RawVote {
  /// Map a row selected with [`VOTE_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      option_id:  row.get(1)?,
      username:   row.get(2)?,
      created_at: row.get(3)?,
    })
  }

  pub fn into_vote(self) -> Result<Vote> {
    Ok(Vote {
      id:         self.id,
      option_id:  self.option_id,
      username:   self.username,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub const SUPPLY_COLUMNS: &str =
  "id, party_name, name, quantity, assignee, is_urgent, emoji, created_at";

/// Raw values read directly from a `supplies` row.
pub struct RawSupply {
  pub id:         i64,
  pub party_name: String,
  pub name:       String,
  pub quantity:   i32,
  pub assignee:   String,
  pub is_urgent:  bool,
  pub emoji:      String,
  pub created_at: String,
}

impl RawSupply {
  /// Map a row selected with [`SUPPLY_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      party_name: row.get(1)?,
      name:       row.get(2)?,
      quantity:   row.get(3)?,
      assignee:   row.get(4)?,
      is_urgent:  row.get(5)?,
      emoji:      row.get(6)?,
      created_at: row.get(7)?,
    })
  }

  pub fn into_supply(self) -> Result<Supply> {
    Ok(Supply {
      id:         self.id,
      party_name: self.party_name,
      name:       self.name,
      quantity:   self.quantity,
      assignee:   self.assignee,
      is_urgent:  self.is_urgent,
      emoji:      self.emoji,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
