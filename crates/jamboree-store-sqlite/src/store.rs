//! [`SqliteStore`] — the SQLite implementation of [`PartyStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension as _, TransactionBehavior};

use jamboree_core::{
  party::{NewParty, Party, PartySettings, SettingsPatch},
  proposal::{OptionKind, OptionPatch, OptionPayload, PartyOption, Vote},
  store::PartyStore,
  supply::{NewSupply, Supply, SupplyPatch},
};

use crate::{
  Result,
  encode::{
    OPTION_COLUMNS, PARTY_COLUMNS, RawOption, RawParty, RawSupply, RawVote,
    SUPPLY_COLUMNS, VOTE_COLUMNS, encode_dt, encode_option_kind,
    encode_option_value,
  },
  schema::SCHEMA,
};

type CoreError = jamboree_core::Error;

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Jamboree store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    tracing::debug!("sqlite schema ready");
    Ok(())
  }
}

// ─── Row lookups shared by reads and transactions ────────────────────────────

fn query_party(conn: &Connection, name: &str) -> rusqlite::Result<Option<RawParty>> {
  conn
    .query_row(
      &format!("SELECT {PARTY_COLUMNS} FROM parties WHERE name = ?1"),
      rusqlite::params![name],
      RawParty::from_row,
    )
    .optional()
}

fn query_option(
  conn: &Connection,
  kind: OptionKind,
  id: i64,
) -> rusqlite::Result<Option<RawOption>> {
  conn
    .query_row(
      &format!("SELECT {OPTION_COLUMNS} FROM options WHERE id = ?1 AND kind = ?2"),
      rusqlite::params![id, encode_option_kind(kind)],
      RawOption::from_row,
    )
    .optional()
}

fn query_supply(conn: &Connection, id: i64) -> rusqlite::Result<Option<RawSupply>> {
  conn
    .query_row(
      &format!("SELECT {SUPPLY_COLUMNS} FROM supplies WHERE id = ?1"),
      rusqlite::params![id],
      RawSupply::from_row,
    )
    .optional()
}

fn load_party(conn: &Connection, name: &str) -> Result<Party> {
  query_party(conn, name)?
    .ok_or_else(|| CoreError::PartyNotFound(name.to_owned()))?
    .into_party()
}

fn require_option(conn: &Connection, kind: OptionKind, id: i64) -> Result<RawOption> {
  Ok(query_option(conn, kind, id)?.ok_or(CoreError::OptionNotFound { kind, id })?)
}

// ─── Transactions ────────────────────────────────────────────────────────────
//
// Each function below runs one read-decide-write sequence. Returning early
// drops the transaction, which rolls it back.

fn update_settings_tx(
  conn: &mut Connection,
  name: &str,
  caller_secret: Option<&str>,
  patch: SettingsPatch,
) -> Result<Party> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
  let mut party = load_party(&tx, name)?;
  party.authorize_admin(caller_secret)?;
  patch.apply(&mut party.settings);

  let s = party.settings;
  tx.execute(
    "UPDATE parties SET
       date_options_enabled     = ?2,
       date_voting_enabled      = ?3,
       location_options_enabled = ?4,
       location_voting_enabled  = ?5,
       playlist_options_enabled = ?6,
       playlist_voting_enabled  = ?7
     WHERE name = ?1",
    rusqlite::params![
      name,
      s.dates.options_enabled,
      s.dates.voting_enabled,
      s.locations.options_enabled,
      s.locations.voting_enabled,
      s.playlists.options_enabled,
      s.playlists.voting_enabled,
    ],
  )?;
  tx.commit()?;
  Ok(party)
}

fn insert_option_tx(
  conn: &mut Connection,
  party_name: String,
  caller_secret: Option<&str>,
  payload: OptionPayload,
) -> Result<PartyOption> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
  let party = load_party(&tx, &party_name)?;
  let kind = payload.kind();

  let existing: i64 = tx.query_row(
    "SELECT COUNT(*) FROM options WHERE party_name = ?1 AND kind = ?2",
    rusqlite::params![party_name, encode_option_kind(kind)],
    |row| row.get(0),
  )?;
  party.check_add_option(kind, existing as usize, caller_secret)?;

  let created_at = Utc::now();
  tx.execute(
    "INSERT INTO options (party_name, kind, value, created_at) VALUES (?1, ?2, ?3, ?4)",
    rusqlite::params![
      party_name,
      encode_option_kind(kind),
      encode_option_value(&payload),
      encode_dt(created_at),
    ],
  )?;
  let id = tx.last_insert_rowid();
  tx.commit()?;

  Ok(PartyOption { id, party_name, payload, created_at })
}

fn update_option_tx(
  conn: &mut Connection,
  kind: OptionKind,
  id: i64,
  patch: OptionPatch,
) -> Result<PartyOption> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
  let mut option = require_option(&tx, kind, id)?.into_option()?;
  patch.apply(&mut option)?;

  tx.execute(
    "UPDATE options SET value = ?2 WHERE id = ?1",
    rusqlite::params![id, encode_option_value(&option.payload)],
  )?;
  tx.commit()?;
  Ok(option)
}

fn toggle_vote_tx(
  conn: &mut Connection,
  kind: OptionKind,
  option_id: i64,
  username: String,
) -> Result<Option<Vote>> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
  require_option(&tx, kind, option_id)?;

  let existing: Option<i64> = tx
    .query_row(
      "SELECT id FROM votes WHERE option_id = ?1 AND username = ?2",
      rusqlite::params![option_id, username],
      |row| row.get(0),
    )
    .optional()?;

  let vote = match existing {
    Some(vote_id) => {
      tx.execute("DELETE FROM votes WHERE id = ?1", rusqlite::params![vote_id])?;
      None
    }
    None => {
      let created_at = Utc::now();
      tx.execute(
        "INSERT INTO votes (option_id, username, created_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![option_id, username, encode_dt(created_at)],
      )?;
      Some(Vote { id: tx.last_insert_rowid(), option_id, username, created_at })
    }
  };

  tx.commit()?;
  Ok(vote)
}

fn insert_supply_tx(
  conn: &mut Connection,
  party_name: String,
  input: NewSupply,
) -> Result<Supply> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
  load_party(&tx, &party_name)?;

  let supply = Supply {
    id: 0,
    party_name,
    name: input.name,
    quantity: input.quantity.unwrap_or(1),
    assignee: input.assignee.unwrap_or_default(),
    is_urgent: input.is_urgent,
    emoji: input.emoji,
    created_at: Utc::now(),
  };

  tx.execute(
    "INSERT INTO supplies (party_name, name, quantity, assignee, is_urgent, emoji, created_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    rusqlite::params![
      supply.party_name,
      supply.name,
      supply.quantity,
      supply.assignee,
      supply.is_urgent,
      supply.emoji,
      encode_dt(supply.created_at),
    ],
  )?;
  let id = tx.last_insert_rowid();
  tx.commit()?;

  Ok(Supply { id, ..supply })
}

fn update_supply_tx(conn: &mut Connection, id: i64, patch: SupplyPatch) -> Result<Supply> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
  let mut supply = query_supply(&tx, id)?
    .ok_or(CoreError::SupplyNotFound(id))?
    .into_supply()?;
  patch.apply(&mut supply);

  tx.execute(
    "UPDATE supplies SET name = ?2, quantity = ?3, assignee = ?4, is_urgent = ?5, emoji = ?6
     WHERE id = ?1",
    rusqlite::params![
      id,
      supply.name,
      supply.quantity,
      supply.assignee,
      supply.is_urgent,
      supply.emoji,
    ],
  )?;
  tx.commit()?;
  Ok(supply)
}

// ─── PartyStore impl ─────────────────────────────────────────────────────────

impl PartyStore for SqliteStore {
  type Error = crate::Error;

  // ── Parties ───────────────────────────────────────────────────────────────

  async fn insert_party(&self, input: NewParty) -> Result<Option<Party>> {
    let party = Party {
      name:         input.name,
      admin_secret: input.admin_secret,
      creator:      input.creator,
      settings:     PartySettings::default(),
      created_at:   Utc::now(),
    };

    let name_str    = party.name.clone();
    let secret_str  = party.admin_secret.clone();
    let creator_str = party.creator.clone();
    let at_str      = encode_dt(party.created_at);

    let inserted = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "INSERT INTO parties (name, admin_secret, creator, created_at)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (name) DO NOTHING",
          rusqlite::params![name_str, secret_str, creator_str, at_str],
        )?;
        Ok(changed == 1)
      })
      .await?;

    Ok(inserted.then_some(party))
  }

  async fn get_party(&self, name: &str) -> Result<Option<Party>> {
    let name_str = name.to_owned();
    let raw = self
      .conn
      .call(move |conn| Ok(query_party(conn, &name_str)?))
      .await?;
    raw.map(RawParty::into_party).transpose()
  }

  async fn find_party_by_secret(&self, secret: &str) -> Result<Option<Party>> {
    let secret_str = secret.to_owned();
    let raw: Option<RawParty> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PARTY_COLUMNS} FROM parties WHERE admin_secret = ?1"),
              rusqlite::params![secret_str],
              RawParty::from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawParty::into_party).transpose()
  }

  async fn update_party_settings(
    &self,
    name: String,
    caller_secret: Option<String>,
    patch: SettingsPatch,
  ) -> Result<Party> {
    self
      .conn
      .call(move |conn| {
        Ok(update_settings_tx(conn, &name, caller_secret.as_deref(), patch))
      })
      .await?
  }

  // ── Options ───────────────────────────────────────────────────────────────

  async fn insert_option(
    &self,
    party_name: String,
    caller_secret: Option<String>,
    payload: OptionPayload,
  ) -> Result<PartyOption> {
    self
      .conn
      .call(move |conn| {
        Ok(insert_option_tx(conn, party_name, caller_secret.as_deref(), payload))
      })
      .await?
  }

  async fn get_option(&self, kind: OptionKind, id: i64) -> Result<Option<PartyOption>> {
    let raw = self
      .conn
      .call(move |conn| Ok(query_option(conn, kind, id)?))
      .await?;
    raw.map(RawOption::into_option).transpose()
  }

  async fn list_options(
    &self,
    party_name: &str,
    kind: OptionKind,
  ) -> Result<Vec<PartyOption>> {
    let party_str = party_name.to_owned();
    let raws: Vec<RawOption> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {OPTION_COLUMNS} FROM options
           WHERE party_name = ?1 AND kind = ?2
           ORDER BY id ASC"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![party_str, encode_option_kind(kind)],
            RawOption::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawOption::into_option).collect()
  }

  async fn update_option(
    &self,
    kind: OptionKind,
    id: i64,
    patch: OptionPatch,
  ) -> Result<PartyOption> {
    self
      .conn
      .call(move |conn| Ok(update_option_tx(conn, kind, id, patch)))
      .await?
  }

  async fn delete_option(&self, kind: OptionKind, id: i64) -> Result<()> {
    let deleted = self
      .conn
      .call(move |conn| {
        // Votes go with it via ON DELETE CASCADE.
        Ok(conn.execute(
          "DELETE FROM options WHERE id = ?1 AND kind = ?2",
          rusqlite::params![id, encode_option_kind(kind)],
        )?)
      })
      .await?;

    if deleted == 0 {
      return Err(CoreError::OptionNotFound { kind, id }.into());
    }
    Ok(())
  }

  // ── Votes ─────────────────────────────────────────────────────────────────

  async fn toggle_vote(
    &self,
    kind: OptionKind,
    option_id: i64,
    username: String,
  ) -> Result<Option<Vote>> {
    self
      .conn
      .call(move |conn| Ok(toggle_vote_tx(conn, kind, option_id, username)))
      .await?
  }

  async fn list_votes(&self, kind: OptionKind, option_id: i64) -> Result<Vec<Vote>> {
    let raws: Option<Vec<RawVote>> = self
      .conn
      .call(move |conn| {
        if query_option(conn, kind, option_id)?.is_none() {
          return Ok(None);
        }
        let mut stmt = conn.prepare(&format!(
          "SELECT {VOTE_COLUMNS} FROM votes WHERE option_id = ?1 ORDER BY id ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![option_id], RawVote::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(Some(rows))
      })
      .await?;

    raws
      .ok_or(CoreError::OptionNotFound { kind, id: option_id })?
      .into_iter()
      .map(RawVote::into_vote)
      .collect()
  }

  // ── Supplies ──────────────────────────────────────────────────────────────

  async fn insert_supply(&self, party_name: String, input: NewSupply) -> Result<Supply> {
    self
      .conn
      .call(move |conn| Ok(insert_supply_tx(conn, party_name, input)))
      .await?
  }

  async fn get_supply(&self, id: i64) -> Result<Option<Supply>> {
    let raw = self
      .conn
      .call(move |conn| Ok(query_supply(conn, id)?))
      .await?;
    raw.map(RawSupply::into_supply).transpose()
  }

  async fn list_supplies(&self, party_name: &str) -> Result<Vec<Supply>> {
    let party_str = party_name.to_owned();
    let raws: Vec<RawSupply> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SUPPLY_COLUMNS} FROM supplies WHERE party_name = ?1 ORDER BY id ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![party_str], RawSupply::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSupply::into_supply).collect()
  }

  async fn update_supply(&self, id: i64, patch: SupplyPatch) -> Result<Supply> {
    self
      .conn
      .call(move |conn| Ok(update_supply_tx(conn, id, patch)))
      .await?
  }

  async fn delete_supply(&self, id: i64) -> Result<()> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM supplies WHERE id = ?1", rusqlite::params![id])?)
      })
      .await?;

    if deleted == 0 {
      return Err(CoreError::SupplyNotFound(id).into());
    }
    Ok(())
  }
}
