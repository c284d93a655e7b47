//! [`PartyService`] — the operations a transport exposes, expressed over any
//! [`PartyStore`].
//!
//! The caller's admin code is an explicit `Option<&str>` argument on every
//! operation that checks it; the service never looks it up from ambient
//! request state.

use tracing::{debug, info, warn};

use crate::{
  Error, ErrorKind, Result,
  naming::{ADMIN_SECRET_LEN, IdentitySource, OsIdentity},
  party::{CreatedParty, NewParty, Party, SettingsPatch},
  proposal::{OptionKind, OptionPatch, OptionPayload, PartyOption, Vote},
  store::PartyStore,
  supply::{NewSupply, Supply, SupplyPatch, validate_quantity},
};

/// How many generated names [`PartyService::create_party`] tries before
/// giving up.
pub const MAX_NAME_ATTEMPTS: usize = 64;

pub struct PartyService<S> {
  store:    S,
  identity: Box<dyn IdentitySource>,
}

fn store_err<E: Into<Error>>(e: E) -> Error { e.into() }

fn log_denial(e: &Error) {
  if e.kind() == ErrorKind::Forbidden {
    warn!("denied: {e}");
  }
}

impl<S: PartyStore> PartyService<S> {
  pub fn new(store: S) -> Self { Self::with_identity(store, OsIdentity) }

  pub fn with_identity(store: S, identity: impl IdentitySource + 'static) -> Self {
    Self { store, identity: Box::new(identity) }
  }

  // ── Parties ───────────────────────────────────────────────────────────

  /// Create a party owned by `creator`. The returned admin code is not
  /// available from any other operation.
  pub async fn create_party(&self, creator: &str) -> Result<CreatedParty> {
    let admin_code = self.identity.admin_secret(ADMIN_SECRET_LEN);

    for attempt in 1..=MAX_NAME_ATTEMPTS {
      let name = self.identity.party_name();
      let input = NewParty {
        name:         name.clone(),
        admin_secret: admin_code.clone(),
        creator:      creator.to_owned(),
      };

      match self.store.insert_party(input).await.map_err(store_err)? {
        Some(party) => {
          info!(party = %party.name, creator, "created party");
          return Ok(CreatedParty { name: party.name, admin_code });
        }
        None => debug!(%name, attempt, "party name taken, retrying"),
      }
    }

    Err(Error::NameSpaceExhausted(MAX_NAME_ATTEMPTS))
  }

  /// Find a party by exactly one of its name or its admin code.
  pub async fn lookup_party(
    &self,
    name: Option<&str>,
    admin_code: Option<&str>,
  ) -> Result<Party> {
    match (name, admin_code) {
      (Some(name), None) => self
        .store
        .get_party(name)
        .await
        .map_err(store_err)?
        .ok_or_else(|| Error::PartyNotFound(name.to_owned())),
      (None, Some(code)) => self
        .store
        .find_party_by_secret(code)
        .await
        .map_err(store_err)?
        .ok_or_else(|| Error::PartyNotFound("(by admin code)".to_owned())),
      _ => Err(Error::InvalidArgument(
        "exactly one of party name or admin code is required".to_owned(),
      )),
    }
  }

  pub async fn update_party_settings(
    &self,
    name: &str,
    caller_secret: Option<&str>,
    patch: SettingsPatch,
  ) -> Result<Party> {
    let party = self
      .store
      .update_party_settings(name.to_owned(), caller_secret.map(str::to_owned), patch)
      .await
      .map_err(store_err)
      .inspect_err(log_denial)?;
    info!(party = %party.name, settings = ?party.settings, "updated party settings");
    Ok(party)
  }

  async fn require_party(&self, name: &str) -> Result<()> {
    self
      .store
      .get_party(name)
      .await
      .map_err(store_err)?
      .ok_or_else(|| Error::PartyNotFound(name.to_owned()))?;
    Ok(())
  }

  // ── Options ───────────────────────────────────────────────────────────

  pub async fn add_option(
    &self,
    party_name: &str,
    caller_secret: Option<&str>,
    payload: OptionPayload,
  ) -> Result<PartyOption> {
    let option = self
      .store
      .insert_option(
        party_name.to_owned(),
        caller_secret.map(str::to_owned),
        payload,
      )
      .await
      .map_err(store_err)
      .inspect_err(log_denial)?;
    info!(party = party_name, kind = %option.kind(), id = option.id, "added option");
    Ok(option)
  }

  pub async fn get_option(&self, kind: OptionKind, id: i64) -> Result<PartyOption> {
    self
      .store
      .get_option(kind, id)
      .await
      .map_err(store_err)?
      .ok_or(Error::OptionNotFound { kind, id })
  }

  pub async fn list_options(
    &self,
    party_name: &str,
    kind: OptionKind,
  ) -> Result<Vec<PartyOption>> {
    self.require_party(party_name).await?;
    self.store.list_options(party_name, kind).await.map_err(store_err)
  }

  // TODO: edits carry no admin check; decide whether they should follow the
  // same rule as update_party_settings.
  pub async fn edit_option(
    &self,
    kind: OptionKind,
    id: i64,
    patch: OptionPatch,
  ) -> Result<PartyOption> {
    let option = self
      .store
      .update_option(kind, id, patch)
      .await
      .map_err(store_err)?;
    debug!(%kind, id, "edited option");
    Ok(option)
  }

  pub async fn delete_option(&self, kind: OptionKind, id: i64) -> Result<()> {
    self.store.delete_option(kind, id).await.map_err(store_err)?;
    info!(%kind, id, "deleted option");
    Ok(())
  }

  // ── Votes ─────────────────────────────────────────────────────────────

  /// Add `username`'s vote on the option, or take it back if already cast.
  pub async fn toggle_vote(
    &self,
    kind: OptionKind,
    option_id: i64,
    username: &str,
  ) -> Result<Option<Vote>> {
    let vote = self
      .store
      .toggle_vote(kind, option_id, username.to_owned())
      .await
      .map_err(store_err)?;
    info!(%kind, option_id, username, cast = vote.is_some(), "toggled vote");
    Ok(vote)
  }

  pub async fn list_votes(&self, kind: OptionKind, option_id: i64) -> Result<Vec<Vote>> {
    self.store.list_votes(kind, option_id).await.map_err(store_err)
  }

  // ── Supplies ──────────────────────────────────────────────────────────

  pub async fn add_supply(&self, party_name: &str, input: NewSupply) -> Result<Supply> {
    input.quantity.map(validate_quantity).transpose()?;
    let supply = self
      .store
      .insert_supply(party_name.to_owned(), input)
      .await
      .map_err(store_err)?;
    info!(party = party_name, id = supply.id, name = %supply.name, "added supply");
    Ok(supply)
  }

  pub async fn get_supply(&self, id: i64) -> Result<Supply> {
    self
      .store
      .get_supply(id)
      .await
      .map_err(store_err)?
      .ok_or(Error::SupplyNotFound(id))
  }

  pub async fn list_supplies(&self, party_name: &str) -> Result<Vec<Supply>> {
    self.require_party(party_name).await?;
    self.store.list_supplies(party_name).await.map_err(store_err)
  }

  pub async fn edit_supply(&self, id: i64, patch: SupplyPatch) -> Result<Supply> {
    patch.validate()?;
    let supply = self.store.update_supply(id, patch).await.map_err(store_err)?;
    debug!(id, "edited supply");
    Ok(supply)
  }

  /// Hand the supply to `username`, replacing any previous assignee.
  pub async fn assign_supply(&self, id: i64, username: &str) -> Result<Supply> {
    let patch = SupplyPatch { assignee: Some(username.to_owned()), ..Default::default() };
    let supply = self.store.update_supply(id, patch).await.map_err(store_err)?;
    info!(id, username, "assigned supply");
    Ok(supply)
  }

  pub async fn delete_supply(&self, id: i64) -> Result<()> {
    self.store.delete_supply(id).await.map_err(store_err)?;
    info!(id, "deleted supply");
    Ok(())
  }
}
