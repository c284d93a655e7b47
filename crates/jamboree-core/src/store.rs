//! The `PartyStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `jamboree-store-sqlite`).
//! [`crate::PartyService`] depends on this abstraction, not on any concrete
//! backend.
//!
//! Operations that read state, decide, and then write (settings updates,
//! option insertion, vote toggling, supply edits) are single trait methods so
//! a backend can run the whole sequence atomically. Backends apply the rules
//! by calling [`Party::authorize_admin`], [`Party::check_add_option`] and
//! [`OptionPatch::apply`] from inside that atomic section.

use std::future::Future;

use crate::{
  party::{NewParty, Party, SettingsPatch},
  proposal::{OptionKind, OptionPatch, OptionPayload, PartyOption, Vote},
  supply::{NewSupply, Supply, SupplyPatch},
};

/// Abstraction over a Jamboree record store.
///
/// Domain failures (missing rows, gating denials) travel inside `Self::Error`
/// and must come back out unchanged through the `Into<crate::Error>`
/// conversion.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait PartyStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + Into<crate::Error> + 'static;

  // ── Parties ───────────────────────────────────────────────────────────

  /// Insert a party with every toggle off.
  ///
  /// Returns `None` without writing if `input.name` is already taken.
  fn insert_party(
    &self,
    input: NewParty,
  ) -> impl Future<Output = Result<Option<Party>, Self::Error>> + Send + '_;

  /// Retrieve a party by name. Returns `None` if not found.
  fn get_party<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<Party>, Self::Error>> + Send + 'a;

  /// Retrieve the party whose admin code is `secret`.
  fn find_party_by_secret<'a>(
    &'a self,
    secret: &'a str,
  ) -> impl Future<Output = Result<Option<Party>, Self::Error>> + Send + 'a;

  /// Atomically check `caller_secret` against the party and apply `patch`.
  fn update_party_settings(
    &self,
    name: String,
    caller_secret: Option<String>,
    patch: SettingsPatch,
  ) -> impl Future<Output = Result<Party, Self::Error>> + Send + '_;

  // ── Options ───────────────────────────────────────────────────────────

  /// Atomically count the party's options of the payload's kind, run
  /// [`Party::check_add_option`], and insert.
  fn insert_option(
    &self,
    party_name: String,
    caller_secret: Option<String>,
    payload: OptionPayload,
  ) -> impl Future<Output = Result<PartyOption, Self::Error>> + Send + '_;

  /// Retrieve an option of `kind` by id. Returns `None` if not found or if
  /// the id belongs to another kind.
  fn get_option(
    &self,
    kind: OptionKind,
    id: i64,
  ) -> impl Future<Output = Result<Option<PartyOption>, Self::Error>> + Send + '_;

  /// All options of `kind` for a party, oldest first.
  fn list_options<'a>(
    &'a self,
    party_name: &'a str,
    kind: OptionKind,
  ) -> impl Future<Output = Result<Vec<PartyOption>, Self::Error>> + Send + 'a;

  fn update_option(
    &self,
    kind: OptionKind,
    id: i64,
    patch: OptionPatch,
  ) -> impl Future<Output = Result<PartyOption, Self::Error>> + Send + '_;

  /// Delete an option together with its votes.
  fn delete_option(
    &self,
    kind: OptionKind,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Votes ─────────────────────────────────────────────────────────────

  /// Atomically insert the `(option, username)` vote if absent, or delete it
  /// if present. Returns the new vote, or `None` when one was removed.
  fn toggle_vote(
    &self,
    kind: OptionKind,
    option_id: i64,
    username: String,
  ) -> impl Future<Output = Result<Option<Vote>, Self::Error>> + Send + '_;

  /// All votes on an option, oldest first.
  fn list_votes(
    &self,
    kind: OptionKind,
    option_id: i64,
  ) -> impl Future<Output = Result<Vec<Vote>, Self::Error>> + Send + '_;

  // ── Supplies ──────────────────────────────────────────────────────────

  /// Insert a supply. A `None` quantity stores 1 and a `None` assignee
  /// stores an empty string.
  fn insert_supply(
    &self,
    party_name: String,
    input: NewSupply,
  ) -> impl Future<Output = Result<Supply, Self::Error>> + Send + '_;

  fn get_supply(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Supply>, Self::Error>> + Send + '_;

  /// All supplies for a party, oldest first.
  fn list_supplies<'a>(
    &'a self,
    party_name: &'a str,
  ) -> impl Future<Output = Result<Vec<Supply>, Self::Error>> + Send + 'a;

  /// Apply a patch that has already passed [`SupplyPatch::validate`].
  fn update_supply(
    &self,
    id: i64,
    patch: SupplyPatch,
  ) -> impl Future<Output = Result<Supply, Self::Error>> + Send + '_;

  fn delete_supply(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
