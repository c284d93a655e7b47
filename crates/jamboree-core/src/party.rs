//! Parties: the root record that owns options and supplies, and the
//! admin/toggle rules that gate writes against it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, proposal::OptionKind};

// ─── Settings ────────────────────────────────────────────────────────────────

/// Toggles for one option kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindSettings {
  /// Non-admins may propose options of this kind.
  pub options_enabled: bool,
  /// More than one option of this kind may exist (i.e. there is a vote).
  pub voting_enabled:  bool,
}

/// All feature toggles for a party. Every toggle starts out `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartySettings {
  pub dates:     KindSettings,
  pub locations: KindSettings,
  /// Gated like dates and locations. Both toggles start off, so a second
  /// playlist is refused until voting is enabled.
  pub playlists: KindSettings,
}

impl PartySettings {
  pub fn for_kind(&self, kind: OptionKind) -> KindSettings {
    match kind {
      OptionKind::Date => self.dates,
      OptionKind::Location => self.locations,
      OptionKind::Playlist => self.playlists,
    }
  }
}

/// Partial update for [`PartySettings`]. Absent fields are left unchanged;
/// unknown fields are rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsPatch {
  pub date_options_enabled:     Option<bool>,
  pub date_voting_enabled:      Option<bool>,
  pub location_options_enabled: Option<bool>,
  pub location_voting_enabled:  Option<bool>,
  pub playlist_options_enabled: Option<bool>,
  pub playlist_voting_enabled:  Option<bool>,
}

impl SettingsPatch {
  pub fn apply(&self, settings: &mut PartySettings) {
    fn set(slot: &mut bool, value: Option<bool>) {
      if let Some(v) = value {
        *slot = v;
      }
    }
    set(&mut settings.dates.options_enabled, self.date_options_enabled);
    set(&mut settings.dates.voting_enabled, self.date_voting_enabled);
    set(&mut settings.locations.options_enabled, self.location_options_enabled);
    set(&mut settings.locations.voting_enabled, self.location_voting_enabled);
    set(&mut settings.playlists.options_enabled, self.playlist_options_enabled);
    set(&mut settings.playlists.voting_enabled, self.playlist_voting_enabled);
  }
}

// ─── Party ───────────────────────────────────────────────────────────────────

/// A party. `name` is its primary key and never changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Party {
  pub name:         String,
  /// Only handed out by [`crate::PartyService::create_party`]; never
  /// serialised.
  #[serde(skip_serializing, default)]
  pub admin_secret: String,
  pub creator:      String,
  pub settings:     PartySettings,
  pub created_at:   DateTime<Utc>,
}

impl Party {
  /// Whether `caller` presented this party's admin secret. A missing secret
  /// never matches.
  pub fn is_admin(&self, caller: Option<&str>) -> bool {
    caller.is_some_and(|c| !self.admin_secret.is_empty() && c == self.admin_secret)
  }

  pub fn authorize_admin(&self, caller: Option<&str>) -> Result<()> {
    if self.is_admin(caller) {
      Ok(())
    } else {
      Err(Error::Forbidden(format!(
        "admin code required to edit party {}",
        self.name
      )))
    }
  }

  /// Decide whether a new option of `kind` may be added, given how many
  /// options of that kind the party already has.
  ///
  /// The first option of a kind is allowed while voting is off, so an admin
  /// can seed a single default before opening a vote.
  pub fn check_add_option(
    &self,
    kind: OptionKind,
    existing: usize,
    caller: Option<&str>,
  ) -> Result<()> {
    let toggles = self.settings.for_kind(kind);
    if !toggles.voting_enabled && existing > 0 {
      return Err(Error::Forbidden(format!(
        "{kind} voting is not enabled for this party, please ask an admin to enable it"
      )));
    }
    if !toggles.options_enabled && !self.is_admin(caller) {
      return Err(Error::Forbidden(format!(
        "user {kind} options are not enabled for this party, please ask an admin to enable them"
      )));
    }
    Ok(())
  }
}

/// Input to [`crate::store::PartyStore::insert_party`].
#[derive(Debug, Clone)]
pub struct NewParty {
  pub name:         String,
  pub admin_secret: String,
  pub creator:      String,
}

/// Returned once, when a party is created. The only place the admin code
/// leaves the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedParty {
  pub name:       String,
  pub admin_code: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn party(settings: PartySettings) -> Party {
    Party {
      name: "brave-amber-heron".into(),
      admin_secret: "s3cret".into(),
      creator: "ana".into(),
      settings,
      created_at: Utc::now(),
    }
  }

  #[test]
  fn admin_check_requires_exact_secret() {
    let p = party(PartySettings::default());
    assert!(p.is_admin(Some("s3cret")));
    assert!(!p.is_admin(Some("S3CRET")));
    assert!(!p.is_admin(Some("")));
    assert!(!p.is_admin(None));
  }

  #[test]
  fn empty_stored_secret_matches_nobody() {
    let mut p = party(PartySettings::default());
    p.admin_secret.clear();
    assert!(!p.is_admin(Some("")));
  }

  #[test]
  fn authorize_admin_denies_on_mismatch() {
    let p = party(PartySettings::default());
    assert!(p.authorize_admin(Some("s3cret")).is_ok());
    assert!(matches!(p.authorize_admin(Some("x")), Err(Error::Forbidden(_))));
  }

  #[test]
  fn first_option_allowed_for_admin_while_voting_off() {
    let p = party(PartySettings::default());
    assert!(p.check_add_option(OptionKind::Date, 0, Some("s3cret")).is_ok());
  }

  #[test]
  fn second_option_denied_while_voting_off_even_for_admin() {
    let p = party(PartySettings::default());
    assert!(matches!(
      p.check_add_option(OptionKind::Date, 1, Some("s3cret")),
      Err(Error::Forbidden(_))
    ));
  }

  #[test]
  fn non_admin_needs_options_enabled() {
    let mut settings = PartySettings::default();
    settings.locations.voting_enabled = true;
    let p = party(settings);
    assert!(matches!(
      p.check_add_option(OptionKind::Location, 3, None),
      Err(Error::Forbidden(_))
    ));

    settings.locations.options_enabled = true;
    let p = party(settings);
    assert!(p.check_add_option(OptionKind::Location, 3, None).is_ok());
  }

  #[test]
  fn toggles_are_per_kind() {
    let mut settings = PartySettings::default();
    settings.dates = KindSettings { options_enabled: true, voting_enabled: true };
    let p = party(settings);
    assert!(p.check_add_option(OptionKind::Date, 5, None).is_ok());
    assert!(p.check_add_option(OptionKind::Playlist, 1, None).is_err());
  }

  #[test]
  fn settings_patch_only_touches_supplied_fields() {
    let mut settings = PartySettings::default();
    settings.locations.options_enabled = true;

    SettingsPatch { date_voting_enabled: Some(true), ..Default::default() }
      .apply(&mut settings);

    assert!(settings.dates.voting_enabled);
    assert!(!settings.dates.options_enabled);
    assert!(settings.locations.options_enabled);
    assert!(!settings.playlists.voting_enabled);
  }

  #[test]
  fn settings_patch_rejects_unknown_keys() {
    let err = serde_json::from_str::<SettingsPatch>(r#"{"dateVotingEnabled":true}"#)
      .unwrap_err();
    assert!(err.to_string().contains("dateVotingEnabled"));

    let patch: SettingsPatch = serde_json::from_str(r#"{"date_voting_enabled":true}"#).unwrap();
    assert_eq!(patch.date_voting_enabled, Some(true));
  }

  #[test]
  fn admin_secret_is_not_serialised() {
    let json = serde_json::to_value(party(PartySettings::default())).unwrap();
    assert!(json.get("admin_secret").is_none());
    assert_eq!(json["name"], "brave-amber-heron");
  }
}
