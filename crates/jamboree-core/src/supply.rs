//! Supplies: things a party needs, with an optional assignee.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A persisted supply item. `quantity` is always at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supply {
  pub id:         i64,
  pub party_name: String,
  pub name:       String,
  pub quantity:   i32,
  /// Free-text username; empty when nobody has claimed the item.
  pub assignee:   String,
  pub is_urgent:  bool,
  pub emoji:      String,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::PartyService::add_supply`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewSupply {
  pub name:      String,
  /// Defaults to 1.
  pub quantity:  Option<i32>,
  /// Defaults to unassigned.
  pub assignee:  Option<String>,
  #[serde(default)]
  pub is_urgent: bool,
  #[serde(default)]
  pub emoji:     String,
}

/// Partial update for a [`Supply`]. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SupplyPatch {
  pub name:      Option<String>,
  pub quantity:  Option<i32>,
  pub assignee:  Option<String>,
  pub is_urgent: Option<bool>,
  pub emoji:     Option<String>,
}

/// Quantities below 1 are rejected.
pub fn validate_quantity(quantity: i32) -> Result<()> {
  if quantity <= 0 {
    return Err(Error::InvalidArgument(format!(
      "supply quantity must be at least 1, got {quantity}"
    )));
  }
  Ok(())
}

impl SupplyPatch {
  pub fn validate(&self) -> Result<()> {
    self.quantity.map(validate_quantity).transpose()?;
    Ok(())
  }

  pub fn apply(self, supply: &mut Supply) {
    if let Some(name) = self.name {
      supply.name = name;
    }
    if let Some(quantity) = self.quantity {
      supply.quantity = quantity;
    }
    if let Some(assignee) = self.assignee {
      supply.assignee = assignee;
    }
    if let Some(is_urgent) = self.is_urgent {
      supply.is_urgent = is_urgent;
    }
    if let Some(emoji) = self.emoji {
      supply.emoji = emoji;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ice() -> Supply {
    Supply {
      id:         1,
      party_name: "lucky-coral-fox".into(),
      name:       "Ice".into(),
      quantity:   2,
      assignee:   String::new(),
      is_urgent:  false,
      emoji:      "🧊".into(),
      created_at: Utc::now(),
    }
  }

  #[test]
  fn quantity_below_one_is_rejected() {
    for q in [0, -1, -50, i32::MIN] {
      assert!(matches!(validate_quantity(q), Err(Error::InvalidArgument(_))));
    }
  }

  #[test]
  fn quantity_of_one_or_more_is_accepted() {
    for q in [1, 2, 99, i32::MAX] {
      assert!(validate_quantity(q).is_ok());
    }
  }

  #[test]
  fn patch_without_quantity_always_validates() {
    let patch = SupplyPatch { name: Some("Cups".into()), ..Default::default() };
    assert!(patch.validate().is_ok());
  }

  #[test]
  fn patch_applies_only_supplied_fields() {
    let mut supply = ice();
    SupplyPatch {
      quantity: Some(5),
      is_urgent: Some(true),
      ..Default::default()
    }
    .apply(&mut supply);

    assert_eq!(supply.quantity, 5);
    assert!(supply.is_urgent);
    assert_eq!(supply.name, "Ice");
    assert_eq!(supply.emoji, "🧊");
    assert_eq!(supply.assignee, "");
  }
}
