//! Party names and admin codes.
//!
//! Names are `<adjective>-<color>-<animal>` slugs. They are not unique by
//! construction; [`crate::PartyService::create_party`] retries until the
//! store accepts one. Both generators draw from the operating system's
//! CSPRNG.

use rand::{Rng, distributions::Alphanumeric, rngs::OsRng};

/// Length of the admin code handed out at party creation.
pub const ADMIN_SECRET_LEN: usize = 32;

const ADJECTIVES: &[&str] = &[
  "agile", "bold", "brave", "breezy", "bright", "bubbly", "calm", "cheerful",
  "clever", "cosy", "curious", "daring", "dizzy", "eager", "fancy", "fearless",
  "fluffy", "friendly", "fuzzy", "gentle", "giddy", "glad", "graceful",
  "happy", "jolly", "keen", "kind", "lively", "lucky", "mellow", "merry",
  "mighty", "nimble", "peppy", "plucky", "proud", "quick", "quiet", "quirky",
  "rowdy", "shiny", "silly", "sleepy", "snappy", "sparkly", "speedy", "sunny",
  "swift", "witty", "zesty",
];

const COLORS: &[&str] = &[
  "amber", "aqua", "azure", "beige", "black", "blue", "bronze", "brown",
  "coral", "crimson", "cyan", "gold", "gray", "green", "indigo", "ivory",
  "jade", "lavender", "lemon", "lilac", "lime", "magenta", "maroon", "mint",
  "navy", "olive", "orange", "peach", "pink", "plum", "purple", "red", "rose",
  "ruby", "salmon", "scarlet", "silver", "tan", "teal", "violet", "white",
  "yellow",
];

const ANIMALS: &[&str] = &[
  "alpaca", "badger", "beaver", "bison", "camel", "capybara", "cheetah",
  "chipmunk", "cobra", "crane", "dingo", "dolphin", "donkey", "eagle", "ferret",
  "finch", "flamingo", "fox", "gecko", "gerbil", "giraffe", "goose", "hamster",
  "hedgehog", "heron", "hippo", "ibis", "iguana", "jackal", "koala", "lemur",
  "lynx", "meerkat", "mole", "moose", "narwhal", "newt", "ocelot", "octopus",
  "otter", "owl", "panda", "parrot", "pelican", "penguin", "puffin", "quokka",
  "rabbit", "raccoon", "seal", "sloth", "squid", "tapir", "tiger", "toucan",
  "turtle", "walrus", "wombat", "yak", "zebra",
];

fn pick(words: &'static [&'static str]) -> &'static str {
  words[OsRng.gen_range(0..words.len())]
}

/// A fresh `<adjective>-<color>-<animal>` name, e.g. `plucky-teal-otter`.
pub fn generate_party_name() -> String {
  format!("{}-{}-{}", pick(ADJECTIVES), pick(COLORS), pick(ANIMALS))
}

/// `len` characters drawn uniformly from `[A-Za-z0-9]`.
pub fn generate_admin_secret(len: usize) -> String {
  OsRng
    .sample_iter(&Alphanumeric)
    .take(len)
    .map(char::from)
    .collect()
}

/// Where [`crate::PartyService`] gets new names and admin codes from.
pub trait IdentitySource: Send + Sync {
  fn party_name(&self) -> String;
  fn admin_secret(&self, len: usize) -> String;
}

/// The production [`IdentitySource`], backed by [`OsRng`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OsIdentity;

impl IdentitySource for OsIdentity {
  fn party_name(&self) -> String { generate_party_name() }

  fn admin_secret(&self, len: usize) -> String { generate_admin_secret(len) }
}
