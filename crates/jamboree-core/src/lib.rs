//! Core types, rules and trait definitions for Jamboree party planning.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! gating rules for options, votes and party settings live here; storage
//! backends implement [`store::PartyStore`] and call back into those rules
//! from inside their own transactions.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod naming;
pub mod party;
pub mod proposal;
pub mod service;
pub mod store;
pub mod supply;

pub use error::{Error, ErrorKind, Result};
pub use service::PartyService;
