#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::cognitive_complexity,
    unused_crate_dependencies,
    unused_extern_crates,
    clippy::unused_self,
    clippy::useless_let_if_seq,
    missing_debug_implementations,
    rust_2018_idioms,
    rust_2024_compatibility
)]

//! # Jackbot-Instrument
//! Core identifiers shared by every Jackbot crate that handles normalised derivative market data.

/// Defines a global [`ExchangeId`](exchange::ExchangeId) enum covering every derivative venue
/// Jackbot normalises market data for.
pub mod exchange;
