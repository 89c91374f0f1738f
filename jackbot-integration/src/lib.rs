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

//! # Jackbot-Integration
//! Low-level building blocks shared by Jackbot crates that compute over normalised market data.
//!
//! ## Core abstractions:
//! - [`Validator`] for types that must prove their internal state is usable before being handed
//!   to a computation.
//! - [`NoneOneOrTwo`](collection::none_one_or_two::NoneOneOrTwo) for computations whose output
//!   per input is statically bounded.

/// Small, statically bounded collections.
pub mod collection;

/// [`Validator`]s are capable of determining if their internal state is satisfactory to fulfill
/// some use case defined by the implementor.
pub trait Validator {
    type Error;

    /// Check if `Self` is valid for some use case.
    fn validate(self) -> Result<Self, Self::Error>
    where
        Self: Sized;
}
