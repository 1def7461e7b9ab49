//! Foundation types for Tally, the shared expense ledger.
//!
//! Every other Tally crate depends on `tally-types`.
//!
//! # Key Types
//!
//! - [`Identity`]: Address-like participant identity (20 bytes, zero is null)
//! - [`Amount`] / [`Balance`]: Smallest-unit money values (unsigned / signed)
//! - [`Timestamp`]: Second-level wall-clock time
//! - [`Clock`]: Source of timestamps supplied by the environment

pub mod amount;
pub mod error;
pub mod identity;
pub mod temporal;

pub use amount::{Amount, Balance};
pub use error::TypeError;
pub use identity::Identity;
pub use temporal::{Clock, ManualClock, SystemClock, Timestamp};
