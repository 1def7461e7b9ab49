//! Participant registry for Tally.
//!
//! Binds each [`Identity`](tally_types::Identity) to a display name exactly
//! once and keeps the registered identities in first-registration order.
//!
//! - [`Registry`] trait defining the storage interface
//! - [`InMemoryRegistry`] implementation for tests and embedding
//! - Name validation helpers

pub mod error;
pub mod memory;
pub mod names;
pub mod person;
pub mod traits;

pub use error::{RegistryError, Result};
pub use memory::InMemoryRegistry;
pub use names::validate_name;
pub use person::Person;
pub use traits::Registry;
