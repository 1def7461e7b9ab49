//! Error types for registry operations.

use tally_types::Identity;
use thiserror::Error;

/// Errors that can occur during registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The supplied name is empty or only whitespace.
    #[error("name must not be empty")]
    EmptyName,

    /// The identity already has a person record.
    #[error("identity already registered: {identity}")]
    AlreadyRegistered { identity: Identity },

    /// The identity has no person record.
    #[error("identity not registered: {identity}")]
    NotRegistered { identity: Identity },
}

/// Convenience type alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
