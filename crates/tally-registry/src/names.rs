//! Display-name validation.

use crate::error::{RegistryError, Result};

/// Validate a display name and return its canonical (trimmed) form.
///
/// A name is valid when it contains at least one non-whitespace character.
pub fn validate_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(RegistryError::EmptyName);
    }
    Ok(trimmed)
}
