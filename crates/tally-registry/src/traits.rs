//! The [`Registry`] trait defining the participant storage interface.

use tally_types::Identity;

use crate::error::Result;
use crate::person::Person;

/// Storage backend for participant records.
///
/// Implementations must be thread-safe (`Send + Sync`). Each mutating call is
/// all-or-nothing: a rejected call leaves the registry exactly as it was.
pub trait Registry: Send + Sync {
    /// Create the person record for `identity`.
    ///
    /// Fails with `EmptyName` for a blank name and `AlreadyRegistered` if the
    /// identity already has a record. Names are stored trimmed.
    fn register(&self, identity: Identity, name: &str) -> Result<Person>;

    /// Overwrite the display name of a registered identity.
    ///
    /// Fails with `NotRegistered` before checking the name.
    fn update_name(&self, identity: &Identity, new_name: &str) -> Result<Person>;

    /// Look up an identity. Never fails: unknown identities yield
    /// [`Person::unregistered`].
    fn lookup(&self, identity: &Identity) -> Person;

    /// Number of successful registrations to date.
    fn count(&self) -> u64;

    /// Registered identities in first-registration order.
    fn enumerate(&self) -> Vec<Identity>;

    fn is_registered(&self, identity: &Identity) -> bool {
        self.lookup(identity).is_registered
    }

    /// Full person records in registration order.
    fn people(&self) -> Vec<Person> {
        self.enumerate().iter().map(|id| self.lookup(id)).collect()
    }
}
