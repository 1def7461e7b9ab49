use serde::{Deserialize, Serialize};
use tally_types::Identity;

/// A registered participant.
///
/// `identity` never changes after creation and `is_registered` is never reset
/// once set. The name can be corrected through
/// [`Registry::update_name`](crate::Registry::update_name).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub identity: Identity,
    pub name: String,
    pub is_registered: bool,
}

impl Person {
    pub(crate) fn registered(identity: Identity, name: String) -> Self {
        Self {
            identity,
            name,
            is_registered: true,
        }
    }

    /// The record returned when looking up an identity that never registered.
    pub fn unregistered(identity: Identity) -> Self {
        Self {
            identity,
            name: String::new(),
            is_registered: false,
        }
    }
}
