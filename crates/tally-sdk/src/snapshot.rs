use serde::{Deserialize, Serialize};
use tally_ledger::Expense;
use tally_registry::Person;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Portable copy of a Tally's stores.
///
/// People are listed in registration order and expenses in id order, so
/// restoring replays both stores exactly.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallySnapshot {
    pub version: u32,
    pub people: Vec<Person>,
    pub expenses: Vec<Expense>,
}

impl TallySnapshot {
    pub fn new(people: Vec<Person>, expenses: Vec<Expense>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            people,
            expenses,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}
