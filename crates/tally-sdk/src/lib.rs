//! High-level SDK for Tally.
//!
//! [`Tally`] is the main entry point for applications embedding the shared
//! expense ledger: it owns the participant registry, the expense ledger and
//! the notification bus, and serializes every mutating call across them.

pub mod config;
pub mod error;
pub mod settlement;
pub mod snapshot;
pub mod tally;

pub use config::{ConfigError, TallyConfig};
pub use error::{ErrorKind, TallyError, TallyResult};
pub use settlement::Settlement;
pub use snapshot::TallySnapshot;
pub use tally::Tally;

// Re-export key types
pub use tally_events::{EventFilter, EventRecord, EventStream, Notification, NotificationKind};
pub use tally_ledger::{
    AuditReport, BalanceSheet, Expense, ExpenseId, ExpenseInfo, Finding, FindingKind, NewExpense,
};
pub use tally_registry::Person;
pub use tally_types::{Amount, Balance, Clock, Identity, ManualClock, SystemClock, Timestamp};
