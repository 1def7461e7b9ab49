//! Append-only expense ledger for Tally.
//!
//! This crate is the heart of Tally. It provides:
//! - Immutable [`Expense`] records with per-participant paid/owed amounts
//! - `LedgerWriter` / `LedgerReader` trait boundaries
//! - `InMemoryLedger` implementation for tests and embedding
//! - The balance calculator and an optional running-total cache
//! - Projections (balance sheet) and ledger audits

pub mod audit;
pub mod balance;
pub mod error;
pub mod memory;
pub mod projection;
pub mod records;
pub mod traits;
pub mod validation;

pub use audit::{AuditReport, Finding, FindingKind, LedgerAuditor};
pub use balance::{BalanceCalculator, RunningBalances};
pub use error::LedgerError;
pub use memory::InMemoryLedger;
pub use projection::BalanceSheet;
pub use records::{Expense, ExpenseId, ExpenseInfo, NewExpense};
pub use traits::{LedgerReader, LedgerWriter};
pub use validation::{validate_new_expense, validate_record};
