use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tally_types::{Amount, Balance, Clock, Identity, SystemClock};
use tracing::debug;

use crate::balance::{BalanceCalculator, RunningBalances};
use crate::error::LedgerError;
use crate::records::{Expense, ExpenseId, ExpenseInfo, NewExpense};
use crate::traits::{LedgerReader, LedgerWriter};
use crate::validation::{validate_new_expense, validate_record};

/// In-memory expense ledger for tests, local tools, and embedding.
///
/// Records are kept in a `Vec` indexed by id. When balance caching is on, a
/// [`RunningBalances`] is updated under the same write lock as the append, so
/// readers never see one without the other.
pub struct InMemoryLedger {
    clock: Arc<dyn Clock>,
    inner: RwLock<LedgerState>,
}

#[derive(Default)]
struct LedgerState {
    expenses: Vec<Expense>,
    balances: Option<RunningBalances>,
}

impl InMemoryLedger {
    /// Create an empty ledger that stamps expenses with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            inner: RwLock::new(LedgerState::default()),
        }
    }

    /// Maintain per-identity running totals so `net_balance` is O(1).
    pub fn with_cached_balances(self, enabled: bool) -> Self {
        {
            let mut state = self.write();
            let rebuilt = enabled.then(|| RunningBalances::from_expenses(&state.expenses));
            state.balances = rebuilt;
        }
        self
    }

    pub fn caches_balances(&self) -> bool {
        self.read().balances.is_some()
    }

    /// Append a previously stored record, keeping its id and timestamp.
    ///
    /// Used when restoring a ledger. The record must carry the next id and
    /// satisfy the same rules as a new expense.
    pub fn import(&self, expense: Expense) -> Result<(), LedgerError> {
        let mut state = self.write();
        validate_record(&expense, state.expenses.len() as u64)?;

        if let Some(balances) = state.balances.as_mut() {
            balances.apply(&expense);
        }
        debug!(id = expense.id, "expense imported");
        state.expenses.push(expense);
        Ok(())
    }

    /// Check that cached balances agree with a full recomputation.
    ///
    /// Returns `true` when caching is off.
    pub fn verify_cached_balances(&self) -> bool {
        let state = self.read();
        match &state.balances {
            None => true,
            Some(cached) => *cached == RunningBalances::from_expenses(&state.expenses),
        }
    }

    // Appends validate before mutating, so a poisoned lock still guards a
    // consistent ledger.
    fn read(&self) -> RwLockReadGuard<'_, LedgerState> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, LedgerState> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_expense<T>(
        &self,
        id: ExpenseId,
        f: impl FnOnce(&Expense) -> T,
    ) -> Result<T, LedgerError> {
        let state = self.read();
        let count = state.expenses.len() as u64;
        usize::try_from(id)
            .ok()
            .and_then(|index| state.expenses.get(index))
            .map(f)
            .ok_or(LedgerError::IdOutOfBounds { id, count })
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl LedgerWriter for InMemoryLedger {
    fn add_expense(&self, input: &NewExpense) -> Result<Expense, LedgerError> {
        validate_new_expense(input)?;

        let mut state = self.write();
        let id = state.expenses.len() as u64;
        let expense = Expense::from_new(id, self.clock.now(), input);

        if let Some(balances) = state.balances.as_mut() {
            balances.apply(&expense);
        }
        state.expenses.push(expense.clone());

        debug!(id, participants = expense.participants.len(), "expense appended");
        Ok(expense)
    }
}

impl LedgerReader for InMemoryLedger {
    fn count(&self) -> u64 {
        self.read().expenses.len() as u64
    }

    fn expense(&self, id: ExpenseId) -> Result<Expense, LedgerError> {
        self.with_expense(id, Expense::clone)
    }

    fn basic_info(&self, id: ExpenseId) -> Result<ExpenseInfo, LedgerError> {
        self.with_expense(id, Expense::info)
    }

    fn participants(&self, id: ExpenseId) -> Result<Vec<Identity>, LedgerError> {
        self.with_expense(id, |e| e.participants.clone())
    }

    fn amount_paid(&self, id: ExpenseId, identity: &Identity) -> Result<Amount, LedgerError> {
        self.with_expense(id, |e| e.paid_by(identity))
    }

    fn amount_owed(&self, id: ExpenseId, identity: &Identity) -> Result<Amount, LedgerError> {
        self.with_expense(id, |e| e.owed_by(identity))
    }

    fn last_label(&self) -> Result<String, LedgerError> {
        self.read()
            .expenses
            .last()
            .map(|e| e.label.clone())
            .ok_or(LedgerError::NoExpenses)
    }

    fn expenses(&self) -> Vec<Expense> {
        self.read().expenses.clone()
    }

    fn for_each_expense(&self, visit: &mut dyn FnMut(&Expense)) {
        let state = self.read();
        for expense in &state.expenses {
            visit(expense);
        }
    }

    fn net_balance(&self, identity: &Identity) -> Balance {
        {
            let state = self.read();
            if let Some(balances) = &state.balances {
                return balances.get(identity);
            }
        }
        BalanceCalculator::net_balance(self, identity)
    }
}
