use tally_types::{Amount, Balance, Identity};

use crate::balance::BalanceCalculator;
use crate::error::LedgerError;
use crate::records::{Expense, ExpenseId, ExpenseInfo, NewExpense};

/// Write boundary for ledger append operations.
pub trait LedgerWriter: Send + Sync {
    /// Validate and append a new expense, stamping it with the ledger's clock.
    ///
    /// On failure nothing is stored and the count is unchanged.
    fn add_expense(&self, input: &NewExpense) -> Result<Expense, LedgerError>;
}

/// Read boundary for ledger queries.
pub trait LedgerReader: Send + Sync {
    /// Number of stored expenses, which is also the next id.
    fn count(&self) -> u64;

    fn expense(&self, id: ExpenseId) -> Result<Expense, LedgerError>;

    fn basic_info(&self, id: ExpenseId) -> Result<ExpenseInfo, LedgerError>;

    fn participants(&self, id: ExpenseId) -> Result<Vec<Identity>, LedgerError>;

    /// Zero for identities absent from the expense.
    fn amount_paid(&self, id: ExpenseId, identity: &Identity) -> Result<Amount, LedgerError>;

    /// Zero for identities absent from the expense.
    fn amount_owed(&self, id: ExpenseId, identity: &Identity) -> Result<Amount, LedgerError>;

    fn last_label(&self) -> Result<String, LedgerError>;

    /// All expenses in id order.
    fn expenses(&self) -> Vec<Expense>;

    /// Visit every expense in id order against one consistent view.
    fn for_each_expense(&self, visit: &mut dyn FnMut(&Expense));

    /// Net balance of `identity` across the whole ledger. Never fails.
    fn net_balance(&self, identity: &Identity) -> Balance {
        BalanceCalculator::net_balance(self, identity)
    }
}
