use std::collections::BTreeMap;

use tally_types::{Balance, Identity};

use crate::records::Expense;
use crate::traits::LedgerReader;

/// Net balance of every identity that appears in the ledger, built in one
/// pass over the records.
///
/// Each entry equals what `net_balance` returns for that identity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BalanceSheet {
    pub expense_count: u64,
    balances: BTreeMap<Identity, Balance>,
}

impl BalanceSheet {
    pub fn build<R: LedgerReader + ?Sized>(reader: &R) -> Self {
        let mut sheet = Self::default();
        reader.for_each_expense(&mut |expense: &Expense| sheet.fold(expense));
        sheet
    }

    pub fn from_expenses(expenses: &[Expense]) -> Self {
        let mut sheet = Self::default();
        for expense in expenses {
            sheet.fold(expense);
        }
        sheet
    }

    fn fold(&mut self, expense: &Expense) {
        for identity in expense.identities() {
            *self.balances.entry(identity).or_insert(0) += expense.net_for(&identity);
        }
        self.expense_count += 1;
    }

    pub fn balance_of(&self, identity: &Identity) -> Balance {
        self.balances.get(identity).copied().unwrap_or(0)
    }

    /// Sum over all identities. Zero when every expense was balanced.
    pub fn total(&self) -> Balance {
        self.balances.values().sum()
    }

    /// Identities ordered by identity value.
    pub fn iter(&self) -> impl Iterator<Item = (&Identity, &Balance)> {
        self.balances.iter()
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Identities owed money, largest claim first.
    pub fn creditors(&self) -> Vec<(Identity, Balance)> {
        let mut out: Vec<_> = self
            .balances
            .iter()
            .filter(|(_, &b)| b > 0)
            .map(|(id, &b)| (*id, b))
            .collect();
        out.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        out
    }

    /// Identities owing money, largest debt first.
    pub fn debtors(&self) -> Vec<(Identity, Balance)> {
        let mut out: Vec<_> = self
            .balances
            .iter()
            .filter(|(_, &b)| b < 0)
            .map(|(id, &b)| (*id, b))
            .collect();
        out.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));
        out
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use tally_types::identity::IDENTITY_LEN;

    use super::*;
    use crate::memory::InMemoryLedger;
    use crate::records::NewExpense;
    use crate::traits::LedgerWriter;

    fn id(seed: u8) -> Identity {
        Identity::from_raw([seed; IDENTITY_LEN])
    }

    #[test]
    fn empty_ledger_has_empty_sheet() {
        let ledger = InMemoryLedger::default();
        let sheet = BalanceSheet::build(&ledger);
        assert!(sheet.is_empty());
        assert_eq!(sheet.total(), 0);
        assert_eq!(sheet.expense_count, 0);
    }

    #[test]
    fn sheet_orders_creditors_and_debtors() {
        let ledger = InMemoryLedger::default();
        ledger
            .add_expense(&NewExpense::new(
                "trip",
                vec![id(1), id(2), id(3)],
                vec![90, 30, 0],
                vec![40, 40, 40],
            ))
            .unwrap();

        let sheet = BalanceSheet::build(&ledger);
        assert_eq!(sheet.len(), 3);
        assert_eq!(sheet.total(), 0);
        assert_eq!(sheet.creditors(), vec![(id(1), 50)]);
        assert_eq!(sheet.debtors(), vec![(id(3), -40), (id(2), -10)]);
    }

    #[test]
    fn unbalanced_expense_shows_in_total() {
        let ledger = InMemoryLedger::default();
        ledger
            .add_expense(&NewExpense::new("gift", vec![id(1), id(2)], vec![100, 0], vec![0, 0]))
            .unwrap();
        let sheet = BalanceSheet::build(&ledger);
        assert_eq!(sheet.total(), 100);
        assert_eq!(sheet.balance_of(&id(2)), 0);
    }

    proptest! {
        #[test]
        fn sheet_matches_per_identity_queries(
            shares in prop::collection::vec(
                prop::collection::vec((1u8..5, 0u64..500, 0u64..500), 1..4),
                0..12,
            )
        ) {
            let ledger = InMemoryLedger::default();
            for expense in &shares {
                let input = expense.iter().fold(NewExpense::labelled("e"), |acc, &(s, p, o)| {
                    acc.share(id(s), p, o)
                });
                ledger.add_expense(&input).unwrap();
            }

            let sheet = BalanceSheet::build(&ledger);
            prop_assert_eq!(sheet.expense_count, ledger.count());
            for seed in 0u8..6 {
                prop_assert_eq!(sheet.balance_of(&id(seed)), ledger.net_balance(&id(seed)));
            }
        }
    }
}
