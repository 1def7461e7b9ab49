use std::collections::HashMap;

use tally_types::{Balance, Identity};

use crate::records::Expense;
use crate::traits::LedgerReader;

/// Stateless net-balance computation over a ledger.
///
/// Positive results are owed *to* the identity, negative results are owed
/// *by* it.
pub struct BalanceCalculator;

impl BalanceCalculator {
    /// Sum `paid - owed` for `identity` over every expense, from id 0 upward.
    pub fn net_balance<R: LedgerReader + ?Sized>(reader: &R, identity: &Identity) -> Balance {
        let mut sum: Balance = 0;
        reader.for_each_expense(&mut |expense: &Expense| sum += expense.net_for(identity));
        sum
    }

    /// Same computation over an explicit slice of records.
    pub fn net_balance_of(expenses: &[Expense], identity: &Identity) -> Balance {
        expenses.iter().map(|e| e.net_for(identity)).sum()
    }
}

/// Per-identity running totals maintained as expenses are appended.
///
/// Applying every expense of a ledger in order yields exactly what
/// [`BalanceCalculator::net_balance`] computes for each identity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunningBalances {
    totals: HashMap<Identity, Balance>,
    applied: u64,
}

impl RunningBalances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from scratch.
    pub fn from_expenses<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> Self {
        let mut balances = Self::new();
        for expense in expenses {
            balances.apply(expense);
        }
        balances
    }

    /// Fold one expense into the totals. Each distinct identity is counted
    /// once per expense, however often it is listed.
    pub fn apply(&mut self, expense: &Expense) {
        for identity in expense.identities() {
            *self.totals.entry(identity).or_insert(0) += expense.net_for(&identity);
        }
        self.applied += 1;
    }

    pub fn get(&self, identity: &Identity) -> Balance {
        self.totals.get(identity).copied().unwrap_or(0)
    }

    /// Number of expenses folded in so far.
    pub fn applied(&self) -> u64 {
        self.applied
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use tally_types::identity::IDENTITY_LEN;
    use tally_types::Timestamp;

    use super::*;
    use crate::records::NewExpense;

    fn id(seed: u8) -> Identity {
        Identity::from_raw([seed; IDENTITY_LEN])
    }

    fn expense(id_: u64, input: NewExpense) -> Expense {
        Expense::from_new(id_, Timestamp::default(), &input)
    }

    #[test]
    fn split_dinner_balances_to_zero() {
        let expenses = vec![expense(
            0,
            NewExpense::new("dinner", vec![id(1), id(2)], vec![100, 0], vec![50, 50]),
        )];
        let a = BalanceCalculator::net_balance_of(&expenses, &id(1));
        let b = BalanceCalculator::net_balance_of(&expenses, &id(2));
        assert_eq!(a, 50);
        assert_eq!(b, -50);
        assert_eq!(a + b, 0);
    }

    #[test]
    fn unbalanced_expense_does_not_sum_to_zero() {
        let expenses = vec![expense(
            0,
            NewExpense::new("gift", vec![id(1), id(2)], vec![100, 0], vec![0, 0]),
        )];
        assert_eq!(BalanceCalculator::net_balance_of(&expenses, &id(1)), 100);
        assert_eq!(BalanceCalculator::net_balance_of(&expenses, &id(2)), 0);
    }

    #[test]
    fn unknown_identity_has_zero_balance() {
        let expenses = vec![expense(0, NewExpense::labelled("x").share(id(1), 5, 1))];
        assert_eq!(BalanceCalculator::net_balance_of(&expenses, &id(7)), 0);
        assert_eq!(RunningBalances::from_expenses(&expenses).get(&id(7)), 0);
    }

    #[test]
    fn duplicates_count_once_with_last_amounts() {
        let expenses = vec![expense(
            0,
            NewExpense::labelled("dup")
                .share(id(1), 100, 0)
                .share(id(1), 10, 30),
        )];
        assert_eq!(BalanceCalculator::net_balance_of(&expenses, &id(1)), -20);
        assert_eq!(RunningBalances::from_expenses(&expenses).get(&id(1)), -20);
    }

    #[test]
    fn running_balances_track_applied_count() {
        let mut balances = RunningBalances::new();
        balances.apply(&expense(0, NewExpense::labelled("a").share(id(1), 3, 0)));
        balances.apply(&expense(1, NewExpense::labelled("b").share(id(1), 0, 1)));
        assert_eq!(balances.applied(), 2);
        assert_eq!(balances.get(&id(1)), 2);
    }

    fn arb_expense() -> impl Strategy<Value = NewExpense> {
        prop::collection::vec((1u8..6, 0u64..1_000, 0u64..1_000), 1..6).prop_map(|shares| {
            shares
                .into_iter()
                .fold(NewExpense::labelled("p"), |acc, (seed, paid, owed)| {
                    acc.share(id(seed), paid, owed)
                })
        })
    }

    proptest! {
        #[test]
        fn running_totals_equal_full_recomputation(inputs in prop::collection::vec(arb_expense(), 0..20)) {
            let expenses: Vec<Expense> = inputs
                .into_iter()
                .enumerate()
                .map(|(i, input)| expense(i as u64, input))
                .collect();
            let running = RunningBalances::from_expenses(&expenses);
            for seed in 0u8..8 {
                prop_assert_eq!(
                    running.get(&id(seed)),
                    BalanceCalculator::net_balance_of(&expenses, &id(seed))
                );
            }
        }
    }
}
