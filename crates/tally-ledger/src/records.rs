use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tally_types::{amount, Amount, Balance, Identity, Timestamp};

/// Position of an expense in the ledger. Assigned as the record count at
/// creation time.
pub type ExpenseId = u64;

/// Caller-supplied input for a new expense.
///
/// `participants`, `paid` and `owed` are parallel lists: position `i` says
/// that `participants[i]` paid `paid[i]` and owes `owed[i]`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExpense {
    pub label: String,
    pub participants: Vec<Identity>,
    pub paid: Vec<Amount>,
    pub owed: Vec<Amount>,
}

impl NewExpense {
    pub fn new(
        label: impl Into<String>,
        participants: Vec<Identity>,
        paid: Vec<Amount>,
        owed: Vec<Amount>,
    ) -> Self {
        Self {
            label: label.into(),
            participants,
            paid,
            owed,
        }
    }

    /// Start an expense with no participants; add them with [`Self::share`].
    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    /// Append one participant with what they paid and what they owe.
    pub fn share(mut self, identity: Identity, paid: Amount, owed: Amount) -> Self {
        self.participants.push(identity);
        self.paid.push(paid);
        self.owed.push(owed);
        self
    }
}

/// Identifying summary of an expense: `(id, label, timestamp)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseInfo {
    pub id: ExpenseId,
    pub label: String,
    pub timestamp: Timestamp,
}

/// An immutable expense record.
///
/// Amount maps hold one entry per distinct participant. When a participant is
/// listed more than once, the last position's amounts are the ones stored while
/// `participants` keeps every occurrence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub label: String,
    pub timestamp: Timestamp,
    pub participants: Vec<Identity>,
    pub amount_paid: BTreeMap<Identity, Amount>,
    pub amount_owed: BTreeMap<Identity, Amount>,
}

impl Expense {
    /// Build the stored record from validated input.
    pub(crate) fn from_new(id: ExpenseId, timestamp: Timestamp, input: &NewExpense) -> Self {
        let mut amount_paid = BTreeMap::new();
        let mut amount_owed = BTreeMap::new();
        for (i, participant) in input.participants.iter().enumerate() {
            amount_paid.insert(*participant, input.paid[i]);
            amount_owed.insert(*participant, input.owed[i]);
        }

        Self {
            id,
            label: input.label.clone(),
            timestamp,
            participants: input.participants.clone(),
            amount_paid,
            amount_owed,
        }
    }

    pub fn info(&self) -> ExpenseInfo {
        ExpenseInfo {
            id: self.id,
            label: self.label.clone(),
            timestamp: self.timestamp,
        }
    }

    /// Amount `identity` paid; zero when absent.
    pub fn paid_by(&self, identity: &Identity) -> Amount {
        self.amount_paid.get(identity).copied().unwrap_or(0)
    }

    /// Amount `identity` owes; zero when absent.
    pub fn owed_by(&self, identity: &Identity) -> Amount {
        self.amount_owed.get(identity).copied().unwrap_or(0)
    }

    /// This expense's contribution to the net balance of `identity`.
    pub fn net_for(&self, identity: &Identity) -> Balance {
        amount::net(self.paid_by(identity), self.owed_by(identity))
    }

    /// Distinct identities with stored amounts.
    pub fn identities(&self) -> BTreeSet<Identity> {
        self.amount_paid
            .keys()
            .chain(self.amount_owed.keys())
            .copied()
            .collect()
    }

    pub fn total_paid(&self) -> u128 {
        self.amount_paid.values().map(|&a| u128::from(a)).sum()
    }

    pub fn total_owed(&self) -> u128 {
        self.amount_owed.values().map(|&a| u128::from(a)).sum()
    }

    /// Whether everything paid is accounted for by what is owed.
    pub fn is_balanced(&self) -> bool {
        self.total_paid() == self.total_owed()
    }

    /// Identities listed more than once, in first-repeat order.
    pub fn duplicate_participants(&self) -> Vec<Identity> {
        let mut seen = BTreeSet::new();
        let mut repeated = Vec::new();
        for participant in &self.participants {
            if !seen.insert(*participant) && !repeated.contains(participant) {
                repeated.push(*participant);
            }
        }
        repeated
    }
}
