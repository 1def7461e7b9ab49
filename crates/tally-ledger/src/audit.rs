use serde::Serialize;
use tally_types::Identity;

use crate::records::{Expense, ExpenseId};
use crate::traits::LedgerReader;

/// Result of auditing a ledger.
///
/// Findings are informational: the ledger accepts every audited shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub expense_count: u64,
    pub findings: Vec<Finding>,
}

impl AuditReport {
    /// Returns `true` if nothing was flagged.
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn for_expense(&self, id: ExpenseId) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.expense_id == id)
    }
}

/// Something noteworthy about one expense.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub expense_id: ExpenseId,
    pub kind: FindingKind,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum FindingKind {
    /// Paid and owed totals differ, so balances for this expense do not
    /// cancel out.
    Unbalanced { paid: u128, owed: u128 },
    /// Listed more than once; only the last position's amounts are stored.
    DuplicateParticipant { identity: Identity },
    /// Participant has no registry entry.
    UnregisteredParticipant { identity: Identity },
}

/// Ledger auditor.
pub struct LedgerAuditor;

impl LedgerAuditor {
    /// Audit every expense for unbalanced totals and duplicate participants.
    pub fn audit<R: LedgerReader + ?Sized>(reader: &R) -> AuditReport {
        Self::audit_against(reader, |_| true)
    }

    /// Like [`Self::audit`], also flagging participants for which
    /// `is_registered` returns `false`.
    pub fn audit_against<R, F>(reader: &R, is_registered: F) -> AuditReport
    where
        R: LedgerReader + ?Sized,
        F: Fn(&Identity) -> bool,
    {
        let mut findings = Vec::new();
        let mut expense_count = 0u64;

        reader.for_each_expense(&mut |expense: &Expense| {
            expense_count += 1;

            if !expense.is_balanced() {
                findings.push(Finding {
                    expense_id: expense.id,
                    kind: FindingKind::Unbalanced {
                        paid: expense.total_paid(),
                        owed: expense.total_owed(),
                    },
                });
            }

            for identity in expense.duplicate_participants() {
                findings.push(Finding {
                    expense_id: expense.id,
                    kind: FindingKind::DuplicateParticipant { identity },
                });
            }

            for identity in expense.identities() {
                if !is_registered(&identity) {
                    findings.push(Finding {
                        expense_id: expense.id,
                        kind: FindingKind::UnregisteredParticipant { identity },
                    });
                }
            }
        });

        AuditReport {
            expense_count,
            findings,
        }
    }
}
