use crate::error::LedgerError;
use crate::records::{Expense, ExpenseId, NewExpense};

/// Check a new expense before anything is written.
///
/// Checks run in a fixed order and the first failure wins: label,
/// participant presence, list lengths, then null identities.
pub fn validate_new_expense(input: &NewExpense) -> Result<(), LedgerError> {
    if input.label.is_empty() {
        return Err(LedgerError::EmptyLabel);
    }
    if input.participants.is_empty() {
        return Err(LedgerError::NoParticipants);
    }
    let participants = input.participants.len();
    if input.paid.len() != participants || input.owed.len() != participants {
        return Err(LedgerError::LengthMismatch {
            participants,
            paid: input.paid.len(),
            owed: input.owed.len(),
        });
    }
    if let Some(position) = input.participants.iter().position(|p| p.is_zero()) {
        return Err(LedgerError::InvalidIdentity { position });
    }
    Ok(())
}

/// Check a stored record that is being imported at position `expected_id`.
///
/// Applies the same rules as [`validate_new_expense`] and additionally
/// requires contiguous ids and amount maps keyed only by participants.
pub fn validate_record(expense: &Expense, expected_id: ExpenseId) -> Result<(), LedgerError> {
    if expense.id != expected_id {
        return Err(LedgerError::NonContiguousId {
            expected: expected_id,
            found: expense.id,
        });
    }
    if expense.label.is_empty() {
        return Err(LedgerError::EmptyLabel);
    }
    if expense.participants.is_empty() {
        return Err(LedgerError::NoParticipants);
    }
    if let Some(position) = expense.participants.iter().position(|p| p.is_zero()) {
        return Err(LedgerError::InvalidIdentity { position });
    }
    let stray = expense
        .identities()
        .iter()
        .any(|id| !expense.participants.contains(id));
    let missing = expense
        .participants
        .iter()
        .any(|p| !expense.amount_paid.contains_key(p) || !expense.amount_owed.contains_key(p));
    if stray || missing {
        return Err(LedgerError::StrayAmount { id: expense.id });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tally_types::identity::IDENTITY_LEN;
    use tally_types::{Identity, Timestamp};

    use super::*;

    fn id(seed: u8) -> Identity {
        Identity::from_raw([seed; IDENTITY_LEN])
    }

    #[test]
    fn valid_expense_passes() {
        let input = NewExpense::new("rent", vec![id(1), id(2)], vec![100, 0], vec![50, 50]);
        assert_eq!(validate_new_expense(&input), Ok(()));
    }

    #[test]
    fn empty_label_is_checked_first() {
        let input = NewExpense::new("", vec![], vec![1], vec![]);
        assert_eq!(validate_new_expense(&input), Err(LedgerError::EmptyLabel));
    }

    #[test]
    fn missing_participants_before_lengths() {
        let input = NewExpense::new("x", vec![], vec![1], vec![1, 2]);
        assert_eq!(validate_new_expense(&input), Err(LedgerError::NoParticipants));
    }

    #[test]
    fn length_mismatch_reports_all_lengths() {
        let input = NewExpense::new("x", vec![id(1), id(2)], vec![1], vec![1, 1]);
        assert_eq!(
            validate_new_expense(&input),
            Err(LedgerError::LengthMismatch {
                participants: 2,
                paid: 1,
                owed: 2
            })
        );
    }

    #[test]
    fn lengths_checked_before_null_identity() {
        let input = NewExpense::new("x", vec![Identity::ZERO], vec![1], vec![]);
        assert!(matches!(
            validate_new_expense(&input),
            Err(LedgerError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn null_identity_reports_position() {
        let input = NewExpense::new("x", vec![id(1), Identity::ZERO], vec![1, 1], vec![1, 1]);
        assert_eq!(
            validate_new_expense(&input),
            Err(LedgerError::InvalidIdentity { position: 1 })
        );
    }

    #[test]
    fn whitespace_label_is_accepted() {
        let input = NewExpense::labelled(" ").share(id(1), 0, 0);
        assert_eq!(validate_new_expense(&input), Ok(()));
    }

    #[test]
    fn record_must_be_contiguous() {
        let input = NewExpense::labelled("a").share(id(1), 1, 1);
        let record = Expense::from_new(4, Timestamp::default(), &input);
        assert_eq!(validate_record(&record, 4), Ok(()));
        assert_eq!(
            validate_record(&record, 2),
            Err(LedgerError::NonContiguousId {
                expected: 2,
                found: 4
            })
        );
    }

    #[test]
    fn record_rejects_amounts_for_outsiders() {
        let input = NewExpense::labelled("a").share(id(1), 1, 1);
        let mut record = Expense::from_new(0, Timestamp::default(), &input);
        record.amount_paid.insert(id(9), 5);
        assert_eq!(
            validate_record(&record, 0),
            Err(LedgerError::StrayAmount { id: 0 })
        );
    }

    #[test]
    fn record_requires_amounts_for_every_participant() {
        let input = NewExpense::labelled("a").share(id(1), 1, 1);
        let mut record = Expense::from_new(0, Timestamp::default(), &input);
        record.amount_owed.clear();
        assert_eq!(
            validate_record(&record, 0),
            Err(LedgerError::StrayAmount { id: 0 })
        );
    }
}
