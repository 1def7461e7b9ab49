use serde::{Deserialize, Serialize};
use tally_types::{Balance, Identity};

use crate::error::{TallyError, TallyResult};

/// A debt settlement between two participants.
///
/// Settlements are announced, not booked: they never change an expense record
/// or any net balance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub payer: Identity,
    pub payee: Identity,
    pub amount: Balance,
}

impl Settlement {
    /// Validate the parties, then the amount.
    pub fn new(payer: Identity, payee: Identity, amount: Balance) -> TallyResult<Self> {
        if payee.is_zero() || payee == payer {
            return Err(TallyError::InvalidSettlementParty { payer, payee });
        }
        if amount <= 0 {
            return Err(TallyError::NonPositiveAmount { amount });
        }
        Ok(Self {
            payer,
            payee,
            amount,
        })
    }
}
