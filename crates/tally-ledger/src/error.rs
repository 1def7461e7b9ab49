/// Errors produced by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("expense label must not be empty")]
    EmptyLabel,

    #[error("expense must have at least one participant")]
    NoParticipants,

    #[error("length mismatch: {participants} participants, {paid} paid amounts, {owed} owed amounts")]
    LengthMismatch {
        participants: usize,
        paid: usize,
        owed: usize,
    },

    #[error("invalid (null) participant identity at position {position}")]
    InvalidIdentity { position: usize },

    #[error("expense id {id} out of bounds (count = {count})")]
    IdOutOfBounds { id: u64, count: u64 },

    #[error("ledger has no expenses")]
    NoExpenses,

    #[error("imported expense has id {found}, expected {expected}")]
    NonContiguousId { expected: u64, found: u64 },

    #[error("imported expense {id} has amounts for an identity outside its participants")]
    StrayAmount { id: u64 },
}
