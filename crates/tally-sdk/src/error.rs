use tally_ledger::LedgerError;
use tally_registry::RegistryError;
use tally_types::{Balance, Identity};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TallyError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("invalid settlement between {payer} and {payee}")]
    InvalidSettlementParty { payer: Identity, payee: Identity },

    #[error("settlement amount must be positive, got {amount}")]
    NonPositiveAmount { amount: Balance },

    #[error("unsupported snapshot version {version}")]
    UnsupportedSnapshot { version: u32 },

    #[error("snapshot entry for {identity} is not a valid registered person")]
    InvalidSnapshotPerson { identity: Identity },
}

/// Flat classification of every failure a caller may branch on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    EmptyName,
    AlreadyRegistered,
    NotRegistered,
    EmptyLabel,
    NoParticipants,
    LengthMismatch,
    InvalidIdentity,
    IdOutOfBounds,
    NoExpenses,
    NonPositiveAmount,
    /// A restored snapshot is internally inconsistent.
    CorruptSnapshot,
}

impl TallyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Registry(e) => match e {
                RegistryError::EmptyName => ErrorKind::EmptyName,
                RegistryError::AlreadyRegistered { .. } => ErrorKind::AlreadyRegistered,
                RegistryError::NotRegistered { .. } => ErrorKind::NotRegistered,
            },
            Self::Ledger(e) => match e {
                LedgerError::EmptyLabel => ErrorKind::EmptyLabel,
                LedgerError::NoParticipants => ErrorKind::NoParticipants,
                LedgerError::LengthMismatch { .. } => ErrorKind::LengthMismatch,
                LedgerError::InvalidIdentity { .. } => ErrorKind::InvalidIdentity,
                LedgerError::IdOutOfBounds { .. } => ErrorKind::IdOutOfBounds,
                LedgerError::NoExpenses => ErrorKind::NoExpenses,
                LedgerError::NonContiguousId { .. } | LedgerError::StrayAmount { .. } => {
                    ErrorKind::CorruptSnapshot
                }
            },
            Self::InvalidSettlementParty { .. } => ErrorKind::InvalidIdentity,
            Self::NonPositiveAmount { .. } => ErrorKind::NonPositiveAmount,
            Self::UnsupportedSnapshot { .. } | Self::InvalidSnapshotPerson { .. } => {
                ErrorKind::CorruptSnapshot
            }
        }
    }
}

pub type TallyResult<T> = Result<T, TallyError>;
