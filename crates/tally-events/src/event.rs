use serde::{Deserialize, Serialize};

use tally_types::{Balance, Identity, Timestamp};

/// Classification of notifications.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    PersonRegistered,
    NameUpdated,
    ExpenseAdded,
    DebtSettled,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::PersonRegistered => "PersonRegistered",
            Self::NameUpdated => "NameUpdated",
            Self::ExpenseAdded => "ExpenseAdded",
            Self::DebtSettled => "DebtSettled",
        };
        write!(f, "{s}")
    }
}

/// Observable side effect of a successful mutating operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notification {
    PersonRegistered { identity: Identity, name: String },
    NameUpdated { identity: Identity, new_name: String },
    ExpenseAdded { id: u64, label: String },
    DebtSettled {
        payer: Identity,
        payee: Identity,
        amount: Balance,
    },
}

impl Notification {
    pub fn kind(&self) -> NotificationKind {
        match self {
            Self::PersonRegistered { .. } => NotificationKind::PersonRegistered,
            Self::NameUpdated { .. } => NotificationKind::NameUpdated,
            Self::ExpenseAdded { .. } => NotificationKind::ExpenseAdded,
            Self::DebtSettled { .. } => NotificationKind::DebtSettled,
        }
    }

    /// Identities this notification is about.
    pub fn identities(&self) -> Vec<Identity> {
        match self {
            Self::PersonRegistered { identity, .. } | Self::NameUpdated { identity, .. } => {
                vec![*identity]
            }
            Self::ExpenseAdded { .. } => vec![],
            Self::DebtSettled { payer, payee, .. } => vec![*payer, *payee],
        }
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PersonRegistered { identity, name } => {
                write!(f, "PersonRegistered({identity}, {name:?})")
            }
            Self::NameUpdated { identity, new_name } => {
                write!(f, "NameUpdated({identity}, {new_name:?})")
            }
            Self::ExpenseAdded { id, label } => write!(f, "ExpenseAdded({id}, {label:?})"),
            Self::DebtSettled {
                payer,
                payee,
                amount,
            } => write!(f, "DebtSettled({payer}, {payee}, {amount})"),
        }
    }
}

/// A notification as delivered to subscribers.
///
/// `seq` is strictly increasing in acceptance order, starting at 1. The
/// integrity hash is BLAKE3 over (seq, timestamp, notification).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub seq: u64,
    pub timestamp: Timestamp,
    pub notification: Notification,
    pub integrity_hash: [u8; 32],
}

impl EventRecord {
    pub fn new(seq: u64, timestamp: Timestamp, notification: Notification) -> Self {
        let integrity_hash = Self::compute_integrity(seq, timestamp, &notification);
        Self {
            seq,
            timestamp,
            notification,
            integrity_hash,
        }
    }

    pub fn kind(&self) -> NotificationKind {
        self.notification.kind()
    }

    /// Verify the integrity hash matches the record's content.
    pub fn verify_integrity(&self) -> bool {
        self.integrity_hash == Self::compute_integrity(self.seq, self.timestamp, &self.notification)
    }

    /// Short hex of the integrity hash (first 8 hex chars).
    pub fn short_hash(&self) -> String {
        hex::encode(&self.integrity_hash[..4])
    }

    fn compute_integrity(seq: u64, timestamp: Timestamp, notification: &Notification) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"tally-event-v1:");
        hasher.update(&seq.to_le_bytes());
        hasher.update(&timestamp.as_secs().to_le_bytes());
        if let Ok(bytes) = bincode::serialize(notification) {
            hasher.update(&bytes);
        }
        *hasher.finalize().as_bytes()
    }
}
