use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Number of bytes in an [`Identity`].
pub const IDENTITY_LEN: usize = 20;

/// Opaque, address-like identity of a ledger participant.
///
/// Identities are supplied by the execution environment (e.g. the caller's
/// account address) and carry no structure beyond equality, hashing and
/// ordering. The all-zero value is the null identity and is never a valid
/// participant.
///
/// Serialized as a `0x`-prefixed lowercase hex string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity {
    bytes: [u8; IDENTITY_LEN],
}

impl Identity {
    /// The null identity.
    pub const ZERO: Self = Self {
        bytes: [0; IDENTITY_LEN],
    };

    /// Create from raw bytes.
    pub const fn from_raw(bytes: [u8; IDENTITY_LEN]) -> Self {
        Self { bytes }
    }

    /// Create a random identity for tests and demos.
    pub fn random() -> Self {
        let mut bytes = [0u8; IDENTITY_LEN];
        rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
        Self { bytes }
    }

    /// Returns `true` for the null identity.
    pub fn is_zero(&self) -> bool {
        self.bytes == [0; IDENTITY_LEN]
    }

    /// Full `0x`-prefixed hex string.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.bytes))
    }

    /// Abbreviated form for tables and logs: `0x1234…abcd`.
    pub fn short_id(&self) -> String {
        let full = hex::encode(self.bytes);
        format!("0x{}…{}", &full[..4], &full[full.len() - 4..])
    }

    /// Parse from 40 hex characters, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let s = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != IDENTITY_LEN {
            return Err(TypeError::InvalidLength {
                expected: IDENTITY_LEN,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; IDENTITY_LEN];
        arr.copy_from_slice(&bytes);
        Ok(Self { bytes: arr })
    }
}

impl FromStr for Identity {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Identity {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Identity> for String {
    fn from(value: Identity) -> Self {
        value.to_hex()
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self.short_id())
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
