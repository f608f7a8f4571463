//! Identifiers used throughout PaymentPRO.
//!
//! Accounts, tokens and contract instances share one 20-byte [`Address`]
//! space. Payment references are looked up by their [`ReferenceHash`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

use crate::PaymentProError;

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A 20-byte account, token or contract address.
///
/// Serialised as a `0x`-prefixed lowercase hex string.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Default, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The null address. Never a valid token, recipient or admin.
    pub const ZERO: Self = Self([0u8; 20]);

    #[must_use]
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Address whose low 8 bytes hold `n` big-endian. Handy for fixtures.
    #[must_use]
    pub fn from_low_u64(n: u64) -> Self {
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&n.to_be_bytes());
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Random non-zero address.
    #[cfg(feature = "test-helpers")]
    #[must_use]
    pub fn random() -> Self {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        loop {
            let bytes: [u8; 20] = rng.r#gen();
            if bytes != [0u8; 20] {
                return Self(bytes);
            }
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = PaymentProError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let decoded = hex::decode(digits).map_err(|e| PaymentProError::InvalidAddress {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        let bytes: [u8; 20] =
            decoded
                .try_into()
                .map_err(|v: Vec<u8>| PaymentProError::InvalidAddress {
                    input: s.to_string(),
                    reason: format!("expected 20 bytes, got {}", v.len()),
                })?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = PaymentProError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

// ---------------------------------------------------------------------------
// ReferenceHash
// ---------------------------------------------------------------------------

/// Ledger lookup key: Keccak-256 of the reference string's UTF-8 bytes.
///
/// The hash is a pure function of the string, so the same reference always
/// lands on the same strict record and the same used-reference marker.
/// Serialised as a `0x`-prefixed lowercase hex string, the form indexers
/// and `view_strict_payment_by_hashed_reference` callers exchange.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Default, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct ReferenceHash(pub [u8; 32]);

impl ReferenceHash {
    #[must_use]
    pub fn of(reference: &str) -> Self {
        let digest = Keccak256::digest(reference.as_bytes());
        Self(digest.into())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for ReferenceHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for ReferenceHash {
    type Err = PaymentProError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let decoded = hex::decode(digits).map_err(|e| PaymentProError::InvalidReferenceHash {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        let bytes: [u8; 32] =
            decoded
                .try_into()
                .map_err(|v: Vec<u8>| PaymentProError::InvalidReferenceHash {
                    input: s.to_string(),
                    reason: format!("expected 32 bytes, got {}", v.len()),
                })?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for ReferenceHash {
    type Error = PaymentProError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ReferenceHash> for String {
    fn from(hash: ReferenceHash) -> Self {
        hash.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
