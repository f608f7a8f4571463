//! Events emitted for external indexers.
//!
//! Every successful state-changing call appends one or more [`LedgerEvent`]s
//! to the instance's log. Failed calls append nothing, so the log is an
//! exact audit trail of what took effect.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, ReferenceHash, Result, Role};

/// An event emitted by a contract instance or the clone factory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum LedgerEvent {
    RoleGranted {
        role: Role,
        account: Address,
        sender: Address,
    },
    RoleRevoked {
        role: Role,
        account: Address,
        sender: Address,
    },
    ApprovedPaymentToken {
        token: Address,
    },
    UnapprovedPaymentToken {
        token: Address,
    },
    ApprovedSweepingToken {
        token: Address,
    },
    UnapprovedSweepingToken {
        token: Address,
    },
    ApprovedTokenSweepRecipient {
        recipient: Address,
    },
    UnapprovedTokenSweepRecipient {
        recipient: Address,
    },
    DefaultPaymentConfigAdjusted {
        token: Address,
        token_amount: Decimal,
        eth_amount: Decimal,
    },
    PaymentReferenceCreated {
        reference_hash: ReferenceHash,
        reference: String,
        token: Address,
        token_amount: Decimal,
        eth_amount: Decimal,
        payer: Address,
        enforce_payer: bool,
    },
    PaymentReferenceDeleted {
        reference_hash: ReferenceHash,
        reference: String,
    },
    StrictPaymentReceived {
        reference_hash: ReferenceHash,
        reference: String,
        sender: Address,
        token: Address,
        token_amount: Decimal,
        eth_amount: Decimal,
    },
    DefaultPaymentReceived {
        reference_hash: ReferenceHash,
        reference: String,
        sender: Address,
        token: Address,
        token_amount: Decimal,
        eth_amount: Decimal,
    },
    OpenPaymentReceived {
        reference_hash: ReferenceHash,
        reference: String,
        sender: Address,
        token: Address,
        token_amount: Decimal,
        eth_amount: Decimal,
    },
    TokenSwept {
        recipient: Address,
        sweeper: Address,
        token: Address,
        amount: Decimal,
    },
    #[serde(rename = "ETHSwept")]
    EthSwept {
        recipient: Address,
        sweeper: Address,
        amount: Decimal,
    },
    #[serde(rename = "NewPaymentPROClone")]
    NewPaymentProClone {
        clone: Address,
    },
}

impl LedgerEvent {
    /// The indexer-facing event name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::RoleGranted { .. } => "RoleGranted",
            Self::RoleRevoked { .. } => "RoleRevoked",
            Self::ApprovedPaymentToken { .. } => "ApprovedPaymentToken",
            Self::UnapprovedPaymentToken { .. } => "UnapprovedPaymentToken",
            Self::ApprovedSweepingToken { .. } => "ApprovedSweepingToken",
            Self::UnapprovedSweepingToken { .. } => "UnapprovedSweepingToken",
            Self::ApprovedTokenSweepRecipient { .. } => "ApprovedTokenSweepRecipient",
            Self::UnapprovedTokenSweepRecipient { .. } => "UnapprovedTokenSweepRecipient",
            Self::DefaultPaymentConfigAdjusted { .. } => "DefaultPaymentConfigAdjusted",
            Self::PaymentReferenceCreated { .. } => "PaymentReferenceCreated",
            Self::PaymentReferenceDeleted { .. } => "PaymentReferenceDeleted",
            Self::StrictPaymentReceived { .. } => "StrictPaymentReceived",
            Self::DefaultPaymentReceived { .. } => "DefaultPaymentReceived",
            Self::OpenPaymentReceived { .. } => "OpenPaymentReceived",
            Self::TokenSwept { .. } => "TokenSwept",
            Self::EthSwept { .. } => "ETHSwept",
            Self::NewPaymentProClone { .. } => "NewPaymentPROClone",
        }
    }

    /// Encode as the JSON log line handed to indexers.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode one JSON log line.
    ///
    /// # Errors
    /// `Serialization` if the line is not a known event.
    pub fn from_json(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line)?)
    }
}

impl std::fmt::Display for LedgerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
