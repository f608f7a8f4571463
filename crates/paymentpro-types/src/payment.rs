//! Payment records and the default payment configuration.
//!
//! ## Strict payment lifecycle
//!
//! ```text
//!   ┌────────────┐  create   ┌──────────┐  settle   ┌─────────┐
//!   │ UNRESERVED ├──────────▶│ RESERVED ├──────────▶│ SETTLED │
//!   └────────────┘           └────┬─────┘           └─────────┘
//!         ▲                       │ delete
//!         └───────────────────────┘
//! ```
//!
//! `SETTLED` is terminal: a completed record can never be deleted or
//! settled again.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, ReferenceHash};

/// Which asset legs an instance settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetMode {
    /// Token leg only. Native value attached to any call is rejected.
    #[default]
    TokenOnly,
    /// Token leg plus an exact native-currency leg.
    Dual,
}

impl AssetMode {
    #[must_use]
    pub fn accepts_native(self) -> bool {
        matches!(self, Self::Dual)
    }
}

impl std::fmt::Display for AssetMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TokenOnly => write!(f, "TOKEN_ONLY"),
            Self::Dual => write!(f, "DUAL"),
        }
    }
}

/// Where a strict reference currently sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrictPaymentState {
    Unreserved,
    Reserved,
    Settled,
}

impl std::fmt::Display for StrictPaymentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unreserved => write!(f, "UNRESERVED"),
            Self::Reserved => write!(f, "RESERVED"),
            Self::Settled => write!(f, "SETTLED"),
        }
    }
}

/// A pre-registered payment keyed by its reference hash.
///
/// The `Default` value is the empty record returned for unknown hashes:
/// `exists == false` and every other field zeroed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StrictPayment {
    pub reference: String,
    pub reference_hash: ReferenceHash,
    pub token: Address,
    pub token_amount: Decimal,
    /// Exact native value the payer must attach. Zero for token-only instances.
    pub eth_amount: Decimal,
    pub payer: Address,
    /// When set, only `payer` may settle.
    pub enforce_payer: bool,
    pub complete: bool,
    pub exists: bool,
}

impl StrictPayment {
    #[must_use]
    pub fn state(&self) -> StrictPaymentState {
        match (self.exists, self.complete) {
            (false, _) => StrictPaymentState::Unreserved,
            (true, false) => StrictPaymentState::Reserved,
            (true, true) => StrictPaymentState::Settled,
        }
    }

    /// Whether `caller` may settle this record.
    #[must_use]
    pub fn accepts_payer(&self, caller: Address) -> bool {
        !self.enforce_payer || self.payer == caller
    }
}

/// Request body for `create_strict_payment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStrictPayment {
    pub reference: String,
    pub token: Address,
    pub token_amount: Decimal,
    #[serde(default)]
    pub eth_amount: Decimal,
    pub payer: Address,
    #[serde(default)]
    pub enforce_payer: bool,
}

impl NewStrictPayment {
    /// Token-only request with no payer enforcement.
    #[must_use]
    pub fn new(reference: impl Into<String>, token: Address, token_amount: Decimal) -> Self {
        Self {
            reference: reference.into(),
            token,
            token_amount,
            eth_amount: Decimal::ZERO,
            payer: Address::ZERO,
            enforce_payer: false,
        }
    }

    #[must_use]
    pub fn with_eth_amount(mut self, eth_amount: Decimal) -> Self {
        self.eth_amount = eth_amount;
        self
    }

    /// Bind the payment to `payer`; `enforce` decides whether settlement
    /// from anyone else is rejected.
    #[must_use]
    pub fn with_payer(mut self, payer: Address, enforce: bool) -> Self {
        self.payer = payer;
        self.enforce_payer = enforce;
        self
    }
}

/// The single global configuration consumed by default payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultPaymentConfig {
    pub token: Address,
    pub token_amount: Decimal,
    #[serde(default)]
    pub eth_amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_record_is_unreserved() {
        let record = StrictPayment::default();
        assert!(!record.exists);
        assert!(!record.complete);
        assert_eq!(record.state(), StrictPaymentState::Unreserved);
        assert_eq!(record.token_amount, Decimal::ZERO);
    }

    #[test]
    fn state_follows_flags() {
        let mut record = StrictPayment {
            exists: true,
            ..StrictPayment::default()
        };
        assert_eq!(record.state(), StrictPaymentState::Reserved);
        record.complete = true;
        assert_eq!(record.state(), StrictPaymentState::Settled);
    }

    #[test]
    fn payer_enforcement() {
        let payer = Address::from_low_u64(1);
        let other = Address::from_low_u64(2);
        let mut record = StrictPayment {
            payer,
            enforce_payer: true,
            exists: true,
            ..StrictPayment::default()
        };
        assert!(record.accepts_payer(payer));
        assert!(!record.accepts_payer(other));

        record.enforce_payer = false;
        assert!(record.accepts_payer(other));
    }

    #[test]
    fn new_strict_payment_builder() {
        let token = Address::from_low_u64(10);
        let payer = Address::from_low_u64(11);
        let req = NewStrictPayment::new("REF1", token, Decimal::new(500, 0))
            .with_eth_amount(Decimal::new(5, 4))
            .with_payer(payer, true);
        assert_eq!(req.reference, "REF1");
        assert_eq!(req.eth_amount, Decimal::new(5, 4));
        assert_eq!(req.payer, payer);
        assert!(req.enforce_payer);
    }

    #[test]
    fn asset_mode_serde() {
        let mode: AssetMode = serde_json::from_str("\"dual\"").unwrap();
        assert_eq!(mode, AssetMode::Dual);
        assert!(mode.accepts_native());
        assert!(!AssetMode::default().accepts_native());
    }
}
