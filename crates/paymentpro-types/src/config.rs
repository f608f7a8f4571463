//! Instance configuration.
//!
//! [`InitParams`] carries the constructor-equivalent parameters shared by
//! direct deployment, `initialize_contract` and the clone factory. It is
//! plain serde data so operators can keep per-network settings in JSON.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, AssetMode, DefaultPaymentConfig, PaymentProError, Result};

/// One-time setup parameters for a contract instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitParams {
    /// Receives the ADMIN role.
    pub admin: Address,
    /// Seeded into the payment-token allow-list and used as the default
    /// payment token.
    pub approved_payment_token: Address,
    /// Seeded into the sweep-token allow-list.
    pub approved_sweeping_token: Address,
    /// Seeded into the sweep-recipient allow-list.
    pub approved_sweep_recipient: Address,
    pub default_token_amount: Decimal,
    /// Ignored (must be zero) for token-only instances.
    #[serde(default)]
    pub default_eth_amount: Decimal,
}

impl InitParams {
    /// Parse parameters from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| PaymentProError::Configuration(e.to_string()))
    }

    /// Check every field against the rules for `mode`.
    ///
    /// # Errors
    /// - `ZeroAddress` for any zero address
    /// - `ZeroAmount` / `NegativeAmount` for the default token amount
    /// - `NegativeAmount` for the default eth amount
    /// - `NativeCurrencyDisabled` for a non-zero eth amount on a token-only
    ///   instance
    pub fn validate(&self, mode: AssetMode) -> Result<()> {
        for address in [
            self.admin,
            self.approved_payment_token,
            self.approved_sweeping_token,
            self.approved_sweep_recipient,
        ] {
            if address.is_zero() {
                return Err(PaymentProError::ZeroAddress);
            }
        }
        require_positive(self.default_token_amount)?;
        require_native_amount(mode, self.default_eth_amount)?;
        Ok(())
    }

    /// The default payment configuration these parameters seed.
    #[must_use]
    pub fn default_payment_config(&self) -> DefaultPaymentConfig {
        DefaultPaymentConfig {
            token: self.approved_payment_token,
            token_amount: self.default_token_amount,
            eth_amount: self.default_eth_amount,
        }
    }
}

/// Reject zero and negative amounts.
pub fn require_positive(amount: Decimal) -> Result<()> {
    if amount < Decimal::ZERO {
        return Err(PaymentProError::NegativeAmount(amount));
    }
    if amount.is_zero() {
        return Err(PaymentProError::ZeroAmount);
    }
    Ok(())
}

/// Validate a native-currency amount for `mode`: never negative, and zero
/// unless the instance settles a native leg.
pub fn require_native_amount(mode: AssetMode, amount: Decimal) -> Result<()> {
    if amount < Decimal::ZERO {
        return Err(PaymentProError::NegativeAmount(amount));
    }
    if !amount.is_zero() && !mode.accepts_native() {
        return Err(PaymentProError::NativeCurrencyDisabled);
    }
    Ok(())
}
