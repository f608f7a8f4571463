//! Error types for the PaymentPRO ledger.
//!
//! All errors use the `PP_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Authorization errors
//! - 2xx: Input validation errors
//! - 3xx: Reference / lifecycle state errors
//! - 4xx: Settlement and sweep errors
//! - 5xx: Factory errors
//! - 9xx: General / internal errors
//!
//! Every error aborts the call that raised it with no partial effect.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{Address, ReferenceHash, Role};

/// Why the external asset primitive refused a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferFailure {
    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Decimal, available: Decimal },

    #[error("insufficient allowance: need {needed}, allowed {allowed}")]
    InsufficientAllowance { needed: Decimal, allowed: Decimal },

    /// The token contract returned a non-success result.
    #[error("transfer rejected by token")]
    Rejected,
}

/// Central error enum for all PaymentPRO operations.
#[derive(Debug, Error)]
pub enum PaymentProError {
    // =================================================================
    // Authorization Errors (1xx)
    // =================================================================
    /// Caller lacks the role that administers the requested operation.
    #[error("PP_ERR_100: {account} is missing role {role}")]
    Unauthorized { account: Address, role: Role },

    #[error("PP_ERR_101: Caller is not an approver")]
    NotApprover,

    #[error("PP_ERR_102: Caller is not a sweeper")]
    NotSweeper,

    #[error("PP_ERR_103: Caller is not a payment manager")]
    NotPaymentManager,

    // =================================================================
    // Input Validation Errors (2xx)
    // =================================================================
    #[error("PP_ERR_200: Zero address not allowed")]
    ZeroAddress,

    #[error("PP_ERR_201: Zero amount not allowed")]
    ZeroAmount,

    #[error("PP_ERR_202: Negative amount not allowed: {0}")]
    NegativeAmount(Decimal),

    /// The write would leave the stored value unchanged.
    #[error("PP_ERR_203: No change")]
    NoChange,

    #[error("PP_ERR_204: Invalid address {input:?}: {reason}")]
    InvalidAddress { input: String, reason: String },

    #[error("PP_ERR_205: Invalid reference hash {input:?}: {reason}")]
    InvalidReferenceHash { input: String, reason: String },

    // =================================================================
    // Reference / Lifecycle State Errors (3xx)
    // =================================================================
    #[error("PP_ERR_300: Contract already initialized")]
    AlreadyInitialized,

    /// `create_strict_payment` on a hash that already has an active record.
    #[error("PP_ERR_301: Reference already reserved: {0}")]
    ReferenceAlreadyReserved(ReferenceHash),

    /// Strict settle/delete on a hash with no active record.
    #[error("PP_ERR_302: Reference not reserved: {0}")]
    ReferenceNotReserved(ReferenceHash),

    /// Default/open payment on a hash that is an active strict reservation.
    #[error("PP_ERR_303: Reference reserved for a strict payment: {0}")]
    ReferenceReserved(ReferenceHash),

    /// Default/open payment on a hash that was already consumed.
    #[error("PP_ERR_304: Reference already used: {0}")]
    ReferenceUsed(ReferenceHash),

    #[error("PP_ERR_305: Payment already complete: {0}")]
    PaymentAlreadyComplete(ReferenceHash),

    // =================================================================
    // Settlement / Sweep Errors (4xx)
    // =================================================================
    #[error("PP_ERR_400: Token not approved: {0}")]
    NotApprovedToken(Address),

    #[error("PP_ERR_401: Recipient not approved: {0}")]
    NotApprovedRecipient(Address),

    #[error("PP_ERR_402: Payer mismatch: expected {expected}, got {actual}")]
    PayerMismatch { expected: Address, actual: Address },

    #[error("PP_ERR_403: Incorrect native amount: expected {expected}, got {actual}")]
    IncorrectNativeAmount { expected: Decimal, actual: Decimal },

    #[error("PP_ERR_404: No balance to sweep")]
    NoBalance,

    #[error("PP_ERR_405: Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Decimal, available: Decimal },

    /// A native-currency leg was supplied to a token-only instance.
    #[error("PP_ERR_406: Native currency not accepted by this instance")]
    NativeCurrencyDisabled,

    #[error("PP_ERR_407: Token transfer failed for {token}: {source}")]
    TokenTransferFailed {
        token: Address,
        #[source]
        source: TransferFailure,
    },

    #[error("PP_ERR_408: Native transfer failed: {0}")]
    NativeTransferFailed(#[source] TransferFailure),

    // =================================================================
    // Factory Errors (5xx)
    // =================================================================
    #[error("PP_ERR_500: Unknown reference implementation: {0}")]
    UnknownImplementation(Address),

    #[error("PP_ERR_501: No instance deployed at {0}")]
    UnknownInstance(Address),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    #[error("PP_ERR_900: Internal error: {0}")]
    Internal(String),

    #[error("PP_ERR_901: Serialization error: {0}")]
    Serialization(String),

    #[error("PP_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, PaymentProError>;

impl From<serde_json::Error> for PaymentProError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = PaymentProError::ReferenceUsed(ReferenceHash::of("R"));
        let msg = format!("{err}");
        assert!(msg.starts_with("PP_ERR_304"), "Got: {msg}");
    }

    #[test]
    fn insufficient_balance_display() {
        let err = PaymentProError::InsufficientBalance {
            needed: Decimal::new(100, 0),
            available: Decimal::new(50, 0),
        };
        let msg = format!("{err}");
        assert!(msg.contains("PP_ERR_405"));
        assert!(msg.contains("100"));
        assert!(msg.contains("50"));
    }

    #[test]
    fn unauthorized_names_role() {
        let err = PaymentProError::Unauthorized {
            account: Address::from_low_u64(9),
            role: Role::Admin,
        };
        let msg = format!("{err}");
        assert!(msg.contains("PP_ERR_100"));
        assert!(msg.contains("ADMIN"));
    }

    #[test]
    fn transfer_failure_is_source() {
        use std::error::Error as _;
        let err = PaymentProError::TokenTransferFailed {
            token: Address::from_low_u64(1),
            source: TransferFailure::Rejected,
        };
        assert!(err.source().is_some());
    }

    #[test]
    fn all_errors_have_pp_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(PaymentProError::NotApprover),
            Box::new(PaymentProError::NoChange),
            Box::new(PaymentProError::AlreadyInitialized),
            Box::new(PaymentProError::NativeCurrencyDisabled),
            Box::new(PaymentProError::UnknownImplementation(Address::ZERO)),
            Box::new(PaymentProError::Internal("test".into())),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("PP_ERR_"),
                "Error missing PP_ERR_ prefix: {msg}"
            );
        }
    }
}
