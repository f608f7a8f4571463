//! System-wide constants for the PaymentPRO ledger.

/// Domain tag mixed into clone-address derivation.
pub const CLONE_ADDRESS_DOMAIN: &[u8] = b"paymentpro:clone:v1:";

/// Domain tag mixed into reference-implementation address derivation.
pub const IMPLEMENTATION_ADDRESS_DOMAIN: &[u8] = b"paymentpro:implementation:v1:";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Ledger name.
pub const LEDGER_NAME: &str = "PaymentPRO";
