//! # paymentpro-ledger
//!
//! **Contract instance**: role registry, allow-lists, the payment reference
//! ledger, and treasury sweeps.
//!
//! ## Architecture
//!
//! A [`PaymentPro`] instance owns:
//! 1. **RoleRegistry**: ADMIN / APPROVER / SWEEPER / PAYMENT_MANAGER membership
//! 2. **AllowListStore**: payment tokens, sweep tokens, sweep recipients
//! 3. **ReferenceLedger**: strict (pre-reserved) payment records
//! 4. **UsedReferences**: hashes consumed by default/open payments
//!
//! Funds never live in the instance. They move through an [`AssetLedger`],
//! the boundary to the token contracts and the native currency.
//!
//! ## Payment Flow
//!
//! ```text
//! PAYMENT_MANAGER → create_strict_payment() → ReferenceLedger (RESERVED)
//! payer → make_strict_payment() → AssetLedger.transfer_from() → SETTLED
//! payer → make_default_payment() / make_open_payment() → UsedReferences
//! SWEEPER → sweep_*() → AssetLedger.transfer() → approved recipient
//! ```

pub mod allow_list;
pub mod assets;
pub mod context;
pub mod instance;
pub mod reference_ledger;
pub mod roles;
pub mod sweep;
pub mod used_references;

pub use allow_list::{AllowList, AllowListKind, AllowListStore};
pub use assets::{AssetBook, AssetLedger};
pub use context::CallContext;
pub use instance::{Deployment, PaymentPro};
pub use reference_ledger::ReferenceLedger;
pub use roles::RoleRegistry;
pub use sweep::SweepAmount;
pub use used_references::UsedReferences;
