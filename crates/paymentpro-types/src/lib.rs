//! # paymentpro-types
//!
//! Shared types, errors, and configuration for the **PaymentPRO** settlement
//! ledger.
//!
//! This crate is the leaf dependency of the workspace. It defines:
//!
//! - **Identifiers**: [`Address`], [`ReferenceHash`]
//! - **Access control**: [`Role`]
//! - **Payment model**: [`StrictPayment`], [`NewStrictPayment`], [`DefaultPaymentConfig`], [`AssetMode`]
//! - **Events**: [`LedgerEvent`]
//! - **Configuration**: [`InitParams`]
//! - **Errors**: [`PaymentProError`] with `PP_ERR_` prefix codes
//! - **Constants**: domain tags and version strings

pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod payment;
pub mod role;

pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use payment::*;
pub use role::*;

// Constants are accessed via `paymentpro_types::constants::FOO`
// (not re-exported to avoid name collisions).
