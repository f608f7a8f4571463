//! # paymentpro-factory
//!
//! **Clone deployment**: shared reference implementations and a factory
//! that deploys and initializes clones of them in one step.
//!
//! ```text
//! CloneHost.deploy_reference_implementation(mode) → implementation address
//! PaymentProFactory.new_payment_pro_clone(impl, params)
//!     → derive address → new_clone → initialize_contract → host.insert
//!     → NewPaymentPROClone(clone)
//! ```
//!
//! Each clone owns independent storage; only the implementation's logic and
//! asset mode are shared.

pub mod factory;
pub mod host;

pub use factory::PaymentProFactory;
pub use host::{CloneHost, ReferenceImplementation, derive_address};
