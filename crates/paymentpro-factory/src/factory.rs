//! The PaymentPRO factory.
//!
//! Deploys a clone of a reference implementation and initializes it in the
//! same call, so no one can front-run the initializer of a fresh clone.

use paymentpro_ledger::{CallContext, PaymentPro};
use paymentpro_types::constants::CLONE_ADDRESS_DOMAIN;
use paymentpro_types::{Address, InitParams, LedgerEvent, Result};

use crate::host::{CloneHost, derive_address};

/// Deploys initialized clones into a [`CloneHost`].
#[derive(Debug, Clone)]
pub struct PaymentProFactory {
    address: Address,
    /// Clones deployed so far; the next clone's derivation input.
    nonce: u64,
    events: Vec<LedgerEvent>,
}

impl PaymentProFactory {
    #[must_use]
    pub fn new(address: Address) -> Self {
        Self {
            address,
            nonce: 0,
            events: Vec::new(),
        }
    }

    /// Deploy and initialize a clone of `reference_implementation`.
    ///
    /// The caller of `ctx` becomes the initializer (the `sender` of the
    /// clone's setup events); `params.admin` becomes its ADMIN. Returns the
    /// clone's address.
    ///
    /// # Errors
    /// - `UnknownImplementation` if `reference_implementation` is not deployed
    /// - any validation error from initializing the clone, in which case no
    ///   clone is stored and the nonce is unchanged
    pub fn new_payment_pro_clone(
        &mut self,
        ctx: &CallContext,
        host: &mut CloneHost,
        reference_implementation: Address,
        params: &InitParams,
    ) -> Result<Address> {
        let implementation = host.implementation(reference_implementation)?;
        let clone_address = self.next_clone_address();

        let mut clone = PaymentPro::new_clone(clone_address, implementation.address, implementation.mode);
        clone.initialize_contract(ctx, params)?;
        host.insert(clone)?;

        self.nonce += 1;
        tracing::info!(
            factory = %self.address,
            clone = %clone_address,
            implementation = %implementation.address,
            mode = %implementation.mode,
            admin = %params.admin,
            "PaymentPRO clone deployed"
        );
        self.events.push(LedgerEvent::NewPaymentProClone {
            clone: clone_address,
        });
        Ok(clone_address)
    }

    /// The address the next successful deployment will use.
    #[must_use]
    pub fn next_clone_address(&self) -> Address {
        derive_address(CLONE_ADDRESS_DOMAIN, self.address, self.nonce)
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    #[must_use]
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    #[must_use]
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }
}
