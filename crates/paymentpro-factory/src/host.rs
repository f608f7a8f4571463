//! Clone host: the address space that factory-deployed instances live in.
//!
//! A reference implementation is deployed once per asset mode and never
//! initialized. Clones share its logic (and therefore its mode) but each
//! owns separate storage.

use std::collections::HashMap;

use paymentpro_ledger::PaymentPro;
use paymentpro_types::constants::IMPLEMENTATION_ADDRESS_DOMAIN;
use paymentpro_types::{Address, AssetMode, PaymentProError, Result};
use sha2::{Digest, Sha256};

/// A deployed shared implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceImplementation {
    pub address: Address,
    pub mode: AssetMode,
}

/// Derive a 20-byte address from `domain || creator || nonce`.
///
/// Deterministic: the same creator and nonce always give the same address.
#[must_use]
pub fn derive_address(domain: &[u8], creator: Address, nonce: u64) -> Address {
    let mut hasher = Sha256::new();
    hasher.update(domain);
    hasher.update(creator.as_bytes());
    hasher.update(nonce.to_le_bytes());
    let hash = hasher.finalize();
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&hash[..20]);
    Address::from_bytes(bytes)
}

/// Reference implementations plus every clone deployed against them.
#[derive(Debug, Default)]
pub struct CloneHost {
    implementations: HashMap<Address, ReferenceImplementation>,
    instances: HashMap<Address, PaymentPro>,
    deployments: u64,
}

impl CloneHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deploy a new shared implementation for `mode` and return its address.
    pub fn deploy_reference_implementation(&mut self, mode: AssetMode) -> Address {
        let address = derive_address(IMPLEMENTATION_ADDRESS_DOMAIN, Address::ZERO, self.deployments);
        self.deployments += 1;
        self.implementations
            .insert(address, ReferenceImplementation { address, mode });
        tracing::info!(implementation = %address, %mode, "Reference implementation deployed");
        address
    }

    /// Look up a reference implementation.
    ///
    /// # Errors
    /// `UnknownImplementation` if nothing was deployed at `address`.
    pub fn implementation(&self, address: Address) -> Result<ReferenceImplementation> {
        self.implementations
            .get(&address)
            .copied()
            .ok_or(PaymentProError::UnknownImplementation(address))
    }

    /// # Errors
    /// `UnknownInstance` if no clone lives at `address`.
    pub fn instance(&self, address: Address) -> Result<&PaymentPro> {
        self.instances
            .get(&address)
            .ok_or(PaymentProError::UnknownInstance(address))
    }

    /// # Errors
    /// `UnknownInstance` if no clone lives at `address`.
    pub fn instance_mut(&mut self, address: Address) -> Result<&mut PaymentPro> {
        self.instances
            .get_mut(&address)
            .ok_or(PaymentProError::UnknownInstance(address))
    }

    #[must_use]
    pub fn contains(&self, address: Address) -> bool {
        self.implementations.contains_key(&address) || self.instances.contains_key(&address)
    }

    /// Store an initialized clone.
    ///
    /// # Errors
    /// `Internal` if the address is already occupied.
    pub(crate) fn insert(&mut self, instance: PaymentPro) -> Result<()> {
        let address = instance.address();
        if self.contains(address) {
            return Err(PaymentProError::Internal(format!(
                "address {address} already occupied"
            )));
        }
        self.instances.insert(address, instance);
        Ok(())
    }

    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Clone addresses, sorted.
    #[must_use]
    pub fn instance_addresses(&self) -> Vec<Address> {
        let mut addresses: Vec<Address> = self.instances.keys().copied().collect();
        addresses.sort();
        addresses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let creator = Address::from_low_u64(7);
        let a = derive_address(b"d", creator, 0);
        assert_eq!(a, derive_address(b"d", creator, 0));
        assert_ne!(a, derive_address(b"d", creator, 1));
        assert_ne!(a, derive_address(b"e", creator, 0));
        assert_ne!(a, derive_address(b"d", Address::from_low_u64(8), 0));
        assert!(!a.is_zero());
    }

    #[test]
    fn implementations_get_distinct_addresses() {
        let mut host = CloneHost::new();
        let single = host.deploy_reference_implementation(AssetMode::TokenOnly);
        let dual = host.deploy_reference_implementation(AssetMode::Dual);
        assert_ne!(single, dual);
        assert_eq!(host.implementation(single).unwrap().mode, AssetMode::TokenOnly);
        assert_eq!(host.implementation(dual).unwrap().mode, AssetMode::Dual);
        assert!(host.contains(dual));
        assert_eq!(host.instance_count(), 0);
    }

    #[test]
    fn unknown_lookups() {
        let host = CloneHost::new();
        let missing = Address::from_low_u64(404);
        assert!(matches!(
            host.implementation(missing).unwrap_err(),
            PaymentProError::UnknownImplementation(a) if a == missing
        ));
        assert!(matches!(
            host.instance(missing).unwrap_err(),
            PaymentProError::UnknownInstance(_)
        ));
    }

    #[test]
    fn insert_rejects_occupied_address() {
        let mut host = CloneHost::new();
        let implementation = host.deploy_reference_implementation(AssetMode::TokenOnly);
        let squatter = PaymentPro::new_clone(implementation, implementation, AssetMode::TokenOnly);
        assert!(matches!(
            host.insert(squatter).unwrap_err(),
            PaymentProError::Internal(_)
        ));
    }
}
