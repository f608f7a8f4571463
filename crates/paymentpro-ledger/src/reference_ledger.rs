//! Strict payment reservations.
//!
//! The ReferenceLedger maps a reference hash to at most one active
//! [`StrictPayment`]. A record is created in RESERVED state, moves to
//! SETTLED exactly once, or is released (deleted) while still RESERVED,
//! which frees the hash for reuse.
//!
//! Policy checks that depend on other stores (token approval, payer,
//! native amount) live in the instance; this module owns only the
//! per-hash state machine.

use std::collections::HashMap;

use paymentpro_types::{
    NewStrictPayment, PaymentProError, ReferenceHash, Result, StrictPayment, StrictPaymentState,
};

/// Active strict payment records keyed by reference hash.
#[derive(Debug, Clone, Default)]
pub struct ReferenceLedger {
    /// Only `exists == true` records are stored; deleting removes the entry.
    records: HashMap<ReferenceHash, StrictPayment>,
}

impl ReferenceLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `hash` currently has an active record (settled or not).
    #[must_use]
    pub fn is_reserved(&self, hash: &ReferenceHash) -> bool {
        self.records.contains_key(hash)
    }

    /// Guard for creation.
    ///
    /// # Errors
    /// Returns `ReferenceAlreadyReserved` if `hash` has an active record.
    pub fn ensure_unreserved(&self, hash: &ReferenceHash) -> Result<()> {
        if self.is_reserved(hash) {
            return Err(PaymentProError::ReferenceAlreadyReserved(*hash));
        }
        Ok(())
    }

    /// The active record for `hash`.
    ///
    /// # Errors
    /// Returns `ReferenceNotReserved` if there is none.
    pub fn reserved(&self, hash: &ReferenceHash) -> Result<&StrictPayment> {
        self.records
            .get(hash)
            .ok_or(PaymentProError::ReferenceNotReserved(*hash))
    }

    /// Store a new RESERVED record built from `request`.
    ///
    /// # Errors
    /// Returns `ReferenceAlreadyReserved` if the hash is taken.
    pub fn reserve(&mut self, request: &NewStrictPayment) -> Result<&StrictPayment> {
        let hash = ReferenceHash::of(&request.reference);
        self.ensure_unreserved(&hash)?;
        let record = StrictPayment {
            reference: request.reference.clone(),
            reference_hash: hash,
            token: request.token,
            token_amount: request.token_amount,
            eth_amount: request.eth_amount,
            payer: request.payer,
            enforce_payer: request.enforce_payer,
            complete: false,
            exists: true,
        };
        let stored: &StrictPayment = self.records.entry(hash).or_insert(record);
        Ok(stored)
    }

    /// RESERVED → SETTLED.
    ///
    /// # Errors
    /// - `ReferenceNotReserved` if there is no active record
    /// - `PaymentAlreadyComplete` if it was already settled
    pub fn mark_complete(&mut self, hash: &ReferenceHash) -> Result<()> {
        let record = self
            .records
            .get_mut(hash)
            .ok_or(PaymentProError::ReferenceNotReserved(*hash))?;
        if record.complete {
            return Err(PaymentProError::PaymentAlreadyComplete(*hash));
        }
        record.complete = true;
        Ok(())
    }

    /// Delete a RESERVED record, returning it.
    ///
    /// # Errors
    /// - `ReferenceNotReserved` if there is no active record
    /// - `PaymentAlreadyComplete` if it was already settled
    pub fn release(&mut self, hash: &ReferenceHash) -> Result<StrictPayment> {
        let record = self.reserved(hash)?;
        if record.complete {
            return Err(PaymentProError::PaymentAlreadyComplete(*hash));
        }
        self.records
            .remove(hash)
            .ok_or(PaymentProError::ReferenceNotReserved(*hash))
    }

    /// The full record for `hash`, or the empty `exists == false` record.
    #[must_use]
    pub fn view(&self, hash: &ReferenceHash) -> StrictPayment {
        self.records.get(hash).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn state(&self, hash: &ReferenceHash) -> StrictPaymentState {
        self.records
            .get(hash)
            .map_or(StrictPaymentState::Unreserved, StrictPayment::state)
    }

    /// Number of active records (reserved or settled).
    #[must_use]
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Number of records awaiting settlement.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.records.values().filter(|r| !r.complete).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paymentpro_types::Address;
    use rust_decimal::Decimal;

    fn request(reference: &str) -> NewStrictPayment {
        NewStrictPayment::new(reference, Address::from_low_u64(1), Decimal::new(500, 0))
            .with_payer(Address::from_low_u64(2), true)
    }

    #[test]
    fn reserve_creates_active_record() {
        let mut ledger = ReferenceLedger::new();
        let record = ledger.reserve(&request("REF1")).unwrap().clone();
        assert!(record.exists);
        assert!(!record.complete);
        assert_eq!(record.reference_hash, ReferenceHash::of("REF1"));
        assert_eq!(record.token_amount, Decimal::new(500, 0));
        assert_eq!(ledger.state(&record.reference_hash), StrictPaymentState::Reserved);
        assert_eq!(ledger.count(), 1);
        assert_eq!(ledger.pending_count(), 1);
    }

    #[test]
    fn double_reserve_blocked() {
        let mut ledger = ReferenceLedger::new();
        ledger.reserve(&request("REF1")).unwrap();
        let err = ledger.reserve(&request("REF1")).unwrap_err();
        assert!(matches!(err, PaymentProError::ReferenceAlreadyReserved(_)));
    }

    #[test]
    fn complete_once() {
        let mut ledger = ReferenceLedger::new();
        let hash = ReferenceHash::of("REF1");
        ledger.reserve(&request("REF1")).unwrap();
        ledger.mark_complete(&hash).unwrap();
        assert_eq!(ledger.state(&hash), StrictPaymentState::Settled);
        assert_eq!(ledger.pending_count(), 0);

        let err = ledger.mark_complete(&hash).unwrap_err();
        assert!(matches!(err, PaymentProError::PaymentAlreadyComplete(_)));
    }

    #[test]
    fn release_frees_hash() {
        let mut ledger = ReferenceLedger::new();
        let hash = ReferenceHash::of("REF1");
        ledger.reserve(&request("REF1")).unwrap();
        let released = ledger.release(&hash).unwrap();
        assert_eq!(released.reference, "REF1");
        assert!(!ledger.is_reserved(&hash));
        assert!(!ledger.view(&hash).exists);

        ledger.reserve(&request("REF1")).unwrap();
        assert!(ledger.is_reserved(&hash));
    }

    #[test]
    fn settled_cannot_be_released() {
        let mut ledger = ReferenceLedger::new();
        let hash = ReferenceHash::of("REF1");
        ledger.reserve(&request("REF1")).unwrap();
        ledger.mark_complete(&hash).unwrap();
        let err = ledger.release(&hash).unwrap_err();
        assert!(matches!(err, PaymentProError::PaymentAlreadyComplete(_)));
        assert!(ledger.is_reserved(&hash));
    }

    #[test]
    fn unknown_hash_errors() {
        let mut ledger = ReferenceLedger::new();
        let hash = ReferenceHash::of("nope");
        assert!(matches!(
            ledger.mark_complete(&hash).unwrap_err(),
            PaymentProError::ReferenceNotReserved(_)
        ));
        assert!(matches!(
            ledger.release(&hash).unwrap_err(),
            PaymentProError::ReferenceNotReserved(_)
        ));
        assert_eq!(ledger.view(&hash), StrictPayment::default());
    }
}
