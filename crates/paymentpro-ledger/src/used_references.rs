//! Used-reference guard for default and open payments.
//!
//! Each reference hash can back at most one default or open payment.
//! Marking a hash a second time returns [`PaymentProError::ReferenceUsed`].
//! Entries are never evicted: forgetting one would re-open it for replay.

use std::collections::HashSet;

use paymentpro_types::{PaymentProError, ReferenceHash, Result};

/// Reference hashes already consumed by a default or open payment.
#[derive(Debug, Clone, Default)]
pub struct UsedReferences {
    used: HashSet<ReferenceHash>,
}

impl UsedReferences {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Guard without marking.
    ///
    /// # Errors
    /// Returns `ReferenceUsed` if `hash` was already consumed.
    pub fn ensure_unused(&self, hash: &ReferenceHash) -> Result<()> {
        if self.used.contains(hash) {
            return Err(PaymentProError::ReferenceUsed(*hash));
        }
        Ok(())
    }

    /// Consume `hash`.
    ///
    /// # Errors
    /// Returns `ReferenceUsed` if `hash` was already consumed.
    pub fn mark_used(&mut self, hash: ReferenceHash) -> Result<()> {
        if !self.used.insert(hash) {
            return Err(PaymentProError::ReferenceUsed(hash));
        }
        Ok(())
    }

    #[must_use]
    pub fn is_used(&self, hash: &ReferenceHash) -> bool {
        self.used.contains(hash)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.used.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_use_ok() {
        let mut used = UsedReferences::new();
        let hash = ReferenceHash::of("order-1");
        assert!(used.ensure_unused(&hash).is_ok());
        used.mark_used(hash).unwrap();
        assert!(used.is_used(&hash));
        assert_eq!(used.len(), 1);
    }

    #[test]
    fn reuse_blocked() {
        let mut used = UsedReferences::new();
        let hash = ReferenceHash::of("order-1");
        used.mark_used(hash).unwrap();

        let err = used.mark_used(hash).unwrap_err();
        assert!(
            matches!(err, PaymentProError::ReferenceUsed(h) if h == hash),
            "Expected ReferenceUsed, got: {err:?}"
        );
        assert!(matches!(
            used.ensure_unused(&hash).unwrap_err(),
            PaymentProError::ReferenceUsed(_)
        ));
    }

    #[test]
    fn no_eviction_under_load() {
        let mut used = UsedReferences::new();
        for i in 0..1_000 {
            used.mark_used(ReferenceHash::of(&format!("ref-{i}"))).unwrap();
        }
        assert_eq!(used.len(), 1_000);
        assert!(used.is_used(&ReferenceHash::of("ref-0")));
    }

    #[test]
    fn empty_guard() {
        let used = UsedReferences::new();
        assert!(used.is_empty());
        assert!(!used.is_used(&ReferenceHash::of("x")));
    }
}
