//! Allow-list store.
//!
//! Three independent boolean lists: payment tokens, sweep-source tokens and
//! sweep recipients. Writes reject the zero address and writes that would
//! not change the stored value.

use std::collections::HashSet;

use paymentpro_types::{Address, LedgerEvent, PaymentProError, Result};

/// Which list an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllowListKind {
    PaymentToken,
    SweepingToken,
    SweepRecipient,
}

impl AllowListKind {
    /// The event announcing that `address` was (un)approved on this list.
    #[must_use]
    pub fn event(self, address: Address, approved: bool) -> LedgerEvent {
        match (self, approved) {
            (Self::PaymentToken, true) => LedgerEvent::ApprovedPaymentToken { token: address },
            (Self::PaymentToken, false) => LedgerEvent::UnapprovedPaymentToken { token: address },
            (Self::SweepingToken, true) => LedgerEvent::ApprovedSweepingToken { token: address },
            (Self::SweepingToken, false) => {
                LedgerEvent::UnapprovedSweepingToken { token: address }
            }
            (Self::SweepRecipient, true) => {
                LedgerEvent::ApprovedTokenSweepRecipient { recipient: address }
            }
            (Self::SweepRecipient, false) => {
                LedgerEvent::UnapprovedTokenSweepRecipient { recipient: address }
            }
        }
    }
}

impl std::fmt::Display for AllowListKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PaymentToken => write!(f, "payment_token"),
            Self::SweepingToken => write!(f, "sweeping_token"),
            Self::SweepRecipient => write!(f, "sweep_recipient"),
        }
    }
}

/// A single allow-list. Absent addresses are unapproved.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    approved: HashSet<Address>,
}

impl AllowList {
    #[must_use]
    pub fn is_approved(&self, address: Address) -> bool {
        self.approved.contains(&address)
    }

    /// Set the entry for `address`.
    ///
    /// # Errors
    /// - `ZeroAddress` if `address` is zero
    /// - `NoChange` if the entry already holds `approved`
    pub fn set(&mut self, address: Address, approved: bool) -> Result<()> {
        if address.is_zero() {
            return Err(PaymentProError::ZeroAddress);
        }
        let changed = if approved {
            self.approved.insert(address)
        } else {
            self.approved.remove(&address)
        };
        if changed {
            Ok(())
        } else {
            Err(PaymentProError::NoChange)
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.approved.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.approved.is_empty()
    }
}

/// The three allow-lists owned by one contract instance.
#[derive(Debug, Clone, Default)]
pub struct AllowListStore {
    payment_tokens: AllowList,
    sweeping_tokens: AllowList,
    sweep_recipients: AllowList,
}

impl AllowListStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn list(&self, kind: AllowListKind) -> &AllowList {
        match kind {
            AllowListKind::PaymentToken => &self.payment_tokens,
            AllowListKind::SweepingToken => &self.sweeping_tokens,
            AllowListKind::SweepRecipient => &self.sweep_recipients,
        }
    }

    fn list_mut(&mut self, kind: AllowListKind) -> &mut AllowList {
        match kind {
            AllowListKind::PaymentToken => &mut self.payment_tokens,
            AllowListKind::SweepingToken => &mut self.sweeping_tokens,
            AllowListKind::SweepRecipient => &mut self.sweep_recipients,
        }
    }

    #[must_use]
    pub fn is_approved(&self, kind: AllowListKind, address: Address) -> bool {
        self.list(kind).is_approved(address)
    }

    /// Set an entry and return the event describing the change.
    pub fn set(
        &mut self,
        kind: AllowListKind,
        address: Address,
        approved: bool,
    ) -> Result<LedgerEvent> {
        self.list_mut(kind).set(address, approved)?;
        Ok(kind.event(address, approved))
    }

    /// Approve `address` without the no-change check. Used only while
    /// seeding a fresh instance, where every list starts empty.
    pub(crate) fn seed(&mut self, kind: AllowListKind, address: Address) -> LedgerEvent {
        self.list_mut(kind).approved.insert(address);
        kind.event(address, true)
    }

    /// Guard: `token` must be an approved payment token.
    pub fn require_payment_token(&self, token: Address) -> Result<()> {
        if self.payment_tokens.is_approved(token) {
            Ok(())
        } else {
            Err(PaymentProError::NotApprovedToken(token))
        }
    }

    /// Guard: `token` must be an approved sweep-source token.
    pub fn require_sweeping_token(&self, token: Address) -> Result<()> {
        if self.sweeping_tokens.is_approved(token) {
            Ok(())
        } else {
            Err(PaymentProError::NotApprovedToken(token))
        }
    }

    /// Guard: `recipient` must be an approved sweep recipient.
    pub fn require_sweep_recipient(&self, recipient: Address) -> Result<()> {
        if self.sweep_recipients.is_approved(recipient) {
            Ok(())
        } else {
            Err(PaymentProError::NotApprovedRecipient(recipient))
        }
    }
}
