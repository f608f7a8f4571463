//! Access-control roles.
//!
//! Roles are flat capability tags: holding one never implies holding another.
//! [`Role::Admin`] is the grant authority for every role, itself included.

use serde::{Deserialize, Serialize};

/// A permission tag held by zero or more addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Grants and revokes every role.
    Admin,
    /// Maintains the payment-token, sweep-token and sweep-recipient allow-lists.
    Approver,
    /// Withdraws collected balances to approved recipients.
    Sweeper,
    /// Creates and deletes strict payments, sets the default payment config.
    PaymentManager,
}

impl Role {
    pub const ALL: [Self; 4] = [
        Self::Admin,
        Self::Approver,
        Self::Sweeper,
        Self::PaymentManager,
    ];

    /// The role that may grant and revoke `self`.
    #[must_use]
    pub fn admin_role(self) -> Self {
        Self::Admin
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "ADMIN"),
            Self::Approver => write!(f, "APPROVER"),
            Self::Sweeper => write!(f, "SWEEPER"),
            Self::PaymentManager => write!(f, "PAYMENT_MANAGER"),
        }
    }
}
