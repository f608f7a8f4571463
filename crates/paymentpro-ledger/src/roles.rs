//! Role registry.
//!
//! Membership is a capability set per role. Grants and revokes are
//! idempotent: they report whether membership actually changed so the
//! caller can decide whether to emit an event.

use std::collections::{HashMap, HashSet};

use paymentpro_types::{Address, PaymentProError, Result, Role};

/// Role membership for one contract instance.
#[derive(Debug, Clone, Default)]
pub struct RoleRegistry {
    members: HashMap<Role, HashSet<Address>>,
}

impl RoleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn has_role(&self, role: Role, account: Address) -> bool {
        self.members
            .get(&role)
            .is_some_and(|set| set.contains(&account))
    }

    /// Add `account` to `role`. Returns `true` if it was not already a member.
    pub fn grant(&mut self, role: Role, account: Address) -> bool {
        self.members.entry(role).or_default().insert(account)
    }

    /// Remove `account` from `role`. Returns `true` if it was a member.
    pub fn revoke(&mut self, role: Role, account: Address) -> bool {
        self.members
            .get_mut(&role)
            .is_some_and(|set| set.remove(&account))
    }

    /// Members of `role`, sorted for stable output.
    #[must_use]
    pub fn members(&self, role: Role) -> Vec<Address> {
        let mut members: Vec<Address> = self
            .members
            .get(&role)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        members.sort();
        members
    }

    /// Guard an operation gated on `role`.
    ///
    /// # Errors
    /// The role-specific rejection: `NotApprover`, `NotSweeper`,
    /// `NotPaymentManager`, or `Unauthorized` for ADMIN-gated operations.
    pub fn require(&self, role: Role, account: Address) -> Result<()> {
        if self.has_role(role, account) {
            return Ok(());
        }
        Err(match role {
            Role::Admin => PaymentProError::Unauthorized { account, role },
            Role::Approver => PaymentProError::NotApprover,
            Role::Sweeper => PaymentProError::NotSweeper,
            Role::PaymentManager => PaymentProError::NotPaymentManager,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grant_and_revoke() {
        let mut roles = RoleRegistry::new();
        let user = Address::from_low_u64(1);
        assert!(!roles.has_role(Role::Sweeper, user));

        assert!(roles.grant(Role::Sweeper, user));
        assert!(roles.has_role(Role::Sweeper, user));
        assert!(!roles.grant(Role::Sweeper, user), "second grant is a no-op");

        assert!(roles.revoke(Role::Sweeper, user));
        assert!(!roles.has_role(Role::Sweeper, user));
        assert!(!roles.revoke(Role::Sweeper, user), "second revoke is a no-op");
    }

    #[test]
    fn roles_are_independent() {
        let mut roles = RoleRegistry::new();
        let user = Address::from_low_u64(1);
        roles.grant(Role::Admin, user);
        for role in [Role::Approver, Role::Sweeper, Role::PaymentManager] {
            assert!(!roles.has_role(role, user), "ADMIN must not imply {role}");
        }
    }

    #[test]
    fn require_maps_role_to_error() {
        let roles = RoleRegistry::new();
        let user = Address::from_low_u64(1);
        assert!(matches!(
            roles.require(Role::Approver, user).unwrap_err(),
            PaymentProError::NotApprover
        ));
        assert!(matches!(
            roles.require(Role::Sweeper, user).unwrap_err(),
            PaymentProError::NotSweeper
        ));
        assert!(matches!(
            roles.require(Role::PaymentManager, user).unwrap_err(),
            PaymentProError::NotPaymentManager
        ));
        assert!(matches!(
            roles.require(Role::Admin, user).unwrap_err(),
            PaymentProError::Unauthorized { role: Role::Admin, .. }
        ));
    }

    #[test]
    fn members_sorted() {
        let mut roles = RoleRegistry::new();
        roles.grant(Role::Approver, Address::from_low_u64(3));
        roles.grant(Role::Approver, Address::from_low_u64(1));
        assert_eq!(
            roles.members(Role::Approver),
            vec![Address::from_low_u64(1), Address::from_low_u64(3)]
        );
        assert!(roles.members(Role::Sweeper).is_empty());
    }
}
