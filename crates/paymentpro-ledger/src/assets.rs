//! External asset primitives.
//!
//! The ledger never holds balances itself. Token pulls, token pushes and
//! native-currency transfers go through an [`AssetLedger`], the boundary to
//! the fungible-token contracts and the native currency. Any `Err` from the
//! primitive aborts the calling entry point.
//!
//! [`AssetBook`] is an in-memory implementation with allowance-then-pull
//! semantics, used by the factory host and the test suites.

use std::collections::{HashMap, HashSet};

use paymentpro_types::{Address, TransferFailure};
use rust_decimal::Decimal;

/// Allowance/transfer token interface plus direct native-currency transfer.
pub trait AssetLedger {
    /// Token balance held by `owner`.
    fn token_balance(&self, token: Address, owner: Address) -> Decimal;

    /// Pull `amount` of `token` from `from` to `to`, spending `spender`'s
    /// allowance.
    fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: Decimal,
    ) -> Result<(), TransferFailure>;

    /// Undo a [`Self::transfer_from`] made earlier in the same call:
    /// `amount` goes back from `to` to `from` and `spender`'s allowance is
    /// restored.
    fn reverse_transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: Decimal,
    ) -> Result<(), TransferFailure>;

    /// Push `amount` of `token` held by `from` to `to`.
    fn transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: Decimal,
    ) -> Result<(), TransferFailure>;

    /// Native-currency balance held by `owner`.
    fn native_balance(&self, owner: Address) -> Decimal;

    /// Move `amount` of native currency from `from` to `to`.
    fn native_transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: Decimal,
    ) -> Result<(), TransferFailure>;
}

/// In-memory balances and allowances for any number of tokens.
///
/// Each operation checks everything it needs before touching a balance,
/// so a failed transfer leaves the book unchanged.
#[derive(Debug, Clone, Default)]
pub struct AssetBook {
    /// Per-(token, owner) balances.
    token_balances: HashMap<(Address, Address), Decimal>,
    /// Per-(token, owner, spender) allowances.
    allowances: HashMap<(Address, Address, Address), Decimal>,
    native_balances: HashMap<Address, Decimal>,
    /// Tokens whose transfers currently return a non-success result.
    halted_tokens: HashSet<Address>,
    /// Accounts that refuse incoming native currency.
    native_rejecting: HashSet<Address>,
}

impl AssetBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` of `token` to `to` out of thin air.
    pub fn mint(&mut self, token: Address, to: Address, amount: Decimal) {
        *self.token_balances.entry((token, to)).or_default() += amount;
    }

    /// Credit `amount` of native currency to `to`.
    pub fn fund_native(&mut self, to: Address, amount: Decimal) {
        *self.native_balances.entry(to).or_default() += amount;
    }

    /// Set `spender`'s allowance over `owner`'s `token`, replacing any
    /// previous value.
    pub fn approve(&mut self, token: Address, owner: Address, spender: Address, amount: Decimal) {
        self.allowances.insert((token, owner, spender), amount);
    }

    #[must_use]
    pub fn allowance(&self, token: Address, owner: Address, spender: Address) -> Decimal {
        self.allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or_default()
    }

    /// Make every transfer of `token` fail until [`Self::resume_token`].
    pub fn halt_token(&mut self, token: Address) {
        self.halted_tokens.insert(token);
    }

    pub fn resume_token(&mut self, token: Address) {
        self.halted_tokens.remove(&token);
    }

    /// Make `account` reject incoming native transfers.
    pub fn reject_native_receipts(&mut self, account: Address) {
        self.native_rejecting.insert(account);
    }

    /// Total supply of `token` across all holders.
    #[must_use]
    pub fn token_supply(&self, token: Address) -> Decimal {
        self.token_balances
            .iter()
            .filter(|((t, _), _)| *t == token)
            .map(|(_, amount)| *amount)
            .sum()
    }

    fn debit_token(
        &mut self,
        token: Address,
        from: Address,
        amount: Decimal,
    ) -> Result<(), TransferFailure> {
        let available = self.token_balance(token, from);
        if available < amount {
            return Err(TransferFailure::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        self.token_balances.insert((token, from), available - amount);
        Ok(())
    }
}

impl AssetLedger for AssetBook {
    fn token_balance(&self, token: Address, owner: Address) -> Decimal {
        self.token_balances
            .get(&(token, owner))
            .copied()
            .unwrap_or_default()
    }

    fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: Decimal,
    ) -> Result<(), TransferFailure> {
        if self.halted_tokens.contains(&token) {
            return Err(TransferFailure::Rejected);
        }
        let allowed = self.allowance(token, from, spender);
        if allowed < amount {
            return Err(TransferFailure::InsufficientAllowance {
                needed: amount,
                allowed,
            });
        }
        self.debit_token(token, from, amount)?;
        self.allowances.insert((token, from, spender), allowed - amount);
        self.mint(token, to, amount);
        Ok(())
    }

    fn reverse_transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: Decimal,
    ) -> Result<(), TransferFailure> {
        self.debit_token(token, to, amount)?;
        self.mint(token, from, amount);
        *self.allowances.entry((token, from, spender)).or_default() += amount;
        Ok(())
    }

    fn transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: Decimal,
    ) -> Result<(), TransferFailure> {
        if self.halted_tokens.contains(&token) {
            return Err(TransferFailure::Rejected);
        }
        self.debit_token(token, from, amount)?;
        self.mint(token, to, amount);
        Ok(())
    }

    fn native_balance(&self, owner: Address) -> Decimal {
        self.native_balances.get(&owner).copied().unwrap_or_default()
    }

    fn native_transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: Decimal,
    ) -> Result<(), TransferFailure> {
        if self.native_rejecting.contains(&to) {
            return Err(TransferFailure::Rejected);
        }
        let available = self.native_balance(from);
        if available < amount {
            return Err(TransferFailure::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        self.native_balances.insert(from, available - amount);
        self.fund_native(to, amount);
        Ok(())
    }
}
