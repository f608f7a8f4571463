//! Treasury sweeps.
//!
//! Moves collected balances out of an instance to an approved recipient.
//! The source token must be on the sweep-token allow-list and the recipient
//! on the sweep-recipient allow-list. Role gating and event emission are
//! the instance's job.

use paymentpro_types::{Address, PaymentProError, Result, require_positive};
use rust_decimal::Decimal;

use crate::allow_list::AllowListStore;
use crate::assets::AssetLedger;

/// How much of the held balance a sweep moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepAmount {
    FullBalance,
    Exact(Decimal),
}

/// Resolve a [`SweepAmount`] against the balance currently held.
///
/// # Errors
/// - `NoBalance` for a full-balance sweep of an empty balance
/// - `ZeroAmount` / `NegativeAmount` for a non-positive exact amount
/// - `InsufficientBalance` if the exact amount exceeds the balance
pub fn resolve_amount(request: SweepAmount, available: Decimal) -> Result<Decimal> {
    match request {
        SweepAmount::FullBalance => {
            if available <= Decimal::ZERO {
                return Err(PaymentProError::NoBalance);
            }
            Ok(available)
        }
        SweepAmount::Exact(amount) => {
            require_positive(amount)?;
            if amount > available {
                return Err(PaymentProError::InsufficientBalance {
                    needed: amount,
                    available,
                });
            }
            Ok(amount)
        }
    }
}

/// Transfer `token` held by `holder` to `recipient`. Returns the amount moved.
pub fn sweep_token<A: AssetLedger + ?Sized>(
    allow_lists: &AllowListStore,
    assets: &mut A,
    holder: Address,
    token: Address,
    recipient: Address,
    request: SweepAmount,
) -> Result<Decimal> {
    allow_lists.require_sweeping_token(token)?;
    allow_lists.require_sweep_recipient(recipient)?;
    let amount = resolve_amount(request, assets.token_balance(token, holder))?;
    assets
        .transfer(token, holder, recipient, amount)
        .map_err(|source| PaymentProError::TokenTransferFailed { token, source })?;
    Ok(amount)
}

/// Transfer the whole native balance of `holder` to `recipient`.
pub fn sweep_native<A: AssetLedger + ?Sized>(
    allow_lists: &AllowListStore,
    assets: &mut A,
    holder: Address,
    recipient: Address,
) -> Result<Decimal> {
    allow_lists.require_sweep_recipient(recipient)?;
    let amount = resolve_amount(SweepAmount::FullBalance, assets.native_balance(holder))?;
    assets
        .native_transfer(holder, recipient, amount)
        .map_err(PaymentProError::NativeTransferFailed)?;
    Ok(amount)
}
