//! A PaymentPRO contract instance.
//!
//! [`PaymentPro`] owns one instance's storage (roles, allow-lists, default
//! payment configuration, strict records, used references, event log) and
//! exposes every entry point.
//!
//! ## Atomicity
//!
//! Each entry point runs all of its checks before writing anything. Funds
//! move through the [`AssetLedger`] before the ledger state flips. The token
//! leg is pulled first; if the native leg then fails, the pull is reversed. A call that returns `Err`
//! leaves storage, the event log and the asset ledger as they were.
//!
//! ## Deployment
//!
//! - [`PaymentPro::deploy`]: direct deployment; setup happens immediately.
//! - [`PaymentPro::new_clone`] + [`PaymentPro::initialize_contract`]: clone
//!   storage starts uninitialized and accepts exactly one initialization.

use paymentpro_types::constants;
use paymentpro_types::{
    Address, AssetMode, DefaultPaymentConfig, InitParams, LedgerEvent, NewStrictPayment,
    PaymentProError, ReferenceHash, Result, Role, StrictPayment, require_native_amount,
    require_positive,
};
use rust_decimal::Decimal;

use crate::allow_list::{AllowListKind, AllowListStore};
use crate::assets::AssetLedger;
use crate::context::CallContext;
use crate::reference_ledger::ReferenceLedger;
use crate::roles::RoleRegistry;
use crate::sweep::{self, SweepAmount};
use crate::used_references::UsedReferences;

/// How an instance came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deployment {
    /// Deployed with its own code; set up by its constructor.
    Direct,
    /// Own storage, logic shared with a reference implementation.
    Clone { implementation: Address },
}

/// One contract instance.
#[derive(Debug, Clone)]
pub struct PaymentPro {
    address: Address,
    mode: AssetMode,
    deployment: Deployment,
    initialized: bool,
    roles: RoleRegistry,
    allow_lists: AllowListStore,
    /// `None` until setup.
    default_config: Option<DefaultPaymentConfig>,
    strict: ReferenceLedger,
    used: UsedReferences,
    events: Vec<LedgerEvent>,
}

impl PaymentPro {
    // =================================================================
    // Lifecycle
    // =================================================================

    /// Directly deploy an instance at `address`, running setup in place of
    /// a constructor.
    ///
    /// # Errors
    /// `ZeroAddress`, `ZeroAmount`, `NegativeAmount` or
    /// `NativeCurrencyDisabled` if `params` are invalid for `mode`.
    pub fn deploy(
        ctx: &CallContext,
        address: Address,
        mode: AssetMode,
        params: &InitParams,
    ) -> Result<Self> {
        let mut instance = Self::empty(address, mode, Deployment::Direct);
        instance.setup(ctx, params)?;
        Ok(instance)
    }

    /// Fresh, uninitialized clone storage at `address` running
    /// `implementation`'s logic.
    #[must_use]
    pub fn new_clone(address: Address, implementation: Address, mode: AssetMode) -> Self {
        Self::empty(address, mode, Deployment::Clone { implementation })
    }

    fn empty(address: Address, mode: AssetMode, deployment: Deployment) -> Self {
        Self {
            address,
            mode,
            deployment,
            initialized: false,
            roles: RoleRegistry::new(),
            allow_lists: AllowListStore::new(),
            default_config: None,
            strict: ReferenceLedger::new(),
            used: UsedReferences::new(),
            events: Vec::new(),
        }
    }

    /// One-time setup for clone storage. Callable by anyone, once.
    ///
    /// # Errors
    /// - `AlreadyInitialized` if setup already ran
    /// - validation errors from [`InitParams::validate`]
    pub fn initialize_contract(&mut self, ctx: &CallContext, params: &InitParams) -> Result<()> {
        if self.initialized {
            return Err(PaymentProError::AlreadyInitialized);
        }
        self.setup(ctx, params)
    }

    fn setup(&mut self, ctx: &CallContext, params: &InitParams) -> Result<()> {
        params.validate(self.mode)?;

        self.initialized = true;
        if self.roles.grant(Role::Admin, params.admin) {
            self.emit(LedgerEvent::RoleGranted {
                role: Role::Admin,
                account: params.admin,
                sender: ctx.caller,
            });
        }
        for (kind, address) in [
            (AllowListKind::PaymentToken, params.approved_payment_token),
            (AllowListKind::SweepingToken, params.approved_sweeping_token),
            (AllowListKind::SweepRecipient, params.approved_sweep_recipient),
        ] {
            let event = self.allow_lists.seed(kind, address);
            self.emit(event);
        }
        let config = params.default_payment_config();
        self.default_config = Some(config);
        self.emit(LedgerEvent::DefaultPaymentConfigAdjusted {
            token: config.token,
            token_amount: config.token_amount,
            eth_amount: config.eth_amount,
        });

        tracing::info!(
            ledger = constants::LEDGER_NAME,
            version = constants::VERSION,
            instance = %self.address,
            mode = %self.mode,
            admin = %params.admin,
            payment_token = %params.approved_payment_token,
            "Instance initialized"
        );
        Ok(())
    }

    // =================================================================
    // Role Registry
    // =================================================================

    /// Grant `role` to `account`. ADMIN only; a no-op if already held.
    pub fn grant_role(&mut self, ctx: &CallContext, role: Role, account: Address) -> Result<()> {
        self.roles.require(role.admin_role(), ctx.caller)?;
        if self.roles.grant(role, account) {
            tracing::info!(instance = %self.address, %role, %account, "Role granted");
            self.emit(LedgerEvent::RoleGranted {
                role,
                account,
                sender: ctx.caller,
            });
        }
        Ok(())
    }

    /// Revoke `role` from `account`. ADMIN only; a no-op if not held.
    pub fn revoke_role(&mut self, ctx: &CallContext, role: Role, account: Address) -> Result<()> {
        self.roles.require(role.admin_role(), ctx.caller)?;
        if self.roles.revoke(role, account) {
            tracing::info!(instance = %self.address, %role, %account, "Role revoked");
            self.emit(LedgerEvent::RoleRevoked {
                role,
                account,
                sender: ctx.caller,
            });
        }
        Ok(())
    }

    /// Drop `role` from the caller.
    pub fn renounce_role(&mut self, ctx: &CallContext, role: Role) {
        if self.roles.revoke(role, ctx.caller) {
            tracing::info!(instance = %self.address, %role, account = %ctx.caller, "Role renounced");
            self.emit(LedgerEvent::RoleRevoked {
                role,
                account: ctx.caller,
                sender: ctx.caller,
            });
        }
    }

    /// Whether `account` currently holds `role`.
    #[must_use]
    pub fn has_role(&self, role: Role, account: Address) -> bool {
        self.roles.has_role(role, account)
    }

    /// Every holder of `role`, sorted.
    #[must_use]
    pub fn role_members(&self, role: Role) -> Vec<Address> {
        self.roles.members(role)
    }

    // =================================================================
    // Allow-List Store
    // =================================================================

    /// Approve or unapprove `token` for payments. APPROVER only.
    pub fn set_approved_payment_token(
        &mut self,
        ctx: &CallContext,
        token: Address,
        approved: bool,
    ) -> Result<()> {
        self.set_allow_list(ctx, AllowListKind::PaymentToken, token, approved)
    }

    /// Approve or unapprove `token` as a sweep source. APPROVER only.
    pub fn set_approved_sweeping_token(
        &mut self,
        ctx: &CallContext,
        token: Address,
        approved: bool,
    ) -> Result<()> {
        self.set_allow_list(ctx, AllowListKind::SweepingToken, token, approved)
    }

    /// Approve or unapprove `recipient` for sweeps. APPROVER only.
    pub fn set_approved_sweep_recipient(
        &mut self,
        ctx: &CallContext,
        recipient: Address,
        approved: bool,
    ) -> Result<()> {
        self.set_allow_list(ctx, AllowListKind::SweepRecipient, recipient, approved)
    }

    fn set_allow_list(
        &mut self,
        ctx: &CallContext,
        kind: AllowListKind,
        address: Address,
        approved: bool,
    ) -> Result<()> {
        self.roles.require(Role::Approver, ctx.caller)?;
        let event = self.allow_lists.set(kind, address, approved)?;
        tracing::info!(instance = %self.address, list = %kind, %address, approved, "Allow-list updated");
        self.emit(event);
        Ok(())
    }

    /// Whether `token` may be used for payments.
    #[must_use]
    pub fn is_approved_payment_token(&self, token: Address) -> bool {
        self.allow_lists.is_approved(AllowListKind::PaymentToken, token)
    }

    /// Whether `token` may be swept.
    #[must_use]
    pub fn is_approved_sweeping_token(&self, token: Address) -> bool {
        self.allow_lists.is_approved(AllowListKind::SweepingToken, token)
    }

    /// Whether `recipient` may receive sweeps.
    #[must_use]
    pub fn is_approved_sweep_recipient(&self, recipient: Address) -> bool {
        self.allow_lists.is_approved(AllowListKind::SweepRecipient, recipient)
    }

    // =================================================================
    // Default payment configuration
    // =================================================================

    /// Overwrite the default payment configuration. PAYMENT_MANAGER only.
    ///
    /// # Errors
    /// - `NotPaymentManager`
    /// - `NotApprovedToken` if `token` is not an approved payment token
    /// - `ZeroAmount` / `NegativeAmount` for `token_amount`
    /// - `NegativeAmount` / `NativeCurrencyDisabled` for `eth_amount`
    pub fn set_default_payment_config(
        &mut self,
        ctx: &CallContext,
        token: Address,
        token_amount: Decimal,
        eth_amount: Decimal,
    ) -> Result<()> {
        self.roles.require(Role::PaymentManager, ctx.caller)?;
        self.allow_lists.require_payment_token(token)?;
        require_positive(token_amount)?;
        require_native_amount(self.mode, eth_amount)?;

        self.default_config = Some(DefaultPaymentConfig {
            token,
            token_amount,
            eth_amount,
        });
        tracing::info!(
            instance = %self.address,
            %token,
            %token_amount,
            %eth_amount,
            "Default payment config adjusted"
        );
        self.emit(LedgerEvent::DefaultPaymentConfigAdjusted {
            token,
            token_amount,
            eth_amount,
        });
        Ok(())
    }

    /// The configuration default payments settle against; `None` before setup.
    #[must_use]
    pub fn default_payment_config(&self) -> Option<DefaultPaymentConfig> {
        self.default_config
    }

    // =================================================================
    // Strict payments
    // =================================================================

    /// Reserve a reference for an exact expected payment. PAYMENT_MANAGER only.
    ///
    /// # Errors
    /// - `NotPaymentManager`
    /// - `ReferenceAlreadyReserved` if the reference has an active record
    /// - `NotApprovedToken` if the token is not an approved payment token
    /// - `ZeroAmount` / `NegativeAmount` for the token amount
    /// - `NegativeAmount` / `NativeCurrencyDisabled` for the eth amount
    pub fn create_strict_payment(
        &mut self,
        ctx: &CallContext,
        request: &NewStrictPayment,
    ) -> Result<ReferenceHash> {
        self.roles.require(Role::PaymentManager, ctx.caller)?;
        let hash = ReferenceHash::of(&request.reference);
        self.strict.ensure_unreserved(&hash)?;
        self.allow_lists.require_payment_token(request.token)?;
        require_positive(request.token_amount)?;
        require_native_amount(self.mode, request.eth_amount)?;

        self.strict.reserve(request)?;
        tracing::info!(
            instance = %self.address,
            reference = %hash,
            token = %request.token,
            amount = %request.token_amount,
            payer = %request.payer,
            enforce_payer = request.enforce_payer,
            "Strict payment reserved"
        );
        self.emit(LedgerEvent::PaymentReferenceCreated {
            reference_hash: hash,
            reference: request.reference.clone(),
            token: request.token,
            token_amount: request.token_amount,
            eth_amount: request.eth_amount,
            payer: request.payer,
            enforce_payer: request.enforce_payer,
        });
        Ok(hash)
    }

    /// Settle a reserved strict payment. Any caller, subject to payer
    /// enforcement.
    ///
    /// # Errors
    /// - `ReferenceNotReserved` if there is no active record
    /// - `NotApprovedToken` if the record's token has since been unapproved
    /// - `PayerMismatch` if the payer is enforced and the caller differs
    /// - `PaymentAlreadyComplete` if already settled
    /// - `IncorrectNativeAmount` / `NativeCurrencyDisabled` on a native
    ///   value mismatch
    /// - `TokenTransferFailed` / `NativeTransferFailed` if funds cannot move
    pub fn make_strict_payment<A: AssetLedger + ?Sized>(
        &mut self,
        ctx: &CallContext,
        assets: &mut A,
        reference: &str,
    ) -> Result<()> {
        let hash = ReferenceHash::of(reference);
        let record = self.strict.reserved(&hash)?;
        self.allow_lists.require_payment_token(record.token)?;
        if !record.accepts_payer(ctx.caller) {
            tracing::warn!(
                instance = %self.address,
                reference = %hash,
                expected = %record.payer,
                caller = %ctx.caller,
                "Strict payment rejected: payer mismatch"
            );
            return Err(PaymentProError::PayerMismatch {
                expected: record.payer,
                actual: ctx.caller,
            });
        }
        if record.complete {
            tracing::warn!(
                instance = %self.address,
                reference = %hash,
                caller = %ctx.caller,
                "Strict payment replay blocked"
            );
            return Err(PaymentProError::PaymentAlreadyComplete(hash));
        }
        self.check_native_value(ctx, record.eth_amount)?;

        let token = record.token;
        let token_amount = record.token_amount;
        let eth_amount = record.eth_amount;

        self.collect(ctx, assets, token, token_amount)?;
        self.strict.mark_complete(&hash)?;

        tracing::info!(
            instance = %self.address,
            reference = %hash,
            payer = %ctx.caller,
            %token,
            amount = %token_amount,
            "Strict payment received"
        );
        self.emit(LedgerEvent::StrictPaymentReceived {
            reference_hash: hash,
            reference: reference.to_string(),
            sender: ctx.caller,
            token,
            token_amount,
            eth_amount,
        });
        Ok(())
    }

    /// Delete an unsettled strict payment, freeing its reference.
    /// PAYMENT_MANAGER only.
    ///
    /// # Errors
    /// - `NotPaymentManager`
    /// - `ReferenceNotReserved` if there is no active record
    /// - `PaymentAlreadyComplete` if already settled
    pub fn delete_strict_payment(&mut self, ctx: &CallContext, reference: &str) -> Result<()> {
        self.roles.require(Role::PaymentManager, ctx.caller)?;
        let hash = ReferenceHash::of(reference);
        let released = self.strict.release(&hash)?;
        tracing::info!(instance = %self.address, reference = %hash, "Strict payment deleted");
        self.emit(LedgerEvent::PaymentReferenceDeleted {
            reference_hash: hash,
            reference: released.reference,
        });
        Ok(())
    }

    /// The strict record for `reference`, or the empty record if none exists.
    #[must_use]
    pub fn view_strict_payment_by_string_reference(&self, reference: &str) -> StrictPayment {
        self.strict.view(&ReferenceHash::of(reference))
    }

    /// Same as [`Self::view_strict_payment_by_string_reference`], keyed by hash.
    #[must_use]
    pub fn view_strict_payment_by_hashed_reference(&self, hash: &ReferenceHash) -> StrictPayment {
        self.strict.view(hash)
    }

    /// Strict records reserved but not yet settled.
    #[must_use]
    pub fn pending_strict_payments(&self) -> usize {
        self.strict.pending_count()
    }

    // =================================================================
    // Default / open payments
    // =================================================================

    /// Pay the current default configuration against an unreserved,
    /// unused reference.
    ///
    /// # Errors
    /// - `NotApprovedToken` if the configured token is not approved (or no
    ///   configuration exists yet)
    /// - `ReferenceReserved` if the reference is an active strict record
    /// - `ReferenceUsed` if the reference was already consumed
    /// - `IncorrectNativeAmount` / `NativeCurrencyDisabled` on a native
    ///   value mismatch
    /// - `TokenTransferFailed` / `NativeTransferFailed` if funds cannot move
    pub fn make_default_payment<A: AssetLedger + ?Sized>(
        &mut self,
        ctx: &CallContext,
        assets: &mut A,
        reference: &str,
    ) -> Result<()> {
        let Some(config) = self.default_config else {
            return Err(PaymentProError::NotApprovedToken(Address::ZERO));
        };
        self.allow_lists.require_payment_token(config.token)?;
        let hash = ReferenceHash::of(reference);
        self.ensure_reference_open(&hash)?;
        self.check_native_value(ctx, config.eth_amount)?;

        self.collect(ctx, assets, config.token, config.token_amount)?;
        self.used.mark_used(hash)?;

        tracing::info!(
            instance = %self.address,
            reference = %hash,
            payer = %ctx.caller,
            token = %config.token,
            amount = %config.token_amount,
            "Default payment received"
        );
        self.emit(LedgerEvent::DefaultPaymentReceived {
            reference_hash: hash,
            reference: reference.to_string(),
            sender: ctx.caller,
            token: config.token,
            token_amount: config.token_amount,
            eth_amount: config.eth_amount,
        });
        Ok(())
    }

    /// Pay a caller-chosen approved token and amount against an unreserved,
    /// unused reference.
    ///
    /// # Errors
    /// - `NotApprovedToken` if `token` is not an approved payment token
    /// - `ZeroAmount` / `NegativeAmount` for `amount`
    /// - `ReferenceReserved` if the reference is an active strict record
    /// - `ReferenceUsed` if the reference was already consumed
    /// - `NegativeAmount` / `NativeCurrencyDisabled` for `eth_amount`
    /// - `IncorrectNativeAmount` if the attached value differs from `eth_amount`
    /// - `TokenTransferFailed` / `NativeTransferFailed` if funds cannot move
    pub fn make_open_payment<A: AssetLedger + ?Sized>(
        &mut self,
        ctx: &CallContext,
        assets: &mut A,
        token: Address,
        amount: Decimal,
        eth_amount: Decimal,
        reference: &str,
    ) -> Result<()> {
        self.allow_lists.require_payment_token(token)?;
        require_positive(amount)?;
        let hash = ReferenceHash::of(reference);
        self.ensure_reference_open(&hash)?;
        require_native_amount(self.mode, eth_amount)?;
        self.check_native_value(ctx, eth_amount)?;

        self.collect(ctx, assets, token, amount)?;
        self.used.mark_used(hash)?;

        tracing::info!(
            instance = %self.address,
            reference = %hash,
            payer = %ctx.caller,
            %token,
            %amount,
            "Open payment received"
        );
        self.emit(LedgerEvent::OpenPaymentReceived {
            reference_hash: hash,
            reference: reference.to_string(),
            sender: ctx.caller,
            token,
            token_amount: amount,
            eth_amount,
        });
        Ok(())
    }

    /// Whether `reference` was consumed by a default or open payment.
    #[must_use]
    pub fn is_reference_used(&self, reference: &str) -> bool {
        self.used.is_used(&ReferenceHash::of(reference))
    }

    /// Default/open payments may only use a hash that is neither an active
    /// strict reservation nor already consumed.
    fn ensure_reference_open(&self, hash: &ReferenceHash) -> Result<()> {
        if self.strict.is_reserved(hash) {
            return Err(PaymentProError::ReferenceReserved(*hash));
        }
        if let Err(err) = self.used.ensure_unused(hash) {
            tracing::warn!(instance = %self.address, reference = %hash, "Reference reuse blocked");
            return Err(err);
        }
        Ok(())
    }

    // =================================================================
    // Treasury sweeps
    // =================================================================

    /// Sweep the instance's whole balance of `token`. SWEEPER only.
    pub fn sweep_token_by_full_balance<A: AssetLedger + ?Sized>(
        &mut self,
        ctx: &CallContext,
        assets: &mut A,
        token: Address,
        recipient: Address,
    ) -> Result<Decimal> {
        self.sweep_token(ctx, assets, token, recipient, SweepAmount::FullBalance)
    }

    /// Sweep exactly `amount` of `token`. SWEEPER only.
    pub fn sweep_token_by_amount<A: AssetLedger + ?Sized>(
        &mut self,
        ctx: &CallContext,
        assets: &mut A,
        token: Address,
        recipient: Address,
        amount: Decimal,
    ) -> Result<Decimal> {
        self.sweep_token(ctx, assets, token, recipient, SweepAmount::Exact(amount))
    }

    fn sweep_token<A: AssetLedger + ?Sized>(
        &mut self,
        ctx: &CallContext,
        assets: &mut A,
        token: Address,
        recipient: Address,
        request: SweepAmount,
    ) -> Result<Decimal> {
        self.roles.require(Role::Sweeper, ctx.caller)?;
        let amount = sweep::sweep_token(
            &self.allow_lists,
            assets,
            self.address,
            token,
            recipient,
            request,
        )?;
        tracing::info!(
            instance = %self.address,
            %token,
            %recipient,
            %amount,
            "Token swept"
        );
        self.emit(LedgerEvent::TokenSwept {
            recipient,
            sweeper: ctx.caller,
            token,
            amount,
        });
        Ok(amount)
    }

    /// Sweep the instance's whole native balance. SWEEPER only, dual-asset
    /// instances only.
    pub fn sweep_eth_by_full_balance<A: AssetLedger + ?Sized>(
        &mut self,
        ctx: &CallContext,
        assets: &mut A,
        recipient: Address,
    ) -> Result<Decimal> {
        if !self.mode.accepts_native() {
            return Err(PaymentProError::NativeCurrencyDisabled);
        }
        self.roles.require(Role::Sweeper, ctx.caller)?;
        let amount = sweep::sweep_native(&self.allow_lists, assets, self.address, recipient)?;
        tracing::info!(instance = %self.address, %recipient, %amount, "Native balance swept");
        self.emit(LedgerEvent::EthSwept {
            recipient,
            sweeper: ctx.caller,
            amount,
        });
        Ok(amount)
    }

    // =================================================================
    // Internals
    // =================================================================

    /// The attached native value must equal `expected` exactly.
    fn check_native_value(&self, ctx: &CallContext, expected: Decimal) -> Result<()> {
        require_native_amount(self.mode, ctx.value)?;
        if ctx.value != expected {
            tracing::warn!(
                instance = %self.address,
                caller = %ctx.caller,
                %expected,
                actual = %ctx.value,
                "Incorrect native amount"
            );
            return Err(PaymentProError::IncorrectNativeAmount {
                expected,
                actual: ctx.value,
            });
        }
        Ok(())
    }

    /// Pull `amount` of `token` and then the attached native value from the
    /// caller. If the native leg fails the token pull is reversed.
    fn collect<A: AssetLedger + ?Sized>(
        &self,
        ctx: &CallContext,
        assets: &mut A,
        token: Address,
        amount: Decimal,
    ) -> Result<()> {
        assets
            .transfer_from(token, self.address, ctx.caller, self.address, amount)
            .map_err(|source| PaymentProError::TokenTransferFailed { token, source })?;

        let native = ctx.value;
        if native.is_zero() {
            return Ok(());
        }
        if let Err(source) = assets.native_transfer(ctx.caller, self.address, native) {
            tracing::warn!(
                instance = %self.address,
                caller = %ctx.caller,
                %native,
                error = %source,
                "Native leg failed, reversing token pull"
            );
            assets
                .reverse_transfer_from(token, self.address, ctx.caller, self.address, amount)
                .map_err(|e| {
                    PaymentProError::Internal(format!(
                        "token pull reversal failed after native transfer error: {e}"
                    ))
                })?;
            return Err(PaymentProError::NativeTransferFailed(source));
        }
        Ok(())
    }

    fn emit(&mut self, event: LedgerEvent) {
        tracing::debug!(instance = %self.address, event = event.name(), "Event emitted");
        self.events.push(event);
    }

    // =================================================================
    // Accessors
    // =================================================================

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    #[must_use]
    pub fn mode(&self) -> AssetMode {
        self.mode
    }

    #[must_use]
    pub fn deployment(&self) -> Deployment {
        self.deployment
    }

    /// The shared implementation a clone runs, `None` for direct deployments.
    #[must_use]
    pub fn implementation(&self) -> Option<Address> {
        match self.deployment {
            Deployment::Direct => None,
            Deployment::Clone { implementation } => Some(implementation),
        }
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Every event emitted by successful calls, oldest first.
    #[must_use]
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetBook;

    const ADMIN: u64 = 1;
    const TOKEN: u64 = 10;
    const SWEEP_TOKEN: u64 = 11;
    const RECIPIENT: u64 = 12;
    const MANAGER: u64 = 20;
    const PAYER: u64 = 30;
    const INSTANCE: u64 = 1000;

    fn addr(n: u64) -> Address {
        Address::from_low_u64(n)
    }

    fn params() -> InitParams {
        InitParams {
            admin: addr(ADMIN),
            approved_payment_token: addr(TOKEN),
            approved_sweeping_token: addr(SWEEP_TOKEN),
            approved_sweep_recipient: addr(RECIPIENT),
            default_token_amount: Decimal::new(20, 0),
            default_eth_amount: Decimal::ZERO,
        }
    }

    fn deployed(mode: AssetMode) -> PaymentPro {
        let mut pro =
            PaymentPro::deploy(&CallContext::new(addr(ADMIN)), addr(INSTANCE), mode, &params())
                .unwrap();
        pro.grant_role(&CallContext::new(addr(ADMIN)), Role::PaymentManager, addr(MANAGER))
            .unwrap();
        pro
    }

    fn funded_book() -> AssetBook {
        let mut book = AssetBook::new();
        book.mint(addr(TOKEN), addr(PAYER), Decimal::new(10_000, 0));
        book.approve(addr(TOKEN), addr(PAYER), addr(INSTANCE), Decimal::new(10_000, 0));
        book
    }

    #[test]
    fn deploy_seeds_state() {
        let pro = deployed(AssetMode::TokenOnly);
        assert!(pro.is_initialized());
        assert_eq!(pro.deployment(), Deployment::Direct);
        assert!(pro.implementation().is_none());
        assert!(pro.has_role(Role::Admin, addr(ADMIN)));
        assert!(pro.is_approved_payment_token(addr(TOKEN)));
        assert!(pro.is_approved_sweeping_token(addr(SWEEP_TOKEN)));
        assert!(pro.is_approved_sweep_recipient(addr(RECIPIENT)));
        assert_eq!(
            pro.default_payment_config().unwrap().token_amount,
            Decimal::new(20, 0)
        );
    }

    #[test]
    fn deployed_instance_rejects_initialize() {
        let mut pro = deployed(AssetMode::TokenOnly);
        let err = pro
            .initialize_contract(&CallContext::new(addr(99)), &params())
            .unwrap_err();
        assert!(matches!(err, PaymentProError::AlreadyInitialized));
    }

    #[test]
    fn clone_initializes_once() {
        let mut pro = PaymentPro::new_clone(addr(INSTANCE), addr(500), AssetMode::Dual);
        assert!(!pro.is_initialized());
        assert!(pro.default_payment_config().is_none());
        assert_eq!(pro.implementation(), Some(addr(500)));

        pro.initialize_contract(&CallContext::new(addr(99)), &params())
            .unwrap();
        assert!(pro.is_initialized());
        let err = pro
            .initialize_contract(&CallContext::new(addr(99)), &params())
            .unwrap_err();
        assert!(matches!(err, PaymentProError::AlreadyInitialized));
    }

    #[test]
    fn failed_initialize_leaves_clone_pristine() {
        let mut pro = PaymentPro::new_clone(addr(INSTANCE), addr(500), AssetMode::TokenOnly);
        let mut bad = params();
        bad.default_token_amount = Decimal::ZERO;
        let err = pro
            .initialize_contract(&CallContext::new(addr(99)), &bad)
            .unwrap_err();
        assert!(matches!(err, PaymentProError::ZeroAmount));
        assert!(!pro.is_initialized());
        assert!(pro.events().is_empty());
        assert!(!pro.has_role(Role::Admin, addr(ADMIN)));
    }

    #[test]
    fn uninitialized_clone_rejects_default_payment() {
        let mut pro = PaymentPro::new_clone(addr(INSTANCE), addr(500), AssetMode::TokenOnly);
        let mut book = funded_book();
        let err = pro
            .make_default_payment(&CallContext::new(addr(PAYER)), &mut book, "R")
            .unwrap_err();
        assert!(matches!(err, PaymentProError::NotApprovedToken(a) if a.is_zero()));
    }

    #[test]
    fn strict_payment_roundtrip() {
        let mut pro = deployed(AssetMode::TokenOnly);
        let mut book = funded_book();
        let request = NewStrictPayment::new("INV-1", addr(TOKEN), Decimal::new(500, 0))
            .with_payer(addr(PAYER), true);
        let hash = pro
            .create_strict_payment(&CallContext::new(addr(MANAGER)), &request)
            .unwrap();
        assert_eq!(pro.pending_strict_payments(), 1);

        pro.make_strict_payment(&CallContext::new(addr(PAYER)), &mut book, "INV-1")
            .unwrap();
        let record = pro.view_strict_payment_by_hashed_reference(&hash);
        assert!(record.complete);
        assert_eq!(
            book.token_balance(addr(TOKEN), addr(INSTANCE)),
            Decimal::new(500, 0)
        );
        assert_eq!(pro.pending_strict_payments(), 0);
        assert_eq!(
            pro.events().last().map(LedgerEvent::name),
            Some("StrictPaymentReceived")
        );
    }

    #[test]
    fn token_only_rejects_native_value() {
        let mut pro = deployed(AssetMode::TokenOnly);
        let mut book = funded_book();
        book.fund_native(addr(PAYER), Decimal::ONE);
        let ctx = CallContext::new(addr(PAYER)).with_value(Decimal::ONE);
        let err = pro.make_default_payment(&ctx, &mut book, "R").unwrap_err();
        assert!(matches!(err, PaymentProError::NativeCurrencyDisabled));

        let err = pro
            .sweep_eth_by_full_balance(&CallContext::new(addr(ADMIN)), &mut book, addr(RECIPIENT))
            .unwrap_err();
        assert!(matches!(err, PaymentProError::NativeCurrencyDisabled));
    }

    #[test]
    fn failed_token_pull_moves_no_native_value() {
        let mut params = params();
        params.default_eth_amount = Decimal::ONE;
        let mut pro = PaymentPro::deploy(
            &CallContext::new(addr(ADMIN)),
            addr(INSTANCE),
            AssetMode::Dual,
            &params,
        )
        .unwrap();
        let mut book = AssetBook::new();
        book.fund_native(addr(PAYER), Decimal::TEN);
        book.reject_native_receipts(addr(PAYER));
        // no token balance or allowance: the token leg fails

        let ctx = CallContext::new(addr(PAYER)).with_value(Decimal::ONE);
        let err = pro.make_default_payment(&ctx, &mut book, "R").unwrap_err();
        assert!(matches!(err, PaymentProError::TokenTransferFailed { .. }));
        assert_eq!(book.native_balance(addr(PAYER)), Decimal::TEN);
        assert_eq!(book.native_balance(addr(INSTANCE)), Decimal::ZERO);
        assert!(!pro.is_reference_used("R"));
    }

    #[test]
    fn failed_native_leg_reverses_token_pull() {
        let mut params = params();
        params.default_eth_amount = Decimal::ONE;
        let mut pro = PaymentPro::deploy(
            &CallContext::new(addr(ADMIN)),
            addr(INSTANCE),
            AssetMode::Dual,
            &params,
        )
        .unwrap();
        let mut book = funded_book();
        book.fund_native(addr(PAYER), Decimal::TEN);
        book.reject_native_receipts(addr(INSTANCE));

        let ctx = CallContext::new(addr(PAYER)).with_value(Decimal::ONE);
        let err = pro.make_default_payment(&ctx, &mut book, "R").unwrap_err();
        assert!(matches!(err, PaymentProError::NativeTransferFailed(_)));
        assert_eq!(book.token_balance(addr(TOKEN), addr(PAYER)), Decimal::new(10_000, 0));
        assert_eq!(book.token_balance(addr(TOKEN), addr(INSTANCE)), Decimal::ZERO);
        assert_eq!(
            book.allowance(addr(TOKEN), addr(PAYER), addr(INSTANCE)),
            Decimal::new(10_000, 0)
        );
        assert_eq!(book.native_balance(addr(PAYER)), Decimal::TEN);
        assert!(!pro.is_reference_used("R"));
    }

    #[test]
    fn role_members_track_grants() {
        let mut pro = deployed(AssetMode::TokenOnly);
        let admin = CallContext::new(addr(ADMIN));
        pro.grant_role(&admin, Role::PaymentManager, addr(21)).unwrap();
        assert_eq!(
            pro.role_members(Role::PaymentManager),
            vec![addr(MANAGER), addr(21)]
        );
        pro.revoke_role(&admin, Role::PaymentManager, addr(MANAGER)).unwrap();
        assert_eq!(pro.role_members(Role::PaymentManager), vec![addr(21)]);
        assert_eq!(pro.role_members(Role::Admin), vec![addr(ADMIN)]);
    }

    #[test]
    fn renounce_drops_own_role() {
        let mut pro = deployed(AssetMode::TokenOnly);
        let manager = CallContext::new(addr(MANAGER));
        pro.renounce_role(&manager, Role::PaymentManager);
        assert!(!pro.has_role(Role::PaymentManager, addr(MANAGER)));
        let before = pro.events().len();
        pro.renounce_role(&manager, Role::PaymentManager);
        assert_eq!(pro.events().len(), before, "no-op renounce emits nothing");
    }
}
