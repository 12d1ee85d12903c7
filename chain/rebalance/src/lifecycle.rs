//! Lifecycle controller — the four-state rebalance machine
//!
//! `TreasuryRebalance` exclusively owns the participant lists, the
//! status, and the memo. The owner principal is the only mutator; any
//! principal may call `approve` while the contract is in `Registered`.
//! Guards run before any mutation, so a failing operation leaves every
//! field unchanged and emits nothing.
//!
//! ```text
//! Initialized ─finalize_registration→ Registered ─finalize_approval→ Approved ─finalize_contract→ Finalized
//!      ▲                                  │                              │
//!      └───────────── reset ──────────────┴──────────────────────────────┘
//! ```
//!
//! `reset` is accepted from any non-Finalized state while the current
//! height is below the rebalance height.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use types::address::Address;
use types::numeric::Amount;

use crate::adapter::LedgerAdapter;
use crate::approval;
use crate::errors::RebalanceError;
use crate::events::{
    Approved, ContractDeployed, ContractEvent, Finalized, NewbieRegistered, NewbieRemoved,
    OwnershipTransferred, RetiredRegistered, RetiredRemoved, StatusChanged,
};
use crate::registry::{Newbie, Registry, Retiree};

/// Lifecycle status. Monotonic except via `reset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Status {
    Initialized = 0,
    Registered = 1,
    Approved = 2,
    Finalized = 3,
}

impl Status {
    /// Wire representation (uint8).
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Initialized),
            1 => Some(Self::Registered),
            2 => Some(Self::Approved),
            3 => Some(Self::Finalized),
            _ => None,
        }
    }
}

/// The treasury rebalance coordination core.
///
/// Conceptual persisted state is
/// `{ owner, status, rebalance_height, memo, retirees[], newbies[] }`,
/// with an append-only event log ordered identically to mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreasuryRebalance {
    owner: Address,
    status: Status,
    rebalance_height: Amount,
    deployed_height: Amount,
    memo: String,
    registry: Registry,
    events: Vec<ContractEvent>,
}

impl TreasuryRebalance {
    /// Deploy the core.
    ///
    /// Emits `OwnershipTransferred(zero, owner)` followed by
    /// `ContractDeployed`, in that order.
    pub fn new(owner: Address, rebalance_height: Amount, deployed_height: Amount) -> Self {
        let mut core = Self {
            owner,
            status: Status::Initialized,
            rebalance_height,
            deployed_height,
            memo: String::new(),
            registry: Registry::new(),
            events: Vec::new(),
        };
        core.emit(ContractEvent::OwnershipTransferred(OwnershipTransferred {
            previous_owner: Address::ZERO,
            new_owner: owner,
        }));
        core.emit(ContractEvent::ContractDeployed(ContractDeployed {
            status: core.status,
            rebalance_block_number: rebalance_height,
            deployed_block_number: deployed_height,
        }));
        info!(%owner, %rebalance_height, %deployed_height, "Treasury rebalance deployed");
        core
    }

    // ───────────────────────── Guards ─────────────────────────

    fn ensure_owner(&self, caller: Address) -> Result<(), RebalanceError> {
        if caller != self.owner || self.owner.is_zero() {
            return Err(RebalanceError::NotOwner { caller });
        }
        Ok(())
    }

    fn ensure_status(&self, expected: Status) -> Result<(), RebalanceError> {
        if self.status != expected {
            return Err(RebalanceError::WrongStatus {
                expected,
                actual: self.status,
            });
        }
        Ok(())
    }

    fn emit(&mut self, event: ContractEvent) {
        self.events.push(event);
    }

    // ───────────────────────── Registry ops ─────────────────────────

    /// Register a retiree. Owner-only, Initialized-only.
    pub fn register_retired(
        &mut self,
        caller: Address,
        retired: Address,
    ) -> Result<(), RebalanceError> {
        self.ensure_owner(caller)?;
        self.ensure_status(Status::Initialized)?;
        self.registry.register_retired(retired)?;
        self.emit(ContractEvent::RetiredRegistered(RetiredRegistered { retired }));
        debug!(%retired, "Retiree registered");
        Ok(())
    }

    /// Remove a retiree by swap-with-last. Owner-only, Initialized-only.
    pub fn remove_retired(
        &mut self,
        caller: Address,
        retired: Address,
    ) -> Result<(), RebalanceError> {
        self.ensure_owner(caller)?;
        self.ensure_status(Status::Initialized)?;
        self.registry.remove_retired(retired)?;
        self.emit(ContractEvent::RetiredRemoved(RetiredRemoved { retired }));
        debug!(%retired, "Retiree removed");
        Ok(())
    }

    /// Register a newbie with its allocation. Owner-only, Initialized-only.
    pub fn register_newbie(
        &mut self,
        caller: Address,
        newbie: Address,
        amount: Amount,
    ) -> Result<(), RebalanceError> {
        self.ensure_owner(caller)?;
        self.ensure_status(Status::Initialized)?;
        self.registry.register_newbie(newbie, amount)?;
        self.emit(ContractEvent::NewbieRegistered(NewbieRegistered {
            newbie,
            fund_allocation: amount,
        }));
        debug!(%newbie, %amount, "Newbie registered");
        Ok(())
    }

    /// Remove a newbie by swap-with-last. Owner-only, Initialized-only.
    pub fn remove_newbie(
        &mut self,
        caller: Address,
        newbie: Address,
    ) -> Result<(), RebalanceError> {
        self.ensure_owner(caller)?;
        self.ensure_status(Status::Initialized)?;
        self.registry.remove_newbie(newbie)?;
        self.emit(ContractEvent::NewbieRemoved(NewbieRemoved { newbie }));
        debug!(%newbie, "Newbie removed");
        Ok(())
    }

    // ───────────────────────── Approval ─────────────────────────

    /// Endorse a retiree. Any principal, Registered-only.
    ///
    /// The caller is authorized by classifying the retiree through the
    /// adapter: plain accounts approve themselves, contract accounts are
    /// approved by their current admin set.
    pub fn approve(
        &mut self,
        caller: Address,
        retired: Address,
        adapter: &impl LedgerAdapter,
    ) -> Result<(), RebalanceError> {
        self.ensure_status(Status::Registered)?;
        if !self.registry.retired_exists(retired) {
            return Err(RebalanceError::NotRegistered { address: retired });
        }
        approval::authorize_approver(adapter, retired, caller)?;
        let approvers_count = self.registry.add_approver(retired, caller)?;
        self.emit(ContractEvent::Approved(Approved {
            retired,
            approver: caller,
            approvers_count,
        }));
        info!(%retired, approver = %caller, %approvers_count, "Retiree approved");
        Ok(())
    }

    /// Public quorum check, as used inside `finalize_approval`.
    pub fn check_retirees_approved(
        &self,
        adapter: &impl LedgerAdapter,
    ) -> Result<(), RebalanceError> {
        approval::check_retirees_approved(adapter, &self.registry)
    }

    // ───────────────────────── Transitions ─────────────────────────

    /// Initialized → Registered. Owner-only; no content checks.
    pub fn finalize_registration(&mut self, caller: Address) -> Result<(), RebalanceError> {
        self.ensure_owner(caller)?;
        self.ensure_status(Status::Initialized)?;
        self.status = Status::Registered;
        self.emit(ContractEvent::StatusChanged(StatusChanged {
            status: self.status,
        }));
        info!(status = ?self.status, "Registration finalized");
        Ok(())
    }

    /// Registered → Approved. Owner-only.
    ///
    /// Runs the conservation gate (total newbie allocation must not
    /// exceed the live sum of retiree balances) and the approval gate.
    pub fn finalize_approval(
        &mut self,
        caller: Address,
        adapter: &impl LedgerAdapter,
    ) -> Result<(), RebalanceError> {
        self.ensure_owner(caller)?;
        self.ensure_status(Status::Registered)?;

        let allocated = self.registry.total_newbie_amount()?;
        let available = self.sum_of_retired_balance(adapter)?;
        if allocated > available {
            return Err(RebalanceError::InsufficientTreasury {
                allocated,
                available,
            });
        }
        approval::check_retirees_approved(adapter, &self.registry)?;

        self.status = Status::Approved;
        self.emit(ContractEvent::StatusChanged(StatusChanged {
            status: self.status,
        }));
        info!(status = ?self.status, %allocated, %available, "Approval finalized");
        Ok(())
    }

    /// Approved → Finalized. Owner-only; terminal.
    ///
    /// The current ledger height must have reached the rebalance height.
    /// Records the memo exactly once.
    pub fn finalize_contract(
        &mut self,
        caller: Address,
        memo: impl Into<String>,
        adapter: &impl LedgerAdapter,
    ) -> Result<(), RebalanceError> {
        self.ensure_owner(caller)?;
        self.ensure_status(Status::Approved)?;

        let current = adapter.current_height()?;
        if current < self.rebalance_height {
            return Err(RebalanceError::Premature {
                current,
                rebalance: self.rebalance_height,
            });
        }

        self.memo = memo.into();
        self.status = Status::Finalized;
        self.emit(ContractEvent::Finalized(Finalized {
            memo: self.memo.clone(),
            status: self.status,
        }));
        info!(memo = %self.memo, "Contract finalized");
        Ok(())
    }

    /// Return to the construction state. Owner-only.
    ///
    /// Rejected once finalized or once the rebalance height has been
    /// reached. Clears both lists and the memo.
    pub fn reset(
        &mut self,
        caller: Address,
        adapter: &impl LedgerAdapter,
    ) -> Result<(), RebalanceError> {
        self.ensure_owner(caller)?;
        if self.status == Status::Finalized {
            return Err(RebalanceError::ResetAfterFinalize);
        }
        let current = adapter.current_height()?;
        if current >= self.rebalance_height {
            return Err(RebalanceError::ResetWindowClosed {
                current,
                rebalance: self.rebalance_height,
            });
        }

        self.registry.clear();
        self.memo.clear();
        self.status = Status::Initialized;
        self.emit(ContractEvent::StatusChanged(StatusChanged {
            status: self.status,
        }));
        info!("State reset to Initialized");
        Ok(())
    }

    // ───────────────────────── Ownership ─────────────────────────

    /// Hand ownership to a non-zero principal. Owner-only.
    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), RebalanceError> {
        self.ensure_owner(caller)?;
        if new_owner.is_zero() {
            return Err(RebalanceError::ZeroAddress);
        }
        let previous_owner = self.owner;
        self.owner = new_owner;
        self.emit(ContractEvent::OwnershipTransferred(OwnershipTransferred {
            previous_owner,
            new_owner,
        }));
        info!(%previous_owner, %new_owner, "Ownership transferred");
        Ok(())
    }

    /// Set the owner to zero. Owner-only. Afterwards no mutator succeeds.
    pub fn renounce_ownership(&mut self, caller: Address) -> Result<(), RebalanceError> {
        self.ensure_owner(caller)?;
        let previous_owner = self.owner;
        self.owner = Address::ZERO;
        self.emit(ContractEvent::OwnershipTransferred(OwnershipTransferred {
            previous_owner,
            new_owner: Address::ZERO,
        }));
        info!(%previous_owner, "Ownership renounced");
        Ok(())
    }

    // ───────────────────────── Read surface ─────────────────────────

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn is_owner(&self, caller: Address) -> bool {
        !self.owner.is_zero() && caller == self.owner
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn memo(&self) -> &str {
        &self.memo
    }

    pub fn rebalance_height(&self) -> Amount {
        self.rebalance_height
    }

    pub fn deployed_height(&self) -> Amount {
        self.deployed_height
    }

    /// Retiree by list position (`retirees(uint256)`).
    pub fn retiree_at(&self, index: usize) -> Option<&Retiree> {
        self.registry.retiree_at(index)
    }

    /// Newbie by list position (`newbies(uint256)`).
    pub fn newbie_at(&self, index: usize) -> Option<&Newbie> {
        self.registry.newbie_at(index)
    }

    pub fn retired_count(&self) -> usize {
        self.registry.retired_count()
    }

    pub fn newbie_count(&self) -> usize {
        self.registry.newbie_count()
    }

    pub fn retired_exists(&self, address: Address) -> bool {
        self.registry.retired_exists(address)
    }

    pub fn newbie_exists(&self, address: Address) -> bool {
        self.registry.newbie_exists(address)
    }

    /// Retiree address and approver list.
    pub fn get_retired(
        &self,
        address: Address,
    ) -> Result<(Address, &[Address]), RebalanceError> {
        self.registry
            .get_retired(address)
            .map(|r| (r.address, r.approvers.as_slice()))
            .ok_or(RebalanceError::NotRegistered { address })
    }

    /// Newbie address and allocation.
    pub fn get_newbie(&self, address: Address) -> Result<(Address, Amount), RebalanceError> {
        self.registry
            .get_newbie(address)
            .map(|n| (n.address, n.amount))
            .ok_or(RebalanceError::NotRegistered { address })
    }

    /// Retiree list index, or the `Amount::MAX` sentinel when absent.
    pub fn get_retired_index(&self, address: Address) -> Amount {
        self.registry
            .retired_index(address)
            .map(Amount::from)
            .unwrap_or(Amount::MAX)
    }

    /// Newbie list index, or the `Amount::MAX` sentinel when absent.
    pub fn get_newbie_index(&self, address: Address) -> Amount {
        self.registry
            .newbie_index(address)
            .map(Amount::from)
            .unwrap_or(Amount::MAX)
    }

    /// Checked total of newbie allocations (`getTreasuryAmount`).
    pub fn treasury_amount(&self) -> Result<Amount, RebalanceError> {
        self.registry.total_newbie_amount()
    }

    /// Live sum of retiree balances at the current height.
    pub fn sum_of_retired_balance(
        &self,
        adapter: &impl LedgerAdapter,
    ) -> Result<Amount, RebalanceError> {
        let height = adapter.current_height()?;
        let mut total = Amount::ZERO;
        for retiree in self.registry.retirees() {
            let balance = adapter.balance_at(retiree.address, height)?;
            total = total
                .checked_add(balance)
                .ok_or(RebalanceError::AmountOverflow)?;
        }
        Ok(total)
    }

    /// Whether the address carries contract code (`isContractAddr`).
    pub fn is_contract_addr(
        &self,
        adapter: &impl LedgerAdapter,
        address: Address,
    ) -> Result<bool, RebalanceError> {
        Ok(adapter.is_contract(address)?)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    // ───────────────────────── Replay hooks ─────────────────────────

    /// Bare core for the replay engine: no emissions, empty registry.
    pub(crate) fn restore(
        owner: Address,
        rebalance_height: Amount,
        deployed_height: Amount,
    ) -> Self {
        Self {
            owner,
            status: Status::Initialized,
            rebalance_height,
            deployed_height,
            memo: String::new(),
            registry: Registry::new(),
            events: Vec::new(),
        }
    }

    pub(crate) fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub(crate) fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    pub(crate) fn set_memo(&mut self, memo: String) {
        self.memo = memo;
    }

    pub(crate) fn set_owner(&mut self, owner: Address) {
        self.owner = owner;
    }

    pub(crate) fn set_events(&mut self, events: Vec<ContractEvent>) {
        self.events = events;
    }

    // ───────────────────────── Events ─────────────────────────

    /// All emitted events, ordered identically to the mutations.
    pub fn events(&self) -> &[ContractEvent] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<ContractEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::MockLedger;

    fn addr(last: u8) -> Address {
        let mut bytes = [0u8; 20];
        bytes[19] = last;
        Address::new(bytes)
    }

    const OWNER: u8 = 0xee;

    fn setup() -> TreasuryRebalance {
        TreasuryRebalance::new(addr(OWNER), Amount::from(100u64), Amount::from(1u64))
    }

    // ─── Construction ───

    #[test]
    fn test_construction_state() {
        let core = setup();
        assert_eq!(core.status(), Status::Initialized);
        assert_eq!(core.owner(), addr(OWNER));
        assert_eq!(core.rebalance_height(), Amount::from(100u64));
        assert_eq!(core.memo(), "");
        assert_eq!(core.retired_count(), 0);
        assert_eq!(core.newbie_count(), 0);
    }

    #[test]
    fn test_construction_emission_order() {
        let core = setup();
        let events = core.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], ContractEvent::OwnershipTransferred(_)));
        assert!(matches!(events[1], ContractEvent::ContractDeployed(_)));
    }

    // ─── Owner guard ───

    #[test]
    fn test_register_retired_not_owner() {
        let mut core = setup();
        let result = core.register_retired(addr(2), addr(1));
        assert_eq!(result, Err(RebalanceError::NotOwner { caller: addr(2) }));
        assert_eq!(core.retired_count(), 0);
        assert_eq!(core.events().len(), 2, "failed op must not emit");
    }

    #[test]
    fn test_status_guard() {
        let mut core = setup();
        core.finalize_registration(addr(OWNER)).unwrap();
        let result = core.register_retired(addr(OWNER), addr(1));
        assert_eq!(
            result,
            Err(RebalanceError::WrongStatus {
                expected: Status::Initialized,
                actual: Status::Registered,
            })
        );
    }

    // ─── Ownership ───

    #[test]
    fn test_transfer_ownership() {
        let mut core = setup();
        core.transfer_ownership(addr(OWNER), addr(2)).unwrap();
        assert_eq!(core.owner(), addr(2));
        assert!(core.is_owner(addr(2)));
        assert!(!core.is_owner(addr(OWNER)));
    }

    #[test]
    fn test_transfer_ownership_zero_address() {
        let mut core = setup();
        assert_eq!(
            core.transfer_ownership(addr(OWNER), Address::ZERO),
            Err(RebalanceError::ZeroAddress)
        );
    }

    #[test]
    fn test_renounce_ownership_freezes_core() {
        let mut core = setup();
        core.renounce_ownership(addr(OWNER)).unwrap();
        assert_eq!(core.owner(), Address::ZERO);
        assert!(!core.is_owner(Address::ZERO));

        // No mutator succeeds afterwards, including from the zero address.
        assert!(matches!(
            core.register_retired(Address::ZERO, addr(1)),
            Err(RebalanceError::NotOwner { .. })
        ));
        assert!(matches!(
            core.register_retired(addr(OWNER), addr(1)),
            Err(RebalanceError::NotOwner { .. })
        ));
    }

    // ─── Index sentinels ───

    #[test]
    fn test_index_sentinel() {
        let mut core = setup();
        core.register_retired(addr(OWNER), addr(1)).unwrap();
        assert_eq!(core.get_retired_index(addr(1)), Amount::ZERO);
        assert_eq!(core.get_retired_index(addr(9)), Amount::MAX);
        assert_eq!(core.get_newbie_index(addr(9)), Amount::MAX);
    }

    // ─── Status codes ───

    #[test]
    fn test_status_wire_codes() {
        assert_eq!(Status::Initialized.as_u8(), 0);
        assert_eq!(Status::Registered.as_u8(), 1);
        assert_eq!(Status::Approved.as_u8(), 2);
        assert_eq!(Status::Finalized.as_u8(), 3);
        assert_eq!(Status::from_u8(2), Some(Status::Approved));
        assert_eq!(Status::from_u8(4), None);
    }

    // ─── Reset ───

    #[test]
    fn test_reset_within_window() {
        let mut core = setup();
        let mut ledger = MockLedger::new();
        ledger.set_height(50u64);

        core.register_retired(addr(OWNER), addr(1)).unwrap();
        core.register_newbie(addr(OWNER), addr(2), Amount::from(10u64))
            .unwrap();
        core.finalize_registration(addr(OWNER)).unwrap();

        core.reset(addr(OWNER), &ledger).unwrap();
        assert_eq!(core.status(), Status::Initialized);
        assert_eq!(core.retired_count(), 0);
        assert_eq!(core.newbie_count(), 0);
        assert_eq!(core.memo(), "");
    }

    #[test]
    fn test_reset_window_closed() {
        let mut core = setup();
        let mut ledger = MockLedger::new();
        ledger.set_height(100u64);

        assert_eq!(
            core.reset(addr(OWNER), &ledger),
            Err(RebalanceError::ResetWindowClosed {
                current: Amount::from(100u64),
                rebalance: Amount::from(100u64),
            })
        );
    }

    // ─── Adapter faults ───

    #[test]
    fn test_adapter_outage_surfaces_and_preserves_state() {
        let mut core = setup();
        let mut ledger = MockLedger::new();
        ledger.set_height(10u64);

        core.register_retired(addr(OWNER), addr(1)).unwrap();
        core.finalize_registration(addr(OWNER)).unwrap();

        ledger.set_unavailable(true);
        let result = core.finalize_approval(addr(OWNER), &ledger);
        assert!(matches!(result, Err(RebalanceError::Adapter(_))));
        assert_eq!(core.status(), Status::Registered);
    }
}
