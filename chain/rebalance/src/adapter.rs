//! Ledger adapter boundary
//!
//! The core never talks to a ledger directly. Everything it needs from
//! the outside world — current height, balances, contract classification,
//! and the admin/quorum readback for contract retirees — comes through
//! the [`LedgerAdapter`] trait. Adapter calls are the only operations
//! that may block; all in-core transitions are synchronous.

use std::collections::HashMap;

use types::address::Address;
use types::numeric::Amount;

use crate::errors::AdapterError;

/// Admin set and quorum read back from a contract retiree.
///
/// Obtained through the retiree's `getState()` probe (selector
/// `0x1865c57d`), returning `(address[] adminList, uint256 quorum)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractState {
    pub admins: Vec<Address>,
    pub quorum: Amount,
}

/// Outward-facing boundary to the ledger that executes the rebalance.
pub trait LedgerAdapter {
    /// Whether the account carries contract code.
    fn is_contract(&self, address: Address) -> Result<bool, AdapterError>;

    /// Balance of `address` at the given block height.
    fn balance_at(&self, address: Address, height: Amount) -> Result<Amount, AdapterError>;

    /// The ledger's current block height.
    fn current_height(&self) -> Result<Amount, AdapterError>;

    /// Admin list and quorum of a contract retiree.
    ///
    /// Implementations must fail with [`AdapterError::UnknownContract`]
    /// for addresses that are not contract accounts.
    fn contract_state(&self, address: Address) -> Result<ContractState, AdapterError>;
}

/// In-memory ledger used by tests and simulators.
///
/// Heights, balances, and contract state are all settable between calls,
/// which is what the late-bound-quorum scenarios exercise.
#[derive(Debug, Clone, Default)]
pub struct MockLedger {
    height: Amount,
    balances: HashMap<Address, Amount>,
    contracts: HashMap<Address, ContractState>,
    unavailable: bool,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current block height.
    pub fn set_height(&mut self, height: impl Into<Amount>) {
        self.height = height.into();
    }

    /// Set an account balance.
    pub fn set_balance(&mut self, address: Address, balance: impl Into<Amount>) {
        self.balances.insert(address, balance.into());
    }

    /// Mark an address as a contract account with the given admin state.
    pub fn set_contract(&mut self, address: Address, admins: Vec<Address>, quorum: impl Into<Amount>) {
        self.contracts.insert(
            address,
            ContractState {
                admins,
                quorum: quorum.into(),
            },
        );
    }

    /// Simulate a ledger outage: every call fails until cleared.
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    fn check_available(&self) -> Result<(), AdapterError> {
        if self.unavailable {
            return Err(AdapterError::Unavailable {
                reason: "mock ledger offline".to_string(),
            });
        }
        Ok(())
    }
}

impl LedgerAdapter for MockLedger {
    fn is_contract(&self, address: Address) -> Result<bool, AdapterError> {
        self.check_available()?;
        Ok(self.contracts.contains_key(&address))
    }

    fn balance_at(&self, address: Address, _height: Amount) -> Result<Amount, AdapterError> {
        self.check_available()?;
        Ok(self.balances.get(&address).copied().unwrap_or(Amount::ZERO))
    }

    fn current_height(&self) -> Result<Amount, AdapterError> {
        self.check_available()?;
        Ok(self.height)
    }

    fn contract_state(&self, address: Address) -> Result<ContractState, AdapterError> {
        self.check_available()?;
        self.contracts
            .get(&address)
            .cloned()
            .ok_or(AdapterError::UnknownContract { address })
    }
}
