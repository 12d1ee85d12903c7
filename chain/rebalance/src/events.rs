//! Contract events with frozen ABI signatures and topics
//!
//! Events are immutable records appended by core operations, ordered
//! identically to the mutations that produced them. Each event carries a
//! canonical ABI signature; the 32-byte topic is the Keccak-256 hash of
//! that signature and is pinned by tests against the frozen values.

use serde::{Deserialize, Serialize};
use types::address::Address;
use types::numeric::Amount;

use crate::abi::keccak256;
use crate::lifecycle::Status;

/// A retiree account entered the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetiredRegistered {
    pub retired: Address,
}

/// A retiree account left the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetiredRemoved {
    pub retired: Address,
}

/// A newbie account entered the registry with its fund allocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewbieRegistered {
    pub newbie: Address,
    pub fund_allocation: Amount,
}

/// A newbie account left the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewbieRemoved {
    pub newbie: Address,
}

/// An approver endorsed a retiree
///
/// `approvers_count` is the approver-list length *after* insertion, so
/// serialized approvals carry distinct monotonic counts per retiree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approved {
    pub retired: Address,
    pub approver: Address,
    pub approvers_count: Amount,
}

/// The lifecycle status changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChanged {
    pub status: Status,
}

/// The contract reached its terminal state with an audit memo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finalized {
    pub memo: String,
    pub status: Status,
}

/// Emitted once at construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractDeployed {
    pub status: Status,
    pub rebalance_block_number: Amount,
    pub deployed_block_number: Amount,
}

/// Ownership moved to a new principal (or the zero address on renounce)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipTransferred {
    pub previous_owner: Address,
    pub new_owner: Address,
}

/// Enum wrapper for all core events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractEvent {
    RetiredRegistered(RetiredRegistered),
    RetiredRemoved(RetiredRemoved),
    NewbieRegistered(NewbieRegistered),
    NewbieRemoved(NewbieRemoved),
    Approved(Approved),
    StatusChanged(StatusChanged),
    Finalized(Finalized),
    ContractDeployed(ContractDeployed),
    OwnershipTransferred(OwnershipTransferred),
}

impl ContractEvent {
    /// Canonical ABI signature of this event.
    pub fn signature(&self) -> &'static str {
        match self {
            Self::RetiredRegistered(_) => "RetiredRegistered(address)",
            Self::RetiredRemoved(_) => "RetiredRemoved(address)",
            Self::NewbieRegistered(_) => "NewbieRegistered(address,uint256)",
            Self::NewbieRemoved(_) => "NewbieRemoved(address)",
            Self::Approved(_) => "Approved(address,address,uint256)",
            Self::StatusChanged(_) => "StatusChanged(uint8)",
            Self::Finalized(_) => "Finalized(string,uint8)",
            Self::ContractDeployed(_) => "ContractDeployed(uint8,uint256,uint256)",
            Self::OwnershipTransferred(_) => "OwnershipTransferred(address,address)",
        }
    }

    /// First topic: Keccak-256 of the canonical signature.
    pub fn topic0(&self) -> [u8; 32] {
        keccak256(self.signature().as_bytes())
    }
}
