//! Treasury Rebalance Coordination Core
//!
//! This crate implements the rebalance state machine that authorizes a
//! one-shot treasury reorganization: a set of *retiree* accounts whose
//! balances will be zeroed and a set of *newbie* accounts to be credited
//! with pre-agreed amounts. The core only coordinates and authorizes —
//! the actual value movement is performed by the external ledger at the
//! rebalance height once the core reaches its terminal state.
//!
//! # Modules
//! - `errors`: Discriminated error taxonomy
//! - `events`: Contract events with frozen ABI signatures and topics
//! - `abi`: 4-byte method selector table
//! - `adapter`: Ledger adapter boundary (heights, balances, contract probes)
//! - `registry`: Retiree and newbie lists
//! - `approval`: Approver authorization and quorum verification
//! - `lifecycle`: The four-state controller owning all mutable state
//! - `replay`: State reconstruction from the event stream

pub mod abi;
pub mod adapter;
pub mod approval;
pub mod errors;
pub mod events;
pub mod lifecycle;
pub mod registry;
pub mod replay;

/// Contract ABI version — frozen after release
pub const CONTRACT_ABI_VERSION: &str = "1.0.0";
