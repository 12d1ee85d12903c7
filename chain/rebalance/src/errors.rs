//! Discriminated error taxonomy for the rebalance core
//!
//! Every failure surfaces at the operation boundary with a variant plus a
//! human-readable cause; nothing is recovered or retried inside the core.
//! `RebalanceError::kind` classifies variants into the five coarse kinds
//! consumers branch on.

use thiserror::Error;
use types::address::Address;
use types::numeric::Amount;

use crate::lifecycle::Status;

/// Coarse classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller lacks the required authority
    Authorization,
    /// Operation issued in the wrong lifecycle state or time window
    State,
    /// Malformed or duplicate input
    Input,
    /// A core invariant (conservation, quorum) does not hold
    Invariant,
    /// The ledger adapter failed or returned malformed data
    Adapter,
}

/// Ledger adapter failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    #[error("Ledger backend unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Malformed adapter response for {context}: {detail}")]
    MalformedResponse { context: String, detail: String },

    #[error("Unknown contract account: {address}")]
    UnknownContract { address: Address },
}

/// Errors surfaced by the rebalance core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RebalanceError {
    // ─── Authorization ───
    #[error("Caller {caller} is not the owner")]
    NotOwner { caller: Address },

    #[error("Caller {caller} may not approve for retiree {retiree}: {reason}")]
    NotAuthorizedToApprove {
        caller: Address,
        retiree: Address,
        reason: String,
    },

    // ─── State ───
    #[error("Operation requires status {expected:?}, current status is {actual:?}")]
    WrongStatus { expected: Status, actual: Status },

    #[error("Cannot reset: contract is finalized")]
    ResetAfterFinalize,

    #[error("Cannot reset at height {current}: rebalance height {rebalance} reached")]
    ResetWindowClosed { current: Amount, rebalance: Amount },

    #[error("Premature finalize at height {current}: rebalance height is {rebalance}")]
    Premature { current: Amount, rebalance: Amount },

    // ─── Input ───
    #[error("The zero address is not a valid participant")]
    ZeroAddress,

    #[error("Newbie amount must be strictly positive")]
    ZeroAmount,

    #[error("Address {address} is already registered")]
    AlreadyRegistered { address: Address },

    #[error("Address {address} is not registered")]
    NotRegistered { address: Address },

    #[error("Approver {approver} already approved retiree {retiree}")]
    AlreadyApproved { retiree: Address, approver: Address },

    #[error("Contract retiree {retiree} has an empty admin list")]
    EmptyAdminList { retiree: Address },

    // ─── Invariant ───
    #[error("Treasury amount {allocated} exceeds retiree balances {available}")]
    InsufficientTreasury { allocated: Amount, available: Amount },

    #[error("Retiree {retiree} quorum not met: {approved} of {quorum} required admins")]
    QuorumNotMet {
        retiree: Address,
        approved: Amount,
        quorum: Amount,
    },

    #[error("Plain-account retiree {retiree} has not self-approved")]
    SelfApprovalMissing { retiree: Address },

    #[error("Arithmetic overflow while summing amounts")]
    AmountOverflow,

    // ─── Adapter ───
    #[error("Ledger adapter fault: {0}")]
    Adapter(#[from] AdapterError),
}

impl RebalanceError {
    /// Classify this error into its coarse kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotOwner { .. } | Self::NotAuthorizedToApprove { .. } => {
                ErrorKind::Authorization
            }
            Self::WrongStatus { .. }
            | Self::ResetAfterFinalize
            | Self::ResetWindowClosed { .. }
            | Self::Premature { .. } => ErrorKind::State,
            Self::ZeroAddress
            | Self::ZeroAmount
            | Self::AlreadyRegistered { .. }
            | Self::NotRegistered { .. }
            | Self::AlreadyApproved { .. }
            | Self::EmptyAdminList { .. } => ErrorKind::Input,
            Self::InsufficientTreasury { .. }
            | Self::QuorumNotMet { .. }
            | Self::SelfApprovalMissing { .. }
            | Self::AmountOverflow => ErrorKind::Invariant,
            Self::Adapter(_) => ErrorKind::Adapter,
        }
    }
}
