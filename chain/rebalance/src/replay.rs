//! State reconstruction from the event stream
//!
//! The event stream is append-only and total-ordered, so replaying it
//! through an empty core reproduces the current state. Replay is
//! deterministic and validates the stream as it folds: impossible
//! transitions and approver-count mismatches are reported as corruption
//! rather than silently absorbed.

use tracing::info;

use crate::events::ContractEvent;
use crate::lifecycle::{Status, TreasuryRebalance};

/// Errors during replay.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    #[error("Event stream is empty")]
    EmptyStream,

    #[error("Stream must begin with OwnershipTransferred(zero, owner) then ContractDeployed")]
    MissingDeployment,

    #[error("Invalid event at position {position}: {reason}")]
    InvalidEvent { position: usize, reason: String },

    #[error("Impossible transition at position {position}: {from:?} -> {to:?}")]
    ImpossibleTransition {
        position: usize,
        from: Status,
        to: Status,
    },

    #[error("Approver count mismatch at position {position}: event says {expected}, rebuilt {actual}")]
    ApproverCountMismatch {
        position: usize,
        expected: String,
        actual: String,
    },
}

/// Rebuild a core from an ordered event stream.
///
/// The rebuilt core carries the consumed stream as its own event log,
/// so it is indistinguishable from the instance that emitted it.
pub fn replay(events: &[ContractEvent]) -> Result<TreasuryRebalance, ReplayError> {
    if events.is_empty() {
        return Err(ReplayError::EmptyStream);
    }

    // Construction always emits ownership assignment then deployment.
    let owner = match events.first() {
        Some(ContractEvent::OwnershipTransferred(t)) if t.previous_owner.is_zero() => t.new_owner,
        _ => return Err(ReplayError::MissingDeployment),
    };
    let (rebalance_height, deployed_height) = match events.get(1) {
        Some(ContractEvent::ContractDeployed(d)) if d.status == Status::Initialized => {
            (d.rebalance_block_number, d.deployed_block_number)
        }
        _ => return Err(ReplayError::MissingDeployment),
    };

    let mut core = TreasuryRebalance::restore(owner, rebalance_height, deployed_height);

    for (position, event) in events.iter().enumerate().skip(2) {
        apply(&mut core, position, event)?;
    }

    core.set_events(events.to_vec());
    info!(event_count = events.len(), "Event stream replayed");
    Ok(core)
}

fn apply(
    core: &mut TreasuryRebalance,
    position: usize,
    event: &ContractEvent,
) -> Result<(), ReplayError> {
    let invalid = |reason: String| ReplayError::InvalidEvent { position, reason };

    // Registry mutations are only emitted while Initialized, approvals
    // only while Registered; a stream that violates this did not come
    // from the core.
    let status = core.status();
    let in_status = |required: Status| {
        if status == required {
            Ok(())
        } else {
            Err(ReplayError::InvalidEvent {
                position,
                reason: format!("{event:?} emitted outside {required:?}"),
            })
        }
    };

    match event {
        ContractEvent::RetiredRegistered(e) => {
            in_status(Status::Initialized)?;
            core.registry_mut()
                .register_retired(e.retired)
                .map_err(|err| invalid(err.to_string()))
        }
        ContractEvent::RetiredRemoved(e) => {
            in_status(Status::Initialized)?;
            core.registry_mut()
                .remove_retired(e.retired)
                .map_err(|err| invalid(err.to_string()))
        }
        ContractEvent::NewbieRegistered(e) => {
            in_status(Status::Initialized)?;
            core.registry_mut()
                .register_newbie(e.newbie, e.fund_allocation)
                .map_err(|err| invalid(err.to_string()))
        }
        ContractEvent::NewbieRemoved(e) => {
            in_status(Status::Initialized)?;
            core.registry_mut()
                .remove_newbie(e.newbie)
                .map_err(|err| invalid(err.to_string()))
        }
        ContractEvent::Approved(e) => {
            in_status(Status::Registered)?;
            let count = core
                .registry_mut()
                .add_approver(e.retired, e.approver)
                .map_err(|err| invalid(err.to_string()))?;
            if count != e.approvers_count {
                return Err(ReplayError::ApproverCountMismatch {
                    position,
                    expected: e.approvers_count.to_string(),
                    actual: count.to_string(),
                });
            }
            Ok(())
        }
        ContractEvent::StatusChanged(e) => {
            let from = core.status();
            match (from, e.status) {
                // A StatusChanged back to Initialized is a reset: the
                // emitting side clears both lists and the memo.
                (Status::Initialized | Status::Registered | Status::Approved, Status::Initialized) => {
                    core.registry_mut().clear();
                    core.set_memo(String::new());
                    core.set_status(Status::Initialized);
                    Ok(())
                }
                (Status::Initialized, Status::Registered)
                | (Status::Registered, Status::Approved) => {
                    core.set_status(e.status);
                    Ok(())
                }
                (from, to) => Err(ReplayError::ImpossibleTransition { position, from, to }),
            }
        }
        ContractEvent::Finalized(e) => {
            if core.status() != Status::Approved {
                return Err(ReplayError::ImpossibleTransition {
                    position,
                    from: core.status(),
                    to: Status::Finalized,
                });
            }
            core.set_memo(e.memo.clone());
            core.set_status(Status::Finalized);
            Ok(())
        }
        ContractEvent::OwnershipTransferred(e) => {
            if e.previous_owner != core.owner() {
                return Err(invalid("ownership transfer from non-owner".to_string()));
            }
            core.set_owner(e.new_owner);
            Ok(())
        }
        ContractEvent::ContractDeployed(_) => {
            Err(invalid("duplicate deployment event".to_string()))
        }
    }
}
