//! Approver authorization and quorum verification
//!
//! A plain-account retiree approves itself; a contract retiree is
//! approved by members of its admin set, read back through the ledger
//! adapter. The quorum gate re-reads admin state at check time, so
//! admins added or removed after individual approvals take effect —
//! late binding is intentional.

use types::address::Address;
use types::numeric::Amount;

use crate::adapter::LedgerAdapter;
use crate::errors::RebalanceError;
use crate::registry::Registry;

/// Authorize `caller` to approve for `retiree`.
///
/// Classification happens through the adapter at call time:
/// - plain account: the caller must be the retiree itself;
/// - contract account: the caller must be a member of the retiree's
///   current (non-empty) admin set.
pub fn authorize_approver(
    adapter: &impl LedgerAdapter,
    retiree: Address,
    caller: Address,
) -> Result<(), RebalanceError> {
    if adapter.is_contract(retiree)? {
        let state = adapter.contract_state(retiree)?;
        if state.admins.is_empty() {
            return Err(RebalanceError::EmptyAdminList { retiree });
        }
        if !state.admins.contains(&caller) {
            return Err(RebalanceError::NotAuthorizedToApprove {
                caller,
                retiree,
                reason: "caller is not in the admin list".to_string(),
            });
        }
    } else if caller != retiree {
        return Err(RebalanceError::NotAuthorizedToApprove {
            caller,
            retiree,
            reason: "plain accounts approve themselves".to_string(),
        });
    }
    Ok(())
}

/// Verify that every retiree has sufficient approvals.
///
/// - Plain account: the approver list must contain exactly one entry
///   (only the retiree itself can have approved).
/// - Contract account: admin state is re-read; the count of recorded
///   approvers that are members of the *current* admin list must reach
///   the current quorum.
pub fn check_retirees_approved(
    adapter: &impl LedgerAdapter,
    registry: &Registry,
) -> Result<(), RebalanceError> {
    for retiree in registry.retirees() {
        if adapter.is_contract(retiree.address)? {
            let state = adapter.contract_state(retiree.address)?;
            if state.admins.is_empty() {
                return Err(RebalanceError::EmptyAdminList {
                    retiree: retiree.address,
                });
            }
            let approved = retiree
                .approvers
                .iter()
                .filter(|approver| state.admins.contains(approver))
                .count();
            if Amount::from(approved) < state.quorum {
                return Err(RebalanceError::QuorumNotMet {
                    retiree: retiree.address,
                    approved: Amount::from(approved),
                    quorum: state.quorum,
                });
            }
        } else if retiree.approvers.len() != 1 {
            return Err(RebalanceError::SelfApprovalMissing {
                retiree: retiree.address,
            });
        }
    }
    Ok(())
}
