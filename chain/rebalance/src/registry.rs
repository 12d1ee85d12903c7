//! Retiree and newbie registries
//!
//! Two ordered lists with O(n) lookup by address and O(1) amortized
//! add/remove. Removal is swap-with-last, so insertion order is only
//! preserved up to the first removal — this is observable through the
//! index-based accessors and must stay that way.
//!
//! This layer enforces the data invariants (address uniqueness, amount
//! positivity, approver uniqueness); owner and status guards live in the
//! lifecycle controller.

use serde::{Deserialize, Serialize};
use types::address::Address;
use types::numeric::Amount;

use crate::errors::RebalanceError;

/// An account whose entire balance will be drained at rebalance time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Retiree {
    pub address: Address,
    /// Approvers that have endorsed this retiree, in approval order.
    pub approvers: Vec<Address>,
}

/// An account to be credited a specified amount at rebalance time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Newbie {
    pub address: Address,
    pub amount: Amount,
}

/// The two participant lists.
///
/// A single address may appear both as a retiree and as a newbie; only
/// duplicates within one list are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    retirees: Vec<Retiree>,
    newbies: Vec<Newbie>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    // ───────────────────────── Retirees ─────────────────────────

    /// Append a retiree with an empty approver list.
    pub fn register_retired(&mut self, address: Address) -> Result<(), RebalanceError> {
        if address.is_zero() {
            return Err(RebalanceError::ZeroAddress);
        }
        if self.retired_exists(address) {
            return Err(RebalanceError::AlreadyRegistered { address });
        }
        self.retirees.push(Retiree {
            address,
            approvers: Vec::new(),
        });
        Ok(())
    }

    /// Remove a retiree by swap-with-last.
    pub fn remove_retired(&mut self, address: Address) -> Result<(), RebalanceError> {
        let index = self
            .retired_index(address)
            .ok_or(RebalanceError::NotRegistered { address })?;
        self.retirees.swap_remove(index);
        Ok(())
    }

    /// Whether the address is a registered retiree.
    pub fn retired_exists(&self, address: Address) -> bool {
        self.retired_index(address).is_some()
    }

    /// Position of a retiree, if registered.
    pub fn retired_index(&self, address: Address) -> Option<usize> {
        self.retirees.iter().position(|r| r.address == address)
    }

    /// Retiree by address.
    pub fn get_retired(&self, address: Address) -> Option<&Retiree> {
        self.retired_index(address).map(|i| &self.retirees[i])
    }

    /// Retiree by list position.
    pub fn retiree_at(&self, index: usize) -> Option<&Retiree> {
        self.retirees.get(index)
    }

    pub fn retired_count(&self) -> usize {
        self.retirees.len()
    }

    pub fn retirees(&self) -> &[Retiree] {
        &self.retirees
    }

    /// Record an approval for a retiree.
    ///
    /// Returns the approver count after insertion. Rejects duplicates so
    /// each address appears at most once per retiree.
    pub fn add_approver(
        &mut self,
        retiree: Address,
        approver: Address,
    ) -> Result<Amount, RebalanceError> {
        let index = self
            .retired_index(retiree)
            .ok_or(RebalanceError::NotRegistered { address: retiree })?;
        let entry = &mut self.retirees[index];
        if entry.approvers.contains(&approver) {
            return Err(RebalanceError::AlreadyApproved { retiree, approver });
        }
        entry.approvers.push(approver);
        Ok(Amount::from(entry.approvers.len()))
    }

    // ───────────────────────── Newbies ─────────────────────────

    /// Append a newbie with a strictly positive allocation.
    pub fn register_newbie(
        &mut self,
        address: Address,
        amount: Amount,
    ) -> Result<(), RebalanceError> {
        if address.is_zero() {
            return Err(RebalanceError::ZeroAddress);
        }
        if self.newbie_exists(address) {
            return Err(RebalanceError::AlreadyRegistered { address });
        }
        if amount.is_zero() {
            return Err(RebalanceError::ZeroAmount);
        }
        self.newbies.push(Newbie { address, amount });
        Ok(())
    }

    /// Remove a newbie by swap-with-last.
    pub fn remove_newbie(&mut self, address: Address) -> Result<(), RebalanceError> {
        let index = self
            .newbie_index(address)
            .ok_or(RebalanceError::NotRegistered { address })?;
        self.newbies.swap_remove(index);
        Ok(())
    }

    /// Whether the address is a registered newbie.
    pub fn newbie_exists(&self, address: Address) -> bool {
        self.newbie_index(address).is_some()
    }

    /// Position of a newbie, if registered.
    pub fn newbie_index(&self, address: Address) -> Option<usize> {
        self.newbies.iter().position(|n| n.address == address)
    }

    /// Newbie by address.
    pub fn get_newbie(&self, address: Address) -> Option<&Newbie> {
        self.newbie_index(address).map(|i| &self.newbies[i])
    }

    /// Newbie by list position.
    pub fn newbie_at(&self, index: usize) -> Option<&Newbie> {
        self.newbies.get(index)
    }

    pub fn newbie_count(&self) -> usize {
        self.newbies.len()
    }

    pub fn newbies(&self) -> &[Newbie] {
        &self.newbies
    }

    /// Checked sum of all newbie allocations. Overflow is a fatal fault.
    pub fn total_newbie_amount(&self) -> Result<Amount, RebalanceError> {
        let mut total = Amount::ZERO;
        for newbie in &self.newbies {
            total = total
                .checked_add(newbie.amount)
                .ok_or(RebalanceError::AmountOverflow)?;
        }
        Ok(total)
    }

    /// Drop both lists.
    pub fn clear(&mut self) {
        self.retirees.clear();
        self.newbies.clear();
    }
}
