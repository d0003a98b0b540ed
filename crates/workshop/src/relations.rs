//! Bidirectional fault associations.
//!
//! Every fault has exactly one vehicle, at most one mechanic and at most one
//! invoice, and every owner knows the set of its faults. Both directions of
//! each association are kept in one [`Association`] table whose mutators are
//! private to this crate, so a link can never be observed with only one side
//! written.
//!
//! Misuse of `link`/`unlink` is a programming error and panics.

use std::collections::{BTreeMap, BTreeSet};

use workshop_core::{FaultId, InvoiceId, MechanicId, VehicleId};

/// One association kind: owner `O` ↔ fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association<O> {
    kind: &'static str,
    owner_of: BTreeMap<FaultId, O>,
    faults_of: BTreeMap<O, BTreeSet<FaultId>>,
}

impl<O> Association<O>
where
    O: Copy + Ord + core::fmt::Display,
{
    fn new(kind: &'static str) -> Self {
        Self {
            kind,
            owner_of: BTreeMap::new(),
            faults_of: BTreeMap::new(),
        }
    }

    /// Owner currently linked to `fault`, if any.
    pub fn owner(&self, fault: FaultId) -> Option<O> {
        self.owner_of.get(&fault).copied()
    }

    /// Faults currently linked to `owner`, in id order.
    pub fn faults(&self, owner: O) -> impl Iterator<Item = FaultId> + '_ {
        self.faults_of
            .get(&owner)
            .into_iter()
            .flat_map(|faults| faults.iter().copied())
    }

    pub fn contains(&self, owner: O, fault: FaultId) -> bool {
        self.owner_of.get(&fault) == Some(&owner)
    }

    /// Number of linked faults.
    pub fn len(&self) -> usize {
        self.owner_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owner_of.is_empty()
    }

    /// Every `(owner, fault)` pair, read from the owners' side.
    pub fn links(&self) -> impl Iterator<Item = (O, FaultId)> + '_ {
        self.faults_of
            .iter()
            .flat_map(|(owner, faults)| faults.iter().map(move |fault| (*owner, *fault)))
    }

    /// Both directions describe exactly the same set of links.
    pub fn is_symmetric(&self) -> bool {
        let from_owners = self.links().count();
        from_owners == self.owner_of.len()
            && self.links().all(|(owner, fault)| self.owner(fault) == Some(owner))
            && self.faults_of.values().all(|faults| !faults.is_empty())
    }

    /// Link `fault` to `owner` on both sides.
    ///
    /// # Panics
    ///
    /// If `fault` is already linked to a different owner of this kind.
    pub(crate) fn link(&mut self, owner: O, fault: FaultId) {
        if let Some(current) = self.owner(fault) {
            assert!(
                current == owner,
                "fault {fault} is already linked to {} {current}; cannot link it to {owner}",
                self.kind
            );
            return;
        }
        self.owner_of.insert(fault, owner);
        self.faults_of.entry(owner).or_default().insert(fault);
    }

    /// Remove the `owner` ↔ `fault` link on both sides.
    ///
    /// # Panics
    ///
    /// If no such link exists.
    pub(crate) fn unlink(&mut self, owner: O, fault: FaultId) {
        assert!(
            self.contains(owner, fault),
            "fault {fault} is not linked to {} {owner}",
            self.kind
        );
        self.owner_of.remove(&fault);
        if let Some(faults) = self.faults_of.get_mut(&owner) {
            faults.remove(&fault);
            if faults.is_empty() {
                self.faults_of.remove(&owner);
            }
        }
    }
}

/// The three fault associations of the workshop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relations {
    pub(crate) suffered: Association<VehicleId>,
    pub(crate) assigned: Association<MechanicId>,
    pub(crate) billed: Association<InvoiceId>,
}

impl Default for Relations {
    fn default() -> Self {
        Self {
            suffered: Association::new("vehicle"),
            assigned: Association::new("mechanic"),
            billed: Association::new("invoice"),
        }
    }
}

impl Relations {
    /// Vehicle ↔ fault.
    pub fn vehicles(&self) -> &Association<VehicleId> {
        &self.suffered
    }

    /// Mechanic ↔ fault.
    pub fn mechanics(&self) -> &Association<MechanicId> {
        &self.assigned
    }

    /// Invoice ↔ fault.
    pub fn invoices(&self) -> &Association<InvoiceId> {
        &self.billed
    }

    pub fn is_symmetric(&self) -> bool {
        self.suffered.is_symmetric() && self.assigned.is_symmetric() && self.billed.is_symmetric()
    }
}
