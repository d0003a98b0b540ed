//! Fault status machine.
//!
//! | operation                | from     | to       | side effects                         |
//! |--------------------------|----------|----------|--------------------------------------|
//! | `assign`                 | open     | assigned | link fault ↔ mechanic                |
//! | `unassign`               | assigned | open     | unlink fault ↔ mechanic              |
//! | `finish`                 | assigned | finished | amount := Σ interventions; unlink    |
//! | `reopen`                 | finished | open     | amount := 0                          |
//! | `mark_invoiced`          | finished | invoiced |                                      |
//! | `mark_back_to_finished`  | invoiced | finished |                                      |
//!
//! The two invoice transitions are crate-private: they only run together with
//! the invoice link, through [`Workshop::invoice_faults`](crate::Workshop::invoice_faults) and
//! [`Workshop::release_from_invoice`](crate::Workshop::release_from_invoice).
//!
//! A transition requested from any other status is handed to
//! [`out_of_order`], which currently ignores it. `unassign` is the exception:
//! calling it on a fault without a mechanic is caller misuse and panics.

use std::collections::BTreeMap;

use workshop_core::{DomainError, DomainResult, Entity, FaultId, MechanicId, Money};

use crate::aggregation;
use crate::fault::Fault;
use crate::mechanic::Mechanic;
use crate::relations::Relations;
use crate::status::FaultStatus;

/// What a transition request did.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Status (and links) changed.
    Applied,
    /// The fault was not in the required status; nothing changed.
    Ignored,
}

impl Transition {
    pub fn is_applied(self) -> bool {
        self == Transition::Applied
    }
}

/// Mutable handle on one fault's lifecycle.
///
/// Obtained from [`Workshop::lifecycle`](crate::Workshop::lifecycle).
#[derive(Debug)]
pub struct FaultLifecycle<'a> {
    fault: &'a mut Fault,
    mechanics: &'a BTreeMap<MechanicId, Mechanic>,
    relations: &'a mut Relations,
}

impl<'a> FaultLifecycle<'a> {
    pub(crate) fn new(
        fault: &'a mut Fault,
        mechanics: &'a BTreeMap<MechanicId, Mechanic>,
        relations: &'a mut Relations,
    ) -> Self {
        Self {
            fault,
            mechanics,
            relations,
        }
    }

    pub fn fault(&self) -> &Fault {
        &*self.fault
    }

    pub fn id(&self) -> FaultId {
        self.fault.id()
    }

    pub fn status(&self) -> FaultStatus {
        self.fault.status()
    }

    pub fn mechanic(&self) -> Option<MechanicId> {
        self.relations.assigned.owner(self.id())
    }

    /// Assign the fault to `mechanic`.
    ///
    /// Fails only when the mechanic does not exist. An already assigned fault
    /// keeps its mechanic: unassign it first to hand it to someone else.
    pub fn assign(&mut self, mechanic: MechanicId) -> DomainResult<Transition> {
        if !self.mechanics.contains_key(&mechanic) {
            return Err(DomainError::not_found(format!("mechanic {mechanic}")));
        }
        if self.status() != FaultStatus::Open {
            return out_of_order("assign", &*self.fault, FaultStatus::Open);
        }
        let id = self.id();
        self.relations.assigned.link(mechanic, id);
        self.fault.set_status(FaultStatus::Assigned);
        Ok(Transition::Applied)
    }

    /// Take the fault away from its mechanic.
    ///
    /// # Panics
    ///
    /// If the fault is not assigned.
    pub fn unassign(&mut self) {
        assert!(
            self.fault.is_assigned(),
            "cannot unassign fault {}: it is {}, not assigned",
            self.id(),
            self.status()
        );
        let id = self.id();
        let Some(mechanic) = self.mechanic() else {
            panic!("fault {id} is assigned but has no mechanic");
        };
        self.relations.assigned.unlink(mechanic, id);
        self.fault.set_status(FaultStatus::Open);
    }

    /// Close the repair: fix the amount and release the mechanic.
    pub fn finish(&mut self) -> DomainResult<Transition> {
        if self.status() != FaultStatus::Assigned {
            return out_of_order("finish", &*self.fault, FaultStatus::Assigned);
        }
        let amount = aggregation::total_cost(self.fault.interventions());
        self.fault.set_amount(amount);
        let id = self.id();
        if let Some(mechanic) = self.mechanic() {
            self.relations.assigned.unlink(mechanic, id);
        }
        self.fault.set_status(FaultStatus::Finished);
        Ok(Transition::Applied)
    }

    /// Send a finished fault back to the open queue.
    ///
    /// The amount goes back to zero; it is derived again on the next `finish`.
    pub fn reopen(&mut self) -> DomainResult<Transition> {
        if self.status() != FaultStatus::Finished {
            return out_of_order("reopen", &*self.fault, FaultStatus::Finished);
        }
        self.fault.set_amount(Money::ZERO);
        self.fault.set_status(FaultStatus::Open);
        Ok(Transition::Applied)
    }

    /// Status change only; the caller writes the invoice link.
    pub(crate) fn mark_invoiced(&mut self) -> DomainResult<Transition> {
        if self.status() != FaultStatus::Finished {
            return out_of_order("mark_invoiced", &*self.fault, FaultStatus::Finished);
        }
        self.fault.set_status(FaultStatus::Invoiced);
        Ok(Transition::Applied)
    }

    pub(crate) fn mark_back_to_finished(&mut self) -> DomainResult<Transition> {
        if self.status() != FaultStatus::Invoiced {
            return out_of_order("mark_back_to_finished", &*self.fault, FaultStatus::Invoiced);
        }
        self.fault.set_status(FaultStatus::Finished);
        Ok(Transition::Applied)
    }
}

/// Outcome of a transition requested from the wrong status.
///
/// Requests are absorbed without error. Returning `Err` here instead turns
/// every such request into a business error at once.
fn out_of_order(
    operation: &'static str,
    fault: &Fault,
    required: FaultStatus,
) -> DomainResult<Transition> {
    tracing::debug!(
        fault = %fault.id(),
        status = %fault.status(),
        required = %required,
        operation,
        "fault transition ignored"
    );
    Ok(Transition::Ignored)
}
