//! The workshop entity graph.
//!
//! `Workshop` owns every entity, keyed by surrogate id, plus the
//! [`Relations`] table linking faults to vehicles, mechanics and invoices.
//! Lookups that miss return [`DomainError::NotFound`]; that is how the storage
//! boundary's "load" operations surface.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};

use workshop_core::{
    DomainError, DomainResult, Entity, FaultId, InterventionId, InvoiceId, MechanicId, Money,
    TaxRate, VehicleId,
};

use crate::fault::Fault;
use crate::intervention::Intervention;
use crate::invoice::Invoice;
use crate::lifecycle::FaultLifecycle;
use crate::mechanic::Mechanic;
use crate::relations::Relations;
use crate::status::FaultStatus;
use crate::vehicle::Vehicle;

/// Last id handed out per entity kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Sequences {
    vehicle: u64,
    mechanic: u64,
    fault: u64,
    intervention: u64,
    invoice: u64,
}

fn next(counter: &mut u64) -> u64 {
    *counter += 1;
    *counter
}

/// In-memory graph of vehicles, mechanics, faults and invoices.
#[derive(Debug, Clone, Default)]
pub struct Workshop {
    vehicles: BTreeMap<VehicleId, Vehicle>,
    mechanics: BTreeMap<MechanicId, Mechanic>,
    faults: BTreeMap<FaultId, Fault>,
    invoices: BTreeMap<InvoiceId, Invoice>,
    relations: Relations,
    sequences: Sequences,
}

fn required(field: &str, value: String) -> DomainResult<String> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(DomainError::validation(format!("{field} must not be empty")));
    }
    Ok(value)
}

impl Workshop {
    pub fn new() -> Self {
        Self::default()
    }

    // ----------------------------------------------------------------------
    // Vehicles and mechanics
    // ----------------------------------------------------------------------

    pub fn register_vehicle(
        &mut self,
        plate: impl Into<String>,
        make: impl Into<String>,
        model: impl Into<String>,
    ) -> DomainResult<VehicleId> {
        let plate = required("plate", plate.into())?;
        if self.vehicles.values().any(|v| v.plate() == plate) {
            return Err(DomainError::conflict(format!(
                "a vehicle with plate {plate} is already registered"
            )));
        }
        let id = VehicleId::new(next(&mut self.sequences.vehicle));
        self.vehicles
            .insert(id, Vehicle::new(id, plate, make.into(), model.into()));
        Ok(id)
    }

    pub fn hire_mechanic(
        &mut self,
        dni: impl Into<String>,
        name: impl Into<String>,
        surname: impl Into<String>,
    ) -> DomainResult<MechanicId> {
        let dni = required("dni", dni.into())?;
        if self.mechanics.values().any(|m| m.dni() == dni) {
            return Err(DomainError::conflict(format!(
                "a mechanic with dni {dni} already exists"
            )));
        }
        let id = MechanicId::new(next(&mut self.sequences.mechanic));
        self.mechanics
            .insert(id, Mechanic::new(id, dni, name.into(), surname.into()));
        Ok(id)
    }

    pub fn vehicle(&self, id: VehicleId) -> DomainResult<&Vehicle> {
        self.vehicles
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("vehicle {id}")))
    }

    pub fn mechanic(&self, id: MechanicId) -> DomainResult<&Mechanic> {
        self.mechanics
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("mechanic {id}")))
    }

    pub fn vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.values()
    }

    /// Mechanics in id order.
    pub fn mechanics(&self) -> impl Iterator<Item = &Mechanic> {
        self.mechanics.values()
    }

    // ----------------------------------------------------------------------
    // Faults
    // ----------------------------------------------------------------------

    /// Report a new fault on `vehicle`. The fault starts open.
    ///
    /// A vehicle cannot have two faults reported at the same instant.
    pub fn open_fault(
        &mut self,
        vehicle: VehicleId,
        description: Option<String>,
        reported_at: DateTime<Utc>,
    ) -> DomainResult<FaultId> {
        self.vehicle(vehicle)?;
        let duplicate = self
            .relations
            .suffered
            .faults(vehicle)
            .filter_map(|id| self.faults.get(&id))
            .any(|f| f.reported_at() == reported_at);
        if duplicate {
            return Err(DomainError::conflict(format!(
                "vehicle {vehicle} already has a fault reported at {reported_at}"
            )));
        }

        let id = FaultId::new(next(&mut self.sequences.fault));
        self.faults.insert(id, Fault::new(id, description, reported_at));
        self.relations.suffered.link(vehicle, id);
        Ok(id)
    }

    pub fn fault(&self, id: FaultId) -> DomainResult<&Fault> {
        self.faults
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("fault {id}")))
    }

    pub fn faults(&self) -> impl Iterator<Item = &Fault> {
        self.faults.values()
    }

    pub fn set_fault_description(
        &mut self,
        id: FaultId,
        description: Option<String>,
    ) -> DomainResult<()> {
        let fault = self
            .faults
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("fault {id}")))?;
        fault.set_description(description);
        Ok(())
    }

    /// Record a priced intervention by `mechanic` on a fault.
    ///
    /// The fault's status is not checked: once a fault is finished its amount
    /// is fixed and later interventions are not added to it.
    pub fn record_intervention(
        &mut self,
        fault: FaultId,
        mechanic: MechanicId,
        minutes: u32,
        amount: Money,
    ) -> DomainResult<InterventionId> {
        self.mechanic(mechanic)?;
        let target = self
            .faults
            .get_mut(&fault)
            .ok_or_else(|| DomainError::not_found(format!("fault {fault}")))?;
        let id = InterventionId::new(next(&mut self.sequences.intervention));
        target.push_intervention(Intervention::new(id, fault, mechanic, minutes, amount));
        Ok(id)
    }

    /// Lifecycle handle for one fault.
    pub fn lifecycle(&mut self, id: FaultId) -> DomainResult<FaultLifecycle<'_>> {
        let fault = self
            .faults
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("fault {id}")))?;
        Ok(FaultLifecycle::new(fault, &self.mechanics, &mut self.relations))
    }

    // ----------------------------------------------------------------------
    // Relation views
    // ----------------------------------------------------------------------

    pub fn relations(&self) -> &Relations {
        &self.relations
    }

    pub fn vehicle_of(&self, fault: FaultId) -> Option<VehicleId> {
        self.relations.suffered.owner(fault)
    }

    pub fn mechanic_of(&self, fault: FaultId) -> Option<MechanicId> {
        self.relations.assigned.owner(fault)
    }

    pub fn invoice_of(&self, fault: FaultId) -> Option<InvoiceId> {
        self.relations.billed.owner(fault)
    }

    /// Faults the vehicle has suffered, in id order.
    pub fn faults_of_vehicle(&self, vehicle: VehicleId) -> impl Iterator<Item = &Fault> {
        self.related(self.relations.suffered.faults(vehicle))
    }

    /// Faults currently assigned to the mechanic, in id order.
    pub fn faults_assigned_to(&self, mechanic: MechanicId) -> impl Iterator<Item = &Fault> {
        self.related(self.relations.assigned.faults(mechanic))
    }

    /// Faults covered by the invoice, in id order.
    pub fn faults_on_invoice(&self, invoice: InvoiceId) -> impl Iterator<Item = &Fault> {
        self.related(self.relations.billed.faults(invoice))
    }

    fn related<'a>(
        &'a self,
        ids: impl Iterator<Item = FaultId> + 'a,
    ) -> impl Iterator<Item = &'a Fault> + 'a {
        ids.filter_map(|id| self.faults.get(&id))
    }

    // ----------------------------------------------------------------------
    // Invoices
    // ----------------------------------------------------------------------

    /// Sequence number the next invoice will get.
    pub fn next_invoice_number(&self) -> u64 {
        self.invoices
            .values()
            .map(Invoice::number)
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Create an empty invoice with the next sequence number. Its totals stay
    /// zero until faults are put on it with [`Workshop::invoice_faults`].
    pub fn issue_invoice(&mut self, issued_at: DateTime<Utc>, tax_rate: TaxRate) -> InvoiceId {
        let number = self.next_invoice_number();
        let id = InvoiceId::new(next(&mut self.sequences.invoice));
        self.invoices
            .insert(id, Invoice::new(id, number, issued_at, tax_rate, Money::ZERO));
        id
    }

    pub fn invoice(&self, id: InvoiceId) -> DomainResult<&Invoice> {
        self.invoices
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("invoice {id}")))
    }

    pub fn invoice_by_number(&self, number: u64) -> DomainResult<&Invoice> {
        self.invoices
            .values()
            .find(|i| i.number() == number)
            .ok_or_else(|| DomainError::not_found(format!("invoice number {number}")))
    }

    pub fn invoices(&self) -> impl Iterator<Item = &Invoice> {
        self.invoices.values()
    }

    /// Put finished faults on `invoice`: each one becomes invoiced and linked
    /// to it, and the invoice totals are recomputed.
    ///
    /// Nothing changes unless every fault exists, is finished and is listed
    /// once.
    pub fn invoice_faults(&mut self, invoice: InvoiceId, faults: &[FaultId]) -> DomainResult<&Invoice> {
        self.invoice(invoice)?;
        let mut seen = BTreeSet::new();
        for &fault in faults {
            let status = self.fault(fault)?.status();
            if status != FaultStatus::Finished {
                return Err(DomainError::invariant(format!(
                    "fault {fault} is {status}; only finished faults can be invoiced"
                )));
            }
            if !seen.insert(fault) {
                return Err(DomainError::invariant(format!(
                    "fault {fault} is listed more than once"
                )));
            }
        }

        for &fault in faults {
            self.lifecycle(fault)?.mark_invoiced()?;
            self.link_invoice(invoice, fault)?;
        }
        self.retotal_invoice(invoice)
    }

    /// Take `fault` off `invoice`: the link goes, the fault is finished again
    /// and the invoice totals are recomputed.
    pub fn release_from_invoice(&mut self, invoice: InvoiceId, fault: FaultId) -> DomainResult<&Invoice> {
        self.unlink_invoice(invoice, fault)?;
        self.lifecycle(fault)?.mark_back_to_finished()?;
        self.retotal_invoice(invoice)
    }

    fn link_invoice(&mut self, invoice: InvoiceId, fault: FaultId) -> DomainResult<()> {
        let status = self.fault(fault)?.status();
        if status != FaultStatus::Invoiced {
            return Err(DomainError::invariant(format!(
                "fault {fault} is {status}; only invoiced faults can be linked to an invoice"
            )));
        }
        if let Some(current) = self.invoice_of(fault) {
            if current != invoice {
                return Err(DomainError::invariant(format!(
                    "fault {fault} already belongs to invoice {current}"
                )));
            }
        }
        self.relations.billed.link(invoice, fault);
        Ok(())
    }

    fn unlink_invoice(&mut self, invoice: InvoiceId, fault: FaultId) -> DomainResult<()> {
        self.invoice(invoice)?;
        self.fault(fault)?;
        if !self.relations.billed.contains(invoice, fault) {
            return Err(DomainError::invariant(format!(
                "fault {fault} is not on invoice {invoice}"
            )));
        }
        self.relations.billed.unlink(invoice, fault);
        Ok(())
    }

    /// Recompute an invoice's totals from the faults it covers.
    fn retotal_invoice(&mut self, id: InvoiceId) -> DomainResult<&Invoice> {
        let pre_tax: Money = self.faults_on_invoice(id).map(Fault::amount).sum();
        let invoice = self
            .invoices
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("invoice {id}")))?;
        invoice.retotal(pre_tax);
        Ok(&*invoice)
    }
}
