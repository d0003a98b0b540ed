//! Repair workflow: faults and their lifecycle, one transaction per call.

use chrono::{DateTime, Utc};
use thiserror::Error;

use workshop_core::{DomainError, FaultId, InterventionId, MechanicId, Money, VehicleId};
use workshop_model::{Transition, Workshop};

use crate::store::{StoreError, WorkshopStore};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RepairError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Drives faults from report to finished repair against a [`WorkshopStore`].
///
/// Out-of-order transitions come back as [`Transition::Ignored`] and commit
/// nothing new; only lookups and store failures are errors.
#[derive(Debug)]
pub struct RepairService<S> {
    store: S,
}

impl<S: WorkshopStore> RepairService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn run<T>(
        &self,
        work: impl FnOnce(&mut Workshop) -> Result<T, RepairError>,
    ) -> Result<T, RepairError> {
        self.store.transaction(work)
    }

    pub fn register_vehicle(
        &self,
        plate: &str,
        make: &str,
        model: &str,
    ) -> Result<VehicleId, RepairError> {
        self.run(|workshop| {
            Ok(workshop.register_vehicle(plate, make, model)?)
        })
    }

    pub fn hire_mechanic(
        &self,
        dni: &str,
        name: &str,
        surname: &str,
    ) -> Result<MechanicId, RepairError> {
        self.run(|workshop| Ok(workshop.hire_mechanic(dni, name, surname)?))
    }

    pub fn open_fault(
        &self,
        vehicle: VehicleId,
        description: Option<String>,
        reported_at: DateTime<Utc>,
    ) -> Result<FaultId, RepairError> {
        let fault = self.run(|workshop| {
            Ok(workshop.open_fault(vehicle, description, reported_at)?)
        })?;
        tracing::info!(%fault, %vehicle, "fault reported");
        Ok(fault)
    }

    pub fn describe_fault(
        &self,
        fault: FaultId,
        description: Option<String>,
    ) -> Result<(), RepairError> {
        self.run(|workshop| {
            Ok(workshop.set_fault_description(fault, description)?)
        })
    }

    pub fn record_intervention(
        &self,
        fault: FaultId,
        mechanic: MechanicId,
        minutes: u32,
        amount: Money,
    ) -> Result<InterventionId, RepairError> {
        self.run(|workshop| {
            Ok(workshop.record_intervention(fault, mechanic, minutes, amount)?)
        })
    }

    pub fn assign(&self, fault: FaultId, mechanic: MechanicId) -> Result<Transition, RepairError> {
        self.run(|workshop| Ok(workshop.lifecycle(fault)?.assign(mechanic)?))
    }

    /// # Panics
    ///
    /// If the fault is not assigned. Nothing is committed in that case.
    pub fn unassign(&self, fault: FaultId) -> Result<(), RepairError> {
        self.run(|workshop| {
            workshop.lifecycle(fault)?.unassign();
            Ok(())
        })
    }

    pub fn finish(&self, fault: FaultId) -> Result<Transition, RepairError> {
        let transition = self.run(|workshop| Ok(workshop.lifecycle(fault)?.finish()?))?;
        if transition.is_applied() {
            tracing::info!(%fault, "repair finished");
        }
        Ok(transition)
    }

    pub fn reopen(&self, fault: FaultId) -> Result<Transition, RepairError> {
        self.run(|workshop| Ok(workshop.lifecycle(fault)?.reopen()?))
    }
}
