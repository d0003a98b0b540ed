use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use workshop_core::{Entity, FaultId, Money};

use crate::intervention::Intervention;
use crate::status::FaultStatus;

/// A fault ("averia") reported on a vehicle.
///
/// Status and amount only change through [`FaultLifecycle`](crate::FaultLifecycle).
/// The vehicle, mechanic and invoice links live in the
/// [`Relations`](crate::Relations) table, not on the fault itself.
///
/// # Identity
///
/// Two faults are equal when they were reported at the same instant, whatever
/// their ids: `PartialEq` and `Hash` look at `reported_at` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fault {
    id: FaultId,
    description: Option<String>,
    reported_at: DateTime<Utc>,
    amount: Money,
    status: FaultStatus,
    interventions: Vec<Intervention>,
}

impl Fault {
    pub(crate) fn new(id: FaultId, description: Option<String>, reported_at: DateTime<Utc>) -> Self {
        Self {
            id,
            description,
            reported_at,
            amount: Money::ZERO,
            status: FaultStatus::Open,
            interventions: Vec::new(),
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn reported_at(&self) -> DateTime<Utc> {
        self.reported_at
    }

    /// Accumulated amount; zero until the fault is finished.
    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn status(&self) -> FaultStatus {
        self.status
    }

    pub fn is_assigned(&self) -> bool {
        self.status == FaultStatus::Assigned
    }

    /// Interventions in the order they were recorded.
    pub fn interventions(&self) -> &[Intervention] {
        &self.interventions
    }

    pub(crate) fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    pub(crate) fn set_status(&mut self, status: FaultStatus) {
        self.status = status;
    }

    pub(crate) fn set_amount(&mut self, amount: Money) {
        self.amount = amount;
    }

    pub(crate) fn push_intervention(&mut self, intervention: Intervention) {
        self.interventions.push(intervention);
    }
}

impl Entity for Fault {
    type Id = FaultId;

    fn id(&self) -> FaultId {
        self.id
    }
}

impl PartialEq for Fault {
    fn eq(&self, other: &Self) -> bool {
        self.reported_at == other.reported_at
    }
}

impl Eq for Fault {}

impl core::hash::Hash for Fault {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.reported_at.hash(state);
    }
}
