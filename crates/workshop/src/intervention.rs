use serde::{Deserialize, Serialize};

use workshop_core::{Entity, FaultId, InterventionId, MechanicId, Money};

/// A repair action performed on a fault.
///
/// `amount` is already priced (labour and parts); how it was computed is not
/// this crate's business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intervention {
    id: InterventionId,
    fault: FaultId,
    mechanic: MechanicId,
    minutes: u32,
    amount: Money,
}

impl Intervention {
    pub(crate) fn new(
        id: InterventionId,
        fault: FaultId,
        mechanic: MechanicId,
        minutes: u32,
        amount: Money,
    ) -> Self {
        Self {
            id,
            fault,
            mechanic,
            minutes,
            amount,
        }
    }

    pub fn fault(&self) -> FaultId {
        self.fault
    }

    pub fn mechanic(&self) -> MechanicId {
        self.mechanic
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn amount(&self) -> Money {
        self.amount
    }
}

impl Entity for Intervention {
    type Id = InterventionId;

    fn id(&self) -> InterventionId {
        self.id
    }
}
