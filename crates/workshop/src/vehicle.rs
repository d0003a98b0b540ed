use serde::{Deserialize, Serialize};

use workshop_core::{Entity, VehicleId};

/// A customer vehicle.
///
/// The faults it has suffered are not stored here; ask the
/// [`Workshop`](crate::Workshop) for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    id: VehicleId,
    plate: String,
    make: String,
    model: String,
}

impl Vehicle {
    pub(crate) fn new(id: VehicleId, plate: String, make: String, model: String) -> Self {
        Self {
            id,
            plate,
            make,
            model,
        }
    }

    pub fn plate(&self) -> &str {
        &self.plate
    }

    pub fn make(&self) -> &str {
        &self.make
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl Entity for Vehicle {
    type Id = VehicleId;

    fn id(&self) -> VehicleId {
        self.id
    }
}
