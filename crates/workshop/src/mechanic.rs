use serde::{Deserialize, Serialize};

use workshop_core::{Entity, MechanicId};

/// A workshop mechanic, identified in the real world by their national id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mechanic {
    id: MechanicId,
    dni: String,
    name: String,
    surname: String,
}

impl Mechanic {
    pub(crate) fn new(id: MechanicId, dni: String, name: String, surname: String) -> Self {
        Self {
            id,
            dni,
            name,
            surname,
        }
    }

    pub fn dni(&self) -> &str {
        &self.dni
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn surname(&self) -> &str {
        &self.surname
    }
}

impl Entity for Mechanic {
    type Id = MechanicId;

    fn id(&self) -> MechanicId {
        self.id
    }
}
