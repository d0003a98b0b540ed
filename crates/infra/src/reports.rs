//! Read-only projections for listings.

use serde::{Deserialize, Serialize};

use workshop_core::{Entity, MechanicId};
use workshop_model::Mechanic;

use crate::store::{StoreError, WorkshopStore};

/// One row of the mechanics listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MechanicRecord {
    pub id: MechanicId,
    pub name: String,
    pub surname: String,
}

impl From<&Mechanic> for MechanicRecord {
    fn from(mechanic: &Mechanic) -> Self {
        Self {
            id: mechanic.id(),
            name: mechanic.name().to_string(),
            surname: mechanic.surname().to_string(),
        }
    }
}

/// Every stored mechanic, ordered by id.
pub fn find_all_mechanics<S: WorkshopStore>(store: &S) -> Result<Vec<MechanicRecord>, StoreError> {
    let workshop = store.snapshot()?;
    Ok(workshop.mechanics().map(MechanicRecord::from).collect())
}
