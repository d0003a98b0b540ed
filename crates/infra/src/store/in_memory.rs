use std::sync::RwLock;

use workshop_core::ExpectedVersion;
use workshop_model::Workshop;

use super::r#trait::{Snapshot, StoreError, WorkshopStore};

/// In-memory workshop store.
///
/// Intended for tests/dev. Each load clones the whole graph.
#[derive(Debug, Default)]
pub struct InMemoryWorkshopStore {
    state: RwLock<Snapshot>,
}

impl InMemoryWorkshopStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with an existing graph, at version 0.
    pub fn with_workshop(workshop: Workshop) -> Self {
        Self {
            state: RwLock::new(Snapshot {
                version: 0,
                workshop,
            }),
        }
    }
}

impl WorkshopStore for InMemoryWorkshopStore {
    fn load(&self) -> Result<Snapshot, StoreError> {
        let state = self
            .state
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(state.clone())
    }

    fn commit(&self, workshop: Workshop, expected: ExpectedVersion) -> Result<u64, StoreError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        if !expected.matches(state.version) {
            return Err(StoreError::Concurrency(format!(
                "expected {expected:?}, found {}",
                state.version
            )));
        }

        state.version += 1;
        state.workshop = workshop;
        Ok(state.version)
    }
}
