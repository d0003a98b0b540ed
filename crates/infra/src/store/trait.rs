use std::sync::Arc;

use thiserror::Error;

use workshop_core::ExpectedVersion;
use workshop_model::Workshop;

/// A copy of the stored graph together with the version it was read at.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub version: u64,
    pub workshop: Workshop,
}

/// Storage operation error.
///
/// These are **infrastructure errors**, as opposed to the domain errors
/// raised by the model.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("optimistic concurrency check failed: {0}")]
    Concurrency(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Versioned storage for the workshop graph.
///
/// ## Commit Semantics
///
/// `commit()` replaces the stored graph atomically and returns the new
/// version. It must fail with [`StoreError::Concurrency`] when the stored
/// version does not match `expected`, so a transaction never overwrites a
/// commit it did not see.
pub trait WorkshopStore: Send + Sync {
    /// Read the current graph.
    fn load(&self) -> Result<Snapshot, StoreError>;

    /// Replace the stored graph (all or nothing).
    fn commit(&self, workshop: Workshop, expected: ExpectedVersion) -> Result<u64, StoreError>;

    /// Run `work` against a private copy of the graph and commit the copy if
    /// `work` succeeds. Errors from `work` discard the copy.
    fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        Self: Sized,
        F: FnOnce(&mut Workshop) -> Result<T, E>,
        E: From<StoreError>,
    {
        let Snapshot {
            version,
            mut workshop,
        } = self.load()?;
        let out = work(&mut workshop)?;
        self.commit(workshop, ExpectedVersion::Exact(version))?;
        Ok(out)
    }

    /// Read-only view of the current graph.
    fn snapshot(&self) -> Result<Workshop, StoreError> {
        Ok(self.load()?.workshop)
    }
}

impl<S> WorkshopStore for Arc<S>
where
    S: WorkshopStore + ?Sized,
{
    fn load(&self) -> Result<Snapshot, StoreError> {
        (**self).load()
    }

    fn commit(&self, workshop: Workshop, expected: ExpectedVersion) -> Result<u64, StoreError> {
        (**self).commit(workshop, expected)
    }
}
