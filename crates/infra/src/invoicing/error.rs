use thiserror::Error;

use workshop_core::{DomainError, FaultId};
use workshop_model::FaultStatus;

use crate::store::StoreError;

/// Business and infrastructure failures of the invoicing service.
///
/// Any of these means the whole request was rejected and nothing was stored.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvoicingError {
    #[error("no faults selected for invoicing")]
    EmptyBatch,

    #[error("fault {0} is selected more than once")]
    DuplicateFault(FaultId),

    #[error("fault {0} does not exist")]
    FaultNotFound(FaultId),

    #[error("fault {fault} is {status}; only finished faults can be invoiced")]
    FaultNotFinished { fault: FaultId, status: FaultStatus },

    #[error("invoice number {0} does not exist")]
    InvoiceNotFound(u64),

    #[error("fault {fault} is not on invoice number {number}")]
    FaultNotOnInvoice { number: u64, fault: FaultId },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl InvoicingError {
    /// True when the request lost an optimistic concurrency race and may be
    /// retried as is.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Store(StoreError::Concurrency(_)))
    }
}
