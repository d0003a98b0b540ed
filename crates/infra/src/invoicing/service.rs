use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use workshop_core::{DomainError, Entity, FaultId};
use workshop_model::{FaultStatus, Workshop};

use super::error::InvoicingError;
use super::summary::InvoiceSummary;
use crate::config::TaxRateSource;
use crate::store::WorkshopStore;

/// Invoice a batch of finished faults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateInvoice {
    pub fault_ids: Vec<FaultId>,
    /// Issue timestamp of the invoice.
    pub occurred_at: DateTime<Utc>,
}

/// Take one fault off an existing invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseFault {
    pub invoice_number: u64,
    pub fault: FaultId,
}

/// Issues invoices against a [`WorkshopStore`].
///
/// Each request runs in exactly one store transaction: either every effect
/// (new invoice, status changes, links) is committed or none is.
#[derive(Debug)]
pub struct InvoicingService<S, R> {
    store: S,
    tax_rates: R,
}

impl<S, R> InvoicingService<S, R>
where
    S: WorkshopStore,
    R: TaxRateSource,
{
    pub fn new(store: S, tax_rates: R) -> Self {
        Self { store, tax_rates }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Issue one invoice covering `cmd.fault_ids`.
    ///
    /// Every fault must exist and be finished. Totals are the sum of the
    /// fault amounts plus tax at the configured rate.
    pub fn create_invoice(&self, cmd: CreateInvoice) -> Result<InvoiceSummary, InvoicingError> {
        let result = self
            .store
            .transaction(|workshop| self.issue(workshop, &cmd));

        match &result {
            Ok(summary) => tracing::info!(
                number = summary.number,
                faults = summary.faults.len(),
                total = %summary.total,
                "invoice issued"
            ),
            Err(err) => tracing::warn!(
                faults = cmd.fault_ids.len(),
                error = %err,
                "invoice request rejected"
            ),
        }
        result
    }

    fn issue(
        &self,
        workshop: &mut Workshop,
        cmd: &CreateInvoice,
    ) -> Result<InvoiceSummary, InvoicingError> {
        validate_batch(&cmd.fault_ids)?;

        for &id in &cmd.fault_ids {
            let fault = workshop
                .fault(id)
                .map_err(|_| InvoicingError::FaultNotFound(id))?;
            if fault.status() != FaultStatus::Finished {
                return Err(InvoicingError::FaultNotFinished {
                    fault: id,
                    status: fault.status(),
                });
            }
        }

        let invoice = workshop.issue_invoice(cmd.occurred_at, self.tax_rates.tax_rate());
        workshop.invoice_faults(invoice, &cmd.fault_ids)?;

        Ok(InvoiceSummary::of(workshop, invoice)?)
    }

    /// Remove a fault from an invoice.
    ///
    /// The fault goes back to finished and the invoice is re-totalled at its
    /// original tax rate.
    pub fn release_fault(&self, cmd: ReleaseFault) -> Result<InvoiceSummary, InvoicingError> {
        let summary = self.store.transaction(|workshop| {
            let invoice = workshop
                .invoice_by_number(cmd.invoice_number)
                .map_err(|_| InvoicingError::InvoiceNotFound(cmd.invoice_number))?
                .id();

            workshop
                .release_from_invoice(invoice, cmd.fault)
                .map_err(|err| match err {
                    DomainError::NotFound(_) => InvoicingError::FaultNotFound(cmd.fault),
                    _ => InvoicingError::FaultNotOnInvoice {
                        number: cmd.invoice_number,
                        fault: cmd.fault,
                    },
                })?;

            Ok::<_, InvoicingError>(InvoiceSummary::of(workshop, invoice)?)
        })?;

        tracing::info!(
            number = summary.number,
            fault = %cmd.fault,
            total = %summary.total,
            "fault released from invoice"
        );
        Ok(summary)
    }

    pub fn find_invoice(&self, number: u64) -> Result<InvoiceSummary, InvoicingError> {
        let workshop = self.store.snapshot()?;
        let invoice = workshop
            .invoice_by_number(number)
            .map_err(|_| InvoicingError::InvoiceNotFound(number))?;
        Ok(InvoiceSummary::of(&workshop, invoice.id())?)
    }
}

fn validate_batch(ids: &[FaultId]) -> Result<(), InvoicingError> {
    if ids.is_empty() {
        return Err(InvoicingError::EmptyBatch);
    }
    let mut seen = BTreeSet::new();
    for &id in ids {
        if !seen.insert(id) {
            return Err(InvoicingError::DuplicateFault(id));
        }
    }
    Ok(())
}
