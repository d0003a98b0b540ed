use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use workshop_core::{DomainResult, Entity, FaultId, InvoiceId, Money, TaxRate};
use workshop_model::Workshop;

/// What the caller gets back after an invoice is issued or changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceSummary {
    pub invoice_id: InvoiceId,
    pub number: u64,
    pub issued_at: DateTime<Utc>,
    pub tax_rate: TaxRate,
    pub pre_tax_total: Money,
    pub tax: Money,
    pub total: Money,
    /// Faults covered by the invoice, in id order.
    pub faults: Vec<FaultId>,
}

impl InvoiceSummary {
    pub fn of(workshop: &Workshop, id: InvoiceId) -> DomainResult<Self> {
        let invoice = workshop.invoice(id)?;
        Ok(Self {
            invoice_id: invoice.id(),
            number: invoice.number(),
            issued_at: invoice.issued_at(),
            tax_rate: invoice.tax_rate(),
            pre_tax_total: invoice.pre_tax_total(),
            tax: invoice.tax(),
            total: invoice.total(),
            faults: workshop.faults_on_invoice(id).map(Entity::id).collect(),
        })
    }
}

/// Printable invoice header:
///
/// ```text
/// Invoice no.: 1
///     Date: 14/11/2023
///     Total: 150.00 €
///     Tax (21.0 %): 31.50 €
///     Total incl. tax: 181.50 €
/// ```
impl fmt::Display for InvoiceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Invoice no.: {}", self.number)?;
        writeln!(f, "\tDate: {}", self.issued_at.format("%d/%m/%Y"))?;
        writeln!(f, "\tTotal: {} €", self.pre_tax_total)?;
        writeln!(f, "\tTax ({}): {} €", self.tax_rate, self.tax)?;
        write!(f, "\tTotal incl. tax: {} €", self.total)
    }
}
