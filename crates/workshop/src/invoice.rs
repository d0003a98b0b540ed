use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use workshop_core::{Entity, InvoiceId, Money, TaxRate, ValueObject};

/// Invoice amounts: pre-tax base, tax, and tax-inclusive total.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub pre_tax: Money,
    pub tax: Money,
    pub total: Money,
}

impl ValueObject for InvoiceTotals {}

impl InvoiceTotals {
    pub fn compute(pre_tax: Money, rate: TaxRate) -> Self {
        let tax = rate.tax_on(pre_tax);
        Self {
            pre_tax,
            tax,
            total: pre_tax + tax,
        }
    }
}

/// An invoice issued for a batch of finished faults.
///
/// The faults it covers are held in the [`Relations`](crate::Relations) table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    id: InvoiceId,
    number: u64,
    issued_at: DateTime<Utc>,
    tax_rate: TaxRate,
    totals: InvoiceTotals,
}

impl Invoice {
    pub(crate) fn new(
        id: InvoiceId,
        number: u64,
        issued_at: DateTime<Utc>,
        tax_rate: TaxRate,
        pre_tax: Money,
    ) -> Self {
        Self {
            id,
            number,
            issued_at,
            tax_rate,
            totals: InvoiceTotals::compute(pre_tax, tax_rate),
        }
    }

    /// Sequence number printed on the invoice.
    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    pub fn totals(&self) -> InvoiceTotals {
        self.totals
    }

    pub fn pre_tax_total(&self) -> Money {
        self.totals.pre_tax
    }

    pub fn tax(&self) -> Money {
        self.totals.tax
    }

    pub fn total(&self) -> Money {
        self.totals.total
    }

    pub(crate) fn retotal(&mut self, pre_tax: Money) {
        self.totals = InvoiceTotals::compute(pre_tax, self.tax_rate);
    }
}

impl Entity for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> InvoiceId {
        self.id
    }
}
