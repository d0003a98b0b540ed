//! Integration tests for the repair and invoicing pipeline.
//!
//! Tests: RepairService → WorkshopStore → InvoicingService → InvoiceSummary
//!
//! Verifies:
//! - Invoices total the finished faults and apply the configured tax
//! - Rejected batches leave the stored graph untouched
//! - Optimistic concurrency conflicts are detected and nothing is persisted

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use chrono::{DateTime, TimeZone, Utc};

    use workshop_core::{ExpectedVersion, FaultId, MechanicId, Money, TaxRate, VehicleId};
    use workshop_model::{FaultStatus, Workshop};

    use crate::config::WorkshopConfig;
    use crate::invoicing::{CreateInvoice, InvoicingError, InvoicingService, ReleaseFault};
    use crate::repairs::RepairService;
    use crate::reports::{MechanicRecord, find_all_mechanics};
    use crate::store::{InMemoryWorkshopStore, Snapshot, StoreError, WorkshopStore};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn money(v: f64) -> Money {
        Money::new(v).unwrap()
    }

    struct Shop {
        store: Arc<InMemoryWorkshopStore>,
        repairs: RepairService<Arc<InMemoryWorkshopStore>>,
        invoicing: InvoicingService<Arc<InMemoryWorkshopStore>, TaxRate>,
        vehicle: VehicleId,
        mechanic: MechanicId,
    }

    fn setup() -> Shop {
        let store = Arc::new(InMemoryWorkshopStore::new());
        let repairs = RepairService::new(store.clone());
        let invoicing = InvoicingService::new(store.clone(), TaxRate::percent(21.0).unwrap());
        let vehicle = repairs.register_vehicle("1234-BCD", "Seat", "Ibiza").unwrap();
        let mechanic = repairs.hire_mechanic("12345678Z", "Ana", "Ruiz").unwrap();
        Shop {
            store,
            repairs,
            invoicing,
            vehicle,
            mechanic,
        }
    }

    impl Shop {
        /// Report, repair and finish a fault costing `cost`.
        fn finished_fault(&self, reported: i64, cost: f64) -> FaultId {
            let fault = self
                .repairs
                .open_fault(self.vehicle, None, at(reported))
                .unwrap();
            self.repairs.assign(fault, self.mechanic).unwrap();
            self.repairs
                .record_intervention(fault, self.mechanic, 60, money(cost))
                .unwrap();
            self.repairs.finish(fault).unwrap();
            fault
        }

        fn snapshot(&self) -> Workshop {
            self.store.snapshot().unwrap()
        }
    }

    #[test]
    fn invoice_totals_finished_faults_with_tax() {
        let shop = setup();
        let f1 = shop.finished_fault(0, 100.0);
        let f2 = shop.finished_fault(1, 50.0);

        let summary = shop
            .invoicing
            .create_invoice(CreateInvoice {
                fault_ids: vec![f1, f2],
                occurred_at: at(3_600),
            })
            .unwrap();

        assert_eq!(summary.number, 1);
        assert_eq!(summary.issued_at, at(3_600));
        assert_eq!(summary.pre_tax_total.value(), 150.0);
        assert_eq!(summary.tax.value(), 31.5);
        assert_eq!(summary.total.value(), 181.5);
        assert_eq!(summary.faults, vec![f1, f2]);

        let workshop = shop.snapshot();
        for fault in [f1, f2] {
            assert_eq!(workshop.fault(fault).unwrap().status(), FaultStatus::Invoiced);
            assert_eq!(workshop.invoice_of(fault), Some(summary.invoice_id));
        }
        assert!(workshop.relations().is_symmetric());
    }

    #[test]
    fn invoice_numbers_follow_the_highest_issued() {
        let shop = setup();
        let f1 = shop.finished_fault(0, 10.0);
        let f2 = shop.finished_fault(1, 20.0);

        let first = shop
            .invoicing
            .create_invoice(CreateInvoice {
                fault_ids: vec![f1],
                occurred_at: at(10),
            })
            .unwrap();
        let second = shop
            .invoicing
            .create_invoice(CreateInvoice {
                fault_ids: vec![f2],
                occurred_at: at(20),
            })
            .unwrap();

        assert_eq!((first.number, second.number), (1, 2));
    }

    #[test]
    fn unfinished_fault_rejects_the_whole_batch() {
        let shop = setup();
        let finished = shop.finished_fault(0, 100.0);
        let open = shop.repairs.open_fault(shop.vehicle, None, at(1)).unwrap();
        let version_before = shop.store.load().unwrap().version;

        let err = shop
            .invoicing
            .create_invoice(CreateInvoice {
                fault_ids: vec![finished, open],
                occurred_at: at(3_600),
            })
            .unwrap_err();

        assert_eq!(
            err,
            InvoicingError::FaultNotFinished {
                fault: open,
                status: FaultStatus::Open,
            }
        );
        let snapshot = shop.store.load().unwrap();
        assert_eq!(snapshot.version, version_before);
        assert_eq!(snapshot.workshop.invoices().count(), 0);
        assert_eq!(
            snapshot.workshop.fault(finished).unwrap().status(),
            FaultStatus::Finished
        );
        assert_eq!(snapshot.workshop.invoice_of(finished), None);
    }

    #[test]
    fn unknown_and_repeated_faults_are_named_errors() {
        let shop = setup();
        let fault = shop.finished_fault(0, 100.0);

        let err = shop
            .invoicing
            .create_invoice(CreateInvoice {
                fault_ids: vec![fault, FaultId::new(404)],
                occurred_at: at(10),
            })
            .unwrap_err();
        assert_eq!(err, InvoicingError::FaultNotFound(FaultId::new(404)));

        let err = shop
            .invoicing
            .create_invoice(CreateInvoice {
                fault_ids: vec![fault, fault],
                occurred_at: at(10),
            })
            .unwrap_err();
        assert_eq!(err, InvoicingError::DuplicateFault(fault));

        let err = shop
            .invoicing
            .create_invoice(CreateInvoice {
                fault_ids: vec![],
                occurred_at: at(10),
            })
            .unwrap_err();
        assert_eq!(err, InvoicingError::EmptyBatch);

        assert_eq!(shop.snapshot().invoices().count(), 0);
    }

    /// Store whose commits always fail after the work succeeded.
    struct FailingCommitStore(InMemoryWorkshopStore);

    impl WorkshopStore for FailingCommitStore {
        fn load(&self) -> Result<Snapshot, StoreError> {
            self.0.load()
        }

        fn commit(&self, _: Workshop, _: ExpectedVersion) -> Result<u64, StoreError> {
            Err(StoreError::Unavailable("disk full".into()))
        }
    }

    #[test]
    fn failed_commit_persists_nothing() {
        let shop = setup();
        let fault = shop.finished_fault(0, 100.0);
        let workshop = shop.snapshot();

        let invoicing = InvoicingService::new(
            FailingCommitStore(InMemoryWorkshopStore::with_workshop(workshop)),
            WorkshopConfig::default(),
        );
        let err = invoicing
            .create_invoice(CreateInvoice {
                fault_ids: vec![fault],
                occurred_at: at(10),
            })
            .unwrap_err();

        assert!(matches!(err, InvoicingError::Store(StoreError::Unavailable(_))));
        let stored = invoicing.store().snapshot().unwrap();
        assert_eq!(stored.invoices().count(), 0);
        assert_eq!(stored.fault(fault).unwrap().status(), FaultStatus::Finished);
    }

    /// Store where another writer commits right after the first load.
    struct RacingStore {
        inner: InMemoryWorkshopStore,
        raced: AtomicBool,
    }

    impl WorkshopStore for RacingStore {
        fn load(&self) -> Result<Snapshot, StoreError> {
            let snapshot = self.inner.load()?;
            if !self.raced.swap(true, Ordering::SeqCst) {
                let mut other = snapshot.workshop.clone();
                other.hire_mechanic("87654321X", "Luis", "Gil").unwrap();
                self.inner.commit(other, ExpectedVersion::Any)?;
            }
            Ok(snapshot)
        }

        fn commit(&self, workshop: Workshop, expected: ExpectedVersion) -> Result<u64, StoreError> {
            self.inner.commit(workshop, expected)
        }
    }

    #[test]
    fn concurrent_commit_makes_the_invoice_fail() {
        let shop = setup();
        let fault = shop.finished_fault(0, 100.0);

        let invoicing = InvoicingService::new(
            RacingStore {
                inner: InMemoryWorkshopStore::with_workshop(shop.snapshot()),
                raced: AtomicBool::new(false),
            },
            WorkshopConfig::default(),
        );
        let cmd = CreateInvoice {
            fault_ids: vec![fault],
            occurred_at: at(10),
        };

        let err = invoicing.create_invoice(cmd.clone()).unwrap_err();
        assert!(err.is_conflict());
        let stored = invoicing.store().snapshot().unwrap();
        assert_eq!(stored.invoices().count(), 0);
        assert_eq!(stored.mechanics().count(), 2);

        // A retry sees the other writer's commit and goes through.
        let summary = invoicing.create_invoice(cmd).unwrap();
        assert_eq!(summary.number, 1);
    }

    #[test]
    fn released_fault_is_finished_again_and_invoice_is_retotalled() {
        let shop = setup();
        let f1 = shop.finished_fault(0, 100.0);
        let f2 = shop.finished_fault(1, 50.0);
        let issued = shop
            .invoicing
            .create_invoice(CreateInvoice {
                fault_ids: vec![f1, f2],
                occurred_at: at(10),
            })
            .unwrap();

        let summary = shop
            .invoicing
            .release_fault(ReleaseFault {
                invoice_number: issued.number,
                fault: f2,
            })
            .unwrap();

        assert_eq!(summary.faults, vec![f1]);
        assert_eq!(summary.pre_tax_total.value(), 100.0);
        assert_eq!(summary.tax.value(), 21.0);
        assert_eq!(summary.total.value(), 121.0);

        let workshop = shop.snapshot();
        let released = workshop.fault(f2).unwrap();
        assert_eq!(released.status(), FaultStatus::Finished);
        assert_eq!(released.amount().value(), 50.0);
        assert_eq!(workshop.invoice_of(f2), None);
        assert!(workshop.relations().is_symmetric());

        assert_eq!(shop.invoicing.find_invoice(issued.number).unwrap(), summary);
    }

    #[test]
    fn released_fault_can_be_repaired_and_invoiced_again() {
        let shop = setup();
        let fault = shop.finished_fault(0, 100.0);
        let first = shop
            .invoicing
            .create_invoice(CreateInvoice {
                fault_ids: vec![fault],
                occurred_at: at(10),
            })
            .unwrap();
        shop.invoicing
            .release_fault(ReleaseFault {
                invoice_number: first.number,
                fault,
            })
            .unwrap();

        shop.repairs.reopen(fault).unwrap();
        assert_eq!(shop.snapshot().invoice_of(fault), None);
        shop.repairs.assign(fault, shop.mechanic).unwrap();
        shop.repairs.finish(fault).unwrap();

        let second = shop
            .invoicing
            .create_invoice(CreateInvoice {
                fault_ids: vec![fault],
                occurred_at: at(20),
            })
            .unwrap();

        assert_eq!(second.number, 2);
        assert_eq!(second.faults, vec![fault]);
        let workshop = shop.snapshot();
        assert_eq!(workshop.invoice_of(fault), Some(second.invoice_id));
        assert!(shop.invoicing.find_invoice(first.number).unwrap().faults.is_empty());
    }

    #[test]
    fn releasing_a_fault_not_on_the_invoice_fails() {
        let shop = setup();
        let f1 = shop.finished_fault(0, 100.0);
        let f2 = shop.finished_fault(1, 50.0);
        let issued = shop
            .invoicing
            .create_invoice(CreateInvoice {
                fault_ids: vec![f1],
                occurred_at: at(10),
            })
            .unwrap();

        let err = shop
            .invoicing
            .release_fault(ReleaseFault {
                invoice_number: issued.number,
                fault: f2,
            })
            .unwrap_err();
        assert_eq!(
            err,
            InvoicingError::FaultNotOnInvoice {
                number: issued.number,
                fault: f2,
            }
        );

        let err = shop
            .invoicing
            .release_fault(ReleaseFault {
                invoice_number: 99,
                fault: f1,
            })
            .unwrap_err();
        assert_eq!(err, InvoicingError::InvoiceNotFound(99));
    }

    #[test]
    fn invoice_summary_renders_for_display() {
        let shop = setup();
        let f1 = shop.finished_fault(0, 100.0);
        let f2 = shop.finished_fault(1, 50.0);
        let summary = shop
            .invoicing
            .create_invoice(CreateInvoice {
                fault_ids: vec![f1, f2],
                occurred_at: Utc.with_ymd_and_hms(2024, 3, 5, 9, 30, 0).unwrap(),
            })
            .unwrap();

        assert_eq!(
            summary.to_string(),
            "Invoice no.: 1\n\
             \tDate: 05/03/2024\n\
             \tTotal: 150.00 €\n\
             \tTax (21.0 %): 31.50 €\n\
             \tTotal incl. tax: 181.50 €"
        );
    }

    #[test]
    fn summary_serializes_to_json() {
        let shop = setup();
        let fault = shop.finished_fault(0, 100.0);
        let summary = shop
            .invoicing
            .create_invoice(CreateInvoice {
                fault_ids: vec![fault],
                occurred_at: at(10),
            })
            .unwrap();

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["number"], 1);
        assert_eq!(json["tax_rate"], 21.0);
        assert_eq!(json["total"], 121.0);
        assert_eq!(json["faults"], serde_json::json!([fault.get()]));
    }

    #[test]
    fn mechanics_listing_is_ordered_by_id() {
        let shop = setup();
        let second = shop.repairs.hire_mechanic("87654321X", "Luis", "Gil").unwrap();

        let records = find_all_mechanics(&shop.store).unwrap();
        assert_eq!(
            records,
            vec![
                MechanicRecord {
                    id: shop.mechanic,
                    name: "Ana".into(),
                    surname: "Ruiz".into(),
                },
                MechanicRecord {
                    id: second,
                    name: "Luis".into(),
                    surname: "Gil".into(),
                },
            ]
        );
    }
}
