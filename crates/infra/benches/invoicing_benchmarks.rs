use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{TimeZone, Utc};
use workshop_core::{FaultId, Money, TaxRate};
use workshop_infra::invoicing::{CreateInvoice, InvoicingService};
use workshop_infra::repairs::RepairService;
use workshop_infra::store::{InMemoryWorkshopStore, WorkshopStore};
use workshop_model::Workshop;

/// Graph with `faults` finished faults on one vehicle, one intervention each.
fn workshop_with_finished_faults(faults: usize) -> (Workshop, Vec<FaultId>) {
    let repairs = RepairService::new(InMemoryWorkshopStore::new());
    let vehicle = repairs.register_vehicle("1234-BCD", "Seat", "Ibiza").unwrap();
    let mechanic = repairs.hire_mechanic("12345678Z", "Ana", "Ruiz").unwrap();

    let ids = (0..faults)
        .map(|i| {
            let reported = Utc.timestamp_opt(1_700_000_000 + i as i64, 0).unwrap();
            let fault = repairs.open_fault(vehicle, None, reported).unwrap();
            repairs.assign(fault, mechanic).unwrap();
            repairs
                .record_intervention(fault, mechanic, 30, Money::new(42.5).unwrap())
                .unwrap();
            repairs.finish(fault).unwrap();
            fault
        })
        .collect();

    (repairs.store().snapshot().unwrap(), ids)
}

fn bench_create_invoice(c: &mut Criterion) {
    let mut group = c.benchmark_group("create_invoice");
    let rate = TaxRate::percent(21.0).unwrap();
    let issued_at = Utc.timestamp_opt(1_800_000_000, 0).unwrap();

    for batch_size in [1usize, 10, 100].iter() {
        let (workshop, ids) = workshop_with_finished_faults(*batch_size);
        group.throughput(Throughput::Elements(*batch_size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(batch_size),
            batch_size,
            |b, _| {
                b.iter_batched(
                    || {
                        InvoicingService::new(
                            InMemoryWorkshopStore::with_workshop(workshop.clone()),
                            rate,
                        )
                    },
                    |service| {
                        let summary = service
                            .create_invoice(CreateInvoice {
                                fault_ids: ids.clone(),
                                occurred_at: issued_at,
                            })
                            .unwrap();
                        black_box(summary);
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_create_invoice);
criterion_main!(benches);
