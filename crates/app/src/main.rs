//! Demo run: seeds an in-memory workshop, repairs a few faults and invoices
//! them.
//!
//! Usage: `workshop [FAULT_ID...]`. Without arguments every finished fault is
//! invoiced.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::{Duration, Utc};

use workshop_core::{Entity, FaultId, Money};
use workshop_infra::WorkshopConfig;
use workshop_infra::invoicing::{CreateInvoice, InvoicingService};
use workshop_infra::repairs::RepairService;
use workshop_infra::reports::find_all_mechanics;
use workshop_infra::store::{InMemoryWorkshopStore, WorkshopStore};
use workshop_model::FaultStatus;

fn seed(repairs: &RepairService<Arc<InMemoryWorkshopStore>>) -> Result<()> {
    let now = Utc::now();
    let ibiza = repairs.register_vehicle("1234-BCD", "Seat", "Ibiza")?;
    let golf = repairs.register_vehicle("5678-FGH", "Volkswagen", "Golf")?;
    let ana = repairs.hire_mechanic("12345678Z", "Ana", "Ruiz")?;
    let luis = repairs.hire_mechanic("87654321X", "Luis", "Gil")?;

    let brakes = repairs.open_fault(ibiza, Some("Brake pads worn".into()), now - Duration::days(3))?;
    repairs.assign(brakes, ana)?;
    repairs.record_intervention(brakes, ana, 90, Money::new(100.0)?)?;
    repairs.finish(brakes)?;

    let lights = repairs.open_fault(golf, Some("Headlight out".into()), now - Duration::days(2))?;
    repairs.assign(lights, luis)?;
    repairs.record_intervention(lights, luis, 20, Money::new(35.0)?)?;
    repairs.record_intervention(lights, luis, 10, Money::new(15.0)?)?;
    repairs.finish(lights)?;

    // Still in the shop.
    let noise = repairs.open_fault(golf, Some("Engine noise".into()), now - Duration::days(1))?;
    repairs.assign(noise, ana)?;

    Ok(())
}

fn fault_ids_from_args() -> Result<Vec<FaultId>> {
    std::env::args()
        .skip(1)
        .map(|raw| {
            raw.parse::<FaultId>()
                .with_context(|| format!("invalid fault id {raw:?}"))
        })
        .collect()
}

fn main() -> Result<()> {
    workshop_observability::init();

    let config = WorkshopConfig::from_env().unwrap_or_else(|err| {
        tracing::warn!("invalid configuration ({err}); using defaults");
        WorkshopConfig::default()
    });

    let store = Arc::new(InMemoryWorkshopStore::new());
    let repairs = RepairService::new(store.clone());
    let invoicing = InvoicingService::new(store.clone(), config);

    seed(&repairs).context("seeding the demo workshop")?;

    let mut fault_ids = fault_ids_from_args()?;
    if fault_ids.is_empty() {
        fault_ids = store
            .snapshot()?
            .faults()
            .filter(|f| f.status() == FaultStatus::Finished)
            .map(Entity::id)
            .collect();
    }
    if fault_ids.is_empty() {
        bail!("no finished faults to invoice");
    }

    let summary = invoicing
        .create_invoice(CreateInvoice {
            fault_ids,
            occurred_at: Utc::now(),
        })
        .context("creating the invoice")?;
    println!("{summary}");

    println!();
    println!("Mechanics:");
    for mechanic in find_all_mechanics(&store)? {
        println!("\t{}\t{} {}", mechanic.id, mechanic.name, mechanic.surname);
    }

    Ok(())
}
