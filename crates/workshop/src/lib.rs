//! Workshop domain model.
//!
//! Vehicles suffer faults, faults are assigned to mechanics, repaired through
//! interventions and finally invoiced. This crate holds the entity graph and
//! the rules that keep it consistent:
//!
//! - [`relations`]: the only code that links or unlinks faults to their
//!   vehicle, mechanic and invoice (both sides at once);
//! - [`lifecycle`]: the fault status machine;
//! - [`aggregation`]: derivation of a fault's amount from its interventions.
//!
//! Everything here is pure, synchronous domain logic (no IO, no storage).

pub mod aggregation;
pub mod fault;
pub mod intervention;
pub mod invoice;
pub mod lifecycle;
pub mod mechanic;
pub mod relations;
pub mod status;
pub mod vehicle;
pub mod workshop;

pub use fault::Fault;
pub use intervention::Intervention;
pub use invoice::{Invoice, InvoiceTotals};
pub use lifecycle::{FaultLifecycle, Transition};
pub use mechanic::Mechanic;
pub use relations::{Association, Relations};
pub use status::FaultStatus;
pub use vehicle::Vehicle;
pub use workshop::Workshop;
