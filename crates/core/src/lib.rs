//! `workshop-core`: domain foundation building blocks for the car workshop.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;
pub mod version;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{FaultId, InterventionId, InvoiceId, MechanicId, VehicleId};
pub use value_object::{Money, TaxRate, ValueObject};
pub use version::ExpectedVersion;
