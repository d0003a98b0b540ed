//! Value objects: equality by value, not identity.
//!
//! Value objects are defined entirely by their attribute values. Two value
//! objects with the same values are considered equal, and "modifying" one
//! means building a new one.

use core::iter::Sum;
use core::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Marker trait for value objects.
///
/// ## Value Object vs Entity
///
/// - **Value Object**: No identity (two value objects with same values are equal)
/// - **Entity**: Has identity (see [`crate::Entity`])
///
/// Example:
/// - `Money(55.5)` is a value object
/// - `Mechanic { id: MechanicId(3), .. }` is an entity
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

/// Monetary amount in the workshop's single currency.
///
/// Plain `f64` arithmetic: no rounding is applied beyond the native precision
/// of the type. A single amount is finite, non-negative and at most
/// [`Money::MAX`], so sums over any realistic number of amounts stay finite.
#[derive(Debug, Copy, Clone, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Money(f64);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(0.0);

    /// Largest single amount accepted: one trillion.
    pub const MAX: Money = Money(1e12);

    pub fn new(amount: f64) -> DomainResult<Self> {
        if !amount.is_finite() {
            return Err(DomainError::validation("amount must be a finite number"));
        }
        if amount < 0.0 {
            return Err(DomainError::validation("amount must not be negative"));
        }
        if amount > Self::MAX.0 {
            return Err(DomainError::validation(format!(
                "amount must not exceed {}",
                Self::MAX
            )));
        }
        Ok(Self(amount))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

impl TryFrom<f64> for Money {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Money> for f64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Tax rate expressed as a percentage (21.0 means 21 %).
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct TaxRate(f64);

impl ValueObject for TaxRate {}

impl TaxRate {
    pub fn percent(percent: f64) -> DomainResult<Self> {
        if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
            return Err(DomainError::validation(format!(
                "tax rate must be a percentage between 0 and 100, got {percent}"
            )));
        }
        Ok(Self(percent))
    }

    pub fn as_percent(self) -> f64 {
        self.0
    }

    /// Tax owed on `base`.
    pub fn tax_on(self, base: Money) -> Money {
        Money(base.0 * self.0 / 100.0)
    }
}

/// The general VAT rate, 21 %.
impl Default for TaxRate {
    fn default() -> Self {
        Self(21.0)
    }
}

impl TryFrom<f64> for TaxRate {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::percent(value)
    }
}

impl From<TaxRate> for f64 {
    fn from(value: TaxRate) -> Self {
        value.0
    }
}

impl core::fmt::Display for TaxRate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.1} %", self.0)
    }
}
