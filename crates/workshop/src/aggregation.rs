//! Monetary aggregation of interventions.

use workshop_core::Money;

use crate::intervention::Intervention;

/// Total cost of a set of interventions.
///
/// Sums in iteration order (faults keep interventions in recording order), so
/// the floating point result is reproducible.
pub fn total_cost<'a, I>(interventions: I) -> Money
where
    I: IntoIterator<Item = &'a Intervention>,
{
    interventions.into_iter().map(Intervention::amount).sum()
}
