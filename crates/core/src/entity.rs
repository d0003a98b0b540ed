//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// `id()` is the storage identity. It is not necessarily what `PartialEq`
/// compares: faults, for instance, compare by creation timestamp.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + Ord + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}
