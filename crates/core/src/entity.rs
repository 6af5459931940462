//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Entities embedded in an aggregate (e.g. order lines) are addressed through the
/// aggregate root but still keep their own stable identity.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
