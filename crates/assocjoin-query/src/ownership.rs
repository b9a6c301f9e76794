//! Ownership index: which earlier join owns an alias.
//!
//! Positions are ordinals among joins that consume an entity alias, not raw list
//! indexes, because downstream row mapping only numbers entity-producing joins.

use crate::descriptor::JoinDescriptor;

/// Ordinal of the entity-consuming join whose right alias is `alias`.
pub fn position_of(alias: &str, descriptors: &[JoinDescriptor]) -> Option<usize> {
    descriptors
        .iter()
        .filter(|d| d.joinable().consumes_entity_alias())
        .position(|d| d.right_alias() == alias)
}

/// Owner position of a one-to-one or collection join; `None` for plain entity joins.
pub fn owner_of(descriptor: &JoinDescriptor, descriptors: &[JoinDescriptor]) -> Option<usize> {
    if descriptor.is_one_to_one() || descriptor.is_collection() {
        position_of(descriptor.left_alias(), descriptors)
    } else {
        None
    }
}

/// Has any join in `descriptors` claimed `alias` as its right alias?
///
/// Joins that are never emitted still claim their alias.
pub fn introduces(alias: &str, descriptors: &[JoinDescriptor]) -> bool {
    descriptors.iter().any(|d| d.right_alias() == alias)
}

/// Will `alias` appear in the emitted FROM clause, joined by one of `descriptors`?
///
/// Only materialized joins count. Unlike [`position_of`], link-table joins do: an
/// element join may hang off them.
pub fn joins_alias(alias: &str, descriptors: &[JoinDescriptor]) -> bool {
    descriptors
        .iter()
        .any(|d| d.join_kind().is_materialized() && d.right_alias() == alias)
}
