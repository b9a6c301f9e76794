//! Many-to-many bridging.
//!
//! A many-to-many collection is joined through its link table. When a later join in
//! the same plan fetches the collection's element entity, the link-table join has to
//! carry the element-side filters as well, so its condition is rewritten at emission
//! time. The descriptor itself never changes.

use crate::descriptor::JoinDescriptor;
use crate::fragment::{JoinClause, JoinFragment};
use assocjoin_core::AssociationKind;
use std::borrow::Cow;

/// A collection join whose condition was combined with link-table filters.
#[derive(Debug, Clone)]
pub struct BridgedJoin<'a> {
    descriptor: &'a JoinDescriptor,
    condition: String,
}

impl<'a> BridgedJoin<'a> {
    /// The collection join being bridged.
    pub fn descriptor(&self) -> &'a JoinDescriptor {
        self.descriptor
    }

    /// Combined ON condition.
    pub fn condition(&self) -> &str {
        &self.condition
    }

    /// Same table, alias, columns and kind as the descriptor; only the condition differs.
    pub fn clause(&self) -> JoinClause<'_> {
        self.descriptor.clause(Cow::Borrowed(&self.condition))
    }

    pub(crate) fn emit<S: JoinFragment + ?Sized>(&self, sink: &mut S) {
        self.descriptor.emit(sink, Cow::Borrowed(&self.condition));
    }
}

/// Is `candidate` a many-to-many collection join whose elements are `other`'s type?
pub fn is_many_to_many_with(candidate: &JoinDescriptor, other: &JoinDescriptor) -> bool {
    let AssociationKind::Collection(_) = candidate.association() else {
        return false;
    };
    candidate
        .joinable()
        .collection()
        .is_some_and(|c| c.is_many_to_many_of(other.association().type_id()))
}

/// Bridge `candidate` against `other`, or `None` when they are not a many-to-many pair.
pub fn try_bridge<'a>(
    candidate: &'a JoinDescriptor,
    other: &JoinDescriptor,
) -> Option<BridgedJoin<'a>> {
    if !is_many_to_many_with(candidate, other) {
        return None;
    }
    let collection = candidate.joinable().collection()?;
    let filter = collection
        .many_to_many_filter_fragment(candidate.right_alias(), candidate.enabled_filters());
    Some(BridgedJoin {
        descriptor: candidate,
        condition: combine_conditions(candidate.condition(), &filter),
    })
}

/// AND two condition fragments, dropping whichever side is empty.
///
/// ```
/// use assocjoin_query::bridge::combine_conditions;
///
/// assert_eq!(combine_conditions("", "p.visible"), "p.visible");
/// assert_eq!(combine_conditions("t.active", ""), "t.active");
/// assert_eq!(combine_conditions("t.active", "p.visible"), "t.active and p.visible");
/// ```
pub fn combine_conditions(base: &str, filter: &str) -> String {
    if filter.is_empty() {
        base.to_string()
    } else if base.is_empty() {
        filter.to_string()
    } else {
        format!("{base} and {filter}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assocjoin_core::{
        AssociationFetch, CollectionAssociation, CollectionInfo, EnabledFilters,
        EntityAssociation, FetchOwner, FetchStyle, FilterParams, FilterSet, TableJoinable,
    };
    use std::sync::Arc;

    fn visible() -> EnabledFilters {
        EnabledFilters::none().enable("visible", FilterParams::new())
    }

    fn powers_join(natural: FilterSet, filters: &EnabledFilters) -> JoinDescriptor {
        let link = TableJoinable::collection(
            "hero_powers",
            CollectionInfo::many_to_many("Hero.powers", "Power").many_to_many_filters(
                FilterSet::new().condition("visible", "{alias}.visible = true"),
            ),
        )
        .filters(natural);
        let fetch = AssociationFetch::new(
            "Hero.powers",
            CollectionAssociation::new("Hero.powers", "Hero.powers"),
            FetchOwner::entity("h"),
            "hp",
            Arc::new(link),
        )
        .fetch_style(FetchStyle::Join)
        .nullable(true)
        .left_columns(["id"])
        .right_columns(["hero_id"]);
        JoinDescriptor::build(fetch, None, filters).unwrap()
    }

    fn entity_join(type_id: &str, alias: &str) -> JoinDescriptor {
        let fetch = AssociationFetch::new(
            "Hero.powers.elements",
            EntityAssociation::many_to_one(type_id),
            FetchOwner::entity("hp"),
            alias,
            Arc::new(TableJoinable::entity("powers")),
        )
        .fetch_style(FetchStyle::Join)
        .left_columns(["power_id"])
        .right_columns(["id"]);
        JoinDescriptor::build(fetch, None, &EnabledFilters::none()).unwrap()
    }

    #[test]
    fn test_bridge_empty_base_yields_filter_only() {
        let powers = powers_join(FilterSet::new(), &visible());
        let power = entity_join("Power", "p");
        let bridged = try_bridge(&powers, &power).unwrap();
        assert_eq!(bridged.condition(), "hp.visible = true");
    }

    #[test]
    fn test_bridge_combines_base_and_filter_once() {
        let natural = FilterSet::new().condition("visible", "{alias}.hero_visible = true");
        let powers = powers_join(natural, &visible());
        let power = entity_join("Power", "p");
        let bridged = try_bridge(&powers, &power).unwrap();
        assert_eq!(
            bridged.condition(),
            "hp.hero_visible = true and hp.visible = true"
        );
    }

    #[test]
    fn test_bridge_without_enabled_filters_keeps_base() {
        let powers = powers_join(FilterSet::new(), &EnabledFilters::none());
        let power = entity_join("Power", "p");
        let bridged = try_bridge(&powers, &power).unwrap();
        assert_eq!(bridged.condition(), "");
    }

    #[test]
    fn test_bridge_keeps_join_shape() {
        let powers = powers_join(FilterSet::new(), &visible());
        let power = entity_join("Power", "p");
        let bridged = try_bridge(&powers, &power).unwrap();
        let plain = powers.clause(Cow::Borrowed(powers.condition()));
        let clause = bridged.clause();
        assert_eq!(clause.table_name, plain.table_name);
        assert_eq!(clause.alias, plain.alias);
        assert_eq!(clause.left_columns, plain.left_columns);
        assert_eq!(clause.right_columns, plain.right_columns);
        assert_eq!(clause.kind, plain.kind);
        assert!(std::ptr::eq(bridged.descriptor(), &powers));
    }

    #[test]
    fn test_no_bridge_for_other_element_type() {
        let powers = powers_join(FilterSet::new(), &visible());
        let team = entity_join("Team", "t");
        assert!(!is_many_to_many_with(&powers, &team));
        assert!(try_bridge(&powers, &team).is_none());
    }

    #[test]
    fn test_no_bridge_from_entity_join() {
        let power = entity_join("Power", "p");
        let other = entity_join("Power", "p2");
        assert!(try_bridge(&power, &other).is_none());
    }

    #[test]
    fn test_combine_conditions_never_double_ands() {
        assert_eq!(combine_conditions("", ""), "");
        assert_eq!(combine_conditions("a", "b"), "a and b");
        assert_eq!(combine_conditions("a and b", "c").matches(" and ").count(), 2);
    }
}
