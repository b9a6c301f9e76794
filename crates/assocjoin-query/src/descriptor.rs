//! Join descriptors: one immutable record per fetched association.

use crate::bridge::combine_conditions;
use crate::fragment::{JoinClause, JoinFragment};
use crate::join::{self, JoinKind};
use assocjoin_core::{
    AssociationFetch, AssociationKind, EnabledFilters, Joinable, PlanError, PlanResult,
    PropertyPath, qualify_column,
};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Identity of a descriptor within one planner (its insertion position).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DescriptorId(pub(crate) usize);

impl DescriptorId {
    /// Position of the descriptor in insertion order.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for DescriptorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One planned join between an owner alias and an associated table or collection.
///
/// Built once from association metadata and never mutated; bridging produces a new
/// condition string at emission time instead of a new descriptor.
#[derive(Debug, Clone)]
pub struct JoinDescriptor {
    property_path: PropertyPath,
    association: AssociationKind,
    joinable: Arc<dyn Joinable>,
    left_alias: String,
    left_columns: Vec<String>,
    right_alias: String,
    right_columns: Vec<String>,
    join_kind: JoinKind,
    condition: String,
    has_restriction: bool,
    enabled_filters: EnabledFilters,
}

impl JoinDescriptor {
    /// Build a descriptor from association metadata.
    ///
    /// Left columns are qualified with the owner alias. A non-blank `restriction` is
    /// ANDed onto the joinable's natural filter fragment in parentheses.
    ///
    /// # Errors
    ///
    /// - `UnresolvableOwner` if the fetch owner is not an entity reference
    /// - `ColumnArityMismatch` if the column lists are empty or differ in length
    pub fn build(
        fetch: AssociationFetch,
        restriction: Option<&str>,
        filters: &EnabledFilters,
    ) -> PlanResult<Self> {
        let AssociationFetch {
            property_path,
            association,
            owner,
            fetch_style,
            nullable,
            left_columns,
            right_alias,
            right_columns,
            joinable,
        } = fetch;

        let Some(left_alias) = owner.entity_alias().map(str::to_string) else {
            return Err(PlanError::unresolvable_owner(
                &property_path,
                format!("cannot determine the left alias of a fetch owned by {owner:?}"),
            ));
        };

        check_columns(&property_path, &left_columns, &right_columns)?;

        let left_columns = left_columns
            .iter()
            .map(|col| qualify_column(&left_alias, col))
            .collect();

        let join_kind = join::resolve(fetch_style, nullable);

        let natural = joinable.filter_fragment(&right_alias, filters);
        let restriction = restriction.filter(|r| !r.trim().is_empty());
        let condition = match restriction {
            Some(r) => combine_conditions(&natural, &format!("( {r} )")),
            None => natural,
        };

        Ok(Self {
            property_path,
            association,
            joinable,
            left_alias,
            left_columns,
            right_alias,
            right_columns,
            join_kind,
            condition,
            has_restriction: restriction.is_some(),
            enabled_filters: filters.clone(),
        })
    }

    pub fn property_path(&self) -> &PropertyPath {
        &self.property_path
    }

    pub fn association(&self) -> &AssociationKind {
        &self.association
    }

    pub fn joinable(&self) -> &dyn Joinable {
        self.joinable.as_ref()
    }

    pub fn left_alias(&self) -> &str {
        &self.left_alias
    }

    /// Owning-side columns, qualified with the left alias.
    pub fn left_columns(&self) -> &[String] {
        &self.left_columns
    }

    pub fn right_alias(&self) -> &str {
        &self.right_alias
    }

    pub fn right_columns(&self) -> &[String] {
        &self.right_columns
    }

    pub fn join_kind(&self) -> JoinKind {
        self.join_kind
    }

    /// Base ON condition (natural filters plus any restriction), possibly empty.
    pub fn condition(&self) -> &str {
        &self.condition
    }

    pub fn has_restriction(&self) -> bool {
        self.has_restriction
    }

    /// Filters enabled when this descriptor was built.
    pub fn enabled_filters(&self) -> &EnabledFilters {
        &self.enabled_filters
    }

    pub fn is_collection(&self) -> bool {
        self.association.is_collection()
    }

    pub fn is_one_to_one(&self) -> bool {
        self.association.is_one_to_one()
    }

    /// Unique-key property targeted by the join, `None` for primary-key joins.
    pub fn rhs_unique_key(&self) -> Option<&str> {
        self.association.rhs_unique_key()
    }

    /// Re-check that the column lists are non-empty and of equal length.
    ///
    /// # Errors
    ///
    /// `InvalidJoin` naming the property path.
    pub fn validate_join(&self) -> PlanResult<()> {
        if self.left_columns.is_empty() || self.left_columns.len() != self.right_columns.len() {
            return Err(PlanError::invalid_join(&self.property_path));
        }
        Ok(())
    }

    /// The join as handed to a sink, with the given ON condition.
    pub fn clause<'a>(&'a self, condition: Cow<'a, str>) -> JoinClause<'a> {
        JoinClause {
            table_name: self.joinable.table_name(),
            alias: &self.right_alias,
            left_columns: &self.left_columns,
            right_columns: &self.right_columns,
            kind: self.join_kind,
            condition,
        }
    }

    /// Write this join with `condition` plus the joinable's own fragments to `sink`.
    pub(crate) fn emit<S: JoinFragment + ?Sized>(&self, sink: &mut S, condition: Cow<'_, str>) {
        sink.add_join(self.clause(condition));
        sink.add_fragments(
            &self.joinable.from_join_fragment(&self.right_alias),
            &self.joinable.where_join_fragment(&self.right_alias),
        );
    }
}

#[cfg(test)]
impl JoinDescriptor {
    /// Replace the joined-side columns, bypassing the construction check.
    pub(crate) fn set_right_columns(&mut self, columns: Vec<String>) {
        self.right_columns = columns;
    }
}

fn check_columns(path: &PropertyPath, left: &[String], right: &[String]) -> PlanResult<()> {
    if left.is_empty() || right.is_empty() || left.len() != right.len() {
        return Err(PlanError::column_arity(path, left.len(), right.len()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assocjoin_core::{
        EntityAssociation, FetchOwner, FetchStyle, FilterParams, FilterSet, PlanErrorKind,
        TableJoinable,
    };

    fn team_fetch() -> AssociationFetch {
        AssociationFetch::new(
            "Hero.team",
            EntityAssociation::many_to_one("Team"),
            FetchOwner::entity("h"),
            "t",
            Arc::new(
                TableJoinable::entity("teams")
                    .filters(FilterSet::new().condition("active", "{alias}.deleted = false")),
            ),
        )
        .fetch_style(FetchStyle::Join)
        .nullable(true)
        .left_columns(["team_id"])
        .right_columns(["id"])
    }

    #[test]
    fn test_build_qualifies_left_columns() {
        let d = JoinDescriptor::build(team_fetch(), None, &EnabledFilters::none()).unwrap();
        assert_eq!(d.left_alias(), "h");
        assert_eq!(d.left_columns(), &["h.team_id".to_string()]);
        assert_eq!(d.right_alias(), "t");
        assert_eq!(d.right_columns(), &["id".to_string()]);
        assert_eq!(d.join_kind(), JoinKind::LeftOuter);
        assert_eq!(d.condition(), "");
        assert!(!d.has_restriction());
        assert!(d.validate_join().is_ok());
    }

    #[test]
    fn test_build_appends_restriction_to_filters() {
        let filters = EnabledFilters::none().enable("active", FilterParams::new());
        let d = JoinDescriptor::build(team_fetch(), Some("t.name like 'A%'"), &filters).unwrap();
        assert_eq!(d.condition(), "t.deleted = false and ( t.name like 'A%' )");
        assert!(d.has_restriction());
        assert!(d.enabled_filters().is_enabled("active"));
    }

    #[test]
    fn test_build_restriction_without_natural_condition() {
        let d = JoinDescriptor::build(team_fetch(), Some("t.id > 3"), &EnabledFilters::none())
            .unwrap();
        assert_eq!(d.condition(), "( t.id > 3 )");
    }

    #[test]
    fn test_blank_restriction_is_ignored() {
        let d = JoinDescriptor::build(team_fetch(), Some("   "), &EnabledFilters::none()).unwrap();
        assert_eq!(d.condition(), "");
        assert!(!d.has_restriction());
    }

    #[test]
    fn test_build_rejects_mismatched_columns() {
        let fetch = team_fetch().left_columns(["org_id", "team_no"]);
        let err = JoinDescriptor::build(fetch, None, &EnabledFilters::none()).unwrap_err();
        assert_eq!(err.kind, PlanErrorKind::ColumnArityMismatch);
        assert_eq!(err.property_path.as_deref(), Some("Hero.team"));
    }

    #[test]
    fn test_build_rejects_empty_columns() {
        let fetch = team_fetch()
            .left_columns(Vec::<String>::new())
            .right_columns(Vec::<String>::new());
        let err = JoinDescriptor::build(fetch, None, &EnabledFilters::none()).unwrap_err();
        assert_eq!(err.kind, PlanErrorKind::ColumnArityMismatch);
    }

    #[test]
    fn test_build_rejects_non_entity_owner() {
        let mut fetch = team_fetch();
        fetch.owner = FetchOwner::Composite {
            path: PropertyPath::parse("Hero.address"),
        };
        let err = JoinDescriptor::build(fetch, None, &EnabledFilters::none()).unwrap_err();
        assert_eq!(err.kind, PlanErrorKind::UnresolvableOwner);
    }

    #[test]
    fn test_clause_uses_joinable_table() {
        let d = JoinDescriptor::build(team_fetch(), None, &EnabledFilters::none()).unwrap();
        let clause = d.clause(Cow::Borrowed("x = 1"));
        assert_eq!(clause.table_name, "teams");
        assert_eq!(clause.alias, "t");
        assert_eq!(clause.kind, JoinKind::LeftOuter);
        assert_eq!(clause.condition, "x = 1");
    }

    #[test]
    fn test_validate_join_rejects_mismatched_columns() {
        let mut d = JoinDescriptor::build(team_fetch(), None, &EnabledFilters::none()).unwrap();
        d.set_right_columns(vec!["id".to_string(), "season".to_string()]);
        let err = d.validate_join().unwrap_err();
        assert_eq!(err.kind, PlanErrorKind::InvalidJoin);
        assert_eq!(err.property_path.as_deref(), Some("Hero.team"));

        d.set_right_columns(Vec::new());
        assert_eq!(
            d.validate_join().unwrap_err().kind,
            PlanErrorKind::InvalidJoin
        );
    }

    #[test]
    fn test_rhs_unique_key_follows_association() {
        let d = JoinDescriptor::build(team_fetch(), None, &EnabledFilters::none()).unwrap();
        assert_eq!(d.rhs_unique_key(), None);

        let mut fetch = team_fetch();
        fetch.association = EntityAssociation::one_to_one("Headquarters")
            .unique_key("team")
            .into();
        let d = JoinDescriptor::build(fetch, None, &EnabledFilters::none()).unwrap();
        assert_eq!(d.rhs_unique_key(), Some("team"));
        assert!(d.is_one_to_one());
    }

    #[test]
    fn test_descriptor_id_display() {
        assert_eq!(DescriptorId(3).to_string(), "#3");
        assert_eq!(DescriptorId(3).index(), 3);
    }
}
