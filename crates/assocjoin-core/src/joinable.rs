//! The joinable seam: what the planner needs from the persister behind an association.

use crate::association::AssociationTypeId;
use crate::filter::{ALIAS_PLACEHOLDER, EnabledFilters, FilterSet};
use std::fmt;

/// The table (or collection table) on the right-hand side of a join.
///
/// Implemented by whatever owns the mapping of an entity or collection. The planner
/// only asks for SQL text; it never interprets the returned fragments.
pub trait Joinable: fmt::Debug + Send + Sync {
    /// Table joined for this association.
    fn table_name(&self) -> &str;

    /// Whether joining this table introduces an entity alias.
    ///
    /// Link tables of many-to-many collections do not; their rows are transparent for
    /// ownership purposes.
    fn consumes_entity_alias(&self) -> bool;

    /// Natural filter fragment for the joined table, e.g. enabled row-level filters.
    fn filter_fragment(&self, alias: &str, filters: &EnabledFilters) -> String;

    /// Extra FROM fragment contributed by the joinable (e.g. subclass tables).
    fn from_join_fragment(&self, _alias: &str) -> String {
        String::new()
    }

    /// Extra WHERE fragment contributed by the joinable (e.g. a discriminator check).
    fn where_join_fragment(&self, _alias: &str) -> String {
        String::new()
    }

    /// Collection persistence details, `None` for entity tables.
    fn collection(&self) -> Option<&CollectionInfo> {
        None
    }
}

/// Persistence details of a queryable collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionInfo {
    pub role: String,
    pub many_to_many: bool,
    /// Element type of a collection of entities.
    pub element_type: Option<AssociationTypeId>,
    /// Filters applied to the element table reached through the link table.
    pub many_to_many_filters: FilterSet,
}

impl CollectionInfo {
    /// A one-to-many collection (element rows carry the foreign key).
    pub fn one_to_many(role: impl Into<String>, element_type: impl Into<AssociationTypeId>) -> Self {
        Self {
            role: role.into(),
            many_to_many: false,
            element_type: Some(element_type.into()),
            many_to_many_filters: FilterSet::new(),
        }
    }

    /// A many-to-many collection mapped through a link table.
    pub fn many_to_many(
        role: impl Into<String>,
        element_type: impl Into<AssociationTypeId>,
    ) -> Self {
        Self {
            many_to_many: true,
            ..Self::one_to_many(role, element_type)
        }
    }

    /// Set the filters applied to the element side of a many-to-many collection.
    #[must_use]
    pub fn many_to_many_filters(mut self, filters: FilterSet) -> Self {
        self.many_to_many_filters = filters;
        self
    }

    /// Is this a many-to-many collection whose elements are of type `other`?
    pub fn is_many_to_many_of(&self, other: &AssociationTypeId) -> bool {
        self.many_to_many && self.element_type.as_ref() == Some(other)
    }

    /// Link-table filter fragment for `alias` under the given enabled filters.
    pub fn many_to_many_filter_fragment(&self, alias: &str, filters: &EnabledFilters) -> String {
        if !self.many_to_many {
            return String::new();
        }
        self.many_to_many_filters.render(alias, filters)
    }
}

/// A [`Joinable`] built from static mapping metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableJoinable {
    table_name: String,
    consumes_entity_alias: bool,
    filters: FilterSet,
    from_fragment: Option<String>,
    where_fragment: Option<String>,
    collection: Option<CollectionInfo>,
}

impl TableJoinable {
    /// An entity table.
    pub fn entity(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            consumes_entity_alias: true,
            filters: FilterSet::new(),
            from_fragment: None,
            where_fragment: None,
            collection: None,
        }
    }

    /// A collection table. Many-to-many link tables do not consume an entity alias.
    pub fn collection(table_name: impl Into<String>, info: CollectionInfo) -> Self {
        Self {
            consumes_entity_alias: !info.many_to_many,
            collection: Some(info),
            ..Self::entity(table_name)
        }
    }

    /// Natural filters of the joined table.
    #[must_use]
    pub fn filters(mut self, filters: FilterSet) -> Self {
        self.filters = filters;
        self
    }

    /// Extra FROM fragment; `{alias}` is replaced by the join alias.
    #[must_use]
    pub fn from_fragment(mut self, template: impl Into<String>) -> Self {
        self.from_fragment = Some(template.into());
        self
    }

    /// Extra WHERE fragment; `{alias}` is replaced by the join alias.
    #[must_use]
    pub fn where_fragment(mut self, template: impl Into<String>) -> Self {
        self.where_fragment = Some(template.into());
        self
    }

    #[must_use]
    pub fn consumes_entity_alias(mut self, value: bool) -> Self {
        self.consumes_entity_alias = value;
        self
    }
}

impl Joinable for TableJoinable {
    fn table_name(&self) -> &str {
        &self.table_name
    }

    fn consumes_entity_alias(&self) -> bool {
        self.consumes_entity_alias
    }

    fn filter_fragment(&self, alias: &str, filters: &EnabledFilters) -> String {
        self.filters.render(alias, filters)
    }

    fn from_join_fragment(&self, alias: &str) -> String {
        self.from_fragment
            .as_deref()
            .map(|t| t.replace(ALIAS_PLACEHOLDER, alias))
            .unwrap_or_default()
    }

    fn where_join_fragment(&self, alias: &str) -> String {
        self.where_fragment
            .as_deref()
            .map(|t| t.replace(ALIAS_PLACEHOLDER, alias))
            .unwrap_or_default()
    }

    fn collection(&self) -> Option<&CollectionInfo> {
        self.collection.as_ref()
    }
}
