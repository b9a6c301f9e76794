//! Association metadata consumed by the join planner.
//!
//! Upstream metadata extraction decides *what* associations exist and how they are
//! fetched; the types here are the pre-computed answer, one [`AssociationFetch`] per
//! fetched association node. The planner never inspects mapping annotations itself.

use crate::joinable::Joinable;
use crate::path::PropertyPath;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// How an association's data is retrieved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStyle {
    /// Fetched inline by a SQL join in the owning query.
    Join,
    /// Loaded by a separate SELECT (default).
    #[default]
    Select,
    /// Loaded by a separate SELECT correlated to the owning query.
    Subselect,
    /// Loaded by a separate SELECT batching several owners through an IN list.
    Batch,
}

impl FetchStyle {
    /// Does this style contribute a join to the owning query's FROM clause?
    pub const fn is_join(self) -> bool {
        matches!(self, FetchStyle::Join)
    }
}

/// Identity of an association type (entity type or collection role).
///
/// Many-to-many bridging compares a collection's element type against a sibling
/// join's association type by this identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssociationTypeId(String);

impl AssociationTypeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssociationTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssociationTypeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A reference to a single entity (many-to-one or one-to-one).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityAssociation {
    pub type_id: AssociationTypeId,
    /// One-to-one associations keep an owner pointer for row mapping.
    pub one_to_one: bool,
    /// Name of the referenced unique-key property when the join does not target the
    /// primary key (`None` means primary key).
    pub rhs_unique_key: Option<String>,
}

impl EntityAssociation {
    /// A many-to-one reference to `type_id`'s primary key.
    pub fn many_to_one(type_id: impl Into<AssociationTypeId>) -> Self {
        Self {
            type_id: type_id.into(),
            one_to_one: false,
            rhs_unique_key: None,
        }
    }

    /// A one-to-one reference to `type_id`'s primary key.
    pub fn one_to_one(type_id: impl Into<AssociationTypeId>) -> Self {
        Self {
            one_to_one: true,
            ..Self::many_to_one(type_id)
        }
    }

    /// Target a unique-key property instead of the primary key.
    #[must_use]
    pub fn unique_key(mut self, property: impl Into<String>) -> Self {
        self.rhs_unique_key = Some(property.into());
        self
    }
}

/// A collection of entities or values (one-to-many, many-to-many, element collections).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionAssociation {
    pub type_id: AssociationTypeId,
    /// Collection role, e.g. `Hero.powers`.
    pub role: String,
}

impl CollectionAssociation {
    pub fn new(type_id: impl Into<AssociationTypeId>, role: impl Into<String>) -> Self {
        Self {
            type_id: type_id.into(),
            role: role.into(),
        }
    }
}

/// The kind of association a join satisfies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssociationKind {
    Entity(EntityAssociation),
    Collection(CollectionAssociation),
}

impl AssociationKind {
    /// Identity of the association type.
    pub fn type_id(&self) -> &AssociationTypeId {
        match self {
            AssociationKind::Entity(e) => &e.type_id,
            AssociationKind::Collection(c) => &c.type_id,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, AssociationKind::Collection(_))
    }

    pub fn is_one_to_one(&self) -> bool {
        match self {
            AssociationKind::Entity(e) => e.one_to_one,
            AssociationKind::Collection(_) => false,
        }
    }

    /// Unique-key property targeted by an entity association, if any.
    pub fn rhs_unique_key(&self) -> Option<&str> {
        match self {
            AssociationKind::Entity(e) => e.rhs_unique_key.as_deref(),
            AssociationKind::Collection(_) => None,
        }
    }
}

impl From<EntityAssociation> for AssociationKind {
    fn from(value: EntityAssociation) -> Self {
        AssociationKind::Entity(value)
    }
}

impl From<CollectionAssociation> for AssociationKind {
    fn from(value: CollectionAssociation) -> Self {
        AssociationKind::Collection(value)
    }
}

/// The node a fetch hangs off in the query plan tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOwner {
    /// An entity reference (query root or an entity fetch) with its table alias.
    Entity { alias: String },
    /// A collection reference; not a valid owner for a joinable association.
    Collection { alias: String, role: String },
    /// An embedded/composite value; not a valid owner for a joinable association.
    Composite { path: PropertyPath },
}

impl FetchOwner {
    pub fn entity(alias: impl Into<String>) -> Self {
        FetchOwner::Entity {
            alias: alias.into(),
        }
    }

    /// The table alias of an entity owner.
    pub fn entity_alias(&self) -> Option<&str> {
        match self {
            FetchOwner::Entity { alias } => Some(alias),
            FetchOwner::Collection { .. } | FetchOwner::Composite { .. } => None,
        }
    }
}

/// Everything the planner needs to know about one fetched association.
#[derive(Debug, Clone)]
pub struct AssociationFetch {
    pub property_path: PropertyPath,
    pub association: AssociationKind,
    pub owner: FetchOwner,
    pub fetch_style: FetchStyle,
    /// Whether the owning property may be null (drives outer vs inner joins).
    pub nullable: bool,
    /// Foreign-key columns on the owning side, qualified or not.
    pub left_columns: Vec<String>,
    pub right_alias: String,
    pub right_columns: Vec<String>,
    pub joinable: Arc<dyn Joinable>,
}

impl AssociationFetch {
    /// Create a fetch with default style (select), non-nullable, and no columns.
    pub fn new(
        property_path: impl Into<PropertyPath>,
        association: impl Into<AssociationKind>,
        owner: FetchOwner,
        right_alias: impl Into<String>,
        joinable: Arc<dyn Joinable>,
    ) -> Self {
        Self {
            property_path: property_path.into(),
            association: association.into(),
            owner,
            fetch_style: FetchStyle::default(),
            nullable: false,
            left_columns: Vec::new(),
            right_alias: right_alias.into(),
            right_columns: Vec::new(),
            joinable,
        }
    }

    #[must_use]
    pub fn fetch_style(mut self, style: FetchStyle) -> Self {
        self.fetch_style = style;
        self
    }

    #[must_use]
    pub fn nullable(mut self, value: bool) -> Self {
        self.nullable = value;
        self
    }

    /// Set the owning-side foreign-key columns.
    #[must_use]
    pub fn left_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.left_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the associated side's key columns.
    #[must_use]
    pub fn right_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.right_columns = columns.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joinable::TableJoinable;

    #[test]
    fn test_fetch_style_default_is_select() {
        assert_eq!(FetchStyle::default(), FetchStyle::Select);
        assert!(FetchStyle::Join.is_join());
        assert!(!FetchStyle::Batch.is_join());
    }

    #[test]
    fn test_fetch_style_serde_snake_case() {
        let json = serde_json::to_string(&FetchStyle::Subselect).unwrap();
        assert_eq!(json, "\"subselect\"");
        let style: FetchStyle = serde_json::from_str("\"join\"").unwrap();
        assert_eq!(style, FetchStyle::Join);
    }

    #[test]
    fn test_association_kind_accessors() {
        let team: AssociationKind = EntityAssociation::many_to_one("Team").into();
        assert_eq!(team.type_id().as_str(), "Team");
        assert!(!team.is_collection());
        assert!(!team.is_one_to_one());
        assert_eq!(team.rhs_unique_key(), None);

        let profile: AssociationKind = EntityAssociation::one_to_one("Profile")
            .unique_key("hero")
            .into();
        assert!(profile.is_one_to_one());
        assert_eq!(profile.rhs_unique_key(), Some("hero"));

        let powers: AssociationKind = CollectionAssociation::new("Hero.powers", "Hero.powers").into();
        assert!(powers.is_collection());
        assert!(!powers.is_one_to_one());
    }

    #[test]
    fn test_fetch_owner_alias() {
        assert_eq!(FetchOwner::entity("h").entity_alias(), Some("h"));
        let owner = FetchOwner::Composite {
            path: PropertyPath::parse("Hero.address"),
        };
        assert_eq!(owner.entity_alias(), None);
    }

    #[test]
    fn test_association_fetch_builder() {
        let fetch = AssociationFetch::new(
            "Hero.team",
            EntityAssociation::many_to_one("Team"),
            FetchOwner::entity("h"),
            "t",
            Arc::new(TableJoinable::entity("teams")),
        )
        .fetch_style(FetchStyle::Join)
        .nullable(true)
        .left_columns(["team_id"])
        .right_columns(["id"]);

        assert_eq!(fetch.property_path.to_string(), "Hero.team");
        assert_eq!(fetch.fetch_style, FetchStyle::Join);
        assert!(fetch.nullable);
        assert_eq!(fetch.left_columns, vec!["team_id".to_string()]);
        assert_eq!(fetch.right_columns, vec!["id".to_string()]);
        assert_eq!(fetch.joinable.table_name(), "teams");
    }
}
