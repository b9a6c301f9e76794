//! assocjoin - plan SQL joins for object associations.
//!
//! Given the associations a query fetches (entity references, collections, many-to-many
//! bridges), assocjoin decides each join's kind, keeps joins ordered after their owners,
//! bridges many-to-many link tables with their row filters, and writes the result into
//! a fragment sink.
//!
//! # Quick Start
//!
//! ```
//! use assocjoin::prelude::*;
//! use std::sync::Arc;
//!
//! let mut planner = AssociationJoinPlanner::new("h");
//! let team = AssociationFetch::new(
//!     "Hero.team",
//!     EntityAssociation::many_to_one("Team"),
//!     FetchOwner::entity("h"),
//!     "t",
//!     Arc::new(TableJoinable::entity("teams")),
//! )
//! .fetch_style(FetchStyle::Join)
//! .left_columns(["team_id"])
//! .right_columns(["id"]);
//!
//! planner.append(team, None, &EnabledFilters::none()).unwrap();
//!
//! let mut sql = SqlJoinFragment::new();
//! planner.emit_all(&mut sql).unwrap();
//! assert_eq!(sql.from_fragment(), " INNER JOIN teams t ON h.team_id=t.id");
//! ```

// Re-export all public types from sub-crates
pub use assocjoin_core::{
    AssociationFetch, AssociationKind, AssociationTypeId, CollectionAssociation, CollectionInfo,
    ConfigError, EnabledFilters, EntityAssociation, Error, FetchOwner, FetchStyle,
    FilterCondition, FilterParams, FilterSet, Joinable, PlanError, PlanErrorKind, PlanResult,
    PropertyPath, Result, TableJoinable,
};
pub use assocjoin_query::{
    AssociationJoinPlanner, BridgedJoin, DescriptorId, Dialect, JoinClause, JoinDescriptor,
    JoinFragment, JoinKind, PlannerConfig, PlannerState, SqlJoinFragment, bridge, ownership,
};

pub mod prelude {
    pub use crate::{
        AssociationFetch, AssociationJoinPlanner, CollectionAssociation, CollectionInfo,
        EnabledFilters, EntityAssociation, Error, FetchOwner, FetchStyle, FilterSet,
        JoinFragment, JoinKind, PlanError, PlanErrorKind, PlannerConfig, SqlJoinFragment,
        TableJoinable,
    };
}
