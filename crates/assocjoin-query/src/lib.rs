//! Association join planning for assocjoin.
//!
//! `assocjoin-query` is the **planning layer**. It turns the association fetches a
//! query-plan walker discovers into an ordered list of join descriptors and emits
//! them as SQL joins.
//!
//! # Role In The Architecture
//!
//! - **Join kinds**: `join::resolve` maps fetch style and nullability to a `JoinKind`.
//! - **Descriptors**: `JoinDescriptor` is the immutable record of one join.
//! - **Ownership**: `ownership` finds which earlier join owns an alias.
//! - **Bridging**: `bridge` rewrites many-to-many link-table conditions.
//! - **Planner**: `AssociationJoinPlanner` orders, validates and emits joins into a
//!   `JoinFragment` sink; `SqlJoinFragment` renders them as SQL text.

pub mod bridge;
pub mod config;
pub mod descriptor;
pub mod dialect;
pub mod fragment;
pub mod join;
pub mod ownership;
pub mod planner;

pub use bridge::{BridgedJoin, combine_conditions, is_many_to_many_with, try_bridge};
pub use config::PlannerConfig;
pub use descriptor::{DescriptorId, JoinDescriptor};
pub use dialect::Dialect;
pub use fragment::{JoinClause, JoinFragment, SqlJoinFragment};
pub use join::{JoinKind, resolve};
pub use ownership::{owner_of, position_of};
pub use planner::{AssociationJoinPlanner, PlannerState};
