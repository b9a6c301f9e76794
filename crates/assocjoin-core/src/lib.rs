//! Core types for the assocjoin association join planner.
//!
//! This crate provides the vocabulary shared by the planner and its callers:
//!
//! - `AssociationFetch` and friends: pre-computed association metadata
//! - `Joinable`: the seam to whatever persists the joined table or collection
//! - `EnabledFilters` / `FilterSet`: row-level filters and their SQL templates
//! - `PropertyPath`: diagnostics paths
//! - `Error` / `PlanError`: error taxonomy

pub mod association;
pub mod error;
pub mod filter;
pub mod identifiers;
pub mod joinable;
pub mod path;

pub use association::{
    AssociationFetch, AssociationKind, AssociationTypeId, CollectionAssociation,
    EntityAssociation, FetchOwner, FetchStyle,
};
pub use error::{ConfigError, Error, PlanError, PlanErrorKind, PlanResult, Result};
pub use filter::{EnabledFilters, FilterCondition, FilterParams, FilterSet};
pub use identifiers::{is_plain_identifier, qualify_column, quote_ident, quote_ident_mysql};
pub use joinable::{CollectionInfo, Joinable, TableJoinable};
pub use path::PropertyPath;
