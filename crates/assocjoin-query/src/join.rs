//! Join kinds and the rule deciding which one an association gets.

use assocjoin_core::FetchStyle;
use serde::{Deserialize, Serialize};

/// Types of association joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKind {
    Inner,
    LeftOuter,
    /// Not joined; the association is satisfied by a separate load.
    None,
}

impl JoinKind {
    /// Get the SQL keyword for this join kind (empty for `None`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::LeftOuter => "LEFT OUTER JOIN",
            JoinKind::None => "",
        }
    }

    /// Does this join appear in the FROM clause?
    pub const fn is_materialized(&self) -> bool {
        !matches!(self, JoinKind::None)
    }
}

/// Decide the join kind of an association.
///
/// Join-fetched associations become outer joins when the owning property is nullable
/// and inner joins otherwise; every other fetch style is loaded separately.
pub const fn resolve(fetch_style: FetchStyle, is_nullable: bool) -> JoinKind {
    match fetch_style {
        FetchStyle::Join => {
            if is_nullable {
                JoinKind::LeftOuter
            } else {
                JoinKind::Inner
            }
        }
        FetchStyle::Select | FetchStyle::Subselect | FetchStyle::Batch => JoinKind::None,
    }
}
