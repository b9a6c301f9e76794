//! The fragment sink the planner writes joins into, and a reference SQL renderer.

use crate::config::PlannerConfig;
use crate::dialect::Dialect;
use crate::join::JoinKind;
use std::borrow::Cow;

/// One join as handed to a [`JoinFragment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinClause<'a> {
    /// Table to join
    pub table_name: &'a str,
    /// Alias of the joined table
    pub alias: &'a str,
    /// Owning-side columns, already qualified with the owner alias
    pub left_columns: &'a [String],
    /// Joined-side columns, unqualified
    pub right_columns: &'a [String],
    pub kind: JoinKind,
    /// Extra ON condition, possibly empty
    pub condition: Cow<'a, str>,
}

/// Receives planned joins in emission order.
///
/// Implementations render dialect-specific SQL; the planner does not interpret the
/// pass-through fragments it forwards.
pub trait JoinFragment {
    /// Add one join.
    fn add_join(&mut self, join: JoinClause<'_>);

    /// Add the FROM and WHERE fragments contributed by the joined table itself.
    fn add_fragments(&mut self, from_fragment: &str, where_fragment: &str);
}

/// Renders joins as ANSI SQL text.
///
/// Joins accumulate into a FROM-clause suffix (` INNER JOIN teams t ON h.team_id=t.id`);
/// WHERE fragments accumulate into a separate conjunction.
#[derive(Debug, Clone, Default)]
pub struct SqlJoinFragment {
    dialect: Dialect,
    quote_identifiers: bool,
    from: String,
    conditions: String,
}

impl SqlJoinFragment {
    /// Create a renderer that does not quote identifiers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer following the planner configuration.
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self {
            dialect: config.dialect,
            quote_identifiers: config.quote_identifiers,
            ..Self::default()
        }
    }

    /// Rendered joins, to be appended after the root table of the FROM clause.
    pub fn from_fragment(&self) -> &str {
        &self.from
    }

    /// Rendered WHERE conjunction (without the `WHERE` keyword), possibly empty.
    pub fn where_fragment(&self) -> &str {
        &self.conditions
    }

    /// Consume the renderer, returning `(from_fragment, where_fragment)`.
    pub fn into_parts(self) -> (String, String) {
        (self.from, self.conditions)
    }

    fn table_ref(&self, table: &str) -> String {
        if self.quote_identifiers {
            self.dialect.quote_identifier(table)
        } else {
            table.to_string()
        }
    }
}

/// Strip whitespace and a leading `and` so fragments can be conjoined uniformly.
fn normalize_condition(condition: &str) -> &str {
    let trimmed = condition.trim();
    let lower = trimmed.get(..4).map(str::to_ascii_lowercase);
    if lower.as_deref() == Some("and ") {
        trimmed[4..].trim_start()
    } else {
        trimmed
    }
}

impl JoinFragment for SqlJoinFragment {
    fn add_join(&mut self, join: JoinClause<'_>) {
        if !join.kind.is_materialized() {
            return;
        }

        let table = self.table_ref(join.table_name);
        self.from.push(' ');
        self.from.push_str(join.kind.as_str());
        self.from.push(' ');
        self.from.push_str(&table);
        self.from.push(' ');
        self.from.push_str(join.alias);
        self.from.push_str(" ON ");

        for (i, (left, right)) in join
            .left_columns
            .iter()
            .zip(join.right_columns.iter())
            .enumerate()
        {
            if i > 0 {
                self.from.push_str(" and ");
            }
            self.from.push_str(left);
            self.from.push('=');
            self.from.push_str(join.alias);
            self.from.push('.');
            self.from.push_str(right);
        }

        let condition = normalize_condition(&join.condition);
        if !condition.is_empty() {
            self.from.push_str(" and ");
            self.from.push_str(condition);
        }
    }

    fn add_fragments(&mut self, from_fragment: &str, where_fragment: &str) {
        self.from.push_str(from_fragment);

        let condition = normalize_condition(where_fragment);
        if condition.is_empty() {
            return;
        }
        if !self.conditions.is_empty() {
            self.conditions.push_str(" and ");
        }
        self.conditions.push_str(condition);
    }
}
