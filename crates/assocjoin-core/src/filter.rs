//! Row-level filters: the enabled set captured per join, and condition templates.
//!
//! A query compiler enables filters by name and binds their parameters. Each joinable
//! declares which filters it understands through a [`FilterSet`], whose templates
//! refer to the joined table through an `{alias}` placeholder. Parameters stay as
//! named placeholders in the rendered SQL; binding happens at execution time.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Parameter bindings of one enabled filter, keyed by parameter name.
pub type FilterParams = BTreeMap<String, serde_json::Value>;

/// Placeholder replaced by the table alias when a filter template is rendered.
pub const ALIAS_PLACEHOLDER: &str = "{alias}";

/// Immutable, ordered snapshot of the filters enabled for a query.
///
/// Cloning is cheap and shares the snapshot, so a descriptor can keep the filters
/// that were enabled when it was built even if the caller enables more later.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnabledFilters {
    filters: Arc<BTreeMap<String, FilterParams>>,
}

impl EnabledFilters {
    /// No filters enabled.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Return a snapshot with `name` enabled and bound to `params`.
    ///
    /// Enabling a filter that is already enabled replaces its bindings.
    #[must_use]
    pub fn enable(mut self, name: impl Into<String>, params: FilterParams) -> Self {
        Arc::make_mut(&mut self.filters).insert(name.into(), params);
        self
    }

    /// Return a snapshot with `name` disabled.
    #[must_use]
    pub fn disable(mut self, name: &str) -> Self {
        if self.filters.contains_key(name) {
            Arc::make_mut(&mut self.filters).remove(name);
        }
        self
    }

    #[must_use]
    pub fn is_enabled(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// Parameter bindings of an enabled filter.
    #[must_use]
    pub fn params(&self, name: &str) -> Option<&FilterParams> {
        self.filters.get(name)
    }

    /// Enabled filter names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.filters.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl Serialize for EnabledFilters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.filters.as_ref().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for EnabledFilters {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let filters = BTreeMap::<String, FilterParams>::deserialize(deserializer)?;
        Ok(Self {
            filters: Arc::new(filters),
        })
    }
}

/// One named filter condition template, e.g. `{alias}.deleted = false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCondition {
    pub name: String,
    pub template: String,
}

/// The filters a joinable understands, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    conditions: Vec<FilterCondition>,
}

impl FilterSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a filter condition.
    #[must_use]
    pub fn condition(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.conditions.push(FilterCondition {
            name: name.into(),
            template: template.into(),
        });
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Render the enabled conditions for `alias`, AND-joined in declaration order.
    ///
    /// Returns an empty string when none of the declared filters is enabled.
    #[must_use]
    pub fn render(&self, alias: &str, enabled: &EnabledFilters) -> String {
        let mut fragment = String::new();
        for condition in self
            .conditions
            .iter()
            .filter(|c| enabled.is_enabled(&c.name))
        {
            if !fragment.is_empty() {
                fragment.push_str(" and ");
            }
            fragment.push_str(&condition.template.replace(ALIAS_PLACEHOLDER, alias));
        }
        fragment
    }
}
