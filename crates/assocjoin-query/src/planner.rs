//! The association join planner.
//!
//! The query-plan walker appends one descriptor per fetched association while the
//! planner is building, then asks it to emit every join, in insertion order, into a
//! [`JoinFragment`]. The first emission finalizes the planner; it can be emitted again
//! (with identical output) but accepts no more joins.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use assocjoin_core::{
//!     AssociationFetch, EnabledFilters, EntityAssociation, FetchOwner, FetchStyle,
//!     TableJoinable,
//! };
//! use assocjoin_query::{AssociationJoinPlanner, SqlJoinFragment};
//!
//! let mut planner = AssociationJoinPlanner::new("h");
//! planner
//!     .append(
//!         AssociationFetch::new(
//!             "Hero.team",
//!             EntityAssociation::many_to_one("Team"),
//!             FetchOwner::entity("h"),
//!             "t",
//!             Arc::new(TableJoinable::entity("teams")),
//!         )
//!         .fetch_style(FetchStyle::Join)
//!         .nullable(true)
//!         .left_columns(["team_id"])
//!         .right_columns(["id"]),
//!         None,
//!         &EnabledFilters::none(),
//!     )
//!     .unwrap();
//!
//! let mut sql = SqlJoinFragment::new();
//! planner.emit_all(&mut sql).unwrap();
//! assert_eq!(sql.from_fragment(), " LEFT OUTER JOIN teams t ON h.team_id=t.id");
//! ```

use crate::bridge;
use crate::config::PlannerConfig;
use crate::descriptor::{DescriptorId, JoinDescriptor};
use crate::fragment::JoinFragment;
use crate::ownership;
use assocjoin_core::{
    AssociationFetch, EnabledFilters, PlanError, PlanErrorKind, PlanResult, is_plain_identifier,
};
use std::borrow::Cow;

/// Lifecycle of a planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerState {
    /// Accepting joins.
    Building,
    /// Emitted at least once; read-only.
    Finalized,
}

/// Plans the SQL joins of one query plan.
///
/// One instance per query-plan compilation; it is not meant to be shared.
#[derive(Debug)]
pub struct AssociationJoinPlanner {
    config: PlannerConfig,
    root_alias: String,
    descriptors: Vec<JoinDescriptor>,
    state: PlannerState,
}

impl AssociationJoinPlanner {
    /// Create a planner whose joins are rooted at the entity aliased `root_alias`.
    pub fn new(root_alias: impl Into<String>) -> Self {
        Self::with_config(root_alias, PlannerConfig::default())
    }

    /// Create a planner with explicit configuration.
    pub fn with_config(root_alias: impl Into<String>, config: PlannerConfig) -> Self {
        Self {
            config,
            root_alias: root_alias.into(),
            descriptors: Vec::new(),
            state: PlannerState::Building,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn root_alias(&self) -> &str {
        &self.root_alias
    }

    pub fn state(&self) -> PlannerState {
        self.state
    }

    /// Descriptors in insertion order.
    pub fn descriptors(&self) -> &[JoinDescriptor] {
        &self.descriptors
    }

    pub fn descriptor(&self, id: DescriptorId) -> Option<&JoinDescriptor> {
        self.descriptors.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Plan the join for one fetched association.
    ///
    /// The filters are captured as they are now; enabling more later does not affect
    /// this join. Nothing is registered when an error is returned.
    ///
    /// # Errors
    ///
    /// - `PlannerFinalized` after the first [`emit_all`](Self::emit_all)
    /// - `UnresolvableOwner` if the owner is not an entity reference, or its alias is
    ///   neither the root alias nor joined by an earlier join that will be emitted
    /// - `ColumnArityMismatch` if the column lists are empty or differ in length
    /// - `DuplicateAlias` if the right alias is already in use
    /// - `InvalidAlias` if alias validation is enabled and an alias is not a plain identifier
    pub fn append(
        &mut self,
        fetch: AssociationFetch,
        restriction: Option<&str>,
        filters: &EnabledFilters,
    ) -> PlanResult<DescriptorId> {
        if self.state == PlannerState::Finalized {
            return Err(PlanError::finalized().with_path(&fetch.property_path));
        }

        if self.config.validate_aliases {
            self.check_aliases(&fetch)?;
        }

        let descriptor = JoinDescriptor::build(fetch, restriction, filters)?;

        let left = descriptor.left_alias();
        if left != self.root_alias && !ownership::joins_alias(left, &self.descriptors) {
            return Err(PlanError::unresolvable_owner(
                descriptor.property_path(),
                format!("owner alias '{left}' is not joined by an earlier emitted join"),
            ));
        }

        let right = descriptor.right_alias();
        if right == self.root_alias || ownership::introduces(right, &self.descriptors) {
            return Err(PlanError::new(
                PlanErrorKind::DuplicateAlias,
                format!("alias '{right}' is already in use"),
            )
            .with_path(descriptor.property_path()));
        }

        let id = DescriptorId(self.descriptors.len());
        tracing::debug!(
            id = %id,
            path = %descriptor.property_path(),
            left = left,
            right = right,
            kind = ?descriptor.join_kind(),
            unique_key = descriptor.rhs_unique_key(),
            restricted = descriptor.has_restriction(),
            "Planned association join"
        );
        self.descriptors.push(descriptor);
        Ok(id)
    }

    fn check_aliases(&self, fetch: &AssociationFetch) -> PlanResult<()> {
        let aliases = fetch
            .owner
            .entity_alias()
            .into_iter()
            .chain(std::iter::once(fetch.right_alias.as_str()));
        for alias in aliases {
            if !is_plain_identifier(alias) {
                return Err(PlanError::new(
                    PlanErrorKind::InvalidAlias,
                    format!("alias '{alias}' is not a plain SQL identifier"),
                )
                .with_path(&fetch.property_path));
            }
        }
        Ok(())
    }

    /// Emit every materialized join, in insertion order, into `sink`.
    ///
    /// A many-to-many collection join is bridged against the first later join fetching
    /// its element type; all other joins are emitted with their own condition. Joins of
    /// kind `None` are not emitted. The first call finalizes the planner.
    ///
    /// # Errors
    ///
    /// `InvalidJoin` if any descriptor fails its column check. Validation runs before
    /// anything is written, so the sink is untouched on error.
    #[tracing::instrument(level = "debug", skip(self, sink), fields(joins = self.descriptors.len()))]
    pub fn emit_all<S: JoinFragment + ?Sized>(&mut self, sink: &mut S) -> PlanResult<()> {
        if self.state == PlannerState::Building {
            tracing::trace!("Finalizing join planner");
            self.state = PlannerState::Finalized;
        }

        for descriptor in &self.descriptors {
            descriptor.validate_join()?;
        }

        for (i, descriptor) in self.descriptors.iter().enumerate() {
            if !descriptor.join_kind().is_materialized() {
                tracing::trace!(path = %descriptor.property_path(), "Skipping join satisfied by a separate load");
                continue;
            }

            let bridged = self
                .bridge_partner(i)
                .and_then(|partner| bridge::try_bridge(descriptor, partner));
            match bridged {
                Some(bridged) => bridged.emit(sink),
                None => descriptor.emit(sink, Cow::Borrowed(descriptor.condition())),
            }
        }

        Ok(())
    }

    /// First later join that `descriptors[i]` bridges to.
    fn bridge_partner(&self, i: usize) -> Option<&JoinDescriptor> {
        let candidate = &self.descriptors[i];
        let mut partners = self.descriptors[i + 1..]
            .iter()
            .filter(|other| bridge::is_many_to_many_with(candidate, other));
        let first = partners.next()?;
        tracing::trace!(
            path = %candidate.property_path(),
            element = %first.property_path(),
            "Bridging many-to-many join"
        );

        if self.config.warn_on_ambiguous_bridge && partners.next().is_some() {
            tracing::warn!(
                path = %candidate.property_path(),
                chosen = %first.property_path(),
                "Several joins match this many-to-many collection; bridging the first"
            );
        }
        Some(first)
    }

    /// Owner position of a descriptor, for correlating collection and one-to-one rows
    /// back to their owning entity row.
    pub fn owner_index_of(&self, id: DescriptorId) -> Option<usize> {
        let descriptor = self.descriptor(id)?;
        ownership::owner_of(descriptor, &self.descriptors)
    }
}
