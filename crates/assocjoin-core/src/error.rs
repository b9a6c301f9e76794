//! Error types for association join planning.

use std::fmt;

/// The primary error type for all assocjoin operations.
#[derive(Debug)]
pub enum Error {
    /// Join planning errors (metadata faults and usage errors)
    Plan(PlanError),
    /// Configuration errors
    Config(ConfigError),
    /// Serialization/deserialization errors
    Serde(String),
}

/// A failure raised while building or emitting a join plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanError {
    pub kind: PlanErrorKind,
    /// Dotted property path of the association being planned, when known.
    pub property_path: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanErrorKind {
    /// Left/right column counts differ, or either side is empty
    ColumnArityMismatch,
    /// The fetch owner is not an entity reference, or its alias was never joined
    UnresolvableOwner,
    /// `append` was called after the plan was emitted
    PlannerFinalized,
    /// A descriptor failed its column check at emission time
    InvalidJoin,
    /// The right-hand alias is already claimed by an earlier join
    DuplicateAlias,
    /// An alias is not a plain SQL identifier (only when alias validation is on)
    InvalidAlias,
}

impl PlanErrorKind {
    /// Short, stable name used in messages and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            PlanErrorKind::ColumnArityMismatch => "column arity mismatch",
            PlanErrorKind::UnresolvableOwner => "unresolvable owner",
            PlanErrorKind::PlannerFinalized => "planner finalized",
            PlanErrorKind::InvalidJoin => "invalid join",
            PlanErrorKind::DuplicateAlias => "duplicate alias",
            PlanErrorKind::InvalidAlias => "invalid alias",
        }
    }
}

#[derive(Debug)]
pub struct ConfigError {
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl PlanError {
    /// Create a plan error without a property path.
    pub fn new(kind: PlanErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            property_path: None,
            message: message.into(),
        }
    }

    /// Attach the property path of the offending association.
    #[must_use]
    pub fn with_path(mut self, path: impl fmt::Display) -> Self {
        self.property_path = Some(path.to_string());
        self
    }

    pub fn column_arity(path: impl fmt::Display, left: usize, right: usize) -> Self {
        Self::new(
            PlanErrorKind::ColumnArityMismatch,
            format!("invalid join columns: {left} left column(s), {right} right column(s)"),
        )
        .with_path(path)
    }

    pub fn unresolvable_owner(path: impl fmt::Display, message: impl Into<String>) -> Self {
        Self::new(PlanErrorKind::UnresolvableOwner, message).with_path(path)
    }

    pub fn finalized() -> Self {
        Self::new(
            PlanErrorKind::PlannerFinalized,
            "cannot append a join after the plan has been emitted",
        )
    }

    pub fn invalid_join(path: impl fmt::Display) -> Self {
        Self::new(
            PlanErrorKind::InvalidJoin,
            "invalid join columns for association",
        )
        .with_path(path)
    }

    /// Is this a caller mistake rather than a metadata fault?
    pub fn is_usage_error(&self) -> bool {
        matches!(self.kind, PlanErrorKind::PlannerFinalized)
    }
}

impl Error {
    /// Get the plan error kind, if this is a planning error.
    pub fn plan_kind(&self) -> Option<PlanErrorKind> {
        match self {
            Error::Plan(e) => Some(e.kind),
            _ => None,
        }
    }

    /// Get the property path that caused this error, if available
    pub fn property_path(&self) -> Option<&str> {
        match self {
            Error::Plan(e) => e.property_path.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Plan(e) => write!(f, "Plan error: {}", e),
            Error::Config(e) => write!(f, "Configuration error: {}", e.message),
            Error::Serde(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Plan(e) => Some(e),
            Error::Config(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(path) = &self.property_path {
            write!(f, "{} ({}): {}", self.kind.as_str(), path, self.message)
        } else {
            write!(f, "{}: {}", self.kind.as_str(), self.message)
        }
    }
}

impl std::error::Error for PlanError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<PlanError> for Error {
    fn from(err: PlanError) -> Self {
        Error::Plan(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serde(err.to_string())
    }
}

/// Result type alias for assocjoin operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Result type alias for planner operations.
pub type PlanResult<T> = std::result::Result<T, PlanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_error_display_includes_path() {
        let err = PlanError::column_arity("Hero.team", 2, 1);
        assert_eq!(err.kind, PlanErrorKind::ColumnArityMismatch);
        assert_eq!(err.property_path.as_deref(), Some("Hero.team"));
        assert_eq!(
            err.to_string(),
            "column arity mismatch (Hero.team): invalid join columns: 2 left column(s), 1 right column(s)"
        );
    }

    #[test]
    fn plan_error_display_without_path() {
        let err = PlanError::finalized();
        assert!(err.is_usage_error());
        assert!(err.to_string().starts_with("planner finalized: "));
    }

    #[test]
    fn top_level_error_exposes_plan_details() {
        let err: Error = PlanError::invalid_join("Team.heroes").into();
        assert_eq!(err.plan_kind(), Some(PlanErrorKind::InvalidJoin));
        assert_eq!(err.property_path(), Some("Team.heroes"));
        assert!(std::error::Error::source(&err).is_some());

        let config: Error = ConfigError {
            message: "bad dialect".to_string(),
            source: None,
        }
        .into();
        assert_eq!(config.plan_kind(), None);
        assert_eq!(config.property_path(), None);
        assert_eq!(config.to_string(), "Configuration error: bad dialect");
    }

    #[test]
    fn serde_json_errors_convert() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = parse.into();
        assert!(matches!(err, Error::Serde(_)));
    }
}
