//! Error types for the parliament core.

use thiserror::Error;

/// Errors raised by the registry, router, team suggester and workflow graph.
///
/// Every variant is reported synchronously to the immediate caller and none is
/// retried internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParliamentError {
    /// Malformed registration or step input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Lookup of an unknown agent name.
    #[error("agent not found: {0}")]
    NotFound(String),

    /// Routing found zero qualifying agents.
    #[error("no agent matched: {0}")]
    NoMatch(String),

    /// Team suggestion found no phase markers in the task.
    #[error("no phase markers found in task '{0}'; route the task directly instead")]
    NoDecomposition(String),

    /// A step with the same id was already added to the graph.
    #[error("duplicate workflow step: {0}")]
    DuplicateStep(String),

    /// A step references a dependency that has not been added yet.
    #[error("step '{step}' depends on unknown step '{dependency}'")]
    UnknownDependency {
        /// The step being added.
        step: String,
        /// The missing dependency id.
        dependency: String,
    },

    /// The dependency relation contains a cycle; lists the unresolved steps.
    #[error("circular dependency among steps: {}", .0.join(", "))]
    CycleDetected(Vec<String>),
}

/// Result type alias for parliament operations.
pub type Result<T> = std::result::Result<T, ParliamentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_dependency_message() {
        let err = ParliamentError::UnknownDependency {
            step: "deploy".to_string(),
            dependency: "build".to_string(),
        };
        assert_eq!(err.to_string(), "step 'deploy' depends on unknown step 'build'");
    }

    #[test]
    fn test_cycle_message_lists_steps() {
        let err = ParliamentError::CycleDetected(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(err.to_string(), "circular dependency among steps: a, b");
    }
}
