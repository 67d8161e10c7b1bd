//! Error type for the MOAHA optimizer.

/// Errors reported by configuration, problem validation, and the search loop.
///
/// Foraging rejections are ordinary outcomes and never show up here.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MoahaError {
    /// A structural configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A required named parameter was not supplied.
    #[error("missing parameter '{name}'")]
    MissingParameter {
        /// Parameter name.
        name: String,
    },

    /// A named parameter could not be parsed as a positive integer.
    #[error("parameter '{name}' must be a positive integer, got '{value}'")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// The raw value that failed to parse.
        value: String,
    },

    /// The problem reports fewer than two objectives.
    #[error("multi-objective search needs at least 2 objectives, problem has {got}")]
    TooFewObjectives {
        /// Number of objectives reported by the problem.
        got: usize,
    },

    /// Problem bounds are inconsistent with its dimension.
    #[error("invalid bounds: {reason}")]
    InvalidBounds {
        /// What is wrong with the bounds.
        reason: String,
    },

    /// The visit table offered no neighbour for guided foraging.
    ///
    /// This is an internal invariant violation: every valid colony has at
    /// least two agents, so each row has a maximal off-diagonal entry.
    #[error("internal invariant violated: agent {agent} has no guided-foraging target")]
    EmptyNeighborhood {
        /// The agent whose row was empty.
        agent: usize,
    },
}
