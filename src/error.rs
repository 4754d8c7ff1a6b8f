//! Error types for instance loading, model construction, and solving.

use thiserror::Error;

/// Errors raised while loading instances, building the MILP model, or solving.
///
/// [`OpError::InfeasibleBudget`] and [`OpError::Infeasible`] are recoverable:
/// the top-level solve entry points translate them into an absent path. All
/// other kinds propagate to the caller unchanged.
#[derive(Debug, Error)]
pub enum OpError {
    /// Malformed distance matrix or score vector.
    #[error("malformed instance data: {0}")]
    Shape(String),

    /// Source or target index outside `[0, n)`.
    #[error("site index {index} out of range for instance with {n} sites")]
    IndexOutOfRange { index: usize, n: usize },

    /// The direct source-target distance already exceeds the budget,
    /// detected during reachability pruning.
    #[error("distance from source to target ({dist}) exceeds maximum distance ({max})")]
    InfeasibleBudget { dist: f64, max: f64 },

    /// Failure raised by the MILP engine during model construction or solve.
    #[error("solver error: {0}")]
    Solver(String),

    /// The solver proved that no feasible selection of arcs exists.
    #[error("no feasible path exists under the given constraints")]
    Infeasible,

    /// Underlying CSV read or write failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl OpError {
    /// Whether this error denotes "no path" rather than a hard failure.
    pub fn is_infeasibility(&self) -> bool {
        matches!(self, OpError::InfeasibleBudget { .. } | OpError::Infeasible)
    }
}
