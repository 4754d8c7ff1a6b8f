//! Minimal capability contract over an external MILP engine.
//!
//! The model builder only needs to add binary and bounded integer variables,
//! post linear equality and `<=` constraints, maximize, and read back
//! solution values. Each engine binding implements this contract so the core
//! formulation depends on no solver-specific API.

use crate::error::OpError;

/// Engine-independent solver configuration.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Time limit in seconds.
    pub time_limit: f64,
    /// MIP gap tolerance.
    pub mip_gap: f64,
    /// Number of threads (0 = automatic).
    pub threads: i32,
    /// Enable engine log output.
    pub verbose: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            time_limit: 3600.0,
            mip_gap: 1e-6,
            threads: 0,
            verbose: false,
        }
    }
}

/// A MILP model under construction.
///
/// Variables are added with their objective coefficient up front; the
/// objective sense is always maximization, fixed when [`MilpBackend::maximize`]
/// consumes the model.
pub trait MilpBackend {
    /// Engine-specific variable handle.
    type Var: Copy;
    /// Engine-specific solved model.
    type Solved: MilpSolution<Var = Self::Var>;

    /// Add a binary variable with the given objective coefficient.
    fn add_binary(&mut self, obj: f64) -> Result<Self::Var, OpError>;

    /// Add an integer variable with inclusive bounds and zero objective
    /// coefficient.
    fn add_integer(&mut self, lower: f64, upper: f64) -> Result<Self::Var, OpError>;

    /// Add the linear constraint `sum(coeff * var) = rhs`.
    fn add_eq(&mut self, terms: &[(Self::Var, f64)], rhs: f64) -> Result<(), OpError>;

    /// Add the linear constraint `sum(coeff * var) <= rhs`.
    fn add_le(&mut self, terms: &[(Self::Var, f64)], rhs: f64) -> Result<(), OpError>;

    /// Solve to optimality with a maximization objective.
    ///
    /// Returns [`OpError::Infeasible`] when the engine proves no feasible
    /// assignment exists and [`OpError::Solver`] for any other engine-level
    /// failure.
    fn maximize(self) -> Result<Self::Solved, OpError>;
}

/// Read access to the solution values of a solved model.
pub trait MilpSolution {
    type Var;

    /// Solution value of a variable.
    fn value(&self, var: Self::Var) -> f64;
}
