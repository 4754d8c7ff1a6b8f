//! HiGHS implementation of the MILP adapter contract.
//!
//! Default engine: open source, no license required, so the full solve is
//! exercised by the test suite.

use highs::{Col, HighsModelStatus, RowProblem, Sense, Solution};

use crate::error::OpError;
use crate::milp::{MilpBackend, MilpSolution, SolverConfig};

/// A HiGHS model under construction.
pub struct HighsBackend {
    problem: RowProblem,
    config: SolverConfig,
}

impl HighsBackend {
    pub fn new(config: SolverConfig) -> Self {
        HighsBackend {
            problem: RowProblem::new(),
            config,
        }
    }
}

impl Default for HighsBackend {
    fn default() -> Self {
        HighsBackend::new(SolverConfig::default())
    }
}

impl MilpBackend for HighsBackend {
    type Var = Col;
    type Solved = HighsSolved;

    fn add_binary(&mut self, obj: f64) -> Result<Col, OpError> {
        Ok(self.problem.add_integer_column(obj, 0.0..=1.0))
    }

    fn add_integer(&mut self, lower: f64, upper: f64) -> Result<Col, OpError> {
        Ok(self.problem.add_integer_column(0.0, lower..=upper))
    }

    fn add_eq(&mut self, terms: &[(Col, f64)], rhs: f64) -> Result<(), OpError> {
        self.problem.add_row(rhs..=rhs, terms.iter().copied());
        Ok(())
    }

    fn add_le(&mut self, terms: &[(Col, f64)], rhs: f64) -> Result<(), OpError> {
        self.problem.add_row(..=rhs, terms.iter().copied());
        Ok(())
    }

    fn maximize(self) -> Result<HighsSolved, OpError> {
        let mut model = self.problem.optimise(Sense::Maximise);
        model.set_option("output_flag", self.config.verbose);
        model.set_option("time_limit", self.config.time_limit);
        model.set_option("mip_rel_gap", self.config.mip_gap);
        if self.config.threads > 0 {
            model.set_option("threads", self.config.threads);
        }

        let solved = model.solve();
        match solved.status() {
            HighsModelStatus::Optimal => Ok(HighsSolved {
                solution: solved.get_solution(),
            }),
            HighsModelStatus::Infeasible => Err(OpError::Infeasible),
            status => Err(OpError::Solver(format!(
                "HiGHS terminated with status {:?}",
                status
            ))),
        }
    }
}

/// Solution values of a solved HiGHS model.
pub struct HighsSolved {
    solution: Solution,
}

impl MilpSolution for HighsSolved {
    type Var = Col;

    fn value(&self, var: Col) -> f64 {
        self.solution[var]
    }
}
