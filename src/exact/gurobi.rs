//! Gurobi implementation of the MILP adapter contract (feature `gurobi`).

use grb::prelude::*;

use crate::error::OpError;
use crate::milp::{MilpBackend, MilpSolution, SolverConfig};

fn solver_err(context: &str, e: grb::Error) -> OpError {
    OpError::Solver(format!("{}: {}", context, e))
}

/// A Gurobi model under construction.
pub struct GurobiBackend {
    model: Model,
    num_vars: usize,
}

impl GurobiBackend {
    /// Create a Gurobi environment and an empty model configured from
    /// `config`.
    pub fn new(config: SolverConfig) -> Result<Self, OpError> {
        let env = Env::new("").map_err(|e| solver_err("failed to create environment", e))?;
        let mut model = Model::with_env("orienteering", env)
            .map_err(|e| solver_err("failed to create model", e))?;

        model
            .set_param(param::TimeLimit, config.time_limit)
            .map_err(|e| solver_err("failed to set time limit", e))?;
        model
            .set_param(param::MIPGap, config.mip_gap)
            .map_err(|e| solver_err("failed to set MIP gap", e))?;
        model
            .set_param(param::Threads, config.threads)
            .map_err(|e| solver_err("failed to set threads", e))?;
        if !config.verbose {
            model
                .set_param(param::OutputFlag, 0)
                .map_err(|e| solver_err("failed to set output flag", e))?;
        }

        Ok(GurobiBackend { model, num_vars: 0 })
    }
}

impl MilpBackend for GurobiBackend {
    type Var = Var;
    type Solved = GurobiSolved;

    fn add_binary(&mut self, obj: f64) -> Result<Var, OpError> {
        let name = format!("v_{}", self.num_vars);
        self.num_vars += 1;
        add_binvar!(self.model, name: &name, obj: obj)
            .map_err(|e| solver_err("failed to add binary variable", e))
    }

    fn add_integer(&mut self, lower: f64, upper: f64) -> Result<Var, OpError> {
        let name = format!("v_{}", self.num_vars);
        self.num_vars += 1;
        add_intvar!(self.model, name: &name, bounds: lower..upper)
            .map_err(|e| solver_err("failed to add integer variable", e))
    }

    fn add_eq(&mut self, terms: &[(Var, f64)], rhs: f64) -> Result<(), OpError> {
        let expr: Expr = terms.iter().map(|&(var, coeff)| coeff * var).grb_sum();
        self.model
            .add_constr("", c!(expr == rhs))
            .map_err(|e| solver_err("failed to add equality constraint", e))?;
        Ok(())
    }

    fn add_le(&mut self, terms: &[(Var, f64)], rhs: f64) -> Result<(), OpError> {
        let expr: Expr = terms.iter().map(|&(var, coeff)| coeff * var).grb_sum();
        self.model
            .add_constr("", c!(expr <= rhs))
            .map_err(|e| solver_err("failed to add inequality constraint", e))?;
        Ok(())
    }

    fn maximize(mut self) -> Result<GurobiSolved, OpError> {
        self.model
            .set_attr(attr::ModelSense, ModelSense::Maximize)
            .map_err(|e| solver_err("failed to set objective sense", e))?;
        self.model
            .optimize()
            .map_err(|e| solver_err("optimization failed", e))?;

        let status = self
            .model
            .status()
            .map_err(|e| solver_err("failed to read status", e))?;
        match status {
            Status::Optimal => Ok(GurobiSolved { model: self.model }),
            Status::Infeasible | Status::InfOrUnbd => Err(OpError::Infeasible),
            other => Err(OpError::Solver(format!(
                "Gurobi terminated with status {:?}",
                other
            ))),
        }
    }
}

/// A solved Gurobi model.
pub struct GurobiSolved {
    model: Model,
}

impl MilpSolution for GurobiSolved {
    type Var = Var;

    fn value(&self, var: Var) -> f64 {
        self.model.get_obj_attr(attr::X, &var).unwrap_or(0.0)
    }
}
