//! Exact MILP solve of the Orienteering Problem.
//!
//! The formulation selects arcs of the complete directed graph via binary
//! variables `x[i][j]`, maximizing the score collected over outgoing arcs
//! subject to path-structure constraints, a travel budget, and
//! Miller-Tucker-Zemlin (MTZ) subtour elimination via integer rank
//! variables `u[i]`.
//!
//! The model is built against the [`MilpBackend`] contract, so the same
//! formulation runs on HiGHS (default) or Gurobi (feature `gurobi`).

mod highs;
pub use highs::{HighsBackend, HighsSolved};

#[cfg(feature = "gurobi")]
mod gurobi;
#[cfg(feature = "gurobi")]
pub use gurobi::{GurobiBackend, GurobiSolved};

use log::debug;

use crate::error::OpError;
use crate::instance::Instance;
use crate::milp::{MilpBackend, MilpSolution, SolverConfig};
use crate::path::{DirectedEdge, Path};
use crate::reduce::SubInstance;

/// Arc selection variables, `None` on the diagonal.
type ArcVars<V> = Vec<Vec<Option<V>>>;

/// Build the OP model on the given backend and return the arc variables
/// needed to read the solution back.
///
/// With source == target the in-to-source and out-of-target constraints are
/// skipped; nothing then forces a nontrivial closed tour, so that degenerate
/// case is unsupported.
fn build_model<B: MilpBackend>(
    backend: &mut B,
    instance: &Instance,
) -> Result<ArcVars<B::Var>, OpError> {
    let n = instance.dimension();
    let source = instance.source();
    let target = instance.target();

    // x[i][j]: arc (i, j) is selected. The objective charges score[i] on
    // every outgoing arc of i; with out-degree <= 1 that counts each visited
    // site except the target exactly once. The reported path score adds the
    // target score afterwards.
    let mut x: ArcVars<B::Var> = Vec::with_capacity(n);
    for i in 0..n {
        let mut row = Vec::with_capacity(n);
        for j in 0..n {
            if i == j {
                row.push(None);
            } else {
                row.push(Some(backend.add_binary(instance.score(i))?));
            }
        }
        x.push(row);
    }

    // no arc enters the source, no arc leaves the target
    if source != target {
        let terms: Vec<_> = (0..n)
            .filter(|&i| i != source)
            .filter_map(|i| x[i][source].map(|var| (var, 1.0)))
            .collect();
        backend.add_eq(&terms, 0.0)?;

        let terms: Vec<_> = (0..n)
            .filter(|&i| i != target)
            .filter_map(|i| x[target][i].map(|var| (var, 1.0)))
            .collect();
        backend.add_eq(&terms, 0.0)?;
    }

    // exactly one arc leaves the source
    let terms: Vec<_> = (0..n)
        .filter_map(|j| x[source][j].map(|var| (var, 1.0)))
        .collect();
    backend.add_eq(&terms, 1.0)?;

    // exactly one arc enters the target
    let terms: Vec<_> = (0..n)
        .filter_map(|i| x[i][target].map(|var| (var, 1.0)))
        .collect();
    backend.add_eq(&terms, 1.0)?;

    // flow conservation at every intermediate site
    for i in 0..n {
        if i != source && i != target {
            let mut terms: Vec<(B::Var, f64)> = Vec::with_capacity(2 * n);
            for j in 0..n {
                if let Some(var) = x[i][j] {
                    terms.push((var, 1.0));
                }
                if let Some(var) = x[j][i] {
                    terms.push((var, -1.0));
                }
            }
            backend.add_eq(&terms, 0.0)?;
        }
    }

    // out-degree at most one; together with flow conservation this caps the
    // in-degree as well, so selected arcs form a simple path
    for i in 0..n {
        let terms: Vec<_> = (0..n)
            .filter_map(|j| x[i][j].map(|var| (var, 1.0)))
            .collect();
        backend.add_le(&terms, 1.0)?;
    }

    // total travel distance within budget
    let mut terms: Vec<(B::Var, f64)> = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            if let Some(var) = x[i][j] {
                terms.push((var, instance.distance(i, j)));
            }
        }
    }
    backend.add_le(&terms, instance.max_distance())?;

    // MTZ: rank u[i] in [2, n] for every site but the source; ranks must
    // strictly increase along selected arcs, which forbids cycles that the
    // degree and flow constraints alone would admit
    let mut u: Vec<Option<B::Var>> = Vec::with_capacity(n);
    for i in 0..n {
        if i == source {
            u.push(None);
        } else {
            u.push(Some(backend.add_integer(2.0, n as f64)?));
        }
    }
    for i in 0..n {
        let Some(u_i) = u[i] else { continue };
        for j in 0..n {
            if i == j {
                continue;
            }
            let Some(u_j) = u[j] else { continue };
            if let Some(x_ij) = x[i][j] {
                backend.add_le(&[(u_i, 1.0), (u_j, -1.0), (x_ij, (n - 1) as f64)], (n - 2) as f64)?;
            }
        }
    }

    debug!(
        "built OP model with {} sites: {} arc variables, {} rank variables",
        n,
        n * (n - 1),
        n - 1
    );

    Ok(x)
}

/// Walk the 0/1 solution from the source, following the selected arc of
/// each row until the target is reached.
///
/// Values are rounded to the nearest integer to absorb solver noise; the
/// out-degree constraint guarantees at most one selected arc per row. Takes
/// at least one step before testing termination, so source == target does
/// not stop immediately.
fn extract_path<S: MilpSolution>(
    solution: &S,
    x: &ArcVars<S::Var>,
    instance: &Instance,
) -> Result<Path, OpError>
where
    S::Var: Copy,
{
    let n = instance.dimension();
    let target = instance.target();
    let mut edges = Vec::new();
    let mut current = instance.source();

    loop {
        let mut next = None;
        for j in 0..n {
            if let Some(var) = x[current][j] {
                if solution.value(var).round() == 1.0 {
                    next = Some(j);
                    break;
                }
            }
        }
        // a valid optimal solution always has an outgoing arc until the
        // target is reached
        let Some(j) = next else {
            return Err(OpError::Infeasible);
        };
        edges.push(DirectedEdge::new(current, j, instance.distance(current, j)));
        current = j;
        if current == target {
            return Ok(Path::new(edges));
        }
        if edges.len() >= n {
            return Err(OpError::Infeasible);
        }
    }
}

/// Solve the full instance on a caller-supplied backend.
///
/// Returns `Ok(None)` when the model is infeasible; any engine failure
/// propagates as [`OpError::Solver`].
pub fn optimize_with<B: MilpBackend>(
    mut backend: B,
    instance: &Instance,
) -> Result<Option<Path>, OpError> {
    let x = build_model(&mut backend, instance)?;
    let solution = match backend.maximize() {
        Ok(solution) => solution,
        Err(e) if e.is_infeasibility() => return Ok(None),
        Err(e) => return Err(e),
    };
    match extract_path(&solution, &x, instance) {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.is_infeasibility() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Solve the full instance on the default HiGHS backend.
pub fn optimize(instance: &Instance) -> Result<Option<Path>, OpError> {
    optimize_with(HighsBackend::default(), instance)
}

/// Solve the full instance on the default backend with explicit solver
/// configuration.
pub fn optimize_with_config(
    instance: &Instance,
    config: SolverConfig,
) -> Result<Option<Path>, OpError> {
    optimize_with(HighsBackend::new(config), instance)
}

/// Apply reachability pruning, solve the reduced instance on a
/// caller-supplied backend, and re-expand the path to original indices.
///
/// Sound for instances satisfying the triangle inequality; on non-metric
/// instances pruning may discard sites of an optimal path, so prefer
/// [`optimize`] there.
pub fn solve_with_pruning_on<B: MilpBackend>(
    backend: B,
    instance: &Instance,
) -> Result<Option<Path>, OpError> {
    let sub = match SubInstance::new(instance) {
        Ok(sub) => sub,
        Err(e) if e.is_infeasibility() => return Ok(None),
        Err(e) => return Err(e),
    };
    let reduced_path = optimize_with(backend, sub.reduced())?;
    Ok(reduced_path.map(|path| sub.expand(&path)))
}

/// Apply reachability pruning and solve on the default HiGHS backend.
pub fn solve_with_pruning(instance: &Instance) -> Result<Option<Path>, OpError> {
    solve_with_pruning_on(HighsBackend::default(), instance)
}

/// Apply reachability pruning and solve on the default backend with explicit
/// solver configuration.
pub fn solve_with_pruning_config(
    instance: &Instance,
    config: SolverConfig,
) -> Result<Option<Path>, OpError> {
    solve_with_pruning_on(HighsBackend::new(config), instance)
}
