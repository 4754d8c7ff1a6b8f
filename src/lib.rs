//! OP Solver Library
//!
//! An exact solver for the Orienteering Problem (OP): find a simple directed
//! path from a source site to a target site that maximizes the sum of site
//! scores without exceeding a travel budget.
//!
//! # Features
//!
//! - Exact MILP formulation with Miller-Tucker-Zemlin subtour elimination
//! - Reachability pruning of sites that cannot lie on any feasible path
//! - Engine-independent solver adapter: HiGHS by default, Gurobi behind the
//!   `gurobi` feature
//! - CSV interchange for distance matrices, score vectors, and paths
//!
//! # Example
//!
//! ```no_run
//! use op_solver::instance::Instance;
//! use op_solver::exact::solve_with_pruning;
//!
//! let instance = Instance::from_files("dist.csv", "scores.csv", 0, 5, 2750.0).unwrap();
//!
//! match solve_with_pruning(&instance).unwrap() {
//!     Some(path) => println!(
//!         "score {:.2}, length {:.2}",
//!         instance.path_score(&path),
//!         instance.path_length(&path)
//!     ),
//!     None => println!("no feasible path"),
//! }
//! ```

pub mod error;
pub mod exact;
pub mod instance;
pub mod milp;
pub mod path;
pub mod reduce;

pub use error::OpError;
pub use exact::{optimize, solve_with_pruning};
pub use instance::Instance;
pub use milp::SolverConfig;
pub use path::{DirectedEdge, Path};
pub use reduce::SubInstance;
