//! OP Solver - Command Line Interface
//!
//! Solve Orienteering Problem instances to optimality, or re-score a saved
//! path against an instance.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};
use log::info;
use serde::Serialize;

use op_solver::exact::{optimize_with_config, solve_with_pruning_config};
use op_solver::instance::Instance;
use op_solver::milp::SolverConfig;
use op_solver::path::Path;

#[derive(Parser)]
#[command(name = "op-solver")]
#[command(author = "M2 AI2D Student")]
#[command(version = "1.0")]
#[command(about = "An exact solver for the Orienteering Problem")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve an instance and write the optimal path
    Solve {
        /// Path to the distance matrix file (n x n CSV)
        #[arg(short, long)]
        distances: PathBuf,

        /// Path to the score vector file (1 x n CSV)
        #[arg(long)]
        scores: PathBuf,

        /// Output file for the optimal site sequence
        #[arg(short, long)]
        output: PathBuf,

        /// Source site index in [0, n)
        #[arg(short, long)]
        source: usize,

        /// Target site index in [0, n)
        #[arg(short, long)]
        target: usize,

        /// Maximum total travel distance
        #[arg(short, long)]
        max_distance: f64,

        /// Prune sites that cannot lie on any feasible path before solving.
        /// Only sound when the distance matrix satisfies the triangle
        /// inequality.
        #[arg(long)]
        prune: bool,

        /// Solver time limit in seconds
        #[arg(long, default_value = "3600")]
        time_limit: f64,

        /// Enable solver engine output
        #[arg(short, long)]
        verbose: bool,

        /// Print the solve report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Re-score a previously saved path against an instance
    Score {
        /// Path to the distance matrix file (n x n CSV)
        #[arg(short, long)]
        distances: PathBuf,

        /// Path to the score vector file (1 x n CSV)
        #[arg(long)]
        scores: PathBuf,

        /// Path file: one line of comma-separated site indices
        #[arg(short, long)]
        path: PathBuf,
    },
}

/// Summary of one solve, printed to stdout (plain or JSON).
#[derive(Debug, Serialize)]
struct SolveReport {
    sites: Vec<usize>,
    score: f64,
    length: f64,
    pruned: bool,
    solve_time: f64,
}

fn run_solve(
    distances: &PathBuf,
    scores: &PathBuf,
    output: &PathBuf,
    source: usize,
    target: usize,
    max_distance: f64,
    prune: bool,
    config: SolverConfig,
    json: bool,
) -> Result<ExitCode, op_solver::OpError> {
    let instance = Instance::from_files(distances, scores, source, target, max_distance)?;
    println!("Instance has {} sites.", instance.dimension());

    let start = Instant::now();
    let result = if prune {
        solve_with_pruning_config(&instance, config)?
    } else {
        optimize_with_config(&instance, config)?
    };
    let solve_time = start.elapsed().as_secs_f64();
    info!("solve finished in {:.3}s", solve_time);

    let Some(path) = result else {
        eprintln!("No feasible path within the given maximum distance.");
        return Ok(ExitCode::from(2));
    };

    let report = SolveReport {
        sites: path.sites(),
        score: instance.path_score(&path),
        length: instance.path_length(&path),
        pruned: prune,
        solve_time,
    };

    if json {
        let rendered = serde_json::to_string_pretty(&report)
            .map_err(|e| op_solver::OpError::Solver(format!("failed to render report: {}", e)))?;
        println!("{}", rendered);
    } else {
        println!("Solution:");
        for e in &path.edges {
            println!("  {}", e);
        }
        println!("score:\t{}", report.score);
        println!("distance:\t{}", report.length);
    }

    path.write_csv(output)?;
    Ok(ExitCode::SUCCESS)
}

fn run_score(
    distances: &PathBuf,
    scores: &PathBuf,
    path_file: &PathBuf,
) -> Result<ExitCode, op_solver::OpError> {
    let dist = op_solver::instance::read_distances(distances)?;
    let score_vec = op_solver::instance::read_scores(scores)?;
    // terminals are irrelevant for re-scoring; any valid pair works
    let instance = Instance::new(dist, score_vec, 0, 0, f64::MAX)?;
    println!("Instance has {} sites.", instance.dimension());

    let path = Path::read_csv(path_file, &instance)?;
    println!("Path information");
    println!("score:\t{}", instance.path_score(&path));
    println!("distance:\t{}", instance.path_length(&path));
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Solve {
            distances,
            scores,
            output,
            source,
            target,
            max_distance,
            prune,
            time_limit,
            verbose,
            json,
        } => {
            let config = SolverConfig {
                time_limit: *time_limit,
                verbose: *verbose,
                ..SolverConfig::default()
            };
            run_solve(
                distances,
                scores,
                output,
                *source,
                *target,
                *max_distance,
                *prune,
                config,
                *json,
            )
        }
        Commands::Score {
            distances,
            scores,
            path,
        } => run_score(distances, scores, path),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
