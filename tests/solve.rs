//! End-to-end solves on the default HiGHS backend.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use op_solver::exact::{optimize, solve_with_pruning};
use op_solver::instance::Instance;
use op_solver::path::Path;
use op_solver::reduce::SubInstance;

fn four_site_instance(d_max: f64) -> Instance {
    let dist = vec![
        vec![0.0, 2.0, 4.0, 4.0],
        vec![2.0, 0.0, 3.0, 5.0],
        vec![4.0, 3.0, 0.0, 2.0],
        vec![4.0, 5.0, 2.0, 0.0],
    ];
    Instance::new(dist, vec![1.0; 4], 0, 3, d_max).unwrap()
}

fn assert_valid_path(instance: &Instance, path: &Path) {
    assert!(!path.is_empty());
    assert_eq!(path.first_site(), Some(instance.source()));
    assert_eq!(path.last_site(), Some(instance.target()));
    for w in path.edges.windows(2) {
        assert_eq!(w[0].v, w[1].u, "consecutive endpoints must match");
    }
    let sites = path.sites();
    let mut dedup = sites.clone();
    dedup.sort_unstable();
    dedup.dedup();
    assert_eq!(dedup.len(), sites.len(), "path must be simple");
    for e in &path.edges {
        assert_eq!(e.w, instance.distance(e.u, e.v));
    }
    assert!(instance.path_length(path) <= instance.max_distance() + 1e-6);
}

#[test]
fn scenario_budget_seven_visits_all_sites() {
    let inst = four_site_instance(7.0);
    let path = optimize(&inst).unwrap().unwrap();
    assert_valid_path(&inst, &path);
    assert_eq!(inst.path_score(&path), 4.0);
    assert_eq!(inst.path_length(&path), 7.0);
    assert_eq!(path.sites(), vec![0, 1, 2, 3]);
}

#[test]
fn scenario_budget_six_visits_three_sites() {
    let inst = four_site_instance(6.0);
    let path = optimize(&inst).unwrap().unwrap();
    assert_valid_path(&inst, &path);
    assert_eq!(inst.path_score(&path), 3.0);
    assert_eq!(inst.path_length(&path), 6.0);
}

#[test]
fn scenario_budget_four_goes_direct() {
    let inst = four_site_instance(4.0);
    let path = optimize(&inst).unwrap().unwrap();
    assert_valid_path(&inst, &path);
    assert_eq!(inst.path_score(&path), 2.0);
    assert_eq!(inst.path_length(&path), 4.0);
    assert_eq!(path.sites(), vec![0, 3]);
}

#[test]
fn scenario_budget_three_is_infeasible() {
    let inst = four_site_instance(3.0);
    assert!(optimize(&inst).unwrap().is_none());
    assert!(solve_with_pruning(&inst).unwrap().is_none());
}

#[test]
fn scenarios_agree_with_pruned_solve() {
    for (d_max, score, length) in [(7.0, 4.0, 7.0), (6.0, 3.0, 6.0), (4.0, 2.0, 4.0)] {
        let inst = four_site_instance(d_max);
        let path = solve_with_pruning(&inst).unwrap().unwrap();
        assert_valid_path(&inst, &path);
        assert_eq!(inst.path_score(&path), score);
        assert_eq!(inst.path_length(&path), length);
    }
}

#[test]
fn unreachable_intermediates_never_appear() {
    // site 1 has dist[0][1] + dist[1][3] = 7 > 6
    let inst = four_site_instance(6.0);
    let path = solve_with_pruning(&inst).unwrap().unwrap();
    assert!(!path.sites().contains(&1));
}

#[test]
fn optimal_path_round_trips_through_csv() {
    let inst = four_site_instance(7.0);
    let path = optimize(&inst).unwrap().unwrap();

    let file = std::env::temp_dir().join("op_solver_solve_round_trip.csv");
    path.write_csv(&file).unwrap();
    let back = Path::read_csv(&file, &inst).unwrap();
    std::fs::remove_file(&file).ok();

    assert_eq!(back, path);
    assert_eq!(inst.path_score(&back), inst.path_score(&path));
    assert_eq!(inst.path_length(&back), inst.path_length(&path));
}

#[test]
fn rescoring_is_deterministic() {
    let inst = four_site_instance(7.0);
    let path = optimize(&inst).unwrap().unwrap();
    for _ in 0..3 {
        assert_eq!(inst.path_score(&path), 4.0);
        assert_eq!(inst.path_length(&path), 7.0);
    }
}

/// Random points in the plane with Euclidean distances: metric by
/// construction, so pruning must preserve the optimal score.
fn random_euclidean_instance(rng: &mut ChaCha8Rng, n: usize, d_max: f64) -> Instance {
    let points: Vec<(f64, f64)> = (0..n)
        .map(|_| (rng.gen_range(0.0..10.0), rng.gen_range(0.0..10.0)))
        .collect();
    let dist: Vec<Vec<f64>> = points
        .iter()
        .map(|&(xi, yi)| {
            points
                .iter()
                .map(|&(xj, yj)| ((xi - xj).powi(2) + (yi - yj).powi(2)).sqrt())
                .collect()
        })
        .collect();
    let scores: Vec<f64> = (0..n).map(|_| rng.gen_range(1.0..10.0)).collect();
    Instance::new(dist, scores, 0, n - 1, d_max).unwrap()
}

#[test]
fn pruning_is_sound_on_metric_instances() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    for _ in 0..5 {
        let inst = random_euclidean_instance(&mut rng, 7, 18.0);
        let full = optimize(&inst).unwrap();
        let pruned = solve_with_pruning(&inst).unwrap();
        match (full, pruned) {
            (Some(a), Some(b)) => {
                assert_valid_path(&inst, &a);
                assert_valid_path(&inst, &b);
                assert!(
                    (inst.path_score(&a) - inst.path_score(&b)).abs() < 1e-6,
                    "pruning changed the optimal score"
                );
            }
            (None, None) => {}
            (a, b) => panic!(
                "full and pruned solves disagree on feasibility: {:?} vs {:?}",
                a.is_some(),
                b.is_some()
            ),
        }
    }
}

#[test]
fn pruned_sites_satisfy_retention_bound() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let inst = random_euclidean_instance(&mut rng, 10, 12.0);
    let sub = SubInstance::new(&inst).unwrap();
    let (s, t) = (inst.source(), inst.target());
    for &i in sub.sub_indices() {
        assert!(inst.distance(s, i) + inst.distance(i, t) <= inst.max_distance());
    }
    for i in 0..inst.dimension() {
        if sub.to_reduced(i).is_none() {
            assert!(inst.distance(s, i) + inst.distance(i, t) > inst.max_distance());
        }
    }
}
