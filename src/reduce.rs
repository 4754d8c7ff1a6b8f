//! Reachability pruning: projecting an instance onto candidate sites.
//!
//! A site `i` can only lie on a feasible source-target path of length at most
//! `D` when `dist[source][i] + dist[i][target] <= D`, assuming the triangle
//! inequality. The [`SubInstance`] keeps exactly those sites, maintains the
//! bijection between original and reduced indices, and re-expands a path
//! solved on the reduced instance back to original indices.
//!
//! Without the triangle inequality the pruned set can miss sites of an
//! optimal path, so pruning is exposed as an opt-in preprocessing step.

use log::{debug, info};

use crate::error::OpError;
use crate::instance::Instance;
use crate::path::{DirectedEdge, Path};

/// Projection of an instance onto the sites reachable within the budget.
#[derive(Debug, Clone)]
pub struct SubInstance {
    /// Original indices retained after pruning, in ascending order.
    sub_indices: Vec<usize>,
    /// Inverse lookup: `index_map[original] = Some(reduced)`, `None` for
    /// dropped sites.
    index_map: Vec<Option<usize>>,
    /// Projected instance over the reduced index space.
    reduced: Instance,
}

impl SubInstance {
    /// Prune the instance to the sites geometrically capable of lying on a
    /// feasible source-target path.
    ///
    /// Fails with [`OpError::InfeasibleBudget`] when even the direct
    /// source-target distance exceeds the budget. The source and target are
    /// always retained: both satisfy the retention test by construction
    /// (`dist[s][s] = 0` and `dist[t][t] = 0`).
    pub fn new(instance: &Instance) -> Result<Self, OpError> {
        let source = instance.source();
        let target = instance.target();
        let d_max = instance.max_distance();
        let direct = instance.distance(source, target);
        if direct > d_max {
            return Err(OpError::InfeasibleBudget {
                dist: direct,
                max: d_max,
            });
        }

        let n = instance.dimension();
        let sub_indices: Vec<usize> = (0..n)
            .filter(|&i| instance.distance(source, i) + instance.distance(i, target) <= d_max)
            .collect();

        let mut index_map = vec![None; n];
        for (k, &i) in sub_indices.iter().enumerate() {
            index_map[i] = Some(k);
        }

        info!(
            "pruning kept {} of {} sites within budget {}",
            sub_indices.len(),
            n,
            d_max
        );
        debug!("retained original indices: {:?}", sub_indices);

        let reduced_distances: Vec<Vec<f64>> = sub_indices
            .iter()
            .map(|&i| {
                sub_indices
                    .iter()
                    .map(|&j| instance.distance(i, j))
                    .collect()
            })
            .collect();
        let reduced_scores: Vec<f64> = sub_indices.iter().map(|&i| instance.score(i)).collect();

        // source and target pass the retention test, so the lookups hold
        let reduced_source = index_map[source].ok_or(OpError::Infeasible)?;
        let reduced_target = index_map[target].ok_or(OpError::Infeasible)?;

        let reduced = Instance::new(
            reduced_distances,
            reduced_scores,
            reduced_source,
            reduced_target,
            d_max,
        )?;

        Ok(SubInstance {
            sub_indices,
            index_map,
            reduced,
        })
    }

    /// The projected instance over the reduced index space.
    pub fn reduced(&self) -> &Instance {
        &self.reduced
    }

    /// Original indices retained after pruning.
    pub fn sub_indices(&self) -> &[usize] {
        &self.sub_indices
    }

    /// Map an original site index to its reduced index, if retained.
    #[inline]
    pub fn to_reduced(&self, original: usize) -> Option<usize> {
        self.index_map[original]
    }

    /// Map a reduced site index back to its original index.
    #[inline]
    pub fn to_original(&self, reduced: usize) -> usize {
        self.sub_indices[reduced]
    }

    /// Rewrite a path over reduced indices as a path over original indices,
    /// preserving edge order and weights.
    pub fn expand(&self, path: &Path) -> Path {
        Path::new(
            path.edges
                .iter()
                .map(|e| DirectedEdge::new(self.to_original(e.u), self.to_original(e.v), e.w))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(d_max: f64) -> Instance {
        let dist = vec![
            vec![0.0, 2.0, 4.0, 4.0],
            vec![2.0, 0.0, 3.0, 5.0],
            vec![4.0, 3.0, 0.0, 2.0],
            vec![4.0, 5.0, 2.0, 0.0],
        ];
        Instance::new(dist, vec![1.0; 4], 0, 3, d_max).unwrap()
    }

    #[test]
    fn test_budget_below_direct_distance_is_infeasible() {
        let err = SubInstance::new(&instance(3.0)).unwrap_err();
        assert!(matches!(
            err,
            OpError::InfeasibleBudget { dist, max } if dist == 4.0 && max == 3.0
        ));
    }

    #[test]
    fn test_all_sites_retained_under_loose_budget() {
        let sub = SubInstance::new(&instance(7.0)).unwrap();
        assert_eq!(sub.sub_indices(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_unreachable_site_dropped() {
        // dist[0][1] + dist[1][3] = 7 > 6, so site 1 cannot be on any path
        let sub = SubInstance::new(&instance(6.0)).unwrap();
        assert_eq!(sub.sub_indices(), &[0, 2, 3]);
        assert_eq!(sub.to_reduced(1), None);
        assert_eq!(sub.to_reduced(2), Some(1));
        assert_eq!(sub.to_original(2), 3);
    }

    #[test]
    fn test_index_map_is_inverse_of_sub_indices() {
        let sub = SubInstance::new(&instance(6.0)).unwrap();
        for (k, &i) in sub.sub_indices().iter().enumerate() {
            assert_eq!(sub.to_reduced(i), Some(k));
            assert_eq!(sub.to_original(k), i);
        }
    }

    #[test]
    fn test_reduced_projection() {
        let sub = SubInstance::new(&instance(6.0)).unwrap();
        let red = sub.reduced();
        assert_eq!(red.dimension(), 3);
        assert_eq!(red.source(), 0);
        assert_eq!(red.target(), 2);
        // rows/cols for original sites 0, 2, 3
        assert_eq!(red.distance(0, 1), 4.0);
        assert_eq!(red.distance(1, 2), 2.0);
        assert_eq!(red.distance(0, 2), 4.0);
    }

    #[test]
    fn test_expand_maps_back_to_original_indices() {
        let sub = SubInstance::new(&instance(6.0)).unwrap();
        let reduced_path = Path::new(vec![
            DirectedEdge::new(0, 1, 4.0),
            DirectedEdge::new(1, 2, 2.0),
        ]);
        let expanded = sub.expand(&reduced_path);
        assert_eq!(expanded.sites(), vec![0, 2, 3]);
        assert_eq!(expanded.edges[0].w, 4.0);
        assert_eq!(expanded.edges[1].w, 2.0);
    }
}
