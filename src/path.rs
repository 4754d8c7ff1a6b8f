//! Path representation, scoring, and CSV interchange.
//!
//! A path is an ordered sequence of directed edges from the source site to
//! the target site. Scoring and length evaluation are defined against an
//! [`Instance`] so a saved path can be re-scored later.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path as FsPath;

use serde::{Deserialize, Serialize};

use crate::error::OpError;
use crate::instance::Instance;

/// A directed edge `(u, v)` with its travel distance `w`.
///
/// The weight is copied from the distance matrix at construction time, so an
/// edge stays meaningful after the reduced instance it came from is gone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectedEdge {
    /// Tail site index.
    pub u: usize,
    /// Head site index.
    pub v: usize,
    /// Travel distance from `u` to `v`.
    pub w: f64,
}

impl DirectedEdge {
    pub fn new(u: usize, v: usize, w: f64) -> Self {
        DirectedEdge { u, v, w }
    }
}

impl fmt::Display for DirectedEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.u, self.v, self.w)
    }
}

/// An ordered, non-empty sequence of directed edges where consecutive
/// endpoints match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    /// Edges in travel order.
    pub edges: Vec<DirectedEdge>,
}

impl Path {
    pub fn new(edges: Vec<DirectedEdge>) -> Self {
        Path { edges }
    }

    /// First site of the path.
    pub fn first_site(&self) -> Option<usize> {
        self.edges.first().map(|e| e.u)
    }

    /// Last site of the path.
    pub fn last_site(&self) -> Option<usize> {
        self.edges.last().map(|e| e.v)
    }

    /// Visited sites in travel order: the first tail followed by every head.
    pub fn sites(&self) -> Vec<usize> {
        let mut sites = Vec::with_capacity(self.edges.len() + 1);
        if let Some(first) = self.edges.first() {
            sites.push(first.u);
        }
        for e in &self.edges {
            sites.push(e.v);
        }
        sites
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Write the visited site sequence as a single CSV line:
    /// `u0,u1,...,uk` followed by a newline.
    pub fn write_csv<P: AsRef<FsPath>>(&self, path: P) -> Result<(), OpError> {
        let mut file = File::create(path)?;
        let mut line = String::new();
        for e in &self.edges {
            line.push_str(&e.u.to_string());
            line.push(',');
        }
        if let Some(last) = self.edges.last() {
            line.push_str(&last.v.to_string());
        }
        line.push('\n');
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Read a path from a CSV site sequence, recomputing edge weights from
    /// the given instance's distance matrix.
    pub fn read_csv<P: AsRef<FsPath>>(path: P, instance: &Instance) -> Result<Self, OpError> {
        let mut reader = BufReader::new(File::open(path)?);
        let mut line = String::new();
        reader.read_line(&mut line)?;

        let ids = line
            .trim()
            .split(',')
            .filter(|tok| !tok.is_empty())
            .map(|tok| {
                tok.trim()
                    .parse::<usize>()
                    .map_err(|_| OpError::Shape(format!("invalid site index '{}'", tok.trim())))
            })
            .collect::<Result<Vec<usize>, OpError>>()?;

        if ids.len() < 2 {
            return Err(OpError::Shape(format!(
                "path file needs at least 2 site indices, got {}",
                ids.len()
            )));
        }
        let n = instance.dimension();
        if let Some(&bad) = ids.iter().find(|&&i| i >= n) {
            return Err(OpError::IndexOutOfRange { index: bad, n });
        }

        let edges = ids
            .windows(2)
            .map(|w| DirectedEdge::new(w[0], w[1], instance.distance(w[0], w[1])))
            .collect();
        Ok(Path::new(edges))
    }
}

impl Instance {
    /// Total travel distance of a path: the sum of its edge weights.
    pub fn path_length(&self, path: &Path) -> f64 {
        path.edges.iter().map(|e| e.w).sum()
    }

    /// Total score of a path: the score of the first site plus the score of
    /// every subsequent site. Each distinct visited site counts once.
    pub fn path_score(&self, path: &Path) -> f64 {
        let mut sum = match path.edges.first() {
            Some(first) => self.score(first.u),
            None => return 0.0,
        };
        for e in &path.edges {
            sum += self.score(e.v);
        }
        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance() -> Instance {
        let dist = vec![
            vec![0.0, 2.0, 4.0, 4.0],
            vec![2.0, 0.0, 3.0, 5.0],
            vec![4.0, 3.0, 0.0, 2.0],
            vec![4.0, 5.0, 2.0, 0.0],
        ];
        Instance::new(dist, vec![1.0, 2.0, 3.0, 4.0], 0, 3, 7.0).unwrap()
    }

    fn path_0123(inst: &Instance) -> Path {
        Path::new(vec![
            DirectedEdge::new(0, 1, inst.distance(0, 1)),
            DirectedEdge::new(1, 2, inst.distance(1, 2)),
            DirectedEdge::new(2, 3, inst.distance(2, 3)),
        ])
    }

    #[test]
    fn test_sites_sequence() {
        let inst = instance();
        let path = path_0123(&inst);
        assert_eq!(path.sites(), vec![0, 1, 2, 3]);
        assert_eq!(path.first_site(), Some(0));
        assert_eq!(path.last_site(), Some(3));
    }

    #[test]
    fn test_length_and_score() {
        let inst = instance();
        let path = path_0123(&inst);
        assert_eq!(inst.path_length(&path), 7.0);
        // 1 + 2 + 3 + 4
        assert_eq!(inst.path_score(&path), 10.0);
    }

    #[test]
    fn test_csv_round_trip() {
        let inst = instance();
        let path = path_0123(&inst);

        let file = std::env::temp_dir().join("op_solver_path_round_trip.csv");
        path.write_csv(&file).unwrap();
        let text = std::fs::read_to_string(&file).unwrap();
        assert_eq!(text, "0,1,2,3\n");

        let back = Path::read_csv(&file, &inst).unwrap();
        assert_eq!(back, path);
        std::fs::remove_file(&file).ok();
    }

    #[test]
    fn test_read_rejects_out_of_range_site() {
        let inst = instance();
        let file = std::env::temp_dir().join("op_solver_path_bad_site.csv");
        std::fs::write(&file, "0,9,3\n").unwrap();
        let err = Path::read_csv(&file, &inst).unwrap_err();
        assert!(matches!(err, OpError::IndexOutOfRange { index: 9, n: 4 }));
        std::fs::remove_file(&file).ok();
    }
}
