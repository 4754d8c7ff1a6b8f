//! Module for parsing and representing OP instances.
//!
//! An instance is a complete directed graph over `n` sites given by an
//! `n x n` distance matrix, a per-site score vector, a source site, a target
//! site, and a travel budget. Distances need not be symmetric and need not
//! satisfy the triangle inequality.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path as FsPath;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::OpError;

/// A complete Orienteering Problem instance.
///
/// Immutable after construction: [`Instance::new`] validates the shapes of
/// the distance matrix and score vector and the ranges of the terminal
/// indices, so every accessor can assume a well-formed instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    /// Number of sites.
    dimension: usize,
    /// Pairwise travel distances, `distances[i][j] >= 0`.
    distances: Vec<Vec<f64>>,
    /// Score collected when site `i` is visited.
    scores: Vec<f64>,
    /// Source site index.
    source: usize,
    /// Target site index.
    target: usize,
    /// Maximum total travel distance.
    max_distance: f64,
}

impl Instance {
    /// Build a validated instance.
    ///
    /// Fails with [`OpError::Shape`] when the matrix is not square, scores
    /// have the wrong length, any distance or score is negative, or a
    /// diagonal entry is nonzero; with [`OpError::IndexOutOfRange`] when
    /// `source` or `target` is not in `[0, n)`.
    pub fn new(
        distances: Vec<Vec<f64>>,
        scores: Vec<f64>,
        source: usize,
        target: usize,
        max_distance: f64,
    ) -> Result<Self, OpError> {
        let n = distances.len();
        if n < 2 {
            return Err(OpError::Shape(format!(
                "instance needs at least 2 sites, got {}",
                n
            )));
        }
        for (i, row) in distances.iter().enumerate() {
            if row.len() != n {
                return Err(OpError::Shape(format!(
                    "distance matrix row {} has {} entries, expected {}",
                    i,
                    row.len(),
                    n
                )));
            }
            for (j, &d) in row.iter().enumerate() {
                if !d.is_finite() || d < 0.0 {
                    return Err(OpError::Shape(format!(
                        "distance[{}][{}] = {} is not a finite non-negative number",
                        i, j, d
                    )));
                }
            }
            if row[i] != 0.0 {
                return Err(OpError::Shape(format!(
                    "distance[{i}][{i}] must be 0, got {}",
                    row[i]
                )));
            }
        }
        if scores.len() != n {
            return Err(OpError::Shape(format!(
                "score vector has {} entries, expected {}",
                scores.len(),
                n
            )));
        }
        for (i, &s) in scores.iter().enumerate() {
            if !s.is_finite() || s < 0.0 {
                return Err(OpError::Shape(format!(
                    "score[{}] = {} is not a finite non-negative number",
                    i, s
                )));
            }
        }
        if source >= n {
            return Err(OpError::IndexOutOfRange { index: source, n });
        }
        if target >= n {
            return Err(OpError::IndexOutOfRange { index: target, n });
        }
        if !max_distance.is_finite() || max_distance < 0.0 {
            return Err(OpError::Shape(format!(
                "maximum distance {} is not a finite non-negative number",
                max_distance
            )));
        }

        Ok(Instance {
            dimension: n,
            distances,
            scores,
            source,
            target,
            max_distance,
        })
    }

    /// Load distances and scores from CSV files and build an instance.
    pub fn from_files<P: AsRef<FsPath>>(
        distances_file: P,
        scores_file: P,
        source: usize,
        target: usize,
        max_distance: f64,
    ) -> Result<Self, OpError> {
        let distances = read_distances(distances_file)?;
        let scores = read_scores(scores_file)?;
        let instance = Instance::new(distances, scores, source, target, max_distance)?;
        info!(
            "loaded instance with {} sites, source {}, target {}, budget {}",
            instance.dimension, instance.source, instance.target, instance.max_distance
        );
        Ok(instance)
    }

    /// Number of sites.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Travel distance from site `i` to site `j`.
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.distances[i][j]
    }

    /// Score of site `i`.
    #[inline]
    pub fn score(&self, i: usize) -> f64 {
        self.scores[i]
    }

    /// Source site index.
    #[inline]
    pub fn source(&self) -> usize {
        self.source
    }

    /// Target site index.
    #[inline]
    pub fn target(&self) -> usize {
        self.target
    }

    /// Maximum allowed total travel distance.
    #[inline]
    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    /// Full distance matrix.
    #[inline]
    pub fn distances(&self) -> &[Vec<f64>] {
        &self.distances
    }

    /// Full score vector.
    #[inline]
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }
}

/// Split a CSV line into numeric tokens. Both spaces and commas separate
/// tokens, matching the instance files in the wild.
fn parse_tokens(line: &str, what: &str, lineno: usize) -> Result<Vec<f64>, OpError> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|tok| !tok.is_empty())
        .map(|tok| {
            tok.parse::<f64>().map_err(|_| {
                OpError::Shape(format!(
                    "invalid {} token '{}' on line {}",
                    what, tok, lineno
                ))
            })
        })
        .collect()
}

/// Parse an `n x n` distance matrix: one line per site, `n` tokens per line.
pub fn parse_distances(text: &str) -> Result<Vec<Vec<f64>>, OpError> {
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        rows.push(parse_tokens(line, "distance", i + 1)?);
    }
    if rows.is_empty() {
        return Err(OpError::Shape("distance matrix file is empty".to_string()));
    }
    Ok(rows)
}

/// Parse a score vector: a single line of `n` tokens.
pub fn parse_scores(text: &str) -> Result<Vec<f64>, OpError> {
    let line = text
        .lines()
        .find(|l| !l.trim().is_empty())
        .ok_or_else(|| OpError::Shape("score vector file is empty".to_string()))?;
    parse_tokens(line, "score", 1)
}

/// Read a distance matrix from a CSV file.
pub fn read_distances<P: AsRef<FsPath>>(path: P) -> Result<Vec<Vec<f64>>, OpError> {
    let mut text = String::new();
    let reader = BufReader::new(File::open(path)?);
    for line in reader.lines() {
        text.push_str(&line?);
        text.push('\n');
    }
    parse_distances(&text)
}

/// Read a score vector from a CSV file.
pub fn read_scores<P: AsRef<FsPath>>(path: P) -> Result<Vec<f64>, OpError> {
    let mut text = String::new();
    let reader = BufReader::new(File::open(path)?);
    for line in reader.lines() {
        text.push_str(&line?);
        text.push('\n');
    }
    parse_scores(&text)
}
