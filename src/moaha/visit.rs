//! Visit table and flight-pattern direction sampling.
//!
//! `visit[i][j]` estimates how long it has been since agent `i` last used
//! agent `j` as a food source. Guided foraging prefers the neighbour with
//! the largest entry. The diagonal is never read as a target.

use rand::Rng;

use crate::random::shuffle;

/// N×N recency matrix over agent pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitTable {
    n: usize,
    cells: Vec<f64>,
}

impl VisitTable {
    /// Creates an all-zero `n × n` table.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            cells: vec![0.0; n * n],
        }
    }

    /// Number of agents (rows).
    pub fn len(&self) -> usize {
        self.n
    }

    /// True for a zero-sized table.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Entry `visit[i][j]`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.cells[i * self.n + j]
    }

    /// Sets entry `visit[i][j]`.
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.cells[i * self.n + j] = value;
    }

    /// Row `i`.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.cells[i * self.n..(i + 1) * self.n]
    }

    fn row_mut(&mut self, i: usize) -> &mut [f64] {
        &mut self.cells[i * self.n..(i + 1) * self.n]
    }

    /// Neighbours of `agent` with the largest entry in its row.
    ///
    /// Ties are all returned, in index order. Empty only when the table
    /// has a single row.
    pub fn most_overdue(&self, agent: usize) -> Vec<usize> {
        let mut best = f64::NEG_INFINITY;
        let mut targets = Vec::new();
        for (j, &v) in self.row(agent).iter().enumerate() {
            if j == agent {
                continue;
            }
            if v > best {
                best = v;
                targets.clear();
                targets.push(j);
            } else if v == best {
                targets.push(j);
            }
        }
        targets
    }

    /// Adds 1 to every entry of row `agent`.
    pub fn increment_row(&mut self, agent: usize) {
        for v in self.row_mut(agent) {
            *v += 1.0;
        }
    }

    /// Zeroes `visit[agent][target]`, then adds 1 to the whole row.
    pub fn record_visit(&mut self, agent: usize, target: usize) {
        self.set(agent, target, 0.0);
        self.increment_row(agent);
    }

    /// Maximum of each row, ignoring the diagonal.
    pub fn row_maxima(&self) -> Vec<f64> {
        (0..self.n)
            .map(|i| {
                self.row(i)
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(_, &v)| v)
                    .fold(f64::MIN, f64::max)
            })
            .collect()
    }

    /// Makes `agent` the most overdue target for every other agent.
    ///
    /// Sets `visit[i][agent] = max_j≠i visit[i][j] + 1` for all `i ≠ agent`,
    /// with the maxima taken before any write.
    pub fn propagate(&mut self, agent: usize) {
        let maxima = self.row_maxima();
        for (i, max) in maxima.into_iter().enumerate() {
            if i != agent {
                self.set(i, agent, max + 1.0);
            }
        }
    }
}

/// How a foraging step picks the dimensions it may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightPattern {
    /// A random subset of dimensions.
    Diagonal,
    /// Every dimension.
    Omnidirectional,
    /// A leading run of dimensions in natural order.
    Axial,
}

impl FlightPattern {
    /// Picks one of the three patterns with probability 1/3 each.
    pub fn sample<R: Rng>(rng: &mut R) -> Self {
        let r: f64 = rng.random();
        if r < 1.0 / 3.0 {
            FlightPattern::Diagonal
        } else if r > 2.0 / 3.0 {
            FlightPattern::Omnidirectional
        } else {
            FlightPattern::Axial
        }
    }

    /// Builds the direction mask for `dimension` decision variables.
    ///
    /// - Diagonal: the first `k` entries of a random permutation, with
    ///   `k ∈ [0, D-1)` when `D > 3`, otherwise `k ∈ [0, D)`.
    /// - Omnidirectional: all dimensions.
    /// - Axial: dimensions `0..k`, `k ∈ [0, D)`.
    pub fn direction_mask<R: Rng>(self, dimension: usize, rng: &mut R) -> Vec<bool> {
        let mut mask = vec![false; dimension];
        if dimension == 0 {
            return mask;
        }
        match self {
            FlightPattern::Diagonal => {
                let mut dims: Vec<usize> = (0..dimension).collect();
                shuffle(&mut dims, rng);
                let k = if dimension > 3 {
                    rng.random_range(0..dimension - 1)
                } else {
                    rng.random_range(0..dimension)
                };
                for &d in &dims[..k] {
                    mask[d] = true;
                }
            }
            FlightPattern::Omnidirectional => mask.fill(true),
            FlightPattern::Axial => {
                let k = rng.random_range(0..dimension);
                mask[..k].fill(true);
            }
        }
        mask
    }
}

/// Samples a flight pattern and its direction mask.
pub fn sample_direction<R: Rng>(dimension: usize, rng: &mut R) -> (FlightPattern, Vec<bool>) {
    let pattern = FlightPattern::sample(rng);
    let mask = pattern.direction_mask(dimension, rng);
    (pattern, mask)
}
