//! Pareto dominance, dominated-flag marking, and layered non-dominated sort.
//!
//! All objectives are **minimized**: lower values are better.
//!
//! # Algorithms
//!
//! - [`dominates`]: pairwise Pareto dominance with early exit
//! - [`mark_dominated`]: O(n²) flagging used by archive maintenance
//! - [`non_dominated_sort`]: fast non-dominated sorting (Deb et al., 2002)
//! - [`extract_non_dominated`]: deep copies of the unflagged agents
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"
//! - IEEE Transactions on Evolutionary Computation, 6(2), 182-197

use super::types::Agent;

/// Returns `true` if `a` Pareto-dominates `b` (minimization).
///
/// `a` dominates `b` iff `a[i] <= b[i]` for every objective and
/// `a[i] < b[i]` for at least one. Returns `false` as soon as some
/// `a[i] > b[i]`. Identical vectors do not dominate each other.
///
/// # Example
///
/// ```
/// use u_moaha::moaha::dominates;
///
/// assert!(dominates(&[1.0, 2.0], &[2.0, 2.0]));
/// assert!(!dominates(&[1.0, 2.0], &[2.0, 1.0]));
/// assert!(!dominates(&[1.0, 2.0], &[1.0, 2.0]));
/// ```
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    let mut strictly_better = false;
    for (&va, &vb) in a.iter().zip(b) {
        if va > vb {
            return false;
        }
        if va < vb {
            strictly_better = true;
        }
    }
    strictly_better
}

/// Computes the dominated flag for every objective vector.
///
/// For each pair `(i, j)` with `i < j`:
/// - `i` dominates `j` → `j` is flagged;
/// - `j` dominates `i` → `i` is flagged and `i` stops comparing;
/// - all values exactly equal → only `i` is flagged.
///
/// The equal-value rule is asymmetric: of a group of identical vectors
/// only the last one survives unflagged.
pub fn dominated_mask<T: AsRef<[f64]>>(objectives: &[T]) -> Vec<bool> {
    let n = objectives.len();
    let mut dominated = vec![false; n];

    for i in 0..n {
        let a = objectives[i].as_ref();
        for b_idx in (i + 1)..n {
            let b = objectives[b_idx].as_ref();
            if dominates(a, b) {
                dominated[b_idx] = true;
            } else if dominates(b, a) {
                dominated[i] = true;
                break;
            } else if a == b {
                dominated[i] = true;
            }
        }
    }

    dominated
}

/// Clears and recomputes `dominated` on every agent.
///
/// See [`dominated_mask`] for the exact pairwise rules.
pub fn mark_dominated(agents: &mut [Agent]) {
    let mask = dominated_mask(agents);
    for (agent, flag) in agents.iter_mut().zip(mask) {
        agent.dominated = flag;
    }
}

/// Returns deep copies of the agents whose `dominated` flag is false,
/// in input order.
pub fn extract_non_dominated(agents: &[Agent]) -> Vec<Agent> {
    agents.iter().filter(|a| !a.dominated).cloned().collect()
}

/// Ordered Pareto fronts produced by [`non_dominated_sort`].
///
/// `fronts[0]` is the globally non-dominated set. Entries are slot
/// positions in the sorted slice (equal to `Agent::index` for a
/// population).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParetoFronts {
    fronts: Vec<Vec<usize>>,
    ranks: Vec<usize>,
}

impl ParetoFronts {
    /// All fronts, best first.
    pub fn fronts(&self) -> &[Vec<usize>] {
        &self.fronts
    }

    /// Front `k`, if it exists.
    pub fn front(&self, k: usize) -> Option<&[usize]> {
        self.fronts.get(k).map(Vec::as_slice)
    }

    /// The front containing slot `idx`.
    pub fn front_of(&self, idx: usize) -> Option<&[usize]> {
        self.ranks.get(idx).and_then(|&r| self.front(r))
    }

    /// Rank of slot `idx`.
    pub fn rank_of(&self, idx: usize) -> Option<usize> {
        self.ranks.get(idx).copied()
    }

    /// The last (worst) front; empty when nothing was sorted.
    pub fn worst(&self) -> &[usize] {
        self.fronts.last().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of fronts.
    pub fn len(&self) -> usize {
        self.fronts.len()
    }

    /// True when nothing was sorted.
    pub fn is_empty(&self) -> bool {
        self.fronts.is_empty()
    }
}

/// Fast non-dominated sorting.
///
/// Clears and recomputes `domination_set`, `dominated_count` and `rank`
/// on every agent, and returns the fronts as lists of slot positions.
///
/// # Algorithm (Deb et al., 2002)
///
/// 1. For each pair of agents, determine dominance and record it
/// 2. Agents dominated by no other form front 0
/// 3. Peel: every member of front k decrements the counts of the agents
///    it dominates; those reaching zero form front k+1
///
/// `dominated_count` keeps the full count after the call; peeling works
/// on a scratch copy.
///
/// # Complexity
///
/// O(m * n²) where m = number of objectives, n = number of agents
///
/// # Example
///
/// ```
/// use u_moaha::moaha::{non_dominated_sort, Agent, Evaluation};
///
/// let mut agents: Vec<Agent> = [[1.0, 5.0], [3.0, 3.0], [5.0, 1.0], [4.0, 4.0]]
///     .iter()
///     .enumerate()
///     .map(|(i, v)| Agent::new(i, vec![], Evaluation::new(v.to_vec())))
///     .collect();
///
/// let fronts = non_dominated_sort(&mut agents);
///
/// assert_eq!(fronts.fronts(), &[vec![0, 1, 2], vec![3]]);
/// assert_eq!(agents[3].rank, 1); // dominated by (3, 3)
/// ```
pub fn non_dominated_sort(agents: &mut [Agent]) -> ParetoFronts {
    let n = agents.len();
    for agent in agents.iter_mut() {
        agent.domination_set.clear();
        agent.dominated_count = 0;
    }
    if n == 0 {
        return ParetoFronts::default();
    }

    let mut front_0 = Vec::new();

    for i in 0..n {
        for j in (i + 1)..n {
            if dominates(&agents[i].values, &agents[j].values) {
                agents[i].domination_set.push(j);
                agents[j].dominated_count += 1;
            } else if dominates(&agents[j].values, &agents[i].values) {
                agents[j].domination_set.push(i);
                agents[i].dominated_count += 1;
            }
        }

        // Pairs (k, i) with k < i were handled in earlier rounds, so the
        // count for i is final here.
        if agents[i].dominated_count == 0 {
            agents[i].rank = 0;
            front_0.push(i);
        }
    }

    let mut remaining: Vec<usize> = agents.iter().map(|a| a.dominated_count).collect();
    let mut fronts = vec![front_0];
    loop {
        let current = &fronts[fronts.len() - 1];
        let mut next_front = Vec::new();

        for &p in current {
            for &q in &agents[p].domination_set {
                remaining[q] -= 1;
                if remaining[q] == 0 {
                    next_front.push(q);
                }
            }
        }

        if next_front.is_empty() {
            break;
        }
        let rank = fronts.len();
        for &q in &next_front {
            agents[q].rank = rank;
        }
        fronts.push(next_front);
    }

    let ranks = agents.iter().map(|a| a.rank).collect();
    ParetoFronts { fronts, ranks }
}

// ============================================================================
// Tests
// ============================================================================
