//! Core types: the objective-function contract and the agent record.
//!
//! [`ObjectiveFunction`] is the seam between the domain-agnostic optimizer
//! and a concrete problem (benchmark function, layout cost model, ...).
//! [`Agent`] is one candidate solution plus the bookkeeping the dominance
//! and archive logic writes into it.

use std::collections::BTreeMap;

use super::dominance;
use super::runner::IterationStats;

/// Output of one objective-function evaluation.
///
/// `values` holds one entry per objective (all minimized). `constraints`
/// and `penalty` are named side channels the optimizer carries along but
/// never interprets.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Evaluation {
    /// Objective values, one per objective.
    pub values: Vec<f64>,
    /// Named constraint measurements.
    pub constraints: BTreeMap<String, f64>,
    /// Named constraint-violation penalties.
    pub penalty: BTreeMap<String, f64>,
}

impl Evaluation {
    /// Creates an evaluation with objective values only.
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            ..Self::default()
        }
    }

    /// Adds a named constraint measurement.
    pub fn with_constraint(mut self, name: impl Into<String>, value: f64) -> Self {
        self.constraints.insert(name.into(), value);
        self
    }

    /// Adds a named penalty.
    pub fn with_penalty(mut self, name: impl Into<String>, value: f64) -> Self {
        self.penalty.insert(name.into(), value);
        self
    }
}

/// A multi-objective minimization problem over a bounded real vector.
///
/// # Thread Safety
///
/// `ObjectiveFunction` must be `Send + Sync`: initialization may evaluate
/// agents concurrently with rayon. [`evaluate`](Self::evaluate) must not
/// rely on shared mutable state.
///
/// # Examples
///
/// ```
/// use u_moaha::moaha::{Evaluation, ObjectiveFunction};
///
/// struct Schaffer {
///     lower: Vec<f64>,
///     upper: Vec<f64>,
/// }
///
/// impl ObjectiveFunction for Schaffer {
///     fn evaluate(&self, x: &[f64]) -> Evaluation {
///         Evaluation::new(vec![x[0] * x[0], (x[0] - 2.0).powi(2)])
///     }
///     fn lower_bound(&self) -> &[f64] { &self.lower }
///     fn upper_bound(&self) -> &[f64] { &self.upper }
///     fn num_objectives(&self) -> usize { 2 }
/// }
///
/// let p = Schaffer { lower: vec![-10.0], upper: vec![10.0] };
/// assert_eq!(p.dimension(), 1);
/// assert_eq!(p.evaluate(&[1.0]).values, vec![1.0, 1.0]);
/// ```
pub trait ObjectiveFunction: Send + Sync {
    /// Evaluates a position that lies inside the bounds.
    fn evaluate(&self, position: &[f64]) -> Evaluation;

    /// Lower bound per dimension.
    fn lower_bound(&self) -> &[f64];

    /// Upper bound per dimension.
    fn upper_bound(&self) -> &[f64];

    /// Number of decision variables.
    fn dimension(&self) -> usize {
        self.lower_bound().len()
    }

    /// Number of objectives returned by [`evaluate`](Self::evaluate).
    fn num_objectives(&self) -> usize;

    /// Whether objectives are minimized. The optimizer assumes `true`.
    fn find_min(&self) -> bool {
        true
    }

    /// Called at the end of each iteration.
    ///
    /// Useful for progress reporting. The default implementation is a no-op.
    fn on_iteration(&self, _stats: &IterationStats) {}
}

/// One candidate solution.
///
/// `index` is a stable handle: for population agents it equals the slot,
/// and domination sets refer to agents by these handles. Archive entries
/// are independent snapshots that keep the index of the agent they came
/// from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Agent {
    /// Stable identity.
    pub index: usize,
    /// Decision vector.
    pub position: Vec<f64>,
    /// Objective values (minimized).
    pub values: Vec<f64>,
    /// Named constraint measurements from the last evaluation.
    pub constraints: BTreeMap<String, f64>,
    /// Named penalties from the last evaluation.
    pub penalty: BTreeMap<String, f64>,
    /// Set by [`mark_dominated`](dominance::mark_dominated).
    pub dominated: bool,
    /// Front index from the last non-dominated sort (0 = best).
    pub rank: usize,
    /// Handles of the agents this agent dominates.
    pub domination_set: Vec<usize>,
    /// Number of agents dominating this one.
    pub dominated_count: usize,
    /// Crowding distance, set when the archive is trimmed or reported.
    pub crowding_distance: f64,
}

impl Agent {
    /// Creates an agent from a position and its evaluation.
    pub fn new(index: usize, position: Vec<f64>, evaluation: Evaluation) -> Self {
        Self {
            index,
            position,
            values: evaluation.values,
            constraints: evaluation.constraints,
            penalty: evaluation.penalty,
            dominated: false,
            rank: 0,
            domination_set: Vec::new(),
            dominated_count: 0,
            crowding_distance: 0.0,
        }
    }

    /// Returns a copy of this agent moved to `position` with fresh values.
    ///
    /// Bookkeeping fields (index, rank, ...) are carried over.
    pub fn relocated(&self, position: Vec<f64>, evaluation: Evaluation) -> Self {
        let mut agent = self.clone();
        agent.relocate(position, evaluation);
        agent
    }

    /// Moves this agent in place to `position` with fresh values.
    pub fn relocate(&mut self, position: Vec<f64>, evaluation: Evaluation) {
        self.position = position;
        self.values = evaluation.values;
        self.constraints = evaluation.constraints;
        self.penalty = evaluation.penalty;
    }

    /// Pareto dominance (minimization). See [`dominance::dominates`].
    pub fn dominates(&self, other: &Agent) -> bool {
        dominance::dominates(&self.values, &other.values)
    }
}

impl AsRef<[f64]> for Agent {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluation_builders() {
        let e = Evaluation::new(vec![1.0, 2.0])
            .with_constraint("gap", 0.5)
            .with_penalty("overlap", 3.0);
        assert_eq!(e.values, vec![1.0, 2.0]);
        assert_eq!(e.constraints.get("gap"), Some(&0.5));
        assert_eq!(e.penalty.get("overlap"), Some(&3.0));
    }

    #[test]
    fn test_relocated_keeps_bookkeeping() {
        let mut a = Agent::new(3, vec![0.0, 0.0], Evaluation::new(vec![1.0, 1.0]));
        a.rank = 2;
        a.dominated = true;
        let b = a.relocated(vec![1.0, 1.0], Evaluation::new(vec![0.5, 0.5]));
        assert_eq!(b.index, 3);
        assert_eq!(b.rank, 2);
        assert!(b.dominated);
        assert_eq!(b.position, vec![1.0, 1.0]);
        assert_eq!(b.values, vec![0.5, 0.5]);
        // Original untouched.
        assert_eq!(a.position, vec![0.0, 0.0]);
    }

    #[test]
    fn test_agent_dominates() {
        let a = Agent::new(0, vec![], Evaluation::new(vec![1.0, 2.0]));
        let c = Agent::new(1, vec![], Evaluation::new(vec![2.0, 2.0]));
        assert!(a.dominates(&c));
        assert!(!c.dominates(&a));
        assert!(!a.dominates(&a));
    }
}
