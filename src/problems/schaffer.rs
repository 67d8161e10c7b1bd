//! Schaffer function N.1.

use crate::moaha::{Evaluation, ObjectiveFunction};

/// One variable, two objectives: `f1 = x²`, `f2 = (x - 2)²`.
///
/// Pareto-optimal for `x ∈ [0, 2]`.
#[derive(Debug, Clone)]
pub struct SchafferN1 {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl SchafferN1 {
    /// Creates the problem on `[-a, a]`.
    pub fn new(a: f64) -> Self {
        let a = a.abs();
        Self {
            lower: vec![-a],
            upper: vec![a],
        }
    }
}

impl ObjectiveFunction for SchafferN1 {
    fn evaluate(&self, x: &[f64]) -> Evaluation {
        let x = x[0];
        Evaluation::new(vec![x * x, (x - 2.0) * (x - 2.0)])
    }

    fn lower_bound(&self) -> &[f64] {
        &self.lower
    }

    fn upper_bound(&self) -> &[f64] {
        &self.upper
    }

    fn num_objectives(&self) -> usize {
        2
    }
}
