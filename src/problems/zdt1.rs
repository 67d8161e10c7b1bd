//! ZDT1 (Zitzler, Deb & Thiele, 2000).

use crate::moaha::{Evaluation, ObjectiveFunction};

/// ZDT1 with `n` decision variables in `[0, 1]`.
///
/// ```text
/// f1(x) = x0
/// g(x)  = 1 + 9 * Σ x[1..] / (n - 1)
/// f2(x) = g * (1 - sqrt(f1 / g))
/// ```
///
/// The Pareto-optimal front is `f2 = 1 - sqrt(f1)`, reached when
/// `x[1..]` are all zero (`g = 1`).
#[derive(Debug, Clone)]
pub struct Zdt1 {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl Zdt1 {
    /// Creates ZDT1 over `n` variables; `n` is raised to 2 if smaller.
    pub fn new(n: usize) -> Self {
        let n = n.max(2);
        Self {
            lower: vec![0.0; n],
            upper: vec![1.0; n],
        }
    }

    /// Distance function `g`; equals 1 exactly on the Pareto-optimal front.
    pub fn g(x: &[f64]) -> f64 {
        let tail = &x[1..];
        1.0 + 9.0 * tail.iter().sum::<f64>() / tail.len() as f64
    }
}

impl ObjectiveFunction for Zdt1 {
    fn evaluate(&self, x: &[f64]) -> Evaluation {
        let f1 = x[0];
        let g = Self::g(x);
        let f2 = g * (1.0 - (f1 / g).sqrt());
        Evaluation::new(vec![f1, f2])
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
