//! Population initialization.
//!
//! Positions are always sampled sequentially from the run's random stream;
//! only objective evaluation is fanned out, so the starting population
//! depends on the seed alone.

use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::dominance::non_dominated_sort;
use super::types::{Agent, Evaluation, ObjectiveFunction};
use crate::random::uniform_position;

/// Samples `n` uniform positions inside the problem bounds.
pub fn random_positions<P: ObjectiveFunction, R: Rng>(
    problem: &P,
    n: usize,
    rng: &mut R,
) -> Vec<Vec<f64>> {
    (0..n)
        .map(|_| uniform_position(problem.lower_bound(), problem.upper_bound(), rng))
        .collect()
}

/// Opposite point `lb + ub - x`.
pub fn opposite(x: &[f64], lower: &[f64], upper: &[f64]) -> Vec<f64> {
    x.iter()
        .zip(lower)
        .zip(upper)
        .map(|((&x, &lo), &hi)| lo + hi - x)
        .collect()
}

/// Quasi-reflected point: uniform between `x` and the box midpoint.
pub fn quasi_reflected<R: Rng>(x: &[f64], lower: &[f64], upper: &[f64], rng: &mut R) -> Vec<f64> {
    x.iter()
        .zip(lower)
        .zip(upper)
        .map(|((&x, &lo), &hi)| {
            let mid = (lo + hi) / 2.0;
            let r: f64 = rng.random();
            if x < mid {
                x + (mid - x) * r
            } else {
                mid + (x - mid) * r
            }
        })
        .collect()
}

/// Quasi-opposite point: uniform between the box midpoint and the
/// opposite point.
pub fn quasi_opposite<R: Rng>(x: &[f64], lower: &[f64], upper: &[f64], rng: &mut R) -> Vec<f64> {
    x.iter()
        .zip(lower)
        .zip(upper)
        .map(|((&x, &lo), &hi)| {
            let mid = (lo + hi) / 2.0;
            let opp = lo + hi - x;
            let r: f64 = rng.random();
            if x < mid {
                mid + (opp - mid) * r
            } else {
                mid - (mid - opp) * r
            }
        })
        .collect()
}

/// Evaluates every position, in parallel when enabled.
pub fn evaluate_positions<P: ObjectiveFunction>(
    problem: &P,
    positions: &[Vec<f64>],
    parallel: bool,
) -> Vec<Evaluation> {
    #[cfg(feature = "parallel")]
    if parallel {
        return positions.par_iter().map(|x| problem.evaluate(x)).collect();
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    positions.iter().map(|x| problem.evaluate(x)).collect()
}

fn into_agents(positions: Vec<Vec<f64>>, evaluations: Vec<Evaluation>) -> Vec<Agent> {
    positions
        .into_iter()
        .zip(evaluations)
        .enumerate()
        .map(|(i, (x, e))| Agent::new(i, x, e))
        .collect()
}

/// Builds `n` agents at uniform random positions.
pub fn random_population<P: ObjectiveFunction, R: Rng>(
    problem: &P,
    n: usize,
    parallel: bool,
    rng: &mut R,
) -> Vec<Agent> {
    let positions = random_positions(problem, n, rng);
    let evaluations = evaluate_positions(problem, &positions, parallel);
    into_agents(positions, evaluations)
}

/// Builds `n` agents by opposition-based learning.
///
/// Starts from `n` uniform points and adds their opposite, quasi-reflected,
/// and quasi-opposite companions. All `4n` points are evaluated and sorted
/// into fronts; the first `n` in front order survive and are re-indexed
/// `0..n`.
pub fn opposition_population<P: ObjectiveFunction, R: Rng>(
    problem: &P,
    n: usize,
    parallel: bool,
    rng: &mut R,
) -> Vec<Agent> {
    let (lower, upper) = (problem.lower_bound(), problem.upper_bound());
    let base = random_positions(problem, n, rng);

    let mut positions = Vec::with_capacity(4 * n);
    positions.extend(base.iter().map(|x| opposite(x, lower, upper)));
    positions.extend(base.iter().map(|x| quasi_reflected(x, lower, upper, rng)));
    positions.extend(base.iter().map(|x| quasi_opposite(x, lower, upper, rng)));
    positions.splice(0..0, base);

    let evaluations = evaluate_positions(problem, &positions, parallel);
    let mut pool = into_agents(positions, evaluations);
    let fronts = non_dominated_sort(&mut pool);

    let keep: Vec<usize> = fronts.fronts().iter().flatten().take(n).copied().collect();
    keep.into_iter()
        .enumerate()
        .map(|(i, slot)| {
            let mut agent = pool[slot].clone();
            agent.index = i;
            agent.domination_set.clear();
            agent.dominated_count = 0;
            agent
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moaha::dominance::dominates;
    use crate::problems::{SchafferN1, Zdt1};
    use crate::random::create_rng;

    #[test]
    fn test_opposite() {
        assert_eq!(opposite(&[0.2, 3.0], &[0.0, 0.0], &[1.0, 4.0]), vec![0.8, 1.0]);
    }

    #[test]
    fn test_quasi_points_stay_between() {
        let mut rng = create_rng(3);
        let (lo, hi) = ([-4.0], [6.0]);
        for _ in 0..500 {
            let x = rng.random_range(-4.0..6.0);
            let mid = 1.0;
            let opp = 2.0 - x;

            let qr = quasi_reflected(&[x], &lo, &hi, &mut rng)[0];
            assert!(qr >= x.min(mid) && qr <= x.max(mid));

            let qo = quasi_opposite(&[x], &lo, &hi, &mut rng)[0];
            assert!(qo >= opp.min(mid) - 1e-12 && qo <= opp.max(mid) + 1e-12);
        }
    }

    #[test]
    fn test_random_population_indices_and_bounds() {
        let problem = Zdt1::new(5);
        let mut rng = create_rng(1);
        let agents = random_population(&problem, 12, false, &mut rng);
        assert_eq!(agents.len(), 12);
        for (i, a) in agents.iter().enumerate() {
            assert_eq!(a.index, i);
            assert_eq!(a.values.len(), 2);
            assert!(a.position.iter().all(|&x| (0.0..=1.0).contains(&x)));
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let problem = Zdt1::new(8);
        let seq = random_population(&problem, 20, false, &mut create_rng(9));
        let par = random_population(&problem, 20, true, &mut create_rng(9));
        for (a, b) in seq.iter().zip(&par) {
            assert_eq!(a.position, b.position);
            assert_eq!(a.values, b.values);
        }
    }

    #[test]
    fn test_opposition_population_keeps_best_fronts() {
        let problem = SchafferN1::new(10.0);
        let mut rng = create_rng(5);
        let agents = opposition_population(&problem, 10, false, &mut rng);
        assert_eq!(agents.len(), 10);
        for (i, a) in agents.iter().enumerate() {
            assert_eq!(a.index, i);
            assert!(a.position[0] >= -10.0 && a.position[0] <= 10.0);
        }
        // Survivors come in front order, so a later survivor never
        // dominates an earlier one.
        for i in 0..agents.len() {
            for j in (i + 1)..agents.len() {
                assert!(!dominates(&agents[j].values, &agents[i].values));
            }
        }
    }
}
