//! Random-number helpers shared by the optimizer.
//!
//! All stochastic operations in this crate take an explicit `&mut R where
//! R: Rng`, so a seeded stream from [`create_rng`] makes a run reproducible.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Creates a seeded random number generator.
///
/// # Example
///
/// ```
/// use rand::Rng;
/// use u_moaha::random::create_rng;
///
/// let mut a = create_rng(7);
/// let mut b = create_rng(7);
/// assert_eq!(a.random::<u64>(), b.random::<u64>());
/// ```
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Draws one sample from the standard normal distribution N(0, 1).
pub fn standard_normal<R: Rng>(rng: &mut R) -> f64 {
    rng.sample(StandardNormal)
}

/// Shuffles a slice in place (Fisher-Yates).
pub fn shuffle<T, R: Rng>(slice: &mut [T], rng: &mut R) {
    slice.shuffle(rng);
}

/// Samples a point uniformly inside the box `[lower, upper]`.
///
/// Each coordinate is `lower[d] + u * (upper[d] - lower[d])` with
/// `u ~ U[0, 1)`, so degenerate dimensions (`lower == upper`) are allowed.
pub fn uniform_position<R: Rng>(lower: &[f64], upper: &[f64], rng: &mut R) -> Vec<f64> {
    lower
        .iter()
        .zip(upper)
        .map(|(&lo, &hi)| lo + rng.random::<f64>() * (hi - lo))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = create_rng(42);
        let mut b = create_rng(42);
        for _ in 0..10 {
            assert_eq!(a.random::<u32>(), b.random::<u32>());
        }
    }

    #[test]
    fn test_uniform_position_in_bounds() {
        let mut rng = create_rng(1);
        let lower = [-1.0, 0.0, 5.0];
        let upper = [1.0, 0.0, 10.0];
        for _ in 0..200 {
            let p = uniform_position(&lower, &upper, &mut rng);
            assert_eq!(p.len(), 3);
            for d in 0..3 {
                assert!(p[d] >= lower[d] && p[d] <= upper[d]);
            }
            assert_eq!(p[1], 0.0);
        }
    }

    #[test]
    fn test_standard_normal_moments() {
        let mut rng = create_rng(3);
        let n = 20_000;
        let samples: Vec<f64> = (0..n).map(|_| standard_normal(&mut rng)).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        assert!(mean.abs() < 0.05, "mean = {mean}");
        assert!((var - 1.0).abs() < 0.05, "var = {var}");
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = create_rng(9);
        let mut v: Vec<usize> = (0..20).collect();
        shuffle(&mut v, &mut rng);
        let mut sorted = v.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }
}
