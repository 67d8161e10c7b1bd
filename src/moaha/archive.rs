//! Bounded archive of non-dominated solutions.
//!
//! The archive is an external memory independent of the live population:
//! every entry is a snapshot copy. It is rebuilt each iteration by
//! [`Archive::update`] and trimmed back to capacity with [`decd`].

use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::debug;

use super::crowding::{crowding_distances, decd};
use super::dominance::{extract_non_dominated, mark_dominated};
use super::types::Agent;

/// Capacity-bounded set of mutually non-dominated agent snapshots.
#[derive(Debug, Clone)]
pub struct Archive {
    capacity: usize,
    members: Vec<Agent>,
}

impl Archive {
    /// Creates an empty archive.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            members: Vec::with_capacity(capacity),
        }
    }

    /// Seeds an archive with the non-dominated agents of `population`.
    pub fn from_population(capacity: usize, population: &[Agent]) -> Self {
        let mut snapshot = population.to_vec();
        mark_dominated(&mut snapshot);
        let mut archive = Self {
            capacity,
            members: extract_non_dominated(&snapshot),
        };
        archive.trim();
        archive
    }

    /// Merges this iteration's population and runners-up into the archive.
    ///
    /// 1. population ∪ runners-up → non-dominated subset
    /// 2. that subset ∪ archive → non-dominated subset = new archive
    /// 3. trim to capacity by crowding distance
    pub fn update(&mut self, population: &[Agent], runners_up: &[Agent]) {
        let mut merged: Vec<Agent> = population.iter().chain(runners_up).cloned().collect();
        mark_dominated(&mut merged);
        let mut candidates = extract_non_dominated(&merged);

        candidates.append(&mut self.members);
        mark_dominated(&mut candidates);
        self.members = extract_non_dominated(&candidates);

        self.trim();
    }

    /// Evicts the most crowded members until `len() <= capacity()`.
    pub fn trim(&mut self) {
        if self.members.len() > self.capacity {
            let excess = self.members.len() - self.capacity;
            debug!(size = self.members.len(), excess, "trimming archive");
            self.members = decd(std::mem::take(&mut self.members), excess);
        }
    }

    /// Picks a member uniformly at random.
    pub fn choose<R: Rng>(&self, rng: &mut R) -> Option<&Agent> {
        self.members.choose(rng)
    }

    /// Recomputes `crowding_distance` on every member.
    pub fn assign_crowding_distances(&mut self) {
        let values: Vec<Vec<f64>> = self.members.iter().map(|a| a.values.clone()).collect();
        for (agent, d) in self.members.iter_mut().zip(crowding_distances(&values)) {
            agent.crowding_distance = d;
        }
    }

    /// Maximum number of members kept after a trim.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current members.
    pub fn members(&self) -> &[Agent] {
        &self.members
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True when the archive holds no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Smallest value of objective `obj` among the members.
    pub fn best_value(&self, obj: usize) -> Option<f64> {
        self.members
            .iter()
            .filter_map(|a| a.values.get(obj).copied())
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Consumes the archive, returning its members.
    pub fn into_members(self) -> Vec<Agent> {
        self.members
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moaha::dominance::dominates;
    use crate::moaha::Evaluation;
    use crate::random::create_rng;
    use proptest::prelude::*;

    fn agent(index: usize, values: &[f64]) -> Agent {
        Agent::new(index, vec![index as f64], Evaluation::new(values.to_vec()))
    }

    #[test]
    fn test_from_population_keeps_front() {
        let pop = vec![agent(0, &[1.0, 2.0]), agent(1, &[2.0, 1.0]), agent(2, &[2.0, 2.0])];
        let archive = Archive::from_population(10, &pop);
        let idx: Vec<usize> = archive.members().iter().map(|a| a.index).collect();
        assert_eq!(idx, vec![0, 1]);
        // Population itself untouched.
        assert!(pop.iter().all(|a| !a.dominated));
    }

    #[test]
    fn test_update_admits_runner_up() {
        let pop = vec![agent(0, &[3.0, 3.0]), agent(1, &[4.0, 1.0])];
        let mut archive = Archive::from_population(10, &pop);
        let runners_up = vec![agent(0, &[1.0, 4.0])];
        archive.update(&pop, &runners_up);
        assert_eq!(archive.len(), 3);
    }

    #[test]
    fn test_update_drops_dominated_members() {
        let pop = vec![agent(0, &[5.0, 5.0]), agent(1, &[6.0, 4.0])];
        let mut archive = Archive::from_population(10, &pop);
        assert_eq!(archive.len(), 2);

        let improved = vec![agent(0, &[1.0, 1.0]), agent(1, &[6.0, 4.0])];
        archive.update(&improved, &[]);
        let values: Vec<Vec<f64>> = archive.members().iter().map(|a| a.values.clone()).collect();
        assert_eq!(values, vec![vec![1.0, 1.0]]);
    }

    #[test]
    fn test_duplicate_values_collapse_to_one() {
        let pop = vec![agent(0, &[1.0, 2.0]), agent(1, &[2.0, 1.0])];
        let mut archive = Archive::from_population(10, &pop);
        archive.update(&pop, &[]);
        archive.update(&pop, &[]);
        assert_eq!(archive.len(), 2);
    }

    #[test]
    fn test_trim_respects_capacity() {
        let pop: Vec<Agent> = (0..20)
            .map(|i| agent(i, &[i as f64, 19.0 - i as f64]))
            .collect();
        let archive = Archive::from_population(5, &pop);
        assert_eq!(archive.len(), 5);
        let idx: Vec<usize> = archive.members().iter().map(|a| a.index).collect();
        assert!(idx.contains(&0));
        assert!(idx.contains(&19));
    }

    #[test]
    fn test_snapshots_do_not_alias_population() {
        let mut pop = vec![agent(0, &[1.0, 2.0]), agent(1, &[2.0, 1.0])];
        let archive = Archive::from_population(10, &pop);
        pop[0].position[0] = 42.0;
        pop[0].values[0] = -1.0;
        assert_eq!(archive.members()[0].position, vec![0.0]);
        assert_eq!(archive.members()[0].values, vec![1.0, 2.0]);
    }

    #[test]
    fn test_choose_and_best_value() {
        let pop = vec![agent(0, &[1.0, 4.0]), agent(1, &[3.0, 2.0])];
        let archive = Archive::from_population(10, &pop);
        let mut rng = create_rng(5);
        for _ in 0..10 {
            assert!(archive.choose(&mut rng).is_some());
        }
        assert_eq!(archive.best_value(0), Some(1.0));
        assert_eq!(archive.best_value(1), Some(2.0));
        assert!(Archive::new(3).choose(&mut rng).is_none());
    }

    proptest! {
        #[test]
        fn prop_update_bounded_and_non_dominated(
            rounds in prop::collection::vec(
                prop::collection::vec((0u8..20, 0u8..20), 1..12),
                1..6,
            ),
            capacity in 1usize..8,
        ) {
            let mut archive = Archive::new(capacity);
            for round in rounds {
                let pop: Vec<Agent> = round
                    .iter()
                    .enumerate()
                    .map(|(i, &(a, b))| agent(i, &[f64::from(a), f64::from(b)]))
                    .collect();
                archive.update(&pop, &[]);
                prop_assert!(archive.len() <= capacity);
                prop_assert!(!archive.is_empty());
                for a in archive.members() {
                    for b in archive.members() {
                        prop_assert!(!dominates(&a.values, &b.values));
                    }
                }
            }
        }
    }
}
