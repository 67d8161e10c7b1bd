//! Guided, territorial, and migration foraging.
//!
//! Guided and territorial foraging propose one candidate for one agent and
//! decide whether to accept it by comparing the candidate with the agent's
//! current Pareto front:
//!
//! 1. candidate dominates a front member → accept
//! 2. a front member dominates the candidate → reject
//! 3. otherwise → accept with probability 0.5
//!
//! Members are checked in front order and the first decisive comparison
//! wins. Whatever is not kept in the population (the old agent on accept,
//! the candidate on reject) goes to the iteration's runner-up list.

use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::trace;

use super::archive::Archive;
use super::dominance::{dominated_mask, dominates, ParetoFronts};
use super::error::MoahaError;
use super::types::{Agent, ObjectiveFunction};
use super::visit::VisitTable;
use crate::random::{standard_normal, uniform_position};

/// Result of one guided or territorial foraging step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForageOutcome {
    /// The candidate replaced the agent.
    Accepted,
    /// The agent kept its position.
    Rejected,
}

/// How a candidate compares with the members of a front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrontVerdict {
    Dominates,
    Dominated,
    Incomparable,
}

fn compare_to_front(candidate: &[f64], agents: &[Agent], front: &[usize]) -> FrontVerdict {
    for &member in front {
        let values = &agents[member].values;
        if dominates(candidate, values) {
            return FrontVerdict::Dominates;
        }
        if dominates(values, candidate) {
            return FrontVerdict::Dominated;
        }
    }
    FrontVerdict::Incomparable
}

/// Clamps each coordinate into `[lower[d], upper[d]]`.
pub fn clip(position: &mut [f64], lower: &[f64], upper: &[f64]) {
    for ((x, &lo), &hi) in position.iter_mut().zip(lower).zip(upper) {
        if *x < lo {
            *x = lo;
        } else if *x > hi {
            *x = hi;
        }
    }
}

/// Mutable view of the colony state a foraging step reads and writes.
///
/// Built once per iteration by the controller; `fronts` is the sort taken
/// at the start of that iteration while `agents` reflects every move made
/// so far.
pub struct Forager<'a, P: ObjectiveFunction> {
    /// Problem being optimized.
    pub problem: &'a P,
    /// Live population; slot = agent index.
    pub agents: &'a mut [Agent],
    /// Recency matrix.
    pub visits: &'a mut VisitTable,
    /// Archive as of the previous iteration.
    pub archive: &'a Archive,
    /// Fronts from this iteration's sort.
    pub fronts: &'a ParetoFronts,
    /// Solutions displaced this iteration.
    pub runners_up: &'a mut Vec<Agent>,
}

impl<P: ObjectiveFunction> Forager<'_, P> {
    /// Picks the guided-foraging target for `agent`.
    ///
    /// The most overdue neighbour in the visit table; among ties, a
    /// uniformly random member of the tied agents' non-dominated subset.
    pub fn guided_target<R: Rng>(&self, agent: usize, rng: &mut R) -> Result<usize, MoahaError> {
        let overdue = self.visits.most_overdue(agent);
        match overdue.as_slice() {
            [] => Err(MoahaError::EmptyNeighborhood { agent }),
            [only] => Ok(*only),
            _ => {
                let values: Vec<&[f64]> = overdue
                    .iter()
                    .map(|&j| self.agents[j].values.as_slice())
                    .collect();
                let mask = dominated_mask(&values);
                let pool: Vec<usize> = overdue
                    .iter()
                    .zip(mask)
                    .filter(|&(_, dominated)| !dominated)
                    .map(|(&j, _)| j)
                    .collect();
                pool.choose(rng)
                    .copied()
                    .ok_or(MoahaError::EmptyNeighborhood { agent })
            }
        }
    }

    /// Guided foraging: move relative to the most overdue neighbour.
    ///
    /// `x'[d] = target[d] + z * mask[d] * (x[d] - target[d])` with one
    /// standard-normal `z` per call, clipped into bounds.
    pub fn guided<R: Rng>(
        &mut self,
        agent: usize,
        mask: &[bool],
        rng: &mut R,
    ) -> Result<ForageOutcome, MoahaError> {
        let target = self.guided_target(agent, rng)?;

        let z = standard_normal(rng);
        let current = &self.agents[agent].position;
        let food = &self.agents[target].position;
        let position: Vec<f64> = current
            .iter()
            .zip(food)
            .zip(mask)
            .map(|((&x, &t), &on)| if on { t + z * (x - t) } else { t })
            .collect();

        let outcome = self.settle(agent, position, rng);
        self.visits.record_visit(agent, target);
        if outcome == ForageOutcome::Accepted {
            self.visits.propagate(agent);
        }
        trace!(agent, target, ?outcome, "guided foraging");
        Ok(outcome)
    }

    /// Territorial foraging: a local step around the agent itself
    /// (probability 0.5) or around a random archive member.
    ///
    /// `x'[d] = ref[d] + z * mask[d] * ref[d]`, clipped into bounds.
    pub fn territorial<R: Rng>(&mut self, agent: usize, mask: &[bool], rng: &mut R) -> ForageOutcome {
        let r1: f64 = rng.random();
        let z = standard_normal(rng);

        let reference = if r1 > 0.5 {
            &self.agents[agent].position
        } else {
            match self.archive.choose(rng) {
                Some(member) => &member.position,
                None => &self.agents[agent].position,
            }
        };
        let position: Vec<f64> = reference
            .iter()
            .zip(mask)
            .map(|(&x, &on)| if on { x + z * x } else { x })
            .collect();

        let outcome = self.settle(agent, position, rng);
        self.visits.increment_row(agent);
        if outcome == ForageOutcome::Accepted {
            self.visits.propagate(agent);
        }
        trace!(agent, local = r1 > 0.5, ?outcome, "territorial foraging");
        outcome
    }

    /// Clips, evaluates, and accepts or rejects a candidate for `agent`.
    fn settle<R: Rng>(&mut self, agent: usize, mut position: Vec<f64>, rng: &mut R) -> ForageOutcome {
        clip(&mut position, self.problem.lower_bound(), self.problem.upper_bound());
        let evaluation = self.problem.evaluate(&position);
        let candidate = self.agents[agent].relocated(position, evaluation);

        let front = self
            .fronts
            .front_of(agent)
            .or_else(|| self.fronts.front(0))
            .unwrap_or(&[]);
        let accept = match compare_to_front(&candidate.values, &self.agents[..], front) {
            FrontVerdict::Dominates => true,
            FrontVerdict::Dominated => false,
            FrontVerdict::Incomparable => rng.random::<f64>() > 0.5,
        };

        if accept {
            let previous = std::mem::replace(&mut self.agents[agent], candidate);
            self.runners_up.push(previous);
            ForageOutcome::Accepted
        } else {
            self.runners_up.push(candidate);
            ForageOutcome::Rejected
        }
    }
}

/// Migration foraging: re-seed `members` uniformly inside the bounds.
///
/// Each migrated agent is re-evaluated, its visit-table row incremented,
/// and it is made the most overdue target for every other agent.
pub fn migrate<P: ObjectiveFunction, R: Rng>(
    problem: &P,
    agents: &mut [Agent],
    visits: &mut VisitTable,
    members: &[usize],
    rng: &mut R,
) {
    for &idx in members {
        let position = uniform_position(problem.lower_bound(), problem.upper_bound(), rng);
        let evaluation = problem.evaluate(&position);
        agents[idx].relocate(position, evaluation);

        visits.increment_row(idx);
        visits.propagate(idx);
    }
}
