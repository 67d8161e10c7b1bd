//! MOAHA iteration loop.
//!
//! [`Colony`] owns the population, visit table, and archive and advances
//! them one iteration at a time:
//! sort → per-agent foraging → migration (every 2N iterations) → archive
//! merge and trim.
//!
//! [`MoahaRunner`] drives a colony for the configured number of iterations
//! and packages the outcome as a [`MoahaResult`].

use rand::Rng;
use tracing::{debug, info};

use super::archive::Archive;
use super::config::MoahaConfig;
use super::dominance::non_dominated_sort;
use super::error::MoahaError;
use super::foraging::{self, ForageOutcome, Forager};
use super::init::{opposition_population, random_population};
use super::types::{Agent, ObjectiveFunction};
use super::visit::{sample_direction, VisitTable};
use crate::random::create_rng;

/// Summary of one completed iteration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IterationStats {
    /// 0-based iteration number.
    pub iteration: usize,
    /// Archive size after the trim.
    pub archive_size: usize,
    /// Number of Pareto fronts in the population at the start of the iteration.
    pub fronts: usize,
    /// Guided or territorial moves that replaced an agent.
    pub accepted: usize,
    /// Guided or territorial moves that kept the agent.
    pub rejected: usize,
    /// Agents re-seeded by migration (0 when migration did not run).
    pub migrated: usize,
    /// Smallest first-objective value in the archive.
    pub best_first_objective: f64,
}

/// Result of a MOAHA run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoahaResult {
    /// Final Pareto approximation, each member carrying its crowding distance.
    pub archive: Vec<Agent>,
    /// Final population.
    pub population: Vec<Agent>,
    /// Number of iterations executed.
    pub iterations: usize,
    /// Per-iteration statistics.
    pub history: Vec<IterationStats>,
    /// Best first-objective value in the archive after each iteration.
    pub convergence: Vec<f64>,
}

/// Checks that a problem can be handed to the optimizer.
pub fn validate_problem<P: ObjectiveFunction>(problem: &P) -> Result<(), MoahaError> {
    let objectives = problem.num_objectives();
    if objectives < 2 {
        return Err(MoahaError::TooFewObjectives { got: objectives });
    }

    let dimension = problem.dimension();
    let (lower, upper) = (problem.lower_bound(), problem.upper_bound());
    if dimension == 0 {
        return Err(MoahaError::InvalidBounds {
            reason: "problem has zero dimensions".into(),
        });
    }
    if lower.len() != dimension || upper.len() != dimension {
        return Err(MoahaError::InvalidBounds {
            reason: format!(
                "expected {dimension} bounds, got {} lower and {} upper",
                lower.len(),
                upper.len()
            ),
        });
    }
    if let Some(d) = (0..dimension).find(|&d| !(lower[d] <= upper[d])) {
        return Err(MoahaError::InvalidBounds {
            reason: format!("lower[{d}] = {} exceeds upper[{d}] = {}", lower[d], upper[d]),
        });
    }
    Ok(())
}

/// A running colony of agents.
///
/// Owns every piece of mutable optimizer state. Randomness comes from the
/// stream passed to each call.
pub struct Colony<'p, P: ObjectiveFunction> {
    problem: &'p P,
    config: MoahaConfig,
    agents: Vec<Agent>,
    visits: VisitTable,
    archive: Archive,
    iteration: usize,
    history: Vec<IterationStats>,
}

impl<'p, P: ObjectiveFunction> Colony<'p, P> {
    /// Validates `config` and `problem`, then initializes the population
    /// and seeds the archive with its non-dominated agents.
    pub fn new<R: Rng>(problem: &'p P, config: &MoahaConfig, rng: &mut R) -> Result<Self, MoahaError> {
        config.validate()?;
        validate_problem(problem)?;

        info!(
            agents = config.num_agents,
            iterations = config.max_iterations,
            archive = config.archive_size,
            dimension = problem.dimension(),
            objectives = problem.num_objectives(),
            opposition = config.opposition_init,
            "starting MOAHA"
        );

        let n = config.num_agents;
        let agents = if config.opposition_init {
            opposition_population(problem, n, config.parallel, rng)
        } else {
            random_population(problem, n, config.parallel, rng)
        };
        let archive = Archive::from_population(config.archive_size, &agents);

        Ok(Self {
            problem,
            config: config.clone(),
            agents,
            visits: VisitTable::new(n),
            archive,
            iteration: 0,
            history: Vec::with_capacity(config.max_iterations),
        })
    }

    /// Runs one iteration and returns its statistics.
    pub fn step<R: Rng>(&mut self, rng: &mut R) -> Result<IterationStats, MoahaError> {
        let fronts = non_dominated_sort(&mut self.agents);
        let dimension = self.problem.dimension();
        let mut runners_up = Vec::with_capacity(self.agents.len());
        let (mut accepted, mut rejected) = (0, 0);

        let mut forager = Forager {
            problem: self.problem,
            agents: &mut self.agents,
            visits: &mut self.visits,
            archive: &self.archive,
            fronts: &fronts,
            runners_up: &mut runners_up,
        };
        for agent in 0..self.config.num_agents {
            let (_, mask) = sample_direction(dimension, rng);
            let outcome = if rng.random::<f64>() < 0.5 {
                forager.guided(agent, &mask, rng)?
            } else {
                forager.territorial(agent, &mask, rng)
            };
            match outcome {
                ForageOutcome::Accepted => accepted += 1,
                ForageOutcome::Rejected => rejected += 1,
            }
        }

        let migrated = if self.is_migration_iteration() {
            self.migrate(rng).len()
        } else {
            0
        };

        self.archive.update(&self.agents, &runners_up);

        let stats = IterationStats {
            iteration: self.iteration,
            archive_size: self.archive.len(),
            fronts: fronts.len(),
            accepted,
            rejected,
            migrated,
            best_first_objective: self.archive.best_value(0).unwrap_or(f64::INFINITY),
        };
        debug!(
            iteration = stats.iteration,
            archive = stats.archive_size,
            fronts = stats.fronts,
            accepted,
            rejected,
            migrated,
            "iteration complete"
        );
        self.problem.on_iteration(&stats);
        self.history.push(stats.clone());
        self.iteration += 1;
        Ok(stats)
    }

    /// True when the current iteration is a multiple of 2N.
    pub fn is_migration_iteration(&self) -> bool {
        self.iteration % self.config.migration_period() == 0
    }

    /// Re-sorts the population and re-seeds every agent of the worst front.
    ///
    /// Returns the migrated agent indices.
    pub fn migrate<R: Rng>(&mut self, rng: &mut R) -> Vec<usize> {
        let fronts = non_dominated_sort(&mut self.agents);
        let worst = fronts.worst().to_vec();
        debug!(
            iteration = self.iteration,
            front = fronts.len().saturating_sub(1),
            agents = worst.len(),
            "migrating worst front"
        );
        foraging::migrate(self.problem, &mut self.agents, &mut self.visits, &worst, rng);
        worst
    }

    /// Number of completed iterations.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Current population.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Current visit table.
    pub fn visits(&self) -> &VisitTable {
        &self.visits
    }

    /// Current archive.
    pub fn archive(&self) -> &Archive {
        &self.archive
    }

    /// Statistics of every completed iteration.
    pub fn history(&self) -> &[IterationStats] {
        &self.history
    }

    /// Finishes the run, assigning crowding distances to the archive.
    pub fn into_result(mut self) -> MoahaResult {
        self.archive.assign_crowding_distances();
        let convergence = self.history.iter().map(|s| s.best_first_objective).collect();
        MoahaResult {
            archive: self.archive.into_members(),
            population: self.agents,
            iterations: self.iteration,
            history: self.history,
            convergence,
        }
    }
}

/// Executes a complete MOAHA run.
///
/// # Usage
///
/// ```
/// use u_moaha::moaha::{MoahaConfig, MoahaRunner};
/// use u_moaha::problems::Zdt1;
///
/// let problem = Zdt1::new(5);
/// let config = MoahaConfig::fast().with_seed(42);
/// let result = MoahaRunner::run(&problem, &config).unwrap();
/// assert!(!result.archive.is_empty());
/// assert!(result.archive.len() <= config.archive_size);
/// ```
pub struct MoahaRunner;

impl MoahaRunner {
    /// Runs the optimizer with a stream seeded from `config.seed`
    /// (a random seed when `None`).
    pub fn run<P: ObjectiveFunction>(
        problem: &P,
        config: &MoahaConfig,
    ) -> Result<MoahaResult, MoahaError> {
        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };
        Self::run_with_rng(problem, config, &mut rng)
    }

    /// Runs the optimizer on a caller-supplied random stream.
    pub fn run_with_rng<P: ObjectiveFunction, R: Rng>(
        problem: &P,
        config: &MoahaConfig,
        rng: &mut R,
    ) -> Result<MoahaResult, MoahaError> {
        let mut colony = Colony::new(problem, config, rng)?;
        for _ in 0..config.max_iterations {
            colony.step(rng)?;
        }
        let result = colony.into_result();
        info!(
            iterations = result.iterations,
            archive = result.archive.len(),
            "MOAHA finished"
        );
        Ok(result)
    }
}

// ============================================================================
// Tests
// ============================================================================
