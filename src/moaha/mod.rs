//! Multi-Objective Artificial Hummingbird Algorithm (MOAHA).
//!
//! A population-based optimizer for bounded real-valued problems with two
//! or more minimized objectives. Each agent (hummingbird) forages by one
//! of three rules:
//!
//! - **Guided**: move relative to the neighbour it has not used as a
//!   target for the longest time, tracked by a [`VisitTable`]
//! - **Territorial**: local step around itself or a random archive member
//! - **Migration**: every 2N iterations the worst Pareto front is re-seeded
//!   uniformly inside the bounds
//!
//! Non-dominated solutions are collected in a bounded [`Archive`], trimmed
//! by dynamic-elimination crowding distance ([`crowding::decd`]).
//!
//! # Core Traits
//!
//! - [`ObjectiveFunction`]: Problem definition (evaluation, bounds, hooks)
//!
//! # Key Types
//!
//! - [`MoahaConfig`]: Algorithm parameters (colony size, iterations, presets)
//! - [`MoahaRunner`]: Executes a complete run
//! - [`Colony`]: Step-by-step control over a run
//! - [`MoahaResult`]: Final archive, population, and per-iteration statistics
//!
//! # Submodules
//!
//! - [`dominance`]: Pareto dominance, dominated marking, non-dominated sorting
//! - [`crowding`]: Crowding distances and DECD eviction
//! - [`visit`]: Visit table and flight-pattern direction masks
//! - [`foraging`]: Guided, territorial, and migration moves
//! - [`init`]: Uniform and opposition-based initialization
//!
//! # Example
//!
//! ```
//! use u_moaha::moaha::{dominates, non_dominated_sort, Agent, Evaluation};
//!
//! assert!(dominates(&[1.0, 2.0], &[2.0, 2.0]));
//! assert!(!dominates(&[1.0, 2.0], &[2.0, 1.0]));
//!
//! let mut agents: Vec<Agent> = [[1.0, 2.0], [2.0, 1.0], [2.0, 2.0]]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, v)| Agent::new(i, vec![0.0], Evaluation::new(v.to_vec())))
//!     .collect();
//! let fronts = non_dominated_sort(&mut agents);
//! assert_eq!(fronts.front(0), Some(&[0, 1][..]));
//! ```
//!
//! # References
//!
//! - Zhao, Zhang, Mirjalili et al. (2022), "An effective multi-objective
//!   artificial hummingbird algorithm with dynamic elimination-based
//!   crowding distance for solving engineering design problems"
//! - Zhao, Wang & Mirjalili (2022), "Artificial hummingbird algorithm: A new
//!   bio-inspired optimizer with its engineering applications"
//! - Deb et al. (2002), *A Fast and Elitist Multiobjective GA: NSGA-II*

pub mod archive;
mod config;
pub mod crowding;
pub mod dominance;
mod error;
pub mod foraging;
pub mod init;
mod runner;
mod types;
pub mod visit;

pub use archive::Archive;
pub use config::{MoahaConfig, PARAM_ARCHIVE_SIZE, PARAM_MAX_ITERATIONS, PARAM_NUM_AGENTS};
pub use crowding::{crowding_distances, decd};
pub use dominance::{
    dominates, extract_non_dominated, mark_dominated, non_dominated_sort, ParetoFronts,
};
pub use error::MoahaError;
pub use foraging::ForageOutcome;
pub use runner::{validate_problem, Colony, IterationStats, MoahaResult, MoahaRunner};
pub use types::{Agent, Evaluation, ObjectiveFunction};
pub use visit::{FlightPattern, VisitTable};
