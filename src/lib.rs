//! Multi-objective artificial hummingbird optimization.
//!
//! Provides a generic, domain-agnostic implementation of MOAHA for bounded
//! real-valued problems with two or more minimized objectives:
//!
//! - **MOAHA** ([`moaha`]): guided, territorial, and migration foraging over
//!   a visit table, with a bounded Pareto archive trimmed by
//!   dynamic-elimination crowding distance.
//! - **Benchmark problems** ([`problems`]): ZDT1 and Schaffer N.1.
//! - **Randomness** ([`random`]): seeded stream construction and sampling
//!   helpers; every stochastic operation takes an explicit RNG.
//!
//! # Architecture
//!
//! The optimizer knows nothing about the problem beyond the
//! [`moaha::ObjectiveFunction`] trait: evaluation, bounds, and the number of
//! objectives. Layout, scheduling, or design cost models are defined by
//! consumers.
//!
//! # Features
//!
//! - `parallel` (default): evaluate the initial population with rayon
//! - `serde`: `Serialize`/`Deserialize` on configuration, agents, and results

pub mod moaha;
pub mod problems;
pub mod random;
