//! Reference multi-objective benchmark problems.
//!
//! Small, well-understood problems with known Pareto fronts, handy for
//! smoke-testing a configuration or benchmarking the optimizer.

mod schaffer;
mod zdt1;

pub use schaffer::SchafferN1;
pub use zdt1::Zdt1;
