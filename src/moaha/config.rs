//! MOAHA configuration.
//!
//! [`MoahaConfig`] holds the colony size, iteration count, archive capacity,
//! and run-level switches.

use tracing::warn;

use super::error::MoahaError;

/// Named parameter for the colony size.
pub const PARAM_NUM_AGENTS: &str = "Number of Agents";
/// Named parameter for the iteration count.
pub const PARAM_MAX_ITERATIONS: &str = "Number of Iteration";
/// Named parameter for the archive capacity.
pub const PARAM_ARCHIVE_SIZE: &str = "Archive Size";

/// Configuration for the MOAHA optimizer.
///
/// # Defaults
///
/// ```
/// use u_moaha::moaha::MoahaConfig;
///
/// let config = MoahaConfig::default();
/// assert_eq!(config.num_agents, 50);
/// assert_eq!(config.max_iterations, 200);
/// assert_eq!(config.archive_size, 100);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_moaha::moaha::MoahaConfig;
///
/// let config = MoahaConfig::default()
///     .with_num_agents(30)
///     .with_max_iterations(100)
///     .with_opposition_init(true)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoahaConfig {
    /// Number of agents in the colony (N).
    ///
    /// Also sets the migration period: migration runs every 2N iterations.
    pub num_agents: usize,

    /// Number of foraging iterations.
    pub max_iterations: usize,

    /// Maximum number of archive members kept after each iteration.
    pub archive_size: usize,

    /// Start from the best N of 4N uniform, opposite, quasi-reflected, and
    /// quasi-opposite points instead of N uniform points.
    pub opposition_init: bool,

    /// Whether to evaluate the initial population in parallel using rayon.
    ///
    /// Has no effect without the `parallel` feature.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for MoahaConfig {
    fn default() -> Self {
        Self {
            num_agents: 50,
            max_iterations: 200,
            archive_size: 100,
            opposition_init: false,
            parallel: true,
            seed: None,
        }
    }
}

impl MoahaConfig {
    /// Sets the colony size.
    pub fn with_num_agents(mut self, n: usize) -> Self {
        self.num_agents = n;
        self
    }

    /// Sets the number of iterations.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the archive capacity.
    pub fn with_archive_size(mut self, n: usize) -> Self {
        self.archive_size = n;
        self
    }

    /// Enables or disables opposition-based initialization.
    pub fn with_opposition_init(mut self, enabled: bool) -> Self {
        self.opposition_init = enabled;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Preset for quick exploratory runs.
    ///
    /// - Agents: 20, Iterations: 50, Archive: 50
    pub fn fast() -> Self {
        Self {
            num_agents: 20,
            max_iterations: 50,
            archive_size: 50,
            ..Self::default()
        }
    }

    /// Preset balancing front quality and run time.
    ///
    /// - Agents: 50, Iterations: 200, Archive: 100
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Preset for dense, well-converged fronts.
    ///
    /// - Agents: 100, Iterations: 500, Archive: 200, opposition-based init
    pub fn quality() -> Self {
        Self {
            num_agents: 100,
            max_iterations: 500,
            archive_size: 200,
            opposition_init: true,
            ..Self::default()
        }
    }

    /// Builds a configuration from named string parameters.
    ///
    /// Recognises [`PARAM_NUM_AGENTS`], [`PARAM_MAX_ITERATIONS`] and
    /// [`PARAM_ARCHIVE_SIZE`]; all three are required. Values are trimmed
    /// and must parse as positive integers. Unknown names are logged and
    /// ignored. The remaining fields keep their defaults.
    ///
    /// ```
    /// use u_moaha::moaha::MoahaConfig;
    ///
    /// let config = MoahaConfig::from_params([
    ///     ("Number of Agents", "40"),
    ///     ("Number of Iteration", " 300 "),
    ///     ("Archive Size", "80"),
    /// ])
    /// .unwrap();
    /// assert_eq!(config.num_agents, 40);
    /// assert_eq!(config.max_iterations, 300);
    /// ```
    pub fn from_params<I, K, V>(params: I) -> Result<Self, MoahaError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut num_agents = None;
        let mut max_iterations = None;
        let mut archive_size = None;

        for (name, value) in params {
            let (name, value) = (name.as_ref(), value.as_ref());
            let slot = match name {
                PARAM_NUM_AGENTS => &mut num_agents,
                PARAM_MAX_ITERATIONS => &mut max_iterations,
                PARAM_ARCHIVE_SIZE => &mut archive_size,
                _ => {
                    warn!(name, "ignoring unknown parameter");
                    continue;
                }
            };
            *slot = Some(parse_positive(name, value)?);
        }

        let require = |slot: Option<usize>, name: &str| {
            slot.ok_or_else(|| MoahaError::MissingParameter { name: name.into() })
        };
        Ok(Self {
            num_agents: require(num_agents, PARAM_NUM_AGENTS)?,
            max_iterations: require(max_iterations, PARAM_MAX_ITERATIONS)?,
            archive_size: require(archive_size, PARAM_ARCHIVE_SIZE)?,
            ..Self::default()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), MoahaError> {
        if self.num_agents < 2 {
            return Err(MoahaError::InvalidConfig(
                "num_agents must be at least 2".into(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(MoahaError::InvalidConfig(
                "max_iterations must be at least 1".into(),
            ));
        }
        if self.archive_size == 0 {
            return Err(MoahaError::InvalidConfig(
                "archive_size must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Iterations between migrations (2N).
    pub fn migration_period(&self) -> usize {
        2 * self.num_agents
    }
}

fn parse_positive(name: &str, value: &str) -> Result<usize, MoahaError> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(MoahaError::InvalidParameter {
            name: name.into(),
            value: value.into(),
        }),
    }
}
