//! Tester configuration file support
//!
//! Handles parsing of `.step-meta.toml` configuration files and
//! environment variable overrides.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{HarnessError, HarnessResult};
use super::registry::DEFAULT_ARRAY_LENGTH;

/// Default configuration filename
pub const CONFIG_FILENAME: &str = ".step-meta.toml";

/// Environment variable fixing the generation seed
pub const ENV_SEED: &str = "STEP_META_SEED";

/// Environment variable for the number of verification runs
pub const ENV_ITERATIONS: &str = "STEP_META_ITERATIONS";

/// Environment variable for the length of generated arrays
pub const ENV_ARRAY_LENGTH: &str = "STEP_META_ARRAY_LENGTH";

/// Value generation section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSection {
    /// Base seed; a random one is drawn (and logged) when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Verification runs per `test_serialization` call
    #[serde(default = "default_iterations")]
    pub iterations: u32,

    /// Length of arrays generated by the default validators
    #[serde(default = "default_array_length")]
    pub array_length: usize,
}

fn default_iterations() -> u32 {
    1
}

fn default_array_length() -> usize {
    DEFAULT_ARRAY_LENGTH
}

impl Default for GenerationSection {
    fn default() -> Self {
        Self {
            seed: None,
            iterations: default_iterations(),
            array_length: default_array_length(),
        }
    }
}

/// Represents the `.step-meta.toml` configuration file format.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HarnessConfig {
    #[serde(default)]
    pub generation: GenerationSection,
}

impl HarnessConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            generation: GenerationSection {
                seed: Some(seed),
                ..Default::default()
            },
        }
    }

    /// Load configuration from a directory
    ///
    /// Looks for `.step-meta.toml` in `dir` and falls back to defaults if
    /// it is not there. Environment overrides are applied either way.
    pub fn load(dir: &Path) -> anyhow::Result<Self> {
        let config_path = dir.join(CONFIG_FILENAME);
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            Self::parse(&content)
                .with_context(|| format!("Invalid configuration in {}", config_path.display()))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> HarnessResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| HarnessError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.check()?;
        Ok(config)
    }

    /// Convert configuration to TOML string
    pub fn to_toml(&self) -> HarnessResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| HarnessError::Configuration(format!("Failed to serialize config: {}", e)))
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(seed) = lookup(ENV_SEED)
            && let Ok(seed) = seed.trim().parse()
        {
            self.generation.seed = Some(seed);
        }

        if let Some(iterations) = lookup(ENV_ITERATIONS)
            && let Ok(iterations) = iterations.trim().parse::<u32>()
            && iterations > 0
        {
            self.generation.iterations = iterations;
        }

        if let Some(length) = lookup(ENV_ARRAY_LENGTH)
            && let Ok(length) = length.trim().parse()
        {
            self.generation.array_length = length;
        }
    }

    fn check(&self) -> HarnessResult<()> {
        if self.generation.iterations == 0 {
            return Err(HarnessError::Configuration(
                "generation.iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Annotated example configuration
pub fn sample_config() -> &'static str {
    r#"# Step metadata load/save tester configuration

[generation]
# Fix the seed to replay a failing run; leave unset for a random seed
# seed = 42

# Verification runs per test
iterations = 1

# Length of arrays generated by the default validators
array_length = 5
"#
}
