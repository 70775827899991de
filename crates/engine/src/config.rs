//! Engine configuration.

use thiserror::Error;

/// Environment variable holding a fixed shape-generator seed.
pub const SEED_ENV: &str = "BLOCKFALL_SEED";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid BLOCKFALL_SEED value {0:?}: expected an unsigned 64-bit integer")]
    InvalidSeed(String),
}

/// Settings for one engine instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Shape generator seed. The same seed and command sequence replay the
    /// same game.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: rand::random(),
        }
    }
}

impl EngineConfig {
    /// Create from environment variables.
    ///
    /// A missing or blank `BLOCKFALL_SEED` picks a random seed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let seed = lookup(SEED_ENV)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        match seed {
            Some(raw) => raw
                .parse()
                .map(|seed| Self { seed })
                .map_err(|_| ConfigError::InvalidSeed(raw)),
            None => Ok(Self::default()),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
