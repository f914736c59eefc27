//! Exposure engine configuration.

use serde::{Deserialize, Serialize};

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 42;

/// Exposure engine configuration.
///
/// # Examples
///
/// ```rust
/// use pricer_xva::engine::EngineConfig;
///
/// let config = EngineConfig::builder().seed(7).discounted(false).build();
/// assert_eq!(config.seed(), 7);
/// assert!(!config.discounted());
///
/// let default = EngineConfig::default();
/// assert!(default.discounted());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed of the shock generator.
    seed: u64,
    /// Multiply MTM by the trade's running numeraire.
    discounted: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            discounted: true,
        }
    }
}

impl EngineConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Seed of the shock generator.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Whether exposures are discounted to valuation.
    #[inline]
    pub fn discounted(&self) -> bool {
        self.discounted
    }
}

/// Builder for [`EngineConfig`].
#[derive(Clone, Debug, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Sets the seed for reproducibility.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Sets whether exposures are discounted.
    #[inline]
    pub fn discounted(mut self, discounted: bool) -> Self {
        self.config.discounted = discounted;
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> EngineConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        assert_eq!(EngineConfig::builder().build(), EngineConfig::default());
    }

    #[test]
    fn test_deserialise_partial() {
        let config: EngineConfig = serde_json::from_str(r#"{"seed": 11}"#).unwrap();
        assert_eq!(config.seed(), 11);
        assert!(config.discounted());
    }
}
