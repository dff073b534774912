//! Configuration providers.

use crate::domain::CyclonConfig;
use crate::ports::ConfigProvider;

// ============================================================================
// StaticConfigProvider - Hardcoded config for testing/development
// ============================================================================

/// Static configuration provider.
///
/// Useful for tests and embedding. For deployments, use `TomlConfigProvider`.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigProvider {
    config: CyclonConfig,
}

impl StaticConfigProvider {
    /// Provider for the default protocol parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider for the given parameters.
    #[must_use]
    pub fn with_config(mut self, config: CyclonConfig) -> Self {
        self.config = config;
        self
    }
}

impl ConfigProvider for StaticConfigProvider {
    fn cyclon_config(&self) -> CyclonConfig {
        self.config.clone()
    }
}

// ============================================================================
// TomlConfigProvider - Config file loading (requires "config" feature)
// ============================================================================

#[cfg(feature = "config")]
mod toml_config {
    use super::*;
    use crate::domain::ConfigError;
    use serde::Deserialize;
    use std::fs;
    use std::path::Path;
    use std::time::Duration;

    #[derive(Debug, Deserialize, Default)]
    struct ConfigFile {
        #[serde(default)]
        cyclon: CyclonSection,
    }

    #[derive(Debug, Deserialize, Default)]
    #[serde(deny_unknown_fields)]
    struct CyclonSection {
        delta_t_ms: Option<u64>,
        c: Option<usize>,
        l: Option<usize>,
        bootstrap_timeout_ms: Option<u64>,
        seed: Option<u64>,
    }

    /// TOML-based configuration provider.
    ///
    /// # Config File Format
    ///
    /// ```toml
    /// [cyclon]
    /// delta_t_ms = 4000
    /// c = 5
    /// l = 3
    /// bootstrap_timeout_ms = 60000
    /// seed = 7
    /// ```
    ///
    /// Every key is optional; missing keys take the defaults.
    #[derive(Debug, Clone)]
    pub struct TomlConfigProvider {
        config: CyclonConfig,
    }

    impl TomlConfigProvider {
        /// Load and validate configuration from a TOML file.
        ///
        /// # Errors
        ///
        /// `ConfigError::Io` if the file cannot be read, `ConfigError::Parse`
        /// if it is not valid TOML, or a validation error for bad `c`/`l`.
        pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
            let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
                path: path.as_ref().display().to_string(),
                reason: e.to_string(),
            })?;

            Self::parse(&content)
        }

        /// Parse and validate configuration from a TOML string.
        pub fn parse(content: &str) -> Result<Self, ConfigError> {
            let file: ConfigFile =
                toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

            let section = file.cyclon;
            let defaults = CyclonConfig::default();
            let config = CyclonConfig {
                shuffle_interval: section
                    .delta_t_ms
                    .map_or(defaults.shuffle_interval, Duration::from_millis),
                view_capacity: section.c.unwrap_or(defaults.view_capacity),
                shuffle_length: section.l.unwrap_or(defaults.shuffle_length),
                bootstrap_timeout: section
                    .bootstrap_timeout_ms
                    .map_or(defaults.bootstrap_timeout, Duration::from_millis),
                rng_seed: section.seed,
            };
            config.validate()?;

            Ok(Self { config })
        }
    }

    impl ConfigProvider for TomlConfigProvider {
        fn cyclon_config(&self) -> CyclonConfig {
            self.config.clone()
        }
    }
}

#[cfg(feature = "config")]
pub use toml_config::TomlConfigProvider;
