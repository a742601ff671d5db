use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::registry::{self, DEFAULT_ENGINE_ID};

/// Environment variable overriding the configured engine.
pub const ENGINE_ENV_VAR: &str = "XELIS_HASH_ENGINE";

const DEFAULT_PARALLEL_THRESHOLD: usize = 8;

/// User/CLI-selected hashing configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HashConfig {
    pub engine: String,            // e.g., "scratchpad"
    pub parallel_batch: bool,      // fan batches out over the rayon pool
    pub parallel_threshold: usize, // smallest batch worth parallelizing
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            engine: DEFAULT_ENGINE_ID.to_string(),
            parallel_batch: true,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl HashConfig {
    pub fn new<S: Into<String>>(engine: S, parallel_batch: bool, parallel_threshold: usize) -> Self {
        Self {
            engine: engine.into(),
            parallel_batch,
            parallel_threshold,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        registry::get_engine(&self.engine)?;
        if self.parallel_threshold == 0 {
            return Err(ConfigError::ZeroParallelThreshold);
        }
        Ok(())
    }

    /// Load and validate a TOML config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg: HashConfig =
            toml::from_str(&s).with_context(|| format!("parsing config {}", path.display()))?;
        cfg.validate()
            .with_context(|| format!("validating config {}", path.display()))?;
        Ok(cfg)
    }

    /// Defaults, with the engine taken from `XELIS_HASH_ENGINE` when set.
    pub fn from_env_or_default() -> Self {
        let mut cfg = Self::default();
        if let Ok(engine) = std::env::var(ENGINE_ENV_VAR) {
            if !engine.trim().is_empty() {
                cfg.engine = engine;
            }
        }
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_validate() {
        let cfg = HashConfig::default();
        assert_eq!(cfg.engine, "scratchpad");
        cfg.validate().unwrap();
    }

    #[test]
    fn unknown_engine_fails_validation() {
        let cfg = HashConfig::new("md5", true, 4);
        assert!(matches!(cfg.validate(), Err(ConfigError::Registry(_))));
    }

    #[test]
    fn zero_threshold_fails_validation() {
        let cfg = HashConfig::new("blake3", true, 0);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::ZeroParallelThreshold)
        ));
    }

    #[test]
    fn loads_partial_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "engine = \"keccak256\"").unwrap();
        let cfg = HashConfig::load(file.path()).unwrap();
        assert_eq!(cfg.engine, "keccak256");
        assert!(cfg.parallel_batch);
        assert_eq!(cfg.parallel_threshold, DEFAULT_PARALLEL_THRESHOLD);
    }

    #[test]
    fn load_reports_path_on_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "engine = \"nope\"").unwrap();
        let err = HashConfig::load(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("not found"));
    }
}
