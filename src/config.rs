//! Harness configuration. Every field has a default; CLI flags override.

use crate::bench::DEFAULT_ITERATIONS;
use crate::delegate::DelegateOptions;
use crate::error::{HarnessError, Result};
use crate::scenario::{builtin_scenarios, Scenario};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "delegate-bench.json";
pub const CONFIG_PATH_ENV: &str = "DELEGATE_BENCH_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Directory holding the model files
    pub model_dir: PathBuf,
    /// Timed invocations per run
    pub iterations: usize,
    pub delegate: DelegateOptions,
    pub runtime: RuntimeConfig,
    /// Selector table
    pub scenarios: Vec<Scenario>,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// ONNX Runtime shared library; `ORT_DYLIB_PATH` or the system default when unset
    pub dylib_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("model_files"),
            iterations: DEFAULT_ITERATIONS,
            delegate: DelegateOptions::default(),
            runtime: RuntimeConfig::default(),
            scenarios: builtin_scenarios(),
            log: LogConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

impl HarnessConfig {
    /// Load from JSON if the file exists, defaults otherwise. A file that exists
    /// but does not parse is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path).map_err(|source| HarnessError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| HarnessError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}
