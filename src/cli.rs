//! Command-line surface.

use crate::config::{HarnessConfig, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "delegate-bench")]
#[command(about = "Benchmark a model on mobile device through an accelerator delegate")]
#[command(version)]
pub struct Args {
    /// Model name (int8 version), e.g. int8_large_Dense.tflite
    #[arg(short, long)]
    pub model: String,

    /// Timed invocations (overrides config)
    #[arg(short = 'n', long)]
    pub iterations: Option<usize>,

    /// Preferred accelerator, e.g. qti-dsp, google-edgetpu, xnnpack, cpu (overrides config)
    #[arg(short, long)]
    pub accelerator: Option<String>,

    /// Seed for the input generator; entropy when unset
    #[arg(long)]
    pub seed: Option<u64>,

    /// Config file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// `--config`, then the environment variable, then `delegate-bench.json`.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    pub fn apply(&self, config: &mut HarnessConfig) {
        if let Some(n) = self.iterations {
            config.iterations = n;
        }
        if let Some(name) = &self.accelerator {
            config.delegate.accelerator_name = name.clone();
        }
    }
}
