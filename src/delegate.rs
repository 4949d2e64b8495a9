//! Hardware-acceleration delegate: one knob, the preferred accelerator name.
//!
//! Names resolve to an execution provider family. Anything that is not `cpu` or
//! `xnnpack` is treated as an NNAPI device name (`qti-dsp`, `google-edgetpu`, ...).
//! When the provider is missing on the device the runtime falls back to its
//! default CPU path on its own.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_ACCELERATOR: &str = "qti-dsp";

/// NNAPI's CPU reference implementation.
const NNAPI_REFERENCE: &str = "nnapi-reference";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelegateOptions {
    /// Preferred accelerator, e.g. "qti-dsp", "google-edgetpu", "xnnpack", "cpu"
    pub accelerator_name: String,
}

impl Default for DelegateOptions {
    fn default() -> Self {
        Self {
            accelerator_name: DEFAULT_ACCELERATOR.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accelerator {
    Cpu,
    Xnnpack,
    Nnapi { device: String, cpu_only: bool },
}

impl Accelerator {
    pub fn from_name(name: &str) -> Self {
        let name = name.trim().to_ascii_lowercase();
        match name.as_str() {
            "cpu" => Accelerator::Cpu,
            "xnnpack" => Accelerator::Xnnpack,
            _ => Accelerator::Nnapi {
                cpu_only: name == NNAPI_REFERENCE,
                device: name,
            },
        }
    }

    /// Provider family, as printed in the latency line.
    pub fn family(&self) -> &'static str {
        match self {
            Accelerator::Cpu => "cpu",
            Accelerator::Xnnpack => "xnnpack",
            Accelerator::Nnapi { .. } => "nnapi",
        }
    }
}

impl fmt::Display for Accelerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accelerator::Nnapi { device, .. } => write!(f, "nnapi:{}", device),
            other => f.write_str(other.family()),
        }
    }
}

/// Configured delegate. Owned by the inference session and released when the
/// session closes, after the interpreter that references it.
#[derive(Debug)]
pub struct Delegate {
    options: DelegateOptions,
    accelerator: Accelerator,
}

impl Delegate {
    pub fn new(options: DelegateOptions) -> Self {
        let accelerator = Accelerator::from_name(&options.accelerator_name);
        tracing::debug!(accelerator = %accelerator, "delegate created");
        Self {
            options,
            accelerator,
        }
    }

    pub fn options(&self) -> &DelegateOptions {
        &self.options
    }

    pub fn accelerator(&self) -> &Accelerator {
        &self.accelerator
    }
}

impl Drop for Delegate {
    fn drop(&mut self) {
        tracing::debug!(accelerator = %self.accelerator, "delegate released");
    }
}
