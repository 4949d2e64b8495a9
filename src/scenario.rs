//! Selector → model file and tensor shapes. The built-in table holds the two
//! benchmark models; the config file may replace it.

use crate::error::{HarnessError, Result};
use crate::tensor::TensorShape;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const QUANTIZE_CONCAT: &str = "int8_quantize_concat.tflite";
pub const LARGE_DENSE: &str = "int8_large_Dense.tflite";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Selector accepted by `--model`
    pub name: String,
    /// File under the model directory; defaults to `name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_file: Option<String>,
    pub inputs: Vec<TensorShape>,
    pub output: TensorShape,
}

impl Scenario {
    pub fn new(name: &str, inputs: Vec<TensorShape>, output: TensorShape) -> Self {
        Self {
            name: name.to_string(),
            model_file: None,
            inputs,
            output,
        }
    }

    pub fn model_path(&self, model_dir: &Path) -> PathBuf {
        model_dir.join(self.model_file.as_deref().unwrap_or(&self.name))
    }
}

#[derive(Debug, Clone)]
pub struct ScenarioTable {
    scenarios: Vec<Scenario>,
}

impl ScenarioTable {
    pub fn new(scenarios: Vec<Scenario>) -> Self {
        Self { scenarios }
    }

    /// Concat of two image inputs into a 64-channel conv, and a 4096 → 1024 dense layer.
    pub fn builtin() -> Self {
        Self::new(builtin_scenarios())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scenarios.iter().map(|s| s.name.as_str())
    }

    pub fn select(&self, name: &str) -> Result<&Scenario> {
        self.scenarios
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| HarnessError::UnknownScenario {
                name: name.to_string(),
                expected: self
                    .names()
                    .map(|n| format!("'{}'", n))
                    .collect::<Vec<_>>()
                    .join(" or "),
            })
    }
}

pub fn builtin_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(
            QUANTIZE_CONCAT,
            vec![
                TensorShape::new([1, 128, 128, 3]),
                TensorShape::new([1, 128, 128, 6]),
            ],
            TensorShape::new([1, 128, 128, 64]),
        ),
        Scenario::new(
            LARGE_DENSE,
            vec![TensorShape::new([1, 4096])],
            TensorShape::new([1, 1024]),
        ),
    ]
}
