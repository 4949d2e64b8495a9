//! Tensor shapes and synthetic input data.

use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense tensor shape, serialized as a plain list of dimensions (e.g. `[1, 4096]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TensorShape(pub Vec<usize>);

impl TensorShape {
    pub fn new(dims: impl Into<Vec<usize>>) -> Self {
        Self(dims.into())
    }

    pub fn dims(&self) -> &[usize] {
        &self.0
    }

    /// Product of the dimensions. A scalar (no dims) holds one element.
    pub fn element_count(&self) -> usize {
        self.0.iter().product()
    }

    /// Size of an f32 tensor with this shape.
    pub fn byte_size(&self) -> usize {
        self.element_count() * std::mem::size_of::<f32>()
    }
}

impl fmt::Display for TensorShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dims: Vec<String> = self.0.iter().map(|d| d.to_string()).collect();
        write!(f, "{}", dims.join("x"))
    }
}

/// Uniform [0, 1) f32 source for model inputs.
pub struct RandomTensorGenerator {
    rng: StdRng,
    dist: Uniform<f32>,
}

impl RandomTensorGenerator {
    /// Seeded from OS entropy; two generators never repeat each other.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Reproducible stream for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            dist: Uniform::new(0.0f32, 1.0f32),
        }
    }

    pub fn generate(&mut self, count: usize) -> Vec<f32> {
        (&mut self.rng).sample_iter(self.dist).take(count).collect()
    }

    pub fn generate_for(&mut self, shape: &TensorShape) -> Vec<f32> {
        self.generate(shape.element_count())
    }
}

impl Default for RandomTensorGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Min / max / mean of an output buffer, logged after the first inference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutputSummary {
    pub len: usize,
    pub min: f32,
    pub max: f32,
    pub mean: f32,
}

impl OutputSummary {
    /// `None` for an empty buffer.
    pub fn from_slice(values: &[f32]) -> Option<Self> {
        let first = *values.first()?;
        let (min, max, sum) = values
            .iter()
            .fold((first, first, 0.0f64), |(lo, hi, sum), &v| {
                (lo.min(v), hi.max(v), sum + v as f64)
            });
        Some(Self {
            len: values.len(),
            min,
            max,
            mean: (sum / values.len() as f64) as f32,
        })
    }
}
