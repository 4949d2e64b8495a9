//! Timing loop: invoke N times on the monotonic clock, report the mean.

use crate::error::{HarnessError, Result};
use std::io::{self, Write};
use std::time::{Duration, Instant};

pub const DEFAULT_ITERATIONS: usize = 10;

/// Anything that can run one forward pass.
pub trait Invoke {
    fn invoke(&mut self) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct BenchmarkReport {
    samples: Vec<Duration>,
}

impl BenchmarkReport {
    /// Empty sample sets are rejected; the mean is always defined.
    pub fn from_samples(samples: Vec<Duration>) -> Result<Self> {
        if samples.is_empty() {
            return Err(HarnessError::ZeroIterations);
        }
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[Duration] {
        &self.samples
    }

    pub fn iterations(&self) -> usize {
        self.samples.len()
    }

    pub fn total(&self) -> Duration {
        self.samples.iter().sum()
    }

    pub fn mean(&self) -> Duration {
        self.total() / self.samples.len() as u32
    }

    pub fn mean_millis(&self) -> f64 {
        self.samples.iter().map(Duration::as_secs_f64).sum::<f64>() * 1e3 / self.samples.len() as f64
    }

    /// The console line: no trailing newline.
    pub fn write_latency(&self, w: &mut impl Write, delegate_label: &str) -> io::Result<()> {
        write!(
            w,
            "\nThe average elapsed time in {} delegate: {}ms",
            delegate_label,
            self.mean_millis()
        )?;
        w.flush()
    }
}

/// Invoke `target` `iterations` times, timing each call. No warm-up is discarded;
/// the first failing invoke aborts the run.
pub fn run_benchmark<T: Invoke + ?Sized>(target: &mut T, iterations: usize) -> Result<BenchmarkReport> {
    if iterations == 0 {
        return Err(HarnessError::ZeroIterations);
    }
    let mut samples = Vec::with_capacity(iterations);
    for _ in 0..iterations {
        let start = Instant::now();
        target.invoke()?;
        samples.push(start.elapsed());
    }
    let report = BenchmarkReport::from_samples(samples)?;
    tracing::info!(
        iterations,
        mean_ms = report.mean_millis(),
        total_ms = report.total().as_secs_f64() * 1e3,
        "benchmark complete"
    );
    Ok(report)
}
