//! One scenario end to end: random inputs → load → bind → invoke → extract →
//! benchmark → close.

use crate::bench::{run_benchmark, BenchmarkReport};
use crate::delegate::{Delegate, DelegateOptions};
use crate::error::{HarnessError, Result};
use crate::runtime::Runtime;
use crate::scenario::Scenario;
use crate::session::InferenceSession;
use crate::tensor::{OutputSummary, RandomTensorGenerator};
use std::path::Path;
use tracing::info;

#[derive(Debug)]
pub struct RunOutcome {
    /// Element count of each generated input, in binding order
    pub input_lens: Vec<usize>,
    /// Output 0 after the first inference
    pub output: Vec<f32>,
    pub report: BenchmarkReport,
    /// Accelerator family used for the latency line
    pub delegate_label: &'static str,
}

pub fn run_scenario<R: Runtime>(
    runtime: &R,
    scenario: &Scenario,
    model_dir: &Path,
    delegate_options: &DelegateOptions,
    generator: &mut RandomTensorGenerator,
    iterations: usize,
) -> Result<RunOutcome> {
    if iterations == 0 {
        return Err(HarnessError::ZeroIterations);
    }

    let inputs: Vec<Vec<f32>> = scenario
        .inputs
        .iter()
        .map(|shape| generator.generate_for(shape))
        .collect();

    let delegate = Delegate::new(delegate_options.clone());
    let delegate_label = delegate.accelerator().family();
    let model_path = scenario.model_path(model_dir);
    info!(scenario = %scenario.name, path = %model_path.display(), "running scenario");

    let mut session = InferenceSession::load(runtime, &model_path, delegate)?;
    for (index, buffer) in inputs.iter().enumerate() {
        session.bind_input(index, buffer)?;
    }
    session.invoke()?;
    let output = session.extract_output(0, scenario.output.element_count())?;
    if let Some(summary) = OutputSummary::from_slice(&output) {
        info!(
            len = summary.len,
            min = summary.min,
            max = summary.max,
            mean = summary.mean,
            "output"
        );
    }

    let report = run_benchmark(&mut session, iterations)?;
    session.close()?;

    Ok(RunOutcome {
        input_lens: inputs.iter().map(Vec::len).collect(),
        output,
        report,
        delegate_label,
    })
}
