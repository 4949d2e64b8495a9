//! delegate-bench entrypoint: pick a scenario by model name, run it once through
//! the delegate, then print the average latency over the timed invocations.

use clap::Parser;
use delegate_bench::{
    cli::Args,
    config::HarnessConfig,
    harness::run_scenario,
    logging::StructuredLogger,
    runtime::OrtRuntime,
    scenario::ScenarioTable,
    tensor::RandomTensorGenerator,
};
use std::process::ExitCode;
use tracing::info;

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = HarnessConfig::load(&args.config_path())?;
    args.apply(&mut config);

    StructuredLogger::init(config.log.json, &config.log.level);

    let table = ScenarioTable::new(config.scenarios.clone());
    let scenario = table.select(&args.model)?;
    info!(
        scenario = %scenario.name,
        iterations = config.iterations,
        accelerator = %config.delegate.accelerator_name,
        "delegate-bench starting"
    );

    let mut generator = match args.seed {
        Some(seed) => RandomTensorGenerator::with_seed(seed),
        None => RandomTensorGenerator::new(),
    };
    let runtime = OrtRuntime::new(config.runtime.dylib_path.as_deref());
    let outcome = run_scenario(
        &runtime,
        scenario,
        &config.model_dir,
        &config.delegate,
        &mut generator,
        config.iterations,
    )?;

    outcome
        .report
        .write_latency(&mut std::io::stdout().lock(), outcome.delegate_label)?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
