//! delegate-bench: latency harness for fixed models run through an on-device
//! accelerator delegate.
//!
//! Modular structure:
//! - [`tensor`]: Shapes, random input buffers, output summaries
//! - [`delegate`]: Accelerator preference and delegate handle
//! - [`runtime`]: Inference runtime interface and the ONNX Runtime backend
//! - [`session`]: Load / bind / invoke / extract / close lifecycle
//! - [`bench`]: Timing loop and report
//! - [`scenario`]: Selector table
//! - [`harness`]: One scenario end to end
//! - [`config`], [`cli`], [`logging`]: Configuration, arguments, log setup

pub mod bench;
pub mod cli;
pub mod config;
pub mod delegate;
pub mod error;
pub mod harness;
pub mod logging;
pub mod runtime;
pub mod scenario;
pub mod session;
pub mod tensor;

pub use bench::{run_benchmark, BenchmarkReport, Invoke};
pub use config::HarnessConfig;
pub use delegate::{Accelerator, Delegate, DelegateOptions};
pub use error::{HarnessError, Result};
pub use harness::{run_scenario, RunOutcome};
pub use logging::StructuredLogger;
pub use runtime::{Interpreter, OrtRuntime, Runtime};
pub use scenario::{Scenario, ScenarioTable};
pub use session::{InferenceSession, SessionState};
pub use tensor::{OutputSummary, RandomTensorGenerator, TensorShape};
