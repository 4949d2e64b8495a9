//! In-process stand-in for the inference runtime: fixed tensor sizes, scripted
//! invoke delays and failures, and a record of release order. Releases are also
//! emitted as tracing events so they interleave with the delegate's own.

#![allow(dead_code)]

use delegate_bench::{Delegate, HarnessError, Interpreter, Result, Runtime};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::io;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub type ReleaseLog = Rc<RefCell<Vec<&'static str>>>;

#[derive(Default)]
pub struct StubRuntime {
    pub input_lens: Vec<usize>,
    pub output_lens: Vec<usize>,
    /// Sleep per invoke, consumed front to back
    pub delays: Rc<RefCell<VecDeque<Duration>>>,
    /// Invocations numbered from 1; this one and later fail
    pub fail_from: Option<usize>,
    pub invocations: Rc<Cell<usize>>,
    /// Output copy-outs
    pub copies: Rc<Cell<usize>>,
    pub loads: Cell<usize>,
    pub released: ReleaseLog,
}

impl StubRuntime {
    pub fn new(input_lens: &[usize], output_lens: &[usize]) -> Self {
        Self {
            input_lens: input_lens.to_vec(),
            output_lens: output_lens.to_vec(),
            ..Default::default()
        }
    }

    pub fn with_delays(self, delays: &[Duration]) -> Self {
        *self.delays.borrow_mut() = delays.iter().copied().collect();
        self
    }

    pub fn failing_from(mut self, invocation: usize) -> Self {
        self.fail_from = Some(invocation);
        self
    }
}

pub struct StubModel {
    released: ReleaseLog,
}

impl Drop for StubModel {
    fn drop(&mut self) {
        self.released.borrow_mut().push("model");
        tracing::debug!("model released");
    }
}

pub struct StubInterpreter {
    input_lens: Vec<usize>,
    output_lens: Vec<usize>,
    inputs: Vec<Vec<f32>>,
    /// Result of the last invoke; expanded to full outputs only on copy-out
    last_sum: Option<f32>,
    delays: Rc<RefCell<VecDeque<Duration>>>,
    fail_from: Option<usize>,
    invocations: Rc<Cell<usize>>,
    copies: Rc<Cell<usize>>,
    released: ReleaseLog,
}

impl Drop for StubInterpreter {
    fn drop(&mut self) {
        self.released.borrow_mut().push("interpreter");
        tracing::debug!("interpreter released");
    }
}

impl Runtime for StubRuntime {
    type Model = StubModel;
    type Interpreter = StubInterpreter;

    fn load_model(&self, _path: &Path) -> Result<StubModel> {
        self.loads.set(self.loads.get() + 1);
        Ok(StubModel {
            released: self.released.clone(),
        })
    }

    fn create_interpreter(&self, _model: &StubModel, _delegate: &Delegate) -> Result<StubInterpreter> {
        Ok(StubInterpreter {
            input_lens: self.input_lens.clone(),
            output_lens: self.output_lens.clone(),
            inputs: Vec::new(),
            last_sum: None,
            delays: self.delays.clone(),
            fail_from: self.fail_from,
            invocations: self.invocations.clone(),
            copies: self.copies.clone(),
            released: self.released.clone(),
        })
    }
}

impl Interpreter for StubInterpreter {
    fn allocate_tensors(&mut self) -> Result<()> {
        self.inputs = self.input_lens.iter().map(|&n| vec![0.0; n]).collect();
        Ok(())
    }

    fn input_count(&self) -> usize {
        self.input_lens.len()
    }

    fn output_count(&self) -> usize {
        self.output_lens.len()
    }

    fn input_byte_size(&self, index: usize) -> Option<usize> {
        self.input_lens.get(index).map(|n| n * 4)
    }

    fn output_byte_size(&self, index: usize) -> Option<usize> {
        self.output_lens.get(index).map(|n| n * 4)
    }

    fn copy_from_buffer(&mut self, index: usize, data: &[f32]) -> Result<()> {
        self.inputs[index].copy_from_slice(data);
        Ok(())
    }

    fn invoke(&mut self) -> Result<()> {
        let n = self.invocations.get() + 1;
        self.invocations.set(n);
        if self.fail_from.is_some_and(|from| n >= from) {
            return Err(HarnessError::Invoke(format!("stub failure on invocation {}", n)));
        }
        if let Some(delay) = self.delays.borrow_mut().pop_front() {
            std::thread::sleep(delay);
        }
        self.last_sum = Some(self.inputs.iter().flatten().sum());
        Ok(())
    }

    fn copy_to_buffer(&self, index: usize, out: &mut [f32]) -> Result<()> {
        assert_eq!(out.len(), self.output_lens[index]);
        self.copies.set(self.copies.get() + 1);
        let sum = self.last_sum.ok_or_else(|| HarnessError::Invoke("no run yet".to_string()))?;
        out.iter_mut().for_each(|v| *v = sum);
        Ok(())
    }
}

/// Placeholder model file; the stub never parses it.
pub fn model_file(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"stub-model").unwrap();
    path
}

/// Formatted tracing output captured in memory, shared across clones.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl CapturedLogs {
    /// Run `f` with a debug-level subscriber writing into this buffer.
    pub fn capture<T>(&self, f: impl FnOnce() -> T) -> T {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Which of interpreter, delegate and model were released, in log order.
    pub fn release_order(&self) -> Vec<&'static str> {
        self.text()
            .lines()
            .filter_map(|line| {
                ["interpreter", "delegate", "model"]
                    .into_iter()
                    .find(|what| line.contains(&format!("{} released", what)))
            })
            .collect()
    }
}
