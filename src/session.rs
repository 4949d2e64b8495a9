//! One inference run: load, bind inputs, invoke, extract outputs, close.
//!
//! The session owns the model, the interpreter and the delegate. Release order is
//! interpreter → delegate → model, on [`InferenceSession::close`] or on drop.

use crate::bench::Invoke;
use crate::delegate::Delegate;
use crate::error::{HarnessError, Result, TensorKind};
use crate::runtime::{Interpreter, Runtime};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const F32_BYTES: usize = std::mem::size_of::<f32>();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Model loaded, tensors allocated, inputs not all bound yet.
    Loaded,
    TensorsBound,
    Invoked,
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Loaded => "loaded",
            SessionState::TensorsBound => "bound",
            SessionState::Invoked => "invoked",
            SessionState::Closed => "closed",
        };
        f.write_str(s)
    }
}

pub struct InferenceSession<R: Runtime> {
    // Field order matters for drop: interpreter before delegate before model.
    interpreter: Option<R::Interpreter>,
    delegate: Option<Delegate>,
    model: Option<R::Model>,
    bound: Vec<bool>,
    state: SessionState,
    model_path: PathBuf,
}

impl<R: Runtime> InferenceSession<R> {
    /// Load the model at `path`, attach `delegate` and allocate tensors.
    pub fn load(runtime: &R, path: &Path, delegate: Delegate) -> Result<Self> {
        if !path.is_file() {
            return Err(HarnessError::ModelNotFound {
                path: path.to_path_buf(),
            });
        }
        let model = runtime.load_model(path)?;
        let mut interpreter = runtime.create_interpreter(&model, &delegate)?;
        interpreter.allocate_tensors()?;

        info!(
            path = %path.display(),
            accelerator = %delegate.accelerator(),
            inputs = interpreter.input_count(),
            outputs = interpreter.output_count(),
            "model loaded"
        );

        let bound = vec![false; interpreter.input_count()];
        Ok(Self {
            interpreter: Some(interpreter),
            delegate: Some(delegate),
            model: Some(model),
            bound,
            state: SessionState::Loaded,
            model_path: path.to_path_buf(),
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn delegate(&self) -> Option<&Delegate> {
        self.delegate.as_ref()
    }

    /// Copy `buffer` into input tensor `index`. Its byte size must match the tensor exactly.
    pub fn bind_input(&mut self, index: usize, buffer: &[f32]) -> Result<()> {
        let interpreter = self.live_interpreter_mut("bind input to")?;
        let count = interpreter.input_count();
        let expected = interpreter.input_byte_size(index).ok_or(HarnessError::TensorIndex {
            kind: TensorKind::Input,
            index,
            count,
        })?;
        let actual = buffer.len() * F32_BYTES;
        if actual != expected {
            return Err(HarnessError::SizeMismatch {
                kind: TensorKind::Input,
                index,
                expected,
                actual,
            });
        }
        interpreter.copy_from_buffer(index, buffer)?;

        self.bound[index] = true;
        if self.state == SessionState::Loaded && self.bound.iter().all(|&b| b) {
            self.state = SessionState::TensorsBound;
        }
        debug!(index, bytes = actual, "input bound");
        Ok(())
    }

    /// One forward pass. Every input must have been bound.
    pub fn invoke(&mut self) -> Result<()> {
        if self.state != SessionState::Closed {
            if let Some(index) = self.bound.iter().position(|&b| !b) {
                return Err(HarnessError::UnboundInput { index });
            }
        }
        self.live_interpreter_mut("invoke")?.invoke()?;
        self.state = SessionState::Invoked;
        Ok(())
    }

    /// Copy output tensor `index` into a fresh buffer of exactly `length` floats.
    pub fn extract_output(&self, index: usize, length: usize) -> Result<Vec<f32>> {
        let interpreter = match (&self.interpreter, self.state) {
            (Some(interpreter), SessionState::Invoked) => interpreter,
            _ => {
                return Err(HarnessError::InvalidState {
                    op: "extract output from",
                    state: self.state,
                })
            }
        };
        let expected = interpreter
            .output_byte_size(index)
            .ok_or(HarnessError::TensorIndex {
                kind: TensorKind::Output,
                index,
                count: interpreter.output_count(),
            })?;
        let actual = length * F32_BYTES;
        if actual != expected {
            return Err(HarnessError::SizeMismatch {
                kind: TensorKind::Output,
                index,
                expected,
                actual,
            });
        }
        let mut output = vec![0.0f32; length];
        interpreter.copy_to_buffer(index, &mut output)?;
        Ok(output)
    }

    /// Release interpreter, delegate and model, in that order. Only once.
    pub fn close(&mut self) -> Result<()> {
        if self.state == SessionState::Closed {
            return Err(HarnessError::InvalidState {
                op: "close",
                state: self.state,
            });
        }
        self.release();
        info!(path = %self.model_path.display(), "session closed");
        Ok(())
    }

    fn release(&mut self) {
        drop(self.interpreter.take());
        drop(self.delegate.take());
        drop(self.model.take());
        self.state = SessionState::Closed;
    }

    fn live_interpreter_mut(&mut self, op: &'static str) -> Result<&mut R::Interpreter> {
        match self.interpreter.as_mut() {
            Some(interpreter) if self.state != SessionState::Closed => Ok(interpreter),
            _ => Err(HarnessError::InvalidState {
                op,
                state: self.state,
            }),
        }
    }
}

impl<R: Runtime> Invoke for InferenceSession<R> {
    fn invoke(&mut self) -> Result<()> {
        InferenceSession::invoke(self)
    }
}

impl<R: Runtime> Drop for InferenceSession<R> {
    fn drop(&mut self) {
        if self.state != SessionState::Closed {
            warn!(path = %self.model_path.display(), "session dropped without close; releasing");
            self.release();
        }
    }
}
