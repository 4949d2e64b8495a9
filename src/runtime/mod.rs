//! The capability set consumed from the inference runtime.
//!
//! A [`Runtime`] loads a serialized model and creates an [`Interpreter`] for it
//! with a delegate attached. Tensors are addressed by index and moved in and out
//! as raw f32 buffers; byte-size checks live in [`crate::session`].
//! Teardown is ownership: dropping the interpreter, delegate and model releases
//! the native handles.

pub mod onnx;

pub use onnx::{OrtInterpreter, OrtModel, OrtRuntime};

use crate::delegate::Delegate;
use crate::error::Result;
use std::path::Path;

pub trait Runtime {
    type Model;
    type Interpreter: Interpreter;

    fn load_model(&self, path: &Path) -> Result<Self::Model>;

    /// Build an interpreter over `model` with `delegate` injected. The
    /// interpreter must be dropped before either of them.
    fn create_interpreter(&self, model: &Self::Model, delegate: &Delegate) -> Result<Self::Interpreter>;
}

pub trait Interpreter {
    fn allocate_tensors(&mut self) -> Result<()>;

    fn input_count(&self) -> usize;
    fn output_count(&self) -> usize;

    /// `None` when `index` is out of range.
    fn input_byte_size(&self, index: usize) -> Option<usize>;
    fn output_byte_size(&self, index: usize) -> Option<usize>;

    /// Caller guarantees `data` matches `input_byte_size(index)`.
    fn copy_from_buffer(&mut self, index: usize, data: &[f32]) -> Result<()>;

    /// Forward pass only. Outputs stay with the interpreter until `copy_to_buffer`.
    fn invoke(&mut self) -> Result<()>;

    /// Caller guarantees `out` matches `output_byte_size(index)`.
    fn copy_to_buffer(&self, index: usize, out: &mut [f32]) -> Result<()>;
}
