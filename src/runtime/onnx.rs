//! ONNX Runtime backend via `ort`, loaded dynamically at first use.
//! The shared library comes from `runtime.dylib_path` or `ORT_DYLIB_PATH`.
//! Dynamic dimensions are pinned to 1 (batch size 1, static shapes for the delegate).

use super::{Interpreter, Runtime};
use crate::delegate::{Accelerator, Delegate};
use crate::error::{HarnessError, Result, TensorKind};
use ndarray::{ArrayD, IxDyn};
use ort::execution_providers::{
    CPUExecutionProvider, ExecutionProvider, ExecutionProviderDispatch, NNAPIExecutionProvider,
    XNNPACKExecutionProvider,
};
use ort::session::{Session, SessionInputValue};
use ort::tensor::TensorElementType;
use ort::value::{DynValue, TensorRef, ValueType};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static ORT_ENV: OnceLock<()> = OnceLock::new();

fn init_env(dylib_path: Option<&Path>) {
    ORT_ENV.get_or_init(|| {
        let builder = match dylib_path {
            Some(path) => ort::init_from(path.display().to_string()),
            None => ort::init(),
        };
        if let Err(e) = builder.with_name("delegate-bench").commit() {
            tracing::warn!(error = %e, "ORT environment already configured");
        }
    });
}

/// Serialized graph read from disk; the interpreter is built from these bytes.
pub struct OrtModel {
    path: PathBuf,
    bytes: Vec<u8>,
}

impl Drop for OrtModel {
    fn drop(&mut self) {
        tracing::debug!(path = %self.path.display(), "model released");
    }
}

/// The shared library is not touched until the first interpreter is created.
pub struct OrtRuntime {
    dylib_path: Option<PathBuf>,
}

impl OrtRuntime {
    pub fn new(dylib_path: Option<&Path>) -> Self {
        Self {
            dylib_path: dylib_path.map(Path::to_path_buf),
        }
    }
}

impl Runtime for OrtRuntime {
    type Model = OrtModel;
    type Interpreter = OrtInterpreter;

    fn load_model(&self, path: &Path) -> Result<OrtModel> {
        let bytes = std::fs::read(path).map_err(|source| HarnessError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(OrtModel {
            path: path.to_path_buf(),
            bytes,
        })
    }

    fn create_interpreter(&self, model: &OrtModel, delegate: &Delegate) -> Result<OrtInterpreter> {
        init_env(self.dylib_path.as_deref());
        let session = Session::builder()?
            .with_execution_providers([execution_provider(delegate.accelerator())])?
            .commit_from_memory(&model.bytes)?;

        let input_slots = session
            .inputs
            .iter()
            .map(|i| TensorSlot::new(TensorKind::Input, &i.name, &i.input_type))
            .collect::<Result<Vec<_>>>()?;
        let output_slots = session
            .outputs
            .iter()
            .map(|o| TensorSlot::new(TensorKind::Output, &o.name, &o.output_type))
            .collect::<Result<Vec<_>>>()?;

        Ok(OrtInterpreter {
            session,
            input_slots,
            output_slots,
            inputs: Vec::new(),
            outputs: Vec::new(),
        })
    }
}

fn execution_provider(accelerator: &Accelerator) -> ExecutionProviderDispatch {
    match accelerator {
        Accelerator::Cpu => register(CPUExecutionProvider::default()),
        Accelerator::Xnnpack => register(XNNPACKExecutionProvider::default()),
        Accelerator::Nnapi { cpu_only, .. } => {
            register(NNAPIExecutionProvider::default().with_cpu_only(*cpu_only))
        }
    }
}

/// Registration never fails the session: an unavailable provider leaves the
/// runtime on its default CPU path.
fn register<E>(ep: E) -> ExecutionProviderDispatch
where
    E: ExecutionProvider + Into<ExecutionProviderDispatch>,
{
    match ep.is_available() {
        Ok(true) => tracing::debug!(provider = ep.name(), "execution provider available"),
        _ => tracing::warn!(
            provider = ep.name(),
            "execution provider unavailable; falling back to default CPU path"
        ),
    }
    ep.into()
}

/// Symbolic (negative) dimensions become 1.
fn pin_dynamic_dims(dims: &[i64]) -> Vec<usize> {
    dims.iter().map(|&d| if d < 0 { 1 } else { d as usize }).collect()
}

struct TensorSlot {
    name: String,
    shape: Vec<usize>,
}

impl TensorSlot {
    fn new(kind: TensorKind, name: &str, value_type: &ValueType) -> Result<Self> {
        match value_type {
            ValueType::Tensor { ty, shape, .. } => {
                let dims: Vec<i64> = shape.iter().copied().collect();
                Self::from_tensor(kind, name, *ty, &dims)
            }
            other => Err(HarnessError::UnsupportedTensor {
                kind,
                name: name.to_string(),
                detail: format!("{:?} is not a tensor", other),
            }),
        }
    }

    fn from_tensor(kind: TensorKind, name: &str, ty: TensorElementType, dims: &[i64]) -> Result<Self> {
        if ty != TensorElementType::Float32 {
            return Err(HarnessError::UnsupportedTensor {
                kind,
                name: name.to_string(),
                detail: format!("element type {:?}, expected f32", ty),
            });
        }
        Ok(Self {
            name: name.to_string(),
            shape: pin_dynamic_dims(dims),
        })
    }

    fn byte_size(&self) -> usize {
        self.shape.iter().product::<usize>() * std::mem::size_of::<f32>()
    }
}

/// Outputs of the last run stay as runtime values; they are only copied out on
/// request, so a timed invoke covers the forward pass alone.
pub struct OrtInterpreter {
    session: Session,
    input_slots: Vec<TensorSlot>,
    output_slots: Vec<TensorSlot>,
    inputs: Vec<ArrayD<f32>>,
    outputs: Vec<Option<DynValue>>,
}

impl Interpreter for OrtInterpreter {
    fn allocate_tensors(&mut self) -> Result<()> {
        self.inputs = self
            .input_slots
            .iter()
            .map(|s| ArrayD::zeros(IxDyn(&s.shape)))
            .collect();
        self.outputs = self.output_slots.iter().map(|_| None).collect();
        Ok(())
    }

    fn input_count(&self) -> usize {
        self.input_slots.len()
    }

    fn output_count(&self) -> usize {
        self.output_slots.len()
    }

    fn input_byte_size(&self, index: usize) -> Option<usize> {
        self.input_slots.get(index).map(TensorSlot::byte_size)
    }

    fn output_byte_size(&self, index: usize) -> Option<usize> {
        self.output_slots.get(index).map(TensorSlot::byte_size)
    }

    fn copy_from_buffer(&mut self, index: usize, data: &[f32]) -> Result<()> {
        let count = self.inputs.len();
        let tensor = self.inputs.get_mut(index).ok_or(HarnessError::TensorIndex {
            kind: TensorKind::Input,
            index,
            count,
        })?;
        tensor.iter_mut().zip(data).for_each(|(dst, &src)| *dst = src);
        Ok(())
    }

    fn invoke(&mut self) -> Result<()> {
        let mut feeds: Vec<(&str, SessionInputValue<'_>)> = Vec::with_capacity(self.inputs.len());
        for (slot, array) in self.input_slots.iter().zip(&self.inputs) {
            feeds.push((slot.name.as_str(), TensorRef::from_array_view(array.view())?.into()));
        }

        let mut outputs = self
            .session
            .run(feeds)
            .map_err(|e| HarnessError::Invoke(e.to_string()))?;

        for (slot, dst) in self.output_slots.iter().zip(self.outputs.iter_mut()) {
            let value = outputs
                .remove(slot.name.as_str())
                .ok_or_else(|| HarnessError::Invoke(format!("run produced no output '{}'", slot.name)))?;
            *dst = Some(value);
        }
        Ok(())
    }

    fn copy_to_buffer(&self, index: usize, out: &mut [f32]) -> Result<()> {
        let value = self
            .outputs
            .get(index)
            .and_then(Option::as_ref)
            .ok_or(HarnessError::TensorIndex {
                kind: TensorKind::Output,
                index,
                count: self.outputs.iter().filter(|o| o.is_some()).count(),
            })?;
        let view = value.try_extract_array::<f32>()?;
        if view.len() != out.len() {
            return Err(HarnessError::SizeMismatch {
                kind: TensorKind::Output,
                index,
                expected: out.len() * std::mem::size_of::<f32>(),
                actual: view.len() * std::mem::size_of::<f32>(),
            });
        }
        out.iter_mut().zip(view.iter()).for_each(|(dst, &src)| *dst = src);
        Ok(())
    }
}

impl Drop for OrtInterpreter {
    fn drop(&mut self) {
        tracing::debug!("interpreter released");
    }
}
