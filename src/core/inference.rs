//! ONNX Runtime session wrapper for digit classification.
//!
//! This module owns the one external collaborator of the pipeline: the ONNX
//! Runtime session built from the model file. It applies session
//! configuration, validates the model's bindings at load time, and exposes a
//! typed inference entry point over `ndarray` tensors.

use crate::core::config::{OrtExecutionProvider, OrtGraphOptimizationLevel, OrtSessionConfig};
use crate::core::errors::{ClassifyError, SimpleError};
use crate::core::tensor::{Tensor2D, Tensor4D};
use ort::execution_providers::ExecutionProviderDispatch;
use ort::logging::LogLevel;
use ort::session::{Session, builder::SessionBuilder};
use ort::value::{TensorRef, ValueType};
use std::path::Path;
use std::sync::Mutex;

/// Performs inference against a single ONNX Runtime session.
///
/// The model is required to expose exactly one input and one output binding;
/// anything else is rejected when the session is created.
pub struct OrtInfer {
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
    model_path: std::path::PathBuf,
    model_name: String,
}

impl std::fmt::Debug for OrtInfer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrtInfer")
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("model_path", &self.model_path)
            .field("model_name", &self.model_name)
            .finish()
    }
}

impl OrtInfer {
    /// Creates a new OrtInfer instance, applying the session configuration
    /// when one is given.
    ///
    /// The input and output binding names are read from the model itself
    /// after the binding count has been validated.
    pub fn new(
        model_path: impl AsRef<Path>,
        config: Option<&OrtSessionConfig>,
    ) -> Result<Self, ClassifyError> {
        let path = model_path.as_ref();
        // Default log level set to Error to suppress ORT logs
        let builder = Session::builder()?.with_log_level(LogLevel::Error)?;
        let builder = match config {
            Some(cfg) => Self::apply_ort_config(builder, cfg)?,
            None => builder,
        };
        let session = builder.commit_from_file(path).map_err(|e| {
            ClassifyError::model_load_error(
                path,
                "failed to create ONNX session",
                Some("verify model path and compatibility with selected execution providers"),
                Some(e),
            )
        })?;

        if session.inputs.len() != 1 || session.outputs.len() != 1 {
            return Err(ClassifyError::validation_error(
                "OrtInfer",
                "bindings",
                "exactly one input and one output binding",
                &format!(
                    "{} inputs, {} outputs",
                    session.inputs.len(),
                    session.outputs.len()
                ),
            ));
        }

        let input_name = session.inputs[0].name.clone();
        let output_name = session.outputs[0].name.clone();
        let model_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown_model")
            .to_string();

        Ok(OrtInfer {
            session: Mutex::new(session),
            input_name,
            output_name,
            model_path: path.to_path_buf(),
            model_name,
        })
    }

    fn apply_ort_config(
        mut builder: SessionBuilder,
        cfg: &OrtSessionConfig,
    ) -> Result<SessionBuilder, ort::Error> {
        if let Some(intra) = cfg.intra_threads {
            builder = builder.with_intra_threads(intra)?;
        }
        if let Some(inter) = cfg.inter_threads {
            builder = builder.with_inter_threads(inter)?;
        }
        if let Some(par) = cfg.parallel_execution {
            builder = builder.with_parallel_execution(par)?;
        }
        if let Some(level) = cfg.optimization_level {
            use ort::session::builder::GraphOptimizationLevel as GOL;
            let mapped = match level {
                OrtGraphOptimizationLevel::DisableAll => GOL::Disable,
                OrtGraphOptimizationLevel::Level1 => GOL::Level1,
                OrtGraphOptimizationLevel::Level2 => GOL::Level2,
                OrtGraphOptimizationLevel::Level3 => GOL::Level3,
                OrtGraphOptimizationLevel::All => GOL::Level3,
            };
            builder = builder.with_optimization_level(mapped)?;
        }
        if let Some(eps) = &cfg.execution_providers {
            let providers = Self::build_execution_providers(eps)?;
            if !providers.is_empty() {
                builder = builder.with_execution_providers(providers)?;
            }
        }
        Ok(builder)
    }

    /// Builds execution providers from configuration.
    fn build_execution_providers(
        eps: &[OrtExecutionProvider],
    ) -> Result<Vec<ExecutionProviderDispatch>, ort::Error> {
        let mut providers = Vec::new();

        for ep in eps {
            match ep {
                OrtExecutionProvider::CPU => {
                    // CPU provider is always available
                    providers
                        .push(ort::execution_providers::CPUExecutionProvider::default().build());
                }
                #[cfg(feature = "cuda")]
                OrtExecutionProvider::CUDA { device_id } => {
                    let mut cuda_provider =
                        ort::execution_providers::CUDAExecutionProvider::default();
                    if let Some(id) = device_id {
                        cuda_provider = cuda_provider.with_device_id(*id);
                    }
                    providers.push(cuda_provider.build());
                }
                #[cfg(feature = "tensorrt")]
                OrtExecutionProvider::TensorRT {
                    device_id,
                    max_workspace_size,
                    fp16_enable,
                } => {
                    let mut trt_provider =
                        ort::execution_providers::TensorRTExecutionProvider::default();
                    if let Some(id) = device_id {
                        trt_provider = trt_provider.with_device_id(*id);
                    }
                    if let Some(workspace) = max_workspace_size {
                        trt_provider = trt_provider.with_max_workspace_size(*workspace);
                    }
                    if let Some(fp16) = fp16_enable {
                        trt_provider = trt_provider.with_fp16(*fp16);
                    }
                    providers.push(trt_provider.build());
                }
                #[cfg(not(feature = "cuda"))]
                OrtExecutionProvider::CUDA { .. } => {
                    return Err(ort::Error::new(
                        "CUDA execution provider requested but cuda feature is not enabled",
                    ));
                }
                #[cfg(not(feature = "tensorrt"))]
                OrtExecutionProvider::TensorRT { .. } => {
                    return Err(ort::Error::new(
                        "TensorRT execution provider requested but tensorrt feature is not enabled",
                    ));
                }
            }
        }

        Ok(providers)
    }

    /// Gets the path to the model file.
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Gets the name of the model.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Returns the input binding's tensor shape, if declared.
    ///
    /// Dynamic dimensions (e.g. -1) are returned as-is.
    pub fn input_shape(&self) -> Option<Vec<i64>> {
        let session = self.session.lock().ok()?;
        match &session.inputs.first()?.input_type {
            ValueType::Tensor { shape, .. } => Some(shape.iter().copied().collect()),
            _ => None,
        }
    }

    /// Returns the output binding's tensor shape, if declared.
    pub fn output_shape(&self) -> Option<Vec<i64>> {
        let session = self.session.lock().ok()?;
        match &session.outputs.first()?.output_type {
            ValueType::Tensor { shape, .. } => Some(shape.iter().copied().collect()),
            _ => None,
        }
    }

    /// Number of elements in one output row: the product of the non-batch
    /// output dimensions. Returns None when any of them is dynamic.
    pub fn output_element_count(&self) -> Option<usize> {
        let shape = self.output_shape()?;
        let dims = shape.get(1..)?;
        if dims.is_empty() || dims.iter().any(|&d| d < 1) {
            return None;
        }
        Some(dims.iter().product::<i64>() as usize)
    }

    /// Runs inference and returns the per-class score matrix.
    ///
    /// The input is an `[N, C, H, W]` tensor; the output is validated to be
    /// `[N, num_classes]` before it is handed back.
    pub fn infer_2d(&self, x: &Tensor4D) -> Result<Tensor2D, ClassifyError> {
        let input_shape = x.shape().to_vec();
        let batch_size = input_shape[0];

        let input_tensor = TensorRef::from_array_view(x.view()).map_err(|e| {
            ClassifyError::inference_error(
                &self.model_name,
                format!("failed to convert input tensor with shape {input_shape:?}"),
                e,
            )
        })?;
        let inputs = ort::inputs![self.input_name.as_str() => input_tensor];

        let mut session = self.session.lock().map_err(|_| {
            ClassifyError::inference_error(
                &self.model_name,
                "failed to acquire session lock",
                SimpleError::new("session lock acquisition failed"),
            )
        })?;

        let outputs = session.run(inputs).map_err(|e| {
            ClassifyError::inference_error(
                &self.model_name,
                format!(
                    "ONNX Runtime inference failed with input '{}' -> output '{}'",
                    self.input_name, self.output_name
                ),
                e,
            )
        })?;

        let (output_shape, output_data) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| {
                ClassifyError::inference_error(
                    &self.model_name,
                    format!(
                        "failed to extract output tensor '{}' as f32",
                        self.output_name
                    ),
                    e,
                )
            })?;

        if output_shape.len() != 2 {
            return Err(ClassifyError::inference_error(
                &self.model_name,
                format!(
                    "expected 2D output tensor, got {}D with shape {output_shape:?}",
                    output_shape.len()
                ),
                SimpleError::new("invalid output tensor dimensions"),
            ));
        }

        let num_classes = output_shape[1] as usize;
        if output_data.len() != batch_size * num_classes {
            return Err(ClassifyError::inference_error(
                &self.model_name,
                format!(
                    "output data size mismatch: expected {}, got {}",
                    batch_size * num_classes,
                    output_data.len()
                ),
                SimpleError::new("output tensor data size mismatch"),
            ));
        }

        let array_view = ndarray::ArrayView2::from_shape((batch_size, num_classes), output_data)
            .map_err(ClassifyError::Tensor)?;
        Ok(array_view.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_fails_for_missing_model() {
        let result = OrtInfer::new("does_not_exist.onnx", None);
        assert!(matches!(result, Err(ClassifyError::ModelLoad { .. })));
    }

    #[test]
    fn test_new_respects_session_config() {
        let config = OrtSessionConfig::new()
            .with_intra_threads(1)
            .with_optimization_level(OrtGraphOptimizationLevel::All);
        let result = OrtInfer::new("does_not_exist.onnx", Some(&config));
        assert!(result.is_err());
    }

    #[cfg(not(feature = "cuda"))]
    #[test]
    fn test_cuda_provider_rejected_without_feature() {
        let result = OrtInfer::build_execution_providers(&[OrtExecutionProvider::CUDA {
            device_id: Some(0),
        }]);
        assert!(result.is_err());
    }
}
