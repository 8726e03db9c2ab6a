//! Digit classifier built from an ONNX model.
//!
//! `DigitClassifier` ties the pipeline together: normalize a sample, run it
//! through the ONNX Runtime session, and extract the top-k predictions. Use
//! [`DigitClassifierBuilder`] to configure precision, input shape, and
//! session settings before loading the model.

use crate::core::{
    ClassifyError, ModelPrecision, OrtExecutionProvider, OrtInfer, OrtSessionConfig,
};
use crate::processors::{DigitNormalizer, Topk};
use std::path::Path;
use tracing::{debug, warn};

/// Classification result for one digit sample.
#[derive(Debug, Clone)]
pub struct DigitPrediction {
    /// Top-k class ids, best first. The class id is the digit itself.
    pub class_ids: Vec<usize>,
    /// Confidence scores matching `class_ids`.
    pub scores: Vec<f32>,
}

impl DigitPrediction {
    /// The arg-max digit.
    pub fn digit(&self) -> Option<usize> {
        self.class_ids.first().copied()
    }

    /// The arg-max confidence score.
    pub fn confidence(&self) -> Option<f32> {
        self.scores.first().copied()
    }
}

/// Classifies digit bitmaps with an ONNX model.
#[derive(Debug)]
pub struct DigitClassifier {
    /// ONNX Runtime inference engine
    inference: OrtInfer,
    /// Pixel normalizer for preprocessing
    normalizer: DigitNormalizer,
    /// Top-k processor for postprocessing
    topk: Topk,
}

impl DigitClassifier {
    /// Creates a builder with default settings.
    pub fn builder() -> DigitClassifierBuilder {
        DigitClassifierBuilder::new()
    }

    /// Name of the loaded model.
    pub fn model_name(&self) -> &str {
        self.inference.model_name()
    }

    /// The underlying inference engine.
    pub fn inference(&self) -> &OrtInfer {
        &self.inference
    }

    /// Classifies one flattened grayscale sample.
    pub fn classify(&self, pixels: &[u8]) -> Result<DigitPrediction, ClassifyError> {
        let tensor = self.normalizer.to_tensor(pixels)?;
        let predictions = self.inference.infer_2d(&tensor)?;
        let mut result = self.topk.process(&predictions)?;

        match (result.indexes.pop(), result.scores.pop()) {
            (Some(class_ids), Some(scores)) if result.indexes.is_empty() => {
                Ok(DigitPrediction { class_ids, scores })
            }
            _ => Err(ClassifyError::invalid_input(
                "expected exactly one prediction row for a single sample",
            )),
        }
    }

    /// Classifies a batch of samples, one prediction per sample.
    pub fn classify_batch(
        &self,
        samples: &[Vec<u8>],
    ) -> Result<Vec<DigitPrediction>, ClassifyError> {
        if samples.is_empty() {
            return Ok(Vec::new());
        }
        let tensor = self.normalizer.to_batch_tensor(samples)?;
        let predictions = self.inference.infer_2d(&tensor)?;
        let result = self.topk.process(&predictions)?;

        Ok(result
            .indexes
            .into_iter()
            .zip(result.scores)
            .map(|(class_ids, scores)| DigitPrediction { class_ids, scores })
            .collect())
    }
}

/// Builder for [`DigitClassifier`].
#[derive(Debug, Clone)]
pub struct DigitClassifierBuilder {
    /// Input shape (height, width)
    input_shape: (usize, usize),
    /// Number of top predictions to keep
    topk: usize,
    /// Requested model precision
    precision: ModelPrecision,
    /// ONNX Runtime session configuration
    ort_config: Option<OrtSessionConfig>,
}

impl DigitClassifierBuilder {
    /// Creates a builder for the standard 28x28 MNIST model with top-1
    /// predictions at fp32 precision.
    pub fn new() -> Self {
        Self {
            input_shape: (28, 28),
            topk: 1,
            precision: ModelPrecision::Fp32,
            ort_config: None,
        }
    }

    /// Sets the input shape (height, width).
    pub fn input_shape(mut self, shape: (usize, usize)) -> Self {
        self.input_shape = shape;
        self
    }

    /// Sets the number of top predictions to keep.
    pub fn topk(mut self, k: usize) -> Self {
        self.topk = k;
        self
    }

    /// Sets the model precision mode.
    pub fn precision(mut self, precision: ModelPrecision) -> Self {
        self.precision = precision;
        self
    }

    /// Sets the ONNX Runtime session configuration.
    pub fn with_ort_config(mut self, config: OrtSessionConfig) -> Self {
        self.ort_config = Some(config);
        self
    }

    /// Builds the classifier from an ONNX model file.
    ///
    /// # Errors
    ///
    /// Int8 precision is rejected here, before any session is created. Other
    /// failures come from session creation and binding validation.
    pub fn build(self, model_path: &Path) -> Result<DigitClassifier, ClassifyError> {
        if self.precision == ModelPrecision::Int8 {
            return Err(ClassifyError::config_error(
                "int8 models are not supported - rerun with fp32 or fp16 precision",
            ));
        }

        let ort_config = self.resolve_precision();
        let inference = OrtInfer::new(model_path, ort_config.as_ref())?;
        debug!(
            model = inference.model_name(),
            input_shape = ?inference.input_shape(),
            output_shape = ?inference.output_shape(),
            "model bindings resolved"
        );

        let normalizer = DigitNormalizer::new(self.input_shape.0, self.input_shape.1)?;
        let topk = Topk::new(self.topk)?;

        Ok(DigitClassifier {
            inference,
            normalizer,
            topk,
        })
    }

    /// Applies the requested precision to the session configuration.
    ///
    /// fp16 maps onto the TensorRT execution provider's fp16 flag; without
    /// that provider configured the request degrades to fp32 weights with a
    /// warning.
    fn resolve_precision(&self) -> Option<OrtSessionConfig> {
        let mut config = self.ort_config.clone();
        if self.precision == ModelPrecision::Fp16 {
            let mut applied = false;
            if let Some(cfg) = config.as_mut() {
                if let Some(eps) = cfg.execution_providers.as_mut() {
                    for ep in eps.iter_mut() {
                        if let OrtExecutionProvider::TensorRT { fp16_enable, .. } = ep {
                            *fp16_enable = Some(true);
                            applied = true;
                        }
                    }
                }
            }
            if !applied {
                warn!(
                    "fp16 precision requires the TensorRT execution provider; continuing with fp32 weights"
                );
            }
        }
        config
    }
}

impl Default for DigitClassifierBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int8_rejected_before_session_creation() {
        // The model path does not exist; the precision check must fire first.
        let result = DigitClassifierBuilder::new()
            .precision(ModelPrecision::Int8)
            .build(Path::new("does_not_exist.onnx"));
        assert!(matches!(result, Err(ClassifyError::ConfigError { .. })));
    }

    #[test]
    fn test_missing_model_fails_to_build() {
        let result = DigitClassifierBuilder::new().build(Path::new("does_not_exist.onnx"));
        assert!(matches!(result, Err(ClassifyError::ModelLoad { .. })));
    }

    #[test]
    fn test_fp16_sets_tensorrt_flag() {
        let config = OrtSessionConfig::new().add_execution_provider(
            OrtExecutionProvider::TensorRT {
                device_id: Some(0),
                max_workspace_size: None,
                fp16_enable: None,
            },
        );
        let builder = DigitClassifierBuilder::new()
            .precision(ModelPrecision::Fp16)
            .with_ort_config(config);

        let resolved = builder.resolve_precision().unwrap();
        let providers = resolved.execution_providers.unwrap();
        assert!(matches!(
            providers[0],
            OrtExecutionProvider::TensorRT {
                fp16_enable: Some(true),
                ..
            }
        ));
    }

    #[test]
    fn test_fp32_leaves_config_untouched() {
        let builder = DigitClassifierBuilder::new();
        assert!(builder.resolve_precision().is_none());
    }
}
