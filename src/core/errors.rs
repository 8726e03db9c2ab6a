//! Error types for the digit classification pipeline.
//!
//! This module defines the error type shared by every stage of the pipeline,
//! from bitmap loading through normalization, inference, and result
//! extraction, together with helper constructors for building errors with
//! useful context.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Stages of the classification pipeline an error can originate from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProcessingStage {
    /// Error occurred while normalizing pixel intensities.
    Normalization,
    /// Error occurred while rendering the console preview.
    Rendering,
    /// Error occurred while extracting predictions from model output.
    PostProcessing,
    /// Generic processing error.
    Generic,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Normalization => write!(f, "normalization"),
            ProcessingStage::Rendering => write!(f, "rendering"),
            ProcessingStage::PostProcessing => write!(f, "post-processing"),
            ProcessingStage::Generic => write!(f, "processing"),
        }
    }
}

/// Errors that can occur while classifying a digit sample.
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// Error occurred while loading a sample bitmap.
    #[error("image load")]
    ImageLoad(#[from] image::ImageError),

    /// Error occurred in one of the local processing stages.
    #[error("{kind} failed: {context}")]
    Processing {
        /// The stage of the pipeline where the error occurred.
        kind: ProcessingStage,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error occurred while creating the ONNX Runtime session.
    #[error("failed to load model at '{path}': {context}")]
    ModelLoad {
        /// Path of the model that failed to load.
        path: PathBuf,
        /// Additional context about the error.
        context: String,
        /// The underlying ONNX Runtime error, when one exists.
        #[source]
        source: Option<ort::Error>,
    },

    /// Error occurred while running inference.
    #[error("inference with model '{model_name}' failed: {context}")]
    Inference {
        /// Name of the model the inference ran against.
        model_name: String,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },

    /// Error from the ONNX Runtime session.
    #[error(transparent)]
    Session(#[from] ort::Error),

    /// Error from tensor operations.
    #[error("tensor operation")]
    Tensor(#[from] ndarray::ShapeError),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

/// Convenient result alias for classification operations.
pub type ClassifyResult<T> = Result<T, ClassifyError>;

impl ClassifyError {
    /// Creates a processing error for a specific pipeline stage.
    pub fn processing_error(
        kind: ProcessingStage,
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind,
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates a normalization error.
    pub fn normalization(
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::processing_error(ProcessingStage::Normalization, context, error)
    }

    /// Creates a post-processing error.
    pub fn post_processing(
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::processing_error(ProcessingStage::PostProcessing, context, error)
    }

    /// Creates a model load error with an optional remediation hint.
    pub fn model_load_error(
        path: impl AsRef<Path>,
        context: &str,
        hint: Option<&str>,
        source: Option<ort::Error>,
    ) -> Self {
        let context = match hint {
            Some(hint) => format!("{context} ({hint})"),
            None => context.to_string(),
        };
        Self::ModelLoad {
            path: path.as_ref().to_path_buf(),
            context,
            source,
        }
    }

    /// Creates an inference error with model context.
    pub fn inference_error(
        model_name: &str,
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Inference {
            model_name: model_name.to_string(),
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates an error for invalid input.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Creates a validation error with expected/actual context.
    pub fn validation_error(component: &str, field: &str, expected: &str, actual: &str) -> Self {
        Self::InvalidInput {
            message: format!(
                "Validation failed in {component}: field '{field}' expected {expected}, but got '{actual}'"
            ),
        }
    }
}

/// Lightweight leaf error for failure sites with no richer source.
#[derive(Debug)]
pub struct SimpleError {
    message: String,
}

impl SimpleError {
    /// Creates a new SimpleError with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SimpleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SimpleError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_message() {
        let err = ClassifyError::validation_error("OrtInfer", "bindings", "2", "3");
        assert!(err.to_string().contains("OrtInfer"));
        assert!(err.to_string().contains("bindings"));
    }

    #[test]
    fn test_model_load_error_includes_hint() {
        let err =
            ClassifyError::model_load_error("mnist.onnx", "failed", Some("check the path"), None);
        assert!(err.to_string().contains("check the path"));
        assert!(err.to_string().contains("mnist.onnx"));
    }

    #[test]
    fn test_processing_stage_display() {
        assert_eq!(ProcessingStage::Normalization.to_string(), "normalization");
        assert_eq!(ProcessingStage::Generic.to_string(), "processing");
    }
}
