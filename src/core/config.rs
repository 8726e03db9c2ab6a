//! ONNX Runtime session configuration and model precision modes.

use serde::{Deserialize, Serialize};

/// Graph optimization levels for ONNX Runtime.
///
/// This enum represents the different levels of graph optimization that can
/// be applied during ONNX Runtime session creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OrtGraphOptimizationLevel {
    /// Disable all optimizations.
    DisableAll,
    /// Enable basic optimizations.
    Level1,
    /// Enable extended optimizations.
    Level2,
    /// Enable all optimizations.
    Level3,
    /// Enable all optimizations (alias for Level3).
    All,
}

impl Default for OrtGraphOptimizationLevel {
    fn default() -> Self {
        Self::Level1
    }
}

/// Execution providers available to the classifier.
///
/// The CPU provider is always available; the NVIDIA providers are compiled in
/// behind the `cuda` and `tensorrt` cargo features and rejected at session
/// creation when requested without them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OrtExecutionProvider {
    /// CPU execution provider (always available)
    CPU,
    /// NVIDIA CUDA execution provider
    CUDA {
        /// CUDA device ID (default: 0)
        device_id: Option<i32>,
    },
    /// NVIDIA TensorRT execution provider
    TensorRT {
        /// TensorRT device ID (default: 0)
        device_id: Option<i32>,
        /// Maximum workspace size in bytes
        max_workspace_size: Option<usize>,
        /// Build the engine with fp16 weights
        fp16_enable: Option<bool>,
    },
}

impl Default for OrtExecutionProvider {
    fn default() -> Self {
        Self::CPU
    }
}

/// Model precision requested for inference.
///
/// fp32 is the default. fp16 is honored by the TensorRT execution provider;
/// int8 engines are not supported and are rejected before a session is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelPrecision {
    /// 32-bit floating point weights (default).
    #[default]
    Fp32,
    /// 16-bit floating point weights.
    Fp16,
    /// 8-bit integer quantization (rejected).
    Int8,
}

impl std::fmt::Display for ModelPrecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelPrecision::Fp32 => write!(f, "fp32"),
            ModelPrecision::Fp16 => write!(f, "fp16"),
            ModelPrecision::Int8 => write!(f, "int8"),
        }
    }
}

/// Configuration for ONNX Runtime sessions.
///
/// Contains threading, optimization, and execution-provider settings applied
/// when the session is built. Deserializable from JSON for the CLI's
/// `--ort-config` option.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrtSessionConfig {
    /// Number of threads used to parallelize execution within nodes
    pub intra_threads: Option<usize>,
    /// Number of threads used to parallelize execution across nodes
    pub inter_threads: Option<usize>,
    /// Enable parallel execution mode
    pub parallel_execution: Option<bool>,
    /// Graph optimization level
    pub optimization_level: Option<OrtGraphOptimizationLevel>,
    /// Execution providers in order of preference
    pub execution_providers: Option<Vec<OrtExecutionProvider>>,
}

impl OrtSessionConfig {
    /// Creates a new OrtSessionConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of intra-op threads.
    pub fn with_intra_threads(mut self, threads: usize) -> Self {
        self.intra_threads = Some(threads);
        self
    }

    /// Sets the number of inter-op threads.
    pub fn with_inter_threads(mut self, threads: usize) -> Self {
        self.inter_threads = Some(threads);
        self
    }

    /// Enables or disables parallel execution.
    pub fn with_parallel_execution(mut self, enabled: bool) -> Self {
        self.parallel_execution = Some(enabled);
        self
    }

    /// Sets the graph optimization level.
    pub fn with_optimization_level(mut self, level: OrtGraphOptimizationLevel) -> Self {
        self.optimization_level = Some(level);
        self
    }

    /// Sets the execution providers.
    pub fn with_execution_providers(mut self, providers: Vec<OrtExecutionProvider>) -> Self {
        self.execution_providers = Some(providers);
        self
    }

    /// Adds a single execution provider.
    pub fn add_execution_provider(mut self, provider: OrtExecutionProvider) -> Self {
        if let Some(ref mut providers) = self.execution_providers {
            providers.push(provider);
        } else {
            self.execution_providers = Some(vec![provider]);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ort_session_config_new() {
        let config = OrtSessionConfig::new();
        assert!(config.intra_threads.is_none());
        assert!(config.inter_threads.is_none());
        assert!(config.optimization_level.is_none());
        assert!(config.execution_providers.is_none());
    }

    #[test]
    fn test_ort_session_config_builder() {
        let config = OrtSessionConfig::new()
            .with_intra_threads(4)
            .with_inter_threads(2)
            .with_optimization_level(OrtGraphOptimizationLevel::Level2)
            .add_execution_provider(OrtExecutionProvider::CPU);

        assert_eq!(config.intra_threads, Some(4));
        assert_eq!(config.inter_threads, Some(2));
        assert!(matches!(
            config.optimization_level,
            Some(OrtGraphOptimizationLevel::Level2)
        ));
        assert_eq!(
            config.execution_providers,
            Some(vec![OrtExecutionProvider::CPU])
        );
    }

    #[test]
    fn test_execution_provider_defaults() {
        assert!(matches!(
            OrtExecutionProvider::default(),
            OrtExecutionProvider::CPU
        ));
        assert!(matches!(
            OrtGraphOptimizationLevel::default(),
            OrtGraphOptimizationLevel::Level1
        ));
    }

    #[test]
    fn test_precision_parsing_from_json() {
        let precision: ModelPrecision = serde_json::from_str("\"fp16\"").unwrap();
        assert_eq!(precision, ModelPrecision::Fp16);
        assert_eq!(ModelPrecision::default(), ModelPrecision::Fp32);
        assert_eq!(ModelPrecision::Int8.to_string(), "int8");
    }

    #[test]
    fn test_session_config_from_json() {
        let config: OrtSessionConfig = serde_json::from_str(
            r#"{
                "intra_threads": 2,
                "execution_providers": [
                    "CPU",
                    { "TensorRT": { "device_id": 0, "max_workspace_size": null, "fp16_enable": true } }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(config.intra_threads, Some(2));
        let providers = config.execution_providers.unwrap();
        assert_eq!(providers.len(), 2);
        assert!(matches!(
            providers[1],
            OrtExecutionProvider::TensorRT {
                fp16_enable: Some(true),
                ..
            }
        ));
    }
}
