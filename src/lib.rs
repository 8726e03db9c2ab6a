//! # MNIST Classify
//!
//! A small Rust library and CLI that classifies handwritten digit bitmaps
//! with a pretrained ONNX model through ONNX Runtime.
//!
//! ## Features
//!
//! - Grayscale bitmap loading with dimension validation
//! - Pixel normalization into NCHW inference tensors
//! - ASCII-art console preview of the digit being classified
//! - Top-k prediction extraction with first-maximum tie-breaking
//! - Configurable ONNX Runtime sessions (threads, optimization level,
//!   CPU/CUDA/TensorRT execution providers)
//!
//! ## Modules
//!
//! * [`core`] - Error handling, configuration, and the inference engine
//! * [`predictor`] - The digit classifier and its builder
//! * [`processors`] - Normalization, console rendering, and top-k extraction
//! * [`utils`] - Bitmap loading utilities
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mnist_classify::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let classifier = DigitClassifier::builder()
//!     .input_shape((28, 28))
//!     .build(Path::new("data/mnist/mnist.onnx"))?;
//!
//! let pixels = load_digit_sample(Path::new("data/mnist/7.pgm"), (28, 28))?;
//! println!("{}", render_digit(&pixels, 28)?);
//!
//! let prediction = classifier.classify(&pixels)?;
//! println!("Prediction: {}", prediction.digit().unwrap_or(0));
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod predictor;
pub mod processors;
pub mod utils;

/// Prelude module for convenient imports.
///
/// Bring the essentials into scope with a single use statement:
///
/// ```rust
/// use mnist_classify::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::{
        ClassifyError, ClassifyResult, ModelPrecision, OrtSessionConfig, init_tracing,
    };
    pub use crate::predictor::{DigitClassifier, DigitClassifierBuilder, DigitPrediction};
    pub use crate::processors::{DigitNormalizer, render_digit};
    pub use crate::utils::{load_digit_sample, load_digit_samples};
}
