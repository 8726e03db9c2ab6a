//! Tensor type aliases shared across the pipeline.

use ndarray::{Array2, Array4};

/// Per-class score rows, one row per sample in the batch.
pub type Tensor2D = Array2<f32>;

/// Single-channel image batch in NCHW order.
pub type Tensor4D = Array4<f32>;
