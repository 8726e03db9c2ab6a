//! Sample processing for the classification pipeline.
//!
//! Normalization, console rendering, and top-k result extraction: the
//! locally-owned transforms around the ONNX Runtime call.

pub mod console_art;
pub mod normalization;
pub mod topk;

pub use console_art::render_digit;
pub use normalization::DigitNormalizer;
pub use topk::{Topk, TopkResult};
