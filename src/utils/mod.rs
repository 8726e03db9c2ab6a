//! Utility functions for loading digit bitmaps.

pub mod image;

pub use image::{load_digit_sample, load_digit_samples, load_gray_image};
