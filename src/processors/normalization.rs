//! Pixel normalization for digit bitmaps.
//!
//! Maps flattened grayscale samples into the floating-point tensors the
//! model consumes. MNIST-style models are trained on white-on-black digits,
//! so each byte intensity `v` is inverted as `1.0 - v / 255.0`.

use crate::core::{ClassifyError, Tensor4D};

/// Normalizes flattened grayscale digit samples into inference tensors.
///
/// The normalizer is constructed with the expected sample dimensions and
/// rejects inputs whose length does not match. An empty sample is an error:
/// nothing downstream can produce a meaningful prediction from it.
#[derive(Debug, Clone)]
pub struct DigitNormalizer {
    /// Sample height in pixels
    height: usize,
    /// Sample width in pixels
    width: usize,
}

impl DigitNormalizer {
    /// Creates a normalizer for samples of the given (height, width).
    pub fn new(height: usize, width: usize) -> Result<Self, ClassifyError> {
        if height == 0 || width == 0 {
            return Err(ClassifyError::config_error(format!(
                "Sample dimensions must be non-zero, got {height}x{width}"
            )));
        }
        Ok(Self { height, width })
    }

    /// Number of pixels in one sample.
    pub fn sample_len(&self) -> usize {
        self.height * self.width
    }

    fn validate(&self, pixels: &[u8]) -> Result<(), ClassifyError> {
        if pixels.is_empty() {
            return Err(ClassifyError::invalid_input(
                "input sample is empty - check the sample path and file type",
            ));
        }
        if pixels.len() != self.sample_len() {
            return Err(ClassifyError::validation_error(
                "DigitNormalizer",
                "sample length",
                &format!("{} pixels ({}x{})", self.sample_len(), self.height, self.width),
                &pixels.len().to_string(),
            ));
        }
        Ok(())
    }

    /// Maps byte intensities to floats via `1.0 - v / 255.0`.
    ///
    /// The output has the same length as the input.
    pub fn normalize(&self, pixels: &[u8]) -> Result<Vec<f32>, ClassifyError> {
        self.validate(pixels)?;
        Ok(pixels
            .iter()
            .map(|&v| 1.0 - f32::from(v) / 255.0)
            .collect())
    }

    /// Normalizes one sample into a `[1, 1, H, W]` tensor.
    pub fn to_tensor(&self, pixels: &[u8]) -> Result<Tensor4D, ClassifyError> {
        let data = self.normalize(pixels)?;
        ndarray::Array4::from_shape_vec((1, 1, self.height, self.width), data)
            .map_err(ClassifyError::Tensor)
    }

    /// Normalizes a batch of samples into an `[N, 1, H, W]` tensor.
    pub fn to_batch_tensor(&self, samples: &[Vec<u8>]) -> Result<Tensor4D, ClassifyError> {
        if samples.is_empty() {
            return Ok(ndarray::Array4::zeros((0, 1, self.height, self.width)));
        }
        let mut data = Vec::with_capacity(samples.len() * self.sample_len());
        for sample in samples {
            data.extend(self.normalize(sample)?);
        }
        ndarray::Array4::from_shape_vec((samples.len(), 1, self.height, self.width), data)
            .map_err(ClassifyError::Tensor)
    }
}

impl Default for DigitNormalizer {
    /// Creates a normalizer for the standard 28x28 MNIST sample.
    fn default() -> Self {
        Self {
            height: 28,
            width: 28,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_preserves_length_and_formula() {
        let normalizer = DigitNormalizer::default();
        let pixels: Vec<u8> = (0..784).map(|i| (i % 256) as u8).collect();

        let normalized = normalizer.normalize(&pixels).unwrap();
        assert_eq!(normalized.len(), pixels.len());
        for (&v, &n) in pixels.iter().zip(normalized.iter()) {
            assert!((n - (1.0 - f32::from(v) / 255.0)).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn test_normalize_extremes() {
        let normalizer = DigitNormalizer::new(1, 2).unwrap();
        let normalized = normalizer.normalize(&[0, 255]).unwrap();
        assert_eq!(normalized, vec![1.0, 0.0]);
    }

    #[test]
    fn test_empty_sample_rejected() {
        let normalizer = DigitNormalizer::default();
        assert!(matches!(
            normalizer.normalize(&[]),
            Err(ClassifyError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let normalizer = DigitNormalizer::default();
        let pixels = vec![0u8; 100];
        assert!(matches!(
            normalizer.normalize(&pixels),
            Err(ClassifyError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_to_tensor_shape() {
        let normalizer = DigitNormalizer::default();
        let pixels = vec![128u8; 784];
        let tensor = normalizer.to_tensor(&pixels).unwrap();
        assert_eq!(tensor.shape(), &[1, 1, 28, 28]);
    }

    #[test]
    fn test_to_batch_tensor_shape() {
        let normalizer = DigitNormalizer::default();
        let samples = vec![vec![0u8; 784], vec![255u8; 784], vec![42u8; 784]];
        let tensor = normalizer.to_batch_tensor(&samples).unwrap();
        assert_eq!(tensor.shape(), &[3, 1, 28, 28]);
        assert!((tensor[[0, 0, 0, 0]] - 1.0).abs() < f32::EPSILON);
        assert!(tensor[[1, 0, 0, 0]].abs() < f32::EPSILON);
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(DigitNormalizer::new(0, 28).is_err());
        assert!(DigitNormalizer::new(28, 0).is_err());
    }
}
