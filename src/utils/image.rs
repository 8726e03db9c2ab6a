//! Grayscale bitmap loading for digit samples.
//!
//! Loads sample bitmaps (PGM or any format the `image` crate decodes),
//! flattens them to raw grayscale intensities, and validates their
//! dimensions against the model's input shape. Batch loading switches to
//! parallel processing above a threshold.

use crate::core::ClassifyError;
use image::GrayImage;
use rayon::prelude::*;
use std::path::Path;

/// Number of paths above which batch loading goes parallel.
const PARALLEL_LOAD_THRESHOLD: usize = 4;

/// Loads a bitmap from disk and converts it to 8-bit grayscale.
///
/// # Errors
///
/// Returns `ClassifyError::ImageLoad` if the file does not exist or cannot
/// be decoded.
pub fn load_gray_image(path: &Path) -> Result<GrayImage, ClassifyError> {
    let img = image::open(path)?;
    Ok(img.to_luma8())
}

/// Loads a digit sample as flattened grayscale intensities.
///
/// The decoded bitmap must match the expected (height, width); a sample of
/// any other size cannot be fed to the model and is rejected rather than
/// silently reshaped.
pub fn load_digit_sample(
    path: &Path,
    expected: (usize, usize),
) -> Result<Vec<u8>, ClassifyError> {
    let img = load_gray_image(path)?;
    let (width, height) = img.dimensions();
    if (height as usize, width as usize) != expected {
        return Err(ClassifyError::validation_error(
            "digit sample",
            "dimensions",
            &format!("{}x{}", expected.0, expected.1),
            &format!("{height}x{width}"),
        ));
    }
    Ok(img.into_raw())
}

/// Loads several digit samples, in parallel above a threshold.
///
/// # Errors
///
/// Fails on the first sample that cannot be loaded or has the wrong
/// dimensions.
pub fn load_digit_samples<P: AsRef<Path> + Send + Sync>(
    paths: &[P],
    expected: (usize, usize),
) -> Result<Vec<Vec<u8>>, ClassifyError> {
    if paths.len() > PARALLEL_LOAD_THRESHOLD {
        paths
            .par_iter()
            .map(|p| load_digit_sample(p.as_ref(), expected))
            .collect()
    } else {
        paths
            .iter()
            .map(|p| load_digit_sample(p.as_ref(), expected))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn write_test_bitmap(name: &str, width: u32, height: u32) -> std::path::PathBuf {
        let img = GrayImage::from_fn(width, height, |x, y| Luma([((x + y) % 256) as u8]));
        let path = std::env::temp_dir().join(format!("mnist-classify-{name}-{width}x{height}.png"));
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_missing_path_is_image_load_error() {
        let result = load_digit_sample(Path::new("no/such/sample.pgm"), (28, 28));
        assert!(matches!(result, Err(ClassifyError::ImageLoad(_))));
    }

    #[test]
    fn test_load_flattens_to_expected_length() {
        let path = write_test_bitmap("flatten", 28, 28);
        let pixels = load_digit_sample(&path, (28, 28)).unwrap();
        assert_eq!(pixels.len(), 784);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_wrong_dimensions_rejected() {
        let path = write_test_bitmap("wrong-dims", 32, 32);
        let result = load_digit_sample(&path, (28, 28));
        assert!(matches!(result, Err(ClassifyError::InvalidInput { .. })));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_batch_load_preserves_order() {
        let first = write_test_bitmap("batch-a", 28, 28);
        let second = write_test_bitmap("batch-b", 28, 28);
        let samples = load_digit_samples(&[&first, &second], (28, 28)).unwrap();
        assert_eq!(samples.len(), 2);
        assert!(samples.iter().all(|s| s.len() == 784));
        std::fs::remove_file(first).unwrap();
        std::fs::remove_file(second).unwrap();
    }

    #[test]
    fn test_batch_load_fails_on_missing_file() {
        let paths = [Path::new("no/such/0.pgm"), Path::new("no/such/1.pgm")];
        assert!(load_digit_samples(&paths, (28, 28)).is_err());
    }
}
