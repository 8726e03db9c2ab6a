//! MNIST digit classification CLI.
//!
//! Loads `mnist/mnist.onnx` from a data directory, picks one of the sample
//! bitmaps `0.pgm`..`9.pgm` (random unless `--sample` is given), prints the
//! digit as ASCII art, and reports the model's prediction.
//!
//! Usage:
//! ```
//! mnist-classify <DATA_DIR> [--sample N] [--all] [--precision fp32|fp16|int8]
//! ```

use clap::Parser;
use mnist_classify::core::{ModelPrecision, OrtSessionConfig, init_tracing};
use mnist_classify::predictor::{DigitClassifier, DigitPrediction};
use mnist_classify::processors::render_digit;
use mnist_classify::utils::{load_digit_sample, load_digit_samples};
use rand::Rng;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Expected sample dimensions (height, width).
const INPUT_SHAPE: (usize, usize) = (28, 28);
/// Number of sample bitmaps shipped with the data directory.
const SAMPLE_COUNT: u8 = 10;

/// Command-line arguments for the digit classification CLI
#[derive(Parser)]
#[command(name = "mnist-classify")]
#[command(about = "Classifies MNIST digit bitmaps with an ONNX model")]
struct Args {
    /// Data directory containing mnist/mnist.onnx and sample bitmaps 0.pgm..9.pgm
    data_dir: PathBuf,

    /// Digit sample to classify (defaults to a random one)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=9))]
    sample: Option<u8>,

    /// Classify all ten samples in one batch
    #[arg(long, conflicts_with = "sample")]
    all: bool,

    /// Model precision mode
    #[arg(long, value_enum, default_value_t = ModelPrecision::Fp32)]
    precision: ModelPrecision,

    /// Optional JSON file with ONNX Runtime session settings
    #[arg(long)]
    ort_config: Option<PathBuf>,
}

fn load_ort_config(path: &Path) -> Result<OrtSessionConfig, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Prints the test case and its prediction, matching the layout of the
/// classifier's reference output.
fn report_prediction(sample: u8, prediction: &DigitPrediction) {
    println!("Test case: {sample}");
    match (prediction.digit(), prediction.confidence()) {
        (Some(digit), Some(score)) => {
            println!("Prediction: {digit}");
            debug!("confidence for sample {}: {:.4}", sample, score);
        }
        _ => error!("model returned no prediction for sample {}", sample),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let args = Args::parse();

    let mnist_dir = args.data_dir.join("mnist");
    let model_path = mnist_dir.join("mnist.onnx");
    if !model_path.exists() {
        error!("Model file not found: {}", model_path.display());
        return Err("model file not found".into());
    }

    let mut builder = DigitClassifier::builder()
        .input_shape(INPUT_SHAPE)
        .precision(args.precision);
    if let Some(path) = &args.ort_config {
        builder = builder.with_ort_config(load_ort_config(path)?);
    }
    let classifier = builder.build(&model_path)?;
    info!(
        "Loaded model '{}' ({} output classes)",
        classifier.model_name(),
        classifier
            .inference()
            .output_element_count()
            .map_or_else(|| "dynamic".to_string(), |n| n.to_string())
    );

    if args.all {
        let paths: Vec<PathBuf> = (0..SAMPLE_COUNT)
            .map(|n| mnist_dir.join(format!("{n}.pgm")))
            .collect();
        let samples = load_digit_samples(&paths, INPUT_SHAPE)?;
        let predictions = classifier.classify_batch(&samples)?;
        for (n, prediction) in predictions.iter().enumerate() {
            report_prediction(n as u8, prediction);
        }
    } else {
        let sample = args
            .sample
            .unwrap_or_else(|| rand::rng().random_range(0..SAMPLE_COUNT));
        let sample_path = mnist_dir.join(format!("{sample}.pgm"));
        let pixels = load_digit_sample(&sample_path, INPUT_SHAPE)?;

        println!("---------------------------");
        println!("{}", render_digit(&pixels, INPUT_SHAPE.1)?);
        let prediction = classifier.classify(&pixels)?;
        report_prediction(sample, &prediction);
    }

    Ok(())
}
