//! OCRS engine implementation
//!
//! Pure Rust OCR engine using the ocrs library. No system dependencies required.
//! Downloads neural network models automatically on first use. Latin script
//! only, which covers English and Turkish menus.

use super::support;
use crate::config::Config;
use crate::engine::{OcrEngine, OcrResult};
use crate::error::MenuError;
use crate::preprocess::{self, Preset};
use image::DynamicImage;
use ocrs::{DecodeMethod, ImageSource, OcrEngine as OcrsOcrEngine, OcrEngineParams};
use rten::Model;
use std::path::Path;

/// Default model URLs from the ocrs project
const DETECTION_MODEL_URL: &str =
    "https://ocrs-models.s3-accelerate.amazonaws.com/text-detection.rten";
const RECOGNITION_MODEL_URL: &str =
    "https://ocrs-models.s3-accelerate.amazonaws.com/text-recognition.rten";

/// OCR Engine wrapping the ocrs library
pub struct OcrsEngine {
    engine: OcrsOcrEngine,
    preset: Preset,
}

impl OcrsEngine {
    /// Load (downloading on first use) the detection and recognition models
    pub fn new(config: &Config) -> Result<Self, MenuError> {
        let model_dir = support::cache_dir();
        let detection_path =
            support::ensure_downloaded(DETECTION_MODEL_URL, &model_dir, "text-detection.rten")?;
        let recognition_path =
            support::ensure_downloaded(RECOGNITION_MODEL_URL, &model_dir, "text-recognition.rten")?;

        let detection_model = Model::load_file(&detection_path).map_err(|e| {
            MenuError::InitializationError(format!("Failed to load detection model: {}", e))
        })?;
        let recognition_model = Model::load_file(&recognition_path).map_err(|e| {
            MenuError::InitializationError(format!("Failed to load recognition model: {}", e))
        })?;

        let engine = OcrsOcrEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            decode_method: DecodeMethod::Greedy,
            ..Default::default()
        })
        .map_err(|e| {
            MenuError::InitializationError(format!("Failed to create OCR engine: {}", e))
        })?;

        tracing::info!("ocrs engine ready (preprocess: {:?})", config.preprocess);

        Ok(Self {
            engine,
            preset: config.preprocess,
        })
    }

    fn recognize_image(&self, img: DynamicImage) -> Result<OcrResult, MenuError> {
        let img = preprocess::apply(img, self.preset)?;

        // ImageSource::from_bytes expects HWC RGB
        let rgb_img = img.into_rgb8();
        let dimensions = rgb_img.dimensions();
        let img_source = ImageSource::from_bytes(rgb_img.as_raw(), dimensions).map_err(|e| {
            MenuError::ProcessingError(format!("Failed to create image source: {}", e))
        })?;

        let ocr_input = self
            .engine
            .prepare_input(img_source)
            .map_err(|e| MenuError::ProcessingError(format!("Failed to prepare input: {}", e)))?;

        let word_rects = self
            .engine
            .detect_words(&ocr_input)
            .map_err(|e| MenuError::ProcessingError(format!("Failed to detect words: {}", e)))?;

        let line_rects = self.engine.find_text_lines(&ocr_input, &word_rects);

        let line_texts = self
            .engine
            .recognize_text(&ocr_input, &line_rects)
            .map_err(|e| MenuError::ProcessingError(format!("Failed to recognize text: {}", e)))?;

        // One output line per detected text line so each dish stays separate
        let text = line_texts
            .iter()
            .flatten()
            .map(|line| {
                line.words()
                    .map(|word| word.to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n");

        Ok(OcrResult {
            text,
            confidence: None,
            warnings: Vec::new(),
        })
    }
}

impl OcrEngine for OcrsEngine {
    fn name(&self) -> &'static str {
        "ocrs"
    }

    fn description(&self) -> &'static str {
        "Pure Rust OCR engine - fast, no system dependencies required"
    }

    fn recognize(&self, path: &Path) -> Result<OcrResult, MenuError> {
        if support::is_pdf(path)? {
            return support::pdf_text(path);
        }

        self.recognize_image(support::load_image(path)?)
    }

    fn supported_formats(&self) -> Vec<String> {
        [
            "image/png",
            "image/jpeg",
            "image/gif",
            "image/bmp",
            "image/webp",
            "image/tiff",
            "application/pdf",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn supported_languages(&self) -> Vec<String> {
        // Latin alphabet recognition model
        vec!["eng".to_string(), "tur".to_string()]
    }
}
