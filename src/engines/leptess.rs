//! Leptess/Tesseract engine implementation
//!
//! Tesseract-based OCR engine. Handles mixed-language menus ("eng+tur")
//! and noisy phone photos better than ocrs. Uses tesseract-static for static
//! linking; tessdata is downloaded on first use unless a directory is given.

use super::support;
use crate::config::Config;
use crate::engine::{OcrEngine, OcrResult};
use crate::error::MenuError;
use crate::preprocess::{self, Preset};
use image::DynamicImage;
use std::path::Path;
use tesseract_static::tesseract::Tesseract;

/// Tesseract OCR Engine
pub struct LeptessEngine {
    tessdata_path: String,
    /// Tesseract language spec, e.g. "eng+tur"
    language: String,
    languages: Vec<String>,
    preset: Preset,
}

impl LeptessEngine {
    pub fn new(config: &Config) -> Result<Self, MenuError> {
        let languages = config.ocr_languages();
        if languages.is_empty() {
            return Err(MenuError::InitializationError(
                "No OCR language configured".to_string(),
            ));
        }

        let tessdata_dir = match &config.tessdata_path {
            Some(dir) => dir.clone(),
            None => {
                let dir = support::cache_dir().join("tessdata");
                for language in &languages {
                    support::ensure_downloaded(
                        &tessdata_url(language),
                        &dir,
                        &format!("{}.traineddata", language),
                    )?;
                }
                dir
            }
        };

        let tessdata_path = tessdata_dir
            .to_str()
            .map(str::to_string)
            .ok_or_else(|| MenuError::InitializationError("Invalid tessdata path".to_string()))?;
        let language = languages.join("+");

        // Fail at startup rather than on the first request
        Tesseract::new(Some(&tessdata_path), Some(&language)).map_err(|e| {
            MenuError::InitializationError(format!("Failed to initialize Tesseract: {}", e))
        })?;

        tracing::info!(
            "Leptess engine initialized (tessdata: {}, language: {})",
            tessdata_path,
            language
        );

        Ok(Self {
            tessdata_path,
            language,
            languages,
            preset: config.preprocess,
        })
    }

    fn recognize_image(&self, img: DynamicImage) -> Result<OcrResult, MenuError> {
        let img = preprocess::apply(img, self.preset)?;
        let (width, height) = (img.width(), img.height());

        // BMP is always readable by leptonica
        let mut bmp_data = Vec::new();
        img.to_rgb8()
            .write_to(&mut std::io::Cursor::new(&mut bmp_data), image::ImageFormat::Bmp)
            .map_err(|e| MenuError::ProcessingError(format!("Failed to convert to BMP: {}", e)))?;

        tracing::debug!(
            "Processing image: {}x{}, BMP size: {} bytes",
            width,
            height,
            bmp_data.len()
        );

        let mut tess = Tesseract::new(Some(&self.tessdata_path), Some(&self.language))
            .map_err(|e| MenuError::ProcessingError(format!("Failed to create Tesseract: {}", e)))?
            .set_image_from_mem(&bmp_data)
            .map_err(|e| MenuError::ProcessingError(format!("Failed to set image: {}", e)))?
            .recognize()
            .map_err(|e| MenuError::ProcessingError(format!("Failed to recognize text: {}", e)))?;

        let text = tess
            .get_text()
            .map_err(|e| MenuError::ProcessingError(format!("Failed to get text: {}", e)))?;

        // Tesseract reports 0-100
        let confidence = tess.mean_text_conf() as f32 / 100.0;

        Ok(OcrResult {
            text: text.trim().to_string(),
            confidence: Some(confidence),
            warnings: Vec::new(),
        })
    }
}

impl OcrEngine for LeptessEngine {
    fn name(&self) -> &'static str {
        "leptess"
    }

    fn description(&self) -> &'static str {
        "Tesseract OCR engine - multi-language, better for noisy phone photos"
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
        self.languages.clone()
    }
}

/// tessdata_fast keeps downloads small
fn tessdata_url(language: &str) -> String {
    format!(
        "https://github.com/tesseract-ocr/tessdata_fast/raw/main/{}.traineddata",
        language
    )
}
