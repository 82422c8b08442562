use crate::error::MenuError;
use std::path::Path;

/// OCR processing result
#[derive(Debug, Clone, PartialEq)]
pub struct OcrResult {
    /// Recognized text, one menu line per text line
    pub text: String,
    /// Mean confidence in 0.0-1.0, when the engine reports one
    pub confidence: Option<f32>,
    pub warnings: Vec<String>,
}

/// Trait that all OCR engines must implement
pub trait OcrEngine: Send + Sync {
    /// Returns the engine identifier (e.g., "ocrs", "leptess")
    fn name(&self) -> &'static str;

    /// Returns a human-readable description of the engine
    fn description(&self) -> &'static str;

    /// Recognize the text of a menu photo or PDF
    fn recognize(&self, path: &Path) -> Result<OcrResult, MenuError>;

    /// Get supported MIME types
    fn supported_formats(&self) -> Vec<String>;

    /// Get supported languages
    fn supported_languages(&self) -> Vec<String>;
}
