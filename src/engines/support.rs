//! Helpers shared by the OCR engines: PDF handling, image loading and
//! model/tessdata downloads.

use crate::engine::OcrResult;
use crate::error::MenuError;
use image::DynamicImage;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Text layers shorter than this are treated as absent
const MIN_PDF_TEXT_CHARS: usize = 10;

/// Check if a file is a PDF by its extension or magic bytes
pub fn is_pdf(path: &Path) -> Result<bool, MenuError> {
    if let Some(ext) = path.extension() {
        if ext.to_string_lossy().eq_ignore_ascii_case("pdf") {
            return Ok(true);
        }
    }

    let mut file = File::open(path)
        .map_err(|e| MenuError::ProcessingError(format!("Failed to open file: {}", e)))?;

    let mut magic = [0u8; 5];
    if file.read_exact(&mut magic).is_ok() {
        return Ok(&magic == b"%PDF-");
    }

    Ok(false)
}

/// Read the embedded text layer of a PDF menu
pub fn pdf_text(path: &Path) -> Result<OcrResult, MenuError> {
    let text = pdf_extract::extract_text(path)
        .map_err(|e| MenuError::ProcessingError(format!("Failed to parse PDF: {}", e)))?;

    let trimmed = text.trim();
    if trimmed.chars().count() > MIN_PDF_TEXT_CHARS {
        tracing::info!("Extracted {} chars of text directly from PDF", trimmed.len());
        return Ok(OcrResult {
            text: trimmed.to_string(),
            confidence: Some(0.95),
            warnings: Vec::new(),
        });
    }

    tracing::warn!("PDF has no usable text layer");
    Ok(OcrResult {
        text: String::new(),
        confidence: None,
        warnings: vec![
            "PDF has no text layer; upload a photo of the menu instead".to_string(),
        ],
    })
}

/// Decode an image, sniffing the format from its contents
pub fn load_image(path: &Path) -> Result<DynamicImage, MenuError> {
    image::ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| MenuError::ProcessingError(format!("Failed to open image: {}", e)))?
        .decode()
        .map_err(|e| MenuError::ProcessingError(format!("Failed to decode image: {}", e)))
}

/// Per-user cache directory for downloaded models
pub fn cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("menu-ocr-server")
}

/// Download `url` into `dir/filename` unless it is already there
pub fn ensure_downloaded(url: &str, dir: &Path, filename: &str) -> Result<PathBuf, MenuError> {
    std::fs::create_dir_all(dir).map_err(|e| {
        MenuError::InitializationError(format!("Failed to create {}: {}", dir.display(), e))
    })?;

    let path = dir.join(filename);
    if path.exists() {
        tracing::info!("Using cached {:?}", path);
        return Ok(path);
    }

    tracing::info!("Downloading {} (this may take a moment)...", filename);
    download_file(url, &path)?;
    tracing::info!("Downloaded {} to {:?}", filename, path);

    Ok(path)
}

fn download_file(url: &str, path: &Path) -> Result<(), MenuError> {
    let response = ureq::get(url)
        .call()
        .map_err(|e| MenuError::InitializationError(format!("Failed to download {}: {}", url, e)))?;

    let buffer = response.into_body().read_to_vec().map_err(|e| {
        MenuError::InitializationError(format!("Failed to read download body: {}", e))
    })?;

    // Write to a sibling first so an interrupted download never looks cached
    let partial = path.with_extension("part");
    let mut file = File::create(&partial).map_err(|e| {
        MenuError::InitializationError(format!("Failed to create {}: {}", partial.display(), e))
    })?;
    file.write_all(&buffer).map_err(|e| {
        MenuError::InitializationError(format!("Failed to write {}: {}", partial.display(), e))
    })?;

    std::fs::rename(&partial, path).map_err(|e| {
        MenuError::InitializationError(format!("Failed to move {}: {}", path.display(), e))
    })
}
