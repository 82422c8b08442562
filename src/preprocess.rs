//! Image preprocessing for menu photos
//!
//! Phone pictures of menus are usually large, colored and unevenly lit.
//! The default preset flattens them to grayscale, brings the size into a
//! range the recognizers handle well, and equalizes the histogram.

use crate::error::MenuError;
use clap::ValueEnum;
use image::{imageops::FilterType, DynamicImage, GenericImageView};

/// Longest side above this is scaled down
const MAX_DIMENSION: u32 = 4000;
/// Longest side below this is scaled up
const MIN_DIMENSION: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Preset {
    /// Hand the image to the engine untouched
    None,
    /// Grayscale, resize, histogram equalization
    #[default]
    Default,
}

pub fn apply(image: DynamicImage, preset: Preset) -> Result<DynamicImage, MenuError> {
    match preset {
        Preset::None => Ok(image),
        Preset::Default => {
            let (width, height) = image.dimensions();
            if width == 0 || height == 0 {
                return Err(MenuError::PreprocessingError(
                    "Image has no pixels".to_string(),
                ));
            }

            let gray = resize(image).to_luma8();
            let equalized = imageproc::contrast::equalize_histogram(&gray);
            Ok(DynamicImage::ImageLuma8(equalized))
        }
    }
}

fn resize(image: DynamicImage) -> DynamicImage {
    let (width, height) = image.dimensions();
    let longest = width.max(height);

    let target = if longest > MAX_DIMENSION {
        MAX_DIMENSION
    } else if longest < MIN_DIMENSION {
        MIN_DIMENSION
    } else {
        return image;
    };

    let scale = target as f32 / longest as f32;
    let new_width = ((width as f32 * scale).round() as u32).max(1);
    let new_height = ((height as f32 * scale).round() as u32).max(1);

    image.resize(new_width, new_height, FilterType::Lanczos3)
}
