//! Menu extraction pipeline
//!
//! Turns the raw text produced by an OCR engine into an ordered list of menu
//! items: lines are split and trimmed, boilerplate is dropped by the noise
//! filter, and the survivors are numbered in reading order.

pub mod builder;
pub mod filter;
pub mod normalize;

pub use builder::build_items;
pub use filter::{FilterRules, NoiseFilter};
pub use normalize::split_lines;

use serde::{Deserialize, Serialize};

/// One structured record derived from a single surviving OCR line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: u32,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_description: Option<String>,
}

/// Run the whole pipeline over raw OCR output
pub fn extract_menu_items(raw_text: &str, filter: &NoiseFilter) -> Vec<MenuItem> {
    let lines = split_lines(raw_text);
    let line_count = lines.len();
    let kept = filter.apply(lines);

    tracing::debug!(
        "Menu extraction kept {} of {} lines",
        kept.len(),
        line_count
    );

    build_items(kept)
}
