use super::MenuItem;

/// Number the filtered lines 1..=n in order of appearance.
/// Duplicates stay as separate items.
pub fn build_items(lines: Vec<String>) -> Vec<MenuItem> {
    lines
        .into_iter()
        .zip(1u32..)
        .map(|(description, id)| MenuItem {
            id,
            description,
            translated_description: None,
        })
        .collect()
}
