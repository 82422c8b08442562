/// Split raw OCR text into trimmed lines, top to bottom.
///
/// Blank lines are kept (as empty strings) so later stages see the same
/// positions the document had; the noise filter drops them.
pub fn split_lines(raw_text: &str) -> Vec<String> {
    raw_text
        .lines()
        .map(|line| line.trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_trims_and_preserves_order() {
        let lines = split_lines("  Soup of the day \n\tGrilled Salmon\n\nDessert  ");
        assert_eq!(lines, vec!["Soup of the day", "Grilled Salmon", "", "Dessert"]);
    }

    #[test]
    fn test_handles_crlf() {
        let lines = split_lines("Köfte\r\nPilav\r\n");
        assert_eq!(lines, vec!["Köfte", "Pilav"]);
    }

    #[test]
    fn test_keeps_original_case() {
        assert_eq!(split_lines("MENÜ"), vec!["MENÜ"]);
    }
}
