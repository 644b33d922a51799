//! Text cleanup.

use once_cell::sync::Lazy;
use regex::Regex;

static LIST_DELIMITERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,;•\n]+").unwrap());

/// Collapse every run of whitespace to one space and trim.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cleaned text, or `None` when the input is absent or blank.
pub fn clean_optional(text: Option<&str>) -> Option<String> {
    text.map(clean_text).filter(|t| !t.is_empty())
}

/// Split list-like text on `,` `;` `•` and newlines, cleaning each item and
/// keeping those longer than `min_len` characters.
pub fn split_list<S: AsRef<str>>(items: &[S], min_len: usize) -> Vec<String> {
    items
        .iter()
        .flat_map(|item| {
            LIST_DELIMITERS
                .split(item.as_ref())
                .map(clean_text)
                .collect::<Vec<_>>()
        })
        .filter(|item| item.chars().count() > min_len)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  Chief \n\n Stewardess\t needed "), "Chief Stewardess needed");
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text(" \n "), "");
    }

    #[test]
    fn test_clean_optional() {
        assert_eq!(clean_optional(Some(" M/Y  Aurora ")).as_deref(), Some("M/Y Aurora"));
        assert_eq!(clean_optional(Some("  ")), None);
        assert_eq!(clean_optional(None), None);
    }

    #[test]
    fn test_split_list_delimiters() {
        let items = ["STCW 95, ENG1 medical; Food Hygiene Level 2\n• Valid B1/B2".to_string()];
        assert_eq!(
            split_list(&items, 3),
            vec!["STCW 95", "ENG1 medical", "Food Hygiene Level 2", "Valid B1/B2"]
        );
    }

    #[test]
    fn test_split_list_drops_short_items() {
        let items = ["STCW, ENG1, PDSD, N/A, ok".to_string()];
        assert_eq!(split_list(&items, 3), vec!["STCW", "ENG1", "PDSD"]);
        assert_eq!(split_list(&items, 0).len(), 5);
    }

    #[test]
    fn test_split_list_multiple_items() {
        let items = vec!["Own cabin", "Rotation 2:2, Flights paid"];
        assert_eq!(
            split_list(&items, 0),
            vec!["Own cabin", "Rotation 2:2", "Flights paid"]
        );
    }
}
