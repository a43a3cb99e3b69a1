//! Document title resolution.

use crate::model::Span;

/// Pick the provisional title from the spans of the first page.
///
/// The largest span wins, compared by raw size. Equal sizes are broken by
/// text, greatest first. Returns `None` when the page has no text.
pub fn provisional_title(first_page: &[Span]) -> Option<String> {
    first_page
        .iter()
        .filter(|s| !s.text.trim().is_empty())
        .max_by(|a, b| {
            a.size
                .total_cmp(&b.size)
                .then_with(|| a.text.cmp(&b.text))
        })
        .map(|s| s.text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_largest_span_wins() {
        let spans = vec![
            Span::new("Body text", "Times", 10.0, 1),
            Span::new("Annual Report 2024", "Times-Bold", 26.5, 1),
            Span::new("Subtitle", "Times", 18.0, 1),
        ];
        assert_eq!(provisional_title(&spans).as_deref(), Some("Annual Report 2024"));
    }

    #[test]
    fn test_raw_size_beats_rounded_size() {
        let spans = vec![
            Span::new("Left", "Times", 20.2, 1),
            Span::new("Right", "Times", 20.4, 1),
        ];
        assert_eq!(provisional_title(&spans).as_deref(), Some("Right"));
    }

    #[test]
    fn test_size_tie_takes_greatest_text() {
        let spans = vec![
            Span::new("Alpha", "Times", 20.0, 1),
            Span::new("Omega", "Times", 20.0, 1),
            Span::new("Beta", "Times", 20.0, 1),
        ];
        assert_eq!(provisional_title(&spans).as_deref(), Some("Omega"));
    }

    #[test]
    fn test_empty_page_has_no_title() {
        assert_eq!(provisional_title(&[]), None);
        assert_eq!(provisional_title(&[Span::new(" ", "Times", 30.0, 1)]), None);
    }
}
