//! Cutting documents into rankable sections.

use std::collections::HashMap;

use crate::heading::{extract_outline, PipelineProfile};
use crate::model::Section;
use crate::parser::{CollectedDocument, ExtractOptions};

/// One section per heading found under the section profile.
///
/// The content of a section is the trimmed text of the page its heading
/// sits on, so headings sharing a page share their content.
pub fn extract_sections(
    file_name: &str,
    doc: &CollectedDocument,
    options: &ExtractOptions,
) -> Vec<Section> {
    let profile = PipelineProfile::sections().with_language(options.language.as_str());
    let outline = extract_outline(doc, &profile);

    let mut page_texts: HashMap<u32, String> = HashMap::new();
    outline
        .outline
        .into_iter()
        .map(|heading| {
            let content = page_texts
                .entry(heading.page)
                .or_insert_with(|| doc.page_text(heading.page).unwrap_or_default().trim().to_string())
                .clone();
            Section {
                document: file_name.to_string(),
                page: heading.page,
                title: heading.text,
                content,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Line, Span};
    use crate::parser::CollectedPage;

    fn page(number: u32, lines: &[(&str, f32)]) -> CollectedPage {
        let mut page = CollectedPage::new(number);
        for (text, size) in lines {
            let font = if *size > 12.0 { "Helvetica-Bold" } else { "Times" };
            let span = Span::new(*text, font, *size, number);
            page.lines
                .push(Line::from_spans(std::slice::from_ref(&span), number).unwrap());
            page.spans.push(span);
        }
        page
    }

    #[test]
    fn test_sections_carry_page_text() {
        let doc = CollectedDocument::from_pages(vec![
            page(1, &[("City Guide", 24.0), ("welcome to the coast.", 10.0)]),
            page(
                2,
                &[
                    ("Restaurants", 16.0),
                    ("eat fresh fish by the harbour.", 10.0),
                    ("Nightlife", 16.0),
                ],
            ),
        ]);

        let sections = extract_sections("guide.pdf", &doc, &ExtractOptions::default());
        let titles: Vec<_> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Restaurants", "Nightlife"]);
        assert!(sections.iter().all(|s| s.document == "guide.pdf" && s.page == 2));
        assert_eq!(
            sections[0].content,
            "Restaurants\neat fresh fish by the harbour.\nNightlife"
        );
        assert_eq!(sections[0].content, sections[1].content);
    }

    #[test]
    fn test_no_headings_no_sections() {
        let doc = CollectedDocument::from_pages(vec![page(1, &[("just a sentence.", 10.0)])]);
        assert!(extract_sections("a.pdf", &doc, &ExtractOptions::default()).is_empty());
    }
}
