//! Outline assembly: two passes over a collected document.

use std::collections::HashSet;

use super::classifier::HeadingClassifier;
use super::config::{OutlineOrder, PipelineProfile};
use super::profile::FontProfile;
use super::title::provisional_title;
use crate::model::{HeadingCandidate, HeadingLevel, Outline};
use crate::parser::CollectedDocument;

/// Builds the outline of one document under a pipeline profile.
#[derive(Debug, Clone)]
pub struct OutlineAssembler {
    profile: PipelineProfile,
}

impl OutlineAssembler {
    /// Create an assembler for a profile.
    pub fn new(profile: PipelineProfile) -> Self {
        Self { profile }
    }

    /// The profile in use.
    pub fn profile(&self) -> &PipelineProfile {
        &self.profile
    }

    /// Profile the fonts of a document (first pass).
    pub fn font_profile(&self, doc: &CollectedDocument) -> FontProfile {
        FontProfile::for_pipeline(doc.spans(), &self.profile)
    }

    /// Run both passes and return title plus outline.
    pub fn assemble(&self, doc: &CollectedDocument) -> Outline {
        let fonts = self.font_profile(doc);
        let classifier = HeadingClassifier::new(&self.profile, &fonts);

        let mut title = doc
            .first_page()
            .and_then(|p| provisional_title(&p.spans))
            .unwrap_or_default();

        let mut seen: HashSet<String> = HashSet::new();
        if !title.is_empty() {
            seen.insert(title.clone());
        }

        let mut headings = Vec::new();
        for line in doc.lines() {
            if seen.contains(&line.text) {
                continue;
            }
            let Some(mut level) = classifier.classify(line) else {
                continue;
            };
            if level == HeadingLevel::Title {
                if title.is_empty() {
                    title = line.text.clone();
                    seen.insert(line.text.clone());
                    continue;
                }
                level = HeadingLevel::H1;
            }
            seen.insert(line.text.clone());
            headings.push(HeadingCandidate::new(level, line.text.clone(), line.page));
        }

        if title.is_empty() {
            if let Some(pos) = headings.iter().position(|h| h.level == HeadingLevel::H1) {
                title = headings.remove(pos).text;
            }
        }

        if self.profile.order == OutlineOrder::ByPage {
            headings.sort_by_key(|h| h.page);
        }

        log::debug!("Outline: {:?} with {} headings", title, headings.len());

        Outline {
            title,
            outline: headings,
        }
    }
}

impl Default for OutlineAssembler {
    fn default() -> Self {
        Self::new(PipelineProfile::outline())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Line, Span};
    use crate::parser::CollectedPage;

    /// One page per entry; each line is a single span.
    fn document(pages: &[&[(&str, &str, f32)]]) -> CollectedDocument {
        let pages = pages
            .iter()
            .enumerate()
            .map(|(i, lines)| {
                let number = i as u32 + 1;
                let mut page = CollectedPage::new(number);
                for (text, font, size) in lines.iter() {
                    let span = Span::new(*text, *font, *size, number);
                    page.lines
                        .push(Line::from_spans(std::slice::from_ref(&span), number).unwrap());
                    page.spans.push(span);
                }
                page
            })
            .collect();
        CollectedDocument::from_pages(pages)
    }

    const BODY: (&str, &str, f32) = ("plain body text, nothing more.", "Times", 10.0);

    #[test]
    fn test_title_is_never_in_outline() {
        let doc = document(&[
            &[("Annual Report", "Helvetica-Bold", 28.0), BODY, BODY],
            &[("Annual Report", "Helvetica-Bold", 28.0), ("Chapter 1", "Helvetica", 16.0), BODY],
        ]);
        let outline = OutlineAssembler::default().assemble(&doc);
        assert_eq!(outline.title, "Annual Report");
        assert!(outline.outline.iter().all(|h| h.text != "Annual Report"));
        assert_eq!(outline.len(), 1);
    }

    #[test]
    fn test_empty_first_page_promotes_heading() {
        let doc = document(&[&[], &[("Results", "Helvetica-Bold", 16.0), BODY, BODY]]);
        let outline = OutlineAssembler::default().assemble(&doc);
        assert_eq!(outline.title, "Results");
        assert!(outline.is_empty());
    }

    #[test]
    fn test_first_h1_becomes_title_when_none_found() {
        let doc = document(&[
            &[],
            &[
                ("PROGRAM 1", "Times", 10.0),
                BODY,
                ("PROGRAM 2", "Times", 10.0),
            ],
        ]);
        let outline = OutlineAssembler::default().assemble(&doc);
        assert_eq!(outline.title, "PROGRAM 1");
        assert_eq!(outline.outline, vec![HeadingCandidate::new(HeadingLevel::H1, "PROGRAM 2", 2)]);
    }

    #[test]
    fn test_repeated_heading_kept_once() {
        let doc = document(&[
            &[("Manual", "Helvetica-Bold", 30.0), BODY],
            &[("Chapter 1", "Helvetica", 16.0), BODY],
            &[("Chapter 1", "Helvetica", 16.0), BODY],
            &[("Chapter 1", "Helvetica", 16.0), BODY],
        ]);
        let outline = OutlineAssembler::default().assemble(&doc);
        let chapters: Vec<_> = outline
            .outline
            .iter()
            .filter(|h| h.text == "Chapter 1")
            .collect();
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].page, 2);
    }

    #[test]
    fn test_second_title_level_line_is_demoted() {
        let doc = document(&[
            &[("Annual Report", "Helvetica-Bold", 28.0), BODY],
            &[("Financial Summary", "Helvetica-Bold", 28.0), BODY],
        ]);
        let outline = OutlineAssembler::default().assemble(&doc);
        assert_eq!(outline.title, "Annual Report");
        assert_eq!(
            outline.outline,
            vec![HeadingCandidate::new(HeadingLevel::H1, "Financial Summary", 2)]
        );
        assert_eq!(outline.headings_at(HeadingLevel::Title).count(), 0);
    }

    #[test]
    fn test_lab_manual_levels() {
        let doc = document(&[
            &[("Data Structures Lab", "Arial-Bold", 24.0), BODY],
            &[
                ("PROGRAM 3", "Arial-Bold", 14.0),
                ("AIM", "Arial-Bold", 12.0),
                BODY,
                ("INTRODUCTION TO ALGORITHMS", "Arial-Bold", 11.0),
                BODY,
            ],
        ]);
        let outline = OutlineAssembler::default().assemble(&doc);
        let levels: Vec<_> = outline.outline.iter().map(|h| (h.text.as_str(), h.level)).collect();
        assert_eq!(
            levels,
            vec![
                ("PROGRAM 3", HeadingLevel::H1),
                ("AIM", HeadingLevel::H2),
                ("INTRODUCTION TO ALGORITHMS", HeadingLevel::H3),
            ]
        );
    }

    #[test]
    fn test_sections_profile_keeps_encounter_order() {
        let doc = document(&[
            &[("Guide", "Helvetica-Bold", 24.0), ("Overview", "Helvetica", 16.0), BODY],
            &[("Details", "Helvetica", 16.0), BODY],
        ]);
        let outline = OutlineAssembler::new(PipelineProfile::sections()).assemble(&doc);
        assert_eq!(outline.title, "Guide");
        let texts: Vec<_> = outline.outline.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["Overview", "Details"]);
        assert!(outline.outline.iter().all(|h| h.level != HeadingLevel::Title));
    }

    #[test]
    fn test_pages_within_document_range() {
        let doc = document(&[
            &[("Report", "Helvetica-Bold", 24.0), BODY],
            &[("1 Scope", "Helvetica", 14.0), BODY],
            &[("2 Method", "Helvetica", 14.0), BODY],
        ]);
        let outline = OutlineAssembler::default().assemble(&doc);
        assert!(!outline.is_empty());
        for heading in &outline.outline {
            assert!(heading.page >= 1 && heading.page <= doc.page_count());
        }
    }
}
