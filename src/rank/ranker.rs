//! Relevance scoring of sections against a persona and a task.

use chrono::Local;

use super::embedder::{cosine_similarity, Embedder, HashingEmbedder};
use crate::error::Result;
use crate::model::{RankedSection, ReportMetadata, ScoredSection, Section, SectionReport};

/// Number of sections kept in a report.
pub const REPORT_LIMIT: usize = 10;

/// Characters of page text kept per reported section.
pub const REFINED_TEXT_CHARS: usize = 1000;

/// Format of the report timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Scores sections with an [`Embedder`].
#[derive(Debug, Clone, Default)]
pub struct Ranker<E = HashingEmbedder> {
    embedder: E,
}

impl<E: Embedder> Ranker<E> {
    /// Create a ranker backed by an embedder.
    pub fn new(embedder: E) -> Self {
        Self { embedder }
    }

    /// The embedder in use.
    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    /// Score every section against `persona` and `job`, best first.
    ///
    /// Equal scores keep their input order.
    pub fn rank(&self, persona: &str, job: &str, sections: Vec<Section>) -> Result<Vec<ScoredSection>> {
        let query = self.embedder.embed(&format!("{} {}", persona, job))?;

        let texts: Vec<String> = sections
            .iter()
            .map(|s| format!("{} {}", s.title, s.content))
            .collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let vectors = self.embedder.embed_batch(&refs)?;

        let mut scored: Vec<ScoredSection> = sections
            .into_iter()
            .zip(vectors)
            .map(|(section, vector)| ScoredSection {
                score: cosine_similarity(&query, &vector),
                section,
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        log::debug!(
            "Ranked {} sections with {}",
            scored.len(),
            self.embedder.info().embedding_model_id
        );
        Ok(scored)
    }

    /// Rank sections and build the report in one go.
    pub fn report(
        &self,
        input_documents: Vec<String>,
        persona: &str,
        job: &str,
        sections: Vec<Section>,
    ) -> Result<SectionReport> {
        let scored = self.rank(persona, job, sections)?;
        let metadata = ReportMetadata::now(input_documents, persona, job);
        Ok(SectionReport::build(metadata, scored))
    }
}

impl ReportMetadata {
    /// Metadata stamped with the current local time.
    pub fn now(input_documents: Vec<String>, persona: &str, job: &str) -> Self {
        Self {
            input_documents,
            persona: persona.to_string(),
            job_to_be_done: job.to_string(),
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

impl SectionReport {
    /// Keep the best sections of an already sorted list.
    pub fn build(metadata: ReportMetadata, scored: Vec<ScoredSection>) -> Self {
        let sections = scored
            .into_iter()
            .take(REPORT_LIMIT)
            .enumerate()
            .map(|(i, s)| RankedSection {
                document: s.section.document,
                page: s.section.page,
                section_title: s.section.title,
                importance_rank: i + 1,
                score: round_score(s.score),
                refined_text: s.section.content.chars().take(REFINED_TEXT_CHARS).collect(),
            })
            .collect();

        Self { metadata, sections }
    }
}

fn round_score(score: f32) -> f64 {
    (f64::from(score) * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::embedder::{EmbedderError, EmbedderInfo, ProviderKind};

    fn section(title: &str, content: &str) -> Section {
        Section {
            document: "guide.pdf".to_string(),
            page: 1,
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_rank_orders_by_relevance() {
        let ranker = Ranker::<HashingEmbedder>::default();
        let scored = ranker
            .rank(
                "Travel Planner",
                "Plan a trip of 4 days for college friends",
                vec![
                    section("Tax Law", "Corporate tax obligations and filing deadlines."),
                    section("Trip Ideas", "Plan a trip with friends: days at the beach."),
                ],
            )
            .unwrap();
        assert_eq!(scored[0].section.title, "Trip Ideas");
        assert!(scored[0].score >= scored[1].score);
    }

    #[test]
    fn test_equal_scores_keep_input_order() {
        let ranker = Ranker::<HashingEmbedder>::default();
        let first = section("Overview", "same text");
        let mut second = first.clone();
        second.page = 2;
        let scored = ranker.rank("p", "j", vec![first, second]).unwrap();
        assert_eq!(scored[0].score, scored[1].score);
        assert_eq!(scored[0].section.page, 1);
    }

    #[test]
    fn test_report_limits_and_truncates() {
        let long = "word ".repeat(400);
        let scored: Vec<ScoredSection> = (0..14)
            .map(|i| ScoredSection {
                section: section(&format!("S{i}"), &long),
                score: 1.0 - i as f32 * 0.012_345,
            })
            .collect();
        let metadata = ReportMetadata::now(vec!["guide.pdf".into()], "p", "j");
        let report = SectionReport::build(metadata, scored);

        assert_eq!(report.sections.len(), REPORT_LIMIT);
        for (i, s) in report.sections.iter().enumerate() {
            assert_eq!(s.importance_rank, i + 1);
            assert!(s.refined_text.chars().count() <= REFINED_TEXT_CHARS);
        }
        assert_eq!(report.sections[0].refined_text.chars().count(), REFINED_TEXT_CHARS);
        assert_eq!(report.sections[1].score, 0.9877);
    }

    #[test]
    fn test_timestamp_format() {
        let metadata = ReportMetadata::now(Vec::new(), "p", "j");
        assert_eq!(metadata.timestamp.len(), 19);
        assert!(chrono::NaiveDateTime::parse_from_str(&metadata.timestamp, TIMESTAMP_FORMAT).is_ok());
    }

    struct FailingEmbedder(EmbedderInfo);

    impl Embedder for FailingEmbedder {
        fn embed(&self, _text: &str) -> std::result::Result<Vec<f32>, EmbedderError> {
            Err(EmbedderError::ProviderFailure {
                message: "offline".into(),
            })
        }
        fn embed_batch(&self, _texts: &[&str]) -> std::result::Result<Vec<Vec<f32>>, EmbedderError> {
            Err(EmbedderError::ProviderFailure {
                message: "offline".into(),
            })
        }
        fn info(&self) -> &EmbedderInfo {
            &self.0
        }
    }

    #[test]
    fn test_embedder_failure_propagates() {
        let ranker = Ranker::new(FailingEmbedder(EmbedderInfo {
            provider: ProviderKind::External,
            embedding_model_id: "remote".into(),
            dimension: 8,
            text_repr_version: "v1".into(),
        }));
        let err = ranker.rank("p", "j", vec![section("A", "b")]).unwrap_err();
        assert!(matches!(err, crate::Error::Embedding(_)));
    }

    /// Maps words to concepts, so synonyms share a dimension.
    struct ConceptEmbedder(EmbedderInfo);

    impl ConceptEmbedder {
        fn new() -> Self {
            Self(EmbedderInfo {
                provider: ProviderKind::External,
                embedding_model_id: "concepts".into(),
                dimension: 3,
                text_repr_version: "v1".into(),
            })
        }
    }

    impl Embedder for ConceptEmbedder {
        fn embed(&self, text: &str) -> std::result::Result<Vec<f32>, EmbedderError> {
            let mut v = vec![0.0; 3];
            for word in text.split_whitespace() {
                match word {
                    "physician" | "doctor" => v[0] += 1.0,
                    "heart" | "cardiology" => v[1] += 1.0,
                    "wood" | "furniture" => v[2] += 1.0,
                    _ => {}
                }
            }
            Ok(v)
        }
        fn embed_batch(&self, texts: &[&str]) -> std::result::Result<Vec<Vec<f32>>, EmbedderError> {
            texts.iter().map(|t| self.embed(t)).collect()
        }
        fn info(&self) -> &EmbedderInfo {
            &self.0
        }
    }

    #[test]
    fn test_semantic_embedder_beats_word_overlap() {
        let sections = vec![
            section("Workshop", "treating heart wood furniture"),
            section("Clinic", "doctor cardiology patients"),
        ];

        let lexical = Ranker::<HashingEmbedder>::default()
            .rank("physician", "treating heart disease", sections.clone())
            .unwrap();
        assert_eq!(lexical[0].section.title, "Workshop");

        let semantic = Ranker::new(ConceptEmbedder::new())
            .rank("physician", "treating heart disease", sections)
            .unwrap();
        assert_eq!(semantic[0].section.title, "Clinic");
        assert!(semantic[0].score > semantic[1].score);
    }
}
