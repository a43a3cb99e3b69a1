//! JSON rendering for outlines and section reports.

use serde::Serialize;

use crate::error::{Error, Result};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with two-space indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize any result type to JSON. Non-ASCII text is written as is.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeadingCandidate, HeadingLevel, Outline};

    fn outline() -> Outline {
        Outline {
            title: "实验报告".to_string(),
            outline: vec![HeadingCandidate::new(HeadingLevel::H1, "Chapter 1", 2)],
        }
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&outline(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\": \"实验报告\""));
        assert!(json.contains("\n  \"outline\""));
        assert!(json.contains("\"level\": \"H1\""));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&outline(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert_eq!(
            json,
            r#"{"title":"实验报告","outline":[{"level":"H1","text":"Chapter 1","page":2}]}"#
        );
    }

    #[test]
    fn test_to_json_is_stable() {
        assert_eq!(
            to_json(&outline(), JsonFormat::Pretty).unwrap(),
            to_json(&outline(), JsonFormat::Pretty).unwrap()
        );
    }
}
