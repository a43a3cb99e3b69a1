use sha2::{Digest, Sha256};
use thiserror::Error;

/// Identifies the backing implementation that powers an embedder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Hashing,
    Onnx,
    External,
}

/// Static metadata describing a particular embedder instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedderInfo {
    pub provider: ProviderKind,
    pub embedding_model_id: String,
    pub dimension: usize,
    pub text_repr_version: String,
}

/// Errors that can be produced by embedder operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmbedderError {
    #[error("invalid embedder configuration: {message}")]
    InvalidConfiguration { message: String },
    #[error("input text exceeds max length of {max_length} characters, actual length: {actual_length}")]
    InputTooLong {
        max_length: usize,
        actual_length: usize,
    },
    #[error("provider failure: {message}")]
    ProviderFailure { message: String },
}

/// Core interface for all embedder implementations.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedderError>;
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedderError>;
    fn info(&self) -> &EmbedderInfo;
}

/// Configuration for [`HashingEmbedder`].
#[derive(Debug, Clone)]
pub struct HashingConfig {
    pub dimension: usize,
    /// Longest accepted input in characters; `None` accepts anything
    pub max_input_length: Option<usize>,
    pub embedding_model_id: String,
    pub text_repr_version: String,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            dimension: 384,
            max_input_length: None,
            embedding_model_id: "hashing-bow".to_string(),
            text_repr_version: "v1".to_string(),
        }
    }
}

/// Deterministic bag-of-words embedder.
///
/// Every lowercased alphanumeric token is hashed (SHA-256) into one of
/// `dimension` buckets with a hash-derived sign; the vector is
/// L2-normalized. Texts sharing vocabulary get a positive cosine
/// similarity, but synonyms score zero: this is the no-model fallback, the
/// semantic provider is [`OnnxEmbedder`](super::OnnxEmbedder). Output
/// depends only on the input text and is the same on every platform.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    info: EmbedderInfo,
    max_input_length: Option<usize>,
}

impl HashingEmbedder {
    pub fn new(config: HashingConfig) -> Result<Self, EmbedderError> {
        if config.dimension == 0 {
            return Err(EmbedderError::InvalidConfiguration {
                message: "dimension must be greater than zero".into(),
            });
        }

        if config.max_input_length == Some(0) {
            return Err(EmbedderError::InvalidConfiguration {
                message: "max_input_length must be greater than zero".into(),
            });
        }

        let info = EmbedderInfo {
            provider: ProviderKind::Hashing,
            embedding_model_id: config.embedding_model_id,
            dimension: config.dimension,
            text_repr_version: config.text_repr_version,
        };

        Ok(Self {
            info,
            max_input_length: config.max_input_length,
        })
    }

    fn validate_length(&self, text: &str) -> Result<(), EmbedderError> {
        let Some(max_length) = self.max_input_length else {
            return Ok(());
        };
        let actual_length = text.chars().count();
        if actual_length > max_length {
            return Err(EmbedderError::InputTooLong {
                max_length,
                actual_length,
            });
        }
        Ok(())
    }

    fn generate_embedding(&self, text: &str) -> Vec<f32> {
        let dimension = self.info.dimension;
        let mut output = vec![0f32; dimension];

        for token in tokenize(text) {
            let hash = token_hash(&token);
            let bucket = (hash % dimension as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            output[bucket] += sign;
        }

        let norm = output.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut output {
                *value /= norm;
            }
        }
        output
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self {
            info: EmbedderInfo {
                provider: ProviderKind::Hashing,
                embedding_model_id: "hashing-bow".to_string(),
                dimension: 384,
                text_repr_version: "v1".to_string(),
            },
            max_input_length: None,
        }
    }
}

impl Embedder for HashingEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedderError> {
        self.validate_length(text)?;
        Ok(self.generate_embedding(text))
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedderError> {
        texts
            .iter()
            .map(|text| self.embed(text))
            .collect::<Result<Vec<_>, _>>()
    }

    fn info(&self) -> &EmbedderInfo {
        &self.info
    }
}

/// First eight bytes of the token's SHA-256 digest, little endian.
fn token_hash(token: &str) -> u64 {
    let digest = Sha256::digest(token.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(head)
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

/// Cosine similarity of two vectors; zero when either has no length.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashing_embedder_is_deterministic_and_normalized() {
        let embedder = HashingEmbedder::default();
        let a = embedder.embed("Travel planner for a group of friends").unwrap();
        let b = embedder.embed("Travel planner for a group of friends").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 384);
        let norm = a.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_token_buckets_are_fixed() {
        let embedder = HashingEmbedder::default();
        let trip = embedder.embed("Trip").unwrap();
        assert_eq!(trip[180], -1.0);
        assert_eq!(trip.iter().filter(|v| **v != 0.0).count(), 1);

        let beach = embedder.embed("beach").unwrap();
        assert_eq!(beach[171], 1.0);
    }

    #[test]
    fn test_shared_vocabulary_scores_higher() {
        let embedder = HashingEmbedder::default();
        let query = embedder.embed("plan a trip to the coast").unwrap();
        let close = embedder.embed("Coastal trip: plan your days on the coast").unwrap();
        let far = embedder.embed("Quarterly revenue grew by four percent").unwrap();
        assert!(cosine_similarity(&query, &close) > cosine_similarity(&query, &far));
    }

    #[test]
    fn test_case_and_punctuation_are_ignored() {
        let embedder = HashingEmbedder::default();
        let a = embedder.embed("Hello, World!").unwrap();
        let b = embedder.embed("hello world").unwrap();
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_text_gives_zero_vector() {
        let embedder = HashingEmbedder::default();
        let v = embedder.embed("").unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
        assert_eq!(cosine_similarity(&v, &v), 0.0);
    }

    #[test]
    fn test_invalid_configuration() {
        let err = HashingEmbedder::new(HashingConfig {
            dimension: 0,
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, EmbedderError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_input_too_long() {
        let embedder = HashingEmbedder::new(HashingConfig {
            max_input_length: Some(5),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            embedder.embed("abcdefg"),
            Err(EmbedderError::InputTooLong {
                max_length: 5,
                actual_length: 7
            })
        );
    }

    #[test]
    fn test_embed_batch_matches_single() {
        let embedder = HashingEmbedder::default();
        let batch = embedder.embed_batch(&["one", "two"]).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[1], embedder.embed("two").unwrap());
        assert_eq!(embedder.info().dimension, 384);
    }
}
