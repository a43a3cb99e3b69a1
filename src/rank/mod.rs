//! Persona-driven section ranking.
//!
//! Documents are cut into sections with the section profile, embedded
//! through an [`Embedder`] and ordered by cosine similarity to the
//! persona and task. [`OnnxEmbedder`] runs a sentence-transformer model
//! such as all-MiniLM-L6-v2; [`HashingEmbedder`] is the deterministic
//! fallback when no model is available.

mod embedder;
mod onnx;
mod ranker;
mod sections;

pub use embedder::{
    cosine_similarity, Embedder, EmbedderError, EmbedderInfo, HashingConfig, HashingEmbedder,
    ProviderKind,
};
pub use onnx::{
    OnnxConfig, OnnxEmbedder, MINILM_DIMENSION, MINILM_MAX_TOKENS, MINILM_MODEL_ID,
};
pub use ranker::{Ranker, REFINED_TEXT_CHARS, REPORT_LIMIT, TIMESTAMP_FORMAT};
pub use sections::extract_sections;
