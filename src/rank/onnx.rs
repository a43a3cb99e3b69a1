//! Sentence embeddings from a local ONNX encoder.
//!
//! Built for `sentence-transformers/all-MiniLM-L6-v2` exported to ONNX
//! (`model.onnx` + `tokenizer.json`), and works with other BERT-style
//! encoders whose first output is `[batch, seq_len, hidden]`. Vectors are
//! mean-pooled over the attention mask and L2-normalized. Inputs longer
//! than `max_input_length` tokens are truncated.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use ndarray::Array2;
use ort::{session::Session, value::Tensor, Error as OrtError};
use tokenizers::{Encoding, Tokenizer, TruncationParams};

use super::embedder::{Embedder, EmbedderError, EmbedderInfo, ProviderKind};

/// Model id reported for the default MiniLM configuration.
pub const MINILM_MODEL_ID: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Hidden size of all-MiniLM-L6-v2.
pub const MINILM_DIMENSION: usize = 384;

/// Token window all-MiniLM-L6-v2 was trained with.
pub const MINILM_MAX_TOKENS: usize = 256;

/// Configuration for [`OnnxEmbedder`].
#[derive(Debug, Clone)]
pub struct OnnxConfig {
    pub model_path: PathBuf,
    pub tokenizer_path: PathBuf,
    /// ONNX Runtime shared library; `None` leaves the lookup to `ORT_DYLIB_PATH`
    pub runtime_library_path: Option<PathBuf>,
    pub dimension: usize,
    /// Longer inputs are truncated to this many tokens
    pub max_input_length: usize,
    /// Texts per session run
    pub batch_size: usize,
    pub embedding_model_id: String,
    pub text_repr_version: String,
}

impl OnnxConfig {
    /// all-MiniLM-L6-v2 settings for the given model and tokenizer files.
    pub fn minilm(model_path: impl Into<PathBuf>, tokenizer_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            tokenizer_path: tokenizer_path.into(),
            runtime_library_path: None,
            dimension: MINILM_DIMENSION,
            max_input_length: MINILM_MAX_TOKENS,
            batch_size: 32,
            embedding_model_id: MINILM_MODEL_ID.to_string(),
            text_repr_version: "v1".to_string(),
        }
    }

    /// all-MiniLM-L6-v2 settings for an exported model directory holding
    /// `tokenizer.json` and either `model.onnx` or `onnx/model.onnx`.
    pub fn minilm_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let nested = dir.join("onnx").join("model.onnx");
        let model = if !dir.join("model.onnx").exists() && nested.exists() {
            nested
        } else {
            dir.join("model.onnx")
        };
        Self::minilm(model, dir.join("tokenizer.json"))
    }

    /// Load the ONNX Runtime library from an explicit path.
    pub fn with_runtime_library(mut self, path: impl Into<PathBuf>) -> Self {
        self.runtime_library_path = Some(path.into());
        self
    }
}

/// Embedder running an ONNX model through the ONNX Runtime shared library.
#[derive(Debug)]
pub struct OnnxEmbedder {
    info: EmbedderInfo,
    session: Mutex<Session>,
    tokenizer: Arc<Tokenizer>,
    pad_id: i64,
    uses_token_types: bool,
    batch_size: usize,
}

#[derive(Debug)]
struct PreparedBatch {
    input_ids: Tensor<i64>,
    attention_mask: Tensor<i64>,
    token_type_ids: Tensor<i64>,
    attention_rows: Vec<Vec<i64>>,
}

static ORT_RUNTIME_PATH: OnceLock<PathBuf> = OnceLock::new();

impl OnnxEmbedder {
    pub fn new(config: OnnxConfig) -> Result<Self, EmbedderError> {
        if config.dimension == 0 {
            return Err(EmbedderError::InvalidConfiguration {
                message: "dimension must be greater than zero".into(),
            });
        }

        if config.max_input_length == 0 {
            return Err(EmbedderError::InvalidConfiguration {
                message: "max_input_length must be greater than zero".into(),
            });
        }

        if config.batch_size == 0 {
            return Err(EmbedderError::InvalidConfiguration {
                message: "batch_size must be greater than zero".into(),
            });
        }

        let model_path = resolve_existing_path(&config.model_path, "ONNX model")?;
        let tokenizer_path = resolve_existing_path(&config.tokenizer_path, "tokenizer config")?;

        if let Some(runtime) = &config.runtime_library_path {
            let runtime = resolve_existing_path(runtime, "ONNX Runtime shared library")?;
            ensure_ort_initialized(&runtime)?;
        }

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|err| map_tokenizer_error("load tokenizer", err))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: config.max_input_length,
                ..Default::default()
            }))
            .map_err(|err| map_tokenizer_error("configure truncation", err))?;

        let pad_id = pad_token_id(&tokenizer).ok_or_else(|| EmbedderError::InvalidConfiguration {
            message: format!(
                "tokenizer `{}` declares no padding token",
                tokenizer_path.display()
            ),
        })?;

        let session = Session::builder()
            .map_err(|err| map_ort_error("create session builder", err))?
            .commit_from_file(&model_path)
            .map_err(|err| map_ort_error("load ONNX model", err))?;
        let uses_token_types = session
            .inputs
            .iter()
            .any(|input| input.name == "token_type_ids");

        log::debug!(
            "Loaded {} from {} (token types: {})",
            config.embedding_model_id,
            model_path.display(),
            uses_token_types
        );

        let info = EmbedderInfo {
            provider: ProviderKind::Onnx,
            embedding_model_id: config.embedding_model_id,
            dimension: config.dimension,
            text_repr_version: config.text_repr_version,
        };

        Ok(Self {
            info,
            session: Mutex::new(session),
            tokenizer: Arc::new(tokenizer),
            pad_id,
            uses_token_types,
            batch_size: config.batch_size,
        })
    }

    fn prepare_encodings(&self, texts: &[&str]) -> Result<Vec<Encoding>, EmbedderError> {
        let tokenizer = &self.tokenizer;
        texts
            .iter()
            .map(|t| tokenizer.encode(*t, true))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| map_tokenizer_error("tokenize inputs", err))
    }

    fn build_input_tensors(&self, encodings: &[Encoding]) -> Result<PreparedBatch, EmbedderError> {
        let batch = encodings.len();
        let seq_len = encodings.iter().map(Encoding::len).max().unwrap_or(0);

        let mut input_ids = Array2::<i64>::from_elem((batch, seq_len), self.pad_id);
        let mut attention_mask = Array2::<i64>::zeros((batch, seq_len));
        let mut token_type_ids = Array2::<i64>::zeros((batch, seq_len));
        let mut attention_rows = Vec::with_capacity(batch);

        for (row, encoding) in encodings.iter().enumerate() {
            let ids = encoding.get_ids();
            let mask = encoding.get_attention_mask();
            let types = encoding.get_type_ids();

            for col in 0..ids.len() {
                input_ids[(row, col)] = ids[col] as i64;
                attention_mask[(row, col)] = mask[col] as i64;
                token_type_ids[(row, col)] = types.get(col).copied().unwrap_or(0) as i64;
            }

            attention_rows.push(attention_mask.row(row).to_vec());
        }

        let input_ids =
            Tensor::from_array(input_ids).map_err(|err| map_ort_error("prepare input_ids", err))?;
        let attention_mask = Tensor::from_array(attention_mask)
            .map_err(|err| map_ort_error("prepare attention_mask", err))?;
        let token_type_ids = Tensor::from_array(token_type_ids)
            .map_err(|err| map_ort_error("prepare token_type_ids", err))?;

        Ok(PreparedBatch {
            input_ids,
            attention_mask,
            token_type_ids,
            attention_rows,
        })
    }

    fn run_session(&self, prepared: PreparedBatch) -> Result<(Vec<f32>, [usize; 3]), EmbedderError> {
        let mut session = self
            .session
            .lock()
            .map_err(|_| EmbedderError::ProviderFailure {
                message: "ONNX session lock poisoned".into(),
            })?;

        let outputs = if self.uses_token_types {
            session.run(ort::inputs![
                "input_ids" => prepared.input_ids,
                "attention_mask" => prepared.attention_mask,
                "token_type_ids" => prepared.token_type_ids,
            ])
        } else {
            session.run(ort::inputs![
                "input_ids" => prepared.input_ids,
                "attention_mask" => prepared.attention_mask,
            ])
        }
        .map_err(|err| map_ort_error("execute ONNX session", err))?;

        // First output is the token embeddings
        let (shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|err| map_ort_error("extract output tensor", err))?;

        if shape.len() != 3 {
            let dims: Vec<i64> = shape.iter().copied().collect();
            return Err(EmbedderError::ProviderFailure {
                message: format!(
                    "model output must be rank-3 [batch, seq_len, hidden], got shape {:?}",
                    dims
                ),
            });
        }

        let mut dims = [0usize; 3];
        for (dim, &value) in dims.iter_mut().zip(shape.iter()) {
            *dim = usize::try_from(value).map_err(|_| EmbedderError::ProviderFailure {
                message: format!("model output has dynamic dimension {value}"),
            })?;
        }

        Ok((data.to_vec(), dims))
    }

    fn embed_chunk(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedderError> {
        let encodings = self.prepare_encodings(texts)?;
        let prepared = self.build_input_tensors(&encodings)?;
        let attention_rows = prepared.attention_rows.clone();
        let expected_seq_len = attention_rows.first().map_or(0, Vec::len);

        let (raw_data, [batch, seq_len, hidden]) = self.run_session(prepared)?;

        if batch != attention_rows.len() {
            return Err(EmbedderError::ProviderFailure {
                message: format!(
                    "model returned batch size {batch}, but prepared {} attention masks",
                    attention_rows.len()
                ),
            });
        }

        if seq_len != expected_seq_len {
            return Err(EmbedderError::ProviderFailure {
                message: format!("model returned sequence length {seq_len}, expected {expected_seq_len}"),
            });
        }

        if hidden != self.info.dimension {
            return Err(EmbedderError::ProviderFailure {
                message: format!(
                    "model hidden size {} does not match configured dimension {}",
                    hidden, self.info.dimension
                ),
            });
        }

        let mut pooled = mean_pool(&raw_data, &attention_rows, seq_len, hidden);
        for vector in &mut pooled {
            l2_normalize(vector);
        }
        Ok(pooled)
    }
}

impl Embedder for OnnxEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedderError> {
        self.embed_chunk(&[text])?
            .into_iter()
            .next()
            .ok_or_else(|| EmbedderError::ProviderFailure {
                message: "missing pooled output".into(),
            })
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedderError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(self.batch_size) {
            vectors.extend(self.embed_chunk(chunk)?);
        }
        Ok(vectors)
    }

    fn info(&self) -> &EmbedderInfo {
        &self.info
    }
}

/// Padding id from the tokenizer's padding config or its vocabulary.
fn pad_token_id(tokenizer: &Tokenizer) -> Option<i64> {
    if let Some(padding) = tokenizer.get_padding() {
        return Some(padding.pad_id as i64);
    }
    ["[PAD]", "<pad>"]
        .iter()
        .find_map(|token| tokenizer.token_to_id(token))
        .map(|id| id as i64)
}

/// Average the token vectors of each row over its attention mask.
fn mean_pool(data: &[f32], attention_rows: &[Vec<i64>], seq_len: usize, hidden: usize) -> Vec<Vec<f32>> {
    attention_rows
        .iter()
        .enumerate()
        .map(|(b, mask)| {
            let mut sum = vec![0f32; hidden];
            let mut count = 0f32;

            for (t, &m) in mask.iter().enumerate() {
                if m != 1 {
                    continue;
                }
                let base = (b * seq_len + t) * hidden;
                for (acc, value) in sum.iter_mut().zip(&data[base..base + hidden]) {
                    *acc += value;
                }
                count += 1.0;
            }

            if count > 0.0 {
                for value in &mut sum {
                    *value /= count;
                }
            }
            sum
        })
        .collect()
}

fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}

fn ensure_ort_initialized(runtime_library_path: &Path) -> Result<(), EmbedderError> {
    if let Some(existing) = ORT_RUNTIME_PATH.get() {
        if existing != runtime_library_path {
            return Err(EmbedderError::InvalidConfiguration {
                message: format!(
                    "ONNX Runtime already initialized with library `{}`; cannot reinitialize with `{}`",
                    existing.display(),
                    runtime_library_path.display()
                ),
            });
        }
        return Ok(());
    }

    ort::init_from(runtime_library_path.to_string_lossy().to_string())
        .with_name("pdfoutline")
        .commit()
        .map_err(|err| map_ort_error("initialize ONNX Runtime environment", err))?;
    let _ = ORT_RUNTIME_PATH.set(runtime_library_path.to_path_buf());

    Ok(())
}

fn resolve_existing_path(path: &Path, description: &str) -> Result<PathBuf, EmbedderError> {
    fs::metadata(path).map_err(|_| EmbedderError::InvalidConfiguration {
        message: format!("{description} `{}` does not exist", path.display()),
    })?;

    path.canonicalize().map_err(|err| EmbedderError::ProviderFailure {
        message: format!("failed to canonicalize {description} `{}`: {err}", path.display()),
    })
}

fn map_ort_error(context: &str, err: OrtError) -> EmbedderError {
    EmbedderError::ProviderFailure {
        message: format!("{context} failed: {err}"),
    }
}

fn map_tokenizer_error(context: &str, err: tokenizers::Error) -> EmbedderError {
    EmbedderError::ProviderFailure {
        message: format!("{context} failed: {err}"),
    }
}
