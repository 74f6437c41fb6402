//! Configuration describing which corpora to assemble and how.
//!
//! The dataset section usually lives inside a larger training config, so
//! unknown top-level keys are ignored. A minimal file looks like:
//!
//! ```json
//! {
//!   "datasets": [
//!     { "name": "ljspeech", "path": "data/LJSpeech-1.1", "meta_file_train": "metadata.csv" }
//!   ]
//! }
//! ```
//!
//! Each corpus is parsed by the formatter registered under its `name` (or its
//! explicit `formatter`), then split into train/eval unless it ships a
//! dedicated `meta_file_val`. Empty strings for the optional manifests are
//! treated as absent, matching how configs are usually written by hand.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DatasetError, Result};
use crate::split::{EvalSplitSize, SplitPolicy};

// Upper bound on the eval split of a single corpus.
pub const DEFAULT_EVAL_SPLIT_MAX_SIZE: usize = 500;

// Share of each corpus held out for evaluation.
pub const DEFAULT_EVAL_SPLIT_FRACTION: f64 = 0.01;

// Every split is seeded with this unless the config says otherwise, so the
// same corpus always yields the same partition.
pub const DEFAULT_SPLIT_SEED: u64 = 0;

// How many rows per parquet row group when exporting.
pub const PARQUET_CHUNK_SIZE: usize = 1024;

/// Which sample field keys the alignment-mask manifest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttentionKey {
    /// Look up by transcript. Requires transcripts to be unique within the corpus.
    #[default]
    Text,
    /// Look up by the audio path the formatter produced.
    AudioFile,
}

/// Declares how to find and parse one corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    pub name: String,
    /// Formatter to use instead of the one registered under `name`.
    #[serde(default)]
    pub formatter: Option<String>,
    pub path: PathBuf,
    #[serde(default)]
    pub meta_file_train: String,
    #[serde(default)]
    pub meta_file_val: Option<String>,
    #[serde(default)]
    pub meta_file_attn_mask: Option<String>,
    /// Speakers dropped right after formatting.
    #[serde(default)]
    pub ignored_speakers: Vec<String>,
    #[serde(default)]
    pub attn_mask_key: AttentionKey,
}

impl DatasetDescriptor {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        meta_file_train: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            formatter: None,
            path: path.into(),
            meta_file_train: meta_file_train.into(),
            meta_file_val: None,
            meta_file_attn_mask: None,
            ignored_speakers: Vec::new(),
            attn_mask_key: AttentionKey::default(),
        }
    }

    /// Name used for the registry lookup.
    pub fn formatter_name(&self) -> &str {
        non_empty(&self.formatter).unwrap_or(&self.name)
    }

    pub fn meta_file_val(&self) -> Option<&str> {
        non_empty(&self.meta_file_val)
    }

    pub fn meta_file_attn_mask(&self) -> Option<&str> {
        non_empty(&self.meta_file_attn_mask)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Ordered corpora plus the settings shared between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    #[serde(default)]
    pub datasets: Option<Vec<DatasetDescriptor>>,
    /// Symbol embedding handed to every formatter call.
    #[serde(default)]
    pub symbol_embedding_filename: Option<PathBuf>,
    /// `null` removes the cap.
    #[serde(default = "default_eval_split_max_size")]
    pub eval_split_max_size: Option<usize>,
    #[serde(default = "default_eval_split_size")]
    pub eval_split_size: EvalSplitSize,
    #[serde(default)]
    pub split_seed: u64,
}

fn default_eval_split_max_size() -> Option<usize> {
    Some(DEFAULT_EVAL_SPLIT_MAX_SIZE)
}

fn default_eval_split_size() -> EvalSplitSize {
    EvalSplitSize::Fraction(DEFAULT_EVAL_SPLIT_FRACTION)
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            datasets: None,
            symbol_embedding_filename: None,
            eval_split_max_size: default_eval_split_max_size(),
            eval_split_size: default_eval_split_size(),
            split_seed: DEFAULT_SPLIT_SEED,
        }
    }
}

impl DatasetConfig {
    pub fn with_datasets(datasets: Vec<DatasetDescriptor>) -> Self {
        Self {
            datasets: Some(datasets),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|err| DatasetError::io(err, path))?;
        Self::from_json_str(&json)
    }

    /// Configured corpora; empty when the config declares none.
    pub fn datasets(&self) -> &[DatasetDescriptor] {
        self.datasets.as_deref().unwrap_or_default()
    }

    pub fn split_policy(&self) -> SplitPolicy {
        SplitPolicy {
            max_size: self.eval_split_max_size,
            size: self.eval_split_size,
        }
    }
}
