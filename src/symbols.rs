//! Shared symbol embedding table handed to formatters.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{DatasetError, Result};

/// Symbol → vector table, loaded from a JSON object such as `{"a": [0.1, 0.2], "b": [0.3, 0.4]}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct SymbolEmbedding {
    vectors: BTreeMap<String, Vec<f32>>,
}

impl SymbolEmbedding {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|err| DatasetError::io(err, path))?;
        let embedding: Self = serde_json::from_str(&json)?;
        embedding.validate()?;
        Ok(embedding)
    }

    fn validate(&self) -> Result<()> {
        let mut dims = self.vectors.iter().map(|(symbol, vector)| (symbol, vector.len()));
        let Some((_, dim)) = dims.next() else {
            return Err(DatasetError::InvalidConfig("symbol embedding is empty".into()));
        };
        if let Some((symbol, other)) = dims.find(|&(_, len)| len != dim) {
            return Err(DatasetError::InvalidConfig(format!(
                "symbol embedding for {symbol:?} has dimension {other}, expected {dim}"
            )));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}
