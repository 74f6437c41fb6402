//! The uniform record every formatter produces.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One utterance of a corpus.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sample {
    pub audio_file: PathBuf,
    pub text: String,
    pub speaker_name: String,
    /// Precomputed alignment mask, only set when the corpus declares `meta_file_attn_mask`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attn_file: Option<String>,
}

impl Sample {
    pub fn new(
        audio_file: impl Into<PathBuf>,
        text: impl Into<String>,
        speaker_name: impl Into<String>,
    ) -> Self {
        Self {
            audio_file: audio_file.into(),
            text: text.into(),
            speaker_name: speaker_name.into(),
            attn_file: None,
        }
    }
}
