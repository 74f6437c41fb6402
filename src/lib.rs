//! Assembles speech-synthesis training data from labeled audio/text corpora.
//!
//! A [`DatasetConfig`] lists the corpora to use. Each corpus is parsed by a
//! formatter looked up in a [`FormatterRegistry`], optionally split into
//! train/eval with a seeded, speaker-aware split, and enriched with alignment
//! mask files before everything is concatenated.
//!
//! ```no_run
//! use ttsdata::{DatasetConfig, FormatterRegistry, load_tts_samples};
//!
//! # fn main() -> ttsdata::Result<()> {
//! let config = DatasetConfig::from_json_file("config.json")?;
//! let registry = FormatterRegistry::with_builtins();
//! let loaded = load_tts_samples(&config, &registry, true, None)?;
//! let train = loaded.train.unwrap_or_default();
//! let chars = ttsdata::find_unique_chars(&train, true);
//! println!("{} training samples over {} characters", train.len(), chars.len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod attention;
pub mod chars;
pub mod config;
pub mod error;
pub mod export;
pub mod formatters;
pub mod load;
pub mod sample;
pub mod split;
pub mod symbols;

pub use chars::{CharCensus, find_unique_chars};
pub use config::{AttentionKey, DatasetConfig, DatasetDescriptor};
pub use error::{DatasetError, Result};
pub use formatters::{Formatter, FormatterArgs, FormatterRegistry};
pub use load::{LoadedSamples, load_tts_samples};
pub use sample::Sample;
pub use split::{EvalSplitSize, SplitPolicy, split_dataset};
pub use symbols::SymbolEmbedding;
