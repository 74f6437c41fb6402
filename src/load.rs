//! Assembles train/eval sample lists from every configured corpus.

use std::path::Path;

use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::attention::{
    attach_attention_files, load_attention_mask_meta_data, warn_on_duplicate_keys,
};
use crate::config::{DatasetConfig, DatasetDescriptor};
use crate::error::Result;
use crate::formatters::{Formatter, FormatterArgs, FormatterRegistry};
use crate::sample::Sample;
use crate::split::split_dataset;
use crate::symbols::SymbolEmbedding;

/// Output of [`load_tts_samples`]. Both lists are `None` when the config declares no corpora,
/// and `eval` is `None` when no eval split was requested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedSamples {
    pub train: Option<Vec<Sample>>,
    pub eval: Option<Vec<Sample>>,
}

/// Loads every corpus in `config`, in order, and concatenates the results.
///
/// `formatter` replaces the registry lookup for the *first* corpus only; later
/// corpora always resolve their own formatter by name. Corpora without a
/// `meta_file_val` are split with a generator seeded from `split_seed`, so the
/// eval split is stable between runs.
pub fn load_tts_samples(
    config: &DatasetConfig,
    registry: &FormatterRegistry,
    eval_split: bool,
    mut formatter: Option<Formatter>,
) -> Result<LoadedSamples> {
    let datasets = config.datasets();
    if datasets.is_empty() {
        return Ok(LoadedSamples::default());
    }
    if formatter.is_some() && datasets.len() > 1 {
        warn!(
            " [!] The formatter override only applies to the first dataset ({}); \
             the other {} use their registered formatters.",
            datasets[0].name,
            datasets.len() - 1
        );
    }

    let symbol_embedding = config
        .symbol_embedding_filename
        .as_deref()
        .map(SymbolEmbedding::load)
        .transpose()?;
    let policy = config.split_policy();

    let mut meta_data_train_all = Vec::new();
    let mut meta_data_eval_all = Vec::new();

    for dataset in datasets {
        let format = match formatter.take() {
            Some(format) => format,
            None => registry.get(dataset.formatter_name())?,
        };
        let args = FormatterArgs {
            root_path: &dataset.path,
            meta_file: &dataset.meta_file_train,
            symbol_embedding: symbol_embedding.as_ref(),
        };

        let mut meta_data_train = drop_ignored_speakers(format(&args)?, dataset);
        let root = dataset.path.canonicalize().unwrap_or_else(|_| dataset.path.clone());
        info!(" | > Found {} files in {}", meta_data_train.len(), root.display());

        let mut meta_data_eval = Vec::new();
        if eval_split {
            if let Some(meta_file_val) = dataset.meta_file_val() {
                let val_args = FormatterArgs {
                    meta_file: meta_file_val,
                    ..args
                };
                meta_data_eval = drop_ignored_speakers(format(&val_args)?, dataset);
            } else {
                let mut rng = StdRng::seed_from_u64(config.split_seed);
                let (eval, train) = split_dataset(meta_data_train, &policy, &mut rng)?;
                meta_data_eval = eval;
                meta_data_train = train;
            }
        }

        // Load attention masks for the duration predictor training.
        if let Some(manifest) = dataset.meta_file_attn_mask() {
            let manifest = Path::new(manifest);
            let meta_data = load_attention_mask_meta_data(manifest)?;
            let key = dataset.attn_mask_key;
            warn_on_duplicate_keys(meta_data_train.iter().chain(&meta_data_eval), key);
            attach_attention_files(&mut meta_data_train, &meta_data, key, manifest)?;
            attach_attention_files(&mut meta_data_eval, &meta_data, key, manifest)?;
        }

        meta_data_eval_all.extend(meta_data_eval);
        meta_data_train_all.extend(meta_data_train);
    }

    Ok(LoadedSamples {
        train: Some(meta_data_train_all),
        eval: eval_split.then_some(meta_data_eval_all),
    })
}

fn drop_ignored_speakers(mut samples: Vec<Sample>, dataset: &DatasetDescriptor) -> Vec<Sample> {
    if dataset.ignored_speakers.is_empty() {
        return samples;
    }
    let before = samples.len();
    samples.retain(|sample| !dataset.ignored_speakers.contains(&sample.speaker_name));
    info!(
        " | > Ignored {} samples from speakers {:?} in {}",
        before - samples.len(),
        dataset.ignored_speakers,
        dataset.name
    );
    samples
}
