//! Alignment-mask manifests for duration predictor training.
//!
//! A manifest maps each utterance to a precomputed attention file, one
//! `key|attention_file` record per line. Keys are matched against the sample
//! field chosen by [`AttentionKey`]; with the default text key, transcripts must
//! be unique within the corpus for the mapping to be meaningful.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::warn;

use crate::config::AttentionKey;
use crate::error::{DatasetError, Result};
use crate::sample::Sample;

/// Reads `key|attention_file` records. Every line must have exactly two fields.
pub fn load_attention_mask_meta_data(path: impl AsRef<Path>) -> Result<HashMap<String, String>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| DatasetError::io(err, path))?;

    let mut meta_data = HashMap::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|err| DatasetError::io(err, path))?;
        let fields: Vec<&str> = line.split('|').collect();
        let [key, attn_file] = fields.as_slice() else {
            return Err(DatasetError::MalformedManifest {
                path: path.to_path_buf(),
                line: idx + 1,
                reason: format!("expected 2 '|'-separated fields, found {}", fields.len()),
            });
        };
        meta_data.insert(key.to_string(), attn_file.trim().to_string());
    }
    Ok(meta_data)
}

fn sample_key(sample: &Sample, key: AttentionKey) -> String {
    match key {
        AttentionKey::Text => sample.text.clone(),
        AttentionKey::AudioFile => sample.audio_file.to_string_lossy().into_owned(),
    }
}

/// Sets `attn_file` on every sample; a sample without an entry aborts the whole load.
pub fn attach_attention_files(
    samples: &mut [Sample],
    meta_data: &HashMap<String, String>,
    key: AttentionKey,
    manifest: &Path,
) -> Result<()> {
    for sample in samples.iter_mut() {
        let lookup = sample_key(sample, key);
        let Some(attn_file) = meta_data.get(&lookup) else {
            return Err(DatasetError::MissingAttentionKey {
                key: lookup,
                manifest: manifest.to_path_buf(),
            });
        };
        sample.attn_file = Some(attn_file.clone());
    }
    Ok(())
}

/// Logs keys shared by more than one sample, which would all receive the same attention file.
pub fn warn_on_duplicate_keys<'a>(
    samples: impl IntoIterator<Item = &'a Sample>,
    key: AttentionKey,
) {
    let mut seen = HashSet::new();
    let duplicates = samples
        .into_iter()
        .filter(|sample| !seen.insert(sample_key(sample, key)))
        .count();
    if duplicates > 0 {
        warn!(
            " [!] {} samples share an attention key ({:?}); they will be mapped to the same attention file",
            duplicates, key
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn attaches_by_audio_file() {
        let dir = tempdir().expect("tempdir");
        let manifest = dir.path().join("attn.txt");
        fs::write(&manifest, "a.wav|a.attn\nb.wav|b.attn\n").expect("write manifest");

        let meta_data = load_attention_mask_meta_data(&manifest).expect("load manifest");
        let mut samples = vec![Sample::new("b.wav", "bee", "s"), Sample::new("a.wav", "ay", "s")];
        attach_attention_files(&mut samples, &meta_data, AttentionKey::AudioFile, &manifest)
            .expect("attach");
        assert_eq!(samples[0].attn_file.as_deref(), Some("b.attn"));
        assert_eq!(samples[1].attn_file.as_deref(), Some("a.attn"));
    }

    #[test]
    fn missing_key_is_fatal() {
        let dir = tempdir().expect("tempdir");
        let manifest = dir.path().join("attn.txt");
        fs::write(&manifest, "a.wav|a.attn\nb.wav|b.attn\n").expect("write manifest");

        let meta_data = load_attention_mask_meta_data(&manifest).expect("load manifest");
        let mut samples = vec![Sample::new("a.wav", "ay", "s"), Sample::new("c.wav", "see", "s")];
        let err =
            attach_attention_files(&mut samples, &meta_data, AttentionKey::AudioFile, &manifest)
                .expect_err("c.wav has no entry");
        assert!(matches!(err, DatasetError::MissingAttentionKey { key, .. } if key == "c.wav"));
    }

    #[test]
    fn attaches_by_text_and_trims() {
        let dir = tempdir().expect("tempdir");
        let manifest = dir.path().join("attn.txt");
        fs::write(&manifest, "hello world|/masks/1.npy  \r\n").expect("write manifest");

        let meta_data = load_attention_mask_meta_data(&manifest).expect("load manifest");
        let mut samples = vec![Sample::new("1.wav", "hello world", "s")];
        attach_attention_files(&mut samples, &meta_data, AttentionKey::Text, &manifest)
            .expect("attach");
        assert_eq!(samples[0].attn_file.as_deref(), Some("/masks/1.npy"));
    }

    #[test]
    fn wrong_field_count_reports_line() {
        let dir = tempdir().expect("tempdir");
        let manifest = dir.path().join("attn.txt");
        fs::write(&manifest, "a.wav|a.attn\nb.wav|b.attn|extra\n").expect("write manifest");

        let err = load_attention_mask_meta_data(&manifest).expect_err("three fields");
        assert!(matches!(err, DatasetError::MalformedManifest { line: 2, .. }));
    }

    #[test]
    fn blank_line_is_malformed() {
        let dir = tempdir().expect("tempdir");
        let manifest = dir.path().join("attn.txt");
        fs::write(&manifest, "a.wav|a.attn\n\nb.wav|b.attn\n").expect("write manifest");

        let err = load_attention_mask_meta_data(&manifest).expect_err("blank line");
        assert!(matches!(err, DatasetError::MalformedManifest { line: 2, .. }));
    }

    #[test]
    fn missing_manifest_is_io_error() {
        let dir = tempdir().expect("tempdir");
        let err = load_attention_mask_meta_data(dir.path().join("nope.txt")).expect_err("no file");
        assert!(matches!(err, DatasetError::Io { .. }));
    }
}
