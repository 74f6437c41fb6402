//! Writes assembled sample lists back to disk.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use ::parquet::arrow::ArrowWriter;
use arrow::array::{ArrayRef, RecordBatch, StringArray};
use clap::ValueEnum;
use indicatif::ProgressBar;

use crate::config::PARQUET_CHUNK_SIZE;
use crate::error::{DatasetError, Result};
use crate::sample::Sample;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// `audio_file|text|speaker_name[|attn_file]`, no header.
    #[default]
    Csv,
    /// Columns `audio_file`, `text`, `speaker_name`, nullable `attn_file`.
    Parquet,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Parquet => "parquet",
        }
    }
}

/// Writes `samples` to `path`, advancing `pb` once per row.
pub fn write_samples(
    path: &Path,
    samples: &[Sample],
    format: ExportFormat,
    pb: &ProgressBar,
) -> Result<()> {
    pb.set_length(samples.len() as u64);
    match format {
        ExportFormat::Csv => write_csv(path, samples, pb),
        ExportFormat::Parquet => write_parquet(path, samples, pb),
    }
}

fn write_csv(path: &Path, samples: &[Sample], pb: &ProgressBar) -> Result<()> {
    let file = File::create(path).map_err(|err| DatasetError::io(err, path))?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'|')
        .quote_style(csv::QuoteStyle::Never)
        .flexible(true)
        .from_writer(file);

    for sample in samples {
        let audio_file = sample.audio_file.to_string_lossy();
        let mut record = vec![&*audio_file, sample.text.as_str(), sample.speaker_name.as_str()];
        if let Some(attn_file) = &sample.attn_file {
            record.push(attn_file.as_str());
        }
        writer.write_record(&record)?;
        pb.inc(1);
    }
    writer.flush().map_err(|err| DatasetError::io(err, path))?;
    Ok(())
}

fn write_parquet(path: &Path, samples: &[Sample], pb: &ProgressBar) -> Result<()> {
    let audio_files: ArrayRef = Arc::new(StringArray::from_iter_values(
        samples.iter().map(|s| s.audio_file.to_string_lossy()),
    ));
    let texts: ArrayRef = Arc::new(StringArray::from_iter_values(samples.iter().map(|s| &s.text)));
    let speakers: ArrayRef = Arc::new(StringArray::from_iter_values(
        samples.iter().map(|s| &s.speaker_name),
    ));
    let attn_files: ArrayRef = Arc::new(StringArray::from_iter(
        samples.iter().map(|s| s.attn_file.as_deref()),
    ));
    let batch = RecordBatch::try_from_iter([
        ("audio_file", audio_files),
        ("text", texts),
        ("speaker_name", speakers),
        ("attn_file", attn_files),
    ])?;

    let file = File::create(path).map_err(|err| DatasetError::io(err, path))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;

    // Zero-copy slices, one row group per chunk.
    let total_rows = batch.num_rows();
    for offset in (0..total_rows).step_by(PARQUET_CHUNK_SIZE) {
        let length = PARQUET_CHUNK_SIZE.min(total_rows - offset);
        writer.write(&batch.slice(offset, length))?;
        writer.flush()?;
        pb.inc(length as u64);
    }
    writer.close()?;
    Ok(())
}
