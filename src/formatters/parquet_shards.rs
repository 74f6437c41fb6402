use std::fs::File;
use std::path::Path;

use ::parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use arrow::array::{Array, RecordBatch, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;

use crate::error::{DatasetError, Result};
use crate::formatters::{FormatterArgs, glob_under};
use crate::sample::Sample;

/// Parquet shards with string columns `audio_file`, `text` and `speaker_name`.
///
/// `meta_file` is a glob relative to the corpus root, e.g. `data/train-*.parquet`.
pub fn parquet(args: &FormatterArgs<'_>) -> Result<Vec<Sample>> {
    let shards = glob_under(args.root_path, args.meta_file)?;
    if shards.is_empty() {
        return Err(DatasetError::InvalidConfig(format!(
            "no parquet files match {:?} under {:?}",
            args.meta_file, args.root_path
        )));
    }

    let mut samples = Vec::new();
    for path in shards {
        let file = File::open(&path).map_err(|err| DatasetError::io(err, &path))?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

        let mut row = 0;
        for batch in reader {
            let batch = batch?;
            let audio_files = string_column(&batch, "audio_file", &path)?;
            let texts = string_column(&batch, "text", &path)?;
            let speakers = string_column(&batch, "speaker_name", &path)?;

            for i in 0..batch.num_rows() {
                row += 1;
                if audio_files.is_null(i) || texts.is_null(i) || speakers.is_null(i) {
                    return Err(DatasetError::MalformedManifest {
                        path: path.clone(),
                        line: row,
                        reason: "null in a required column".into(),
                    });
                }
                samples.push(Sample::new(
                    args.root_path.join(audio_files.value(i)),
                    texts.value(i),
                    speakers.value(i),
                ));
            }
        }
    }
    Ok(samples)
}

/// Fetches a column as UTF-8, accepting any type Arrow can cast to a string
/// (large strings, dictionaries).
fn string_column(batch: &RecordBatch, name: &str, path: &Path) -> Result<StringArray> {
    let column = batch
        .column_by_name(name)
        .ok_or_else(|| DatasetError::MalformedManifest {
            path: path.to_path_buf(),
            line: 0,
            reason: format!("missing '{name}' column"),
        })?;
    let column = cast(column, &DataType::Utf8)?;
    column
        .as_any()
        .downcast_ref::<StringArray>()
        .cloned()
        .ok_or_else(|| DatasetError::Internal(format!("'{name}' did not cast to a string array")))
}
