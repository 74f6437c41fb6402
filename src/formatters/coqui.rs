use crate::error::{DatasetError, Result};
use crate::formatters::{FormatterArgs, malformed, pipe_reader};
use crate::sample::Sample;

// Used when the manifest has no `speaker_name` column.
const DEFAULT_SPEAKER_NAME: &str = "coqui";

/// Generic manifest with a header row naming `audio_file`, `text` and optionally `speaker_name`.
/// Audio paths are relative to the corpus root.
pub fn coqui(args: &FormatterArgs<'_>) -> Result<Vec<Sample>> {
    let manifest = args.root_path.join(args.meta_file);
    let mut reader = pipe_reader(&manifest, true)?;

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|header| header.trim() == name);
    let (Some(audio_col), Some(text_col)) = (column("audio_file"), column("text")) else {
        return Err(DatasetError::MalformedManifest {
            path: manifest,
            line: 1,
            reason: "header must name audio_file and text columns".into(),
        });
    };
    let speaker_col = column("speaker_name");

    let mut samples = Vec::new();
    for record in reader.records() {
        let record = record?;
        let (Some(audio_file), Some(text)) = (record.get(audio_col), record.get(text_col)) else {
            return Err(malformed(&manifest, &record, "row is shorter than the header"));
        };
        let speaker = speaker_col
            .and_then(|col| record.get(col))
            .unwrap_or(DEFAULT_SPEAKER_NAME);
        samples.push(Sample::new(args.root_path.join(audio_file), text, speaker));
    }
    Ok(samples)
}
