use crate::error::Result;
use crate::formatters::{FormatterArgs, malformed, pipe_reader};
use crate::sample::Sample;

const SPEAKER_NAME: &str = "ljspeech";

/// LJSpeech layout: `metadata.csv` lines of `id|text|normalized_text`, audio under `wavs/<id>.wav`.
///
/// The normalized transcript is used when present, otherwise the raw one.
pub fn ljspeech(args: &FormatterArgs<'_>) -> Result<Vec<Sample>> {
    let manifest = args.root_path.join(args.meta_file);
    let mut reader = pipe_reader(&manifest, false)?;
    let wavs = args.root_path.join("wavs");

    let mut samples = Vec::new();
    for record in reader.records() {
        let record = record?;
        let id = record.get(0).filter(|id| !id.is_empty());
        let normalized = record.get(2).filter(|text| !text.is_empty());
        let text = normalized.or_else(|| record.get(1)).filter(|text| !text.is_empty());
        let (Some(id), Some(text)) = (id, text) else {
            return Err(malformed(&manifest, &record, "expected id|text[|normalized_text]"));
        };
        samples.push(Sample::new(wavs.join(format!("{id}.wav")), text, SPEAKER_NAME));
    }
    Ok(samples)
}
