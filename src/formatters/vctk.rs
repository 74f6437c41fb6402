use std::fs;

use crate::error::{DatasetError, Result};
use crate::formatters::{FormatterArgs, glob_under};
use crate::sample::Sample;

/// VCTK layout: one transcript per utterance under `txt/<speaker>/<id>.txt`, audio under
/// `wav48/<speaker>/<id>.wav`. The corpus has no manifest, so `meta_file` is ignored.
pub fn vctk(args: &FormatterArgs<'_>) -> Result<Vec<Sample>> {
    let transcripts = glob_under(args.root_path, "txt/*/*.txt")?;
    let wavs = args.root_path.join("wav48");

    let mut samples = Vec::with_capacity(transcripts.len());
    for path in transcripts {
        let speaker = path
            .parent()
            .and_then(|dir| dir.file_name())
            .and_then(|name| name.to_str());
        let file_id = path.file_stem().and_then(|stem| stem.to_str());
        let (Some(speaker), Some(file_id)) = (speaker, file_id) else {
            return Err(DatasetError::InvalidConfig(format!(
                "cannot derive speaker and utterance id from {path:?}"
            )));
        };
        let text = fs::read_to_string(&path).map_err(|err| DatasetError::io(err, &path))?;
        samples.push(Sample::new(
            wavs.join(speaker).join(format!("{file_id}.wav")),
            text.trim(),
            speaker,
        ));
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn speakers_come_from_directories() {
        let dir = tempdir().expect("tempdir");
        let utterances = [
            ("p225", "p225_001", "Please call Stella.\n"),
            ("p226", "p226_002", "Ask her."),
        ];
        for (speaker, id, text) in utterances {
            let txt_dir = dir.path().join("txt").join(speaker);
            fs::create_dir_all(&txt_dir).expect("create speaker dir");
            fs::write(txt_dir.join(format!("{id}.txt")), text).expect("write transcript");
        }

        let args = FormatterArgs {
            root_path: dir.path(),
            meta_file: "",
            symbol_embedding: None,
        };
        fs::write(dir.path().join("txt/readme.txt"), "not a transcript").expect("write stray file");
        fs::create_dir_all(dir.path().join("txt/p225/old")).expect("create nested dir");
        fs::write(dir.path().join("txt/p225/old/p225_000.txt"), "stale")
            .expect("write nested file");

        let samples = vctk(&args).expect("format vctk");
        assert_eq!(
            samples,
            vec![
                Sample::new(
                    dir.path().join("wav48/p225/p225_001.wav"),
                    "Please call Stella.",
                    "p225"
                ),
                Sample::new(dir.path().join("wav48/p226/p226_002.wav"), "Ask her.", "p226"),
            ]
        );
    }
}
