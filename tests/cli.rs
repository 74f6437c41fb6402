use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn temp_workspace() -> TempDir {
    tempfile::tempdir().expect("create tempdir")
}

/// Writes a two-speaker `coqui` corpus of `rows` samples and a config pointing at it.
fn write_corpus(workspace: &Path, rows: usize) -> std::path::PathBuf {
    let corpus = workspace.join("corpus");
    fs::create_dir_all(&corpus).expect("create corpus dir");
    let mut manifest = String::from("audio_file|text|speaker_name\n");
    for i in 0..rows {
        let speaker = if i % 4 == 0 { "bob" } else { "alice" };
        manifest.push_str(&format!("wavs/{i:04}.wav|Sentence number {i}.|{speaker}\n"));
    }
    fs::write(corpus.join("metadata.csv"), manifest).expect("write manifest");

    let config = workspace.join("config.json");
    let json = serde_json::json!({
        "datasets": [
            {
                "name": "my_corpus",
                "formatter": "coqui",
                "path": corpus,
                "meta_file_train": "metadata.csv"
            }
        ]
    });
    fs::write(&config, json.to_string()).expect("write config");
    config
}

fn line_count(path: &Path) -> usize {
    fs::read_to_string(path).expect("read output").lines().count()
}

#[test]
fn assemble_writes_train_and_eval() {
    let workspace = temp_workspace();
    write_corpus(workspace.path(), 300);

    let mut cmd = Command::cargo_bin("ttsdata").expect("binary exists");
    cmd.current_dir(workspace.path())
        .args(["--quiet", "assemble", "--config", "config.json", "--out", "out"])
        .assert()
        .success();

    let out = workspace.path().join("out");
    assert_eq!(line_count(&out.join("train.csv")), 297);
    assert_eq!(line_count(&out.join("eval.csv")), 3);
}

#[test]
fn assemble_is_reproducible() {
    let workspace = temp_workspace();
    write_corpus(workspace.path(), 300);

    for out in ["first", "second"] {
        Command::cargo_bin("ttsdata")
            .expect("binary exists")
            .current_dir(workspace.path())
            .args(["--quiet", "assemble", "-c", "config.json", "-o", out])
            .assert()
            .success();
    }
    let first = fs::read_to_string(workspace.path().join("first/eval.csv")).expect("read eval");
    let second = fs::read_to_string(workspace.path().join("second/eval.csv")).expect("read eval");
    assert_eq!(first, second);
}

#[test]
fn assemble_without_eval_keeps_everything() {
    let workspace = temp_workspace();
    write_corpus(workspace.path(), 50);

    Command::cargo_bin("ttsdata")
        .expect("binary exists")
        .current_dir(workspace.path())
        .args([
            "--quiet",
            "assemble",
            "-c",
            "config.json",
            "-o",
            "out",
            "--no-eval",
            "--format",
            "parquet",
        ])
        .assert()
        .success();

    assert!(workspace.path().join("out/train.parquet").exists());
    assert!(!workspace.path().join("out/eval.parquet").exists());
}

#[test]
fn small_corpus_fails_to_split() {
    let workspace = temp_workspace();
    write_corpus(workspace.path(), 50);

    let output = Command::cargo_bin("ttsdata")
        .expect("binary exists")
        .current_dir(workspace.path())
        .args(["--quiet", "assemble", "-c", "config.json"])
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    let stderr = String::from_utf8(output).expect("stderr is UTF-8");
    assert!(stderr.contains("not enough samples"), "stderr was: {stderr}");
}

#[test]
fn chars_reports_census() {
    let workspace = temp_workspace();
    write_corpus(workspace.path(), 20);

    let output = Command::cargo_bin("ttsdata")
        .expect("binary exists")
        .current_dir(workspace.path())
        .args(["--quiet", "chars", "--config", "config.json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).expect("stdout is UTF-8");
    assert!(text.contains("Unique lower characters: bcemnrtu"), "stdout was: {text}");
    // Leading space: the transcripts contain spaces.
    assert!(text.contains("Unique all forced to lower characters:  .0123456789bcemnrstu"));
}

#[test]
fn formatters_lists_builtins() {
    let output = Command::cargo_bin("ttsdata")
        .expect("binary exists")
        .arg("formatters")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(String::from_utf8(output).expect("UTF-8"), "coqui\nljspeech\nparquet\nvctk\n");
}
