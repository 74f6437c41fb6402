//! Formatters turn one corpus manifest into a list of [`Sample`]s.
//!
//! Every formatter shares the same calling convention, [`Formatter`], so the
//! loader never needs to know which corpus layout it is reading. The built-in
//! set lives in a compile-time table; callers add their own through
//! [`FormatterRegistry::register`] before loading.

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use phf::phf_map;

use crate::error::{DatasetError, Result};
use crate::sample::Sample;
use crate::symbols::SymbolEmbedding;

mod coqui;
mod ljspeech;
mod parquet_shards;
mod vctk;

pub use self::coqui::coqui;
pub use self::ljspeech::ljspeech;
pub use self::parquet_shards::parquet;
pub use self::vctk::vctk;

/// Everything a formatter receives for one call.
#[derive(Debug, Clone, Copy)]
pub struct FormatterArgs<'a> {
    pub root_path: &'a Path,
    /// Manifest to read, relative to `root_path`.
    pub meta_file: &'a str,
    pub symbol_embedding: Option<&'a SymbolEmbedding>,
}

pub type Formatter = fn(&FormatterArgs<'_>) -> Result<Vec<Sample>>;

/// Formatters shipped with the crate, keyed by lowercase corpus name.
pub static BUILTIN_FORMATTERS: phf::Map<&'static str, Formatter> = phf_map! {
    "coqui" => coqui as Formatter,
    "ljspeech" => ljspeech as Formatter,
    "parquet" => parquet as Formatter,
    "vctk" => vctk as Formatter,
};

/// Name → formatter resolution. Names are matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct FormatterRegistry {
    formatters: HashMap<String, Formatter>,
}

impl FormatterRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with [`BUILTIN_FORMATTERS`].
    pub fn with_builtins() -> Self {
        let formatters = BUILTIN_FORMATTERS
            .entries()
            .map(|(&name, &formatter)| (name.to_string(), formatter))
            .collect();
        Self { formatters }
    }

    /// Registers `formatter` under `name`, returning the one it replaced.
    pub fn register(&mut self, name: &str, formatter: Formatter) -> Option<Formatter> {
        self.formatters.insert(name.to_lowercase(), formatter)
    }

    pub fn get(&self, name: &str) -> Result<Formatter> {
        let name = name.to_lowercase();
        match self.formatters.get(&name) {
            Some(&formatter) => Ok(formatter),
            None => Err(DatasetError::UnknownFormatter { name }),
        }
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.formatters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Opens a `|`-delimited manifest. Quoting is disabled since transcripts carry bare quotes.
fn pipe_reader(path: &Path, has_headers: bool) -> Result<csv::Reader<File>> {
    let file = File::open(path).map_err(|err| DatasetError::io(err, path))?;
    Ok(csv::ReaderBuilder::new()
        .delimiter(b'|')
        .has_headers(has_headers)
        .quoting(false)
        .flexible(true)
        .from_reader(file))
}

fn malformed(path: &Path, record: &csv::StringRecord, reason: impl Into<String>) -> DatasetError {
    DatasetError::MalformedManifest {
        path: path.to_path_buf(),
        line: record.position().map_or(0, |pos| pos.line() as usize),
        reason: reason.into(),
    }
}

/// Joins a glob suffix onto a literal root directory.
fn glob_under(root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let root = root.to_str().ok_or_else(|| {
        DatasetError::InvalidConfig(format!("corpus path {root:?} is not valid UTF-8"))
    })?;
    let full = format!("{}/{}", glob::Pattern::escape(root), pattern);
    let paths = glob::glob(&full)?.collect::<Result<Vec<_>, _>>()?;
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(_: &FormatterArgs<'_>) -> Result<Vec<Sample>> {
        Ok(vec![Sample::new("a.wav", "a", "spk")])
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let registry = FormatterRegistry::with_builtins();
        assert!(registry.get("LJSpeech").is_ok());
        assert!(registry.get("VCTK").is_ok());
        assert_eq!(registry.names(), vec!["coqui", "ljspeech", "parquet", "vctk"]);
    }

    #[test]
    fn unknown_name_fails() {
        let registry = FormatterRegistry::with_builtins();
        let err = registry.get("Nonexistent").expect_err("not registered");
        assert!(matches!(err, DatasetError::UnknownFormatter { name } if name == "nonexistent"));
    }

    #[test]
    fn registered_formatters_resolve() {
        let mut registry = FormatterRegistry::new();
        assert!(registry.get("ljspeech").is_err());
        assert!(registry.register("MyCorpus", fixed).is_none());

        let formatter = registry.get("mycorpus").expect("registered");
        let args = FormatterArgs {
            root_path: Path::new("."),
            meta_file: "unused",
            symbol_embedding: None,
        };
        assert_eq!(formatter(&args).expect("format")[0].text, "a");
    }
}
