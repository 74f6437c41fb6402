//! Character inventory of assembled transcripts.

use std::collections::BTreeSet;
use std::fmt;

use log::info;

use crate::sample::Sample;

/// Distinct characters found across a set of transcripts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharCensus {
    pub chars: BTreeSet<char>,
    /// ASCII lowercase letters among `chars`.
    pub lower_chars: BTreeSet<char>,
    /// `chars` passed through Unicode lowercasing. Characters that lowercase to
    /// several code points (e.g. `İ`) contribute each of them.
    pub chars_force_lower: BTreeSet<char>,
}

impl CharCensus {
    pub fn from_texts<'a>(texts: impl IntoIterator<Item = &'a str>) -> Self {
        let chars: BTreeSet<char> = texts.into_iter().flat_map(str::chars).collect();
        let lower_chars = chars.iter().copied().filter(char::is_ascii_lowercase).collect();
        let chars_force_lower = chars.iter().flat_map(|c| c.to_lowercase()).collect();
        Self {
            chars,
            lower_chars,
            chars_force_lower,
        }
    }

    pub fn from_samples(samples: &[Sample]) -> Self {
        Self::from_texts(samples.iter().map(|sample| sample.text.as_str()))
    }

    pub fn log_summary(&self) {
        for line in self.to_string().lines() {
            info!(" > {line}");
        }
    }
}

/// One line per set, e.g. `Unique lower characters: abc`.
impl fmt::Display for CharCensus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of unique characters: {}", self.chars.len())?;
        writeln!(f, "Unique characters: {}", collect(&self.chars))?;
        writeln!(f, "Unique lower characters: {}", collect(&self.lower_chars))?;
        write!(f, "Unique all forced to lower characters: {}", collect(&self.chars_force_lower))
    }
}

fn collect(chars: &BTreeSet<char>) -> String {
    chars.iter().collect()
}

/// Runs the census over sample transcripts and returns the lowercased character set.
pub fn find_unique_chars(samples: &[Sample], verbose: bool) -> BTreeSet<char> {
    let census = CharCensus::from_samples(samples);
    if verbose {
        census.log_summary();
    }
    census.chars_force_lower
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(s: &str) -> BTreeSet<char> {
        s.chars().collect()
    }

    #[test]
    fn mixed_case_and_accents() {
        let census = CharCensus::from_texts(["abcABC", "é"]);
        assert_eq!(census.chars, set("abcABCé"));
        assert_eq!(census.lower_chars, set("abc"));
        assert_eq!(census.chars_force_lower, set("abcé"));
    }

    #[test]
    fn non_ascii_uppercase_folds() {
        let census = CharCensus::from_texts(["ÉÆ", "İ"]);
        assert!(census.lower_chars.is_empty());
        assert_eq!(census.chars_force_lower, set("éæi\u{307}"));
    }

    #[test]
    fn report_lists_every_set() {
        let census = CharCensus::from_texts(["aB", "é"]);
        assert_eq!(
            census.to_string(),
            "Number of unique characters: 3\n\
             Unique characters: Baé\n\
             Unique lower characters: a\n\
             Unique all forced to lower characters: abé"
        );
    }

    #[test]
    fn reads_sample_text_not_paths() {
        let samples = vec![
            Sample::new("/wavs/XYZ.wav", "Hi", "s"),
            Sample::new("/wavs/Q.wav", "ho!", "s"),
        ];
        assert_eq!(find_unique_chars(&samples, false), set("hio!"));
    }
}
