//! Train/eval partitioning of a single corpus.

use std::cmp::Reverse;
use std::collections::HashMap;

use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_EVAL_SPLIT_FRACTION, DEFAULT_EVAL_SPLIT_MAX_SIZE};
use crate::error::{DatasetError, Result};
use crate::sample::Sample;

/// Requested eval split size: a share of the corpus or an absolute count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EvalSplitSize {
    Count(usize),
    /// Values `>= 1.0` are read as a count.
    Fraction(f64),
}

/// How large the eval split of each corpus should be.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitPolicy {
    /// Cap applied to fractional sizes only.
    pub max_size: Option<usize>,
    pub size: EvalSplitSize,
}

impl Default for SplitPolicy {
    fn default() -> Self {
        Self {
            max_size: Some(DEFAULT_EVAL_SPLIT_MAX_SIZE),
            size: EvalSplitSize::Fraction(DEFAULT_EVAL_SPLIT_FRACTION),
        }
    }
}

impl SplitPolicy {
    /// Number of samples moved to eval for a corpus of `num_samples`.
    pub fn eval_size(&self, num_samples: usize) -> usize {
        match self.size {
            EvalSplitSize::Count(count) => count,
            EvalSplitSize::Fraction(fraction) if fraction >= 1.0 => fraction as usize,
            EvalSplitSize::Fraction(fraction) => {
                let size = (num_samples as f64 * fraction) as usize;
                self.max_size.map_or(size, |max| size.min(max))
            }
        }
    }
}

/// Splits `items` into `(eval, train)`.
///
/// The corpus is shuffled with `rng` first; pass a freshly seeded generator to
/// get the same partition on every run. When more than one speaker is present,
/// eval slots are allocated per speaker in proportion to its share of the
/// corpus, and no speaker ever gives up its last sample, so every speaker stays
/// represented in the training set.
pub fn split_dataset<R: Rng + ?Sized>(
    mut items: Vec<Sample>,
    policy: &SplitPolicy,
    rng: &mut R,
) -> Result<(Vec<Sample>, Vec<Sample>)> {
    let num_samples = items.len();
    let eval_size = policy.eval_size(num_samples);
    if eval_size == 0 {
        return Err(DatasetError::InvalidConfig(format!(
            "not enough samples to train: {num_samples} samples leave an empty eval split \
             (at least 100 are needed with the default 1% split)"
        )));
    }
    if eval_size >= num_samples {
        return Err(DatasetError::InvalidConfig(format!(
            "eval split of {eval_size} samples would consume the whole corpus of {num_samples}"
        )));
    }

    items.shuffle(rng);

    let (speaker_of, counts) = index_speakers(&items);
    if counts.len() <= 1 {
        let train = items.split_off(eval_size);
        return Ok((items, train));
    }

    let mut quotas = allocate_eval_quotas(&counts, num_samples, eval_size)?;
    debug!(
        "Splitting {} samples across {} speakers, {} to eval",
        num_samples,
        counts.len(),
        eval_size
    );

    let mut eval = Vec::with_capacity(eval_size);
    let mut train = Vec::with_capacity(num_samples - eval_size);
    for (item, speaker) in items.into_iter().zip(speaker_of) {
        if quotas[speaker] > 0 {
            quotas[speaker] -= 1;
            eval.push(item);
        } else {
            train.push(item);
        }
    }
    Ok((eval, train))
}

/// Maps every item to a dense speaker index (first appearance order) and counts
/// samples per speaker.
fn index_speakers(items: &[Sample]) -> (Vec<usize>, Vec<usize>) {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts = Vec::new();
    let speaker_of = items
        .iter()
        .map(|item| {
            let next = index.len();
            let speaker = *index.entry(item.speaker_name.as_str()).or_insert(next);
            if speaker == counts.len() {
                counts.push(0);
            }
            counts[speaker] += 1;
            speaker
        })
        .collect();
    (speaker_of, counts)
}

/// Largest-remainder allocation of `target` eval slots, each speaker capped at `count - 1`.
fn allocate_eval_quotas(counts: &[usize], total: usize, target: usize) -> Result<Vec<usize>> {
    let headroom: usize = counts.iter().map(|&count| count - 1).sum();
    if headroom < target {
        return Err(DatasetError::SplitUnreachable { target, headroom });
    }

    let mut quotas: Vec<usize> = counts
        .iter()
        .map(|&count| (target * count / total).min(count - 1))
        .collect();
    let mut remaining = target - quotas.iter().sum::<usize>();

    // Stable sort: equal remainders keep first-appearance order.
    let mut order: Vec<usize> = (0..counts.len()).collect();
    order.sort_by_key(|&speaker| Reverse(target * counts[speaker] % total));

    // Terminates because headroom >= target: each pass places at least one slot.
    while remaining > 0 {
        for &speaker in &order {
            if remaining == 0 {
                break;
            }
            if quotas[speaker] < counts[speaker] - 1 {
                quotas[speaker] += 1;
                remaining -= 1;
            }
        }
    }
    Ok(quotas)
}
