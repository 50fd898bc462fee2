//! Accuracy of recovered placements against simulated ground truth

use crate::types::{Read, Sv, SvKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Comparison of one read's guesses with its ground truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadEvaluation {
    pub start_correct: bool,
    /// `start_guess - start_pos`
    pub start_error: i64,
    pub true_svs: usize,
    pub recovered_svs: usize,
    /// Truth SVs matched by a guess of the same kind at the same global position
    pub matched_svs: usize,
    pub matched_kinds: Vec<SvKind>,
}

impl ReadEvaluation {
    pub fn spurious_svs(&self) -> usize {
        self.recovered_svs - self.matched_svs
    }

    pub fn is_exact(&self) -> bool {
        self.start_correct && self.matched_svs == self.true_svs && self.recovered_svs == self.true_svs
    }
}

fn global_of(sv: &Sv, start: usize) -> usize {
    sv.global().unwrap_or(start + sv.local())
}

pub fn evaluate(read: &Read) -> ReadEvaluation {
    let mut used = vec![false; read.svs_guesses.len()];
    let mut matched_kinds = Vec::new();

    for truth in &read.svs {
        let position = global_of(truth, read.start_pos);
        let hit = read.svs_guesses.iter().enumerate().position(|(idx, guess)| {
            !used[idx]
                && guess.kind() == truth.kind()
                && global_of(guess, read.start_guess) == position
        });
        if let Some(idx) = hit {
            used[idx] = true;
            matched_kinds.push(truth.kind());
        }
    }

    ReadEvaluation {
        start_correct: read.start_guess == read.start_pos,
        start_error: read.start_guess as i64 - read.start_pos as i64,
        true_svs: read.svs.len(),
        recovered_svs: read.svs_guesses.len(),
        matched_svs: matched_kinds.len(),
        matched_kinds,
    }
}

/// Per-kind truth and match counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindTally {
    pub truth: usize,
    pub matched: usize,
}

/// Aggregated accuracy over a batch of reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub reads: usize,
    pub starts_correct: usize,
    pub exact_reads: usize,
    pub true_svs: usize,
    pub matched_svs: usize,
    pub spurious_svs: usize,
    pub by_kind: BTreeMap<String, KindTally>,
}

impl BatchSummary {
    pub fn from_reads<'a>(reads: impl IntoIterator<Item = &'a Read>) -> Self {
        let mut summary = Self::default();
        for read in reads {
            summary.add(read, &evaluate(read));
        }
        summary
    }

    pub fn add(&mut self, read: &Read, evaluation: &ReadEvaluation) {
        self.reads += 1;
        self.starts_correct += usize::from(evaluation.start_correct);
        self.exact_reads += usize::from(evaluation.is_exact());
        self.true_svs += evaluation.true_svs;
        self.matched_svs += evaluation.matched_svs;
        self.spurious_svs += evaluation.spurious_svs();

        for sv in &read.svs {
            self.by_kind.entry(sv.kind().to_string()).or_default().truth += 1;
        }
        for kind in &evaluation.matched_kinds {
            self.by_kind.entry(kind.to_string()).or_default().matched += 1;
        }
    }

    pub fn start_accuracy(&self) -> f64 {
        ratio(self.starts_correct, self.reads)
    }

    pub fn sv_recall(&self) -> f64 {
        ratio(self.matched_svs, self.true_svs)
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        return 1.0;
    }
    num as f64 / den as f64
}
