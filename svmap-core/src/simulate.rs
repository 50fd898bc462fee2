//! Synthetic read generation
//!
//! Cuts a random slice out of a reference distance sequence and injects
//! structural variations at known, reference-relative offsets, producing
//! reads with ground truth for accuracy measurement.

use crate::types::{Distance, Read, Sv, SvKind};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulateError {
    #[error("Reference has {len} distances, reads need at least {min}")]
    ReferenceTooShort { len: usize, min: usize },

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),
}

pub type SimulateResult<T> = Result<T, SimulateError>;

/// Parameters for read generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulateParams {
    /// Shortest read, in distances
    pub min_len: usize,
    /// Longest read, in distances
    pub max_len: usize,
    pub max_missing_sites: usize,
    pub max_extra_sites: usize,
    pub max_inversions: usize,
    pub max_long_deletes: usize,
    /// Inclusive range of dropped distances per long delete
    pub long_delete_len: (usize, usize),
    /// Minimum number of untouched distances around every SV
    pub min_spacing: usize,
    /// RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for SimulateParams {
    fn default() -> Self {
        Self {
            min_len: 10,
            max_len: 100,
            max_missing_sites: 1,
            max_extra_sites: 1,
            max_inversions: 1,
            max_long_deletes: 1,
            long_delete_len: (16, 24),
            min_spacing: 6,
            seed: None,
        }
    }
}

impl SimulateParams {
    /// Reads with no injected SVs.
    pub fn exact() -> Self {
        Self {
            max_missing_sites: 0,
            max_extra_sites: 0,
            max_inversions: 0,
            max_long_deletes: 0,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> SimulateResult<()> {
        if self.min_len < 2 {
            return Err(SimulateError::InvalidParams(format!(
                "min_len must be at least 2, got {}",
                self.min_len
            )));
        }
        if self.min_len > self.max_len {
            return Err(SimulateError::InvalidParams(format!(
                "min_len {} exceeds max_len {}",
                self.min_len, self.max_len
            )));
        }
        let (lo, hi) = self.long_delete_len;
        if lo == 0 || lo > hi {
            return Err(SimulateError::InvalidParams(format!(
                "invalid long delete length range {}..={}",
                lo, hi
            )));
        }
        if self.min_spacing == 0 {
            return Err(SimulateError::InvalidParams("min_spacing must be positive".to_string()));
        }
        Ok(())
    }
}

/// A planned SV at a read-relative reference offset.
#[derive(Debug, Clone, Copy)]
struct Event {
    offset: usize,
    kind: SvKind,
    /// Reference distances consumed
    span: usize,
}

/// Seeded generator of synthetic reads
pub struct ReadGenerator {
    params: SimulateParams,
    rng: StdRng,
}

impl ReadGenerator {
    pub fn new(params: SimulateParams) -> SimulateResult<Self> {
        params.validate()?;
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self { params, rng })
    }

    pub fn params(&self) -> &SimulateParams {
        &self.params
    }

    /// Generate one read from `reference`.
    pub fn generate(&mut self, reference: &[Distance]) -> SimulateResult<Read> {
        if reference.len() < self.params.min_len {
            return Err(SimulateError::ReferenceTooShort {
                len: reference.len(),
                min: self.params.min_len,
            });
        }

        let max_len = self.params.max_len.min(reference.len());
        let length = self.rng.gen_range(self.params.min_len..=max_len);
        let start = self.rng.gen_range(0..=reference.len() - length);
        let slice = &reference[start..start + length];

        let plan = self.plan(length);
        let mut read = Read::new(start);
        let mut events = plan.into_iter().peekable();
        let mut q = 0;

        while q < length {
            let Some(event) = events.next_if(|e| e.offset == q) else {
                read.cuts.push(slice[q]);
                q += 1;
                continue;
            };

            match event.kind {
                SvKind::MissingSite => {
                    let (a, b) = (slice[q], slice[q + 1]);
                    read.cuts.push(a + b);
                    read.add_sv(Sv::missing_site(q, a + b, a));
                }
                SvKind::ExtraSite => {
                    let c = slice[q];
                    if c < 2 {
                        read.cuts.push(c);
                    } else {
                        let s = self.rng.gen_range(1..c);
                        read.cuts.extend_from_slice(&[s, c - s]);
                        read.add_sv(Sv::extra_site(q, c, s));
                    }
                }
                SvKind::Inversion => {
                    read.cuts.extend_from_slice(&[slice[q + 1], slice[q]]);
                    read.add_sv(Sv::inversion(q, 2));
                }
                SvKind::LongDelete => {
                    read.add_sv(Sv::long_delete(q, event.span));
                }
            }
            q += event.span;
        }

        log::trace!(
            "generated read at {} with {} distances and {} SVs",
            start,
            read.cuts.len(),
            read.svs.len()
        );
        Ok(read)
    }

    /// Generate `count` reads.
    pub fn generate_many(&mut self, reference: &[Distance], count: usize) -> SimulateResult<Vec<Read>> {
        (0..count).map(|_| self.generate(reference)).collect()
    }

    /// Pick SV kinds within budget and lay them out left to right.
    fn plan(&mut self, length: usize) -> Vec<Event> {
        let budgets = [
            (SvKind::MissingSite, self.params.max_missing_sites),
            (SvKind::ExtraSite, self.params.max_extra_sites),
            (SvKind::Inversion, self.params.max_inversions),
            (SvKind::LongDelete, self.params.max_long_deletes),
        ];

        let mut kinds = Vec::new();
        for (kind, max) in budgets {
            let count = self.rng.gen_range(0..=max);
            kinds.extend(std::iter::repeat(kind).take(count));
        }
        kinds.shuffle(&mut self.rng);

        let spacing = self.params.min_spacing;
        let mut offset = self.rng.gen_range(spacing..=2 * spacing);
        let mut events = Vec::with_capacity(kinds.len());

        for kind in kinds {
            let span = match kind {
                SvKind::MissingSite | SvKind::Inversion => 2,
                SvKind::ExtraSite => 1,
                SvKind::LongDelete => {
                    let (lo, hi) = self.params.long_delete_len;
                    self.rng.gen_range(lo..=hi)
                }
            };
            if offset + span + spacing > length {
                continue;
            }
            events.push(Event { offset, kind, span });
            offset += span + self.rng.gen_range(spacing..=2 * spacing);
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> Vec<Distance> {
        (0..200).map(|i| 1000 + (i * 37 % 200) * 4).collect()
    }

    /// Undo the recorded SVs to recover the reference slice.
    fn replay(read: &Read, reference: &[Distance]) -> bool {
        let mut expected = Vec::new();
        let mut q = 0;
        let mut svs = read.svs.iter().peekable();
        let slice = &reference[read.start_pos..];
        let mut cuts = read.cuts.iter();

        while expected.len() < read.cuts.len() {
            match svs.next_if(|sv| sv.local() == q) {
                Some(Sv::MissingSite { merged, .. }) => {
                    expected.push(*merged);
                    q += 2;
                }
                Some(Sv::ExtraSite { total, first, .. }) => {
                    expected.extend_from_slice(&[*first, total - first]);
                    q += 1;
                }
                Some(Sv::Inversion { .. }) => {
                    expected.extend_from_slice(&[slice[q + 1], slice[q]]);
                    q += 2;
                }
                Some(Sv::LongDelete { length, .. }) => q += length,
                None => {
                    expected.push(slice[q]);
                    q += 1;
                }
            }
        }
        expected.iter().all(|d| cuts.next() == Some(d))
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let params = SimulateParams { seed: Some(7), ..Default::default() };
        let a = ReadGenerator::new(params.clone()).unwrap().generate_many(&reference(), 5).unwrap();
        let b = ReadGenerator::new(params).unwrap().generate_many(&reference(), 5).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_exact_reads_are_slices() {
        let reference = reference();
        let mut generator = ReadGenerator::new(SimulateParams { seed: Some(3), ..SimulateParams::exact() }).unwrap();

        for _ in 0..20 {
            let read = generator.generate(&reference).unwrap();
            assert!(read.svs.is_empty());
            assert!((10..=100).contains(&read.len()));
            assert_eq!(read.cuts, reference[read.start_pos..read.start_pos + read.len()]);
        }
    }

    #[test]
    fn test_ground_truth_replays() {
        let reference = reference();
        let params = SimulateParams {
            max_missing_sites: 2,
            max_extra_sites: 2,
            max_inversions: 2,
            max_long_deletes: 1,
            seed: Some(11),
            ..Default::default()
        };
        let mut generator = ReadGenerator::new(params).unwrap();

        for _ in 0..50 {
            let read = generator.generate(&reference).unwrap();
            assert!(replay(&read, &reference), "read at {} does not replay", read.start_pos);
            for sv in &read.svs {
                assert_eq!(sv.global(), Some(read.start_pos + sv.local()));
            }
        }
    }

    #[test]
    fn test_reference_too_short() {
        let mut generator = ReadGenerator::new(SimulateParams { seed: Some(1), ..Default::default() }).unwrap();
        let err = generator.generate(&[1, 2, 3]).unwrap_err();
        assert!(matches!(err, SimulateError::ReferenceTooShort { len: 3, min: 10 }));
    }

    #[test]
    fn test_invalid_params() {
        let params = SimulateParams { min_len: 50, max_len: 20, ..Default::default() };
        assert!(matches!(ReadGenerator::new(params), Err(SimulateError::InvalidParams(_))));

        let params = SimulateParams { long_delete_len: (0, 3), ..Default::default() };
        assert!(ReadGenerator::new(params).is_err());
    }
}
