//! End-to-end alignment of reads against a reference distance sequence
//!
//! fill → island extraction → chain selection → backtracking → merge →
//! SV decoding. Every run owns its grids, so reads can be aligned in
//! parallel without shared state.

use crate::align::fill;
use crate::chain::{ChainParams, Chainer};
use crate::decode::{decode_svs, mark_long_deletes, merge_tracks};
use crate::island::{extract_islands, Island};
use crate::types::{Distance, Read, Sv};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Parameters for the alignment pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignParams {
    /// Minimum `-best` score for an island to be kept. 2 rejects a lone match.
    pub min_support: i32,
    /// Upper bound on accepted chains per read
    pub max_chains: Option<usize>,
}

impl Default for AlignParams {
    fn default() -> Self {
        Self {
            min_support: 2,
            max_chains: None,
        }
    }
}

/// Everything recovered from one read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignmentOutcome {
    /// Recovered offset of the read on the reference
    pub start_guess: usize,
    /// Whether any chain was accepted
    pub aligned: bool,
    pub svs: Vec<Sv>,
    /// Merged, relabelled token track, one entry per reference position
    pub track: Vec<String>,
    pub chains: Vec<Island>,
}

pub struct Aligner {
    params: AlignParams,
    chainer: Chainer,
}

impl Aligner {
    pub fn new(params: AlignParams) -> Self {
        let chainer = Chainer::new(ChainParams {
            max_chains: params.max_chains,
        });
        Self { params, chainer }
    }

    pub fn params(&self) -> &AlignParams {
        &self.params
    }

    /// Align `cuts` against `reference` and decode the SVs.
    pub fn align(&self, reference: &[Distance], cuts: &[Distance]) -> AlignmentOutcome {
        let mut matrix = fill(reference, cuts);
        let islands = extract_islands(&mut matrix.scores, self.params.min_support);
        let chains = self.chainer.chain(islands, &matrix.paths, reference, cuts);

        let mut track = merge_tracks(&chains, reference.len());
        mark_long_deletes(&mut track, cuts.len());
        let decoded = decode_svs(&track);

        log::debug!(
            "read of {} distances: {} chains, start {:?}, {} SVs",
            cuts.len(),
            chains.len(),
            decoded.start,
            decoded.svs.len()
        );

        AlignmentOutcome {
            start_guess: decoded.start.unwrap_or(0),
            aligned: decoded.start.is_some(),
            svs: decoded.svs,
            track,
            chains: chains.into_iter().map(|chain| chain.island).collect(),
        }
    }

    /// Align a read and record the recovered start and SVs on it.
    pub fn locate(&self, reference: &[Distance], read: &mut Read) -> AlignmentOutcome {
        let outcome = self.align(reference, &read.cuts);

        read.start_guess = outcome.start_guess;
        read.svs_guesses.clear();
        for sv in &outcome.svs {
            read.add_guess(sv.clone());
        }

        outcome
    }

    /// Locate every read in parallel.
    pub fn locate_all(&self, reference: &[Distance], reads: &mut [Read]) -> Vec<AlignmentOutcome> {
        log::info!("aligning {} reads against {} reference distances", reads.len(), reference.len());
        reads
            .par_iter_mut()
            .map(|read| self.locate(reference, read))
            .collect()
    }
}

impl Default for Aligner {
    fn default() -> Self {
        Self::new(AlignParams::default())
    }
}
