//! Chaining module for SVMap
//!
//! Picks a non-overlapping set of islands, strongest first, and walks each
//! one back through the path grid into a per-reference-position token track.

use crate::align::{Move, PathGrid};
use crate::island::Island;
use crate::types::Distance;
use std::fmt;

/// Parameters for chain selection
#[derive(Debug, Clone, Default)]
pub struct ChainParams {
    /// Maximum number of chains to accept; `None` keeps every compatible island
    pub max_chains: Option<usize>,
}

/// Symbol emitted for one reference position during backtracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// Read distance aligned to the position
    Match(Distance),
    /// Reference position with no read distance
    GapDown,
    /// Read distance with no reference position
    GapLeft,
    /// Reference distance folded into a merged read distance
    Missing(Distance),
    /// Two read distances covering one reference distance
    Extra(Distance, Distance),
    /// Read distance from a swapped pair
    Inverted(Distance),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Match(d) => write!(f, "{}", d),
            Token::GapDown => f.write_str("-"),
            Token::GapLeft => f.write_str("*"),
            Token::Missing(d) => write!(f, "{}s", d),
            Token::Extra(a, b) => write!(f, "{}+{}", a, b),
            Token::Inverted(d) => write!(f, "{}r", d),
        }
    }
}

/// Backtracked track of one accepted island.
#[derive(Debug, Clone)]
pub struct Chain {
    pub id: u32,
    pub island: Island,
    /// One entry per reference position; empty outside the chain
    pub track: Vec<String>,
}

impl Chain {
    fn new(id: u32, island: Island, len: usize) -> Self {
        Self {
            id,
            island,
            track: vec![String::new(); len],
        }
    }

    /// Put a token in front of whatever is already at `row`.
    fn prepend(&mut self, row: isize, token: Token) {
        if let Some(slot) = usize::try_from(row).ok().and_then(|r| self.track.get_mut(r)) {
            slot.insert_str(0, &token.to_string());
        }
    }

    /// Reference span `(first, last)` covered by tokens.
    pub fn span(&self) -> Option<(usize, usize)> {
        let first = self.track.iter().position(|t| !t.is_empty())?;
        let last = self.track.iter().rposition(|t| !t.is_empty())?;
        Some((first, last))
    }
}

/// Chain selection and backtracking
pub struct Chainer {
    params: ChainParams,
}

impl Chainer {
    pub fn new(params: ChainParams) -> Self {
        Self { params }
    }

    /// Greedily accept islands, strongest first, skipping any that conflict
    /// with an already accepted one.
    pub fn select(&self, mut islands: Vec<Island>) -> Vec<Island> {
        // Stable sort keeps scan order among equal scores
        islands.sort_by_key(|island| island.best);

        let mut accepted: Vec<Island> = Vec::new();
        for island in islands {
            if self.params.max_chains.is_some_and(|max| accepted.len() >= max) {
                break;
            }
            if island.conflicts_with_any(&accepted) {
                log::trace!(
                    "dropping island at ({}, {}) with score {}: overlaps accepted chain",
                    island.min_row,
                    island.min_col,
                    island.best
                );
                continue;
            }
            accepted.push(island);
        }

        accepted
    }

    /// Walk `island` back from its best cell and build its token track.
    pub fn backtrack(
        &self,
        id: u32,
        island: Island,
        paths: &PathGrid,
        reference: &[Distance],
        cuts: &[Distance],
    ) -> Chain {
        let mut chain = Chain::new(id, island, reference.len());
        let (mut r, mut c) = (island.best_row as isize, island.best_col as isize);

        loop {
            let mv = paths.get(r, c);
            if mv.is_terminal() {
                break;
            }

            // The fill guarantees every index below is inside its sequence
            let (ri, ci) = (r as usize, c as usize);
            match mv {
                Move::Match => chain.prepend(r, Token::Match(cuts[ci])),
                Move::GapDown => chain.prepend(r, Token::GapDown),
                Move::GapLeft => chain.prepend(r, Token::GapLeft),
                Move::MissingSite => {
                    chain.prepend(r, Token::Missing(reference[ri]));
                    chain.prepend(r - 1, Token::Missing(reference[ri - 1]));
                }
                Move::ExtraSite => chain.prepend(r, Token::Extra(cuts[ci - 1], cuts[ci])),
                Move::Inversion => {
                    chain.prepend(r, Token::Inverted(cuts[ci]));
                    chain.prepend(r - 1, Token::Inverted(cuts[ci - 1]));
                }
                Move::Reset | Move::Companion => unreachable!("terminal moves end the walk"),
            }

            let (dr, dc) = mv.footprint();
            r -= dr;
            c -= dc;
        }

        chain
    }

    /// Select islands and backtrack each accepted one.
    pub fn chain(
        &self,
        islands: Vec<Island>,
        paths: &PathGrid,
        reference: &[Distance],
        cuts: &[Distance],
    ) -> Vec<Chain> {
        let accepted = self.select(islands);
        log::debug!("accepted {} chains", accepted.len());

        accepted
            .into_iter()
            .enumerate()
            .map(|(id, island)| self.backtrack(id as u32, island, paths, reference, cuts))
            .collect()
    }
}

impl Default for Chainer {
    fn default() -> Self {
        Self::new(ChainParams::default())
    }
}
