//! Structural variation decoding
//!
//! Chains are merged into one reference-indexed token track. Unexplained
//! positions inside the mapped span are relabelled as long-delete markers,
//! then the track is scanned left to right into [`Sv`] records.

use crate::chain::Chain;
use crate::types::{Distance, Sv};

pub const LONG_DELETE_MARK: &str = "d";

const MISSING: char = 's';
const EXTRA: char = '+';
const INVERTED: char = 'r';
const GAP_LEFT: char = '*';
const GAP_DOWN: char = '-';

/// Concatenate, per reference position, the tokens of every chain.
pub fn merge_tracks(chains: &[Chain], len: usize) -> Vec<String> {
    (0..len)
        .map(|k| {
            chains
                .iter()
                .filter_map(|chain| chain.track.get(k))
                .map(String::as_str)
                .collect::<String>()
        })
        .collect()
}

/// Read distances covered by a token that is not part of a missing-site pair.
fn read_span(token: &str) -> usize {
    if token.chars().all(|ch| ch == GAP_LEFT || ch == GAP_DOWN) {
        return 1;
    }
    let base = if token.contains(EXTRA) { 2 } else { 1 };
    base + token.matches(GAP_LEFT).count()
}

/// Relabel empty positions inside the mapped span as long-delete markers.
///
/// Walks the track counting read distances accounted for. A missing-site
/// pair counts once, on the token that closes it. Once every distance of the
/// read is accounted for the walk stops, so trailing empties stay empty.
pub fn mark_long_deletes(track: &mut [String], read_len: usize) {
    let mut consumed = 0usize;
    let mut open_pair = false;

    for token in track.iter_mut() {
        if consumed >= read_len {
            break;
        }

        if token.contains(MISSING) {
            open_pair = !open_pair;
            if !open_pair {
                consumed += 1;
            }
            consumed += token.matches(GAP_LEFT).count();
        } else if !token.is_empty() {
            consumed += read_span(token);
        } else if consumed > 0 {
            *token = LONG_DELETE_MARK.to_string();
        }
    }
}

/// Leading integer of a token, ignoring any suffix markers.
fn leading_distance(token: &str) -> Distance {
    let end = token
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(token.len());
    token[..end].parse().unwrap_or(0)
}

/// Start offset and SVs decoded from a relabelled track.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decoded {
    /// First mapped reference position, `None` when nothing aligned
    pub start: Option<usize>,
    pub svs: Vec<Sv>,
}

/// Scan a relabelled track into SV records with offsets local to the start.
pub fn decode_svs(track: &[String]) -> Decoded {
    let mut decoded = Decoded::default();
    let mut i = 0;

    while i < track.len() {
        let token = track[i].as_str();
        if token.is_empty() {
            i += 1;
            continue;
        }
        let start = *decoded.start.get_or_insert(i);
        let local = i - start;

        if token.contains(MISSING) {
            let first = leading_distance(token);
            match track.get(i + 1).filter(|next| next.contains(MISSING)) {
                Some(next) => {
                    decoded
                        .svs
                        .push(Sv::missing_site(local, first + leading_distance(next), first));
                    i += 2;
                }
                None => {
                    decoded.svs.push(Sv::missing_site(local, first, first));
                    i += 1;
                }
            }
        } else if let Some((left, right)) = token.split_once(EXTRA) {
            let first = leading_distance(left);
            decoded
                .svs
                .push(Sv::extra_site(local, first + leading_distance(right), first));
            i += 1;
        } else if token.contains(INVERTED) {
            let run = run_length(&track[i..], |t| t.contains(INVERTED));
            decoded.svs.push(Sv::inversion(local, run));
            i += run;
        } else if token == LONG_DELETE_MARK {
            let run = run_length(&track[i..], |t| t == LONG_DELETE_MARK);
            decoded.svs.push(Sv::long_delete(local, run));
            i += run;
        } else {
            i += 1;
        }
    }

    decoded
}

fn run_length(track: &[String], pred: impl Fn(&str) -> bool) -> usize {
    track.iter().take_while(|t| pred(t.as_str())).count()
}
