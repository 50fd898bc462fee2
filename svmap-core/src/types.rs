use serde::{Deserialize, Serialize};
use std::fmt;

/// Spacing between two consecutive label sites, in base pairs.
pub type Distance = u64;

/// Reference distance sequence for one contig of an optical map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub contig: u32,
    pub contig_length: u64,
    pub num_sites: usize,
    /// Site positions, starting with an implicit site at 0
    pub positions: Vec<u64>,
    pub distances: Vec<Distance>,
}

impl Reference {
    pub fn from_distances(contig: u32, distances: Vec<Distance>) -> Self {
        let mut positions = Vec::with_capacity(distances.len() + 1);
        positions.push(0);
        for &d in &distances {
            let last = *positions.last().unwrap_or(&0);
            positions.push(last + d);
        }

        Self {
            contig,
            contig_length: *positions.last().unwrap_or(&0),
            num_sites: distances.len(),
            positions,
            distances,
        }
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SvKind {
    MissingSite,
    ExtraSite,
    Inversion,
    LongDelete,
}

impl fmt::Display for SvKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SvKind::MissingSite => "missing_site",
            SvKind::ExtraSite => "extra_site",
            SvKind::Inversion => "inversion",
            SvKind::LongDelete => "long_delete",
        };
        f.write_str(name)
    }
}

/// A structural variation between a read and the reference.
///
/// `local` is the reference-relative offset from the start of the read's
/// mapped span. `global` is filled in once the SV is attached to a [`Read`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Sv {
    /// Two adjacent reference distances observed as their sum.
    MissingSite {
        local: usize,
        merged: Distance,
        first: Distance,
        #[serde(default)]
        global: Option<usize>,
    },
    /// One reference distance observed as two.
    ExtraSite {
        local: usize,
        total: Distance,
        first: Distance,
        #[serde(default)]
        global: Option<usize>,
    },
    Inversion {
        local: usize,
        length: usize,
        #[serde(default)]
        global: Option<usize>,
    },
    /// A run of reference distances absent from the read.
    LongDelete {
        local: usize,
        length: usize,
        #[serde(default)]
        global: Option<usize>,
    },
}

impl Sv {
    pub fn missing_site(local: usize, merged: Distance, first: Distance) -> Self {
        Sv::MissingSite { local, merged, first, global: None }
    }

    pub fn extra_site(local: usize, total: Distance, first: Distance) -> Self {
        Sv::ExtraSite { local, total, first, global: None }
    }

    pub fn inversion(local: usize, length: usize) -> Self {
        Sv::Inversion { local, length, global: None }
    }

    pub fn long_delete(local: usize, length: usize) -> Self {
        Sv::LongDelete { local, length, global: None }
    }

    pub fn kind(&self) -> SvKind {
        match self {
            Sv::MissingSite { .. } => SvKind::MissingSite,
            Sv::ExtraSite { .. } => SvKind::ExtraSite,
            Sv::Inversion { .. } => SvKind::Inversion,
            Sv::LongDelete { .. } => SvKind::LongDelete,
        }
    }

    pub fn local(&self) -> usize {
        match self {
            Sv::MissingSite { local, .. }
            | Sv::ExtraSite { local, .. }
            | Sv::Inversion { local, .. }
            | Sv::LongDelete { local, .. } => *local,
        }
    }

    pub fn global(&self) -> Option<usize> {
        match self {
            Sv::MissingSite { global, .. }
            | Sv::ExtraSite { global, .. }
            | Sv::Inversion { global, .. }
            | Sv::LongDelete { global, .. } => *global,
        }
    }

    /// Distance value for site events, run length for span events.
    pub fn length(&self) -> u64 {
        match self {
            Sv::MissingSite { merged, .. } => *merged,
            Sv::ExtraSite { total, .. } => *total,
            Sv::Inversion { length, .. } | Sv::LongDelete { length, .. } => *length as u64,
        }
    }

    fn with_global(mut self, start: usize) -> Self {
        let position = start + self.local();
        match &mut self {
            Sv::MissingSite { global, .. }
            | Sv::ExtraSite { global, .. }
            | Sv::Inversion { global, .. }
            | Sv::LongDelete { global, .. } => *global = Some(position),
        }
        self
    }
}

impl fmt::Display for Sv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} (length {})", self.kind(), self.local(), self.length())
    }
}

/// An optical read: its measured distances plus true and recovered placement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Read {
    pub cuts: Vec<Distance>,
    /// Ground-truth SVs, only known for simulated reads
    pub svs: Vec<Sv>,
    pub svs_guesses: Vec<Sv>,
    pub start_pos: usize,
    pub start_guess: usize,
}

impl Read {
    pub fn new(start_pos: usize) -> Self {
        Self {
            start_pos,
            ..Default::default()
        }
    }

    pub fn from_cuts(cuts: Vec<Distance>) -> Self {
        Self {
            cuts,
            ..Default::default()
        }
    }

    pub fn add_cuts(&mut self, cuts: &[Distance]) {
        self.cuts.extend_from_slice(cuts);
    }

    pub fn add_sv(&mut self, sv: Sv) {
        self.svs.push(sv.with_global(self.start_pos));
    }

    /// Record a recovered SV; `start_guess` must already be set.
    pub fn add_guess(&mut self, sv: Sv) {
        self.svs_guesses.push(sv.with_global(self.start_guess));
    }

    pub fn len(&self) -> usize {
        self.cuts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_positions() {
        let reference = Reference::from_distances(1, vec![10, 20, 30]);
        assert_eq!(reference.positions, vec![0, 10, 30, 60]);
        assert_eq!(reference.contig_length, 60);
        assert_eq!(reference.len(), 3);
    }

    #[test]
    fn test_global_positions() {
        let mut read = Read::new(40);
        read.add_sv(Sv::inversion(3, 2));
        read.start_guess = 38;
        read.add_guess(Sv::inversion(5, 2));

        assert_eq!(read.svs[0].global(), Some(43));
        assert_eq!(read.svs_guesses[0].global(), Some(43));
    }

    #[test]
    fn test_sv_serialization_tag() {
        let json = serde_json::to_string(&Sv::missing_site(1, 50, 20)).unwrap();
        assert!(json.contains("\"type\":\"missing_site\""));
        let back: Sv = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind(), SvKind::MissingSite);
        assert_eq!(back.length(), 50);
    }
}
