//! SVMap Core Library
//!
//! Local alignment of optical-map reads (ordered inter-site distances) to a
//! reference, with structural variation calling from the alignment path.

pub mod types;
pub mod grid;
pub mod align;
pub mod island;
pub mod chain;
pub mod decode;
pub mod pipeline;
pub mod evaluate;
pub mod io;
#[cfg(feature = "simulate")] pub mod simulate;

// Re-export commonly used types and functions
pub use types::{Distance, Read, Reference, Sv, SvKind};
pub use grid::Grid;
pub use align::{fill, AlignmentMatrix, Move};
pub use island::{extract_islands, Island};
pub use chain::{Chain, ChainParams, Chainer};
pub use pipeline::{AlignParams, Aligner, AlignmentOutcome};
pub use evaluate::{evaluate, BatchSummary, ReadEvaluation};
#[cfg(feature = "simulate")]
pub use simulate::{ReadGenerator, SimulateError, SimulateParams};

/// Version information for the SVMap core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
