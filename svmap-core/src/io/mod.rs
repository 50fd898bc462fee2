//! Reference file I/O for SVMap
//!
//! Loads reference distance sequences from optical-map files.

#[cfg(feature = "io-cmap")] pub mod cmap;

#[cfg(feature = "io-cmap")] pub use cmap::{CmapParser, CmapError, CmapRow};

use anyhow::{bail, Context, Result};
use std::path::Path;
use crate::types::Reference;

/// Load one contig of a reference map, choosing the parser by extension
pub fn load_reference<P: AsRef<Path>>(path: P, contig: u32) -> Result<Reference> {
    let path = path.as_ref();
    let path_str = path.to_string_lossy().to_lowercase();

    #[cfg(feature = "io-cmap")]
    if path_str.ends_with(".cmap") || path_str.ends_with(".cmap.gz") {
        return CmapParser::parse_file(path, contig)
            .with_context(|| format!("Failed to parse CMAP file: {}", path.display()));
    }

    bail!("Unsupported reference format: {}", path_str)
}
