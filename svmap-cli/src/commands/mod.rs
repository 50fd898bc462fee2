//! Command implementations for the SVMap CLI

pub mod align;
pub mod simulate;

use anyhow::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use svmap_core::Reference;

use crate::config::Config;
use crate::error::CliError;

/// Load the reference contig, with CLI flags overriding the `[reference]` section.
pub fn load_reference(config: &Config, cmap: Option<PathBuf>, contig: Option<u32>) -> Result<Reference> {
    let cmap = cmap.unwrap_or_else(|| config.reference.cmap.clone());
    let contig = contig.unwrap_or(config.reference.contig);

    if !cmap.exists() {
        return Err(CliError::file_not_found(cmap).into());
    }

    log::info!("Loading contig {} from {}", contig, cmap.display());
    let reference = svmap_core::io::load_reference(&cmap, contig)
        .map_err(|err| CliError::reference(format!("{:#}", err)))?;
    log::info!("Reference has {} distances", reference.len());

    Ok(reference)
}

/// Buffered writer to `path`, or to stdout when no path is given.
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .map_err(|err| CliError::io(format!("Failed to create {}: {}", path.display(), err)))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(std::io::stdout().lock()))),
    }
}
