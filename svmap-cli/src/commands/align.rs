//! Align command implementation - place measured reads on a reference contig

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use svmap_core::{Aligner, Distance, Read, Sv};

use crate::commands::{load_reference, open_output};
use crate::config::Config;
use crate::error::{CliError, CliResult};

/// Where the reads come from
#[derive(Debug, Clone)]
pub enum ReadSource {
    /// A single read given on the command line
    Inline(String),
    /// One read per line
    File(PathBuf),
}

impl ReadSource {
    pub fn from_args(read: Option<String>, reads: Option<PathBuf>) -> CliResult<Self> {
        match (read, reads) {
            (Some(read), None) => Ok(Self::Inline(read)),
            (None, Some(path)) => Ok(Self::File(path)),
            (Some(_), Some(_)) => Err(CliError::validation("--read and --reads are mutually exclusive")),
            (None, None) => Err(CliError::validation("either --read or --reads is required")),
        }
    }
}

/// One output line per read.
#[derive(Debug, Serialize)]
pub struct AlignmentRecord<'a> {
    pub read: usize,
    pub aligned: bool,
    pub start_guess: usize,
    pub svs: &'a [Sv],
    /// Track entries from the first to the last aligned reference position
    pub track: &'a [String],
}

/// Parse distances separated by commas, tabs or spaces.
pub fn parse_distances(text: &str) -> Result<Vec<Distance>, String> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|field| !field.is_empty())
        .map(|field| match field.parse::<Distance>() {
            Ok(0) => Err("distances must be positive, got 0".to_string()),
            Ok(d) => Ok(d),
            Err(_) => Err(format!("bad distance '{}'", field)),
        })
        .collect()
}

fn read_file(path: &Path) -> Result<Vec<Read>> {
    if !path.exists() {
        return Err(CliError::file_not_found(path.to_path_buf()).into());
    }
    let reader = BufReader::new(
        File::open(path).with_context(|| format!("Failed to open reads file: {}", path.display()))?,
    );

    let mut reads = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read {}", path.display()))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let cuts = parse_distances(line).map_err(|message| {
            CliError::parse(path.display().to_string(), format!("line {}: {}", idx + 1, message))
        })?;
        reads.push(Read::from_cuts(cuts));
    }

    Ok(reads)
}

pub fn load_reads(source: &ReadSource) -> Result<Vec<Read>> {
    match source {
        ReadSource::Inline(text) => {
            let cuts = parse_distances(text)
                .map_err(|message| CliError::parse("--read".to_string(), message))?;
            Ok(vec![Read::from_cuts(cuts)])
        }
        ReadSource::File(path) => read_file(path),
    }
}

fn aligned_span(track: &[String]) -> &[String] {
    let first = track.iter().position(|token| !token.is_empty());
    let last = track.iter().rposition(|token| !token.is_empty());
    match (first, last) {
        (Some(first), Some(last)) => &track[first..=last],
        _ => &[],
    }
}

pub fn execute(
    config: &Config,
    cmap: Option<PathBuf>,
    contig: Option<u32>,
    source: ReadSource,
    out: Option<PathBuf>,
) -> Result<()> {
    log::info!("Starting alignment");

    let reference = load_reference(config, cmap, contig)?;
    let mut reads = load_reads(&source)?;
    log::info!("Aligning {} reads", reads.len());

    let aligner = Aligner::new(config.align.params());
    let outcomes = aligner.locate_all(&reference.distances, &mut reads);

    let mut writer = open_output(out.as_deref())?;
    let mut aligned = 0;
    for (idx, outcome) in outcomes.iter().enumerate() {
        aligned += usize::from(outcome.aligned);
        let record = AlignmentRecord {
            read: idx,
            aligned: outcome.aligned,
            start_guess: outcome.start_guess,
            svs: &reads[idx].svs_guesses,
            track: aligned_span(&outcome.track),
        };
        serde_json::to_writer(&mut writer, &record).context("Failed to write alignment record")?;
        writeln!(writer)?;
    }
    writer.flush()?;

    log::info!("Alignment completed: {} of {} reads aligned", aligned, reads.len());
    Ok(())
}
