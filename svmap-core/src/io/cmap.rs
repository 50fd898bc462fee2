//! CMAP (consensus map) reference parser
//!
//! CMAP is the tab-separated label-position format of optical maps. Comment
//! lines start with `#`; data rows carry the columns
//! `CMapId ContigLength NumSites SiteID LabelChannel Position StdDev Coverage Occurrence`.
//! One contig is read into a [`Reference`] distance sequence.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use flate2::read::GzDecoder;
use thiserror::Error;

use crate::types::Reference;

#[derive(Debug, Error)]
pub enum CmapError {
    #[error("Invalid CMAP line {line}: expected at least {expected} fields, got {got}")]
    InsufficientFields { line: usize, expected: usize, got: usize },
    #[error("Invalid value in column {column} on line {line}: {value}")]
    InvalidValue { line: usize, column: &'static str, value: String },
    #[error("Contig {0} not found in CMAP")]
    ContigNotFound(u32),
    #[error("Label positions out of order on line {line}: {position} after {previous}")]
    UnorderedPosition { line: usize, position: u64, previous: u64 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CmapResult<T> = Result<T, CmapError>;

const MIN_FIELDS: usize = 9;

/// One parsed data row.
#[derive(Debug, Clone, PartialEq)]
pub struct CmapRow {
    pub contig: u32,
    pub contig_length: u64,
    pub num_sites: usize,
    pub site_id: u32,
    pub position: u64,
    pub occurrence: u32,
}

/// CMAP parser for reading one contig's label positions
pub struct CmapParser;

impl CmapParser {
    /// Parse a single data row. `line` is only used for error messages.
    pub fn parse_line(line_text: &str, line: usize) -> CmapResult<CmapRow> {
        let fields: Vec<&str> = line_text.trim_end().split('\t').collect();
        if fields.len() < MIN_FIELDS {
            return Err(CmapError::InsufficientFields {
                line,
                expected: MIN_FIELDS,
                got: fields.len(),
            });
        }

        let invalid = |column: &'static str, value: &str| CmapError::InvalidValue {
            line,
            column,
            value: value.to_string(),
        };
        // Lengths and positions are written as floats
        let float = |column: &'static str, value: &str| -> CmapResult<u64> {
            value
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(|v| v as u64)
                .ok_or_else(|| invalid(column, value))
        };

        let contig = fields[0].trim().parse().map_err(|_| invalid("CMapId", fields[0]))?;
        let contig_length = float("ContigLength", fields[1])?;
        let num_sites = fields[2].trim().parse().map_err(|_| invalid("NumSites", fields[2]))?;
        let site_id = fields[3].trim().parse().map_err(|_| invalid("SiteID", fields[3]))?;
        let position = float("Position", fields[5])?;
        let last = fields[fields.len() - 1];
        let occurrence = last.trim().parse().map_err(|_| invalid("Occurrence", last))?;

        Ok(CmapRow {
            contig,
            contig_length,
            num_sites,
            site_id,
            position,
            occurrence,
        })
    }

    /// Parse a CMAP file (optionally gzipped) and extract one contig
    pub fn parse_file<P: AsRef<Path>>(path: P, contig: u32) -> CmapResult<Reference> {
        let file = File::open(&path)?;
        let path_str = path.as_ref().to_string_lossy();

        if path_str.ends_with(".gz") {
            Self::parse_reader(BufReader::new(GzDecoder::new(file)), contig)
        } else {
            Self::parse_reader(BufReader::new(file), contig)
        }
    }

    /// Parse CMAP data from any BufRead source.
    ///
    /// Rows of `contig` with a non-zero occurrence become sites; reading stops
    /// at the first row of a higher contig id.
    pub fn parse_reader<R: BufRead>(reader: R, contig: u32) -> CmapResult<Reference> {
        let mut positions = vec![0u64];
        let mut distances = Vec::new();
        let mut contig_length = 0;
        let mut num_sites = 0;
        let mut found = false;

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            // Contig ids are sorted, so later contigs are never parsed
            let row_contig = line.split('\t').next().and_then(|f| f.trim().parse::<u32>().ok());
            if row_contig.is_some_and(|id| id > contig) {
                break;
            }

            let row = Self::parse_line(&line, idx + 1)?;
            if row.contig != contig || row.occurrence < 1 {
                continue;
            }

            found = true;
            contig_length = row.contig_length;
            num_sites = row.num_sites;

            let previous = *positions.last().unwrap_or(&0);
            if row.position < previous {
                return Err(CmapError::UnorderedPosition {
                    line: idx + 1,
                    position: row.position,
                    previous,
                });
            }
            distances.push(row.position - previous);
            positions.push(row.position);
        }

        if !found {
            return Err(CmapError::ContigNotFound(contig));
        }

        log::info!(
            "contig {}: {} of {} sites parsed, length {}",
            contig,
            distances.len(),
            num_sites,
            contig_length
        );

        Ok(Reference {
            contig,
            contig_length,
            num_sites,
            positions,
            distances,
        })
    }
}
