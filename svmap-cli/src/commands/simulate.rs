//! Simulate command implementation - generate reads with known SVs and score the aligner

use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use svmap_core::{Aligner, BatchSummary, ReadGenerator};

use crate::commands::{load_reference, open_output};
use crate::config::Config;
use crate::deterministic::resolve_seed;

pub fn execute(
    config: &Config,
    deterministic: bool,
    cmap: Option<PathBuf>,
    contig: Option<u32>,
    reads: Option<usize>,
    seed: Option<u64>,
    out: Option<PathBuf>,
) -> Result<BatchSummary> {
    log::info!("Starting simulation");

    let reference = load_reference(config, cmap, contig)?;
    let count = reads.unwrap_or(config.simulate.reads);
    let seed = resolve_seed(seed, config.general.seed, deterministic, "simulate");
    if let Some(seed) = seed {
        log::info!("Read generator seed: {}", seed);
    }

    let mut generator = ReadGenerator::new(config.simulate.params(seed))
        .context("Invalid [simulate] configuration")?;
    let mut batch = generator
        .generate_many(&reference.distances, count)
        .context("Failed to generate reads")?;
    log::info!("Generated {} reads", batch.len());

    let aligner = Aligner::new(config.align.params());
    aligner.locate_all(&reference.distances, &mut batch);

    let summary = BatchSummary::from_reads(&batch);
    log::info!(
        "Start offsets recovered: {}/{} ({:.1}%)",
        summary.starts_correct,
        summary.reads,
        100.0 * summary.start_accuracy()
    );
    log::info!(
        "SVs recovered: {}/{} ({:.1}%), {} spurious",
        summary.matched_svs,
        summary.true_svs,
        100.0 * summary.sv_recall(),
        summary.spurious_svs
    );
    for (kind, tally) in &summary.by_kind {
        log::info!("  {}: {}/{}", kind, tally.matched, tally.truth);
    }

    if let Some(path) = out.as_deref() {
        let mut writer = open_output(Some(path))?;
        serde_json::to_writer_pretty(&mut writer, &batch).context("Failed to write simulated reads")?;
        writer.flush()?;
        log::info!("Reads written to: {}", path.display());
    }

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &summary).context("Failed to write summary")?;
    writeln!(stdout)?;

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::*;
    use svmap_core::Read;
    use tempfile::NamedTempFile;

    fn run(config: &Config, cmap: &NamedTempFile, seed: Option<u64>, out: Option<PathBuf>) -> BatchSummary {
        execute(config, false, Some(cmap.path().to_path_buf()), Some(1), Some(20), seed, out).unwrap()
    }

    #[test]
    fn test_seeded_runs_agree() {
        let cmap = write_cmap(&reference());
        let config = Config::default();

        let first = run(&config, &cmap, Some(17), None);
        let second = run(&config, &cmap, Some(17), None);

        assert_eq!(first.reads, 20);
        assert_eq!(first, second);
    }

    #[test]
    fn test_site_variants_are_recovered() {
        let cmap = write_cmap(&reference());
        let mut config = Config::default();
        config.simulate.max_long_deletes = 0;

        let summary = run(&config, &cmap, Some(3), None);
        assert_eq!(summary.starts_correct, 20);
        assert_eq!(summary.matched_svs, summary.true_svs);
        assert_eq!(summary.exact_reads, 20);
    }

    #[test]
    fn test_reads_written_with_truth_and_guesses() {
        let cmap = write_cmap(&reference());
        let out = NamedTempFile::new().unwrap();
        let config = Config::default();

        run(&config, &cmap, Some(5), Some(out.path().to_path_buf()));

        let text = std::fs::read_to_string(out.path()).unwrap();
        let reads: Vec<Read> = serde_json::from_str(&text).unwrap();
        assert_eq!(reads.len(), 20);
        for read in &reads {
            assert!(!read.cuts.is_empty());
            for sv in &read.svs {
                assert_eq!(sv.global(), Some(read.start_pos + sv.local()));
            }
        }
    }

    #[test]
    fn test_invalid_simulate_config() {
        let cmap = write_cmap(&reference());
        let mut config = Config::default();
        config.simulate.min_len = 50;
        config.simulate.max_len = 20;

        let result = execute(&config, false, Some(cmap.path().to_path_buf()), Some(1), Some(5), Some(1), None);
        assert!(result.unwrap_err().to_string().contains("Invalid [simulate] configuration"));
    }
}
