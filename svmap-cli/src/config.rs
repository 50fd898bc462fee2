//! Configuration handling for the SVMap CLI
//!
//! Supports loading configuration from svmap.toml files with CLI argument overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use svmap_core::{AlignParams, SimulateParams};

use crate::error::{CliError, CliResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub reference: ReferenceConfig,
    #[serde(default)]
    pub align: AlignConfig,
    #[serde(default)]
    pub simulate: SimulateConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable deterministic mode for reproducible results
    #[serde(default)]
    pub deterministic: bool,

    /// Default number of threads to use
    #[serde(default = "default_threads")]
    pub threads: usize,

    /// Read generator seed
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceConfig {
    /// Reference map (.cmap or .cmap.gz)
    #[serde(default = "default_cmap")]
    pub cmap: PathBuf,

    /// CMapId of the contig to align against
    #[serde(default = "default_contig")]
    pub contig: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignConfig {
    /// Minimum island support
    #[serde(default = "default_min_support")]
    pub min_support: i32,

    /// Upper bound on accepted chains per read
    #[serde(default)]
    pub max_chains: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulateConfig {
    /// Reads generated per run
    #[serde(default = "default_reads")]
    pub reads: usize,

    #[serde(default = "default_min_len")]
    pub min_len: usize,

    #[serde(default = "default_max_len")]
    pub max_len: usize,

    #[serde(default = "default_max_per_kind")]
    pub max_missing_sites: usize,

    #[serde(default = "default_max_per_kind")]
    pub max_extra_sites: usize,

    #[serde(default = "default_max_per_kind")]
    pub max_inversions: usize,

    #[serde(default = "default_max_per_kind")]
    pub max_long_deletes: usize,

    /// Shortest long delete, in distances
    #[serde(default = "default_long_delete_min")]
    pub long_delete_min: usize,

    /// Longest long delete, in distances
    #[serde(default = "default_long_delete_max")]
    pub long_delete_max: usize,

    /// Untouched distances around every injected SV
    #[serde(default = "default_min_spacing")]
    pub min_spacing: usize,
}

// Default value functions
fn default_threads() -> usize { num_cpus::get() }
fn default_cmap() -> PathBuf { PathBuf::from("hg19_BspQI.cmap") }
fn default_contig() -> u32 { 10 }
fn default_min_support() -> i32 { AlignParams::default().min_support }
fn default_reads() -> usize { 100 }
fn default_min_len() -> usize { SimulateParams::default().min_len }
fn default_max_len() -> usize { SimulateParams::default().max_len }
fn default_max_per_kind() -> usize { 1 }
fn default_long_delete_min() -> usize { SimulateParams::default().long_delete_len.0 }
fn default_long_delete_max() -> usize { SimulateParams::default().long_delete_len.1 }
fn default_min_spacing() -> usize { SimulateParams::default().min_spacing }

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            deterministic: false,
            threads: default_threads(),
            seed: None,
        }
    }
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            cmap: default_cmap(),
            contig: default_contig(),
        }
    }
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            min_support: default_min_support(),
            max_chains: None,
        }
    }
}

impl Default for SimulateConfig {
    fn default() -> Self {
        Self {
            reads: default_reads(),
            min_len: default_min_len(),
            max_len: default_max_len(),
            max_missing_sites: default_max_per_kind(),
            max_extra_sites: default_max_per_kind(),
            max_inversions: default_max_per_kind(),
            max_long_deletes: default_max_per_kind(),
            long_delete_min: default_long_delete_min(),
            long_delete_max: default_long_delete_max(),
            min_spacing: default_min_spacing(),
        }
    }
}

impl AlignConfig {
    pub fn params(&self) -> AlignParams {
        AlignParams {
            min_support: self.min_support,
            max_chains: self.max_chains,
        }
    }
}

impl SimulateConfig {
    pub fn params(&self, seed: Option<u64>) -> SimulateParams {
        SimulateParams {
            min_len: self.min_len,
            max_len: self.max_len,
            max_missing_sites: self.max_missing_sites,
            max_extra_sites: self.max_extra_sites,
            max_inversions: self.max_inversions,
            max_long_deletes: self.max_long_deletes,
            long_delete_len: (self.long_delete_min, self.long_delete_max),
            min_spacing: self.min_spacing,
            seed,
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> CliResult<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                // Try to find svmap.toml in current directory
                let default_path = PathBuf::from("svmap.toml");
                if default_path.exists() {
                    log::info!("Loading configuration from: svmap.toml");
                    Self::load_from_file(&default_path)?
                } else {
                    log::info!("Using default configuration");
                    Self::default()
                }
            }
        };

        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            return Err(CliError::file_not_found(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> CliResult<()> {
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Generate example configuration file content
    pub fn example_toml() -> CliResult<String> {
        Ok(toml::to_string_pretty(&Self::default())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.reference.cmap, PathBuf::from("hg19_BspQI.cmap"));
        assert_eq!(config.reference.contig, 10);
        assert_eq!(config.align.min_support, 2);
        assert_eq!(config.simulate.long_delete_min, 16);
    }

    #[test]
    fn test_config_roundtrip() -> CliResult<()> {
        let mut config = Config::default();
        config.general.seed = Some(99);
        config.align.max_chains = Some(3);
        let temp_file = NamedTempFile::new()?;

        config.save_to_file(temp_file.path())?;
        let loaded = Config::load_from_file(temp_file.path())?;

        assert_eq!(loaded.general.seed, Some(99));
        assert_eq!(loaded.align.max_chains, Some(3));
        assert_eq!(loaded.reference.contig, config.reference.contig);
        assert_eq!(loaded.simulate.max_len, config.simulate.max_len);

        Ok(())
    }

    #[test]
    fn test_partial_file_uses_defaults() -> CliResult<()> {
        let temp_file = NamedTempFile::new()?;
        std::fs::write(temp_file.path(), "[reference]\ncontig = 3\n\n[simulate]\nmax_inversions = 4\n")?;

        let config = Config::load_from_file(temp_file.path())?;
        assert_eq!(config.reference.contig, 3);
        assert_eq!(config.reference.cmap, PathBuf::from("hg19_BspQI.cmap"));
        assert_eq!(config.simulate.max_inversions, 4);
        assert_eq!(config.simulate.max_missing_sites, 1);

        let params = config.simulate.params(Some(5));
        assert_eq!(params.max_inversions, 4);
        assert_eq!(params.long_delete_len, (16, 24));
        assert_eq!(params.seed, Some(5));
        Ok(())
    }

    #[test]
    fn test_bad_toml_is_config_error() -> CliResult<()> {
        let temp_file = NamedTempFile::new()?;
        std::fs::write(temp_file.path(), "[align]\nmin_support = \"two\"\n")?;

        let err = Config::load_from_file(temp_file.path()).unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load_from_file(Path::new("/nonexistent/svmap.toml")).unwrap_err();
        assert!(matches!(err, CliError::FileNotFound { .. }));
    }

    #[test]
    fn test_example_toml_generation() -> CliResult<()> {
        let example = Config::example_toml()?;
        assert!(example.contains("[general]"));
        assert!(example.contains("[reference]"));
        assert!(example.contains("[align]"));
        assert!(example.contains("[simulate]"));
        Ok(())
    }
}
