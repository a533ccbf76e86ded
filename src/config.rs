//! Configuration for blocksort
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{BlockSortError, Result};

/// Main configuration for a blocksort engine
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for all block files
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── <heap files>           (one OS file per logical file)
    ///     ├── <name>_Sorted_<field>  (sort output)
    ///     └── tmp_runs/              (scratch runs, only while sorting)
    pub data_dir: PathBuf,

    /// Scratch directory for temporary run files, relative to `data_dir`
    pub scratch_dir: String,

    // -------------------------------------------------------------------------
    // Sort / Check Configuration
    // -------------------------------------------------------------------------
    /// What to do when a file is recorded as sorted by another field
    pub on_mismatch: MismatchPolicy,

    /// Verify the first input of every merge is sorted (slow, debug aid)
    pub verify_runs: bool,
}

/// Policy for a sorted-by field that differs from the requested one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchPolicy {
    /// Refuse with `SortFieldMismatch`
    Abort,

    /// Log a warning and carry on
    ProceedAnyway,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./blocksort_data"),
            scratch_dir: "tmp_runs".to_string(),
            on_mismatch: MismatchPolicy::Abort,
            verify_runs: cfg!(debug_assertions),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check values that cannot be expressed in the types
    pub fn validate(&self) -> Result<()> {
        let scratch = self.scratch_dir.trim();
        if scratch.is_empty() {
            return Err(BlockSortError::Config(
                "scratch_dir must not be empty".to_string(),
            ));
        }
        if scratch.contains("..") || scratch.starts_with('/') {
            return Err(BlockSortError::Config(format!(
                "scratch_dir must stay inside data_dir: {}",
                scratch
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for all block files)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the scratch directory name used while sorting
    pub fn scratch_dir(mut self, name: impl Into<String>) -> Self {
        self.config.scratch_dir = name.into();
        self
    }

    /// Set the sort-field mismatch policy
    pub fn on_mismatch(mut self, policy: MismatchPolicy) -> Self {
        self.config.on_mismatch = policy;
        self
    }

    /// Enable or disable the per-merge run self-check
    pub fn verify_runs(mut self, enabled: bool) -> Self {
        self.config.verify_runs = enabled;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
