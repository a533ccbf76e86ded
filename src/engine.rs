//! Engine Module
//!
//! Facade that owns the configuration and the block store.
//!
//! ## Responsibilities
//! - Open the data directory as a block store
//! - Create and open heap files
//! - Sort, check and search files with the configured policies

use std::path::Path;

use tracing::info;

use crate::block::{BlockStore, FileBlockStore};
use crate::config::{Config, MismatchPolicy};
use crate::error::Result;
use crate::heap::{sorted_file_name, HeapFile};
use crate::record::{Field, FieldValue, Record};
use crate::retrieval::{self, Retrieval};
use crate::sort::{ExternalSorter, SortOutcome};
use crate::verify::{SortCheck, SortVerifier};

/// The record storage and sorting engine
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Block files under `config.data_dir`
    store: FileBlockStore,
}

impl Engine {
    /// Open or create an engine with the given config
    ///
    /// On startup:
    /// 1. Validate the config
    /// 2. Create the data directory if needed
    /// 3. Remove scratch runs left by an interrupted sort
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;
        let store = FileBlockStore::open(&config.data_dir)?;
        store.remove_dir(&config.scratch_dir)?;

        info!(data_dir = %config.data_dir.display(), "engine opened");
        Ok(Self { config, store })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().data_dir(path).build())
    }

    // =========================================================================
    // Files
    // =========================================================================

    /// Create an empty, unsorted heap file
    pub fn create_file(&self, name: &str) -> Result<()> {
        HeapFile::create(&self.store, name)
    }

    /// Open a heap or sorted file
    pub fn open_file(&self, name: &str) -> Result<HeapFile<'_>> {
        HeapFile::open(&self.store, name)
    }

    /// Open `name`, append `records`, close
    pub fn insert_all<'r>(
        &self,
        name: &str,
        records: impl IntoIterator<Item = &'r Record>,
    ) -> Result<usize> {
        let mut file = self.open_file(name)?;
        let mut count = 0;
        for record in records {
            file.insert_entry(record)?;
            count += 1;
        }
        file.close()?;
        Ok(count)
    }

    pub fn file_exists(&self, name: &str) -> bool {
        self.store.exists(name)
    }

    // =========================================================================
    // Sort / Check / Retrieve
    // =========================================================================

    /// Sort `name` by `field` into `<name>_Sorted_<field>`
    pub fn sort_file(&self, name: &str, field: Field) -> Result<SortOutcome> {
        ExternalSorter::new(&self.store, &self.config).sort_file(name, field)
    }

    /// Check `name` is sorted by `field` under the configured policy
    pub fn check_sorted(&self, name: &str, field: Field) -> Result<SortCheck> {
        SortVerifier::new(&self.store, &self.config).check_sorted(name, field)
    }

    /// Check with an explicit mismatch policy
    pub fn check_sorted_with(
        &self,
        name: &str,
        field: Field,
        policy: MismatchPolicy,
    ) -> Result<SortCheck> {
        SortVerifier::new(&self.store, &self.config)
            .on_mismatch(policy)
            .check_sorted(name, field)
    }

    /// Full scan or equality search over a sorted file
    pub fn get_all_entries(
        &self,
        name: &str,
        field: Option<Field>,
        value: Option<&FieldValue>,
    ) -> Result<Retrieval> {
        let file = self.open_file(name)?;
        let result = retrieval::get_all_entries(&file, field, value)?;
        file.close()?;
        Ok(result)
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Name of the file `sort_file(name, field)` writes
    pub fn sorted_file_name(&self, name: &str, field: Field) -> String {
        sorted_file_name(name, field)
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Get the block store
    pub fn store(&self) -> &FileBlockStore {
        &self.store
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
