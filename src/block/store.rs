//! Block store
//!
//! The page-level I/O service the engine is built on, plus a file-backed
//! implementation.
//!
//! ## Concurrency:
//! - `open`: Protected by a Mutex (the open-file table)
//! - `next_id`: Atomic counter (lock-free)
//! - All methods use `&self`; callers still drive one file from one place

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::Mutex;

use crate::error::{BlockSortError, Result};

use super::{Block, BLOCK_SIZE};

/// Descriptor of an open file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(pub u32);

/// Block-granularity storage service
///
/// Files are named by `/`-separated paths relative to the store's root.
pub trait BlockStore {
    /// Create an empty file (zero blocks); fails if it already exists
    fn create_file(&self, name: &str) -> Result<()>;

    fn open_file(&self, name: &str) -> Result<FileId>;

    fn close_file(&self, file: FileId) -> Result<()>;

    /// Grow the file by one zeroed block
    fn allocate_block(&self, file: FileId) -> Result<()>;

    fn block_count(&self, file: FileId) -> Result<u32>;

    fn read_block(&self, file: FileId, index: u32) -> Result<Block>;

    fn write_block(&self, file: FileId, index: u32, block: &Block) -> Result<()>;

    /// Delete a closed file
    fn remove_file(&self, name: &str) -> Result<()>;

    /// Delete a directory of files and everything in it
    fn remove_dir(&self, name: &str) -> Result<()>;

    /// Move a closed file to `to`, replacing any file already there
    fn rename_file(&self, from: &str, to: &str) -> Result<()>;

    fn exists(&self, name: &str) -> bool;
}

/// An open file in the store's table
struct OpenFile {
    name: String,
    file: File,
    blocks: u32,
}

/// One OS file per logical file; block `i` lives at byte `i * BLOCK_SIZE`
pub struct FileBlockStore {
    /// Directory all file names are resolved against
    root: PathBuf,

    /// Open files keyed by descriptor
    open: Mutex<HashMap<FileId, OpenFile>>,

    /// Next descriptor to hand out
    next_id: AtomicU32,
}

impl FileBlockStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn open(root: &Path) -> Result<Self> {
        fs::create_dir_all(root)?;
        Ok(Self {
            root: root.to_path_buf(),
            open: Mutex::new(HashMap::new()),
            next_id: AtomicU32::new(1),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of files currently open (for testing/debugging)
    pub fn open_file_count(&self) -> usize {
        self.open.lock().len()
    }

    fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn with_file<T>(&self, id: FileId, f: impl FnOnce(&mut OpenFile) -> Result<T>) -> Result<T> {
        let mut open = self.open.lock();
        let entry = open.get_mut(&id).ok_or(BlockSortError::BadFileId(id.0))?;
        f(entry)
    }
}

impl OpenFile {
    fn check_index(&self, index: u32) -> Result<()> {
        if index >= self.blocks {
            return Err(BlockSortError::BlockOutOfRange {
                file: self.name.clone(),
                index,
                count: self.blocks,
            });
        }
        Ok(())
    }
}

impl BlockStore for FileBlockStore {
    fn create_file(&self, name: &str) -> Result<()> {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(BlockSortError::FileExists(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn open_file(&self, name: &str) -> Result<FileId> {
        let path = self.path(name);
        let file = match OpenOptions::new().read(true).write(true).open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(BlockSortError::FileNotFound(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        let len = file.metadata()?.len();
        if len % BLOCK_SIZE as u64 != 0 {
            return Err(BlockSortError::Corruption(format!(
                "'{}' is {} bytes, not a whole number of blocks",
                name, len
            )));
        }

        let id = FileId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.open.lock().insert(
            id,
            OpenFile {
                name: name.to_string(),
                file,
                blocks: (len / BLOCK_SIZE as u64) as u32,
            },
        );
        Ok(id)
    }

    fn close_file(&self, file: FileId) -> Result<()> {
        let entry = self
            .open
            .lock()
            .remove(&file)
            .ok_or(BlockSortError::BadFileId(file.0))?;
        entry.file.sync_all()?;
        Ok(())
    }

    fn allocate_block(&self, file: FileId) -> Result<()> {
        self.with_file(file, |f| {
            let offset = f.blocks as u64 * BLOCK_SIZE as u64;
            f.file.seek(SeekFrom::Start(offset))?;
            f.file.write_all(&[0u8; BLOCK_SIZE])?;
            f.blocks += 1;
            Ok(())
        })
    }

    fn block_count(&self, file: FileId) -> Result<u32> {
        self.with_file(file, |f| Ok(f.blocks))
    }

    fn read_block(&self, file: FileId, index: u32) -> Result<Block> {
        self.with_file(file, |f| {
            f.check_index(index)?;
            let mut bytes = vec![0u8; BLOCK_SIZE];
            f.file
                .seek(SeekFrom::Start(index as u64 * BLOCK_SIZE as u64))?;
            f.file.read_exact(&mut bytes)?;
            Block::from_bytes(bytes)
        })
    }

    fn write_block(&self, file: FileId, index: u32, block: &Block) -> Result<()> {
        self.with_file(file, |f| {
            f.check_index(index)?;
            f.file
                .seek(SeekFrom::Start(index as u64 * BLOCK_SIZE as u64))?;
            f.file.write_all(block.as_bytes())?;
            Ok(())
        })
    }

    fn remove_file(&self, name: &str) -> Result<()> {
        match fs::remove_file(self.path(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(BlockSortError::FileNotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn remove_dir(&self, name: &str) -> Result<()> {
        match fs::remove_dir_all(self.path(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn rename_file(&self, from: &str, to: &str) -> Result<()> {
        let target = self.path(to);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        match fs::rename(self.path(from), &target) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(BlockSortError::FileNotFound(from.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, name: &str) -> bool {
        self.path(name).is_file()
    }
}
