//! Public types for the scanner: the metadata record, its blocks, and scan options.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::utils::config::HashingConsts;

/// What a symlink points at, as far as this replica can tell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymlinkType {
    File,
    Directory,
    /// Target missing or not resolvable here.
    Unknown,
}

/// Kind of a record. Symlinks carry the type of their target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
    Symlink(SymlinkType),
}

/// One fixed-size chunk of content: offset, length, and blake3 hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    pub offset: u64,
    pub size: u32,
    pub hash: [u8; 32],
}

/// Canonical description of one filesystem entry.
///
/// Records produced by a scan are never `deleted`; the flag exists because the
/// previous index (which holds the same shape) tracks deletions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Path relative to the scan root, `/`-separated.
    pub name: String,
    pub kind: EntryKind,
    /// Logical version from the version source at the time the change was seen.
    pub version: u64,
    /// POSIX permission bits, or `None` when permissions are not tracked.
    pub permissions: Option<u32>,
    /// Seconds since epoch. Always 0 for symlinks.
    pub modified: i64,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deleted: bool,
    #[serde(default)]
    pub blocks: Vec<BlockInfo>,
}

impl FileInfo {
    pub fn is_directory(&self) -> bool {
        matches!(self.kind, EntryKind::Directory)
    }

    pub fn is_symlink(&self) -> bool {
        matches!(self.kind, EntryKind::Symlink(_))
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, EntryKind::File)
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn has_permission_bits(&self) -> bool {
        self.permissions.is_some()
    }

    /// Target type for symlinks, `None` otherwise.
    pub fn symlink_type(&self) -> Option<SymlinkType> {
        match self.kind {
            EntryKind::Symlink(t) => Some(t),
            _ => None,
        }
    }

    /// Total content length covered by the block list.
    pub fn size(&self) -> u64 {
        self.blocks.iter().map(|b| b.size as u64).sum()
    }
}

/// Options for [`scan`](crate::scan).
#[derive(Clone, Debug)]
pub struct ScanOpts {
    /// Restrict the walk to this path inside the root. Empty means the whole root.
    pub sub: PathBuf,
    /// Block size used when hashing file and symlink content.
    pub block_size: usize,
    /// Do not track permission bits; emitted records carry `permissions: None`.
    pub ignore_perms: bool,
    /// Override hashing worker count. When None, uses available parallelism.
    pub num_threads: Option<usize>,
}

impl Default for ScanOpts {
    fn default() -> Self {
        Self {
            sub: PathBuf::new(),
            block_size: HashingConsts::DEFAULT_BLOCK_SIZE,
            ignore_perms: false,
            num_threads: None,
        }
    }
}
