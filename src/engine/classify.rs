//! Change classification: decide per entry whether to record it, skip it, or skip its subtree.
//!
//! No I/O happens here; callers pass what lstat reported. Symlinks are the exception to
//! the one-shot decision: their content has to be read first, so [`Classifier::classify`]
//! lets them through and [`Classifier::symlink_verdict`] compares the hashed target.

use log::{debug, warn};
use std::fs::Metadata;

use crate::collab::{IgnoreMatcher, PreviousIndex, TempNamer};
use crate::engine::hashing::blocks_equal;
use crate::engine::tools::mtime_secs;
use crate::platform::PlatformOps;
use crate::utils::config::ReservedNames;
use crate::{BlockInfo, FileInfo, SymlinkType};

/// Entry kind as lstat sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatKind {
    File,
    Directory,
    Symlink,
    /// Device, socket, fifo.
    Other,
}

/// The parts of lstat the classifier needs.
#[derive(Clone, Copy, Debug)]
pub struct EntryStat {
    pub kind: StatKind,
    pub mode: u32,
    pub modified: i64,
}

impl EntryStat {
    /// Build from `symlink_metadata` output.
    pub fn from_metadata(meta: &Metadata, platform: &PlatformOps) -> Self {
        let ft = meta.file_type();
        let kind = if ft.is_symlink() {
            StatKind::Symlink
        } else if ft.is_dir() {
            StatKind::Directory
        } else if ft.is_file() {
            StatKind::File
        } else {
            StatKind::Other
        };
        Self {
            kind,
            mode: platform.mode_bits(meta),
            modified: mtime_secs(meta),
        }
    }
}

/// Traversal control for one entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Record it. `hint` is the previous version (0 if unknown) to tick past.
    Emit { hint: u64 },
    SkipEntry,
    SkipSubtree,
}

/// If the target is missing, Unix never knows the link type while Windows always does.
/// When this side doesn't know and the index does, accept the index's claim; otherwise
/// the two would flip the record back and forth.
pub fn symlink_type_equal(disk: SymlinkType, index: SymlinkType) -> bool {
    if disk == SymlinkType::Unknown && index != SymlinkType::Unknown {
        return true;
    }
    disk == index
}

/// True if `name` is already in composed normal form.
pub fn is_nfc(name: &str) -> bool {
    unicode_normalization::is_nfc(name)
}

pub struct Classifier<'a> {
    pub platform: &'a PlatformOps,
    pub ignore_perms: bool,
    pub matcher: Option<&'a dyn IgnoreMatcher>,
    pub temp_namer: Option<&'a dyn TempNamer>,
    pub previous: Option<&'a dyn PreviousIndex>,
}

impl Classifier<'_> {
    /// First match wins: reserved, temporary, ignored, non-NFC, then per-kind change checks.
    pub fn classify(&self, name: &str, stat: &EntryStat) -> Verdict {
        let is_dir = stat.kind == StatKind::Directory;
        let skip = if is_dir {
            Verdict::SkipSubtree
        } else {
            Verdict::SkipEntry
        };

        if ReservedNames::is_reserved(name) {
            debug!("reserved: {name}");
            return skip;
        }

        if self.temp_namer.is_some_and(|t| t.is_temporary(name)) {
            debug!("temporary: {name}");
            return Verdict::SkipEntry;
        }

        if self.matcher.is_some_and(|m| m.is_ignored(name, is_dir)) {
            debug!("ignored: {name}");
            return skip;
        }

        if self.platform.requires_nfc && !is_nfc(name) {
            warn!("File {name:?} contains non-NFC UTF-8 sequences and cannot be synced. Consider renaming.");
            return Verdict::SkipEntry;
        }

        match stat.kind {
            StatKind::Symlink if self.platform.symlinks_supported => Verdict::Emit { hint: 0 },
            StatKind::Symlink => {
                debug!("symlinks unsupported: {name}");
                Verdict::SkipEntry
            }
            StatKind::Directory => self.directory_verdict(name, stat),
            StatKind::File => self.file_verdict(name, stat),
            StatKind::Other => {
                debug!("unsupported type: {name}");
                Verdict::SkipEntry
            }
        }
    }

    /// Symlinks never compare mtime; only target type and target content.
    pub fn symlink_verdict(
        &self,
        name: &str,
        target_type: SymlinkType,
        blocks: &[BlockInfo],
    ) -> Verdict {
        let Some(cf) = self.lookup(name) else {
            return Verdict::Emit { hint: 0 };
        };
        let same = !cf.is_deleted()
            && cf
                .symlink_type()
                .is_some_and(|t| symlink_type_equal(target_type, t))
            && blocks_equal(&cf.blocks, blocks);
        if same {
            Verdict::SkipEntry
        } else {
            Verdict::Emit { hint: cf.version }
        }
    }

    fn directory_verdict(&self, name: &str, stat: &EntryStat) -> Verdict {
        let Some(cf) = self.lookup(name) else {
            return Verdict::Emit { hint: 0 };
        };
        if !cf.is_deleted() && cf.is_directory() && self.perms_unchanged(&cf, stat.mode) {
            return Verdict::SkipEntry;
        }
        Verdict::Emit { hint: cf.version }
    }

    fn file_verdict(&self, name: &str, stat: &EntryStat) -> Verdict {
        let Some(cf) = self.lookup(name) else {
            return Verdict::Emit { hint: 0 };
        };
        if !cf.is_deleted()
            && cf.is_file()
            && cf.modified == stat.modified
            && self.perms_unchanged(&cf, stat.mode)
        {
            return Verdict::SkipEntry;
        }
        debug!(
            "rescan: {name} (was mtime {} perms {:?}, now mtime {} perms {:o})",
            cf.modified, cf.permissions, stat.modified, stat.mode
        );
        Verdict::Emit { hint: cf.version }
    }

    fn perms_unchanged(&self, cf: &FileInfo, mode: u32) -> bool {
        self.ignore_perms
            || cf
                .permissions
                .is_none_or(|p| self.platform.perms_equal(p, mode))
    }

    fn lookup(&self, name: &str) -> Option<FileInfo> {
        self.previous.and_then(|p| p.lookup(name))
    }
}
