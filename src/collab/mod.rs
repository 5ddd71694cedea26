//! Collaborators consulted during a scan: ignore rules, temp-file names, and the
//! previous index. The scanner only sees the traits; default implementations live here.

pub mod index;
pub mod matcher;
pub mod tempname;

use std::sync::Arc;

use crate::FileInfo;
use crate::version::VersionSource;

pub use index::MemoryIndex;
pub use matcher::IgnoreFile;
pub use tempname::PrefixTempNamer;

/// User ignore rules.
pub trait IgnoreMatcher: Send + Sync {
    /// True if `name` (relative, `/`-separated) should not be scanned.
    fn is_ignored(&self, name: &str, is_dir: bool) -> bool;
}

/// Recognizes names of in-progress downloads.
pub trait TempNamer: Send + Sync {
    /// Temporary name used while `name` is being written.
    fn temp_name(&self, name: &str) -> String;
    fn is_temporary(&self, name: &str) -> bool;
}

/// Records as seen at the last scan.
pub trait PreviousIndex: Send + Sync {
    fn lookup(&self, name: &str) -> Option<FileInfo>;
}

/// Everything a scan consults besides the filesystem.
#[derive(Clone)]
pub struct Collaborators {
    pub versions: Arc<dyn VersionSource>,
    pub matcher: Option<Arc<dyn IgnoreMatcher>>,
    pub temp_namer: Option<Arc<dyn TempNamer>>,
    pub previous: Option<Arc<dyn PreviousIndex>>,
}

impl Collaborators {
    /// No ignore rules, no temp names, no history: every entry is new.
    pub fn new(versions: Arc<dyn VersionSource>) -> Self {
        Self {
            versions,
            matcher: None,
            temp_namer: None,
            previous: None,
        }
    }

    pub fn with_matcher(mut self, matcher: Arc<dyn IgnoreMatcher>) -> Self {
        self.matcher = Some(matcher);
        self
    }

    pub fn with_temp_namer(mut self, temp_namer: Arc<dyn TempNamer>) -> Self {
        self.temp_namer = Some(temp_namer);
        self
    }

    pub fn with_previous(mut self, previous: Arc<dyn PreviousIndex>) -> Self {
        self.previous = Some(previous);
        self
    }
}
