//! Syncscan: local scanning and change detection for a peer-to-peer file synchronizer

pub mod collab;
pub mod engine;
pub mod pipeline;
pub mod platform;
pub mod types;
pub mod utils;
pub mod version;

/// Re-export types for API
pub use types::*;

pub use collab::{
    Collaborators, IgnoreFile, IgnoreMatcher, MemoryIndex, PrefixTempNamer, PreviousIndex,
    TempNamer,
};
pub use pipeline::{ScanStream, WalkStats};
pub use version::{LamportClock, VersionSource};

use std::path::Path;

/// Result alias used by public syncscan API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point: scan `root` (or `root/opts.sub`) and stream a record for every
/// entry that is new or changed relative to `collab.previous`.
///
/// Returns an error before anything is visited if `root` is missing or not a directory.
/// Everything after that is absorbed: entries that cannot be read simply produce no record.
/// Directories and symlinks arrive in walk order; files arrive as their hashing finishes.
///
/// ```ignore
/// let clock = Arc::new(LamportClock::default());
/// let records = syncscan::scan(path, &ScanOpts::default(), Collaborators::new(clock))?
///     .collect_records()?;
/// ```
pub fn scan(root: &Path, opts: &ScanOpts, collab: Collaborators) -> Result<ScanStream> {
    let handles = pipeline::run_pipeline(root, opts, collab)?;
    Ok(ScanStream::new(handles))
}
