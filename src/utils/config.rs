//! Application configuration constants.
//! Reserved names, tuning and thresholds in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    config_filename: String,
    temp_prefix: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                config_filename: format!(".{pkg}.toml"),
                temp_prefix: format!(".{pkg}."),
            }
        })
    }

    /// Per-folder CLI settings file (e.g. `.syncscan.toml`).
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    /// Prefix of in-progress download names (e.g. `.syncscan.`).
    pub fn temp_prefix(&self) -> &str {
        &self.temp_prefix
    }

    /// Suffix of in-progress download names.
    pub fn temp_suffix(&self) -> &str {
        ".tmp"
    }
}

// ---- Reserved bookkeeping names ----

/// Names the scanner never records. These are shared with other replicas, so
/// they are fixed rather than derived from the package name.
pub struct ReservedNames;

impl ReservedNames {
    /// Ignore-rule file at any level.
    pub const IGNORE_FILE: &'static str = ".stignore";
    /// Folder marker at any level.
    pub const FOLDER_MARKER: &'static str = ".stfolder";
    /// Version-history folder; anything whose relative path starts with this is reserved.
    pub const VERSIONS_PREFIX: &'static str = ".stversions";

    /// True if `name` (relative, `/`-separated) is bookkeeping.
    pub fn is_reserved(name: &str) -> bool {
        let base = name.rsplit('/').next().unwrap_or(name);
        base == Self::IGNORE_FILE
            || base == Self::FOLDER_MARKER
            || name.starts_with(Self::VERSIONS_PREFIX)
    }
}

// ---- Worker threads ----

/// Thread limits for the hashing pool.
/// Use [`WorkerThreadLimits::current()`] to fill `all_threads` from rayon.
#[derive(Clone, Copy, Debug)]
pub struct WorkerThreadLimits {
    /// Available threads (from rayon); set by [`WorkerThreadLimits::current()`].
    pub all_threads: usize,
    /// Minimum pool size.
    pub floor: usize,
}

impl Default for WorkerThreadLimits {
    fn default() -> Self {
        Self {
            all_threads: 0, // use current() to set from rayon
            floor: Self::FLOOR_THREADS,
        }
    }
}

impl WorkerThreadLimits {
    pub const FLOOR_THREADS: usize = 1;

    /// Build limits with `all_threads` set from `rayon::current_num_threads()`.
    pub fn current() -> Self {
        Self {
            all_threads: rayon::current_num_threads(),
            ..Self::default()
        }
    }

    /// Pool size: the override if given, else all available threads, never below the floor.
    pub fn pool_size(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.all_threads).max(self.floor)
    }
}

// ---- Hashing ----

/// Block sizes and hashing I/O thresholds.
pub struct HashingConsts;

impl HashingConsts {
    /// Default block size (bytes). 128 KiB.
    pub const DEFAULT_BLOCK_SIZE: usize = 128 * 1024;
    /// File size above which hashing uses memory-mapped I/O (bytes). 100 MB.
    pub const HASH_MMAP_THRESHOLD: u64 = 100 * 1024 * 1024;
}

// ---- Channels ----

/// Capacity of the walker -> workers and workers -> caller channels. Zero makes
/// every send a rendezvous, so traversal is throttled to hashing throughput.
pub const HANDOFF_CHANNEL_CAP: usize = 0;
