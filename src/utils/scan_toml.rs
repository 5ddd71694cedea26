//! Load `.syncscan.toml` from the scanned directory (CLI only). The library takes options
//! through `ScanOpts` and never reads this file.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::utils::config::{HashingConsts, PackagePaths};

/// Resolved CLI options: defaults, then the settings file, then command-line flags.
#[derive(Clone, Debug)]
pub struct CliOpts {
    pub sub: PathBuf,
    pub block_size: usize,
    pub ignore_perms: bool,
    pub threads: Option<usize>,
    pub exclude: Vec<String>,
    pub previous: Option<PathBuf>,
    pub verbose: bool,
}

impl Default for CliOpts {
    fn default() -> Self {
        Self {
            sub: PathBuf::new(),
            block_size: HashingConsts::DEFAULT_BLOCK_SIZE,
            ignore_perms: false,
            threads: None,
            exclude: Vec::new(),
            previous: None,
            verbose: false,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ScanToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    block_size: Option<usize>,
    ignore_perms: Option<bool>,
    threads: Option<usize>,
    exclude: Option<Vec<String>>,
    previous: Option<String>,
    verbose: Option<bool>,
}

/// Load the settings file from `dir` if present. Returns None if missing or unreadable.
pub fn load_scan_toml(dir: &Path) -> Option<ScanToml> {
    let path = dir.join(PackagePaths::get().config_filename());
    let s = std::fs::read_to_string(&path).ok()?;
    toml::from_str(&s)
        .map_err(|e| log::warn!("{}: {}", path.display(), e))
        .ok()
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($section:expr, $opts:expr, $field:ident) => {
        if let Some(v) = $section.$field.clone() {
            $opts.$field = v;
        }
    };
}

impl ScanToml {
    /// Apply file settings to opts (only fields present in the file). Call before applying CLI flags.
    /// A relative `previous` path is taken relative to `dir`.
    pub fn apply_to(&self, dir: &Path, opts: &mut CliOpts) {
        let s = &self.settings;
        apply_file_opt!(s, opts, block_size);
        apply_file_opt!(s, opts, ignore_perms);
        apply_file_opt!(s, opts, exclude);
        apply_file_opt!(s, opts, verbose);
        if s.threads.is_some() {
            opts.threads = s.threads;
        }
        if let Some(ref p) = s.previous {
            opts.previous = Some(dir.join(p));
        }
    }
}
