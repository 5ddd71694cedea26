//! Path and metadata utilities

use anyhow::{Context, Result};
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

/// Convert absolute path to relative path from base
pub fn path_relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    path.strip_prefix(base).ok().map(|p| p.to_path_buf())
}

/// Record name for a relative path: `/`-separated, `None` if not valid UTF-8.
pub fn path_to_record_name(rel: &Path) -> Option<String> {
    let s = rel.to_str()?;
    if std::path::MAIN_SEPARATOR == '/' {
        Some(s.to_string())
    } else {
        Some(s.replace(std::path::MAIN_SEPARATOR, "/"))
    }
}

/// Last-write time in whole seconds since epoch (negative before 1970).
pub fn mtime_secs(meta: &Metadata) -> i64 {
    match meta.modified() {
        Ok(t) => match t.duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_secs() as i64,
            Err(e) => {
                let before = e.duration();
                let secs = before.as_secs() as i64;
                if before.subsec_nanos() > 0 {
                    -secs - 1
                } else {
                    -secs
                }
            }
        },
        Err(_) => 0,
    }
}

/// Fail unless `dir` exists and is itself a directory (not followed if a symlink).
pub fn check_dir(dir: &Path) -> Result<()> {
    let meta = std::fs::symlink_metadata(dir)
        .with_context(|| format!("scan root {}", dir.display()))?;
    if !meta.is_dir() {
        anyhow::bail!("scan root {}: not a directory", dir.display());
    }
    log::debug!("check_dir {} ok", dir.display());
    Ok(())
}
