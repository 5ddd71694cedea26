use std::fs::Metadata;
use std::os::windows::fs::FileTypeExt;
use std::path::Path;

use super::PermissionModel;
use crate::SymlinkType;

pub(super) const PERMISSION_MODEL: PermissionModel = PermissionModel::OwnerOnly;

/// Creating symlinks needs a privilege or developer mode; probe by trying once.
pub(super) fn symlinks_supported() -> bool {
    let dir = std::env::temp_dir();
    let target = dir.join(format!("{}-symlink-probe-target", env!("CARGO_PKG_NAME")));
    let link = dir.join(format!("{}-symlink-probe-link", env!("CARGO_PKG_NAME")));
    let _ = std::fs::remove_file(&link);
    let ok = std::os::windows::fs::symlink_file(&target, &link).is_ok();
    let _ = std::fs::remove_file(&link);
    ok
}

/// Read-only maps to r-x / r--, writable to rwx / rw- for everyone.
pub(super) fn mode_bits(meta: &Metadata) -> u32 {
    let base = if meta.is_dir() { 0o777 } else { 0o666 };
    if meta.permissions().readonly() {
        base & 0o555
    } else {
        base
    }
}

/// Windows records the link type at creation, so it is known even when the target is gone.
pub(super) fn symlink_type(path: &Path) -> SymlinkType {
    match std::fs::symlink_metadata(path) {
        Ok(m) if m.file_type().is_symlink_dir() => SymlinkType::Directory,
        Ok(_) => SymlinkType::File,
        Err(_) => SymlinkType::Unknown,
    }
}
