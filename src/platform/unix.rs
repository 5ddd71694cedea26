use std::fs::Metadata;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use super::PermissionModel;
use crate::SymlinkType;

pub(super) const PERMISSION_MODEL: PermissionModel = PermissionModel::Posix;

pub(super) fn symlinks_supported() -> bool {
    true
}

pub(super) fn mode_bits(meta: &Metadata) -> u32 {
    meta.permissions().mode() & 0o777
}

/// Unix only learns the target type by following the link; a dangling link is unknown.
pub(super) fn symlink_type(path: &Path) -> SymlinkType {
    match std::fs::metadata(path) {
        Ok(m) if m.is_dir() => SymlinkType::Directory,
        Ok(_) => SymlinkType::File,
        Err(_) => SymlinkType::Unknown,
    }
}
