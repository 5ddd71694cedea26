//! Platform capabilities: permission-bit semantics, symlink support, and filename
//! normalization policy. Resolved once per process via [`PlatformOps::current`].

use std::fs::Metadata;
use std::io;
use std::path::Path;
use std::sync::OnceLock;

use crate::SymlinkType;

// Platform-specific modules
#[cfg(unix)]
mod unix;
#[cfg(unix)]
use unix as sys;
#[cfg(windows)]
mod windows;
#[cfg(windows)]
use windows as sys;

/// How permission bits compare between disk and index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionModel {
    /// Only read-only vs writable exists; compare owner bits.
    OwnerOnly,
    /// All nine POSIX bits count.
    Posix,
}

impl PermissionModel {
    fn mask(self) -> u32 {
        match self {
            PermissionModel::OwnerOnly => 0o600,
            PermissionModel::Posix => 0o777,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PlatformOps {
    pub permission_model: PermissionModel,
    pub symlinks_supported: bool,
    /// Names must already be NFC to be recorded (filesystems that store bytes
    /// as given, unlike macOS which normalizes itself).
    pub requires_nfc: bool,
}

static PLATFORM: OnceLock<PlatformOps> = OnceLock::new();

impl PlatformOps {
    /// Capabilities of the running OS, detected on first use.
    pub fn current() -> &'static PlatformOps {
        PLATFORM.get_or_init(|| {
            let ops = PlatformOps {
                permission_model: sys::PERMISSION_MODEL,
                symlinks_supported: sys::symlinks_supported(),
                requires_nfc: cfg!(any(target_os = "linux", target_os = "windows")),
            };
            log::debug!("platform: {:?}", ops);
            ops
        })
    }

    pub fn perms_equal(&self, a: u32, b: u32) -> bool {
        let mask = self.permission_model.mask();
        a & mask == b & mask
    }

    /// Permission bits of `meta` as this platform reports them.
    pub fn mode_bits(&self, meta: &Metadata) -> u32 {
        sys::mode_bits(meta)
    }

    /// Link target as a string plus what it points at.
    pub fn read_link(&self, path: &Path) -> io::Result<(String, SymlinkType)> {
        let target = std::fs::read_link(path)?;
        let target = target.into_os_string().into_string().map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidData, "symlink target is not UTF-8")
        })?;
        Ok((target, sys::symlink_type(path)))
    }
}
