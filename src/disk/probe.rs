//! Filesystem queries behind the disk scanner.
//!
//! The scanner never touches the filesystem directly; it asks an [`FsProbe`]
//! so that scans can be replayed against synthetic mount tables.

use std::fs;
use std::io;
use std::os::unix::fs::MetadataExt;
use std::path::Path;

/// Raw statvfs-style block counts for one filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    pub blocks: u64,
    pub blocks_free: u64,
    /// Blocks available to an unprivileged user.
    pub blocks_available: u64,
    pub block_size: u64,
}

impl Capacity {
    pub fn size(&self) -> u64 {
        self.blocks.saturating_mul(self.block_size)
    }

    pub fn available(&self) -> u64 {
        self.blocks_available
            .saturating_mul(self.block_size)
            .min(self.size())
    }

    /// Used space counts reserved blocks too, so `used + available` is
    /// usually smaller than `size`.
    pub fn used(&self) -> u64 {
        self.blocks
            .saturating_sub(self.blocks_free)
            .saturating_mul(self.block_size)
    }
}

/// Symlink and inode details of a mount's device node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkInfo {
    pub is_symlink: bool,
    pub link_target: Option<String>,
    pub inode: u64,
}

pub trait FsProbe {
    fn capacity(&self, path: &Path) -> io::Result<Capacity>;

    /// Inspect `device` without following it; fall back to the inode of
    /// `mount_point` when the device has none.
    fn link_info(&self, device: &str, mount_point: &str) -> LinkInfo;
}

/// Probe backed by the running kernel.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProbe;

impl FsProbe for SystemProbe {
    fn capacity(&self, path: &Path) -> io::Result<Capacity> {
        let stat = nix::sys::statvfs::statvfs(path).map_err(io::Error::from)?;
        Ok(Capacity {
            blocks: stat.blocks() as u64,
            blocks_free: stat.blocks_free() as u64,
            blocks_available: stat.blocks_available() as u64,
            block_size: stat.fragment_size() as u64,
        })
    }

    fn link_info(&self, device: &str, mount_point: &str) -> LinkInfo {
        let mut info = LinkInfo::default();

        if let Ok(meta) = fs::symlink_metadata(device) {
            if meta.file_type().is_symlink() {
                info.is_symlink = true;
                info.link_target = fs::canonicalize(device)
                    .ok()
                    .map(|p| p.to_string_lossy().into_owned());
            }
            info.inode = meta.ino();
        }

        if info.inode == 0 {
            if let Ok(meta) = fs::metadata(mount_point) {
                info.inode = meta.ino();
            }
        }

        info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn used_counts_reserved_blocks() {
        let cap = Capacity {
            blocks: 1000,
            blocks_free: 300,
            blocks_available: 250,
            block_size: 4096,
        };
        assert_eq!(cap.size(), 1000 * 4096);
        assert_eq!(cap.used(), 700 * 4096);
        assert_eq!(cap.available(), 250 * 4096);
        assert!(cap.used() + cap.available() < cap.size());
    }

    #[test]
    fn inconsistent_counts_stay_within_size() {
        let cap = Capacity {
            blocks: 10,
            blocks_free: 20,
            blocks_available: 40,
            block_size: 512,
        };
        assert_eq!(cap.used(), 0);
        assert_eq!(cap.available(), cap.size());
    }

    #[test]
    fn system_probe_reads_temp_dir() {
        let dir = tempfile::tempdir().unwrap();
        let cap = SystemProbe.capacity(dir.path()).unwrap();
        assert!(cap.block_size > 0);
        assert!(cap.used() <= cap.size());

        let info = SystemProbe.link_info("/nonexistent-device", &dir.path().to_string_lossy());
        assert!(!info.is_symlink);
        assert!(info.inode > 0);
    }

    #[test]
    fn system_probe_detects_symlinked_device() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("real");
        fs::write(&target, b"").unwrap();
        let link = dir.path().join("alias");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let info = SystemProbe.link_info(&link.to_string_lossy(), "/");
        assert!(info.is_symlink);
        assert_eq!(
            info.link_target.as_deref(),
            Some(fs::canonicalize(&target).unwrap().to_string_lossy().as_ref())
        );
    }
}
