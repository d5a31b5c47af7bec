use crate::ui::NerdFont;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;

/// How a storage location is attached to the system.
///
/// There is no "unknown" variant: a mount that matches no
/// classification rule never becomes a [`Disk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiskType {
    Physical,
    Lvm,
    Loop,
    Bind,
    Network,
    Fuse,
    Path,
    Manual,
    Symlink,
}

impl DiskType {
    pub const fn as_str(self) -> &'static str {
        match self {
            DiskType::Physical => "physical",
            DiskType::Lvm => "lvm",
            DiskType::Loop => "loop",
            DiskType::Bind => "bind",
            DiskType::Network => "network",
            DiskType::Fuse => "fuse",
            DiskType::Path => "path",
            DiskType::Manual => "manual",
            DiskType::Symlink => "symlink",
        }
    }

    pub const fn icon(self) -> NerdFont {
        match self {
            DiskType::Physical => NerdFont::HardDrive,
            DiskType::Lvm => NerdFont::Database,
            DiskType::Loop => NerdFont::Refresh,
            DiskType::Bind => NerdFont::Folder,
            DiskType::Network => NerdFont::Globe,
            DiskType::Fuse => NerdFont::Plug,
            DiskType::Path => NerdFont::FolderOpen,
            DiskType::Manual => NerdFont::Hand,
            DiskType::Symlink => NerdFont::Link,
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            DiskType::Physical => "Block device partition",
            DiskType::Lvm => "Device-mapper volume",
            DiskType::Loop => "Loop-mounted image",
            DiskType::Bind => "Bind mount",
            DiskType::Network => "Network share",
            DiskType::Fuse => "Userspace filesystem",
            DiskType::Path => "Path-backed mount",
            DiskType::Manual => "Manually added directory",
            DiskType::Symlink => "Symbolic link",
        }
    }
}

impl fmt::Display for DiskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One mounted (or manually added) storage location.
///
/// Byte counts always satisfy `used <= size` and `available <= size`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Disk {
    pub path: String,
    pub device: String,
    pub filesystem: String,
    pub size: u64,
    pub available: u64,
    pub used: u64,
    pub mount_point: String,
    #[serde(rename = "type")]
    pub disk_type: DiskType,
    pub is_symlink: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_target: Option<String>,
    pub inode: u64,
    pub last_check: DateTime<Local>,
}

impl Disk {
    /// Percentage of `size` in use, 0 for an empty filesystem.
    pub fn used_percent(&self) -> f64 {
        percent(self.used, self.size)
    }
}

pub(crate) fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

/// A block device that exists but is not mounted anywhere.
///
/// Informational only; never merged into the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmountedDisk {
    pub device: String,
    pub size: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
    pub uuid: String,
    pub filesystem: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_guards_zero_size() {
        assert_eq!(percent(10, 0), 0.0);
        assert_eq!(percent(25, 100), 25.0);
    }

    #[test]
    fn disk_type_serializes_lowercase() {
        let json = serde_json::to_string(&DiskType::Lvm).unwrap();
        assert_eq!(json, "\"lvm\"");
        assert_eq!(DiskType::Fuse.to_string(), "fuse");
    }
}
