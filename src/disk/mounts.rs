//! Mount table parsing and per-mount analysis.

use super::classify::classify;
use super::probe::FsProbe;
use super::Disk;
use chrono::{DateTime, Local};
use std::collections::HashSet;
use std::path::Path;

pub const DEFAULT_MOUNT_TABLE: &str = "/proc/mounts";

/// Filesystems that are not backed by storage.
pub const VIRTUAL_FILESYSTEMS: &[&str] = &[
    "tmpfs",
    "devtmpfs",
    "sysfs",
    "proc",
    "cgroup",
    "cgroup2",
    "debugfs",
    "securityfs",
    "pstore",
    "efivarfs",
    "bpf",
    "tracefs",
    "hugetlbfs",
    "mqueue",
    "configfs",
    "ramfs",
    "autofs",
    "fusectl",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
    pub device: String,
    pub mount_point: String,
    pub filesystem: String,
    pub options: String,
}

impl MountEntry {
    fn parse(line: &str) -> Option<Self> {
        let mut fields = line.split_whitespace();
        let device = fields.next()?;
        let mount_point = fields.next()?;
        let filesystem = fields.next()?;
        let options = fields.next()?;

        Some(Self {
            device: unescape_field(device),
            mount_point: unescape_field(mount_point),
            filesystem: filesystem.to_string(),
            options: options.to_string(),
        })
    }
}

pub fn is_virtual_filesystem(filesystem: &str) -> bool {
    VIRTUAL_FILESYSTEMS.contains(&filesystem)
}

/// Parse mount table text into the entries worth inspecting.
///
/// The first line for a mount point claims it even when that line is then
/// dropped as a virtual filesystem. Lines with fewer than four fields are
/// ignored.
pub fn parse_mount_table(content: &str) -> Vec<MountEntry> {
    let mut seen_mounts = HashSet::new();

    content
        .lines()
        .filter_map(MountEntry::parse)
        .filter(|entry| seen_mounts.insert(entry.mount_point.clone()))
        .filter(|entry| !is_virtual_filesystem(&entry.filesystem))
        .collect()
}

/// Decode the `\ooo` octal escapes the kernel uses for whitespace and
/// backslashes in mount table fields.
pub fn unescape_field(field: &str) -> String {
    if !field.contains('\\') {
        return field.to_string();
    }

    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 3 < bytes.len() {
            let digits = &bytes[i + 1..i + 4];
            if digits.iter().all(|b| (b'0'..=b'7').contains(b)) {
                let value = digits
                    .iter()
                    .fold(0u32, |acc, d| acc * 8 + u32::from(d - b'0'));
                if let Ok(byte) = u8::try_from(value) {
                    out.push(byte);
                    i += 4;
                    continue;
                }
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Turn one mount entry into a [`Disk`].
///
/// Returns `None` when no classification rule matches or the capacity query
/// fails; neither case is an error.
pub fn analyze_mount(
    entry: &MountEntry,
    probe: &dyn FsProbe,
    now: DateTime<Local>,
) -> Option<Disk> {
    let disk_type = classify(&entry.device, &entry.filesystem, &entry.options)?;
    let capacity = probe.capacity(Path::new(&entry.mount_point)).ok()?;
    let link = probe.link_info(&entry.device, &entry.mount_point);

    Some(Disk {
        path: entry.device.clone(),
        device: entry.device.clone(),
        filesystem: entry.filesystem.clone(),
        size: capacity.size(),
        available: capacity.available(),
        used: capacity.used(),
        mount_point: entry.mount_point.clone(),
        disk_type,
        is_symlink: link.is_symlink,
        link_target: link.link_target,
        inode: link.inode,
        last_check: now,
    })
}
