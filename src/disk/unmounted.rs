//! Block devices that are present but not mounted, and places to mount them.

use super::mounts::unescape_field;
use super::UnmountedDisk;
use crate::common::fs::is_writable;
use crate::ui::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const LSBLK_COLUMNS: &str = "NAME,SIZE,TYPE,LABEL,UUID,FSTYPE";

/// List unmounted disks and partitions that carry a filesystem.
///
/// A missing or failing `lsblk` yields an empty list. An unreadable mount
/// table is reported and treated as having nothing mounted.
pub fn scan_unmounted_disks(mount_table: &Path) -> Vec<UnmountedDisk> {
    let mounted = read_mounted_devices(mount_table);

    let output = match duct::cmd!("lsblk", "-rno", LSBLK_COLUMNS)
        .stderr_null()
        .read()
    {
        Ok(output) => output,
        Err(e) => {
            emit(
                Level::Debug,
                "disk.unmounted.lsblk_failed",
                &format!("lsblk unavailable: {}", e),
                None,
            );
            return Vec::new();
        }
    };

    parse_lsblk(&output, &mounted)
}

fn read_mounted_devices(mount_table: &Path) -> HashSet<String> {
    match fs::read_to_string(mount_table) {
        Ok(mounts) => mounted_devices(&mounts),
        Err(e) => {
            emit(
                Level::Warn,
                "disk.unmounted.mount_table_unreadable",
                &format!(
                    "{} Could not read {}: {}; every device counts as unmounted",
                    char::from(NerdFont::Warning),
                    mount_table.display(),
                    e
                ),
                None,
            );
            HashSet::new()
        }
    }
}

/// Device names from a mount table, with and without the `/dev/` prefix.
pub fn mounted_devices(mount_table: &str) -> HashSet<String> {
    let mut mounted = HashSet::new();
    for device in mount_table.lines().filter_map(|l| l.split_whitespace().next()) {
        let device = unescape_field(device);
        if let Some(short) = device.strip_prefix("/dev/") {
            mounted.insert(short.to_string());
        }
        mounted.insert(device);
    }
    mounted
}

/// Parse `lsblk -rno NAME,SIZE,TYPE,LABEL,UUID,FSTYPE` output.
///
/// Raw mode separates columns with single spaces and leaves empty columns
/// empty, so splitting on every space keeps each column in place.
pub fn parse_lsblk(output: &str, mounted: &HashSet<String>) -> Vec<UnmountedDisk> {
    output
        .lines()
        .filter_map(|line| {
            let fields: Vec<String> = line.split(' ').map(unescape_hex).collect();
            if fields.len() < 3 {
                return None;
            }

            let name = &fields[0];
            let kind = &fields[2];
            if kind != "disk" && kind != "part" {
                return None;
            }

            let device = format!("/dev/{}", name);
            if mounted.contains(&device) || mounted.contains(name) {
                return None;
            }

            let column = |i: usize| fields.get(i).cloned().unwrap_or_default();
            let filesystem = column(5);
            if filesystem.is_empty() {
                return None;
            }

            Some(UnmountedDisk {
                device,
                size: fields[1].clone(),
                kind: kind.clone(),
                label: column(3),
                uuid: column(4),
                filesystem,
            })
        })
        .collect()
}

/// Decode lsblk's `\xNN` escapes.
fn unescape_hex(field: &str) -> String {
    if !field.contains("\\x") {
        return field.to_string();
    }

    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && bytes.get(i + 1) == Some(&b'x') && i + 3 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 2..i + 4]).ok();
            if let Some(byte) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(byte);
                i += 4;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Directories that look like good mount points: empty subdirectories of the
/// usual mount roots, the roots themselves when writable, and a couple of
/// home folders.
pub fn suggest_mount_points() -> Vec<PathBuf> {
    let home = dirs::home_dir();
    let mut roots = vec![
        PathBuf::from("/mnt"),
        PathBuf::from("/media"),
        PathBuf::from("/run/media"),
    ];
    if let Some(home) = &home {
        roots.push(home.join("mnt"));
    }

    let mut suggestions = Vec::new();
    for root in roots.iter().filter(|r| r.is_dir()) {
        suggestions.extend(empty_subdirectories(root));
        if is_writable(root) {
            suggestions.push(root.clone());
        }
    }

    if let Some(home) = home {
        suggestions.push(home.join("Downloads"));
        suggestions.push(home.join("Documents"));
    }

    suggestions
}

fn empty_subdirectories(root: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(root) else {
        return Vec::new();
    };

    let mut dirs: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .filter(|p| {
            fs::read_dir(p)
                .map(|mut children| children.next().is_none())
                .unwrap_or(false)
        })
        .collect();
    dirs.sort();
    dirs
}
