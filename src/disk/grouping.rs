//! Grouping of individual disks into the drives an operator thinks in.

use super::types::percent;
use super::{Disk, DiskType};
use crate::ui::NerdFont;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Partitions smaller than this (EFI, BIOS boot) never form a data drive.
pub const MIN_GROUP_SIZE: u64 = 1024 * 1024 * 1024;

pub const BOOT_PREFIX: &str = "/boot";

/// Mount point prefixes that hold snapshots or runtime state, not data.
pub const TRANSIENT_PREFIXES: &[&str] = &["/snap", "/run", "/sys", "/proc"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DriveCategory {
    System,
    Data,
    Network,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriveGroup {
    pub name: String,
    pub icon: NerdFont,
    pub category: DriveCategory,
    pub total_size: u64,
    pub total_used: u64,
    pub available: u64,
    pub disks: Vec<Disk>,
    pub is_primary: bool,
    pub description: String,
}

impl DriveGroup {
    fn single(
        disk: &Disk,
        name: String,
        icon: NerdFont,
        category: DriveCategory,
        description: &str,
    ) -> Self {
        Self {
            name,
            icon,
            category,
            total_size: disk.size,
            total_used: disk.used,
            available: disk.available,
            disks: vec![disk.clone()],
            is_primary: false,
            description: description.to_string(),
        }
    }

    pub fn used_percent(&self) -> f64 {
        percent(self.total_used, self.total_size)
    }

    /// Disk that commands targeting this drive run against.
    pub fn primary_disk(&self) -> Option<&Disk> {
        self.disks.first()
    }
}

/// Build drive groups from a registry snapshot.
///
/// Order: the system drive, then data drives in the order their first member
/// appears in `disks`, then network drives. A device path that has been
/// placed in a group is not considered again, even if it is mounted twice.
pub fn group_disks(disks: &[Disk]) -> Vec<DriveGroup> {
    let mut grouped: HashSet<&str> = HashSet::new();

    let system = system_group(disks, &mut grouped);
    let data = data_groups(disks, &mut grouped);
    let network = network_groups(disks, &grouped);

    system.into_iter().chain(data).chain(network).collect()
}

fn system_group<'a>(disks: &'a [Disk], grouped: &mut HashSet<&'a str>) -> Option<DriveGroup> {
    let root = disks.iter().find(|d| d.mount_point == "/")?;

    let mut group = DriveGroup::single(
        root,
        "System Drive".to_string(),
        NerdFont::Desktop,
        DriveCategory::System,
        "Linux System",
    );
    group.is_primary = true;
    grouped.insert(&root.path);

    // Boot partitions add capacity but the free space shown is the root's.
    for disk in disks.iter().filter(|d| d.mount_point.starts_with(BOOT_PREFIX)) {
        group.disks.push(disk.clone());
        group.total_size += disk.size;
        group.total_used += disk.used;
        grouped.insert(&disk.path);
    }

    Some(group)
}

fn data_groups<'a>(disks: &'a [Disk], grouped: &mut HashSet<&'a str>) -> Vec<DriveGroup> {
    let mut groups: Vec<DriveGroup> = Vec::new();
    let mut by_base: HashMap<&str, usize> = HashMap::new();

    for disk in disks {
        if grouped.contains(disk.path.as_str()) || !is_data_candidate(disk) {
            continue;
        }

        let base = base_disk_name(&disk.path);
        match by_base.get(base) {
            Some(&idx) => {
                let group = &mut groups[idx];
                group.disks.push(disk.clone());
                group.total_size += disk.size;
                group.total_used += disk.used;
                group.available += disk.available;
            }
            None => {
                let name = drive_name(disk, groups.len() + 1);
                by_base.insert(base, groups.len());
                groups.push(DriveGroup::single(
                    disk,
                    name,
                    drive_icon(disk),
                    DriveCategory::Data,
                    drive_description(disk),
                ));
            }
        }
        grouped.insert(&disk.path);
    }

    groups
}

fn network_groups(disks: &[Disk], grouped: &HashSet<&str>) -> Vec<DriveGroup> {
    disks
        .iter()
        .filter(|d| !grouped.contains(d.path.as_str()))
        .filter(|d| matches!(d.disk_type, DiskType::Network | DiskType::Fuse))
        .map(|d| {
            DriveGroup::single(
                d,
                network_drive_name(d),
                NerdFont::Globe,
                DriveCategory::Network,
                "Network Storage",
            )
        })
        .collect()
}

fn is_data_candidate(disk: &Disk) -> bool {
    disk.disk_type != DiskType::Loop
        && !TRANSIENT_PREFIXES
            .iter()
            .any(|prefix| disk.mount_point.starts_with(prefix))
        && disk.size >= MIN_GROUP_SIZE
}

/// Strip the partition number: `/dev/sda1` -> `/dev/sda`.
pub fn base_disk_name(path: &str) -> &str {
    path.trim_end_matches(|c: char| c.is_ascii_digit())
}

fn drive_name(disk: &Disk, index: usize) -> String {
    let mount = disk.mount_point.as_str();
    if mount.contains("home") {
        "Home Drive".to_string()
    } else if mount.contains("data") {
        "Data Drive".to_string()
    } else if mount.contains("backup") {
        "Backup Drive".to_string()
    } else if mount.contains("media") {
        "Media Drive".to_string()
    } else if disk.disk_type == DiskType::Lvm {
        format!("Volume {index}")
    } else if disk.path.starts_with("/dev/nvme") {
        format!("SSD Drive {index}")
    } else if disk.path.starts_with("/dev/sd") {
        format!("Drive {index}")
    } else {
        format!("Storage {index}")
    }
}

fn drive_icon(disk: &Disk) -> NerdFont {
    if disk.path.starts_with("/dev/nvme") {
        return NerdFont::Bolt;
    }
    match disk.disk_type {
        DiskType::Network => NerdFont::Globe,
        DiskType::Lvm => NerdFont::Database,
        DiskType::Physical
        | DiskType::Loop
        | DiskType::Bind
        | DiskType::Fuse
        | DiskType::Path
        | DiskType::Manual
        | DiskType::Symlink => NerdFont::HardDrive,
    }
}

fn drive_description(disk: &Disk) -> &'static str {
    if disk.path.starts_with("/dev/nvme") {
        "NVMe SSD"
    } else if disk.disk_type == DiskType::Lvm {
        "Logical Volume"
    } else if disk.path.starts_with("/dev/sd") {
        "Hard Drive"
    } else {
        "Storage Device"
    }
}

fn network_drive_name(disk: &Disk) -> String {
    if disk.disk_type != DiskType::Network {
        return "Remote Storage".to_string();
    }
    match network_host(&disk.path) {
        Some(host) => format!("Network ({host})"),
        None => "Network Drive".to_string(),
    }
}

/// Server part of `host:/export` or `//host/share`.
fn network_host(source: &str) -> Option<&str> {
    if let Some(rest) = source.strip_prefix("//") {
        return rest.split('/').next().filter(|h| !h.is_empty());
    }
    source
        .split_once(":/")
        .map(|(host, _)| host)
        .filter(|h| !h.is_empty() && !h.contains('/'))
}
