use super::probe::{Capacity, FsProbe, LinkInfo};
use super::{Disk, DiskType};
use chrono::Local;
use std::collections::HashMap;
use std::io;
use std::path::Path;

/// In-memory probe keyed by mount point.
#[derive(Default)]
pub struct FakeProbe {
    capacities: HashMap<String, Capacity>,
    links: HashMap<String, LinkInfo>,
}

impl FakeProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(
        mut self,
        mount_point: &str,
        blocks: u64,
        blocks_free: u64,
        blocks_available: u64,
        block_size: u64,
    ) -> Self {
        self.capacities.insert(
            mount_point.to_string(),
            Capacity {
                blocks,
                blocks_free,
                blocks_available,
                block_size,
            },
        );
        self
    }

    pub fn with_link(mut self, device: &str, info: LinkInfo) -> Self {
        self.links.insert(device.to_string(), info);
        self
    }
}

impl FsProbe for FakeProbe {
    fn capacity(&self, path: &Path) -> io::Result<Capacity> {
        self.capacities
            .get(path.to_string_lossy().as_ref())
            .copied()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such mount"))
    }

    fn link_info(&self, device: &str, _mount_point: &str) -> LinkInfo {
        self.links.get(device).cloned().unwrap_or_default()
    }
}

pub fn disk(
    path: &str,
    mount_point: &str,
    disk_type: DiskType,
    size: u64,
    used: u64,
    available: u64,
) -> Disk {
    Disk {
        path: path.to_string(),
        device: path.to_string(),
        filesystem: "ext4".to_string(),
        size,
        available,
        used,
        mount_point: mount_point.to_string(),
        disk_type,
        is_symlink: false,
        link_target: None,
        inode: 0,
        last_check: Local::now(),
    }
}
