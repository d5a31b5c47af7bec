use super::error::DiskError;
use super::grouping::{DriveGroup, group_disks};
use super::mounts::{analyze_mount, parse_mount_table};
use super::probe::{FsProbe, SystemProbe};
use super::stats::DiskStats;
use super::{Disk, DiskType};
use crate::ui::prelude::*;
use chrono::{DateTime, Local};
use std::fs;
use std::io;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

/// Result of one pass over the mount table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub added: usize,
    /// Storage-backed entries that were dropped (no classification or
    /// capacity query failed).
    pub skipped: usize,
}

/// Owns the discovered disks for one scan cycle.
///
/// Scans append; callers that want a fresh inventory call [`clear`] first.
///
/// [`clear`]: DiskRegistry::clear
pub struct DiskRegistry {
    disks: Vec<Disk>,
    mount_table: PathBuf,
    probe: Box<dyn FsProbe>,
    last_scan: Option<DateTime<Local>>,
}

impl DiskRegistry {
    pub fn new(mount_table: impl Into<PathBuf>) -> Self {
        Self::with_probe(mount_table, SystemProbe)
    }

    pub fn with_probe(mount_table: impl Into<PathBuf>, probe: impl FsProbe + 'static) -> Self {
        Self {
            disks: Vec::new(),
            mount_table: mount_table.into(),
            probe: Box::new(probe),
            last_scan: None,
        }
    }

    pub fn mount_table(&self) -> &Path {
        &self.mount_table
    }

    /// Read the mount table and append every disk it yields.
    pub fn scan(&mut self) -> Result<ScanReport, DiskError> {
        let content =
            fs::read_to_string(&self.mount_table).map_err(|source| DiskError::MountTable {
                path: self.mount_table.clone(),
                source,
            })?;
        Ok(self.scan_table(&content))
    }

    /// Same as [`scan`](Self::scan) but over already-loaded mount table text.
    pub fn scan_table(&mut self, content: &str) -> ScanReport {
        let now = Local::now();
        self.last_scan = Some(now);

        let mut report = ScanReport::default();
        for entry in parse_mount_table(content) {
            match analyze_mount(&entry, self.probe.as_ref(), now) {
                Some(disk) => {
                    self.disks.push(disk);
                    report.added += 1;
                }
                None => {
                    emit(
                        Level::Debug,
                        "disk.scan.skipped",
                        &format!(
                            "Skipping {} on {} ({})",
                            entry.device, entry.mount_point, entry.filesystem
                        ),
                        None,
                    );
                    report.skipped += 1;
                }
            }
        }
        report
    }

    /// Register a directory the operator picked by hand.
    pub fn add_manual(&mut self, path: impl AsRef<Path>) -> Result<Disk, DiskError> {
        let path = path.as_ref();
        let abs_path = std::path::absolute(path).map_err(|e| DiskError::PathValidation {
            path: path.to_path_buf(),
            reason: format!("failed to get absolute path: {e}"),
        })?;

        let meta = fs::metadata(&abs_path).map_err(|e| DiskError::PathValidation {
            path: abs_path.clone(),
            reason: match e.kind() {
                io::ErrorKind::NotFound => "path does not exist".to_string(),
                _ => format!("failed to stat path: {e}"),
            },
        })?;

        if !meta.is_dir() {
            return Err(DiskError::PathValidation {
                path: abs_path,
                reason: "path is not a directory".to_string(),
            });
        }

        let capacity = self
            .probe
            .capacity(&abs_path)
            .map_err(|source| DiskError::Capacity {
                path: abs_path.clone(),
                source,
            })?;

        let path_str = abs_path.to_string_lossy().into_owned();
        let disk = Disk {
            path: path_str.clone(),
            device: path_str.clone(),
            filesystem: "unknown".to_string(),
            size: capacity.size(),
            available: capacity.available(),
            used: capacity.used(),
            mount_point: path_str,
            disk_type: DiskType::Manual,
            is_symlink: false,
            link_target: None,
            inode: meta.ino(),
            last_check: Local::now(),
        };
        self.disks.push(disk.clone());
        Ok(disk)
    }

    pub fn clear(&mut self) {
        self.disks.clear();
        self.last_scan = None;
    }

    /// Disks in insertion order: scanned entries first, then manual ones.
    pub fn list(&self) -> &[Disk] {
        &self.disks
    }

    pub fn is_empty(&self) -> bool {
        self.disks.is_empty()
    }

    pub fn last_scan(&self) -> Option<DateTime<Local>> {
        self.last_scan
    }

    pub fn find_by_mount_point(&self, mount_point: &str) -> Option<&Disk> {
        self.disks.iter().find(|d| d.mount_point == mount_point)
    }

    pub fn stats(&self) -> DiskStats {
        DiskStats::from_disks(&self.disks)
    }

    pub fn groups(&self) -> Vec<DriveGroup> {
        group_disks(&self.disks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disk::DriveCategory;
    use crate::disk::test_support::FakeProbe;

    const GIB_BLOCKS: u64 = 1024 * 1024;

    fn scenario_probe() -> FakeProbe {
        FakeProbe::new()
            .with_capacity("/", 20 * GIB_BLOCKS, 8 * GIB_BLOCKS, 7 * GIB_BLOCKS, 1024)
            .with_capacity("/boot", 2 * GIB_BLOCKS, GIB_BLOCKS, GIB_BLOCKS, 1024)
    }

    const SCENARIO: &str = "/dev/sda1 / ext4 rw 0 0\n\
                            /dev/sda2 /boot ext4 rw 0 0\n\
                            tmpfs /run tmpfs rw 0 0\n";

    #[test]
    fn scan_builds_disks_and_system_group() {
        let mut registry = DiskRegistry::with_probe("/unused", scenario_probe());
        let report = registry.scan_table(SCENARIO);

        assert_eq!(report, ScanReport { added: 2, skipped: 0 });
        assert_eq!(registry.list().len(), 2);
        assert!(registry.last_scan().is_some());

        let groups = registry.groups();
        assert_eq!(groups.len(), 1);
        let system = &groups[0];
        assert_eq!(system.category, DriveCategory::System);
        assert_eq!(system.disks.len(), 2);

        let root = registry.find_by_mount_point("/").unwrap();
        let boot = registry.find_by_mount_point("/boot").unwrap();
        assert_eq!(system.total_size, root.size + boot.size);
        assert_eq!(system.available, root.available);
    }

    #[test]
    fn scan_appends_until_cleared() {
        let mut registry = DiskRegistry::with_probe("/unused", scenario_probe());
        registry.scan_table(SCENARIO);
        registry.scan_table(SCENARIO);
        assert_eq!(registry.list().len(), 4);

        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.last_scan().is_none());

        registry.scan_table(SCENARIO);
        assert_eq!(registry.list().len(), 2);
    }

    #[test]
    fn scan_reports_failed_capacity_as_skipped() {
        let mut registry = DiskRegistry::with_probe("/unused", scenario_probe());
        let report = registry.scan_table("/dev/sdb1 /mnt/offline ext4 rw 0 0\n");
        assert_eq!(report, ScanReport { added: 0, skipped: 1 });
        assert!(registry.is_empty());
    }

    #[test]
    fn scan_reads_mount_table_file() {
        let dir = tempfile::tempdir().unwrap();
        let table = dir.path().join("mounts");
        fs::write(&table, SCENARIO).unwrap();

        let mut registry = DiskRegistry::with_probe(&table, scenario_probe());
        let report = registry.scan().unwrap();
        assert_eq!(report.added, 2);
    }

    #[test]
    fn unreadable_mount_table_is_an_error() {
        let mut registry = DiskRegistry::with_probe("/nonexistent/mounts", scenario_probe());
        let err = registry.scan().unwrap_err();
        assert!(matches!(err, DiskError::MountTable { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn add_manual_directory() {
        let dir = tempfile::tempdir().unwrap();
        let probe =
            FakeProbe::new().with_capacity(&dir.path().to_string_lossy(), 100, 40, 30, 4096);
        let mut registry = DiskRegistry::with_probe("/unused", probe);

        let disk = registry.add_manual(dir.path()).unwrap();
        assert_eq!(disk.disk_type, DiskType::Manual);
        assert_eq!(disk.filesystem, "unknown");
        assert_eq!(disk.mount_point, dir.path().to_string_lossy());
        assert_eq!(disk.used, 60 * 4096);
        assert!(disk.inode > 0);
        assert_eq!(registry.list().len(), 1);
        assert_eq!(registry.list()[0].mount_point, disk.mount_point);
    }

    #[test]
    fn add_manual_rejects_missing_and_non_directories() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        let mut registry = DiskRegistry::with_probe("/unused", FakeProbe::new());

        let err = registry.add_manual(dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, DiskError::PathValidation { .. }));

        let err = registry.add_manual(&file).unwrap_err();
        match err {
            DiskError::PathValidation { reason, .. } => {
                assert_eq!(reason, "path is not a directory")
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn add_manual_surfaces_capacity_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = DiskRegistry::with_probe("/unused", FakeProbe::new());
        let err = registry.add_manual(dir.path()).unwrap_err();
        assert!(matches!(err, DiskError::Capacity { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn one_disk_per_mount_point_after_scan() {
        let probe = scenario_probe().with_capacity("/data", 10, 5, 5, 1024);
        let mut registry = DiskRegistry::with_probe("/unused", probe);
        registry.scan_table(
            "/dev/sda1 / ext4 rw 0 0\n\
             /dev/sdb1 /data ext4 rw 0 0\n\
             /dev/sdc1 /data ext4 rw 0 0\n\
             /dev/sda1 / ext4 ro 0 0\n",
        );
        let mut mounts: Vec<_> = registry.list().iter().map(|d| d.mount_point.as_str()).collect();
        mounts.sort();
        mounts.dedup();
        assert_eq!(mounts.len(), registry.list().len());
        for disk in registry.list() {
            assert!(disk.used <= disk.size);
            assert!(disk.available <= disk.size);
        }
    }
}
