use super::types::percent;
use super::{Disk, DiskType};
use crate::common::format::format_bytes;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymlinkInfo {
    pub source: String,
    pub target: String,
}

/// Aggregate view over a registry snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiskStats {
    pub total_disks: usize,
    pub total_size: u64,
    pub total_available: u64,
    pub total_used: u64,
    pub disks_by_type: BTreeMap<DiskType, usize>,
    /// Inode -> paths, only for inodes shared by two or more disks.
    pub hardlinks: BTreeMap<u64, Vec<String>>,
    pub symlinks: Vec<SymlinkInfo>,
}

impl DiskStats {
    pub fn from_disks(disks: &[Disk]) -> Self {
        let mut stats = DiskStats {
            total_disks: disks.len(),
            ..Default::default()
        };

        for disk in disks {
            *stats.disks_by_type.entry(disk.disk_type).or_insert(0) += 1;

            if disk.disk_type != DiskType::Symlink {
                stats.total_size += disk.size;
                stats.total_available += disk.available;
                stats.total_used += disk.used;

                if disk.inode > 0 {
                    stats
                        .hardlinks
                        .entry(disk.inode)
                        .or_default()
                        .push(disk.path.clone());
                }
            }

            if disk.is_symlink {
                if let Some(target) = disk.link_target.as_deref().filter(|t| !t.is_empty()) {
                    stats.symlinks.push(SymlinkInfo {
                        source: disk.path.clone(),
                        target: target.to_string(),
                    });
                }
            }
        }

        stats.hardlinks.retain(|_, paths| paths.len() > 1);
        stats
    }

    /// Share of total capacity in use; 0 when nothing was measured.
    pub fn used_percent(&self) -> f64 {
        percent(self.total_used, self.total_size)
    }

    pub fn summary(&self) -> String {
        let mut out = String::from("Storage Summary:\n");
        let _ = writeln!(out, "• Total disks: {}", self.total_disks);
        let _ = writeln!(out, "• Total capacity: {}", format_bytes(self.total_size));
        let _ = writeln!(
            out,
            "• Used: {} ({:.1}%)",
            format_bytes(self.total_used),
            self.used_percent()
        );
        let _ = writeln!(out, "• Available: {}", format_bytes(self.total_available));

        if !self.disks_by_type.is_empty() {
            out.push_str("\nDisk types:\n");
            let mut types: Vec<_> = self.disks_by_type.iter().collect();
            types.sort_by_key(|(t, _)| t.as_str());
            for (disk_type, count) in types {
                let _ = writeln!(out, "• {}: {}", disk_type, count);
            }
        }

        if !self.hardlinks.is_empty() {
            let _ = writeln!(out, "\nHard links detected: {} groups", self.hardlinks.len());
        }
        if !self.symlinks.is_empty() {
            let _ = writeln!(out, "Symbolic links: {}", self.symlinks.len());
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disk::test_support::disk;

    const MIB: u64 = 1024 * 1024;

    #[test]
    fn totals_skip_symlinks() {
        let mut link = disk("/dev/disk/by-label/x", "/x", DiskType::Symlink, 500, 100, 400);
        link.is_symlink = true;
        link.link_target = Some("/dev/sdb1".into());
        let disks = vec![disk("/dev/sda1", "/", DiskType::Physical, 1000, 600, 300), link];

        let stats = DiskStats::from_disks(&disks);
        assert_eq!(stats.total_disks, 2);
        assert_eq!(stats.total_size, 1000);
        assert_eq!(stats.total_used, 600);
        assert_eq!(stats.total_available, 300);
        assert_eq!(stats.disks_by_type[&DiskType::Physical], 1);
        assert_eq!(stats.disks_by_type[&DiskType::Symlink], 1);
        assert_eq!(
            stats.symlinks,
            vec![SymlinkInfo {
                source: "/dev/disk/by-label/x".into(),
                target: "/dev/sdb1".into()
            }]
        );
    }

    #[test]
    fn hardlinks_need_two_members() {
        let mut a = disk("/srv/a", "/srv/a", DiskType::Bind, 10, 5, 5);
        let mut b = disk("/srv/b", "/srv/b", DiskType::Bind, 10, 5, 5);
        let mut lone = disk("/srv/c", "/srv/c", DiskType::Bind, 10, 5, 5);
        let mut zero = disk("/srv/d", "/srv/d", DiskType::Bind, 10, 5, 5);
        let mut sym = disk("/srv/e", "/srv/e", DiskType::Symlink, 0, 0, 0);
        a.inode = 42;
        b.inode = 42;
        lone.inode = 7;
        zero.inode = 0;
        sym.inode = 7;

        let stats = DiskStats::from_disks(&[a, b, lone, zero, sym]);
        assert_eq!(stats.hardlinks.len(), 1);
        assert_eq!(stats.hardlinks[&42], vec!["/srv/a".to_string(), "/srv/b".to_string()]);
    }

    #[test]
    fn symlink_without_target_is_not_listed() {
        let mut d = disk("/dev/root", "/", DiskType::Physical, 10, 1, 9);
        d.is_symlink = true;
        d.link_target = Some(String::new());
        assert!(DiskStats::from_disks(&[d]).symlinks.is_empty());
    }

    #[test]
    fn used_percent_guards_empty_registry() {
        let stats = DiskStats::from_disks(&[]);
        assert_eq!(stats.total_size, 0);
        assert_eq!(stats.used_percent(), 0.0);
        assert!(stats.summary().contains("(0.0%)"));
    }

    #[test]
    fn small_disk_still_counts_in_stats() {
        let disks = vec![disk(
            "/dev/sdd1",
            "/data",
            DiskType::Physical,
            900 * MIB,
            100 * MIB,
            800 * MIB,
        )];
        let stats = DiskStats::from_disks(&disks);
        assert_eq!(stats.total_size, 900 * MIB);
        assert!(crate::disk::grouping::group_disks(&disks).is_empty());
    }

    #[test]
    fn summary_lists_types_by_name() {
        let disks = vec![
            disk("/dev/sda1", "/", DiskType::Physical, 1024, 512, 512),
            disk("/dev/mapper/vg", "/srv", DiskType::Lvm, 1024, 0, 1024),
        ];
        let summary = DiskStats::from_disks(&disks).summary();
        let lvm = summary.find("• lvm: 1").unwrap();
        let physical = summary.find("• physical: 1").unwrap();
        assert!(lvm < physical);
        assert!(summary.contains("Total capacity: 2.0 KB"));
        assert!(summary.contains("(25.0%)"));
    }
}
