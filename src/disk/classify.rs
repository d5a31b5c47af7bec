use super::DiskType;

const NETWORK_FILESYSTEMS: &[&str] = &["nfs", "nfs4", "cifs", "smb"];

/// Decide what kind of storage a mount is, or `None` to leave it out of the
/// inventory. Rules are checked in order and the first match wins, so a bind
/// mount of `/dev/sda1` is `Bind`, not `Physical`.
pub fn classify(device: &str, filesystem: &str, options: &str) -> Option<DiskType> {
    if options.contains("bind") {
        Some(DiskType::Bind)
    } else if device.starts_with("/dev/loop") {
        Some(DiskType::Loop)
    } else if device.starts_with("/dev/mapper/") {
        Some(DiskType::Lvm)
    } else if device.starts_with("/dev/") {
        Some(DiskType::Physical)
    } else if NETWORK_FILESYSTEMS.contains(&filesystem) {
        Some(DiskType::Network)
    } else if filesystem.contains("fuse") {
        Some(DiskType::Fuse)
    } else if device.starts_with('/') {
        Some(DiskType::Path)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_namespaces() {
        assert_eq!(classify("/dev/sda1", "ext4", "rw"), Some(DiskType::Physical));
        assert_eq!(classify("/dev/nvme0n1p2", "btrfs", "rw"), Some(DiskType::Physical));
        assert_eq!(classify("/dev/loop3", "squashfs", "ro"), Some(DiskType::Loop));
        assert_eq!(classify("/dev/mapper/vg-home", "xfs", "rw"), Some(DiskType::Lvm));
    }

    #[test]
    fn bind_option_wins_over_device() {
        assert_eq!(classify("/dev/sda1", "ext4", "rw,bind"), Some(DiskType::Bind));
        assert_eq!(classify("/dev/loop0", "ext4", "bind"), Some(DiskType::Bind));
    }

    #[test]
    fn filesystem_rules() {
        assert_eq!(classify("server:/export", "nfs4", "rw"), Some(DiskType::Network));
        assert_eq!(classify("//nas/share", "cifs", "rw"), Some(DiskType::Network));
        assert_eq!(classify("sshfs#me@host:", "fuse.sshfs", "rw"), Some(DiskType::Fuse));
        assert_eq!(classify("gvfsd-fuse", "fuse", "rw"), Some(DiskType::Fuse));
    }

    #[test]
    fn device_namespace_beats_network_filesystem() {
        assert_eq!(classify("/dev/sdb1", "nfs", "rw"), Some(DiskType::Physical));
    }

    #[test]
    fn absolute_paths_and_misses() {
        assert_eq!(classify("/srv/images/disk", "ext4", "rw"), Some(DiskType::Path));
        assert_eq!(classify("overlay", "overlay", "rw"), None);
        assert_eq!(classify("none", "zfs", "rw"), None);
    }
}
