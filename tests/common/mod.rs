use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scratch directory holding a synthetic mount table and a writable target.
pub struct TestEnvironment {
    temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        fs::create_dir(temp_dir.path().join("target"))?;
        Ok(Self { temp_dir })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Directory used as the mount point of the synthetic data disk.
    pub fn target_dir(&self) -> PathBuf {
        self.path().join("target")
    }

    pub fn mount_table(&self) -> PathBuf {
        self.path().join("mounts")
    }

    /// Root, the target directory, a virtual filesystem and an offline mount.
    pub fn write_mount_table(&self) -> Result<PathBuf> {
        let table = format!(
            "/dev/sda1 / ext4 rw,relatime 0 0\n\
             proc /proc proc rw 0 0\n\
             /dev/sdz1 {} ext4 rw 0 0\n\
             /dev/sdy1 {} ext4 rw 0 0\n",
            self.target_dir().display(),
            self.path().join("offline").display(),
        );
        fs::write(self.mount_table(), table)?;
        Ok(self.mount_table())
    }
}
