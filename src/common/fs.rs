use std::io;
use std::path::Path;

/// Prove `dir` is writable by creating and removing a uniquely named file in it.
pub fn probe_writable(dir: &Path) -> io::Result<()> {
    let probe = tempfile::Builder::new()
        .prefix(".checkpoint_probe_")
        .tempfile_in(dir)?;
    probe.close()
}

pub fn is_writable(dir: &Path) -> bool {
    probe_writable(dir).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_leaves_no_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        probe_writable(dir.path()).unwrap();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn missing_directory_is_not_writable() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_writable(&dir.path().join("missing")));
    }
}
