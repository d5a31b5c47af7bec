use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiskError {
    #[error("failed to read mount table {}", path.display())]
    MountTable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid disk path {}: {reason}", path.display())]
    PathValidation { path: PathBuf, reason: String },

    #[error("failed to get filesystem stats for {}", path.display())]
    Capacity {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
