//! Storage discovery, classification, grouping and statistics.

mod classify;
mod error;
mod grouping;
mod mounts;
mod probe;
mod registry;
mod stats;
mod types;
pub mod unmounted;

#[cfg(test)]
pub(crate) mod test_support;

pub use grouping::{DriveCategory, DriveGroup};
pub use mounts::DEFAULT_MOUNT_TABLE;
pub use registry::{DiskRegistry, ScanReport};
pub use stats::DiskStats;
pub use types::{Disk, DiskType, UnmountedDisk};
