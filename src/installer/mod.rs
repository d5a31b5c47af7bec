//! Running installation commands against a chosen disk.

mod consent;
mod error;
mod executor;
mod package_manager;
mod permission;
mod runner;

pub use executor::CommandExecutor;
pub use package_manager::PackageManager;
