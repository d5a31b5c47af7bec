use crate::config::Config;
use crate::disk::{Disk, DiskRegistry, unmounted};
use crate::display;
use crate::installer::CommandExecutor;
use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::{Path, PathBuf};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive menu (default)
    Menu,
    /// List every detected disk
    List {
        /// Show filesystem, usage, inode and link columns
        #[arg(long)]
        details: bool,
    },
    /// Show disks grouped into drives
    Drives,
    /// Show storage statistics
    Stats,
    /// List disks that are present but not mounted
    Unmounted,
    /// Run an installation command, optionally on a chosen disk
    Exec {
        /// Directory to install into: a mount point or any directory
        #[arg(short, long)]
        target: Option<PathBuf>,
        /// Print what would run without running it
        #[arg(long)]
        dry_run: bool,
        /// Command and arguments, split on whitespace
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        command: Vec<String>,
    },
}

/// Run a one-shot subcommand and return the process exit code.
pub fn handle_command(command: Commands, config: &Config) -> Result<i32> {
    match command {
        Commands::Menu => crate::menu::run_menu(config).map(|_| 0),
        Commands::List { details } => handle_list(config, details).map(|_| 0),
        Commands::Drives => handle_drives(config).map(|_| 0),
        Commands::Stats => handle_stats(config).map(|_| 0),
        Commands::Unmounted => handle_unmounted(config).map(|_| 0),
        Commands::Exec {
            target,
            dry_run,
            command,
        } => handle_exec(config, target.as_deref(), dry_run, &command.join(" ")),
    }
}

fn handle_list(config: &Config, details: bool) -> Result<()> {
    let registry = config.load_registry()?;
    if config.is_json() {
        return display::print_json(registry.list());
    }
    display::render_disks(registry.list(), &registry.stats(), details);
    Ok(())
}

fn handle_drives(config: &Config) -> Result<()> {
    let registry = config.load_registry()?;
    let groups = registry.groups();
    if config.is_json() {
        return display::print_json(&groups);
    }
    display::render_groups(&groups);
    Ok(())
}

fn handle_stats(config: &Config) -> Result<()> {
    let registry = config.load_registry()?;
    let stats = registry.stats();
    if config.is_json() {
        return display::print_json(&stats);
    }
    display::render_stats(&stats);
    Ok(())
}

fn handle_unmounted(config: &Config) -> Result<()> {
    let disks = unmounted::scan_unmounted_disks(&config.mount_table);
    if config.is_json() {
        return display::print_json(&disks);
    }
    display::render_unmounted(&disks);
    Ok(())
}

/// The disk mounted exactly at `dir`, or `dir` added as a manual disk.
pub fn resolve_target(registry: &mut DiskRegistry, dir: &Path) -> Result<Disk> {
    let absolute = std::path::absolute(dir)
        .with_context(|| format!("resolving {}", dir.display()))?;
    let key = absolute.to_string_lossy();

    if let Some(disk) = registry.find_by_mount_point(&key) {
        return Ok(disk.clone());
    }
    registry
        .add_manual(&absolute)
        .with_context(|| format!("adding {} as a target", absolute.display()))
}

fn handle_exec(
    config: &Config,
    target: Option<&Path>,
    dry_run: bool,
    command: &str,
) -> Result<i32> {
    let target = match target {
        Some(dir) => {
            let mut registry = config.load_registry()?;
            Some(resolve_target(&mut registry, dir)?)
        }
        None => None,
    };

    let executor = CommandExecutor::interactive(dry_run);
    let outcome = executor
        .execute(command, target.as_ref())
        .context("running installation command")?;

    if config.is_json() {
        display::print_json(&outcome)?;
    }
    Ok(outcome.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disk::test_support::FakeProbe;
    use crate::disk::DiskType;

    #[test]
    fn target_prefers_existing_mount_point() {
        let dir = tempfile::tempdir().unwrap();
        let mount = dir.path().to_string_lossy().into_owned();
        let probe = FakeProbe::new().with_capacity(&mount, 100, 50, 50, 4096);
        let mut registry = DiskRegistry::with_probe("/unused", probe);
        registry.scan_table(&format!("/dev/sdb1 {} ext4 rw 0 0\n", mount));

        let disk = resolve_target(&mut registry, dir.path()).unwrap();
        assert_eq!(disk.disk_type, DiskType::Physical);
        assert_eq!(registry.list().len(), 1);
    }

    #[test]
    fn target_falls_back_to_manual_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mount = dir.path().to_string_lossy().into_owned();
        let probe = FakeProbe::new().with_capacity(&mount, 100, 50, 50, 4096);
        let mut registry = DiskRegistry::with_probe("/unused", probe);

        let disk = resolve_target(&mut registry, dir.path()).unwrap();
        assert_eq!(disk.disk_type, DiskType::Manual);
        assert_eq!(registry.list().len(), 1);
    }

    #[test]
    fn missing_target_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = DiskRegistry::with_probe("/unused", FakeProbe::new());
        assert!(resolve_target(&mut registry, &dir.path().join("missing")).is_err());
    }
}
