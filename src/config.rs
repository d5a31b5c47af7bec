use crate::common::progress::create_spinner;
use crate::disk::{DiskRegistry, ScanReport};
use crate::ui::prelude::*;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Runtime settings gathered from the command line.
#[derive(Debug, Clone)]
pub struct Config {
    pub mount_table: PathBuf,
    pub output: OutputFormat,
    pub color: bool,
    pub debug: bool,
}

impl Config {
    pub fn is_json(&self) -> bool {
        self.output == OutputFormat::Json
    }

    /// Registry freshly populated from the configured mount table.
    pub fn load_registry(&self) -> Result<DiskRegistry> {
        let mut registry = DiskRegistry::new(&self.mount_table);
        rescan(&mut registry, self)?;
        Ok(registry)
    }
}

/// Clear `registry` and scan again, with a spinner in text mode.
pub fn rescan(registry: &mut DiskRegistry, config: &Config) -> Result<ScanReport> {
    registry.clear();

    let spinner = (!config.is_json()).then(|| create_spinner("Scanning disks..."));
    let result = registry.scan();
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let report = result.with_context(|| {
        format!("reading mount table {}", config.mount_table.display())
    })?;
    emit(
        Level::Debug,
        "disk.scan.completed",
        &format!(
            "Scan found {} disks, skipped {}",
            report.added, report.skipped
        ),
        None,
    );
    Ok(report)
}
