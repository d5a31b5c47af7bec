//! Rendering of disks, drive groups and statistics for the terminal.

mod friendly;
mod technical;

pub use friendly::render_groups;
pub use technical::{render_disks, render_stats, render_unmounted};

use anyhow::{Context, Result};
use serde::Serialize;

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serializing output")?;
    println!("{}", json);
    Ok(())
}
