use crate::common::format::format_bytes;
use crate::disk::{DriveCategory, DriveGroup};
use crate::ui::prelude::*;
use colored::*;

/// Cells in the usage bar of a drive card.
pub const BAR_WIDTH: usize = 40;

/// Filled/empty bar for a usage percentage, clamped to 0..=100.
pub fn usage_bar(percent: f64, width: usize) -> String {
    let ratio = (percent / 100.0).clamp(0.0, 1.0);
    let filled = ((ratio * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn colored_bar(percent: f64) -> String {
    let bar = usage_bar(percent, BAR_WIDTH);
    match percent {
        p if p >= 90.0 => bar.red().to_string(),
        p if p >= 75.0 => bar.yellow().to_string(),
        _ => bar.green().to_string(),
    }
}

fn print_card(group: &DriveGroup) {
    let title = format!("{} {}", char::from(group.icon), group.name);
    let title = if group.is_primary {
        title.bold().green().to_string()
    } else {
        title.bold().to_string()
    };
    println!("{}  {}", title, group.description.dimmed());

    println!(
        "   {} free of {}",
        format_bytes(group.available).bold(),
        format_bytes(group.total_size)
    );
    println!(
        "   {} {:.1}% used",
        colored_bar(group.used_percent()),
        group.used_percent()
    );

    let locations: Vec<&str> = group.disks.iter().map(|d| d.mount_point.as_str()).collect();
    println!(
        "   {} {}",
        char::from(NerdFont::Folder),
        locations.join(", ").dimmed()
    );
}

/// One card per drive group, system first.
pub fn render_groups(groups: &[DriveGroup]) {
    if groups.is_empty() {
        emit(
            Level::Info,
            "display.groups.empty",
            &format!("{} No drives found", char::from(NerdFont::Info)),
            None,
        );
        return;
    }

    println!("{}", "Your Drives".bold());
    separator(false);
    for (idx, group) in groups.iter().enumerate() {
        let first_network = group.category == DriveCategory::Network
            && idx > 0
            && groups[idx - 1].category != DriveCategory::Network;
        if first_network {
            separator(true);
        }
        print_card(group);
        println!();
    }
}
