use crate::common::format::{format_bytes, truncate_path};
use crate::disk::{Disk, DiskStats, UnmountedDisk};
use crate::ui::prelude::*;
use colored::*;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, ContentArrangement, Table};

const PATH_WIDTH: usize = 32;

fn link_markers(disk: &Disk, stats: &DiskStats) -> String {
    let mut markers = Vec::new();
    if disk.inode > 0 && stats.hardlinks.contains_key(&disk.inode) {
        markers.push(format!("{} hardlink", char::from(NerdFont::Link)));
    }
    if let Some(target) = disk.link_target.as_deref().filter(|_| disk.is_symlink) {
        markers.push(format!("→ {}", target));
    }
    markers.join(" ")
}

/// Numbered disk table; `detailed` adds filesystem, usage, inode and links.
pub fn disk_table(disks: &[Disk], stats: &DiskStats, detailed: bool) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec!["#", "Device", "Mount point", "Type", "Size", "Available", "Use%"];
    if detailed {
        header.extend(["Filesystem", "Used", "Inode", "Links"]);
    }
    table.set_header(header);

    for (idx, disk) in disks.iter().enumerate() {
        let mut row = vec![
            Cell::new(idx + 1),
            Cell::new(truncate_path(&disk.path, PATH_WIDTH)),
            Cell::new(truncate_path(&disk.mount_point, PATH_WIDTH)),
            Cell::new(format!("{} {}", disk.disk_type.icon(), disk.disk_type)),
            Cell::new(format_bytes(disk.size)),
            Cell::new(format_bytes(disk.available)),
            Cell::new(format!("{:.1}%", disk.used_percent())),
        ];
        if detailed {
            row.extend([
                Cell::new(&disk.filesystem),
                Cell::new(format_bytes(disk.used)),
                Cell::new(disk.inode),
                Cell::new(link_markers(disk, stats)),
            ]);
        }
        table.add_row(row);
    }
    table
}

/// Summary block followed by the disk table.
pub fn render_disks(disks: &[Disk], stats: &DiskStats, detailed: bool) {
    if disks.is_empty() {
        emit(
            Level::Info,
            "display.disks.empty",
            &format!("{} No disks found", char::from(NerdFont::Info)),
            None,
        );
        return;
    }

    render_stats(stats);
    println!("{}", disk_table(disks, stats, detailed));
}

pub fn render_stats(stats: &DiskStats) {
    println!("{} {}", char::from(NerdFont::Chart), stats.summary().trim_end().bold());
    println!();
}

pub fn render_unmounted(disks: &[UnmountedDisk]) {
    if disks.is_empty() {
        emit(
            Level::Info,
            "display.unmounted.empty",
            &format!("{} No unmounted disks found", char::from(NerdFont::Info)),
            None,
        );
        return;
    }

    println!("{} {}", char::from(NerdFont::Plug), "Unmounted disks".bold());
    for disk in disks {
        let label = if disk.label.is_empty() {
            String::new()
        } else {
            format!(" \"{}\"", disk.label)
        };
        println!(
            "  {} {} ({}, {}){}",
            char::from(NerdFont::HardDrive),
            disk.device,
            disk.size,
            disk.filesystem,
            label
        );
    }
}
