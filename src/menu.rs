//! Interactive loop: look at the disks, add directories, run installers.

use crate::config::{Config, rescan};
use crate::disk::{Disk, DiskRegistry, unmounted};
use crate::display;
use crate::installer::{CommandExecutor, PackageManager};
use crate::ui::prelude::*;
use anyhow::Result;
use colored::*;
use dialoguer::{Input, Select};

const MAX_SUGGESTIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    AddDisk,
    Execute,
    Rescan,
    ToggleDetails,
    ToggleFriendly,
    Exit,
}

const ACTIONS: [MenuAction; 6] = [
    MenuAction::AddDisk,
    MenuAction::Execute,
    MenuAction::Rescan,
    MenuAction::ToggleDetails,
    MenuAction::ToggleFriendly,
    MenuAction::Exit,
];

struct MenuState {
    registry: DiskRegistry,
    friendly: bool,
    detailed: bool,
}

impl MenuAction {
    fn label(&self, state: &MenuState) -> String {
        let (icon, text) = match self {
            MenuAction::AddDisk => (NerdFont::Plus, "Add disk path".to_string()),
            MenuAction::Execute => (NerdFont::Terminal, "Execute installation command".to_string()),
            MenuAction::Rescan => (NerdFont::Refresh, "Rescan disks".to_string()),
            MenuAction::ToggleDetails => (
                NerdFont::Table,
                format!("{} detailed view", if state.detailed { "Hide" } else { "Show" }),
            ),
            MenuAction::ToggleFriendly => (
                NerdFont::Star,
                if state.friendly {
                    "Switch to technical view".to_string()
                } else {
                    "Switch to friendly view".to_string()
                },
            ),
            MenuAction::Exit => (NerdFont::ArrowLeft, "Exit".to_string()),
        };
        format!("{} {}", char::from(icon), text)
    }
}

pub fn run_menu(config: &Config) -> Result<()> {
    let mut registry = DiskRegistry::new(&config.mount_table);
    if let Err(e) = rescan(&mut registry, config) {
        emit(
            Level::Error,
            "menu.scan_failed",
            &format!("{} {:#}", char::from(NerdFont::Cross), e),
            None,
        );
    }

    let mut state = MenuState {
        registry,
        friendly: true,
        detailed: false,
    };
    if state.registry.is_empty() {
        emit(
            Level::Warn,
            "menu.no_disks",
            &format!(
                "{} No disks detected, add a directory to use as a target",
                char::from(NerdFont::Warning)
            ),
            None,
        );
    }

    loop {
        render(&state);

        let labels: Vec<String> = ACTIONS.iter().map(|a| a.label(&state)).collect();
        let choice = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact_opt()?;
        let Some(idx) = choice else {
            return Ok(());
        };

        let result = match ACTIONS[idx] {
            MenuAction::AddDisk => add_disk(&mut state.registry),
            MenuAction::Execute => execute(&state),
            MenuAction::Rescan => rescan(&mut state.registry, config).map(|report| {
                emit(
                    Level::Success,
                    "menu.rescan",
                    &format!(
                        "{} Found {} disks",
                        char::from(NerdFont::Check),
                        report.added
                    ),
                    None,
                );
            }),
            MenuAction::ToggleDetails => {
                state.detailed = !state.detailed;
                if state.detailed {
                    state.friendly = false;
                }
                Ok(())
            }
            MenuAction::ToggleFriendly => {
                state.friendly = !state.friendly;
                Ok(())
            }
            MenuAction::Exit => return Ok(()),
        };

        if let Err(e) = result {
            emit(
                Level::Error,
                "menu.action_failed",
                &format!("{} {:#}", char::from(NerdFont::Cross), e),
                None,
            );
        }
        println!();
    }
}

fn render(state: &MenuState) {
    if let Some(at) = state.registry.last_scan() {
        println!(
            "{}",
            format!("Last scan: {}", at.format("%Y-%m-%d %H:%M:%S")).dimmed()
        );
    }
    if state.friendly {
        display::render_groups(&state.registry.groups());
    } else {
        display::render_disks(
            state.registry.list(),
            &state.registry.stats(),
            state.detailed,
        );
    }
}

fn add_disk(registry: &mut DiskRegistry) -> Result<()> {
    let disks = unmounted::scan_unmounted_disks(registry.mount_table());
    if !disks.is_empty() {
        display::render_unmounted(&disks);
        println!("   {}", "Mount one of these first to use it as a target.".dimmed());
    }

    let suggestions = unmounted::suggest_mount_points();
    if !suggestions.is_empty() {
        println!("{} Suggested locations:", char::from(NerdFont::FolderOpen));
        for path in suggestions.iter().take(MAX_SUGGESTIONS) {
            println!("   {}", path.display());
        }
    }

    let path: String = Input::new()
        .with_prompt("Directory to add (Enter to go back)")
        .allow_empty(true)
        .interact_text()?;
    let path = path.trim();
    if path.is_empty() {
        return Ok(());
    }

    let disk = registry.add_manual(path)?;
    emit(
        Level::Success,
        "menu.disk_added",
        &format!(
            "{} Added {} ({} available)",
            char::from(NerdFont::Check),
            disk.mount_point,
            crate::common::format::format_bytes(disk.available)
        ),
        None,
    );
    Ok(())
}

fn execute(state: &MenuState) -> Result<()> {
    if let Some(pm) = PackageManager::detect() {
        println!(
            "{} Detected package manager: {} (e.g. {})",
            char::from(NerdFont::Package),
            pm.to_string().bold(),
            pm.install_command("<package>")
        );
    }

    let command: String = Input::new()
        .with_prompt("Installation command (Enter to go back)")
        .allow_empty(true)
        .interact_text()?;
    if command.trim().is_empty() {
        return Ok(());
    }

    let Some(target) = choose_target(state)? else {
        return run(&command, None);
    };
    run(&command, Some(&target))
}

fn run(command: &str, target: Option<&Disk>) -> Result<()> {
    CommandExecutor::interactive(false).execute(command, target)?;
    Ok(())
}

/// Ask for a target by drive number (friendly view) or disk number.
fn choose_target(state: &MenuState) -> Result<Option<Disk>> {
    let candidates: Vec<(String, Disk)> = if state.friendly {
        state
            .registry
            .groups()
            .into_iter()
            .filter_map(|g| {
                let disk = g.primary_disk()?.clone();
                Some((format!("{} {}", char::from(g.icon), g.name), disk))
            })
            .collect()
    } else {
        state
            .registry
            .list()
            .iter()
            .map(|d| {
                let label = format!("{} {}", d.disk_type.icon(), d.disk_type.description());
                (label, d.clone())
            })
            .collect()
    };

    if candidates.is_empty() {
        return Ok(None);
    }

    println!("{} Install target:", char::from(NerdFont::Target));
    for (idx, (label, disk)) in candidates.iter().enumerate() {
        println!("   {}. {} {}", idx + 1, label, disk.mount_point.dimmed());
    }

    let answer: String = Input::new()
        .with_prompt("Target number (Enter for none)")
        .allow_empty(true)
        .interact_text()?;

    match parse_selection(&answer, candidates.len()) {
        Ok(choice) => Ok(choice.map(|idx| candidates[idx].1.clone())),
        Err(reason) => {
            emit(Level::Warn, "menu.invalid_target", &reason, None);
            Ok(None)
        }
    }
}

/// Parse a 1-based selection. Empty input selects nothing.
fn parse_selection(input: &str, count: usize) -> Result<Option<usize>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Ok(Some(n - 1)),
        _ => Err(format!("Invalid selection '{}', expected 1-{}", input, count)),
    }
}
