mod commands;
mod common;
mod config;
mod disk;
mod display;
mod installer;
mod menu;
mod ui;

use crate::commands::{Commands, handle_command};
use crate::config::Config;
use crate::ui::prelude::*;
use clap::Parser;
use std::path::PathBuf;

/// Checkpoint: see your disks, pick one, install onto it
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Activate debug mode
    #[arg(short, long, global = true)]
    debug: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text", global = true)]
    output: OutputFormat,

    /// Disable coloured output
    #[arg(long, global = true)]
    no_color: bool,

    /// Mount table to read
    #[arg(long, default_value = disk::DEFAULT_MOUNT_TABLE, global = true)]
    mount_table: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            mount_table: self.mount_table.clone(),
            output: self.output,
            color: !self.no_color,
            debug: self.debug,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let config = cli.config();

    ui::init(config.output, config.color);
    ui::set_debug_mode(config.debug);
    emit(
        Level::Debug,
        "checkpoint.config",
        &format!("Using mount table {}", config.mount_table.display()),
        None,
    );

    let command = cli.command.unwrap_or(Commands::Menu);
    match handle_command(command, &config) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            emit(
                Level::Error,
                "checkpoint.error",
                &format!("{} {:#}", char::from(NerdFont::Cross), e),
                None,
            );
            std::process::exit(1);
        }
    }
}
