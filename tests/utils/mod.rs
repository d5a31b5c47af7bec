use anyhow::Result;
use std::process::{Command, Stdio};

use super::common::TestEnvironment;

pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Run the checkpoint binary against the environment's mount table.
pub fn run_checkpoint(env: &TestEnvironment, args: &[&str]) -> Result<CommandOutput> {
    let mount_table = env.mount_table();
    let output = Command::new(env!("CARGO_BIN_EXE_checkpoint"))
        .arg("--no-color")
        .arg("--mount-table")
        .arg(&mount_table)
        .args(args)
        .current_dir(env.path())
        .stdin(Stdio::null())
        .output()?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(-1),
    })
}

pub fn parse_json(output: &CommandOutput) -> Result<serde_json::Value> {
    Ok(serde_json::from_str(&output.stdout)?)
}
