use crate::common::shell::display_command;
use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// One process launch: program, arguments and the overrides to apply on top
/// of the inherited environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

impl Invocation {
    /// Build from whitespace-separated tokens. Returns `None` for an empty list.
    pub fn from_tokens(tokens: Vec<String>) -> Option<Self> {
        let mut tokens = tokens.into_iter();
        let program = tokens.next()?;
        Some(Self {
            program,
            args: tokens.collect(),
            cwd: None,
            env: Vec::new(),
        })
    }

    pub fn command_line(&self) -> String {
        display_command(&self.program, &self.args)
    }
}

pub trait ProcessRunner {
    /// Run to completion with the terminal attached. `Ok(None)` means the
    /// process was terminated by a signal.
    fn run(&self, invocation: &Invocation) -> io::Result<Option<i32>>;
}

/// Runs commands on the controlling terminal.
pub struct TerminalRunner {
    pub dry_run: bool,
}

impl TerminalRunner {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    fn print_dry_run(&self, invocation: &Invocation) {
        if let Some(cwd) = &invocation.cwd {
            println!("[DRY RUN] cd {}", cwd.display());
        }
        let env: Vec<String> = invocation
            .env
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        if env.is_empty() {
            println!("[DRY RUN] {}", invocation.command_line());
        } else {
            println!("[DRY RUN] {} {}", env.join(" "), invocation.command_line());
        }
    }
}

impl ProcessRunner for TerminalRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<Option<i32>> {
        if self.dry_run {
            self.print_dry_run(invocation);
            return Ok(Some(0));
        }

        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .envs(invocation.env.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(cwd) = &invocation.cwd {
            command.current_dir(cwd);
        }

        let status = command.status()?;
        Ok(status.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn invocation_splits_program_and_args() {
        let inv = Invocation::from_tokens(tokens("make install -j4")).unwrap();
        assert_eq!(inv.program, "make");
        assert_eq!(inv.args, vec!["install", "-j4"]);
        assert!(inv.cwd.is_none());
        assert!(inv.env.is_empty());
        assert!(Invocation::from_tokens(Vec::new()).is_none());
    }

    #[test]
    fn dry_run_reports_success_without_running() {
        let runner = TerminalRunner::new(true);
        let inv = Invocation::from_tokens(tokens("/nonexistent/binary --flag")).unwrap();
        assert_eq!(runner.run(&inv).unwrap(), Some(0));
    }

    #[test]
    fn exit_codes_are_passed_through() {
        let runner = TerminalRunner::new(false);
        let ok = Invocation::from_tokens(tokens("true")).unwrap();
        let fail = Invocation::from_tokens(tokens("false")).unwrap();
        assert_eq!(runner.run(&ok).unwrap(), Some(0));
        assert_eq!(runner.run(&fail).unwrap(), Some(1));
    }

    #[test]
    fn cwd_and_env_are_applied() {
        let dir = tempfile::tempdir().unwrap();
        let runner = TerminalRunner::new(false);
        let inv = Invocation {
            program: "sh".into(),
            args: vec![
                "-c".into(),
                "test \"$(pwd -P)\" = \"$(cd \"$EXPECTED\" && pwd -P)\" \
                 && test \"$DESTDIR\" = \"$EXPECTED\""
                    .into(),
            ],
            cwd: Some(dir.path().to_path_buf()),
            env: vec![
                ("EXPECTED".into(), dir.path().to_string_lossy().into_owned()),
                ("DESTDIR".into(), dir.path().to_string_lossy().into_owned()),
            ],
        };
        assert_eq!(runner.run(&inv).unwrap(), Some(0));
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let runner = TerminalRunner::new(false);
        let inv = Invocation::from_tokens(tokens("/nonexistent/checkpoint-test-binary")).unwrap();
        assert!(runner.run(&inv).is_err());
    }
}
