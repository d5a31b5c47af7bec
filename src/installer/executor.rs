//! Runs one installation command, optionally aimed at a disk, and retries it
//! with sudo when the failure looks like a permission problem.

use super::consent::{Consent, DialoguerConsent, EscalationNotice};
use super::error::ExecError;
use super::permission::{ESCALATION_KEYWORD, FailureKind, classify_failure, escalate_command};
use super::runner::{Invocation, ProcessRunner, TerminalRunner};
use crate::common::fs::probe_writable;
use crate::common::shell::tokenize;
use crate::disk::Disk;
use crate::ui::prelude::*;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use sudo::RunningAs;

/// Variables pointed at the target mount point for build systems that honour them.
pub const TARGET_ENV_VARS: &[&str] = &["PREFIX", "DESTDIR", "INSTALL_ROOT"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    /// The operator declined to run a command that already uses sudo.
    ElevatedCommandDeclined,
    /// The operator declined the sudo retry after a permission failure.
    EscalationDeclined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    Success,
    Failed { exit_code: Option<i32> },
    EscalatedSuccess,
    EscalatedFailed { exit_code: Option<i32> },
    Cancelled { reason: CancelReason },
}

impl ExecutionOutcome {
    /// Exit code for the process wrapping this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Success | Self::EscalatedSuccess => 0,
            Self::Failed { exit_code } | Self::EscalatedFailed { exit_code } => {
                exit_code.filter(|c| *c != 0).unwrap_or(1)
            }
            Self::Cancelled { .. } => 130,
        }
    }
}

fn describe_exit(exit_code: Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("exit code {}", code),
        None => "a signal".to_string(),
    }
}

impl fmt::Display for ExecutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "Command completed successfully"),
            Self::Failed { exit_code } => {
                write!(f, "Command failed with {}", describe_exit(*exit_code))
            }
            Self::EscalatedSuccess => write!(f, "Command completed successfully with sudo"),
            Self::EscalatedFailed { exit_code } => {
                write!(f, "Command failed with sudo, {}", describe_exit(*exit_code))
            }
            Self::Cancelled { reason } => match reason {
                CancelReason::ElevatedCommandDeclined => {
                    write!(f, "Cancelled: elevated command not confirmed")
                }
                CancelReason::EscalationDeclined => write!(f, "Cancelled: sudo retry declined"),
            },
        }
    }
}

enum State {
    Idle,
    Running(Invocation),
    PermissionSuspected(Option<i32>),
    PromptUser,
    RetryEscalated,
    Done(ExecutionOutcome),
}

pub struct CommandExecutor<R, C> {
    runner: R,
    consent: C,
    already_privileged: bool,
}

impl CommandExecutor<TerminalRunner, DialoguerConsent> {
    /// Executor for the controlling terminal, aware of whether we already run as root.
    pub fn interactive(dry_run: bool) -> Self {
        let is_root = matches!(sudo::check(), RunningAs::Root);
        Self::new(TerminalRunner::new(dry_run), DialoguerConsent).already_privileged(is_root)
    }
}

impl<R: ProcessRunner, C: Consent> CommandExecutor<R, C> {
    pub fn new(runner: R, consent: C) -> Self {
        Self {
            runner,
            consent,
            already_privileged: false,
        }
    }

    pub fn already_privileged(mut self, already_privileged: bool) -> Self {
        self.already_privileged = already_privileged;
        self
    }

    /// Run `command`, aimed at `target` when given.
    ///
    /// Errors are reserved for things that stop the command from running at
    /// all; a command that runs and fails is a [`ExecutionOutcome::Failed`].
    pub fn execute(
        &self,
        command: &str,
        target: Option<&Disk>,
    ) -> Result<ExecutionOutcome, ExecError> {
        let command = command.trim();
        if command.is_empty() {
            return Err(ExecError::EmptyCommand);
        }

        let mut state = State::Idle;
        loop {
            state = match state {
                State::Idle => self.prepare(command, target)?,
                State::Running(invocation) => self.run_primary(command, &invocation)?,
                State::PermissionSuspected(exit_code) => {
                    emit(
                        Level::Debug,
                        "installer.permission_suspected",
                        &format!(
                            "Treating {} as a permission failure",
                            describe_exit(exit_code)
                        ),
                        None,
                    );
                    State::PromptUser
                }
                State::PromptUser => {
                    let notice = EscalationNotice {
                        command: command.to_string(),
                        already_root: self.already_privileged,
                        dropped_target: target.map(|disk| disk.mount_point.clone()),
                    };
                    if self.consent.confirm_escalation(&notice)? {
                        State::RetryEscalated
                    } else {
                        State::Done(ExecutionOutcome::Cancelled {
                            reason: CancelReason::EscalationDeclined,
                        })
                    }
                }
                State::RetryEscalated => self.run_escalated(command)?,
                State::Done(outcome) => {
                    report(&outcome);
                    return Ok(outcome);
                }
            };
        }
    }

    fn prepare(&self, command: &str, target: Option<&Disk>) -> Result<State, ExecError> {
        if command.contains(ESCALATION_KEYWORD)
            && !self.consent.confirm_elevated_command(command)?
        {
            return Ok(State::Done(ExecutionOutcome::Cancelled {
                reason: CancelReason::ElevatedCommandDeclined,
            }));
        }

        let mut invocation =
            Invocation::from_tokens(tokenize(command)).ok_or(ExecError::EmptyCommand)?;

        if let Some(disk) = target {
            let mount_point = PathBuf::from(&disk.mount_point);
            probe_writable(&mount_point).map_err(|source| ExecError::WritePermission {
                path: mount_point.clone(),
                source,
            })?;
            invocation.env = target_env(&mount_point);
            invocation.cwd = Some(mount_point);

            emit(
                Level::Info,
                "installer.target",
                &format!(
                    "{} Installing to {} ({})",
                    char::from(NerdFont::Target),
                    disk.mount_point,
                    disk.disk_type
                ),
                None,
            );
        }

        emit(
            Level::Info,
            "installer.executing",
            &format!(
                "{} Executing: {}",
                char::from(NerdFont::Terminal),
                invocation.command_line()
            ),
            None,
        );
        Ok(State::Running(invocation))
    }

    fn run_primary(&self, command: &str, invocation: &Invocation) -> Result<State, ExecError> {
        let exit_code = self.spawn(invocation)?;
        if exit_code == Some(0) {
            return Ok(State::Done(ExecutionOutcome::Success));
        }

        Ok(match classify_failure(command, exit_code) {
            FailureKind::Plain => State::Done(ExecutionOutcome::Failed { exit_code }),
            FailureKind::PermissionSuspected => State::PermissionSuspected(exit_code),
        })
    }

    /// The retry runs without the target's working directory or variables.
    fn run_escalated(&self, command: &str) -> Result<State, ExecError> {
        let escalated = escalate_command(command);
        let invocation =
            Invocation::from_tokens(tokenize(&escalated)).ok_or(ExecError::EmptyCommand)?;

        emit(
            Level::Info,
            "installer.retrying",
            &format!(
                "{} Retrying: {}",
                char::from(NerdFont::Lock),
                invocation.command_line()
            ),
            None,
        );

        let exit_code = self.spawn(&invocation)?;
        Ok(State::Done(if exit_code == Some(0) {
            ExecutionOutcome::EscalatedSuccess
        } else {
            ExecutionOutcome::EscalatedFailed { exit_code }
        }))
    }

    fn spawn(&self, invocation: &Invocation) -> Result<Option<i32>, ExecError> {
        self.runner
            .run(invocation)
            .map_err(|source| ExecError::Spawn {
                program: invocation.program.clone(),
                source,
            })
    }
}

fn target_env(mount_point: &Path) -> Vec<(String, String)> {
    let value = mount_point.to_string_lossy().into_owned();
    TARGET_ENV_VARS
        .iter()
        .map(|key| (key.to_string(), value.clone()))
        .collect()
}

fn report(outcome: &ExecutionOutcome) {
    let (level, code, icon) = match outcome {
        ExecutionOutcome::Success | ExecutionOutcome::EscalatedSuccess => {
            (Level::Success, "installer.completed", NerdFont::Check)
        }
        ExecutionOutcome::Failed { .. } | ExecutionOutcome::EscalatedFailed { .. } => {
            (Level::Error, "installer.failed", NerdFont::Cross)
        }
        ExecutionOutcome::Cancelled { .. } => (Level::Info, "installer.cancelled", NerdFont::Info),
    };
    emit(level, code, &format!("{} {}", char::from(icon), outcome), None);
}
