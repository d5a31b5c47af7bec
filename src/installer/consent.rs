use super::error::ExecError;
use super::executor::TARGET_ENV_VARS;
use crate::ui::prelude::*;
use dialoguer::Confirm;

/// What the operator is told before agreeing to a sudo retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscalationNotice {
    pub command: String,
    /// checkpoint itself already runs as root.
    pub already_root: bool,
    /// Mount point the first run was aimed at; the retry does not use it.
    pub dropped_target: Option<String>,
}

impl EscalationNotice {
    pub fn caveats(&self) -> Vec<String> {
        let mut caveats = vec![
            "Retrying as root gives the command full control over the system. \
             Only continue if you trust it."
                .to_string(),
        ];
        if self.already_root {
            caveats.push("Already running as root, so sudo is unlikely to help".to_string());
        }
        if let Some(mount_point) = &self.dropped_target {
            caveats.push(format!(
                "The sudo retry does not run in {} and does not set {}",
                mount_point,
                TARGET_ENV_VARS.join("/")
            ));
        }
        caveats
    }
}

/// Operator confirmation for privileged execution.
pub trait Consent {
    /// Asked before running a command that already escalates.
    fn confirm_elevated_command(&self, command: &str) -> Result<bool, ExecError>;

    /// Asked after a failure that looks like a permission problem.
    fn confirm_escalation(&self, notice: &EscalationNotice) -> Result<bool, ExecError>;
}

pub struct DialoguerConsent;

impl Consent for DialoguerConsent {
    fn confirm_elevated_command(&self, command: &str) -> Result<bool, ExecError> {
        emit(
            Level::Warn,
            "installer.elevated_command",
            &format!(
                "{} This command runs with elevated privileges: {}",
                char::from(NerdFont::Lock),
                command
            ),
            None,
        );
        Ok(Confirm::new()
            .with_prompt("Run it?")
            .default(false)
            .interact()?)
    }

    fn confirm_escalation(&self, notice: &EscalationNotice) -> Result<bool, ExecError> {
        emit(
            Level::Warn,
            "installer.permission_suspected",
            &format!(
                "{} The command may have failed because of missing permissions",
                char::from(NerdFont::Warning)
            ),
            None,
        );
        for caveat in notice.caveats() {
            emit(Level::Warn, "installer.escalation_caveat", &caveat, None);
        }
        Ok(Confirm::new()
            .with_prompt(format!("Retry '{}' with sudo?", notice.command))
            .default(false)
            .interact()?)
    }
}
