/// Keyword that runs a command with elevated privileges.
pub const ESCALATION_KEYWORD: &str = "sudo";

/// apt and dpkg exit with 100 when they cannot lock or write their database.
pub const PERMISSION_EXIT_CODE: i32 = 100;

/// Generic failure codes that only hint at permissions for package tools.
const GENERIC_EXIT_CODES: &[i32] = &[1, 2];

pub const PACKAGE_MANAGER_TOOLS: &[&str] = &["apt", "dpkg", "yum", "dnf", "pacman", "zypper"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Plain,
    PermissionSuspected,
}

/// Classify a non-zero exit. `None` means the process died from a signal.
pub fn classify_failure(command: &str, exit_code: Option<i32>) -> FailureKind {
    match exit_code {
        Some(PERMISSION_EXIT_CODE) => FailureKind::PermissionSuspected,
        Some(code) if GENERIC_EXIT_CODES.contains(&code) && mentions_package_manager(command) => {
            FailureKind::PermissionSuspected
        }
        _ => FailureKind::Plain,
    }
}

fn mentions_package_manager(command: &str) -> bool {
    PACKAGE_MANAGER_TOOLS.iter().any(|tool| command.contains(tool))
}

/// Prefix the escalation keyword unless the command already starts with it.
pub fn escalate_command(command: &str) -> String {
    let trimmed = command.trim();
    if trimmed.split_whitespace().next() == Some(ESCALATION_KEYWORD) {
        trimmed.to_string()
    } else {
        format!("{} {}", ESCALATION_KEYWORD, trimmed)
    }
}
