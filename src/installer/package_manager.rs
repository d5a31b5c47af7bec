use serde::Serialize;
use std::fmt;

/// Package managers in detection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Apt,
    Dnf,
    Yum,
    Zypper,
    Pacman,
    Apk,
    Emerge,
}

impl PackageManager {
    pub const ALL: [PackageManager; 7] = [
        PackageManager::Apt,
        PackageManager::Dnf,
        PackageManager::Yum,
        PackageManager::Zypper,
        PackageManager::Pacman,
        PackageManager::Apk,
        PackageManager::Emerge,
    ];

    pub fn binary(&self) -> &'static str {
        match self {
            PackageManager::Apt => "apt",
            PackageManager::Dnf => "dnf",
            PackageManager::Yum => "yum",
            PackageManager::Zypper => "zypper",
            PackageManager::Pacman => "pacman",
            PackageManager::Apk => "apk",
            PackageManager::Emerge => "emerge",
        }
    }

    /// The usual command line for installing `package`.
    pub fn install_command(&self, package: &str) -> String {
        match self {
            PackageManager::Apt => format!("sudo apt install {}", package),
            PackageManager::Dnf => format!("sudo dnf install {}", package),
            PackageManager::Yum => format!("sudo yum install {}", package),
            PackageManager::Zypper => format!("sudo zypper install {}", package),
            PackageManager::Pacman => format!("sudo pacman -S {}", package),
            PackageManager::Apk => format!("sudo apk add {}", package),
            PackageManager::Emerge => format!("sudo emerge {}", package),
        }
    }

    /// First package manager found on `PATH`.
    pub fn detect() -> Option<Self> {
        Self::detect_with(|binary| which::which(binary).is_ok())
    }

    fn detect_with(is_installed: impl Fn(&str) -> bool) -> Option<Self> {
        Self::ALL.into_iter().find(|pm| is_installed(pm.binary()))
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary())
    }
}
