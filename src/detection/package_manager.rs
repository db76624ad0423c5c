//! System package manager detection.

use std::fmt;
use std::path::PathBuf;

use crate::error::{ProvisionError, Result};
use crate::system::System;

/// Supported system package managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageManagerKind {
    Apt,
    Dnf,
    Yum,
    Pacman,
    Apk,
    Brew,
    Choco,
}

impl PackageManagerKind {
    /// Probe order; the first manager found on PATH wins.
    pub const PRIORITY: [PackageManagerKind; 7] = [
        Self::Apt,
        Self::Dnf,
        Self::Yum,
        Self::Pacman,
        Self::Apk,
        Self::Brew,
        Self::Choco,
    ];

    /// Executable probed on PATH.
    pub fn executable(&self) -> &'static str {
        match self {
            Self::Apt => "apt-get",
            Self::Dnf => "dnf",
            Self::Yum => "yum",
            Self::Pacman => "pacman",
            Self::Apk => "apk",
            Self::Brew => "brew",
            Self::Choco => "choco",
        }
    }

    /// Whether installs through this manager need elevated privileges.
    ///
    /// Homebrew refuses to run as root, so it is never elevated.
    pub fn needs_elevation(&self) -> bool {
        !matches!(self, Self::Brew)
    }
}

impl fmt::Display for PackageManagerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Apt => "apt",
            Self::Dnf => "dnf",
            Self::Yum => "yum",
            Self::Pacman => "pacman",
            Self::Apk => "apk",
            Self::Brew => "homebrew",
            Self::Choco => "chocolatey",
        };
        f.write_str(name)
    }
}

/// A package manager found on PATH.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedPackageManager {
    pub kind: PackageManagerKind,
    pub path: PathBuf,
}

/// Detects the system package manager.
pub struct PackageManagerDetector;

impl PackageManagerDetector {
    /// Find the highest-priority package manager on PATH.
    pub fn detect(system: &dyn System) -> Option<DetectedPackageManager> {
        PackageManagerKind::PRIORITY.iter().find_map(|kind| {
            system
                .find_executable(kind.executable())
                .map(|path| DetectedPackageManager { kind: *kind, path })
        })
    }

    /// Detect a package manager the provisioner can drive, or fail.
    ///
    /// Chocolatey is detected so it can be reported precisely, but it only
    /// works from an elevated Windows shell and has no recipe here.
    pub fn require(system: &dyn System) -> Result<DetectedPackageManager> {
        let Some(detected) = Self::detect(system) else {
            let probed: Vec<&str> = PackageManagerKind::PRIORITY
                .iter()
                .map(|kind| kind.executable())
                .collect();
            return Err(ProvisionError::NoPackageManager {
                probed: probed.join(", "),
            });
        };

        if detected.kind == PackageManagerKind::Choco {
            return Err(ProvisionError::UnsupportedPackageManager {
                name: detected.kind.to_string(),
                reason: "it requires an elevated Windows shell; install PHP and Composer manually"
                    .to_string(),
            });
        }

        tracing::info!(
            "Detected package manager {} at {}",
            detected.kind,
            detected.path.display()
        );
        Ok(detected)
    }
}
