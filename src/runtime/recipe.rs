//! Per-package-manager install recipes.
//!
//! A [`Recipe`] knows how one package manager names PHP packages and how to
//! drive it: index refresh, prerequisites, optional third-party repository,
//! package existence queries and install commands. It only builds
//! [`Invocation`]s; running them is up to the caller.

use crate::detection::PackageManagerKind;
use crate::error::{ProvisionError, Result};
use crate::shell::{CommandResult, Invocation};

/// Generic runtime package name, used when no versioned candidate exists.
pub const GENERIC_RUNTIME: &str = "php";

/// How a package manager is driven to install PHP.
///
/// Only managers with a recipe have a variant; see [`Recipe::for_kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipe {
    Apt,
    Dnf,
    Yum,
    Pacman,
    Apk,
    Brew,
}

impl Recipe {
    /// Recipe for a detected package manager.
    pub fn for_kind(kind: PackageManagerKind) -> Result<Self> {
        match kind {
            PackageManagerKind::Apt => Ok(Self::Apt),
            PackageManagerKind::Dnf => Ok(Self::Dnf),
            PackageManagerKind::Yum => Ok(Self::Yum),
            PackageManagerKind::Pacman => Ok(Self::Pacman),
            PackageManagerKind::Apk => Ok(Self::Apk),
            PackageManagerKind::Brew => Ok(Self::Brew),
            PackageManagerKind::Choco => Err(ProvisionError::UnsupportedPackageManager {
                name: kind.to_string(),
                reason: "no install recipe is available".to_string(),
            }),
        }
    }

    /// The package manager this recipe drives.
    pub fn kind(&self) -> PackageManagerKind {
        match self {
            Self::Apt => PackageManagerKind::Apt,
            Self::Dnf => PackageManagerKind::Dnf,
            Self::Yum => PackageManagerKind::Yum,
            Self::Pacman => PackageManagerKind::Pacman,
            Self::Apk => PackageManagerKind::Apk,
            Self::Brew => PackageManagerKind::Brew,
        }
    }

    fn program(&self) -> &'static str {
        self.kind().executable()
    }

    /// Command that refreshes the local package index.
    pub fn refresh_index(&self) -> Invocation {
        let inv = Invocation::new(self.program());
        match self {
            Self::Apt | Self::Apk | Self::Brew => inv.arg("update"),
            Self::Dnf | Self::Yum => inv.args(["makecache", "-y"]),
            Self::Pacman => inv.args(["-Sy", "--noconfirm"]),
        }
    }

    /// Tooling installed before PHP.
    pub fn prerequisites(&self) -> &'static [&'static str] {
        match self {
            Self::Apt => &[
                "ca-certificates",
                "curl",
                "unzip",
                "git",
                "software-properties-common",
            ],
            Self::Dnf | Self::Yum | Self::Pacman => &["curl", "unzip", "git"],
            Self::Apk => &["ca-certificates", "curl", "unzip", "git"],
            Self::Brew => &[],
        }
    }

    /// Command that installs `packages`.
    pub fn install<S: AsRef<str>>(&self, packages: &[S]) -> Invocation {
        let packages = packages.iter().map(|p| p.as_ref().to_string());
        let inv = Invocation::new(self.program());
        match self {
            Self::Apt => inv
                .args(["install", "-y"])
                .args(packages)
                .env("DEBIAN_FRONTEND", "noninteractive"),
            Self::Dnf | Self::Yum => inv.args(["install", "-y"]).args(packages),
            Self::Pacman => inv.args(["-S", "--noconfirm", "--needed"]).args(packages),
            Self::Apk => inv.args(["add", "--no-cache"]).args(packages),
            Self::Brew => inv.arg("install").args(packages),
        }
    }

    /// Command that adds a repository carrying newer PHP builds, if any.
    pub fn third_party_repository(&self) -> Option<Invocation> {
        match self {
            Self::Apt => Some(
                Invocation::new("add-apt-repository")
                    .args(["-y", "ppa:ondrej/php"])
                    .env("DEBIAN_FRONTEND", "noninteractive"),
            ),
            Self::Dnf | Self::Yum => Some(self.install(&["epel-release"])),
            _ => None,
        }
    }

    /// Versioned runtime packages, newest first.
    pub fn runtime_candidates(&self) -> &'static [&'static str] {
        match self {
            Self::Apt => &["php8.4", "php8.3", "php8.2", "php8.1"],
            Self::Apk => &["php84", "php83", "php82", "php81"],
            _ => &[],
        }
    }

    /// Query whether `package` exists in the package index.
    pub fn package_query(&self, package: &str) -> Invocation {
        let inv = Invocation::new(self.program()).captured();
        match self {
            Self::Apt => Invocation::new("apt-cache")
                .captured()
                .args(["show", package]),
            Self::Dnf | Self::Yum => inv.args(["info", "-q", package]),
            Self::Pacman => inv.args(["-Si", package]),
            Self::Apk => inv.args(["search", "--exact", package]),
            Self::Brew => inv.args(["info", package]),
        }
    }

    /// Interpret the result of [`Recipe::package_query`].
    ///
    /// `apk search` exits 0 even without matches, so it also needs output.
    pub fn package_exists(&self, result: &CommandResult) -> bool {
        match self {
            Self::Apk => result.success && !result.stdout_trimmed().is_empty(),
            _ => result.success,
        }
    }

    /// Runtime, CLI and development packages for `base`.
    pub fn runtime_packages(&self, base: &str) -> Vec<String> {
        match self {
            Self::Apt => vec![
                base.to_string(),
                format!("{}-cli", base),
                format!("{}-dev", base),
            ],
            Self::Dnf | Self::Yum => vec![
                base.to_string(),
                format!("{}-cli", base),
                format!("{}-devel", base),
            ],
            Self::Apk => vec![base.to_string(), format!("{}-dev", base)],
            Self::Pacman | Self::Brew => vec![base.to_string()],
        }
    }

    /// Package providing `extension` for runtime `base`.
    ///
    /// `None` means the extension is compiled into the runtime package on
    /// this package manager.
    pub fn extension_package(&self, base: &str, extension: &str) -> Option<String> {
        match self {
            Self::Apt => match extension {
                "openssl" | "json" | "zlib" | "fileinfo" => None,
                "dom" => Some(format!("{}-xml", base)),
                ext => Some(format!("{}-{}", base, ext)),
            },
            Self::Dnf | Self::Yum => match extension {
                "openssl" | "json" | "zlib" | "fileinfo" | "curl" => None,
                "dom" => Some(format!("{}-xml", base)),
                "zip" => Some(format!("{}-pecl-zip", base)),
                ext => Some(format!("{}-{}", base, ext)),
            },
            Self::Apk => match extension {
                "json" | "zlib" => None,
                ext => Some(format!("{}-{}", base, ext)),
            },
            Self::Pacman | Self::Brew => None,
        }
    }

    /// Packages for all `extensions`, de-duplicated, in order.
    pub fn extension_packages<S: AsRef<str>>(&self, base: &str, extensions: &[S]) -> Vec<String> {
        let mut packages: Vec<String> = Vec::new();
        for ext in extensions {
            if let Some(package) = self.extension_package(base, ext.as_ref()) {
                if !packages.contains(&package) {
                    packages.push(package);
                }
            }
        }
        packages
    }

    /// Executable names the runtime may be installed under.
    pub fn runtime_binaries(&self, base: &str) -> Vec<String> {
        let mut names = vec![GENERIC_RUNTIME.to_string()];
        if *self == Self::Apk && base != GENERIC_RUNTIME {
            names.push(base.to_string());
        }
        names
    }
}
