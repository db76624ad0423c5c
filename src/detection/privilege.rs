//! Privilege detection and command elevation.

use std::fmt;

use crate::shell::Invocation;
use crate::system::System;

/// Elevation helper probed when not running as the superuser.
pub const ELEVATION_HELPER: &str = "sudo";

/// How privileged commands are run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivilegeMode {
    /// Effective user is the superuser; nothing to prefix.
    Root,
    /// Privileged commands are prefixed with `sudo`.
    Sudo,
    /// No way to elevate; privileged commands run as-is and will likely fail.
    None,
}

impl PrivilegeMode {
    /// Determine the privilege mode of the current process.
    pub fn detect(system: &dyn System) -> Self {
        if system.is_superuser() {
            Self::Root
        } else if system.find_executable(ELEVATION_HELPER).is_some() {
            Self::Sudo
        } else {
            Self::None
        }
    }

    /// Rewrite an invocation so it runs with elevated privileges.
    ///
    /// In `Sudo` mode extra environment variables are passed through `env`,
    /// since `sudo` resets the environment of its child.
    pub fn elevate(&self, invocation: Invocation) -> Invocation {
        match self {
            Self::Root | Self::None => invocation,
            Self::Sudo => {
                let mut args = Vec::with_capacity(invocation.args.len() + invocation.env.len() + 2);
                if !invocation.env.is_empty() {
                    args.push("env".to_string());
                    for (key, value) in &invocation.env {
                        args.push(format!("{}={}", key, value));
                    }
                }
                args.push(invocation.program);
                args.extend(invocation.args);

                Invocation {
                    program: ELEVATION_HELPER.to_string(),
                    args,
                    env: Vec::new(),
                    cwd: invocation.cwd,
                    capture: invocation.capture,
                }
            }
        }
    }
}

impl fmt::Display for PrivilegeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, "root"),
            Self::Sudo => write!(f, "sudo"),
            Self::None => write!(f, "unprivileged"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::MockSystem;

    #[test]
    fn superuser_is_root() {
        let mut system = MockSystem::new("/root");
        system.add_executable("sudo");
        assert_eq!(PrivilegeMode::detect(&system), PrivilegeMode::Root);
    }

    #[test]
    fn sudo_on_path_is_sudo() {
        let mut system = MockSystem::new("/home/dev");
        system.set_superuser(false);
        system.add_executable("sudo");
        assert_eq!(PrivilegeMode::detect(&system), PrivilegeMode::Sudo);
    }

    #[test]
    fn no_helper_is_none() {
        let mut system = MockSystem::new("/home/dev");
        system.set_superuser(false);
        assert_eq!(PrivilegeMode::detect(&system), PrivilegeMode::None);
    }

    #[test]
    fn root_leaves_invocation_alone() {
        let inv = Invocation::new("apt-get").args(["update", "-y"]);
        assert_eq!(PrivilegeMode::Root.elevate(inv.clone()), inv);
    }

    #[test]
    fn sudo_prefixes_program() {
        let inv = Invocation::new("dnf").args(["install", "-y", "php"]);
        let elevated = PrivilegeMode::Sudo.elevate(inv);
        assert_eq!(elevated.command_line(), "sudo dnf install -y php");
    }

    #[test]
    fn sudo_passes_env_through_env_command() {
        let inv = Invocation::new("apt-get")
            .args(["install", "-y", "php8.3"])
            .env("DEBIAN_FRONTEND", "noninteractive")
            .captured();
        let elevated = PrivilegeMode::Sudo.elevate(inv);

        assert_eq!(
            elevated.command_line(),
            "sudo env DEBIAN_FRONTEND=noninteractive apt-get install -y php8.3"
        );
        assert!(elevated.env.is_empty());
        assert!(elevated.capture);
    }

    #[test]
    fn display_names() {
        assert_eq!(PrivilegeMode::Root.to_string(), "root");
        assert_eq!(PrivilegeMode::Sudo.to_string(), "sudo");
        assert_eq!(PrivilegeMode::None.to_string(), "unprivileged");
    }
}
