//! Settings schema.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Package required into the scratch project.
pub const DEFAULT_PACKAGE: &str = "taknone/liveproto";

/// Scratch project directory, relative to HOME.
pub const DEFAULT_PROJECT_DIR: &str = "liveproto-demo";

/// Composer installer script.
pub const DEFAULT_INSTALLER_URL: &str = "https://getcomposer.org/installer";

/// Published SHA-384 of the Composer installer.
pub const DEFAULT_SIGNATURE_URL: &str = "https://composer.github.io/installer.sig";

/// PHP extensions that must be loaded after install.
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "openssl", "gmp", "xml", "zip", "mbstring", "curl", "bcmath", "intl", "json", "dom",
    "fileinfo", "zlib",
];

/// Composer install directories, most preferred first.
pub const DEFAULT_INSTALL_DIRS: &[&str] = &["/usr/local/bin", "~/.local/bin", "~/bin"];

/// Provisioning settings.
///
/// Every key is optional in the YAML file; missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Composer package to require.
    pub package: String,

    /// Scratch project directory (`~/`-relative, absolute, or relative to HOME).
    pub project_dir: String,

    /// Required PHP extensions.
    pub extensions: Vec<String>,

    /// Composer installer URL.
    pub installer_url: String,

    /// Installer signature URL.
    pub signature_url: String,

    /// Verify the installer against its published SHA-384 before running it.
    pub verify_installer_signature: bool,

    /// Candidate directories for the Composer binary (same path rules as `project_dir`).
    pub install_dirs: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            package: DEFAULT_PACKAGE.to_string(),
            project_dir: DEFAULT_PROJECT_DIR.to_string(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            installer_url: DEFAULT_INSTALLER_URL.to_string(),
            signature_url: DEFAULT_SIGNATURE_URL.to_string(),
            verify_installer_signature: true,
            install_dirs: DEFAULT_INSTALL_DIRS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Settings {
    /// Absolute path of the scratch project.
    pub fn project_path(&self, home: &Path) -> PathBuf {
        expand_home(&self.project_dir, home)
    }

    /// Composer install directory candidates, resolved like [`Settings::project_path`].
    ///
    /// Entries that need HOME are dropped when it is unknown.
    pub fn install_dir_candidates(&self, home: Option<&Path>) -> Vec<InstallDir> {
        self.install_dirs
            .iter()
            .filter_map(|raw| {
                if is_under_home(raw) {
                    home.map(|h| InstallDir {
                        path: expand_home(raw, h),
                        under_home: true,
                    })
                } else {
                    Some(InstallDir {
                        path: PathBuf::from(raw),
                        under_home: false,
                    })
                }
            })
            .collect()
    }
}

/// A Composer install directory candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallDir {
    pub path: PathBuf,
    /// Directories under HOME are created when missing.
    pub under_home: bool,
}

fn is_under_home(raw: &str) -> bool {
    !Path::new(raw).is_absolute()
}

fn expand_home(raw: &str, home: &Path) -> PathBuf {
    if raw == "~" {
        home.to_path_buf()
    } else if let Some(rest) = raw.strip_prefix("~/") {
        home.join(rest)
    } else {
        // Relative paths are anchored at HOME; absolute ones replace it.
        home.join(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_liveproto() {
        let settings = Settings::default();
        assert_eq!(settings.package, "taknone/liveproto");
        assert_eq!(settings.extensions.len(), 12);
        assert!(settings.extensions.contains(&"gmp".to_string()));
        assert!(settings.verify_installer_signature);
    }

    #[test]
    fn project_path_is_under_home() {
        let settings = Settings::default();
        assert_eq!(
            settings.project_path(Path::new("/home/dev")),
            PathBuf::from("/home/dev/liveproto-demo")
        );
    }

    #[test]
    fn project_path_expands_tilde_and_keeps_absolute() {
        let mut settings = Settings {
            project_dir: "~/scratch/demo".to_string(),
            ..Default::default()
        };
        assert_eq!(
            settings.project_path(Path::new("/home/dev")),
            PathBuf::from("/home/dev/scratch/demo")
        );

        settings.project_dir = "/tmp/demo".to_string();
        assert_eq!(
            settings.project_path(Path::new("/home/dev")),
            PathBuf::from("/tmp/demo")
        );
    }

    #[test]
    fn install_dirs_expand_home() {
        let dirs = Settings::default().install_dir_candidates(Some(Path::new("/home/dev")));
        assert_eq!(
            dirs,
            vec![
                InstallDir {
                    path: PathBuf::from("/usr/local/bin"),
                    under_home: false
                },
                InstallDir {
                    path: PathBuf::from("/home/dev/.local/bin"),
                    under_home: true
                },
                InstallDir {
                    path: PathBuf::from("/home/dev/bin"),
                    under_home: true
                },
            ]
        );
    }

    #[test]
    fn relative_install_dirs_are_anchored_at_home() {
        let settings = Settings {
            install_dirs: vec!["bin".to_string(), "/opt/bin".to_string()],
            project_dir: "bin".to_string(),
            ..Default::default()
        };
        let home = Path::new("/home/dev");
        let dirs = settings.install_dir_candidates(Some(home));

        assert_eq!(dirs[0].path, settings.project_path(home));
        assert!(dirs[0].under_home);
        assert_eq!(dirs[1].path, PathBuf::from("/opt/bin"));
        assert!(!dirs[1].under_home);
        assert_eq!(settings.install_dir_candidates(None).len(), 1);
    }

    #[test]
    fn install_dirs_without_home_drop_home_entries() {
        let dirs = Settings::default().install_dir_candidates(None);
        assert_eq!(dirs.len(), 1);
        assert_eq!(dirs[0].path, PathBuf::from("/usr/local/bin"));
    }
}
