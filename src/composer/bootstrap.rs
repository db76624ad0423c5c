//! Composer installation.
//!
//! Composer is installed by downloading the official installer script,
//! checking it against the published SHA-384, and running it with PHP into
//! the first writable install directory.

use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha384};

use crate::config::{InstallDir, Settings};
use crate::detection::{extract_version, major_version};
use crate::provision::{Advisories, Executor, Step};
use crate::runtime::RuntimeInfo;
use crate::shell::Invocation;
use crate::system::System;

/// Composer executable name.
pub const COMPOSER: &str = "composer";

/// Transient installer script, written to the working directory.
pub const INSTALLER_FILE: &str = "composer-setup.php";

/// Oldest supported Composer major version.
pub const MIN_COMPOSER_MAJOR: u32 = 2;

/// Environment variable that silences Composer's root warning.
pub const ALLOW_SUPERUSER_ENV: &str = "COMPOSER_ALLOW_SUPERUSER";

/// Composer as found after the install step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposerStatus {
    /// Resolved executable.
    pub path: Option<PathBuf>,
    /// Reported version, when it could be queried.
    pub version: Option<String>,
    /// Whether this run installed it.
    pub installed_now: bool,
}

/// Resolve Composer on PATH, then in the install directories.
pub fn resolve_composer(system: &dyn System, dirs: &[InstallDir]) -> Option<PathBuf> {
    system.find_executable(COMPOSER).or_else(|| {
        dirs.iter()
            .map(|dir| dir.path.join(COMPOSER))
            .find(|candidate| system.file_exists(candidate))
    })
}

/// Invocation of a PHP script with the resolved runtime, with the
/// superuser override applied when needed.
fn php_script(runtime: &RuntimeInfo, script: &Path, superuser: bool) -> Invocation {
    let inv = Invocation::new(runtime.binary.display().to_string())
        .arg(script.display().to_string());
    if superuser {
        inv.env(ALLOW_SUPERUSER_ENV, "1")
    } else {
        inv
    }
}

/// Invocation of Composer through the resolved runtime.
///
/// Composer's shebang needs `php` on PATH, which hosts with only a
/// versioned binary (`php83`) do not have.
pub fn composer_command(runtime: &RuntimeInfo, composer: &Path, superuser: bool) -> Invocation {
    php_script(runtime, composer, superuser)
}

/// Hex SHA-384 of `bytes`.
pub fn sha384_hex(bytes: &[u8]) -> String {
    hex::encode(Sha384::digest(bytes))
}

/// Make sure Composer is available, installing it when it is not.
///
/// Nothing here is fatal; every failure is recorded as an advisory and the
/// returned status says what could be resolved.
pub fn ensure_composer(
    executor: &mut Executor<'_>,
    settings: &Settings,
    runtime: &RuntimeInfo,
    home: Option<&Path>,
    advisories: &mut Advisories,
) -> ComposerStatus {
    let dirs = settings.install_dir_candidates(home);
    let mut status = ComposerStatus::default();

    match resolve_composer(executor.system(), &dirs) {
        Some(path) => {
            tracing::info!("Composer already available at {}", path.display());
            status.path = Some(path);
        }
        None => {
            status.installed_now = install_composer(executor, settings, runtime, &dirs, advisories);
            status.path = resolve_composer(executor.system(), &dirs);
            if status.path.is_none() {
                advisories.push(
                    Step::ComposerInstall,
                    "Composer is still not available after the install attempt",
                );
            }
        }
    }

    if let Some(path) = &status.path {
        status.version = query_version(executor, runtime, path, advisories);
    }

    status
}

fn install_composer(
    executor: &mut Executor<'_>,
    settings: &Settings,
    runtime: &RuntimeInfo,
    dirs: &[InstallDir],
    advisories: &mut Advisories,
) -> bool {
    let Some(target) = dirs
        .iter()
        .find(|dir| executor.system().is_writable_dir(&dir.path, dir.under_home))
    else {
        let tried: Vec<String> = dirs.iter().map(|d| d.path.display().to_string()).collect();
        advisories.push(
            Step::ComposerInstall,
            format!("No writable install directory (tried: {})", tried.join(", ")),
        );
        return false;
    };
    tracing::info!("Installing Composer into {}", target.path.display());

    let installer = match executor.system_mut().download(&settings.installer_url) {
        Ok(bytes) => bytes,
        Err(e) => {
            advisories.push(
                Step::ComposerInstall,
                format!("Downloading the Composer installer failed: {}", e),
            );
            return false;
        }
    };

    if settings.verify_installer_signature
        && !signature_matches(executor, &settings.signature_url, &installer, advisories)
    {
        return false;
    }

    let script = executor.system().working_dir().join(INSTALLER_FILE);
    if let Err(e) = executor.system_mut().write_file(&script, &installer) {
        advisories.push(
            Step::ComposerInstall,
            format!("Writing {} failed: {}", script.display(), e),
        );
        discard_script(executor, &script);
        return false;
    }

    let superuser = executor.system().is_superuser();
    let invocation = php_script(runtime, &script, superuser)
        .arg(format!("--install-dir={}", target.path.display()))
        .arg(format!("--filename={}", COMPOSER));
    let result = executor.run(invocation);
    discard_script(executor, &script);

    if !result.success {
        advisories.push(
            Step::ComposerInstall,
            format!("The Composer installer failed ({})", result.failure_detail()),
        );
    }
    result.success
}

/// Remove the installer script, including a partial one left by a failed write.
fn discard_script(executor: &mut Executor<'_>, script: &Path) {
    match executor.system_mut().remove_file(script) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("Could not remove {}: {}", script.display(), e),
    }
}

fn signature_matches(
    executor: &mut Executor<'_>,
    url: &str,
    installer: &[u8],
    advisories: &mut Advisories,
) -> bool {
    let expected = match executor.system_mut().download(url) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).trim().to_lowercase(),
        Err(e) => {
            advisories.push(
                Step::ComposerInstall,
                format!("Downloading the installer signature failed: {}", e),
            );
            return false;
        }
    };

    let actual = sha384_hex(installer);
    if actual != expected {
        advisories.push(
            Step::ComposerInstall,
            "Composer installer signature mismatch; the installer was not run",
        );
        return false;
    }
    tracing::debug!("Composer installer signature verified");
    true
}

fn query_version(
    executor: &mut Executor<'_>,
    runtime: &RuntimeInfo,
    composer: &Path,
    advisories: &mut Advisories,
) -> Option<String> {
    let superuser = executor.system().is_superuser();
    let result = executor.query(composer_command(runtime, composer, superuser).arg("--version"));
    let version = if result.success {
        extract_version(&result.stdout)
    } else {
        None
    };

    match &version {
        Some(v) => {
            if major_version(v).is_some_and(|major| major < MIN_COMPOSER_MAJOR) {
                advisories.push(
                    Step::ComposerInstall,
                    format!(
                        "Composer {} is older than {}.x; the package may not install",
                        v, MIN_COMPOSER_MAJOR
                    ),
                );
            }
        }
        None => advisories.push(
            Step::ComposerInstall,
            "Could not determine the Composer version",
        ),
    }

    version
}
