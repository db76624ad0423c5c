//! Scratch Composer project.

use std::io;
use std::path::{Path, PathBuf};

use serde_json::json;

use super::bootstrap::composer_command;
use crate::runtime::RuntimeInfo;
use crate::shell::Invocation;
use crate::system::System;

/// Manifest file name.
pub const MANIFEST_FILE: &str = "composer.json";

/// Directory Composer installs packages into.
pub const VENDOR_DIR: &str = "vendor";

/// A throwaway project used to pull one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchProject {
    root: PathBuf,
}

impl ScratchProject {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    /// Create the project directory and, if missing, a minimal manifest.
    ///
    /// Returns whether the manifest was written. An existing manifest is
    /// never touched.
    pub fn ensure(&self, system: &mut dyn System, package: &str) -> io::Result<bool> {
        system.create_dir_all(&self.root)?;

        let manifest = self.manifest_path();
        if system.file_exists(&manifest) {
            tracing::debug!("Keeping existing {}", manifest.display());
            return Ok(false);
        }

        let mut contents = serde_json::to_string_pretty(&initial_manifest(package))
            .map_err(io::Error::other)?;
        contents.push('\n');
        system.write_file(&manifest, contents.as_bytes())?;
        tracing::info!("Wrote {}", manifest.display());
        Ok(true)
    }

    /// Where Composer puts `package` once installed.
    pub fn package_dir(&self, package: &str) -> PathBuf {
        let mut dir = self.root.join(VENDOR_DIR);
        for segment in package.split('/') {
            dir.push(segment);
        }
        dir
    }

    /// Whether `package` has been installed into the project.
    pub fn is_installed(&self, system: &dyn System, package: &str) -> bool {
        system.dir_exists(&self.package_dir(package))
    }

    /// `composer require` for `package`, run inside the project.
    pub fn require(
        &self,
        runtime: &RuntimeInfo,
        composer: &Path,
        package: &str,
        superuser: bool,
    ) -> Invocation {
        composer_command(runtime, composer, superuser)
            .args(["require", package, "--no-interaction", "--prefer-dist"])
            .current_dir(&self.root)
    }
}

fn initial_manifest(package: &str) -> serde_json::Value {
    json!({
        "name": "liveproto-setup/scratch",
        "description": format!("Scratch project for {}", package),
        "type": "project",
        "require": {},
        "minimum-stability": "dev",
        "prefer-stable": true
    })
}
