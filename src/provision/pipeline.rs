//! The provisioning pipeline.

use crate::composer::{ensure_composer, ScratchProject};
use crate::config::Settings;
use crate::detection::{PackageManagerDetector, PrivilegeMode, ELEVATION_HELPER};
use crate::error::{ProvisionError, Result};
use crate::runtime::{audit_extensions, install_runtime, verify_runtime, Recipe};
use crate::system::System;
use crate::ui::UserInterface;

use super::executor::Executor;
use super::report::{render_summary, Advisories, Step, Summary};

/// Runs every provisioning step in order and prints the summary.
pub struct Provisioner<'a> {
    system: &'a mut dyn System,
    ui: &'a mut dyn UserInterface,
    settings: Settings,
}

impl<'a> Provisioner<'a> {
    pub fn new(
        system: &'a mut dyn System,
        ui: &'a mut dyn UserInterface,
        settings: Settings,
    ) -> Self {
        Self {
            system,
            ui,
            settings,
        }
    }

    fn begin(&mut self, step: Step) {
        tracing::info!("Step {}: {}", step.number(), step.title());
        self.ui
            .show_step(step.number(), Step::ALL.len(), step.title());
    }

    /// Run the pipeline.
    ///
    /// Returns the summary on completion, advisories included. Fatal
    /// conditions stop the run before any later step starts.
    pub fn run(mut self) -> Result<Summary> {
        let mut advisories = Advisories::new();

        self.begin(Step::Privileges);
        let privilege = PrivilegeMode::detect(&*self.system);
        tracing::debug!("Privilege mode: {}", privilege);
        match privilege {
            PrivilegeMode::Root => self.ui.success("Running as root"),
            PrivilegeMode::Sudo => self
                .ui
                .success(&format!("Privileged commands will use {}", ELEVATION_HELPER)),
            PrivilegeMode::None => {
                let message = format!(
                    "Not running as root and {} is unavailable; package installs will likely fail",
                    ELEVATION_HELPER
                );
                self.ui.warning(&message);
                advisories.push(Step::Privileges, message);
            }
        }

        self.begin(Step::PackageManager);
        let detected = PackageManagerDetector::require(&*self.system)?;
        let recipe = Recipe::for_kind(detected.kind)?;
        self.ui.success(&format!(
            "Using {} ({})",
            detected.kind,
            detected.path.display()
        ));

        let home = self.system.home_dir().ok_or(ProvisionError::HomeNotSet)?;
        let stream = self.ui.output_mode().shows_command_output();
        let extensions = self.settings.extensions.clone();

        self.begin(Step::RuntimeInstall);
        let outcome = {
            let mut executor = Executor::new(&mut *self.system, privilege, stream);
            install_runtime(&mut executor, &recipe, &extensions, &mut advisories)
        };
        if outcome.failed.is_empty() {
            self.ui.success(&format!(
                "Installed {} package(s) for {}",
                outcome.installed.len(),
                outcome.runtime_package
            ));
        } else {
            self.ui.warning(&format!(
                "{} package(s) failed to install: {}",
                outcome.failed.len(),
                outcome.failed.join(", ")
            ));
        }

        self.begin(Step::RuntimeVerify);
        let runtime = {
            let mut executor = Executor::new(&mut *self.system, privilege, stream);
            verify_runtime(
                &mut executor,
                &recipe.runtime_binaries(&outcome.runtime_package),
                &mut advisories,
            )?
        };
        self.ui.success(&format!(
            "PHP {} at {}",
            runtime.version.as_deref().unwrap_or("(unknown version)"),
            runtime.binary.display()
        ));

        self.begin(Step::ExtensionAudit);
        let missing_extensions = {
            let mut executor = Executor::new(&mut *self.system, privilege, stream);
            audit_extensions(&mut executor, &runtime, &extensions, &mut advisories)
        };
        if missing_extensions.is_empty() {
            self.ui.success("All required extensions are loaded");
        } else {
            self.ui.warning(&format!(
                "Missing extensions: {}",
                missing_extensions.join(", ")
            ));
        }

        self.begin(Step::ComposerInstall);
        let composer = {
            let mut executor = Executor::new(&mut *self.system, privilege, stream);
            ensure_composer(
                &mut executor,
                &self.settings,
                &runtime,
                Some(home.as_path()),
                &mut advisories,
            )
        };
        match &composer.path {
            Some(path) => self.ui.success(&format!(
                "Composer {} at {}",
                composer.version.as_deref().unwrap_or("(unknown version)"),
                path.display()
            )),
            None => self.ui.warning("Composer is not available"),
        }

        self.begin(Step::PackageRequire);
        let package = self.settings.package.clone();
        let composer_path =
            composer
                .path
                .clone()
                .ok_or_else(|| ProvisionError::DependencyManagerMissing {
                    package: package.clone(),
                })?;
        let project = ScratchProject::new(self.settings.project_path(&home));
        let manifest_created = match project.ensure(&mut *self.system, &package) {
            Ok(created) => {
                let superuser = self.system.is_superuser();
                let require = project.require(&runtime, &composer_path, &package, superuser);
                let mut executor = Executor::new(&mut *self.system, privilege, stream);
                let result = executor.run(require);
                if !result.success {
                    advisories.push(
                        Step::PackageRequire,
                        format!(
                            "composer require {} failed ({})",
                            package,
                            result.failure_detail()
                        ),
                    );
                }
                created
            }
            Err(e) => {
                advisories.push(
                    Step::PackageRequire,
                    format!(
                        "Could not prepare {}: {}",
                        project.root().display(),
                        e
                    ),
                );
                false
            }
        };
        let package_installed = project.is_installed(&*self.system, &package);
        if package_installed {
            self.ui
                .success(&format!("{} installed in {}", package, project.root().display()));
        }

        let summary = Summary {
            runtime_package: outcome.runtime_package,
            runtime_version: runtime.version,
            int_width: runtime.int_width,
            composer_path: Some(composer_path),
            composer_version: composer.version,
            package,
            project_dir: project.root().to_path_buf(),
            manifest_created,
            package_installed,
            missing_extensions,
            advisories: advisories.into_vec(),
        };
        render_summary(&summary, &mut *self.ui);
        Ok(summary)
    }
}
