//! PHP runtime installation.

use crate::provision::{Advisories, Executor, Step};
use crate::resolver::{first_available, Resolution};
use crate::shell::{CommandResult, Invocation};

use super::recipe::{Recipe, GENERIC_RUNTIME};

/// What the install step did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    /// Selected runtime package (e.g. `php8.3`, or `php`).
    pub runtime_package: String,
    /// Whether the generic package was chosen because no candidate existed.
    pub used_fallback: bool,
    /// Packages that installed successfully.
    pub installed: Vec<String>,
    /// Packages whose install failed.
    pub failed: Vec<String>,
}

/// Install PHP and the packages for `extensions`.
///
/// Every failure here is recorded as an advisory; the caller verifies the
/// runtime afterwards.
pub fn install_runtime(
    executor: &mut Executor<'_>,
    recipe: &Recipe,
    extensions: &[String],
    advisories: &mut Advisories,
) -> InstallOutcome {
    refresh_index(executor, recipe, advisories);

    for package in recipe.prerequisites() {
        install_one(executor, recipe, package, advisories);
    }

    if let Some(repository) = recipe.third_party_repository() {
        let line = repository.command_line();
        let result = run_for(executor, recipe, repository);
        if result.success {
            tracing::info!("Added third-party repository via `{}`", line);
            refresh_index(executor, recipe, advisories);
        } else {
            advisories.push(
                Step::RuntimeInstall,
                format!(
                    "Adding the PHP repository failed (`{}` {})",
                    line,
                    result.failure_detail()
                ),
            );
        }
    }

    let resolution = select_runtime_package(executor, recipe);
    let used_fallback = resolution.is_fallback();
    let base = resolution.into_inner();
    tracing::info!(
        "Selected runtime package {}{}",
        base,
        if used_fallback { " (fallback)" } else { "" }
    );

    let mut packages = recipe.runtime_packages(&base);
    for package in recipe.extension_packages(&base, extensions) {
        if !packages.contains(&package) {
            packages.push(package);
        }
    }

    let mut outcome = InstallOutcome {
        runtime_package: base,
        used_fallback,
        installed: Vec::new(),
        failed: Vec::new(),
    };

    for package in packages {
        if install_one(executor, recipe, &package, advisories) {
            outcome.installed.push(package);
        } else {
            outcome.failed.push(package);
        }
    }

    outcome
}

/// Pick the newest versioned runtime the package index knows about.
pub fn select_runtime_package(executor: &mut Executor<'_>, recipe: &Recipe) -> Resolution<String> {
    first_available(
        recipe.runtime_candidates().iter().map(|c| c.to_string()),
        |candidate| {
            let result = executor.query(recipe.package_query(candidate));
            let exists = recipe.package_exists(&result);
            tracing::debug!("Package {} available: {}", candidate, exists);
            exists
        },
        GENERIC_RUNTIME.to_string(),
    )
}

fn refresh_index(executor: &mut Executor<'_>, recipe: &Recipe, advisories: &mut Advisories) {
    let result = run_for(executor, recipe, recipe.refresh_index());
    if !result.success {
        advisories.push(
            Step::RuntimeInstall,
            format!(
                "Updating the {} package index failed ({})",
                recipe.kind(),
                result.failure_detail()
            ),
        );
    }
}

fn install_one(
    executor: &mut Executor<'_>,
    recipe: &Recipe,
    package: &str,
    advisories: &mut Advisories,
) -> bool {
    let result = run_for(executor, recipe, recipe.install(&[package]));
    if !result.success {
        advisories.push(
            Step::RuntimeInstall,
            format!("Installing {} failed ({})", package, result.failure_detail()),
        );
    }
    result.success
}

fn run_for(
    executor: &mut Executor<'_>,
    recipe: &Recipe,
    invocation: Invocation,
) -> CommandResult {
    if recipe.kind().needs_elevation() {
        executor.run_privileged(invocation)
    } else {
        executor.run(invocation)
    }
}
