//! Advisories and the end-of-run summary.

use std::fmt;
use std::path::PathBuf;

use crate::ui::UserInterface;

/// Pipeline step an advisory belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Privileges,
    PackageManager,
    RuntimeInstall,
    RuntimeVerify,
    ExtensionAudit,
    ComposerInstall,
    PackageRequire,
}

impl Step {
    /// Every step, in execution order.
    pub const ALL: [Step; 7] = [
        Step::Privileges,
        Step::PackageManager,
        Step::RuntimeInstall,
        Step::RuntimeVerify,
        Step::ExtensionAudit,
        Step::ComposerInstall,
        Step::PackageRequire,
    ];

    /// 1-based position of the step.
    pub fn number(&self) -> usize {
        Self::ALL
            .iter()
            .position(|s| s == self)
            .map_or(0, |index| index + 1)
    }

    /// Human-readable step title.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Privileges => "Checking privileges",
            Self::PackageManager => "Detecting package manager",
            Self::RuntimeInstall => "Installing PHP",
            Self::RuntimeVerify => "Verifying PHP",
            Self::ExtensionAudit => "Auditing PHP extensions",
            Self::ComposerInstall => "Installing Composer",
            Self::PackageRequire => "Requiring package",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Privileges => "privileges",
            Self::PackageManager => "package-manager",
            Self::RuntimeInstall => "runtime-install",
            Self::RuntimeVerify => "runtime-verify",
            Self::ExtensionAudit => "extension-audit",
            Self::ComposerInstall => "composer-install",
            Self::PackageRequire => "package-require",
        };
        f.write_str(name)
    }
}

/// A non-fatal failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advisory {
    pub step: Step,
    pub message: String,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.step, self.message)
    }
}

/// Advisories collected during a run.
#[derive(Debug, Clone, Default)]
pub struct Advisories {
    items: Vec<Advisory>,
}

impl Advisories {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an advisory and log it.
    pub fn push(&mut self, step: Step, message: impl Into<String>) {
        let advisory = Advisory {
            step,
            message: message.into(),
        };
        tracing::warn!("{}", advisory);
        self.items.push(advisory);
    }

    /// Advisories recorded so far.
    pub fn items(&self) -> &[Advisory] {
        &self.items
    }

    /// Advisories for one step.
    pub fn for_step(&self, step: Step) -> impl Iterator<Item = &Advisory> {
        self.items.iter().filter(move |a| a.step == step)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<Advisory> {
        self.items
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Runtime package selected for install.
    pub runtime_package: String,
    /// `PHP_VERSION` of the installed runtime.
    pub runtime_version: Option<String>,
    /// Native integer width in bits.
    pub int_width: Option<u32>,
    /// Composer location, when resolved.
    pub composer_path: Option<PathBuf>,
    /// Composer version, when it could be queried.
    pub composer_version: Option<String>,
    /// Package that was required.
    pub package: String,
    /// Scratch project directory.
    pub project_dir: PathBuf,
    /// Whether the manifest was written during this run.
    pub manifest_created: bool,
    /// Whether the package's installed-artifact directory exists.
    pub package_installed: bool,
    /// Required extensions that are not loaded.
    pub missing_extensions: Vec<String>,
    /// Every advisory recorded during the run.
    pub advisories: Vec<Advisory>,
}

impl Summary {
    /// Whether the run finished without any advisory.
    pub fn is_clean(&self) -> bool {
        self.advisories.is_empty()
    }
}

/// Print the summary.
pub fn render_summary(summary: &Summary, ui: &mut dyn UserInterface) {
    ui.show_header("Summary");

    ui.show_key_value(
        "PHP",
        summary.runtime_version.as_deref().unwrap_or("unknown"),
    );
    if let Some(width) = summary.int_width {
        ui.show_key_value("Integer width", &format!("{}-bit", width));
    }
    ui.show_key_value(
        "Composer",
        summary.composer_version.as_deref().unwrap_or("not available"),
    );
    ui.show_key_value("Project", &summary.project_dir.display().to_string());
    ui.show_key_value(
        &summary.package,
        if summary.package_installed {
            "installed"
        } else {
            "not installed"
        },
    );

    if !summary.missing_extensions.is_empty() {
        ui.warning(&format!(
            "Missing PHP extensions: {}",
            summary.missing_extensions.join(", ")
        ));
    }

    if summary.is_clean() {
        ui.success("Provisioning complete");
    } else {
        let label = if summary.advisories.len() == 1 {
            "warning"
        } else {
            "warnings"
        };
        ui.warning(&format!(
            "Provisioning complete with {} {}:",
            summary.advisories.len(),
            label
        ));
        for advisory in &summary.advisories {
            ui.message(&format!("  - {}", advisory));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;

    fn summary() -> Summary {
        Summary {
            runtime_package: "php8.3".to_string(),
            runtime_version: Some("8.3.6".to_string()),
            int_width: Some(64),
            composer_path: Some(PathBuf::from("/usr/local/bin/composer")),
            composer_version: Some("2.7.1".to_string()),
            package: "taknone/liveproto".to_string(),
            project_dir: PathBuf::from("/home/dev/liveproto-demo"),
            manifest_created: true,
            package_installed: true,
            missing_extensions: Vec::new(),
            advisories: Vec::new(),
        }
    }

    #[test]
    fn advisory_display_includes_step() {
        let advisory = Advisory {
            step: Step::RuntimeInstall,
            message: "php8.3-intl failed".to_string(),
        };
        assert_eq!(advisory.to_string(), "[runtime-install] php8.3-intl failed");
    }

    #[test]
    fn advisories_filter_by_step() {
        let mut advisories = Advisories::new();
        advisories.push(Step::RuntimeInstall, "a");
        advisories.push(Step::ExtensionAudit, "b");
        advisories.push(Step::RuntimeInstall, "c");

        assert_eq!(advisories.len(), 3);
        assert_eq!(advisories.for_step(Step::RuntimeInstall).count(), 2);
        assert!(!advisories.is_empty());
    }

    #[test]
    fn clean_summary_reports_success() {
        let mut ui = MockUI::new();
        render_summary(&summary(), &mut ui);

        assert!(ui.has_success("Provisioning complete"));
        assert!(ui.has_key_value("PHP", "8.3.6"));
        assert!(ui.has_key_value("Composer", "2.7.1"));
        assert!(ui.has_key_value("taknone/liveproto", "installed"));
        assert!(ui.warnings().is_empty());
    }

    #[test]
    fn missing_extensions_and_advisories_are_listed() {
        let mut s = summary();
        s.missing_extensions = vec!["intl".to_string()];
        s.package_installed = false;
        s.advisories = vec![Advisory {
            step: Step::ExtensionAudit,
            message: "extension 'intl' is not loaded".to_string(),
        }];

        let mut ui = MockUI::new();
        render_summary(&s, &mut ui);

        assert!(ui.has_warning("Missing PHP extensions: intl"));
        assert!(ui.has_warning("1 warning:"));
        assert!(ui.has_message("extension 'intl' is not loaded"));
        assert!(ui.has_key_value("taknone/liveproto", "not installed"));
    }
}
