//! Extension audit.

use std::sync::LazyLock;

use regex::Regex;

use crate::provision::{Advisories, Executor, Step};

use super::verify::RuntimeInfo;

/// Valid extension identifiers; anything else never reaches the runtime.
static EXTENSION_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("EXTENSION_NAME must compile")
});

/// PHP snippet that exits 0 when `extension` is loaded.
pub fn probe_snippet(extension: &str) -> String {
    format!("exit(extension_loaded('{}') ? 0 : 1);", extension)
}

/// Return the required extensions that the runtime does not load.
///
/// Each missing extension is also recorded as an advisory. Names that are
/// not valid extension identifiers are reported as missing without being
/// passed to the runtime.
pub fn audit_extensions(
    executor: &mut Executor<'_>,
    runtime: &RuntimeInfo,
    extensions: &[String],
    advisories: &mut Advisories,
) -> Vec<String> {
    let mut missing = Vec::new();

    for extension in extensions {
        let loaded = EXTENSION_NAME.is_match(extension)
            && executor
                .query(runtime.eval(&probe_snippet(extension)))
                .success;
        tracing::debug!("Extension {} loaded: {}", extension, loaded);

        if !loaded {
            advisories.push(
                Step::ExtensionAudit,
                format!("PHP extension '{}' is not loaded", extension),
            );
            missing.push(extension.clone());
        }
    }

    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::PrivilegeMode;
    use crate::system::MockSystem;
    use std::path::PathBuf;

    fn runtime() -> RuntimeInfo {
        RuntimeInfo {
            binary: PathBuf::from("/usr/bin/php"),
            version: Some("8.3.6".to_string()),
            int_width: Some(64),
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn probe_snippet_checks_extension() {
        assert_eq!(
            probe_snippet("gmp"),
            "exit(extension_loaded('gmp') ? 0 : 1);"
        );
    }

    #[test]
    fn collects_missing_extensions() {
        let mut system = MockSystem::new("/home/dev");
        system.respond("extension_loaded('intl')", MockSystem::exit(1));
        system.respond("extension_loaded('gmp')", MockSystem::exit(1));

        let mut executor = Executor::new(&mut system, PrivilegeMode::Root, false);
        let mut advisories = Advisories::new();
        let missing = audit_extensions(
            &mut executor,
            &runtime(),
            &names(&["openssl", "gmp", "intl", "json"]),
            &mut advisories,
        );

        assert_eq!(missing, vec!["gmp", "intl"]);
        assert_eq!(advisories.for_step(Step::ExtensionAudit).count(), 2);
        assert_eq!(system.count("extension_loaded"), 4);
    }

    #[test]
    fn all_loaded_is_clean() {
        let mut system = MockSystem::new("/home/dev");
        let mut executor = Executor::new(&mut system, PrivilegeMode::Root, false);
        let mut advisories = Advisories::new();
        let missing = audit_extensions(
            &mut executor,
            &runtime(),
            &names(&["openssl", "zlib"]),
            &mut advisories,
        );

        assert!(missing.is_empty());
        assert!(advisories.is_empty());
    }

    #[test]
    fn invalid_names_are_not_executed() {
        let mut system = MockSystem::new("/home/dev");
        let mut executor = Executor::new(&mut system, PrivilegeMode::Root, false);
        let mut advisories = Advisories::new();
        let missing = audit_extensions(
            &mut executor,
            &runtime(),
            &names(&["x'); system('id"]),
            &mut advisories,
        );

        assert_eq!(missing.len(), 1);
        assert!(system.invocations().is_empty());
    }
}
