//! Mock host for testing.
//!
//! `MockSystem` implements the [`System`] trait without spawning processes,
//! touching the network or writing to disk. Commands are answered from
//! scripted rules and every invocation is recorded for later assertion.
//!
//! # Example
//!
//! ```
//! use liveproto_setup::shell::Invocation;
//! use liveproto_setup::system::{Effect, MockSystem, System};
//!
//! let mut system = MockSystem::new("/home/dev");
//! system.respond("apt-cache show php8.4", MockSystem::exit(100));
//! system.on_success("install -y php8.3", Effect::AddExecutable("php".into()));
//!
//! assert!(!system.run(&Invocation::new("apt-cache").args(["show", "php8.4"])).success);
//! system.run(&Invocation::new("apt-get").args(["install", "-y", "php8.3"]));
//! assert!(system.find_executable("php").is_some());
//! ```

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::shell::{CommandResult, Invocation};

use super::System;

/// Side effect applied when a scripted command succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Make an executable resolvable on PATH.
    AddExecutable(String),
    /// Mark a directory as existing, relative to the invocation's working directory.
    CreateDir(PathBuf),
    /// Mark a file as existing (see [`MockSystem::add_file`]).
    AddFile(PathBuf),
}

#[derive(Debug, Clone)]
struct Rule {
    pattern: String,
    result: CommandResult,
    effects: Vec<Effect>,
}

/// Scripted host implementation for testing.
///
/// Rules are matched against the rendered command line by substring, in
/// registration order; the first match wins. Commands without a matching
/// rule succeed with empty output.
#[derive(Debug)]
pub struct MockSystem {
    superuser: bool,
    home: Option<PathBuf>,
    working_dir: PathBuf,
    executables: HashMap<String, PathBuf>,
    writable_dirs: HashSet<PathBuf>,
    files: HashSet<PathBuf>,
    dirs: HashSet<PathBuf>,
    written: HashMap<PathBuf, Vec<u8>>,
    failing_writes: HashMap<PathBuf, String>,
    removed: Vec<PathBuf>,
    rules: Vec<Rule>,
    downloads: HashMap<String, Result<Vec<u8>, String>>,
    invocations: Vec<Invocation>,
    requested_urls: Vec<String>,
}

impl MockSystem {
    /// Create a mock host running as root with `home` as HOME and working directory.
    pub fn new(home: impl AsRef<Path>) -> Self {
        let home = home.as_ref().to_path_buf();
        Self {
            superuser: true,
            working_dir: home.clone(),
            home: Some(home),
            executables: HashMap::new(),
            writable_dirs: HashSet::new(),
            files: HashSet::new(),
            dirs: HashSet::new(),
            written: HashMap::new(),
            failing_writes: HashMap::new(),
            removed: Vec::new(),
            rules: Vec::new(),
            downloads: HashMap::new(),
            invocations: Vec::new(),
            requested_urls: Vec::new(),
        }
    }

    /// A successful result with the given stdout.
    pub fn output(stdout: &str) -> CommandResult {
        CommandResult::success(stdout.to_string(), String::new(), Duration::ZERO)
    }

    /// A failed result with the given exit code.
    pub fn exit(code: i32) -> CommandResult {
        CommandResult::failure(Some(code), String::new(), String::new(), Duration::ZERO)
    }

    /// Set whether the mock runs as the superuser.
    pub fn set_superuser(&mut self, superuser: bool) {
        self.superuser = superuser;
    }

    /// Override (or clear) HOME.
    pub fn set_home(&mut self, home: Option<PathBuf>) {
        self.home = home;
    }

    /// Put an executable on the mock PATH.
    pub fn add_executable(&mut self, name: &str) {
        self.executables
            .insert(name.to_string(), PathBuf::from("/mock/bin").join(name));
    }

    /// Remove an executable from the mock PATH.
    pub fn remove_executable(&mut self, name: &str) {
        self.executables.remove(name);
    }

    /// Mark a directory as writable.
    pub fn allow_writes(&mut self, dir: impl AsRef<Path>) {
        self.writable_dirs.insert(dir.as_ref().to_path_buf());
    }

    /// Pretend a file exists at `path`.
    pub fn add_file(&mut self, path: impl AsRef<Path>) {
        self.files.insert(path.as_ref().to_path_buf());
    }

    /// Pretend a directory exists at `path`.
    pub fn add_dir(&mut self, path: impl AsRef<Path>) {
        self.dirs.insert(path.as_ref().to_path_buf());
    }

    /// Fail writes to `path` with `message`.
    ///
    /// The file is still left behind, as after a short write on a full disk.
    pub fn fail_write(&mut self, path: impl AsRef<Path>, message: &str) {
        self.failing_writes
            .insert(path.as_ref().to_path_buf(), message.to_string());
    }

    /// Answer commands containing `pattern` with `result`.
    pub fn respond(&mut self, pattern: &str, result: CommandResult) {
        self.respond_with_effects(pattern, result, Vec::new());
    }

    /// Answer commands containing `pattern` with `result`, applying `effects` on success.
    pub fn respond_with_effects(
        &mut self,
        pattern: &str,
        result: CommandResult,
        effects: Vec<Effect>,
    ) {
        self.rules.push(Rule {
            pattern: pattern.to_string(),
            result,
            effects,
        });
    }

    /// Let commands containing `pattern` succeed and apply `effect`.
    pub fn on_success(&mut self, pattern: &str, effect: Effect) {
        self.respond_with_effects(pattern, Self::output(""), vec![effect]);
    }

    /// Serve `body` for `url`.
    pub fn serve(&mut self, url: &str, body: impl Into<Vec<u8>>) {
        self.downloads.insert(url.to_string(), Ok(body.into()));
    }

    /// Fail downloads of `url` with `message`.
    pub fn fail_download(&mut self, url: &str, message: &str) {
        self.downloads
            .insert(url.to_string(), Err(message.to_string()));
    }

    /// Every invocation received, in order.
    pub fn invocations(&self) -> &[Invocation] {
        &self.invocations
    }

    /// Rendered command lines of every invocation, in order.
    pub fn command_lines(&self) -> Vec<String> {
        self.invocations.iter().map(Invocation::command_line).collect()
    }

    /// Check if any command line contains `pattern`.
    pub fn ran(&self, pattern: &str) -> bool {
        self.invocations
            .iter()
            .any(|inv| inv.command_line().contains(pattern))
    }

    /// Count command lines containing `pattern`.
    pub fn count(&self, pattern: &str) -> usize {
        self.invocations
            .iter()
            .filter(|inv| inv.command_line().contains(pattern))
            .count()
    }

    /// Contents last written to `path`, even if it was removed since.
    pub fn written(&self, path: impl AsRef<Path>) -> Option<&[u8]> {
        self.written.get(path.as_ref()).map(Vec::as_slice)
    }

    /// Files passed to `remove_file`, in order.
    pub fn removed_files(&self) -> &[PathBuf] {
        &self.removed
    }

    /// URLs passed to `download`, in order.
    pub fn requested_urls(&self) -> &[String] {
        &self.requested_urls
    }

    fn apply(&mut self, effect: &Effect, invocation: &Invocation) {
        match effect {
            Effect::AddExecutable(name) => self.add_executable(name),
            Effect::CreateDir(relative) => {
                let base = invocation
                    .cwd
                    .clone()
                    .unwrap_or_else(|| self.working_dir.clone());
                self.add_dir(base.join(relative));
            }
            Effect::AddFile(path) => self.add_file(path),
        }
    }
}

impl System for MockSystem {
    fn is_superuser(&self) -> bool {
        self.superuser
    }

    fn find_executable(&self, name: &str) -> Option<PathBuf> {
        self.executables.get(name).cloned()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        self.home.clone()
    }

    fn working_dir(&self) -> PathBuf {
        self.working_dir.clone()
    }

    fn is_writable_dir(&self, dir: &Path, _create: bool) -> bool {
        self.writable_dirs.contains(dir)
    }

    fn file_exists(&self, path: &Path) -> bool {
        self.files.contains(path)
    }

    fn dir_exists(&self, path: &Path) -> bool {
        self.dirs.contains(path)
    }

    fn create_dir_all(&mut self, path: &Path) -> std::io::Result<()> {
        for dir in path.ancestors() {
            self.dirs.insert(dir.to_path_buf());
        }
        Ok(())
    }

    fn write_file(&mut self, path: &Path, contents: &[u8]) -> std::io::Result<()> {
        self.files.insert(path.to_path_buf());
        if let Some(message) = self.failing_writes.get(path) {
            return Err(std::io::Error::other(message.clone()));
        }
        self.written.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    fn remove_file(&mut self, path: &Path) -> std::io::Result<()> {
        self.removed.push(path.to_path_buf());
        if self.files.remove(path) {
            Ok(())
        } else {
            Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            ))
        }
    }

    fn run(&mut self, invocation: &Invocation) -> CommandResult {
        self.invocations.push(invocation.clone());
        let line = invocation.command_line();

        let rule = self
            .rules
            .iter()
            .find(|rule| line.contains(&rule.pattern))
            .cloned();

        match rule {
            Some(rule) => {
                if rule.result.success {
                    for effect in &rule.effects {
                        self.apply(effect, invocation);
                    }
                }
                rule.result
            }
            None => Self::output(""),
        }
    }

    fn download(&mut self, url: &str) -> anyhow::Result<Vec<u8>> {
        self.requested_urls.push(url.to_string());
        match self.downloads.get(url) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(message)) => anyhow::bail!("{}", message),
            None => anyhow::bail!("HTTP 404 fetching {}", url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmatched_commands_succeed() {
        let mut system = MockSystem::new("/home/dev");
        let result = system.run(&Invocation::new("brew").arg("update"));
        assert!(result.success);
        assert_eq!(system.command_lines(), vec!["brew update"]);
    }

    #[test]
    fn first_matching_rule_wins() {
        let mut system = MockSystem::new("/home/dev");
        system.respond("show php8.4", MockSystem::exit(100));
        system.respond("show", MockSystem::output("Package: php"));

        let newest = system.run(&Invocation::new("apt-cache").args(["show", "php8.4"]));
        let older = system.run(&Invocation::new("apt-cache").args(["show", "php8.2"]));

        assert_eq!(newest.exit_code, Some(100));
        assert_eq!(older.stdout, "Package: php");
    }

    #[test]
    fn effects_apply_only_on_success() {
        let mut system = MockSystem::new("/home/dev");
        system.respond_with_effects(
            "composer require",
            MockSystem::exit(1),
            vec![Effect::CreateDir(PathBuf::from("vendor"))],
        );

        system.run(&Invocation::new("composer").arg("require"));
        assert!(!system.dir_exists(Path::new("/home/dev/vendor")));
    }

    #[test]
    fn create_dir_is_relative_to_invocation_cwd() {
        let mut system = MockSystem::new("/home/dev");
        system.on_success(
            "composer require",
            Effect::CreateDir(PathBuf::from("vendor/acme/pkg")),
        );

        system.run(
            &Invocation::new("composer")
                .arg("require")
                .current_dir("/home/dev/liveproto-demo"),
        );
        assert!(system.dir_exists(Path::new("/home/dev/liveproto-demo/vendor/acme/pkg")));
        assert!(!system.dir_exists(Path::new("/home/dev/vendor/acme/pkg")));
    }

    #[test]
    fn create_dir_all_marks_ancestors() {
        let mut system = MockSystem::new("/home/dev");
        system
            .create_dir_all(Path::new("/home/dev/liveproto-demo"))
            .unwrap();
        assert!(system.dir_exists(Path::new("/home/dev/liveproto-demo")));
        assert!(system.dir_exists(Path::new("/home/dev")));
        assert!(!system.file_exists(Path::new("/home/dev/liveproto-demo")));
    }

    #[test]
    fn failing_write_leaves_partial_file() {
        let mut system = MockSystem::new("/home/dev");
        let file = Path::new("/home/dev/composer-setup.php");
        system.fail_write(file, "No space left on device");

        let err = system.write_file(file, b"<?php").unwrap_err();
        assert!(err.to_string().contains("No space left"));
        assert!(system.file_exists(file));
        assert_eq!(system.written(file), None);
    }

    #[test]
    fn downloads_are_recorded() {
        let mut system = MockSystem::new("/home/dev");
        system.serve("https://example.test/a", "body");
        system.fail_download("https://example.test/b", "connection refused");

        assert_eq!(system.download("https://example.test/a").unwrap(), b"body");
        assert!(system
            .download("https://example.test/b")
            .unwrap_err()
            .to_string()
            .contains("connection refused"));
        assert!(system.download("https://example.test/c").is_err());
        assert_eq!(system.requested_urls().len(), 3);
    }

    #[test]
    fn writable_dirs_are_explicit() {
        let mut system = MockSystem::new("/home/dev");
        system.allow_writes("/home/dev/.local/bin");
        assert!(system.is_writable_dir(Path::new("/home/dev/.local/bin"), true));
        assert!(!system.is_writable_dir(Path::new("/usr/local/bin"), false));
    }

    #[test]
    fn written_files_exist_until_removed() {
        let mut system = MockSystem::new("/home/dev");
        let file = Path::new("/home/dev/composer-setup.php");

        system.write_file(file, b"<?php").unwrap();
        assert!(system.file_exists(file));
        system.remove_file(file).unwrap();
        assert!(!system.file_exists(file));
        assert_eq!(system.written(file), Some(&b"<?php"[..]));
        assert!(system.remove_file(file).is_err());
        assert_eq!(system.removed_files().len(), 2);
    }

    #[test]
    fn count_matches_substrings() {
        let mut system = MockSystem::new("/home/dev");
        system.run(&Invocation::new("apk").args(["add", "php83"]));
        system.run(&Invocation::new("apk").args(["add", "php83-gmp"]));
        assert_eq!(system.count("apk add php83"), 2);
        assert!(system.ran("php83-gmp"));
        assert!(!system.ran("dnf"));
    }
}
