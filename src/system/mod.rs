//! Host abstraction.
//!
//! The provisioning pipeline never touches process-global state directly.
//! Effective uid, PATH lookups, HOME, the filesystem, external commands and
//! downloads all go through the [`System`] trait so the whole pipeline can
//! run against [`MockSystem`] in tests.
//!
//! # Example
//!
//! ```
//! use liveproto_setup::shell::Invocation;
//! use liveproto_setup::system::{MockSystem, System};
//!
//! let mut system = MockSystem::new("/home/dev");
//! system.add_executable("apt-get");
//!
//! assert!(system.find_executable("apt-get").is_some());
//! let result = system.run(&Invocation::new("apt-get").arg("update"));
//! assert!(result.success);
//! assert!(system.ran("apt-get update"));
//! ```

pub mod mock;
pub mod path;

pub use mock::{Effect, MockSystem};

use std::path::{Path, PathBuf};

use crate::net::HttpFetcher;
use crate::shell::{execute, is_elevated, CommandResult, Invocation};

/// Everything the provisioner needs from the host.
pub trait System {
    /// Whether the effective user is the superuser.
    fn is_superuser(&self) -> bool;

    /// Resolve an executable on PATH.
    fn find_executable(&self, name: &str) -> Option<PathBuf>;

    /// The user's home directory (from `HOME`).
    fn home_dir(&self) -> Option<PathBuf>;

    /// The process working directory.
    fn working_dir(&self) -> PathBuf;

    /// Check whether `dir` accepts new files, creating it first when `create` is set.
    fn is_writable_dir(&self, dir: &Path, create: bool) -> bool;

    /// Check whether a regular file exists at `path`.
    fn file_exists(&self, path: &Path) -> bool;

    /// Check whether a directory exists at `path`.
    fn dir_exists(&self, path: &Path) -> bool;

    /// Create `path` and any missing parents.
    fn create_dir_all(&mut self, path: &Path) -> std::io::Result<()>;

    /// Write `contents` to `path`, replacing any existing file.
    fn write_file(&mut self, path: &Path, contents: &[u8]) -> std::io::Result<()>;

    /// Remove the file at `path`.
    fn remove_file(&mut self, path: &Path) -> std::io::Result<()>;

    /// Run an external command to completion.
    fn run(&mut self, invocation: &Invocation) -> CommandResult;

    /// Download a URL and return its body.
    fn download(&mut self, url: &str) -> anyhow::Result<Vec<u8>>;
}

/// The real host: spawns processes and talks to the network.
#[derive(Default)]
pub struct HostSystem {
    fetcher: Option<HttpFetcher>,
}

impl HostSystem {
    /// Create a host system handle.
    pub fn new() -> Self {
        Self::default()
    }
}

impl System for HostSystem {
    fn is_superuser(&self) -> bool {
        is_elevated()
    }

    fn find_executable(&self, name: &str) -> Option<PathBuf> {
        path::resolve_tool_path(name, &path::parse_system_path())
    }

    fn home_dir(&self) -> Option<PathBuf> {
        std::env::var_os("HOME")
            .filter(|home| !home.is_empty())
            .map(PathBuf::from)
    }

    fn working_dir(&self) -> PathBuf {
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }

    fn is_writable_dir(&self, dir: &Path, create: bool) -> bool {
        path::is_writable_dir(dir, create)
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn dir_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&mut self, path: &Path) -> std::io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn write_file(&mut self, path: &Path, contents: &[u8]) -> std::io::Result<()> {
        std::fs::write(path, contents)
    }

    fn remove_file(&mut self, path: &Path) -> std::io::Result<()> {
        std::fs::remove_file(path)
    }

    fn run(&mut self, invocation: &Invocation) -> CommandResult {
        execute(invocation)
    }

    fn download(&mut self, url: &str) -> anyhow::Result<Vec<u8>> {
        if self.fetcher.is_none() {
            self.fetcher = Some(HttpFetcher::new()?);
        }
        match &self.fetcher {
            Some(fetcher) => fetcher.fetch_bytes(url),
            None => anyhow::bail!("HTTP client unavailable"),
        }
    }
}
