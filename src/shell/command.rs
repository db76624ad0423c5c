//! External command execution.
//!
//! Every command the provisioner runs is described by an [`Invocation`] and
//! produces a [`CommandResult`]. A command that cannot even be spawned is
//! still a result (with no exit code), never a panic, so callers can decide
//! whether the failure is fatal or advisory.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// A single external command to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program name or path.
    pub program: String,

    /// Arguments, passed without shell interpretation.
    pub args: Vec<String>,

    /// Extra environment variables (merged with the inherited env).
    pub env: Vec<(String, String)>,

    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Capture stdout/stderr (if false, both inherit from the parent).
    pub capture: bool,
}

impl Invocation {
    /// Create an invocation for `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            cwd: None,
            capture: false,
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the child.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Run the child inside `dir`.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Capture output instead of streaming it to the terminal.
    pub fn captured(mut self) -> Self {
        self.capture = true;
        self
    }

    /// Render the command line for logs and messages.
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                line.push_str(&format!("'{}'", arg));
            } else {
                line.push_str(arg);
            }
        }
        line
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Result of executing an external command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal or never started).
    pub exit_code: Option<i32>,

    /// Standard output (empty unless captured).
    pub stdout: String,

    /// Standard error (empty unless captured).
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,

    /// Why the command could not be spawned, if it wasn't.
    pub spawn_error: Option<String>,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
            spawn_error: None,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
            spawn_error: None,
        }
    }

    /// Create a result for a command that could not be started.
    pub fn not_started(reason: impl Into<String>) -> Self {
        Self {
            exit_code: None,
            stdout: String::new(),
            stderr: String::new(),
            duration: Duration::ZERO,
            success: false,
            spawn_error: Some(reason.into()),
        }
    }

    /// Trimmed stdout, convenient for single-value queries.
    pub fn stdout_trimmed(&self) -> &str {
        self.stdout.trim()
    }

    /// Human-readable reason for a failure.
    pub fn failure_reason(&self) -> String {
        if let Some(reason) = &self.spawn_error {
            return format!("could not be started: {}", reason);
        }
        match self.exit_code {
            Some(code) => format!("exited with code {}", code),
            None => "terminated by signal".to_string(),
        }
    }

    /// Failure reason plus the last line of captured stderr, if any.
    pub fn failure_detail(&self) -> String {
        let reason = self.failure_reason();
        match self.stderr.lines().rev().map(str::trim).find(|l| !l.is_empty()) {
            Some(line) => format!("{}: {}", reason, line),
            None => reason,
        }
    }
}

/// Execute an invocation and wait for it to finish.
pub fn execute(invocation: &Invocation) -> CommandResult {
    let start = Instant::now();
    tracing::debug!("Running: {}", invocation);

    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args);

    if let Some(cwd) = &invocation.cwd {
        cmd.current_dir(cwd);
    }

    for (key, value) in &invocation.env {
        cmd.env(key, value);
    }

    if invocation.capture {
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());
    }

    let output = match cmd.output() {
        Ok(output) => output,
        Err(e) => {
            tracing::debug!("Failed to spawn {}: {}", invocation.program, e);
            return CommandResult::not_started(e.to_string());
        }
    };

    let duration = start.elapsed();
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if output.status.success() {
        CommandResult::success(stdout, stderr, duration)
    } else {
        tracing::debug!(
            "{} exited with {:?} after {:?}",
            invocation.program,
            output.status.code(),
            duration
        );
        CommandResult::failure(output.status.code(), stdout, stderr, duration)
    }
}

/// Split a PATH-style value into its directories.
pub fn split_path(value: &OsString) -> Vec<PathBuf> {
    std::env::split_paths(value).collect()
}
