//! Error types for provisioning.
//!
//! This module defines [`ProvisionError`], the fatal error type of the
//! pipeline, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - `ProvisionError` is reserved for failures that must stop the run with
//!   a non-zero exit code
//! - Everything else is an [`Advisory`](crate::provision::Advisory) recorded
//!   in the run summary
//! - Use `anyhow::Error` (via `ProvisionError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Fatal error type for provisioning runs.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// None of the supported package managers is on PATH.
    #[error("No supported package manager detected (looked for: {probed})")]
    NoPackageManager { probed: String },

    /// A package manager was detected but cannot be driven from a shell.
    #[error("Unsupported package manager '{name}': {reason}")]
    UnsupportedPackageManager { name: String, reason: String },

    /// The PHP runtime could not be resolved after installation.
    #[error("PHP runtime not found on PATH after install (tried: {tried})")]
    RuntimeUnresolvable { tried: String },

    /// Composer is still missing when the target package is acquired.
    #[error("Composer is not available; cannot require '{package}'")]
    DependencyManagerMissing { package: String },

    /// HOME is unset, so there is nowhere to put the scratch project.
    #[error("HOME is not set; cannot locate the scratch project directory")]
    HomeNotSet,

    /// Settings file not found at an explicitly requested location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse a settings file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for provisioning operations.
pub type Result<T> = std::result::Result<T, ProvisionError>;
