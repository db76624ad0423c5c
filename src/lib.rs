//! liveproto-setup - provision a PHP environment for taknone/liveproto.
//!
//! The provisioner detects the host package manager, installs PHP and the
//! required extensions, installs Composer, and pulls `taknone/liveproto`
//! into a scratch project.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`composer`] - Composer installation and the scratch project
//! - [`config`] - Settings loading
//! - [`detection`] - Privilege and package manager detection
//! - [`error`] - Error types and result aliases
//! - [`net`] - HTTP downloads
//! - [`provision`] - The step pipeline, advisories and summary
//! - [`resolver`] - Ordered-preference resolution
//! - [`runtime`] - PHP install recipes and verification
//! - [`shell`] - External command execution
//! - [`system`] - Host abstraction
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use liveproto_setup::resolver::first_available;
//!
//! let index = ["php8.2", "php8.1"];
//! let chosen = first_available(["php8.4", "php8.3", "php8.2"], |p| index.contains(p), "php");
//! assert_eq!(chosen.into_inner(), "php8.2");
//! ```
//!
//! For full pipeline runs against a scripted host, see the integration tests.

pub mod cli;
pub mod composer;
pub mod config;
pub mod detection;
pub mod error;
pub mod net;
pub mod provision;
pub mod resolver;
pub mod runtime;
pub mod shell;
pub mod system;
pub mod ui;

pub use error::{ProvisionError, Result};
