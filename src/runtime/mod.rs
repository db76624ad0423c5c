//! PHP runtime installation and verification.
//!
//! - [`Recipe`] maps a package manager to its commands and package names
//! - [`install_runtime`] drives the recipe
//! - [`verify_runtime`] resolves the interpreter and checks its build
//! - [`audit_extensions`] finds required extensions that are not loaded

pub mod extensions;
pub mod install;
pub mod recipe;
pub mod verify;

pub use extensions::audit_extensions;
pub use install::{install_runtime, select_runtime_package, InstallOutcome};
pub use recipe::{Recipe, GENERIC_RUNTIME};
pub use verify::{verify_runtime, RuntimeInfo, REQUIRED_INT_WIDTH};
