//! Provisioning settings.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//!
//! # Example
//!
//! ```
//! use liveproto_setup::config::{parse_settings, Settings};
//! use std::path::Path;
//!
//! let settings = parse_settings("package: acme/widget", Path::new("config.yml")).unwrap();
//! assert_eq!(settings.package, "acme/widget");
//! assert_eq!(settings.extensions, Settings::default().extensions);
//! ```

pub mod loader;
pub mod schema;

pub use loader::{load_settings, load_settings_file, parse_settings, user_config_path};
pub use schema::{InstallDir, Settings};
