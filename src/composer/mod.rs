//! Composer installation and the scratch project.

pub mod bootstrap;
pub mod project;

pub use bootstrap::{
    composer_command, ensure_composer, resolve_composer, sha384_hex, ComposerStatus, COMPOSER,
    INSTALLER_FILE,
};
pub use project::{ScratchProject, MANIFEST_FILE};
