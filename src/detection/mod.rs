//! Host capability detection.

pub mod package_manager;
pub mod privilege;
pub mod version;

pub use package_manager::{DetectedPackageManager, PackageManagerDetector, PackageManagerKind};
pub use privilege::{PrivilegeMode, ELEVATION_HELPER};
pub use version::{extract_version, major_version};
