//! Version extraction from tool output.

use std::sync::LazyLock;

use regex::Regex;

/// Version patterns, most specific first. The first capture group is the version.
static VERSION_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"(\d+\.\d+\.\d+)").expect("full version pattern must compile"),
        Regex::new(r"(?i)version\s+(\d+\.\d+)").expect("version label pattern must compile"),
        Regex::new(r"\bv(\d+\.\d+)").expect("v-prefixed pattern must compile"),
    ]
});

/// Extract a version number from command output.
pub fn extract_version(output: &str) -> Option<String> {
    VERSION_PATTERNS
        .iter()
        .find_map(|re| re.captures(output)?.get(1))
        .map(|m| m.as_str().to_string())
}

/// Major component of a dotted version string.
pub fn major_version(version: &str) -> Option<u32> {
    version.split('.').next()?.parse().ok()
}
