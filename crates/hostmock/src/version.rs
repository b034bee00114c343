//! The library's own version, parsed once from the manifest literal.

use once_cell::sync::Lazy;
use semver::Version;

/// Version literal as written in the manifest, the single source of
/// truth for packaging metadata.
pub const VERSION_STR: &str = env!("CARGO_PKG_VERSION");

static VERSION: Lazy<Version> = Lazy::new(|| {
    // The literal is fixed at compile time; a parse failure is a build
    // defect, not a runtime condition.
    Version::parse(VERSION_STR).expect("CARGO_PKG_VERSION is not valid semver")
});

/// The parsed version.
pub fn version() -> &'static Version {
    &VERSION
}

/// Ordered version components: major, minor, patch, then any
/// pre-release identifiers.
pub fn components() -> Vec<String> {
    let v = version();
    let mut parts = vec![v.major.to_string(), v.minor.to_string(), v.patch.to_string()];
    if !v.pre.is_empty() {
        parts.extend(v.pre.as_str().split('.').map(str::to_string));
    }
    parts
}

/// Digits-only short form, `MAJOR.MINOR.PATCH`.
pub fn short_version() -> String {
    let v = version();
    format!("{}.{}.{}", v.major, v.minor, v.patch)
}
