//! Build identification for logs and `--version`.

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

const UNKNOWN: &str = "unknown";
const SHORT_SHA_LEN: usize = 7;

fn build_env(value: Option<&'static str>) -> &'static str {
    value.filter(|v| !v.is_empty()).unwrap_or(UNKNOWN)
}

/// Git commit the binary was built from, abbreviated.
pub fn git_commit() -> &'static str {
    let sha = build_env(option_env!("VERGEN_GIT_SHA"));
    &sha[..SHORT_SHA_LEN.min(sha.len())]
}

/// Version string logged at startup: `{version}+{branch}.{commit}`, with
/// a `.dirty` suffix when built from a modified tree.
///
/// Outside a git checkout this reads `0.1.0+unknown.unknown`.
pub fn version_string() -> String {
    let branch = build_env(option_env!("VERGEN_GIT_BRANCH"));
    let mut version = format!("{PKG_VERSION}+{branch}.{}", git_commit());
    if option_env!("VERGEN_GIT_DIRTY") == Some("true") {
        version.push_str(".dirty");
    }
    version
}
