//! Build-time information
//!
//! Build metadata captured at compile time by `build.rs`, logged once at
//! startup.

/// Package name
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Package version
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build timestamp (when the binary was compiled)
pub const BUILD_TIMESTAMP: &str = env!("VERGEN_BUILD_TIMESTAMP");

/// Cargo optimization level (0, 1, 2, 3, s, z)
pub const CARGO_OPT_LEVEL: &str = env!("VERGEN_CARGO_OPT_LEVEL");

/// Target triple (e.g., x86_64-unknown-linux-gnu)
pub const CARGO_TARGET_TRIPLE: &str = env!("VERGEN_CARGO_TARGET_TRIPLE");

/// Rust compiler version (e.g., 1.85.0)
pub const RUSTC_SEMVER: &str = env!("VERGEN_RUSTC_SEMVER");

/// Git commit, when built from a checkout
pub const GIT_SHA: Option<&str> = option_env!("VERGEN_GIT_SHA");

/// Short build identifier: `{version}+{sha}` or just the version
pub fn version_string() -> String {
    match GIT_SHA {
        Some(sha) => format!("{}+{}", PKG_VERSION, &sha[..sha.len().min(8)]),
        None => PKG_VERSION.to_string(),
    }
}

/// Logs build metadata as one structured event
pub fn log_build_info() {
    tracing::info!(
        name = PKG_NAME,
        version = %version_string(),
        built = BUILD_TIMESTAMP,
        target = CARGO_TARGET_TRIPLE,
        opt_level = CARGO_OPT_LEVEL,
        rustc = RUSTC_SEMVER,
        "Build info"
    );
}
