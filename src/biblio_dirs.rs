//! Application directory paths for biblio.
//!
//! Uses the [`dirs`] crate for platform-appropriate resolution.
//!
//! | Purpose | macOS | Linux |
//! |---------|-------|-------|
//! | Config | `~/Library/Application Support/biblio/` | `~/.config/biblio/` |
//!
//! Set `BIBLIO_CONFIG_DIR` to override [`config_dir`] for testing or custom
//! deployments.

use std::path::PathBuf;

/// Application config directory.
///
/// Resolves to `dirs::config_dir()/biblio/` by default. Override with
/// the `BIBLIO_CONFIG_DIR` environment variable.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("BIBLIO_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("biblio"))
        .unwrap_or_else(|| PathBuf::from("/tmp/biblio-config"))
}

/// Main config file (`config_dir()/config.toml`).
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}
